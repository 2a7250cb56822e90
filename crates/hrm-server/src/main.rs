//! HRM server entry point.
//!
//! Runs the heart-rate exertion test service against the sensor named on
//! the command line. The wireless link is provided by the simulated
//! transport adapter; swapping in a hardware adapter only changes the
//! construction below.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hrm_server::{create_router, AppState};
use hrm_session::{SessionConfig, SessionManager};
use hrm_transport::{SimConfig, SimTransport};

/// The control surface listens on a fixed local port.
const LISTEN_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 8081);

#[derive(Parser, Debug)]
#[command(name = "hrm-server", about = "Heart-rate exertion test service")]
struct Args {
    /// Identifier of the target heart-rate sensor.
    target_id: String,

    /// Log verbosity (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Baseline recording window in seconds.
    #[arg(long, env = "BASELINE_SECONDS", default_value_t = 5)]
    baseline_seconds: u64,

    /// Minimum interval between accepted samples in milliseconds.
    #[arg(long, env = "SAMPLE_RATE_MS", default_value_t = 1000)]
    sample_rate_ms: u64,

    /// Interval between simulated sensor notifications in milliseconds.
    #[arg(long, default_value_t = 250)]
    sim_notify_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level: tracing::Level = args
        .log_level
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid log level '{}': {e}", args.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string())),
        )
        .init();

    info!(sensor = %args.target_id, log_level = %level, "hrm");

    let config = SessionConfig {
        baseline_window: Duration::from_secs(args.baseline_seconds),
        min_sample_interval: Duration::from_millis(args.sample_rate_ms),
    };

    // The simulated strap advertises whatever identifier the operator asked
    // for, so the scan always has something to find.
    let transport = SimTransport::new(SimConfig {
        device_id: args.target_id.clone(),
        notify_interval: Duration::from_millis(args.sim_notify_ms),
        ..SimConfig::default()
    });

    let manager = SessionManager::new(transport, args.target_id, config);
    let app = create_router(AppState::new(manager));

    let addr = SocketAddr::from(LISTEN_ADDR);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {addr}...");
    axum::serve(listener, app).await?;
    Ok(())
}
