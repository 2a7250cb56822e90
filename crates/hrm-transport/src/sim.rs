//! Simulated sensor adapter.
//!
//! Behaves like a single heart-rate strap within radio range: it advertises
//! one device identifier, connects when the scan target matches, and once
//! subscribed emits a deterministic sine-modulated BPM stream with a couple
//! of leading zero readings to mimic sensor warm-up. Notifications stop the
//! moment the connection is torn down.

use std::f64::consts::PI;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::TransportError;
use crate::port::{SampleCallback, SensorTransport};

/// Simulated advertising latency before a matching device is "found".
const ADVERTISE_DELAY: Duration = Duration::from_millis(100);

/// Tuning for the simulated sensor.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Identifier the simulated device advertises.
    pub device_id: String,
    /// Interval between notifications.
    pub notify_interval: Duration,
    /// Resting heart rate the waveform oscillates around.
    pub base_bpm: u16,
    /// Peak-to-trough swing of the waveform.
    pub swing_bpm: u16,
    /// Seconds per full waveform cycle.
    pub cycle_secs: f64,
    /// Number of leading zero readings emitted while "warming up".
    pub warmup_zeros: u32,
    /// Report a missing heart-rate service after connecting.
    pub fail_discovery: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            device_id: "sim-hr-001".to_string(),
            notify_interval: Duration::from_millis(250),
            base_bpm: 72,
            swing_bpm: 20,
            cycle_secs: 30.0,
            warmup_zeros: 2,
            fail_discovery: false,
        }
    }
}

/// In-process transport simulating one heart-rate sensor.
pub struct SimTransport {
    config: SimConfig,
    radio_enabled: AtomicBool,
}

/// Connection handle to the simulated device.
///
/// Dropping the handle cancels the notification stream: subscriptions die
/// with the connection.
pub struct SimConnection {
    device_id: String,
    alive: CancellationToken,
}

impl Drop for SimConnection {
    fn drop(&mut self) {
        self.alive.cancel();
    }
}

/// Discovered measurement source on a simulated connection.
pub struct SimSource {
    alive: CancellationToken,
    config: SimConfig,
}

impl SimTransport {
    /// Create a transport backed by one simulated device.
    #[must_use]
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            radio_enabled: AtomicBool::new(false),
        }
    }

    fn enable_radio(&self) {
        if self.radio_enabled.swap(true, Ordering::SeqCst) {
            // Concurrent enable attempts are harmless on real stacks too.
            debug!("radio already enabling; continuing");
        } else {
            debug!("enabled radio interface");
        }
    }
}

/// Waveform sample for a given notification tick.
fn waveform_value(config: &SimConfig, tick: u64) -> u16 {
    if tick < u64::from(config.warmup_zeros) {
        return 0;
    }
    let t = tick as f64 * config.notify_interval.as_secs_f64();
    let swing = f64::from(config.swing_bpm) / 2.0 * (2.0 * PI * t / config.cycle_secs).sin();
    (f64::from(config.base_bpm) + swing).round().max(1.0) as u16
}

#[async_trait]
impl SensorTransport for SimTransport {
    type Conn = SimConnection;
    type Source = SimSource;

    async fn scan_and_connect(&self, target_id: &str) -> Result<SimConnection, TransportError> {
        self.enable_radio();

        info!(sensor = target_id, "scanning for sensor");
        if target_id != self.config.device_id {
            // The simulated radio only ever advertises one device. Scanning
            // for anything else never completes, matching a real scan with
            // the sensor out of range.
            debug!(
                advertised = %self.config.device_id,
                "target not advertised; scan continues"
            );
            std::future::pending::<()>().await;
            unreachable!("pending scan never resolves");
        }

        tokio::time::sleep(ADVERTISE_DELAY).await;
        info!(device = %self.config.device_id, "found device, connecting");
        Ok(SimConnection {
            device_id: self.config.device_id.clone(),
            alive: CancellationToken::new(),
        })
    }

    async fn discover_heart_rate_source(
        &self,
        conn: &mut SimConnection,
    ) -> Result<SimSource, TransportError> {
        debug!(device = %conn.device_id, "discovering services/characteristics");
        if self.config.fail_discovery {
            return Err(TransportError::ServiceNotFound);
        }
        info!(device = %conn.device_id, "found heart rate measurement source");
        Ok(SimSource {
            alive: conn.alive.clone(),
            config: self.config.clone(),
        })
    }

    async fn subscribe(
        &self,
        source: &mut SimSource,
        callback: SampleCallback,
    ) -> Result<(), TransportError> {
        let alive = source.alive.clone();
        let config = source.config.clone();
        info!(device = %config.device_id, "heart rate notifications enabled");

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(config.notify_interval);
            let mut tick: u64 = 0;
            loop {
                tokio::select! {
                    // Teardown wins over a pending tick: nothing is
                    // delivered once the connection is gone.
                    biased;
                    _ = alive.cancelled() => break,
                    _ = interval.tick() => {
                        callback(waveform_value(&config, tick));
                        tick += 1;
                    }
                }
            }
            debug!(device = %config.device_id, "notification stream closed");
        });

        Ok(())
    }

    async fn disconnect(&self, conn: SimConnection) -> Result<(), TransportError> {
        info!(device = %conn.device_id, "disconnected");
        // Dropping the handle cancels the delivery task.
        drop(conn);
        Ok(())
    }
}
