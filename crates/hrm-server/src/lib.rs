//! HTTP control surface for the HRM exertion test service.
//!
//! Six routes drive the protocol, one session-transition command at a time:
//!
//! - `GET /connect` -- full reset, then connect to the target sensor
//! - `GET /baseline` -- reset baseline data, then record a baseline
//! - `GET /challenge` -- start the challenge (returns immediately)
//! - `GET /disconnect` -- terminate the challenge, disconnect, full reset;
//!   reports baseline/max/delta
//! - `GET /heart-rate-data-baseline` -- raw baseline samples
//! - `GET /heart-rate-data-challenge` -- raw challenge samples
//!
//! All responses are JSON with permissive CORS, so a local browser UI can
//! poll the data endpoints while the operator runs the protocol.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod state;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use hrm_transport::SensorTransport;

pub use error::ApiError;
pub use state::AppState;

/// Create the control-surface router with all endpoints.
pub fn create_router<T: SensorTransport>(state: AppState<T>) -> Router {
    Router::new()
        .route("/connect", get(handlers::connect::<T>))
        .route("/baseline", get(handlers::baseline::<T>))
        .route("/challenge", get(handlers::challenge::<T>))
        .route("/disconnect", get(handlers::disconnect::<T>))
        .route(
            "/heart-rate-data-baseline",
            get(handlers::baseline_data::<T>),
        )
        .route(
            "/heart-rate-data-challenge",
            get(handlers::challenge_data::<T>),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
