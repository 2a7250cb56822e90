//! Route handlers, one per session-transition command.

use axum::extract::State;
use axum::Json;

use hrm_core::buffers::Bpm;
use hrm_transport::SensorTransport;

use crate::dto::{
    sample_array, BaselineResponse, DeltaResponse, EmptyResponse, MessageResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// Full reset, then connect. Already-connected reports success.
#[tracing::instrument(skip(state))]
pub async fn connect<T: SensorTransport>(
    State(state): State<AppState<T>>,
) -> ApiResult<Json<MessageResponse>> {
    state.manager().request_connect().await?;
    Ok(Json(MessageResponse {
        message: "connected",
    }))
}

/// Reset baseline data, then record a baseline over the configured window.
#[tracing::instrument(skip(state))]
pub async fn baseline<T: SensorTransport>(
    State(state): State<AppState<T>>,
) -> ApiResult<Json<BaselineResponse>> {
    let baseline = state.manager().request_baseline().await?;
    Ok(Json(BaselineResponse {
        message: "baseline",
        baseline,
    }))
}

/// Start the challenge. The response does not wait for the outcome; the
/// disconnect route reports it.
#[tracing::instrument(skip(state))]
pub async fn challenge<T: SensorTransport>(
    State(state): State<AppState<T>>,
) -> ApiResult<Json<EmptyResponse>> {
    state.manager().start_challenge().await?;
    Ok(Json(EmptyResponse {}))
}

/// Terminate the challenge, disconnect, full reset. Always 200; a teardown
/// problem is carried in the `error` field next to the final metrics.
#[tracing::instrument(skip(state))]
pub async fn disconnect<T: SensorTransport>(
    State(state): State<AppState<T>>,
) -> Json<DeltaResponse> {
    let (summary, error) = state.manager().request_disconnect().await;
    Json(DeltaResponse {
        message: "delta",
        baseline: summary.baseline.unwrap_or(0),
        max: summary.peak.unwrap_or(0),
        delta: summary.delta.unwrap_or(0),
        error: error.map(|e| e.to_string()),
    })
}

/// Raw baseline samples, `null` when none were recorded.
#[tracing::instrument(skip(state))]
pub async fn baseline_data<T: SensorTransport>(
    State(state): State<AppState<T>>,
) -> Json<Option<Vec<Bpm>>> {
    Json(sample_array(state.manager().baseline_data()))
}

/// Raw challenge samples, `null` when none were recorded.
#[tracing::instrument(skip(state))]
pub async fn challenge_data<T: SensorTransport>(
    State(state): State<AppState<T>>,
) -> Json<Option<Vec<Bpm>>> {
    Json(sample_array(state.manager().challenge_data()))
}
