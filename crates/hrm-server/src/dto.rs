//! Response shapes for the control surface.

use serde::Serialize;

use hrm_core::buffers::Bpm;

/// Plain acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// What just happened, e.g. `"connected"`.
    pub message: &'static str,
}

/// Baseline establishment result.
#[derive(Debug, Serialize)]
pub struct BaselineResponse {
    pub message: &'static str,
    /// Integer mean of the accepted baseline samples.
    pub baseline: Bpm,
}

/// `{}` -- the challenge starts in the background.
#[derive(Debug, Serialize)]
pub struct EmptyResponse {}

/// Final outcome reported by the disconnect route.
///
/// Metrics default to zero when the corresponding protocol step never ran;
/// a teardown problem rides along in `error` without changing the status.
#[derive(Debug, Serialize)]
pub struct DeltaResponse {
    pub message: &'static str,
    pub baseline: Bpm,
    pub max: Bpm,
    pub delta: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Raw sample sequence for the data endpoints: `null` when empty.
pub fn sample_array(samples: Vec<Bpm>) -> Option<Vec<Bpm>> {
    if samples.is_empty() {
        None
    } else {
        Some(samples)
    }
}
