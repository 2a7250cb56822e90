//! Baseline and peak statistics.
//!
//! Nothing fancier than integer mean and max: the protocol reports the
//! resting baseline, the peak reading observed anywhere in the run, and the
//! difference between the two.

use crate::buffers::Bpm;
use crate::error::SessionError;

/// Integer-truncating mean of the accepted baseline samples.
///
/// An empty input is the [`SessionError::EmptyBaseline`] condition, never a
/// silent zero.
pub fn compute_baseline(samples: &[Bpm]) -> Result<Bpm, SessionError> {
    if samples.is_empty() {
        return Err(SessionError::EmptyBaseline);
    }
    let sum: u64 = samples.iter().map(|&v| u64::from(v)).sum();
    Ok((sum / samples.len() as u64) as Bpm)
}

/// Peak over both buffers and its delta against the baseline.
///
/// Baseline samples count toward the peak: the highest reading of a run can
/// land before the challenge formally starts. The delta may be negative and
/// that is not an error. Returns `None` only when both sequences are empty,
/// which the state machine rules out on the normal path.
pub fn compute_peak_and_delta(
    baseline_samples: &[Bpm],
    challenge_samples: &[Bpm],
    baseline: Bpm,
) -> Option<(Bpm, i32)> {
    let peak = baseline_samples
        .iter()
        .chain(challenge_samples)
        .copied()
        .max()?;
    Some((peak, i32::from(peak) - i32::from(baseline)))
}
