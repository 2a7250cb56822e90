//! Per-notification admission filter.
//!
//! Wearable straps are chatty and noisy: some radio stacks deliver readings
//! far faster than once a second, and a strap still settling on skin reports
//! zero. The gate decides, for every raw notification, whether it enters the
//! pipeline and which buffer receives it. The decision is pure -- phase,
//! value, elapsed time and configuration in, verdict out -- so the caller
//! can apply it inside whatever critical section it needs.

use std::time::Duration;

use crate::phase::Phase;

/// Destination buffer for an accepted sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleTarget {
    /// The baseline recording buffer.
    Baseline,
    /// The challenge recording buffer.
    Challenge,
}

/// Why a notification was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Arrived sooner than the minimum inter-sample interval.
    TooSoon,
    /// Zero reading: the sensor is warming up or has no skin contact.
    WarmingUp,
    /// Baseline finished but the challenge has not started; dropped so the
    /// buffers cannot grow unbounded while waiting for the operator.
    AwaitingChallenge,
    /// No phase currently owns a buffer.
    NoActiveBuffer,
}

/// Verdict for a single raw notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateVerdict {
    /// Admit the sample into the named buffer.
    Accept(SampleTarget),
    /// Drop the sample.
    Drop(DropReason),
}

/// Decide whether a raw notification is admitted.
///
/// Rules run in a fixed order: rate limit, warm-up rejection, then
/// phase-based routing. `elapsed` is the time since the last *accepted*
/// sample, `None` if nothing has been accepted yet; arrivals exactly at the
/// minimum interval are admitted.
pub fn evaluate(
    phase: Phase,
    value: u16,
    elapsed: Option<Duration>,
    min_interval: Duration,
) -> GateVerdict {
    if let Some(elapsed) = elapsed {
        if elapsed < min_interval {
            return GateVerdict::Drop(DropReason::TooSoon);
        }
    }
    if value == 0 {
        return GateVerdict::Drop(DropReason::WarmingUp);
    }
    match phase {
        Phase::RecordingBaseline => GateVerdict::Accept(SampleTarget::Baseline),
        Phase::ChallengeActive => GateVerdict::Accept(SampleTarget::Challenge),
        Phase::BaselineEstablished => GateVerdict::Drop(DropReason::AwaitingChallenge),
        Phase::Idle | Phase::Connected | Phase::Completed => {
            GateVerdict::Drop(DropReason::NoActiveBuffer)
        }
    }
}
