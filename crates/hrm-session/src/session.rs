//! Shared session state and sample ingestion.
//!
//! One `Session` value holds everything the two execution contexts share:
//! phase, buffers, metrics, and the rate-limit clock. The manager wraps it
//! in a single mutex; every method here runs inside one critical section,
//! so a phase transition can never interleave with a sample append.

use std::time::{Duration, Instant};

use hrm_core::buffers::{Bpm, PhaseBuffers};
use hrm_core::gate::{self, GateVerdict};
use hrm_core::metrics;
use hrm_core::{Phase, SessionError, SessionOp};

/// Metrics captured at the end of a run, before the reset wipes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    /// Resting baseline, if one was established.
    pub baseline: Option<Bpm>,
    /// Peak reading across both buffers, if a challenge completed.
    pub peak: Option<Bpm>,
    /// Peak minus baseline, if a challenge completed.
    pub delta: Option<i32>,
}

/// The single live instance of the service's recording state.
#[derive(Debug)]
pub struct Session {
    phase: Phase,
    buffers: PhaseBuffers,
    baseline: Option<Bpm>,
    peak: Option<Bpm>,
    delta: Option<i32>,
    /// Rate-limit clock. Survives resets on purpose: the sensor keeps
    /// notifying across protocol restarts.
    last_accepted: Option<Instant>,
}

impl Session {
    /// Fresh session in `Idle` with empty buffers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            buffers: PhaseBuffers::new(),
            baseline: None,
            peak: None,
            delta: None,
            last_accepted: None,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Apply a control operation through the transition table.
    pub fn apply(&mut self, op: SessionOp) -> Result<(), SessionError> {
        self.phase = self.phase.apply(op)?;
        Ok(())
    }

    /// Run the gate on a raw notification and, if accepted, append it to
    /// the buffer owned by the current phase.
    pub fn ingest(&mut self, value: Bpm, now: Instant, min_interval: Duration) -> GateVerdict {
        let elapsed = self.last_accepted.map(|at| now.duration_since(at));
        let verdict = gate::evaluate(self.phase, value, elapsed, min_interval);
        if let GateVerdict::Accept(target) = verdict {
            self.last_accepted = Some(now);
            self.buffers.append(target, value);
        }
        verdict
    }

    /// Clear baseline data ahead of a (re-)recording; returns to
    /// `Connected`.
    pub fn reset_baseline(&mut self) -> Result<(), SessionError> {
        self.apply(SessionOp::ResetBaseline)?;
        self.buffers.clear_baseline();
        self.baseline = None;
        Ok(())
    }

    /// Wipe both buffers and all derived metrics and return to `Idle`.
    ///
    /// Legal from every phase. The rate-limit clock is left alone.
    pub fn full_reset(&mut self) {
        self.phase = Phase::Idle;
        self.buffers.clear_all();
        self.baseline = None;
        self.peak = None;
        self.delta = None;
    }

    /// Close the baseline window: compute the mean and advance to
    /// `BaselineEstablished`.
    ///
    /// With zero accepted samples this fails with `EmptyBaseline` and the
    /// phase stays `RecordingBaseline`.
    pub fn finish_baseline(&mut self) -> Result<Bpm, SessionError> {
        let baseline = metrics::compute_baseline(self.buffers.baseline())?;
        self.apply(SessionOp::FinishBaseline)?;
        self.baseline = Some(baseline);
        Ok(baseline)
    }

    /// Terminate the challenge: fix peak and delta and advance to
    /// `Completed`.
    pub fn finish_challenge(&mut self) -> Result<(Bpm, i32), SessionError> {
        self.apply(SessionOp::FinishChallenge)?;
        let baseline = self.baseline.ok_or(SessionError::EmptyBaseline)?;
        let (peak, delta) = metrics::compute_peak_and_delta(
            self.buffers.baseline(),
            self.buffers.challenge(),
            baseline,
        )
        .ok_or(SessionError::EmptyBaseline)?;
        self.peak = Some(peak);
        self.delta = Some(delta);
        Ok((peak, delta))
    }

    /// Established baseline, if any.
    #[must_use]
    pub fn baseline(&self) -> Option<Bpm> {
        self.baseline
    }

    /// Copy of the metrics for reporting.
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            baseline: self.baseline,
            peak: self.peak,
            delta: self.delta,
        }
    }

    /// Snapshot of the baseline buffer.
    #[must_use]
    pub fn baseline_samples(&self) -> Vec<Bpm> {
        self.buffers.baseline().to_vec()
    }

    /// Snapshot of the challenge buffer.
    #[must_use]
    pub fn challenge_samples(&self) -> Vec<Bpm> {
        self.buffers.challenge().to_vec()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
