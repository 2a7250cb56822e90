//! Per-phase sample buffers.

use crate::gate::SampleTarget;

/// Heart-rate reading in beats per minute.
pub type Bpm = u16;

/// The two append-only sample collections, one per recording phase.
///
/// A sample is appended to exactly one buffer, decided by the gate at
/// arrival time, and never reclassified afterwards.
#[derive(Debug, Default)]
pub struct PhaseBuffers {
    baseline: Vec<Bpm>,
    challenge: Vec<Bpm>,
}

impl PhaseBuffers {
    /// Create a pair of empty buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a gated sample to its target buffer.
    pub fn append(&mut self, target: SampleTarget, value: Bpm) {
        match target {
            SampleTarget::Baseline => self.baseline.push(value),
            SampleTarget::Challenge => self.challenge.push(value),
        }
    }

    /// Baseline samples in arrival order.
    #[must_use]
    pub fn baseline(&self) -> &[Bpm] {
        &self.baseline
    }

    /// Challenge samples in arrival order.
    #[must_use]
    pub fn challenge(&self) -> &[Bpm] {
        &self.challenge
    }

    /// Clear only the baseline buffer (re-recording a baseline).
    pub fn clear_baseline(&mut self) {
        self.baseline.clear();
    }

    /// Clear both buffers.
    pub fn clear_all(&mut self) {
        self.baseline.clear();
        self.challenge.clear();
    }
}
