//! Session phase state machine.
//!
//! The phase is the single source of truth for which buffer (if any) owns
//! incoming samples and which control operations are legal. Transitions are
//! table-driven: [`Phase::apply`] either returns the successor phase or
//! rejects the operation with [`SessionError::InvalidPhase`].

use crate::error::SessionError;

/// Lifecycle phase of the test session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No recording state; the initial phase.
    Idle,
    /// Sensor connected, nothing recorded yet.
    Connected,
    /// Baseline window open; samples land in the baseline buffer.
    RecordingBaseline,
    /// Baseline computed; samples are dropped until the challenge starts.
    BaselineEstablished,
    /// Challenge running; samples land in the challenge buffer.
    ChallengeActive,
    /// Challenge finished; peak and delta computed. Re-enterable via reset.
    Completed,
}

/// Control operations that drive phase transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOp {
    /// Establish the sensor connection.
    Connect,
    /// Clear baseline data ahead of a (re-)recording.
    ResetBaseline,
    /// Open the baseline recording window.
    StartBaseline,
    /// Close the window and fix the baseline.
    FinishBaseline,
    /// Begin the exertion challenge.
    StartChallenge,
    /// Terminate the challenge and fix peak/delta.
    FinishChallenge,
    /// Wipe buffers and metrics. Legal from every phase.
    FullReset,
}

impl Phase {
    /// Transition table. Returns the successor phase, or
    /// [`SessionError::InvalidPhase`] when `op` is not legal from `self`.
    ///
    /// `ResetBaseline` is admitted from every phase that is not actively
    /// feeding a buffer it would clear: a failed recording may be retried,
    /// an established baseline re-recorded, and a completed run restarted
    /// without reconnecting.
    pub fn apply(self, op: SessionOp) -> Result<Phase, SessionError> {
        use Phase::*;
        use SessionOp::*;

        let next = match (self, op) {
            (Idle, Connect) => Connected,
            (Connected | RecordingBaseline | BaselineEstablished | Completed, ResetBaseline) => {
                Connected
            }
            (Connected, StartBaseline) => RecordingBaseline,
            (RecordingBaseline, FinishBaseline) => BaselineEstablished,
            (BaselineEstablished, StartChallenge) => ChallengeActive,
            (ChallengeActive, FinishChallenge) => Completed,
            (_, FullReset) => Idle,
            (phase, op) => return Err(SessionError::InvalidPhase { operation: op, phase }),
        };
        Ok(next)
    }
}
