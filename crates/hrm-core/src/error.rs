//! Session-level error taxonomy.

use thiserror::Error;

use hrm_transport::TransportError;

use crate::phase::{Phase, SessionOp};

/// Errors surfaced by session operations.
///
/// None of these are retried automatically; each maps to a message string
/// plus an error-indicating status on the control surface. `AlreadyConnected`
/// is the one non-fatal member: the connect operation reports it as a
/// successful no-op.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A connection is already held; a second one is never opened.
    #[error("already connected; you must disconnect first")]
    AlreadyConnected,

    /// The operation needs a sensor connection and none is held.
    #[error("no sensor connection; you must connect first")]
    NotConnected,

    /// The baseline window elapsed without a single accepted sample.
    #[error("failed to establish baseline: no samples accepted")]
    EmptyBaseline,

    /// Table-driven transition rejection.
    #[error("{operation:?} is not legal while the session is {phase:?}")]
    InvalidPhase { operation: SessionOp, phase: Phase },

    /// Failure in the wireless transport layer, surfaced verbatim.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
