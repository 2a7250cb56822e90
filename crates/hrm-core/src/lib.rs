//! # HRM Core
//!
//! Pure building blocks of the heart-rate exertion test:
//!
//! - [`Phase`]: the session lifecycle enum with a table-driven transition
//!   function, so illegal phase orderings are rejected instead of silently
//!   tolerated.
//! - [`gate`]: the per-notification admission filter (rate limiting, warm-up
//!   rejection, dead-zone rejection).
//! - [`PhaseBuffers`]: the two append-only sample collections, one per
//!   recording phase.
//! - [`metrics`]: baseline mean and peak/delta calculators.
//! - [`SessionError`]: the error taxonomy shared by the session layer.
//!
//! Everything here is synchronous and free of shared state; the session
//! crate supplies the locking and the async orchestration.

pub mod buffers;
pub mod error;
pub mod gate;
pub mod metrics;
pub mod phase;

pub use buffers::{Bpm, PhaseBuffers};
pub use error::SessionError;
pub use gate::{DropReason, GateVerdict, SampleTarget};
pub use phase::{Phase, SessionOp};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
