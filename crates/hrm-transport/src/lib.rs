//! Wireless transport seam for the HRM service.
//!
//! The session core never talks to a radio directly. It drives the link
//! through the [`SensorTransport`] port, which exposes exactly four
//! primitives: scan-and-connect, heart-rate source discovery, notification
//! subscription, and disconnect. Everything below that line -- radio
//! enablement, advertising, pairing, characteristic plumbing -- belongs to
//! the adapter behind the port.
//!
//! Two things live in this crate:
//!
//! - [`port`]: the `SensorTransport` trait and the notification callback
//!   type.
//! - [`sim`]: an in-process adapter that emits a deterministic BPM waveform,
//!   so the service runs and is testable end to end without hardware.

pub mod error;
pub mod port;
pub mod sim;

pub use error::TransportError;
pub use port::{SampleCallback, SensorTransport};
pub use sim::{SimConfig, SimTransport};
