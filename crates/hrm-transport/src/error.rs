//! Error types for the sensor transport layer.

use thiserror::Error;

/// Errors produced by a transport adapter.
///
/// Scan and connect failures surface verbatim to the control surface; the
/// two discovery variants mean the connected device lacks the required
/// heart-rate capability.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// No device advertising the requested identifier was seen.
    ///
    /// Scanning normally blocks until the device appears, so adapters only
    /// return this when the scan itself cannot continue.
    #[error("no device advertising '{target}' was found")]
    DeviceNotFound { target: String },

    /// The scan could not be started or aborted mid-flight.
    #[error("failed to scan for devices: {reason}")]
    ScanFailed { reason: String },

    /// The low-level connection attempt failed.
    #[error("failed to connect to '{target}': {reason}")]
    ConnectFailed { target: String, reason: String },

    /// The connected device does not expose a heart-rate service.
    #[error("could not find heart rate service")]
    ServiceNotFound,

    /// The heart-rate service has no measurement characteristic.
    #[error("could not find heart rate characteristic")]
    CharacteristicNotFound,

    /// Enabling notifications on the measurement source failed.
    #[error("failed to subscribe to heart rate notifications: {reason}")]
    SubscribeFailed { reason: String },

    /// Tearing down the connection failed.
    #[error("failed to disconnect: {reason}")]
    DisconnectFailed { reason: String },
}
