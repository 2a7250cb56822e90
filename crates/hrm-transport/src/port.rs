//! The primary port (driving side) for the wireless sensor link.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TransportError;

/// Callback invoked for every raw heart-rate notification.
///
/// The value is the raw beats-per-minute reading as delivered by the sensor;
/// zero readings (sensor warm-up) are passed through and filtered upstream.
pub type SampleCallback = Arc<dyn Fn(u16) + Send + Sync>;

/// Port that abstracts the short-range wireless transport.
///
/// Implementations own radio enablement, device scanning, and notification
/// delivery. The session core consumes the link exclusively through these
/// four primitives and observes progress only via log events.
#[async_trait]
pub trait SensorTransport: Send + Sync + 'static {
    /// Opaque handle to an established connection.
    type Conn: Send + Sync + 'static;

    /// Handle to the discovered heart-rate measurement source.
    type Source: Send + Sync + 'static;

    /// Enable the radio, scan until a device advertising `target_id`
    /// appears, and connect to it.
    ///
    /// Scanning has no timeout: the future resolves only once the device is
    /// found or the transport itself fails. A "radio already enabling"
    /// condition is tolerated by the adapter and never surfaces here.
    async fn scan_and_connect(&self, target_id: &str) -> Result<Self::Conn, TransportError>;

    /// Locate the heart-rate measurement source on a connected device.
    async fn discover_heart_rate_source(
        &self,
        conn: &mut Self::Conn,
    ) -> Result<Self::Source, TransportError>;

    /// Begin delivering raw notifications to `callback`.
    ///
    /// The subscription lives until the owning connection is torn down;
    /// there is no explicit unsubscribe.
    async fn subscribe(
        &self,
        source: &mut Self::Source,
        callback: SampleCallback,
    ) -> Result<(), TransportError>;

    /// Tear down the connection, implicitly ending any subscription.
    async fn disconnect(&self, conn: Self::Conn) -> Result<(), TransportError>;
}
