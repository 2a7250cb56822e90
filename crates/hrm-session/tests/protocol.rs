//! Protocol-level tests for the session manager.
//!
//! These drive the full connect → baseline → challenge → disconnect flow
//! over a scripted mock transport whose notification callback the tests
//! invoke directly, so sample arrival is deterministic.
//!
//! Scenario matrix:
//! - connect twice opens one connection and reports success
//! - baseline without a connection is rejected
//! - baseline over known samples produces the integer mean
//! - empty baseline window fails and is retryable
//! - dead-zone samples between baseline and challenge are dropped
//! - full run produces the documented peak/delta
//! - disconnect without a connection still resets
//! - disconnect with no active challenge does not hang
//! - full reset preserves the connection
//! - discovery failure leaves the link assigned but unusable

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use hrm_core::SessionError;
use hrm_session::{SessionConfig, SessionManager};
use hrm_transport::{SampleCallback, SensorTransport, TransportError};

// ---------------------------------------------------------------------------
// Mock transport
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MockInner {
    connects: AtomicUsize,
    disconnects: AtomicUsize,
    fail_discovery: bool,
    callback: Mutex<Option<SampleCallback>>,
}

/// Transport whose notifications are pushed by the test itself.
#[derive(Clone, Default)]
struct MockTransport {
    inner: Arc<MockInner>,
}

impl MockTransport {
    fn new() -> Self {
        Self::default()
    }

    fn failing_discovery() -> Self {
        Self {
            inner: Arc::new(MockInner {
                fail_discovery: true,
                ..MockInner::default()
            }),
        }
    }

    fn connects(&self) -> usize {
        self.inner.connects.load(Ordering::SeqCst)
    }

    fn disconnects(&self) -> usize {
        self.inner.disconnects.load(Ordering::SeqCst)
    }

    /// Deliver one raw notification, as the sensor would.
    fn push(&self, value: u16) {
        let callback = self.inner.callback.lock().unwrap().clone();
        let callback = callback.expect("no active subscription");
        callback(value);
    }

    /// Wait until the manager has subscribed.
    async fn subscribed(&self) {
        while self.inner.callback.lock().unwrap().is_none() {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    }
}

#[async_trait]
impl SensorTransport for MockTransport {
    type Conn = ();
    type Source = ();

    async fn scan_and_connect(&self, _target_id: &str) -> Result<(), TransportError> {
        self.inner.connects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn discover_heart_rate_source(&self, _conn: &mut ()) -> Result<(), TransportError> {
        if self.inner.fail_discovery {
            return Err(TransportError::ServiceNotFound);
        }
        Ok(())
    }

    async fn subscribe(&self, _source: &mut (), callback: SampleCallback) -> Result<(), TransportError> {
        *self.inner.callback.lock().unwrap() = Some(callback);
        Ok(())
    }

    async fn disconnect(&self, _conn: ()) -> Result<(), TransportError> {
        self.inner.disconnects.fetch_add(1, Ordering::SeqCst);
        *self.inner.callback.lock().unwrap() = None;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Short window, no rate limiting: sample arrival is fully test-driven.
fn fast_config() -> SessionConfig {
    SessionConfig {
        baseline_window: Duration::from_millis(50),
        min_sample_interval: Duration::ZERO,
    }
}

fn manager(transport: &MockTransport) -> SessionManager<MockTransport> {
    SessionManager::new(transport.clone(), "polar-h10", fast_config())
}

/// Record a baseline from the given samples, pushed mid-window.
async fn record_baseline(
    manager: &SessionManager<MockTransport>,
    transport: &MockTransport,
    samples: &[u16],
) -> Result<u16, SessionError> {
    let feeder = {
        let transport = transport.clone();
        let samples = samples.to_vec();
        tokio::spawn(async move {
            transport.subscribed().await;
            for v in samples {
                transport.push(v);
            }
        })
    };
    let result = manager.request_baseline().await;
    feeder.await.unwrap();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn connect_twice_opens_one_connection() {
    let transport = MockTransport::new();
    let manager = manager(&transport);

    manager.request_connect().await.unwrap();
    manager.request_connect().await.unwrap();

    assert_eq!(transport.connects(), 1, "second connect must be a no-op");
}

#[tokio::test]
async fn baseline_without_connection_is_rejected() {
    let transport = MockTransport::new();
    let manager = manager(&transport);

    let err = manager.request_baseline().await;
    assert!(matches!(err, Err(SessionError::NotConnected)));
}

#[tokio::test]
async fn baseline_is_the_integer_mean_of_accepted_samples() {
    let transport = MockTransport::new();
    let manager = manager(&transport);

    manager.request_connect().await.unwrap();
    let baseline = record_baseline(&manager, &transport, &[60, 62, 64])
        .await
        .unwrap();
    assert_eq!(baseline, 62);
    assert_eq!(manager.baseline_data(), vec![60, 62, 64]);
}

#[tokio::test]
async fn zero_readings_are_not_recorded() {
    let transport = MockTransport::new();
    let manager = manager(&transport);

    manager.request_connect().await.unwrap();
    let baseline = record_baseline(&manager, &transport, &[0, 0, 70, 72])
        .await
        .unwrap();
    assert_eq!(baseline, 71);
    assert_eq!(manager.baseline_data(), vec![70, 72]);
}

#[tokio::test]
async fn empty_baseline_window_fails_and_is_retryable() {
    let transport = MockTransport::new();
    let manager = manager(&transport);

    manager.request_connect().await.unwrap();
    let err = manager.request_baseline().await;
    assert!(matches!(err, Err(SessionError::EmptyBaseline)));

    // A retry from the failed state must be legal and can succeed.
    let baseline = record_baseline(&manager, &transport, &[68]).await.unwrap();
    assert_eq!(baseline, 68);
}

#[tokio::test]
async fn dead_zone_samples_are_dropped() {
    let transport = MockTransport::new();
    let manager = manager(&transport);

    manager.request_connect().await.unwrap();
    record_baseline(&manager, &transport, &[60]).await.unwrap();

    // Baseline established, challenge not started: these go nowhere.
    transport.push(80);
    transport.push(85);

    assert_eq!(manager.baseline_data(), vec![60]);
    assert!(manager.challenge_data().is_empty());
}

#[tokio::test]
async fn full_run_reports_peak_and_delta() {
    let transport = MockTransport::new();
    let manager = manager(&transport);

    manager.request_connect().await.unwrap();
    let baseline = record_baseline(&manager, &transport, &[60, 62, 64])
        .await
        .unwrap();
    assert_eq!(baseline, 62);

    manager.start_challenge().await.unwrap();
    transport.push(90);
    transport.push(95);
    transport.push(100);
    assert_eq!(manager.challenge_data(), vec![90, 95, 100]);

    let (summary, error) = manager.request_disconnect().await;
    assert!(error.is_none(), "teardown should succeed: {error:?}");
    assert_eq!(summary.baseline, Some(62));
    assert_eq!(summary.peak, Some(100));
    assert_eq!(summary.delta, Some(38));

    // Disconnect ends with a full reset.
    assert!(manager.baseline_data().is_empty());
    assert!(manager.challenge_data().is_empty());
    assert_eq!(transport.disconnects(), 1);
}

#[tokio::test]
async fn challenge_requires_an_established_baseline() {
    let transport = MockTransport::new();
    let manager = manager(&transport);

    manager.request_connect().await.unwrap();
    let err = manager.start_challenge().await;
    assert!(matches!(err, Err(SessionError::InvalidPhase { .. })));
}

#[tokio::test]
async fn disconnect_without_connection_reports_but_still_resets() {
    let transport = MockTransport::new();
    let manager = manager(&transport);

    let (summary, error) = manager.request_disconnect().await;
    assert!(matches!(error, Some(SessionError::NotConnected)));
    assert_eq!(summary.baseline, None);
    assert_eq!(summary.peak, None);
    assert_eq!(summary.delta, None);
    assert_eq!(transport.disconnects(), 0);
}

#[tokio::test]
async fn disconnect_with_no_active_challenge_does_not_hang() {
    let transport = MockTransport::new();
    let manager = manager(&transport);

    manager.request_connect().await.unwrap();
    let teardown = tokio::time::timeout(Duration::from_secs(1), manager.request_disconnect());
    let (_, error) = teardown.await.expect("disconnect must not block");
    assert!(error.is_none());
}

#[tokio::test]
async fn full_reset_preserves_the_connection() {
    let transport = MockTransport::new();
    let manager = manager(&transport);

    manager.request_connect().await.unwrap();
    record_baseline(&manager, &transport, &[60, 62]).await.unwrap();

    manager.request_full_reset();
    assert!(manager.baseline_data().is_empty());
    assert!(manager.challenge_data().is_empty());

    // The link survives: reconnecting is still a no-op.
    manager.request_connect().await.unwrap();
    assert_eq!(transport.connects(), 1);
}

#[tokio::test]
async fn discovery_failure_leaves_link_assigned_but_unusable() {
    let transport = MockTransport::failing_discovery();
    let manager = manager(&transport);

    let err = manager.request_connect().await;
    assert!(matches!(
        err,
        Err(SessionError::Transport(TransportError::ServiceNotFound))
    ));

    // The connection is held, so recording cannot start...
    let err = manager.request_baseline().await;
    assert!(
        err.is_err(),
        "baseline over an unusable link must be rejected"
    );

    // ...but disconnect recovers.
    let (_, error) = manager.request_disconnect().await;
    assert!(error.is_none());
    assert_eq!(transport.disconnects(), 1);
}

#[tokio::test]
async fn new_round_after_completion_without_reconnecting() {
    let transport = MockTransport::new();
    let manager = manager(&transport);

    manager.request_connect().await.unwrap();
    record_baseline(&manager, &transport, &[60]).await.unwrap();
    manager.start_challenge().await.unwrap();
    transport.push(90);
    manager.request_disconnect().await;

    // Same sensor, fresh run.
    manager.request_connect().await.unwrap();
    let baseline = record_baseline(&manager, &transport, &[66]).await.unwrap();
    assert_eq!(baseline, 66);
    assert_eq!(transport.connects(), 2);
}
