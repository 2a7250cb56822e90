//! Protocol orchestration: connect, baseline, challenge, disconnect.
//!
//! `SessionManager` owns the one allowed sensor link and the challenge
//! cancellation handshake. Control operations are expected to arrive one at
//! a time; the internal locks keep a misbehaving operator memory-safe but
//! make no ordering promises between simultaneous requests.
//!
//! The challenge uses two separate primitives instead of one channel doing
//! double duty: a `CancellationToken` carries the termination signal
//! (idempotent, never blocks the sender) and the spawned task's
//! `JoinHandle` is the acknowledgement that disconnect awaits before
//! tearing the link down.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use hrm_core::buffers::Bpm;
use hrm_core::{GateVerdict, SessionError, SessionOp};
use hrm_transport::{SampleCallback, SensorTransport, TransportError};

use crate::config::SessionConfig;
use crate::session::{Session, SessionSummary};

/// The held sensor link: connection, discovered source, subscription state.
struct Link<T: SensorTransport> {
    conn: T::Conn,
    /// `None` when discovery failed: the connection is assigned but
    /// unusable until the operator disconnects.
    source: Option<T::Source>,
    subscribed: bool,
}

/// A challenge awaiting its termination signal.
struct ChallengeHandle {
    stop: CancellationToken,
    task: JoinHandle<()>,
}

/// Drives the session through the test protocol against one sensor.
pub struct SessionManager<T: SensorTransport> {
    transport: T,
    target_id: String,
    config: SessionConfig,
    session: Arc<Mutex<Session>>,
    link: AsyncMutex<Option<Link<T>>>,
    challenge: AsyncMutex<Option<ChallengeHandle>>,
}

impl<T: SensorTransport> SessionManager<T> {
    /// Create a manager for the sensor advertising `target_id`.
    pub fn new(transport: T, target_id: impl Into<String>, config: SessionConfig) -> Self {
        Self {
            transport,
            target_id: target_id.into(),
            config,
            session: Arc::new(Mutex::new(Session::new())),
            link: AsyncMutex::new(None),
            challenge: AsyncMutex::new(None),
        }
    }

    /// Full reset, then connect.
    ///
    /// An already-held connection is a successful no-op; any other failure
    /// surfaces to the caller. After a discovery failure the connection
    /// stays assigned but unusable, and the phase does not advance.
    pub async fn request_connect(&self) -> Result<(), SessionError> {
        self.session.lock().full_reset();
        info!(sensor = %self.target_id, "connect requested");

        match self.open_link().await {
            Ok(()) => {}
            Err(SessionError::AlreadyConnected) => {
                info!("connection already held; connect is a no-op");
            }
            Err(e) => return Err(e),
        }

        self.session.lock().apply(SessionOp::Connect)?;
        Ok(())
    }

    /// Reset baseline data, then record a baseline over the configured
    /// window and return the established value.
    pub async fn request_baseline(&self) -> Result<Bpm, SessionError> {
        let mut link_guard = self.link.lock().await;
        let link = link_guard.as_mut().ok_or(SessionError::NotConnected)?;

        {
            let mut session = self.session.lock();
            session.reset_baseline()?;
            session.apply(SessionOp::StartBaseline)?;
        }

        if !link.subscribed {
            let source = link
                .source
                .as_mut()
                .ok_or(TransportError::CharacteristicNotFound)?;
            self.transport
                .subscribe(source, self.sample_callback())
                .await?;
            link.subscribed = true;
        }

        info!(window = ?self.config.baseline_window, "establishing baseline heart rate");
        tokio::time::sleep(self.config.baseline_window).await;

        let baseline = self.session.lock().finish_baseline()?;
        info!(baseline, "baseline established");
        Ok(baseline)
    }

    /// Start the challenge: transition the phase and spawn the waiter that
    /// fixes peak/delta once the termination signal arrives.
    ///
    /// Returns as soon as the challenge is running; the outcome is reported
    /// by [`request_disconnect`](Self::request_disconnect).
    pub async fn start_challenge(&self) -> Result<(), SessionError> {
        let mut slot = self.challenge.lock().await;
        self.session.lock().apply(SessionOp::StartChallenge)?;

        let stop = CancellationToken::new();
        let task = tokio::spawn(Self::challenge_waiter(
            Arc::clone(&self.session),
            stop.clone(),
        ));
        *slot = Some(ChallengeHandle { stop, task });
        info!("challenge started; recording until terminated");
        Ok(())
    }

    async fn challenge_waiter(session: Arc<Mutex<Session>>, stop: CancellationToken) {
        stop.cancelled().await;
        match session.lock().finish_challenge() {
            Ok((peak, delta)) => info!(peak, delta, "challenge complete"),
            Err(e) => warn!(error = %e, "challenge terminated without a result"),
        }
    }

    /// Terminate any in-flight challenge, tear down the link, and perform a
    /// full reset.
    ///
    /// The returned summary holds the metrics as they stood before the
    /// reset; a teardown error is reported alongside it and never blocks
    /// the reset.
    pub async fn request_disconnect(&self) -> (SessionSummary, Option<SessionError>) {
        self.terminate_challenge().await;

        let error = match self.close_link().await {
            Ok(()) => None,
            Err(e) => {
                warn!(error = %e, "disconnect reported an error");
                Some(e)
            }
        };

        let summary = {
            let mut session = self.session.lock();
            let summary = session.summary();
            session.full_reset();
            summary
        };
        info!("reset all session data");
        (summary, error)
    }

    /// Wipe buffers and metrics without touching the connection.
    pub fn request_full_reset(&self) {
        self.session.lock().full_reset();
        info!("reset all session data");
    }

    /// Snapshot of the baseline buffer.
    pub fn baseline_data(&self) -> Vec<Bpm> {
        self.session.lock().baseline_samples()
    }

    /// Snapshot of the challenge buffer.
    pub fn challenge_data(&self) -> Vec<Bpm> {
        self.session.lock().challenge_samples()
    }

    /// Scan, connect, and discover the heart-rate source, retaining the
    /// link. `AlreadyConnected` when a link is held.
    async fn open_link(&self) -> Result<(), SessionError> {
        let mut link = self.link.lock().await;
        if link.is_some() {
            return Err(SessionError::AlreadyConnected);
        }

        let mut conn = self.transport.scan_and_connect(&self.target_id).await?;

        match self.transport.discover_heart_rate_source(&mut conn).await {
            Ok(source) => {
                *link = Some(Link {
                    conn,
                    source: Some(source),
                    subscribed: false,
                });
                Ok(())
            }
            Err(e) => {
                // The connection stays assigned but unusable; the operator
                // has to disconnect to recover.
                *link = Some(Link {
                    conn,
                    source: None,
                    subscribed: false,
                });
                Err(e.into())
            }
        }
    }

    /// Tear down the held link. `NotConnected` when none is held; the
    /// handle is cleared even when the transport teardown fails, since an
    /// abandoned link must not shadow future connects.
    async fn close_link(&self) -> Result<(), SessionError> {
        let link = self.link.lock().await.take();
        match link {
            None => Err(SessionError::NotConnected),
            Some(link) => {
                self.transport.disconnect(link.conn).await?;
                Ok(())
            }
        }
    }

    /// Signal the pending challenge (if any) and wait for its
    /// acknowledgement. A no-op when no challenge is active, and safe to
    /// call after completion.
    async fn terminate_challenge(&self) {
        let handle = self.challenge.lock().await.take();
        if let Some(ChallengeHandle { stop, task }) = handle {
            stop.cancel();
            if let Err(e) = task.await {
                error!(error = %e, "challenge waiter failed");
            }
        }
    }

    /// Build the notification callback: gate and append under one lock.
    fn sample_callback(&self) -> SampleCallback {
        let session = Arc::clone(&self.session);
        let min_interval = self.config.min_sample_interval;
        Arc::new(move |value: u16| {
            let verdict = session.lock().ingest(value, Instant::now(), min_interval);
            match verdict {
                GateVerdict::Accept(target) => debug!(value, ?target, "sensor input"),
                GateVerdict::Drop(reason) => debug!(value, ?reason, "disregarding data point"),
            }
        })
    }
}
