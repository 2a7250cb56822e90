//! Application state for the control surface.

use std::sync::Arc;

use hrm_session::SessionManager;
use hrm_transport::SensorTransport;

/// Shared state handed to every handler.
///
/// Cloned per request; all clones drive the same session manager.
pub struct AppState<T: SensorTransport> {
    manager: Arc<SessionManager<T>>,
}

impl<T: SensorTransport> AppState<T> {
    /// Wrap a session manager for the router.
    pub fn new(manager: SessionManager<T>) -> Self {
        Self {
            manager: Arc::new(manager),
        }
    }

    /// The shared session manager.
    pub fn manager(&self) -> &SessionManager<T> {
        &self.manager
    }
}

impl<T: SensorTransport> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            manager: Arc::clone(&self.manager),
        }
    }
}

impl<T: SensorTransport> std::fmt::Debug for AppState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
