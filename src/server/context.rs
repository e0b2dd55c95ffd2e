//! Server state shared with every session and handler.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::server::registry::RouteRegistry;

struct Inner {
    port: u16,
    registry: Arc<RouteRegistry>,
    started_at: Instant,
    active_sessions: AtomicUsize,
}

/// A cheap handle on the running server.
#[derive(Clone)]
pub struct ServerContext {
    inner: Arc<Inner>,
}

impl ServerContext {
    /// Create the context for a server bound to `port`.
    pub fn new(registry: Arc<RouteRegistry>, port: u16) -> Self {
        Self {
            inner: Arc::new(Inner {
                port,
                registry,
                started_at: Instant::now(),
                active_sessions: AtomicUsize::new(0),
            }),
        }
    }

    /// The TCP port the server is listening on.
    pub fn port(&self) -> u16 {
        self.inner.port
    }

    /// The route registry the server resolves against.
    pub fn registry(&self) -> &Arc<RouteRegistry> {
        &self.inner.registry
    }

    /// Time elapsed since the context was created.
    pub fn uptime(&self) -> Duration {
        self.inner.started_at.elapsed()
    }

    /// Number of connections currently being served.
    pub fn active_sessions(&self) -> usize {
        self.inner.active_sessions.load(Ordering::Relaxed)
    }

    /// Count a session as active until the returned guard is dropped.
    pub(crate) fn session_guard(&self) -> SessionGuard {
        self.inner.active_sessions.fetch_add(1, Ordering::Relaxed);
        SessionGuard { context: self.clone() }
    }
}

pub(crate) struct SessionGuard {
    context: ServerContext,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.context.inner.active_sessions.fetch_sub(1, Ordering::Relaxed);
    }
}
