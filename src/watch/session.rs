// src/watch/session.rs

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::oneshot;
use tracing::debug;

use crate::errors::WatchClosedError;
use crate::watch::watcher::WatcherHandle;

/// Observable state of a watch session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Watchers may still fire; the invalidation signal is unsettled.
    Active,
    /// A watcher reported a matching change; the signal resolved. Terminal.
    Invalidated,
    /// `cancel()` won the race; the signal rejected. Terminal.
    Closed,
}

enum SessionState {
    Active {
        signal: oneshot::Sender<Result<(), WatchClosedError>>,
        watchers: Vec<WatcherHandle>,
    },
    Invalidated,
    Closed,
}

/// Shared handle into a session's state, cloned into every watcher spawned
/// during the pass.
///
/// All transitions are serialized on an internal mutex, so `invalidate()`
/// racing `cancel()` is safe: whichever locks first settles the signal and
/// the other becomes a no-op.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<SessionState>>,
}

impl SessionHandle {
    pub fn status(&self) -> SessionStatus {
        let state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        match *state {
            SessionState::Active { .. } => SessionStatus::Active,
            SessionState::Invalidated => SessionStatus::Invalidated,
            SessionState::Closed => SessionStatus::Closed,
        }
    }

    /// Take ownership of a watcher for the rest of the session.
    ///
    /// If the session already reached a terminal state the handle is dropped
    /// immediately, which stops the watcher.
    pub fn register(&self, watcher: WatcherHandle) {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if let SessionState::Active { watchers, .. } = &mut *state {
            watchers.push(watcher);
        }
    }

    /// `Active → Invalidated`: resolve the invalidation signal and close all
    /// owned watchers. No-op from a terminal state.
    pub fn invalidate(&self) {
        self.settle(SessionStatus::Invalidated);
    }

    /// `Active → Closed`: reject the invalidation signal with
    /// [`WatchClosedError`] and close all owned watchers. No-op from a
    /// terminal state or after the signal already settled.
    pub fn cancel(&self) {
        self.settle(SessionStatus::Closed);
    }

    fn settle(&self, next: SessionStatus) {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if !matches!(*state, SessionState::Active { .. }) {
            return;
        }
        let replacement = match next {
            SessionStatus::Invalidated => SessionState::Invalidated,
            _ => SessionState::Closed,
        };
        if let SessionState::Active { signal, watchers } = std::mem::replace(&mut *state, replacement)
        {
            // Dropping the handles closes the underlying notify watchers.
            let count = watchers.len();
            drop(watchers);
            let outcome = match next {
                SessionStatus::Invalidated => Ok(()),
                _ => Err(WatchClosedError),
            };
            // The receiver may already be gone; that is fine.
            let _ = signal.send(outcome);
            debug!(?next, watchers = count, "watch session settled");
        }
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("status", &self.status())
            .finish()
    }
}

/// Owner of the watchers and the invalidation signal for one watch-mode
/// resolution pass.
///
/// One-to-one with a pass, never shared across passes. The orchestrator must
/// close a session (via [`WatchSession::cancel`] or by dropping it) before
/// starting the next watch pass; the resolver does not do this on its own.
pub struct WatchSession {
    handle: SessionHandle,
    signal: Option<oneshot::Receiver<Result<(), WatchClosedError>>>,
}

impl WatchSession {
    pub fn new() -> Self {
        let (tx, rx) = oneshot::channel();
        Self {
            handle: SessionHandle {
                inner: Arc::new(Mutex::new(SessionState::Active {
                    signal: tx,
                    watchers: Vec::new(),
                })),
            },
            signal: Some(rx),
        }
    }

    /// Handle for watchers spawned during this pass.
    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.handle.status()
    }

    /// Close the session. Idempotent; a no-op after invalidation.
    pub fn cancel(&self) {
        self.handle.cancel();
    }

    /// Wait for the invalidation signal.
    ///
    /// Resolves `Ok(())` on the first matching file addition or removal and
    /// `Err(WatchClosedError)` if the session was cancelled first. The future
    /// is cancellation safe: dropping it mid-wait (e.g. losing a `select!`
    /// race) leaves the signal armed for the next call. Once the signal has
    /// settled, further calls report the terminal state.
    pub async fn invalidated(&mut self) -> Result<(), WatchClosedError> {
        match self.signal.as_mut() {
            Some(signal) => {
                // Await by reference so the receiver survives if this future
                // is dropped before the signal settles.
                let outcome = signal.await.unwrap_or(Err(WatchClosedError));
                self.signal = None;
                outcome
            }
            None => match self.handle.status() {
                SessionStatus::Invalidated => Ok(()),
                _ => Err(WatchClosedError),
            },
        }
    }
}

impl Default for WatchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for WatchSession {
    fn drop(&mut self) {
        // Dropping an active session closes its watchers.
        self.handle.cancel();
    }
}

impl std::fmt::Debug for WatchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchSession")
            .field("status", &self.status())
            .finish()
    }
}
