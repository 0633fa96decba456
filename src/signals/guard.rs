// src/signals/guard.rs

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, error, info};

use crate::errors::Result;
use crate::signals::{SignalKind, listener};

/// Best-effort cleanup run when a termination signal arrives.
pub type CleanupCallback = Arc<dyn Fn() + Send + Sync + 'static>;

/// Process-wide cleanup registration.
///
/// Cloning is cheap; all clones share the same callback slot. The host
/// application builds one guard at startup and passes it to whatever needs
/// to register cleanup.
#[derive(Clone, Default)]
pub struct SignalGuard {
    inner: Arc<GuardInner>,
}

#[derive(Default)]
struct GuardInner {
    cleanup: Mutex<Option<CleanupCallback>>,
    installed: AtomicBool,
}

impl SignalGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` and make sure the OS listener is running.
    ///
    /// Replaces any earlier callback. The listener is installed on the first
    /// successful call only; later calls just swap the callback. Must be
    /// called from within a tokio runtime.
    pub fn register_cleanup<F>(&self, callback: F) -> Result<()>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.set_cleanup(callback);

        if self.inner.installed.swap(true, Ordering::SeqCst) {
            debug!("signal listener already installed; cleanup callback replaced");
            return Ok(());
        }

        if let Err(err) = listener::install(self.clone()) {
            self.inner.installed.store(false, Ordering::SeqCst);
            return Err(err);
        }

        info!("console signal listener installed");
        Ok(())
    }

    /// Replace the callback without touching the OS listener.
    pub fn set_cleanup<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut slot = self.inner.cleanup.lock().unwrap_or_else(|p| p.into_inner());
        *slot = Some(Arc::new(callback));
    }

    pub fn has_cleanup(&self) -> bool {
        self.inner
            .cleanup
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .is_some()
    }

    pub fn is_installed(&self) -> bool {
        self.inner.installed.load(Ordering::SeqCst)
    }

    /// Handle one delivered signal.
    ///
    /// Runs the registered callback (if any) to completion on the calling
    /// thread. A panic escaping the callback is caught and logged. Always
    /// returns `false`: the signal is never considered handled here, so the
    /// default termination proceeds.
    pub fn on_signal(&self, kind: SignalKind) -> bool {
        // Clone out of the slot so the callback may re-register without
        // deadlocking.
        let callback = self
            .inner
            .cleanup
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();

        match callback {
            Some(cleanup) => {
                info!(signal = %kind, "running cleanup callback");
                if catch_unwind(AssertUnwindSafe(|| cleanup())).is_err() {
                    error!(signal = %kind, "cleanup callback panicked");
                }
            }
            None => debug!(signal = %kind, "no cleanup callback registered"),
        }

        false
    }

    /// Handle a raw console control code. Unknown codes are ignored.
    pub fn handle_raw(&self, code: u32) -> bool {
        match SignalKind::from_code(code) {
            Some(kind) => self.on_signal(kind),
            None => {
                debug!(code, "ignoring unrecognised console control code");
                false
            }
        }
    }
}

impl std::fmt::Debug for SignalGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalGuard")
            .field("has_cleanup", &self.has_cleanup())
            .field("installed", &self.is_installed())
            .finish()
    }
}
