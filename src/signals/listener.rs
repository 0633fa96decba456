// src/signals/listener.rs

//! OS signal sources feeding a [`SignalGuard`].
//!
//! Platform mapping:
//! - Windows: the five console control events, via `tokio::signal::windows`.
//! - Unix: SIGINT → interrupt, SIGQUIT → break, SIGHUP → close,
//!   SIGTERM → shutdown. There is no logoff equivalent.
//!
//! Subscribing replaces the default disposition of these signals, so after
//! the guard reports "not handled" the listener performs the default
//! termination itself by exiting with the conventional status.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::errors::{Result, TagrunError};
use crate::signals::{SignalGuard, SignalKind};

/// Set once the first signal starts the shutdown path.
static TERMINATING: AtomicBool = AtomicBool::new(false);

macro_rules! spawn_source {
    ($handle:expr, $guard:expr, $kind:expr, $exit_code:expr, $stream:expr) => {{
        let mut stream = $stream.map_err(|e| source_error($kind, e))?;
        let guard = $guard.clone();
        $handle.spawn(async move {
            while stream.recv().await.is_some() {
                deliver(&guard, $kind, $exit_code);
            }
        });
    }};
}

/// Subscribe to every platform signal source and route it to `guard`.
///
/// Requires a running tokio runtime.
pub fn install(guard: SignalGuard) -> Result<()> {
    let handle = Handle::try_current()
        .map_err(|e| TagrunError::Signal(format!("no tokio runtime available: {e}")))?;
    let _ctx = handle.enter();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind as Unix, signal};

        spawn_source!(handle, guard, SignalKind::Interrupt, 128 + 2, signal(Unix::interrupt()));
        spawn_source!(handle, guard, SignalKind::Break, 128 + 3, signal(Unix::quit()));
        spawn_source!(handle, guard, SignalKind::Close, 128 + 1, signal(Unix::hangup()));
        spawn_source!(handle, guard, SignalKind::Shutdown, 128 + 15, signal(Unix::terminate()));
    }

    #[cfg(windows)]
    {
        use tokio::signal::windows;

        // STATUS_CONTROL_C_EXIT
        const EXIT: i32 = 0xC000_013Au32 as i32;

        spawn_source!(handle, guard, SignalKind::Interrupt, EXIT, windows::ctrl_c());
        spawn_source!(handle, guard, SignalKind::Break, EXIT, windows::ctrl_break());
        spawn_source!(handle, guard, SignalKind::Close, EXIT, windows::ctrl_close());
        spawn_source!(handle, guard, SignalKind::Logoff, EXIT, windows::ctrl_logoff());
        spawn_source!(handle, guard, SignalKind::Shutdown, EXIT, windows::ctrl_shutdown());
    }

    Ok(())
}

fn deliver(guard: &SignalGuard, kind: SignalKind, exit_code: i32) {
    if TERMINATING.swap(true, Ordering::SeqCst) {
        debug!(signal = %kind, "already terminating; ignoring signal");
        return;
    }

    // The guard never reports a signal as handled, so default termination
    // always follows the cleanup.
    let _handled = guard.on_signal(kind);
    warn!(signal = %kind, exit_code, "terminating after console signal");
    std::process::exit(exit_code);
}

fn source_error(kind: SignalKind, err: std::io::Error) -> TagrunError {
    TagrunError::Signal(format!("subscribing to {kind} signal: {err}"))
}
