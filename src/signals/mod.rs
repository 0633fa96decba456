// src/signals/mod.rs

//! Console signal handling.
//!
//! A [`SignalGuard`] holds at most one cleanup callback. When the OS delivers
//! a termination-class console signal, the callback runs synchronously and
//! the signal is reported as *not handled*, so the default termination still
//! happens afterwards.
//!
//! - [`guard`] owns the callback slot and the handler contract
//!   ([`SignalGuard::on_signal`]).
//! - [`listener`] subscribes to the platform's signal sources via
//!   `tokio::signal` and feeds them into the guard.
//!
//! The callback gets no timeout: on Windows the OS kills the process shortly
//! after a close, logoff or shutdown event whether or not cleanup finished.

pub mod guard;
pub mod listener;

pub use guard::{CleanupCallback, SignalGuard};

/// Termination-class console signals, numbered like Windows console control
/// events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Interrupt,
    Break,
    Close,
    Logoff,
    Shutdown,
}

impl SignalKind {
    pub const ALL: [SignalKind; 5] = [
        SignalKind::Interrupt,
        SignalKind::Break,
        SignalKind::Close,
        SignalKind::Logoff,
        SignalKind::Shutdown,
    ];

    /// Map a raw console control code. Unknown codes yield `None`.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(SignalKind::Interrupt),
            1 => Some(SignalKind::Break),
            2 => Some(SignalKind::Close),
            5 => Some(SignalKind::Logoff),
            6 => Some(SignalKind::Shutdown),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        match self {
            SignalKind::Interrupt => 0,
            SignalKind::Break => 1,
            SignalKind::Close => 2,
            SignalKind::Logoff => 5,
            SignalKind::Shutdown => 6,
        }
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SignalKind::Interrupt => "interrupt",
            SignalKind::Break => "break",
            SignalKind::Close => "close",
            SignalKind::Logoff => "logoff",
            SignalKind::Shutdown => "shutdown",
        };
        f.write_str(name)
    }
}
