// src/exec/sink.rs

//! Destinations for forwarded subprocess output.
//!
//! The stdout and stderr readers run as independent tasks and may call
//! [`OutputSink::emit`] at the same time. Implementations must write each
//! line atomically; ordering is only guaranteed within one stream.

use std::io::Write;

use tracing::debug;

/// Receives already-tagged output lines.
pub trait OutputSink: Send + Sync {
    fn emit(&self, line: &str);
}

/// Writes every line to the process's standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn emit(&self, line: &str) {
        // The stdout lock keeps lines from the two readers from interleaving.
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{line}").and_then(|_| out.flush()) {
            debug!(error = %e, "dropping output line; stdout is not writable");
        }
    }
}
