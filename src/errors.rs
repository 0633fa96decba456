// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TagrunError {
    /// The child process was never started (bad path, permission denied,
    /// missing shell). No output lines are emitted for such a run.
    #[error("failed to launch '{executable}': {reason}")]
    Launch { executable: String, reason: String },

    /// `run` was called while a previous subprocess is still owned by the
    /// same runner.
    #[error("a subprocess is already running (pid {pid}, tag '{tag}')")]
    AlreadyRunning { pid: u32, tag: String },

    #[error("waiting for subprocess failed: {source}")]
    Wait {
        #[source]
        source: std::io::Error,
    },

    #[error("Signal handling error: {0}")]
    Signal(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TagrunError {
    /// True for errors that mean no process was ever started.
    pub fn is_launch_error(&self) -> bool {
        matches!(self, TagrunError::Launch { .. })
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TagrunError>;
