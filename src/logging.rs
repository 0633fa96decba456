// src/logging.rs

//! Diagnostics for `tagrun` itself, via `tracing` + `tracing-subscriber`.
//!
//! Stdout belongs to the forwarded subprocess lines (`TAG>` / `TAG!>`), so
//! every diagnostic goes to stderr. The filter is chosen as:
//! 1. `--log-level` applies one level to everything;
//! 2. otherwise `TAGRUN_LOG` is read as `EnvFilter` directives, so both
//!    `debug` and `tagrun::exec=debug,tagrun::signals=trace` work;
//! 3. otherwise only warnings (cleanup on interrupt, failed readers) show.
//!
//! ANSI colours are only used when stderr is a terminal, so redirected logs
//! stay plain next to captured build output.

use std::io::IsTerminal;

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "TAGRUN_LOG";

/// Install the global subscriber. Call once, before the first run.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = build_filter(cli_level, std::env::var(LOG_ENV).ok().as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("installing tracing subscriber")?;

    Ok(())
}

fn build_filter(cli_level: Option<LogLevel>, env_directives: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::default().add_directive(level_filter(level).into());
    }

    env_directives
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::default().add_directive(LevelFilter::WARN.into()))
}

fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    }
}
