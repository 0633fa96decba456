// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`invocation`] describes a single run and renders the shell command line
//!   (including executable quoting and pre-launch resolution).
//! - [`runner`] owns the [`CommandRunner`], which starts one subprocess at a
//!   time with `tokio::process::Command`, forwards its output and waits for it.
//! - [`sink`] provides the [`OutputSink`] trait that receives tagged output
//!   lines, and the [`ConsoleSink`] used in production. Tests can plug in
//!   their own sink to capture lines.

pub mod invocation;
pub mod runner;
pub mod sink;

pub use invocation::{Invocation, Resolved, ShellSpec, quote_executable, resolve_executable};
pub use runner::{CommandRunner, RunOutcome, RunningProcess};
pub use sink::{ConsoleSink, OutputSink};
