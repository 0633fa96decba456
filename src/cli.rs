// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::ShellKind;

/// Command-line arguments for `tagrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tagrun",
    version,
    about = "Run a command through the shell and mirror its output with a tag prefix.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Tagrun.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Label prefixed to every forwarded output line (`TAG>` / `TAG!>`).
    #[arg(long, short = 't', value_name = "TAG")]
    pub tag: Option<String>,

    /// Shell flavour used to run the command (sh, cmd).
    #[arg(long, value_name = "SHELL")]
    pub shell: Option<ShellKind>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TAGRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the shell command line instead of running it.
    #[arg(long)]
    pub dry_run: bool,

    /// Executable to run (path or command name).
    #[arg(value_name = "EXECUTABLE")]
    pub executable: String,

    /// Arguments, joined with spaces and passed to the shell as-is.
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl CliArgs {
    /// The argument string handed to the shell after the executable.
    pub fn argument_string(&self) -> String {
        self.args.join(" ")
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
