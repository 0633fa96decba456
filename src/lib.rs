// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod signals;
pub mod types;

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::cli::CliArgs;
use crate::config::loader::load_optional;
use crate::config::{ConfigFile, validate_tag};
use crate::errors::Result;
use crate::exec::{CommandRunner, ConsoleSink, Invocation, ShellSpec};
use crate::signals::SignalGuard;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + CLI overrides)
/// - the console signal guard
/// - a single `CommandRunner` run
///
/// Returns whether the command exited with status 0.
pub async fn run(args: CliArgs) -> Result<bool> {
    let cfg = load_optional(args.config.as_deref().map(Path::new))?;

    let shell = resolve_shell(&args, &cfg);
    let tag = resolve_tag(&args, &cfg);
    validate_tag(&tag)?;

    let invocation = Invocation::new(args.executable.clone(), args.argument_string(), tag);

    if args.dry_run {
        print_dry_run(&shell, &invocation);
        return Ok(true);
    }

    // Leave a trace when the run is interrupted; default termination follows.
    let guard = SignalGuard::new();
    {
        let tag = invocation.tag.clone();
        guard.register_cleanup(move || {
            warn!(tag = %tag, "interrupted; subprocess output may be incomplete");
        })?;
    }

    let runner = CommandRunner::new(shell, Arc::new(ConsoleSink));
    let outcome = runner.run_invocation(&invocation).await?;
    debug!(?outcome, "run finished");

    Ok(outcome.success())
}

/// CLI flag > config file > platform default.
fn resolve_shell(args: &CliArgs, cfg: &ConfigFile) -> ShellSpec {
    let kind = args.shell.or(cfg.runner.shell).unwrap_or_default();
    let spec = ShellSpec::new(kind);
    match &cfg.runner.shell_program {
        Some(program) => spec.with_program(program.clone()),
        None => spec,
    }
}

fn resolve_tag(args: &CliArgs, cfg: &ConfigFile) -> String {
    args.tag
        .clone()
        .or_else(|| cfg.runner.tag.clone())
        .unwrap_or_default()
}

fn print_dry_run(shell: &ShellSpec, invocation: &Invocation) {
    println!("tagrun dry-run");
    println!("  shell   = {} ({:?})", shell.program, shell.kind);
    println!("  tag     = {:?}", invocation.tag);
    println!(
        "  command = {} {} {}",
        shell.program,
        shell.kind.command_flag(),
        invocation.command_line(shell.kind)
    );
}
