// src/exec/runner.rs

//! Run one subprocess through a shell, forward its output, wait for it.

use std::process::Stdio;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::{Result, TagrunError};
use crate::exec::invocation::{Invocation, ShellSpec, resolve_executable};
use crate::exec::sink::OutputSink;

/// The subprocess a runner currently owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningProcess {
    pub pid: u32,
    pub tag: String,
}

/// Result of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub pid: u32,
    /// `None` when the child was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Launches commands through a shell, one at a time.
///
/// The runner is not reentrant: while a run is in flight, another call on the
/// same runner fails with [`TagrunError::AlreadyRunning`] instead of replacing
/// the tracked process.
pub struct CommandRunner {
    shell: ShellSpec,
    sink: Arc<dyn OutputSink>,
    running: Mutex<Option<RunningProcess>>,
}

impl CommandRunner {
    pub fn new(shell: ShellSpec, sink: Arc<dyn OutputSink>) -> Self {
        Self {
            shell,
            sink,
            running: Mutex::new(None),
        }
    }

    pub fn shell(&self) -> &ShellSpec {
        &self.shell
    }

    /// The subprocess currently owned by this runner, if any.
    pub fn running(&self) -> Option<RunningProcess> {
        self.slot().clone()
    }

    /// Run `executable arguments` and report whether it exited with status 0.
    pub async fn run(&self, executable: &str, arguments: &str, tag: &str) -> Result<bool> {
        let outcome = self
            .run_invocation(&Invocation::new(executable, arguments, tag))
            .await?;
        Ok(outcome.success())
    }

    /// Like [`run`](Self::run) but keeps the exit code.
    pub async fn run_invocation(&self, invocation: &Invocation) -> Result<RunOutcome> {
        self.ensure_idle()?;
        resolve_executable(&invocation.executable, &self.shell).await?;

        let command_line = invocation.command_line(self.shell.kind);
        let mut cmd = self.shell_command(&command_line);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Spawn while holding the slot so two callers cannot both start.
        let (mut child, _release) = {
            let mut slot = self.slot();
            if let Some(existing) = slot.as_ref() {
                return Err(already_running(existing));
            }

            let child = cmd.spawn().map_err(|e| TagrunError::Launch {
                executable: invocation.executable.clone(),
                reason: format!("spawning shell '{}': {e}", self.shell.program),
            })?;

            *slot = Some(RunningProcess {
                pid: child.id().unwrap_or_default(),
                tag: invocation.tag.clone(),
            });
            (child, SlotRelease { runner: self })
        };

        let pid = child.id().unwrap_or_default();
        info!(
            tag = %invocation.tag,
            pid,
            shell = %self.shell.program,
            command = %command_line,
            "started subprocess"
        );

        let readers = [
            child
                .stdout
                .take()
                .map(|out| forward_lines(out, invocation.stdout_prefix(), self.sink.clone())),
            child
                .stderr
                .take()
                .map(|err| forward_lines(err, invocation.stderr_prefix(), self.sink.clone())),
        ];

        let status = child
            .wait()
            .await
            .map_err(|source| TagrunError::Wait { source })?;

        // The pipes close when the child exits; drain what is left so every
        // line is emitted before we return.
        for reader in readers.into_iter().flatten() {
            if let Err(e) = reader.await {
                warn!(tag = %invocation.tag, pid, error = %e, "output reader task failed");
            }
        }

        let outcome = RunOutcome {
            pid,
            exit_code: status.code(),
        };

        info!(
            tag = %invocation.tag,
            pid,
            exit_code = ?outcome.exit_code,
            success = outcome.success(),
            "subprocess exited"
        );

        Ok(outcome)
    }

    fn shell_command(&self, command_line: &str) -> Command {
        let mut cmd = Command::new(&self.shell.program);
        cmd.arg(self.shell.kind.command_flag());

        // cmd.exe does its own quote parsing; hand it the line untouched.
        #[cfg(windows)]
        if self.shell.kind == crate::types::ShellKind::Cmd {
            cmd.raw_arg(command_line);
            return cmd;
        }

        cmd.arg(command_line);
        cmd
    }

    /// Fail fast when busy, before any lookup work. The slot is checked
    /// again when it is claimed.
    fn ensure_idle(&self) -> Result<()> {
        match self.slot().as_ref() {
            Some(existing) => Err(already_running(existing)),
            None => Ok(()),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<RunningProcess>> {
        self.running.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn already_running(existing: &RunningProcess) -> TagrunError {
    TagrunError::AlreadyRunning {
        pid: existing.pid,
        tag: existing.tag.clone(),
    }
}

/// Clears the runner's slot when a run ends, however it ends.
struct SlotRelease<'a> {
    runner: &'a CommandRunner,
}

impl Drop for SlotRelease<'_> {
    fn drop(&mut self) {
        if let Some(released) = self.runner.slot().take() {
            debug!(pid = released.pid, tag = %released.tag, "released subprocess handle");
        }
    }
}

/// Read `reader` line by line and emit `prefix + line` for each line.
fn forward_lines<R>(reader: R, prefix: String, sink: Arc<dyn OutputSink>) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(trim_line_ending(&buf));
                    sink.emit(&format!("{prefix}{line}"));
                }
                Err(e) => {
                    debug!(prefix = %prefix, error = %e, "stopped reading subprocess output");
                    break;
                }
            }
        }
    })
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_lf_and_crlf() {
        assert_eq!(trim_line_ending(b"abc\n"), b"abc");
        assert_eq!(trim_line_ending(b"abc\r\n"), b"abc");
        assert_eq!(trim_line_ending(b"abc"), b"abc");
        assert_eq!(trim_line_ending(b"\n"), b"");
    }

    #[test]
    fn outcome_success_requires_exit_code_zero() {
        assert!(RunOutcome { pid: 1, exit_code: Some(0) }.success());
        assert!(!RunOutcome { pid: 1, exit_code: Some(1) }.success());
        assert!(!RunOutcome { pid: 1, exit_code: None }.success());
    }
}
