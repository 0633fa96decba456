// src/exec/invocation.rs

//! What to run and how the shell sees it.
//!
//! An [`Invocation`] is built per call and never persisted. Rendering it into
//! a shell command line wraps the executable in quotes so that a path with
//! spaces stays a single token; the argument string is appended untouched so
//! shell operators in it keep their meaning.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::errors::{Result, TagrunError};
use crate::types::ShellKind;

/// The shell a command line is handed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellSpec {
    pub kind: ShellKind,
    /// Binary to start (`sh`, `bash`, `cmd`, ...).
    pub program: String,
}

impl ShellSpec {
    pub fn new(kind: ShellKind) -> Self {
        Self {
            kind,
            program: kind.default_program().to_string(),
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

impl Default for ShellSpec {
    fn default() -> Self {
        ShellSpec::new(ShellKind::platform_default())
    }
}

/// One requested subprocess run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub executable: String,
    /// Shell-tokenized argument string; may be empty.
    pub arguments: String,
    /// Prefix for forwarded output lines; may be empty.
    pub tag: String,
}

impl Invocation {
    pub fn new(
        executable: impl Into<String>,
        arguments: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            executable: executable.into(),
            arguments: arguments.into(),
            tag: tag.into(),
        }
    }

    /// Full command line handed to the shell after its command flag.
    pub fn command_line(&self, shell: ShellKind) -> String {
        let mut line = quote_executable(&self.executable, shell);
        if !self.arguments.is_empty() {
            line.push(' ');
            line.push_str(&self.arguments);
        }
        line
    }

    /// Line prefix for standard output.
    pub fn stdout_prefix(&self) -> String {
        format!("{}>", self.tag)
    }

    /// Line prefix for standard error.
    pub fn stderr_prefix(&self) -> String {
        format!("{}!>", self.tag)
    }
}

/// Quote an executable path so the shell treats it as one token.
///
/// `cmd` strips the outermost pair of quotes from a `/C` command line, so the
/// path is wrapped in doubled quotes (`""C:\Program Files\tool.exe""`). POSIX
/// shells get single quotes with embedded single quotes escaped as `'\''`.
pub fn quote_executable(executable: &str, shell: ShellKind) -> String {
    match shell {
        ShellKind::Cmd => format!("\"\"{executable}\"\""),
        ShellKind::Sh => format!("'{}'", executable.replace('\'', r"'\''")),
    }
}

/// How an executable was found before launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Provided by the shell itself.
    Builtin,
    /// A file on disk, either given directly or found on `PATH`.
    File(PathBuf),
}

/// Make sure the executable can be started before a shell is spawned.
///
/// Going through a shell would otherwise turn a missing binary into an
/// ordinary non-zero exit with a "not found" line on stderr, and callers
/// could not tell "never started" apart from "ran and failed".
///
/// Bare names are looked up by the configured shell itself when it is
/// POSIX-flavoured (`command -v`), so every builtin that shell knows is
/// accepted. `cmd` has no such query; it gets a builtin list and a `PATH`
/// lookup instead, which is also the fallback when the shell cannot start.
pub async fn resolve_executable(executable: &str, shell: &ShellSpec) -> Result<Resolved> {
    if executable.trim().is_empty() {
        return Err(launch_error(executable, "executable is empty"));
    }

    if has_path_separator(executable) {
        let path = Path::new(executable);
        if !path.is_file() {
            return Err(launch_error(executable, "no such file"));
        }
        if !is_executable(path) {
            return Err(launch_error(executable, "permission denied"));
        }
        debug!(executable, "using executable path as given");
        return Ok(Resolved::File(path.to_path_buf()));
    }

    if shell.kind == ShellKind::Sh {
        match query_posix_shell(executable, &shell.program).await {
            Ok(Some(resolved)) => return Ok(resolved),
            Ok(None) => {
                return Err(launch_error(
                    executable,
                    &format!("not found by '{}'", shell.program),
                ));
            }
            Err(e) => {
                debug!(
                    executable,
                    shell = %shell.program,
                    error = %e,
                    "shell lookup unavailable; falling back to builtin list and PATH"
                );
            }
        }
    }

    if shell.kind.is_builtin(executable) {
        debug!(executable, shell = ?shell.kind, "executable is a shell builtin");
        return Ok(Resolved::Builtin);
    }

    match which::which(executable) {
        Ok(path) => {
            debug!(executable, path = %path.display(), "resolved executable on PATH");
            Ok(Resolved::File(path))
        }
        Err(err) => Err(launch_error(executable, &err.to_string())),
    }
}

/// Ask `program -c 'command -v "$1"'` what `name` is.
///
/// `Ok(None)` means the shell ran and does not know the name; `Err` means the
/// shell itself could not be started.
async fn query_posix_shell(name: &str, program: &str) -> std::io::Result<Option<Resolved>> {
    let output = Command::new(program)
        .args(["-c", r#"command -v "$1""#, "tagrun-resolve", name])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .await?;

    if !output.status.success() {
        return Ok(None);
    }

    let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if found.starts_with('/') {
        debug!(executable = name, path = %found, "shell resolved executable to a file");
        Ok(Some(Resolved::File(PathBuf::from(found))))
    } else {
        debug!(executable = name, shell = %program, "shell reports a builtin");
        Ok(Some(Resolved::Builtin))
    }
}

fn launch_error(executable: &str, reason: &str) -> TagrunError {
    TagrunError::Launch {
        executable: executable.to_string(),
        reason: reason.to_string(),
    }
}

fn has_path_separator(executable: &str) -> bool {
    executable.contains('/') || (cfg!(windows) && executable.contains('\\'))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cmd_quoting_doubles_the_quotes() {
        let inv = Invocation::new(r"C:\Program Files\tool.exe", "--fast", "T");
        assert_eq!(
            inv.command_line(ShellKind::Cmd),
            r#"""C:\Program Files\tool.exe"" --fast"#
        );
    }

    #[test]
    fn sh_quoting_escapes_single_quotes() {
        assert_eq!(quote_executable("/opt/my tool", ShellKind::Sh), "'/opt/my tool'");
        assert_eq!(quote_executable("it's", ShellKind::Sh), r"'it'\''s'");
    }

    #[test]
    fn empty_arguments_add_no_trailing_space() {
        let inv = Invocation::new("echo", "", "T");
        assert_eq!(inv.command_line(ShellKind::Sh), "'echo'");
    }

    #[test]
    fn arguments_are_passed_through_verbatim() {
        let inv = Invocation::new("echo", "a && echo 'b c'", "T");
        assert_eq!(inv.command_line(ShellKind::Sh), "'echo' a && echo 'b c'");
    }

    #[test]
    fn prefixes_follow_the_tag() {
        let inv = Invocation::new("echo", "", "build");
        assert_eq!(inv.stdout_prefix(), "build>");
        assert_eq!(inv.stderr_prefix(), "build!>");

        let untagged = Invocation::new("echo", "", "");
        assert_eq!(untagged.stdout_prefix(), ">");
        assert_eq!(untagged.stderr_prefix(), "!>");
    }

    #[tokio::test]
    async fn empty_executable_is_a_launch_error() {
        let err = resolve_executable("  ", &ShellSpec::new(ShellKind::Sh))
            .await
            .unwrap_err();
        assert!(err.is_launch_error());
    }

    #[tokio::test]
    async fn unknown_binary_is_a_launch_error() {
        let err = resolve_executable("nonexistent-binary-xyz", &ShellSpec::default())
            .await
            .unwrap_err();
        match err {
            TagrunError::Launch { executable, .. } => {
                assert_eq!(executable, "nonexistent-binary-xyz")
            }
            other => panic!("expected Launch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_path_is_a_launch_error() {
        let err = resolve_executable("/definitely/not/here/tool", &ShellSpec::new(ShellKind::Sh))
            .await
            .unwrap_err();
        assert!(err.is_launch_error());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn shell_reports_builtins_missing_from_the_list() {
        for name in ["exit", "umask", "eval", "exec", "getopts"] {
            assert_eq!(
                resolve_executable(name, &ShellSpec::new(ShellKind::Sh))
                    .await
                    .unwrap(),
                Resolved::Builtin,
                "{name}"
            );
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn shell_resolves_binaries_to_paths() {
        let resolved = resolve_executable("ls", &ShellSpec::new(ShellKind::Sh))
            .await
            .unwrap();
        assert!(matches!(resolved, Resolved::File(p) if p.is_absolute()));
    }

    #[tokio::test]
    async fn unstartable_shell_falls_back_to_builtin_list() {
        let shell = ShellSpec::new(ShellKind::Sh).with_program("/nonexistent/shell-xyz");
        assert_eq!(
            resolve_executable("echo", &shell).await.unwrap(),
            Resolved::Builtin
        );
    }
}
