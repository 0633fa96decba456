use std::str::FromStr;
use serde::Deserialize;

/// Flavour of shell used to interpret the command line.
///
/// - `Sh`: POSIX shell, invoked as `<program> -c <command line>`.
/// - `Cmd`: Windows `cmd.exe`, invoked as `<program> /C <command line>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShellKind {
    Sh,
    Cmd,
}

impl ShellKind {
    /// Shell used when neither the CLI nor the config file picks one.
    pub fn platform_default() -> Self {
        if cfg!(windows) {
            ShellKind::Cmd
        } else {
            ShellKind::Sh
        }
    }

    /// Default binary for this shell flavour.
    pub fn default_program(self) -> &'static str {
        match self {
            ShellKind::Sh => "sh",
            ShellKind::Cmd => "cmd",
        }
    }

    /// Flag that makes the shell run a single command string and exit.
    pub fn command_flag(self) -> &'static str {
        match self {
            ShellKind::Sh => "-c",
            ShellKind::Cmd => "/C",
        }
    }

    /// Commands the shell provides itself, which therefore need not be
    /// found on `PATH`.
    pub fn builtins(self) -> &'static [&'static str] {
        match self {
            // POSIX special builtins plus the regular ones every sh ships.
            ShellKind::Sh => &[
                ":", ".", "alias", "break", "cd", "command", "continue", "echo", "eval",
                "exec", "exit", "export", "false", "getopts", "hash", "printf", "pwd", "read",
                "readonly", "return", "set", "shift", "test", "times", "trap", "true", "type",
                "ulimit", "umask", "unalias", "unset", "wait",
            ],
            ShellKind::Cmd => &[
                "assoc", "break", "call", "cd", "chdir", "cls", "color", "copy", "date", "del",
                "dir", "echo", "endlocal", "erase", "exit", "for", "ftype", "goto", "if",
                "md", "mkdir", "mklink", "move", "path", "pause", "popd", "prompt", "pushd",
                "rd", "rem", "ren", "rename", "rmdir", "set", "setlocal", "shift", "start",
                "time", "title", "type", "ver", "verify", "vol",
            ],
        }
    }

    pub fn is_builtin(self, name: &str) -> bool {
        match self {
            ShellKind::Sh => self.builtins().contains(&name),
            ShellKind::Cmd => self
                .builtins()
                .iter()
                .any(|b| b.eq_ignore_ascii_case(name)),
        }
    }
}

impl Default for ShellKind {
    fn default() -> Self {
        ShellKind::platform_default()
    }
}

impl FromStr for ShellKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sh" => Ok(ShellKind::Sh),
            "cmd" => Ok(ShellKind::Cmd),
            other => Err(format!(
                "invalid shell: {other} (expected \"sh\" or \"cmd\")"
            )),
        }
    }
}
