// src/config/model.rs

use serde::Deserialize;

use crate::types::ShellKind;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [runner]
/// tag = "build"
/// shell = "sh"
/// shell_program = "bash"
/// ```
///
/// Every key is optional; command-line flags win over the file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub runner: RunnerSection,
}

/// `[runner]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerSection {
    /// Tag used when `--tag` is not given.
    pub tag: Option<String>,

    /// `"sh"` or `"cmd"`. Defaults to the platform's shell.
    pub shell: Option<ShellKind>,

    /// Binary to start instead of the shell's default (`sh` / `cmd`).
    pub shell_program: Option<String>,
}

/// Validated configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub runner: RunnerSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(runner: RunnerSection) -> Self {
        Self { runner }
    }
}
