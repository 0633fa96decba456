#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tagrun::exec::{CommandRunner, ShellSpec};
use tagrun::types::ShellKind;
use tagrun_test_utils::MemorySink;

pub use tagrun_test_utils::{init_tracing, with_timeout};

/// A runner using `sh` that records output into the returned sink.
pub fn sh_runner() -> (CommandRunner, MemorySink) {
    let sink = MemorySink::new();
    let runner = CommandRunner::new(ShellSpec::new(ShellKind::Sh), Arc::new(sink.clone()));
    (runner, sink)
}

/// Write an executable shell script and return its path.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
