#![cfg(unix)]

mod common;
use crate::common::{init_tracing, sh_runner, with_timeout, write_script};

use tempfile::tempdir;

#[tokio::test]
async fn stdout_and_stderr_get_their_own_prefixes() {
    init_tracing();
    let (runner, sink) = sh_runner();

    let ok = with_timeout(runner.run(
        "sh",
        "-c 'echo out1; echo err1 >&2; echo out2; echo err2 >&2; exit 3'",
        "T",
    ))
    .await
    .unwrap();

    assert!(!ok);
    assert_eq!(sink.stream("T>"), vec!["out1", "out2"]);
    assert_eq!(sink.stream("T!>"), vec!["err1", "err2"]);
    assert_eq!(sink.lines().len(), 4);
}

#[tokio::test]
async fn every_line_arrives_once_and_in_order() {
    init_tracing();
    let (runner, sink) = sh_runner();

    let ok = with_timeout(runner.run("seq", "1 500", "N")).await.unwrap();

    assert!(ok);
    let expected: Vec<String> = (1..=500).map(|n| n.to_string()).collect();
    assert_eq!(sink.stream("N>"), expected);
    assert!(sink.stream("N!>").is_empty());
}

#[tokio::test]
async fn interleaved_streams_keep_intra_stream_order() {
    init_tracing();
    let (runner, sink) = sh_runner();

    let ok = with_timeout(runner.run(
        "sh",
        "-c 'i=0; while [ $i -lt 50 ]; do echo o$i; echo e$i >&2; i=$((i+1)); done'",
        "X",
    ))
    .await
    .unwrap();

    assert!(ok);
    let out: Vec<String> = (0..50).map(|i| format!("o{i}")).collect();
    let err: Vec<String> = (0..50).map(|i| format!("e{i}")).collect();
    assert_eq!(sink.stream("X>"), out);
    assert_eq!(sink.stream("X!>"), err);
}

#[tokio::test]
async fn crlf_endings_are_trimmed_and_bad_utf8_is_replaced() {
    init_tracing();
    let (runner, sink) = sh_runner();

    let ok = with_timeout(runner.run("printf", r"'a\r\nb\r\n\377\n'", "T"))
        .await
        .unwrap();

    assert!(ok);
    assert_eq!(sink.stream("T>"), vec!["a", "b", "\u{FFFD}"]);
}

#[tokio::test]
async fn final_line_without_newline_is_forwarded() {
    init_tracing();
    let (runner, sink) = sh_runner();

    let ok = with_timeout(runner.run("printf", "'no newline'", "T"))
        .await
        .unwrap();

    assert!(ok);
    assert_eq!(sink.lines(), vec!["T>no newline".to_string()]);
}

#[tokio::test]
async fn empty_tag_still_prefixes_markers() {
    init_tracing();
    let (runner, sink) = sh_runner();

    let ok = with_timeout(runner.run("sh", "-c 'echo a; echo b >&2'", ""))
        .await
        .unwrap();

    assert!(ok);
    let mut lines = sink.lines();
    lines.sort();
    assert_eq!(lines, vec!["!>b".to_string(), ">a".to_string()]);
}

#[tokio::test]
async fn executable_path_with_spaces_runs() {
    init_tracing();
    let dir = tempdir().unwrap();
    let tools = dir.path().join("my tools");
    std::fs::create_dir(&tools).unwrap();
    let script = write_script(&tools, "hello tool.sh", r#"echo "args:$@""#);

    let (runner, sink) = sh_runner();
    let ok = with_timeout(runner.run(script.to_str().unwrap(), "x y", "S"))
        .await
        .unwrap();

    assert!(ok);
    assert_eq!(sink.lines(), vec!["S>args:x y".to_string()]);
}

#[tokio::test]
async fn executable_path_with_single_quote_runs() {
    init_tracing();
    let dir = tempdir().unwrap();
    let script = write_script(dir.path(), "it's here.sh", "echo quoted; exit 0");

    let (runner, sink) = sh_runner();
    let ok = with_timeout(runner.run(script.to_str().unwrap(), "", "Q"))
        .await
        .unwrap();

    assert!(ok);
    assert_eq!(sink.lines(), vec!["Q>quoted".to_string()]);
}
