//! End-to-end tests for the mermaid-splice binary
//!
//! Uses `cat` and `sh` as stand-in renderers, so these only run on unix.

#![cfg(unix)]

use std::io::Write;
use std::process::{Command, Output, Stdio};

/// Run the CLI with `args`, feeding `stdin`
fn run_cli(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_mermaid-splice"))
        .args(["--log-level", "off"])
        .args(args)
        .env_remove("MERMAID_SPLICE_RENDERER")
        .env_remove("MERMAID_SPLICE_LOG_LEVEL")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn mermaid-splice");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn test_process_stdin_to_stdout() {
    let output = run_cli(
        &["process", "--renderer", "cat", "--source", "omitted"],
        "intro\n```mermaid\ngraph LR\n```\noutro\n",
    );
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "intro\n```\ngraph LR\n```\noutro\n"
    );
}

#[test]
fn test_process_keeps_source_by_default() {
    let output = run_cli(&["process", "--renderer", "cat"], "```mermaid\nA\n```");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("```\nA\n```\n\n<details>"));
    assert!(stdout.ends_with("```mermaid\nA\n```\n\n</details>"));
}

#[test]
fn test_process_with_failing_renderer() {
    let output = run_cli(
        &["process", "--renderer", "false"],
        "```mermaid\ngraph ??\n```",
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("```mermaid\ngraph ??\n```\n<!-- mermaid render failed: false exited with"));
}

#[test]
fn test_process_without_blocks_is_byte_identical() {
    let document = "no diagrams\n\n```rust\nfn main() {}\n```";
    let output = run_cli(&["process", "--renderer", "false"], document);
    assert_eq!(String::from_utf8_lossy(&output.stdout), document);
}

#[test]
fn test_hook_event() {
    let event = r#"{"input":{"sessionID":"s","messageID":"m","partID":"p"},"output":{"text":"```mermaid\nA\n```"}}"#;
    let output = run_cli(&["hook", "--renderer", "cat", "--source", "omitted"], event);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["text"], "```\nA\n```");
}

#[test]
fn test_hook_rejects_malformed_event() {
    let output = run_cli(&["hook", "--renderer", "cat"], "not json");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid hook event"));
}

#[test]
fn test_scan_json() {
    let output = run_cli(&["scan", "--json"], "x\n```mermaid\nA\n```\n```mermaid\nB\n```");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let blocks = value.as_array().unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0]["line"], 2);
    assert_eq!(blocks[1]["source"], "B");
}
