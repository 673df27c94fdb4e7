//! Tests for the process-backed renderer
//!
//! These spawn standard unix tools in place of a real diagram renderer.

#![cfg(unix)]

use mermaid_splice::prelude::*;

fn sh(script: &str) -> CommandRenderer {
    CommandRenderer::new(CommandRendererConfig::new("sh").arg("-c").arg(script))
}

#[test]
fn test_stdout_becomes_rendering() {
    let renderer = CommandRenderer::new(CommandRendererConfig::new("cat"));
    assert_eq!(renderer.render("graph LR\n  A-->B").unwrap(), "graph LR\n  A-->B");
}

#[test]
fn test_nonzero_exit_reports_stderr() {
    let renderer = sh("cat >/dev/null; echo 'Error: Parse error: bad syntax' >&2; exit 1");
    let failure = renderer.render("graph ??").unwrap_err();
    assert_eq!(failure.message(), "Parse error: bad syntax");
}

#[test]
fn test_nonzero_exit_without_stderr() {
    let renderer = sh("exit 3");
    let failure = renderer.render("A").unwrap_err();
    assert!(failure.message().starts_with("sh exited with"));
}

#[test]
fn test_empty_output_is_a_failure() {
    let renderer = sh("cat >/dev/null");
    let failure = renderer.render("A").unwrap_err();
    assert_eq!(failure.message(), "sh produced no output");
}

#[test]
fn test_environment_is_passed_through() {
    let renderer = CommandRenderer::new(
        CommandRendererConfig::new("sh")
            .arg("-c")
            .arg("cat >/dev/null; printf '%s' \"$DIAGRAM_STYLE\"")
            .env("DIAGRAM_STYLE", "ascii"),
    );
    assert_eq!(renderer.render("A").unwrap(), "ascii");
}

#[test]
fn test_splicer_with_command_renderer() {
    let renderer = sh("tr 'a-z' 'A-Z'");
    let splicer = Splicer::with_config(renderer, SpliceConfig::default().rendered_only());
    let output = splicer.process("see\n```mermaid\ngraph td\n```\n```mermaid\nbroken\n```");
    assert_eq!(output, "see\n```\nGRAPH TD\n```\n```\nBROKEN\n```");
}

#[test]
fn test_splicer_with_missing_command() {
    let renderer = CommandRenderer::new(CommandRendererConfig::new(
        "mermaid-splice-missing-binary",
    ));
    let output = Splicer::new(renderer).process("```mermaid\nA\n```");
    assert!(output.starts_with("```mermaid\nA\n```\n<!-- mermaid render failed: "));
    assert!(output.contains("mermaid-splice-missing-binary"));
}
