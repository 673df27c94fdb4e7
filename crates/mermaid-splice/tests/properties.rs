//! Property tests for splicing and comment sanitization

use mermaid_splice::prelude::*;
use proptest::prelude::*;

// ===================
// Strategies
// ===================

/// Text that cannot contain a fence
fn prose_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,:#>\\-\n]{0,40}"
}

/// Diagram source without backticks
fn source_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 \\-><\\[\\]{}|\n]{0,40}"
}

fn rendered_only() -> SpliceConfig {
    SpliceConfig::default().rendered_only()
}

fn tag_renderer(source: &str) -> Result<String, RenderFailure> {
    Ok(format!("<<{}>>", source))
}

struct BrokenScanner;

impl BlockScanner for BrokenScanner {
    fn scan(&self, _document: &str) -> Result<Vec<DiagramBlock>, SpliceError> {
        Err(SpliceError::scan_error("simulated defect"))
    }
}

// ===================
// Property Test Functions
// ===================

fn check_no_blocks_is_identity(document: String) -> Result<(), TestCaseError> {
    let splicer = Splicer::new(FailingRenderer::silent());
    prop_assert_eq!(splicer.process(&document), document);
    Ok(())
}

fn check_blocks_replaced_in_order(
    lead: String,
    parts: Vec<(String, String)>,
) -> Result<(), TestCaseError> {
    let mut document = lead.clone();
    let mut expected = lead;
    for (source, trailing) in &parts {
        document.push_str(&format!("\n```mermaid\n{}\n```{}", source, trailing));
        expected.push_str(&format!("\n```\n<<{}>>\n```{}", source.trim(), trailing));
    }

    let splicer = Splicer::with_config(tag_renderer, rendered_only());
    let blocks = splicer.scan(&document).unwrap();
    prop_assert_eq!(blocks.len(), parts.len());
    prop_assert_eq!(splicer.process(&document), expected);
    Ok(())
}

fn check_sanitized_never_closes_comment(text: String) -> Result<(), TestCaseError> {
    let sanitized = sanitize_comment(&text);
    prop_assert!(!sanitized.contains("-->"));
    prop_assert!(!sanitized.contains('>'));
    Ok(())
}

fn check_sanitize_idempotent_on_clean_output(text: String) -> Result<(), TestCaseError> {
    let once = sanitize_comment(&text);
    if !once.contains("--") && !once.contains('>') {
        prop_assert_eq!(sanitize_comment(&once), once);
    }
    Ok(())
}

fn check_failure_comment_is_single(message: String) -> Result<(), TestCaseError> {
    let splicer = Splicer::new(FailingRenderer::new(message));
    let output = splicer.process("```mermaid\nA\n```");
    let (block, comment) = output.split_at("```mermaid\nA\n```\n".len());
    prop_assert_eq!(block, "```mermaid\nA\n```\n");
    prop_assert!(comment.starts_with("<!-- mermaid render failed: "));
    prop_assert!(comment.ends_with(" -->"));
    prop_assert_eq!(comment.matches("-->").count(), 1);
    Ok(())
}

fn check_degraded_keeps_original(document: String) -> Result<(), TestCaseError> {
    let splicer = Splicer::new(tag_renderer).with_scanner(BrokenScanner);
    let output = splicer.process(&document);
    prop_assert!(output.starts_with(&document));
    let appended = &output[document.len()..];
    prop_assert_eq!(
        appended,
        "\n\n<!-- mermaid-renderer: unexpected error - Scan error: simulated defect -->"
    );
    Ok(())
}

// ===================
// Proptest Wrappers
// ===================

proptest! {
    #[test]
    fn no_blocks_is_identity(document in prose_strategy()) {
        check_no_blocks_is_identity(document)?;
    }

    #[test]
    fn blocks_replaced_in_order(
        lead in prose_strategy(),
        parts in prop::collection::vec((source_strategy(), prose_strategy()), 0..5)
    ) {
        check_blocks_replaced_in_order(lead, parts)?;
    }

    #[test]
    fn sanitized_never_closes_comment(text in any::<String>()) {
        check_sanitized_never_closes_comment(text)?;
    }

    #[test]
    fn sanitize_idempotent_on_clean_output(text in any::<String>()) {
        check_sanitize_idempotent_on_clean_output(text)?;
    }

    #[test]
    fn failure_comment_is_single(message in any::<String>()) {
        check_failure_comment_is_single(message)?;
    }

    #[test]
    fn degraded_keeps_original(document in any::<String>()) {
        check_degraded_keeps_original(document)?;
    }
}
