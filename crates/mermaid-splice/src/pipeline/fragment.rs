//! Per-block rendering and fragment formatting
//!
//! Each block ends in exactly one of two states, rendered or failed. Both
//! produce a fenced fragment that still carries the diagram source.

use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, span, warn, Level};

use crate::core::{
    diagnostic_comment, panic_message, DiagramRenderer, RenderFailure, SourceSection,
    SpliceConfig, FENCE,
};

/// Prefix of the comment appended to a block that failed to render
pub const RENDER_FAILED_PREFIX: &str = "mermaid render failed: ";

/// Result of rendering one block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockOutcome {
    /// The renderer produced text for the block
    Rendered { rendered: String, source: String },
    /// The renderer failed or panicked
    Failed { source: String, message: String },
}

impl BlockOutcome {
    /// The trimmed diagram source, kept on both paths
    pub fn source(&self) -> &str {
        match self {
            BlockOutcome::Rendered { source, .. } | BlockOutcome::Failed { source, .. } => source,
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, BlockOutcome::Rendered { .. })
    }

    /// Format the replacement text for the block
    pub fn to_fragment(&self, config: &SpliceConfig) -> String {
        match self {
            BlockOutcome::Rendered { rendered, source } => {
                let rendered_block = format!("{FENCE}\n{rendered}\n{FENCE}");
                match config.source_section {
                    SourceSection::Omitted => rendered_block,
                    SourceSection::Collapsible => format!(
                        "{}\n\n<details>\n<summary>{}</summary>\n\n{}\n\n</details>",
                        rendered_block,
                        config.summary_label,
                        source_block(&config.fence_tag, source)
                    ),
                }
            }
            BlockOutcome::Failed { source, message } => format!(
                "{}\n{}",
                source_block(&config.fence_tag, source),
                diagnostic_comment(RENDER_FAILED_PREFIX, message)
            ),
        }
    }
}

/// Re-wrap a source in its tagged fence
fn source_block(tag: &str, source: &str) -> String {
    format!("{FENCE}{tag}\n{source}\n{FENCE}")
}

/// Render one trimmed source, containing any failure or panic
pub fn render_block<R>(renderer: &R, source: &str) -> BlockOutcome
where
    R: DiagramRenderer + ?Sized,
{
    let block_span = span!(Level::DEBUG, "render_block", source_len = source.len());
    let _enter = block_span.enter();

    match panic::catch_unwind(AssertUnwindSafe(|| renderer.render(source))) {
        Ok(Ok(rendered)) => {
            debug!(renderer = renderer.name(), output_len = rendered.len(), "Block rendered");
            BlockOutcome::Rendered {
                rendered,
                source: source.to_string(),
            }
        }
        Ok(Err(failure)) => {
            warn!(renderer = renderer.name(), error = %failure, "Block failed to render");
            BlockOutcome::Failed {
                source: source.to_string(),
                message: failure.message().to_string(),
            }
        }
        Err(payload) => {
            let failure = RenderFailure::new(panic_message(payload.as_ref()));
            warn!(renderer = renderer.name(), error = %failure, "Renderer panicked");
            BlockOutcome::Failed {
                source: source.to_string(),
                message: failure.message().to_string(),
            }
        }
    }
}

/// Render one trimmed source straight to its replacement text
pub fn render_fragment<R>(renderer: &R, source: &str, config: &SpliceConfig) -> String
where
    R: DiagramRenderer + ?Sized,
{
    render_block(renderer, source).to_fragment(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FailingRenderer, FixedRenderer};

    #[test]
    fn test_rendered_fragment_with_source() {
        let outcome = render_block(&FixedRenderer::new("[A]-->[B]"), "graph LR\nA-->B");
        assert!(outcome.is_rendered());
        assert_eq!(
            outcome.to_fragment(&SpliceConfig::default()),
            "```\n[A]-->[B]\n```\n\n<details>\n<summary>View Mermaid Source</summary>\n\n```mermaid\ngraph LR\nA-->B\n```\n\n</details>"
        );
    }

    #[test]
    fn test_rendered_fragment_without_source() {
        let outcome = render_block(&FixedRenderer::new("[A]"), "graph LR\nA");
        let config = SpliceConfig::default().rendered_only();
        assert_eq!(outcome.to_fragment(&config), "```\n[A]\n```");
    }

    #[test]
    fn test_failed_fragment() {
        let fragment = render_fragment(
            &FailingRenderer::new("bad syntax"),
            "graph ??",
            &SpliceConfig::default(),
        );
        assert_eq!(
            fragment,
            "```mermaid\ngraph ??\n```\n<!-- mermaid render failed: bad syntax -->"
        );
    }

    #[test]
    fn test_failed_fragment_without_message() {
        let fragment = render_fragment(&FailingRenderer::silent(), "x", &SpliceConfig::default());
        assert!(fragment.ends_with("<!-- mermaid render failed: Unknown error -->"));
    }

    #[test]
    fn test_failure_message_is_sanitized() {
        let fragment = render_fragment(
            &FailingRenderer::new("unexpected token '-->' at 1:3"),
            "A-->",
            &SpliceConfig::default(),
        );
        assert!(fragment.ends_with("<!-- mermaid render failed: unexpected token '- -&gt;' at 1:3 -->"));
        assert_eq!(fragment.matches("-->").count(), 2);
    }

    #[test]
    fn test_panicking_renderer_is_contained() {
        let renderer = |_: &str| -> Result<String, RenderFailure> { panic!("layout overflow") };
        let outcome = render_block(&renderer, "graph TD");
        assert_eq!(
            outcome,
            BlockOutcome::Failed {
                source: "graph TD".to_string(),
                message: "layout overflow".to_string(),
            }
        );
    }

    #[test]
    fn test_custom_tag_and_label() {
        let config = SpliceConfig {
            fence_tag: "mmd".to_string(),
            summary_label: "Source".to_string(),
            ..SpliceConfig::default()
        };
        let fragment = render_fragment(&FixedRenderer::new("ok"), "A", &config);
        assert!(fragment.contains("<summary>Source</summary>"));
        assert!(fragment.contains("```mmd\nA\n```"));
    }
}
