//! mermaid-splice - Render Mermaid blocks inside generated text
//!
//! Scans text for ```` ```mermaid ```` fenced blocks, renders each one to
//! plain text, and splices the rendering back in place. The diagram source
//! is always kept: next to the rendering in a collapsible section, or as the
//! original block with a diagnostic comment when rendering fails. If the
//! pipeline itself breaks, the original text comes back untouched with one
//! diagnostic comment appended.
//!
//! # Quick Start
//!
//! ```rust
//! use mermaid_splice::{splice, RenderFailure};
//!
//! let renderer = |source: &str| -> Result<String, RenderFailure> {
//!     Ok(format!("[{}]", source))
//! };
//! let output = splice("Flow:\n```mermaid\nA-->B\n```\n", renderer);
//! assert!(output.starts_with("Flow:\n```\n[A-->B]\n```"));
//! assert!(output.contains("<summary>View Mermaid Source</summary>"));
//! ```
//!
//! # Advanced Usage
//!
//! ```rust
//! use mermaid_splice::prelude::*;
//!
//! let splicer = Splicer::with_config(
//!     FailingRenderer::new("bad syntax"),
//!     SpliceConfig::default().rendered_only(),
//! );
//!
//! let outcome = splicer.splice("```mermaid\ngraph ??\n```");
//! assert!(!outcome.is_degraded());
//! assert_eq!(
//!     outcome.into_text(),
//!     "```mermaid\ngraph ??\n```\n<!-- mermaid render failed: bad syntax -->"
//! );
//! ```

pub mod backends;
pub mod core;
pub mod pipeline;

pub use crate::core::*;
pub use backends::{CommandRenderer, CommandRendererConfig};
pub use pipeline::{
    BlockOutcome, DiagramBlock, HookInput, HookOutput, PipelineOutcome, Splicer,
    TextCompleteHook,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::backends::{CommandRenderer, CommandRendererConfig};
    pub use crate::core::{
        sanitize_comment, DiagramRenderer, FailingRenderer, FixedRenderer, RenderFailure,
        SourceSection, SpliceConfig, SpliceError,
    };
    pub use crate::pipeline::{
        BlockOutcome, BlockScanner, DiagramBlock, FenceScanner, HookInput, HookOutput,
        PipelineOutcome, Splicer, TextCompleteHook,
    };
}

/// Splice every Mermaid block in `document` using `renderer`
///
/// Uses the default configuration: ```` ```mermaid ```` fences and a
/// collapsible source section. Never fails.
pub fn splice(document: &str, renderer: impl DiagramRenderer + 'static) -> String {
    pipeline::Splicer::new(renderer).process(document)
}

/// Splice with an explicit configuration
///
/// # Example
/// ```rust
/// use mermaid_splice::{splice_with_config, FixedRenderer, SpliceConfig};
///
/// let output = splice_with_config(
///     "```mermaid\nA\n```",
///     FixedRenderer::new("+---+"),
///     SpliceConfig::default().rendered_only(),
/// );
/// assert_eq!(output, "```\n+---+\n```");
/// ```
pub fn splice_with_config(
    document: &str,
    renderer: impl DiagramRenderer + 'static,
    config: SpliceConfig,
) -> String {
    pipeline::Splicer::with_config(renderer, config).process(document)
}

/// Splice with the default external renderer
///
/// Runs the command named by `MERMAID_SPLICE_RENDERER`, or
/// `figurehead convert` when unset.
pub fn splice_with_command(document: &str) -> String {
    let config = CommandRendererConfig::from_env().unwrap_or_default();
    splice(document, CommandRenderer::new(config))
}
