//! Document splicer
//!
//! Runs scanner → renderer → rebuild over a whole document. Per-block
//! failures are contained by [`render_block`]; anything else degrades the
//! document to its original text plus one diagnostic comment.

use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, info, span, Level};

use super::fragment::{render_block, BlockOutcome};
use super::scanner::{BlockScanner, DiagramBlock, FenceScanner};
use crate::core::{diagnostic_comment, DiagramRenderer, SpliceConfig, SpliceError};

/// Prefix of the comment appended to a degraded document
pub const UNEXPECTED_ERROR_PREFIX: &str = "mermaid-renderer: unexpected error - ";

/// Result of splicing a whole document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Every block was replaced by its fragment
    Spliced(String),
    /// Splicing failed; the original text is returned untouched
    Degraded { original: String, diagnostic: String },
}

impl PipelineOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, PipelineOutcome::Degraded { .. })
    }

    /// The text handed back to the host
    pub fn into_text(self) -> String {
        match self {
            PipelineOutcome::Spliced(text) => text,
            PipelineOutcome::Degraded {
                original,
                diagnostic,
            } => format!(
                "{}\n\n{}",
                original,
                diagnostic_comment(UNEXPECTED_ERROR_PREFIX, &diagnostic)
            ),
        }
    }
}

/// Replaces diagram blocks in documents with rendered fragments
///
/// The splicer holds only immutable collaborators, so one instance can serve
/// any number of documents without carrying anything between them.
pub struct Splicer {
    renderer: Box<dyn DiagramRenderer>,
    scanner: Box<dyn BlockScanner>,
    config: SpliceConfig,
}

impl Splicer {
    /// Create a splicer with the default configuration
    pub fn new(renderer: impl DiagramRenderer + 'static) -> Self {
        Self::with_config(renderer, SpliceConfig::default())
    }

    /// Create a splicer whose scanner follows `config`
    pub fn with_config(renderer: impl DiagramRenderer + 'static, config: SpliceConfig) -> Self {
        Self {
            renderer: Box::new(renderer),
            scanner: Box::new(FenceScanner::from_config(&config)),
            config,
        }
    }

    /// Replace the block scanner
    pub fn with_scanner(mut self, scanner: impl BlockScanner + 'static) -> Self {
        self.scanner = Box::new(scanner);
        self
    }

    pub fn config(&self) -> &SpliceConfig {
        &self.config
    }

    /// Name of the underlying renderer
    pub fn renderer_name(&self) -> &str {
        self.renderer.name()
    }

    /// Scan `document` without rendering anything
    pub fn scan(&self, document: &str) -> Result<Vec<DiagramBlock>, SpliceError> {
        self.scanner.scan(document)
    }

    /// Splice `document`, returning any pipeline error
    ///
    /// Renderer failures never surface here; they are already folded into
    /// their fragments.
    pub fn try_splice(&self, document: &str) -> Result<String, SpliceError> {
        let blocks = self.scanner.scan(document)?;
        debug!(block_count = blocks.len(), "Scanned document");

        if blocks.is_empty() {
            return Ok(document.to_string());
        }

        let outcomes: Vec<BlockOutcome> = blocks
            .iter()
            .map(|block| render_block(self.renderer.as_ref(), block.source()))
            .collect();

        let failed = outcomes.iter().filter(|o| !o.is_rendered()).count();
        info!(blocks = outcomes.len(), failed, "Rendered diagram blocks");

        let fragments: Vec<String> = outcomes
            .iter()
            .map(|outcome| outcome.to_fragment(&self.config))
            .collect();

        rebuild(document, &blocks, &fragments)
    }

    /// Splice `document`, degrading to the original text on any failure
    pub fn splice(&self, document: &str) -> PipelineOutcome {
        let splice_span = span!(Level::INFO, "splice_document", input_len = document.len());
        let _enter = splice_span.enter();

        let result = panic::catch_unwind(AssertUnwindSafe(|| self.try_splice(document)))
            .unwrap_or_else(|payload| Err(SpliceError::from_panic(payload.as_ref())));

        match result {
            Ok(text) => PipelineOutcome::Spliced(text),
            Err(e) => {
                error!(error = %e, "Splicing failed, keeping original text");
                PipelineOutcome::Degraded {
                    original: document.to_string(),
                    diagnostic: e.to_string(),
                }
            }
        }
    }

    /// Splice `document` and return the text for the host
    pub fn process(&self, document: &str) -> String {
        self.splice(document).into_text()
    }
}

/// Reassemble `document` with each block span replaced by its fragment
///
/// Spans must be in order, non-overlapping, in bounds, and on char
/// boundaries.
pub fn rebuild(
    document: &str,
    blocks: &[DiagramBlock],
    fragments: &[String],
) -> Result<String, SpliceError> {
    if blocks.len() != fragments.len() {
        return Err(SpliceError::scan_error(format!(
            "{} blocks but {} fragments",
            blocks.len(),
            fragments.len()
        )));
    }

    let mut output = String::with_capacity(document.len());
    let mut cursor = 0;

    for (block, fragment) in blocks.iter().zip(fragments) {
        let valid = block.start >= cursor
            && block.start <= block.end
            && block.end <= document.len()
            && document.is_char_boundary(block.start)
            && document.is_char_boundary(block.end);
        if !valid {
            return Err(SpliceError::invalid_span(
                block.start,
                block.end,
                document.len(),
            ));
        }

        output.push_str(&document[cursor..block.start]);
        output.push_str(fragment);
        cursor = block.end;
    }

    output.push_str(&document[cursor..]);
    Ok(output)
}
