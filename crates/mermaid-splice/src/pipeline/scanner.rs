//! Block scanner
//!
//! Finds fenced diagram blocks with a single left-to-right pass. Blocks are
//! matched non-greedily and never overlap: the first closing fence after an
//! opening fence ends the block, and scanning resumes after it.

use serde::Serialize;
use std::ops::Range;
use tracing::{debug, trace};

use crate::core::{SpliceConfig, SpliceError, FENCE};

/// A fenced diagram block located in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramBlock {
    /// Byte offset of the opening fence
    pub start: usize,
    /// Byte offset just past the closing fence
    pub end: usize,
    /// 1-based line of the opening fence
    pub line: usize,
    /// Everything between the opening line break and the closing fence
    pub raw: String,
}

impl DiagramBlock {
    /// The trimmed source handed to the renderer
    pub fn source(&self) -> &str {
        self.raw.trim()
    }

    /// Byte range covered by the block, fences included
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Locates diagram blocks in a document
pub trait BlockScanner {
    /// Return every block in order of appearance
    fn scan(&self, document: &str) -> Result<Vec<DiagramBlock>, SpliceError>;
}

/// Scanner for ```` ```<tag> ```` fenced blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceScanner {
    opening: String,
}

impl FenceScanner {
    /// Scanner for blocks tagged with `tag`
    pub fn new(tag: &str) -> Self {
        Self {
            opening: format!("{}{}", FENCE, tag),
        }
    }

    pub fn from_config(config: &SpliceConfig) -> Self {
        Self {
            opening: config.opening_fence(),
        }
    }

    /// Length of the line break right after the tag, if there is one
    fn line_break_len(rest: &str) -> Option<usize> {
        if rest.starts_with('\n') {
            Some(1)
        } else if rest.starts_with("\r\n") {
            Some(2)
        } else {
            None
        }
    }
}

impl Default for FenceScanner {
    fn default() -> Self {
        Self::from_config(&SpliceConfig::default())
    }
}

impl BlockScanner for FenceScanner {
    fn scan(&self, document: &str) -> Result<Vec<DiagramBlock>, SpliceError> {
        let mut blocks = Vec::new();
        let mut cursor = 0;
        let mut line = 1;
        let mut line_cursor = 0;

        while let Some(offset) = document[cursor..].find(&self.opening) {
            let start = cursor + offset;
            let line_initial = start == 0 || document.as_bytes()[start - 1] == b'\n';
            let after_tag = start + self.opening.len();

            let content_start = match Self::line_break_len(&document[after_tag..]) {
                Some(len) if line_initial => after_tag + len,
                _ => {
                    trace!(offset = start, "Skipping fence that does not open a block");
                    // The fence starts with an ASCII backtick, so +1 stays on a char boundary
                    cursor = start + 1;
                    continue;
                }
            };

            let Some(close_offset) = document[content_start..].find(FENCE) else {
                debug!(offset = start, "Unterminated block, leaving the rest untouched");
                break;
            };
            let content_end = content_start + close_offset;
            let end = content_end + FENCE.len();

            line += document[line_cursor..start].matches('\n').count();
            line_cursor = start;

            blocks.push(DiagramBlock {
                start,
                end,
                line,
                raw: document[content_start..content_end].to_string(),
            });
            cursor = end;
        }

        Ok(blocks)
    }
}

/// Scan `document` for blocks tagged with `tag`
pub fn scan_blocks(document: &str, tag: &str) -> Vec<DiagramBlock> {
    FenceScanner::new(tag).scan(document).unwrap_or_default()
}
