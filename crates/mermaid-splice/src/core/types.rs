//! Core type definitions for block splicing
//!
//! Configuration for how fences are recognized and how successful
//! renderings are laid out.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fence token delimiting code blocks
pub const FENCE: &str = "```";

/// Language tag recognized by default
pub const DEFAULT_FENCE_TAG: &str = "mermaid";

/// Label of the collapsible section holding the diagram source
pub const DEFAULT_SUMMARY_LABEL: &str = "View Mermaid Source";

/// Whether a successful rendering keeps the diagram source alongside it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceSection {
    /// Append a `<details>` section containing the original fenced block
    #[default]
    Collapsible,
    /// Emit only the rendered block
    Omitted,
}

impl SourceSection {
    /// Get all valid names
    pub fn variants() -> &'static [&'static str] {
        &["collapsible", "omitted"]
    }
}

impl fmt::Display for SourceSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceSection::Collapsible => write!(f, "collapsible"),
            SourceSection::Omitted => write!(f, "omitted"),
        }
    }
}

impl FromStr for SourceSection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "collapsible" => Ok(SourceSection::Collapsible),
            "omitted" => Ok(SourceSection::Omitted),
            _ => Err(format!("Unknown source section mode: {}", s)),
        }
    }
}

/// Splicing configuration
///
/// Holds no state between documents; one config can be reused for any
/// number of invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpliceConfig {
    /// Language tag that marks a diagram block (`mermaid` in ```` ```mermaid ````)
    pub fence_tag: String,
    /// Layout of a successful rendering
    pub source_section: SourceSection,
    /// Summary text of the collapsible source section
    pub summary_label: String,
}

impl SpliceConfig {
    /// Create a config with a custom fence tag and default layout
    pub fn with_tag(tag: impl Into<String>) -> Self {
        Self {
            fence_tag: tag.into(),
            ..Self::default()
        }
    }

    /// Emit only the rendered block on success
    pub fn rendered_only(mut self) -> Self {
        self.source_section = SourceSection::Omitted;
        self
    }

    /// The full opening fence line, without its line break
    pub fn opening_fence(&self) -> String {
        format!("{}{}", FENCE, self.fence_tag)
    }
}

impl Default for SpliceConfig {
    fn default() -> Self {
        Self {
            fence_tag: DEFAULT_FENCE_TAG.to_string(),
            source_section: SourceSection::default(),
            summary_label: DEFAULT_SUMMARY_LABEL.to_string(),
        }
    }
}
