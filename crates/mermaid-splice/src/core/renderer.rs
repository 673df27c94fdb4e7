//! The rendering dependency
//!
//! A renderer turns one diagram's source into plain text. Splicing treats it
//! as a black box: one input, either rendered text or a [`RenderFailure`].

use super::RenderFailure;

/// Converts diagram source into rendered plain text
///
/// Implementations must not keep state between calls that changes their
/// output. Any `Fn(&str) -> Result<String, RenderFailure>` is a renderer,
/// which makes test doubles one-liners:
///
/// ```rust
/// use mermaid_splice::{DiagramRenderer, RenderFailure};
///
/// let upper = |source: &str| -> Result<String, RenderFailure> { Ok(source.to_uppercase()) };
/// assert_eq!(upper.render("graph LR").unwrap(), "GRAPH LR");
/// ```
pub trait DiagramRenderer {
    /// Render a trimmed diagram source
    fn render(&self, source: &str) -> Result<String, RenderFailure>;

    /// Short name used in logs
    fn name(&self) -> &str {
        "renderer"
    }
}

impl<F> DiagramRenderer for F
where
    F: Fn(&str) -> Result<String, RenderFailure>,
{
    fn render(&self, source: &str) -> Result<String, RenderFailure> {
        self(source)
    }

    fn name(&self) -> &str {
        "fn"
    }
}

/// Renderer that returns the same text for every diagram
#[derive(Debug, Clone)]
pub struct FixedRenderer {
    output: String,
}

impl FixedRenderer {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
        }
    }
}

impl DiagramRenderer for FixedRenderer {
    fn render(&self, _source: &str) -> Result<String, RenderFailure> {
        Ok(self.output.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Renderer that rejects every diagram
#[derive(Debug, Clone)]
pub struct FailingRenderer {
    failure: RenderFailure,
}

impl FailingRenderer {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            failure: RenderFailure::new(message),
        }
    }

    /// Fail without a message
    pub fn silent() -> Self {
        Self {
            failure: RenderFailure::unknown(),
        }
    }
}

impl DiagramRenderer for FailingRenderer {
    fn render(&self, _source: &str) -> Result<String, RenderFailure> {
        Err(self.failure.clone())
    }

    fn name(&self) -> &str {
        "failing"
    }
}
