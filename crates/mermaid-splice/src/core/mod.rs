//! Core abstractions for block splicing
//!
//! Errors, configuration, the renderer seam, and comment escaping. The
//! pipeline that ties them together lives in [`crate::pipeline`].

mod error;
pub mod logging;
mod renderer;
mod sanitize;
mod types;

pub use error::*;
pub use logging::*;
pub use renderer::*;
pub use sanitize::*;
pub use types::*;
