//! The splicing pipeline
//!
//! Scanner → per-block renderer → rebuild, wrapped in a guard that keeps the
//! original document whenever the machinery itself fails:
//!
//! - [`scanner`]: finds fenced diagram blocks and their byte spans
//! - [`fragment`]: renders one block and formats its replacement
//! - [`splicer`]: runs both over a document and contains failures
//! - [`hook`]: the host-facing text-completion entry point

pub mod fragment;
pub mod hook;
pub mod scanner;
pub mod splicer;

pub use fragment::{render_block, render_fragment, BlockOutcome, RENDER_FAILED_PREFIX};
pub use hook::{HookInput, HookOutput, TextCompleteEvent, TextCompleteHook};
pub use scanner::{scan_blocks, BlockScanner, DiagramBlock, FenceScanner};
pub use splicer::{rebuild, PipelineOutcome, Splicer, UNEXPECTED_ERROR_PREFIX};
