//! Concrete rendering backends

pub mod command;

pub use command::{CommandRenderer, CommandRendererConfig, RENDERER_ENV};
