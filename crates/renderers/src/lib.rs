//! # Renderers
//!
//! Consumers of transformed geometry.
//!
//! Responsibilities:
//! - `LogRenderer`: attitude summary through `tracing`
//! - `JsonlRenderer`: per-tick JSON lines on disk
//! - `RendererSet`: fan-out to several renderers
//! - Build renderers from `RendererConfig`

mod factory;
mod jsonl;
mod log;
mod set;

pub use contracts::{RenderFrame, Renderer};
pub use factory::{create_renderer, create_renderers};
pub use jsonl::JsonlRenderer;
pub use log::LogRenderer;
pub use set::RendererSet;
