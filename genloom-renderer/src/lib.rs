//! # genloom-renderer
//!
//! The template-expansion seam for the generation pipeline: the [`Renderer`]
//! trait plus [`TeraRenderer`], a Tera-backed implementation with an
//! immutable in-memory template cache safe for concurrent renders.

pub mod engine;
pub mod error;

pub use engine::{Renderer, TeraRenderer};
pub use error::RenderError;
