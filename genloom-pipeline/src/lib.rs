//! # genloom-pipeline
//!
//! The generation orchestrator: parallel render, aggregate-failure gating,
//! strictly serial persist, and exactly-once output-root registration.
//!
//! Call [`Pipeline::run`] with a unit source and a project handle, or
//! [`Pipeline::run_units`] with units already in hand.

pub mod pipeline;
pub mod project;
pub mod writer;

pub use pipeline::{Pipeline, PipelineError, RunReport};
pub use project::{OutputRootStrategy, ProjectHandle};
pub use writer::PersistError;
