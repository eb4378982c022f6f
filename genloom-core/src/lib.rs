//! # genloom-core
//!
//! Domain types for the generation pipeline:
//! - [`unit`] — [`GenerationUnit`] and the [`UnitSource`] contract
//! - [`outcome`] — [`Outcome`] and the never-panicking [`wrap`] boundary
//! - [`error`] — [`AggregatedError`], [`GenerationPhase`], [`PanicError`]

pub mod error;
pub mod outcome;
pub mod unit;

pub use error::{AggregatedError, BoxError, GenerationPhase, PanicError};
pub use outcome::{wrap, wrap_fn, Outcome};
pub use unit::{GenerationUnit, UnitSource};
