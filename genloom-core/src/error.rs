//! Error types for genloom-core.

use std::fmt;

/// Type-erased error carried by a failed [`Outcome`](crate::Outcome).
///
/// The wrap boundary must absorb *any* error an operation produces, so the
/// concrete type is erased at the point of capture. The original type remains
/// reachable via `Error::source` / downcasting.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A panic captured by [`wrap`](crate::wrap) and converted into a failure.
#[derive(Debug, thiserror::Error)]
#[error("operation panicked: {message}")]
pub struct PanicError {
    /// Panic payload, when it was a string; a placeholder otherwise.
    pub message: String,
}

// ---------------------------------------------------------------------------
// GenerationPhase
// ---------------------------------------------------------------------------

/// The pipeline phase a failure report belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPhase {
    /// Phase 1 — template expansion.
    Render,
    /// Phase 2 — directory creation and file writes.
    Persist,
}

impl GenerationPhase {
    fn heading(self) -> &'static str {
        match self {
            GenerationPhase::Render => "problems in generation",
            GenerationPhase::Persist => "problems in writing output",
        }
    }
}

impl fmt::Display for GenerationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())
    }
}

// ---------------------------------------------------------------------------
// AggregatedError
// ---------------------------------------------------------------------------

/// Every failure from one pipeline phase, attributed to its identifier.
///
/// Constructed only when at least one failure exists; the failure order is
/// whatever order the phase produced its outcomes in.
#[derive(Debug)]
pub struct AggregatedError {
    phase: GenerationPhase,
    failures: Vec<(String, BoxError)>,
}

impl AggregatedError {
    /// Build a report for `phase` from per-identifier failures.
    pub fn new(phase: GenerationPhase, failures: Vec<(String, BoxError)>) -> Self {
        debug_assert!(!failures.is_empty(), "empty AggregatedError");
        AggregatedError { phase, failures }
    }

    /// The phase the failures came from.
    pub fn phase(&self) -> GenerationPhase {
        self.phase
    }

    /// The per-identifier failures, in report order.
    pub fn failures(&self) -> &[(String, BoxError)] {
        &self.failures
    }

    /// The identifiers of every failed unit, in report order.
    pub fn identifiers(&self) -> Vec<&str> {
        self.failures.iter().map(|(id, _)| id.as_str()).collect()
    }

    /// Number of failures in the report. Always at least one.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Present for completeness; a constructed report is never empty.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for AggregatedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.phase)?;
        for (id, error) in &self.failures {
            writeln!(f, "  {}: {}", id, error_chain(error.as_ref()))?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregatedError {}

/// Render an error and its full source chain on one line.
fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut line = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        line.push_str(": ");
        line.push_str(&cause.to_string());
        source = cause.source();
    }
    line
}
