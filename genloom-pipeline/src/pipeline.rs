//! The two-phase generation pipeline.
//!
//! Phase 1 renders every unit in parallel; a gate aborts the run with an
//! [`AggregatedError`] naming *every* failed unit before anything touches the
//! filesystem. Phase 2 persists the rendered text strictly serially in input
//! order, again collecting every failure before aborting. Only when both
//! gates pass is the output directory registered with the host project.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use genloom_core::{
    wrap, AggregatedError, BoxError, GenerationPhase, GenerationUnit, Outcome, UnitSource,
};
use genloom_renderer::Renderer;

use crate::project::{OutputRootStrategy, ProjectHandle};
use crate::writer::{self, PersistError};

// ---------------------------------------------------------------------------
// Errors and report
// ---------------------------------------------------------------------------

/// Terminal error of a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The unit source failed before generation started.
    #[error("unit source error: {0}")]
    Source(BoxError),

    /// One of the two phases reported failures.
    #[error(transparent)]
    Failed(#[from] AggregatedError),
}

/// Summary of a fully successful run.
#[derive(Debug)]
pub struct RunReport {
    /// Resolved output directory the strategy was applied to.
    pub output_dir: PathBuf,
    /// Absolute paths written during the persist phase, in input order.
    pub written: Vec<PathBuf>,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// The orchestrator: parallel render, serial persist, aggregated failure
/// gating, then exactly-once output-root registration.
pub struct Pipeline<R> {
    renderer: R,
    output_dir: PathBuf,
    strategy: OutputRootStrategy,
}

impl<R: Renderer> Pipeline<R> {
    /// Configure a pipeline. `output_dir` may be relative; it resolves
    /// against [`ProjectHandle::base_dir`] at run time.
    pub fn new(
        renderer: R,
        output_dir: impl Into<PathBuf>,
        strategy: OutputRootStrategy,
    ) -> Self {
        Pipeline {
            renderer,
            output_dir: output_dir.into(),
            strategy,
        }
    }

    /// Pull units from `source` and run them. See [`Pipeline::run_units`].
    pub fn run(
        &self,
        source: &dyn UnitSource,
        project: &mut dyn ProjectHandle,
    ) -> Result<RunReport, PipelineError> {
        let units = source.units().map_err(PipelineError::Source)?;
        self.run_units(&units, project)
    }

    /// Run the two-phase pipeline over `units`.
    ///
    /// All-or-nothing per phase, not fail-fast: every render is attempted
    /// and every failure reported together, and likewise for persists. A
    /// failing persist does not roll back writes already completed for
    /// earlier units — those files stay on disk even though the run returns
    /// an error.
    pub fn run_units(
        &self,
        units: &[GenerationUnit],
        project: &mut dyn ProjectHandle,
    ) -> Result<RunReport, PipelineError> {
        let output_dir = resolve_output_dir(&self.output_dir, project.base_dir());
        tracing::debug!("rendering {} units", units.len());

        // Phase 1 — parallel render. Every outcome carries its identifier,
        // so completion order is irrelevant; collect() restores input order.
        let outcomes: Vec<Outcome<String>> = units
            .par_iter()
            .map(|unit| self.render_unit(unit))
            .collect();
        let rendered = gate(GenerationPhase::Render, outcomes)?;

        // Phase 2 — strictly serial, input order. Output paths share parent
        // directories; serial execution keeps their creation race-free. A
        // failing unit is recorded and the loop continues.
        let mut outcomes = Vec::with_capacity(rendered.len());
        for (id, text) in &rendered {
            let path = output_dir.join(id);
            outcomes.push(wrap(id.clone(), move || {
                writer::persist(&path, text)?;
                Ok::<_, PersistError>(path)
            }));
        }
        let written = gate(GenerationPhase::Persist, outcomes)?;

        // Both gates passed: register the output directory, exactly once.
        self.strategy.apply(project, &output_dir);
        tracing::info!(
            "generated {} files under {}",
            written.len(),
            output_dir.display()
        );

        Ok(RunReport {
            output_dir,
            written: written.into_iter().map(|(_, path)| path).collect(),
        })
    }

    fn render_unit(&self, unit: &GenerationUnit) -> Outcome<String> {
        if unit.output.is_empty() {
            return Outcome::failure(unit.to_string(), "unit has an empty output identifier");
        }
        if unit.template.is_empty() {
            return Outcome::failure(unit.output.clone(), "unit has an empty template reference");
        }
        wrap(unit.output.clone(), || {
            self.renderer.render(&unit.template, &unit.model)
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Partition a phase's outcomes; any failure aborts the phase with a report
/// naming every failed identifier.
fn gate<T>(
    phase: GenerationPhase,
    outcomes: Vec<Outcome<T>>,
) -> Result<Vec<(String, T)>, AggregatedError> {
    let total = outcomes.len();
    let mut successes = Vec::with_capacity(total);
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome.into_result() {
            Ok(pair) => successes.push(pair),
            Err(pair) => failures.push(pair),
        }
    }
    if failures.is_empty() {
        Ok(successes)
    } else {
        tracing::warn!("{} of {} units failed: {}", failures.len(), total, phase);
        Err(AggregatedError::new(phase, failures))
    }
}

/// Absolute output directories stay as-is; relative ones resolve against the
/// project base directory.
fn resolve_output_dir(configured: &Path, base: &Path) -> PathBuf {
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        base.join(configured)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use genloom_renderer::TeraRenderer;
    use serde_json::json;

    fn empty_renderer() -> TeraRenderer {
        TeraRenderer::from_templates(std::iter::empty::<(String, String)>()).unwrap()
    }

    #[test]
    fn resolve_keeps_absolute_directories() {
        let dir = resolve_output_dir(Path::new("/abs/out"), Path::new("/project"));
        assert_eq!(dir, PathBuf::from("/abs/out"));
    }

    #[test]
    fn resolve_joins_relative_directories_to_base() {
        let dir = resolve_output_dir(Path::new("target/generated"), Path::new("/project"));
        assert_eq!(dir, PathBuf::from("/project/target/generated"));
    }

    #[test]
    fn gate_passes_through_all_successes_in_order() {
        let outcomes = vec![
            Outcome::success("a", 1),
            Outcome::success("b", 2),
        ];
        let pairs = gate(GenerationPhase::Render, outcomes).unwrap();
        assert_eq!(pairs, vec![("a".to_string(), 1), ("b".to_string(), 2)]);
    }

    #[test]
    fn gate_collects_every_failure() {
        let outcomes: Vec<Outcome<u32>> = vec![
            Outcome::success("a", 1),
            Outcome::failure("b", "first"),
            Outcome::failure("c", "second"),
        ];
        let err = gate(GenerationPhase::Render, outcomes).unwrap_err();
        assert_eq!(err.identifiers(), vec!["b", "c"]);
    }

    #[test]
    fn empty_output_identifier_fails_without_rendering() {
        let pipeline = Pipeline::new(empty_renderer(), "out", OutputRootStrategy::None);
        let unit = GenerationUnit::new("t.tera", json!({}), "");
        let outcome = pipeline.render_unit(&unit);
        assert!(outcome.is_failure());
        assert!(outcome.to_string().contains("empty output identifier"));
    }

    #[test]
    fn empty_template_reference_fails_under_the_unit_identifier() {
        let pipeline = Pipeline::new(empty_renderer(), "out", OutputRootStrategy::None);
        let unit = GenerationUnit::new("", json!({}), "pkg/A.txt");
        let outcome = pipeline.render_unit(&unit);
        assert_eq!(outcome.id(), "pkg/A.txt");
        assert!(outcome.to_string().contains("empty template reference"));
    }
}
