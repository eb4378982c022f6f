//! The generation unit and the source contract that supplies them.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BoxError;

/// One piece of generation: which template, with what model, written where.
///
/// `output` is a path relative to the run's output directory and doubles as
/// the unit's identifier in outcome sets and failure reports. Uniqueness of
/// `output` within a run is *not* enforced: units sharing an output path
/// silently overwrite each other, last write (in input order) wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationUnit {
    /// Name of the template to expand, resolved by the renderer.
    pub template: String,
    /// Opaque model payload handed to the renderer unchanged.
    pub model: Value,
    /// Relative output path; also the unit's identifier.
    pub output: String,
}

impl GenerationUnit {
    pub fn new(template: impl Into<String>, model: Value, output: impl Into<String>) -> Self {
        GenerationUnit {
            template: template.into(),
            model,
            output: output.into(),
        }
    }
}

impl fmt::Display for GenerationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <- {}", self.output, self.template)
    }
}

/// Supplier of the ordered unit sequence that seeds a run.
///
/// Implemented per concrete generator. The pipeline relies on the returned
/// order (phase 2 replays it) and validates nothing beyond non-empty
/// identifiers and template references.
pub trait UnitSource {
    /// Retrieve the units for one run, in generation order.
    fn units(&self) -> Result<Vec<GenerationUnit>, BoxError>;
}

impl UnitSource for Vec<GenerationUnit> {
    fn units(&self) -> Result<Vec<GenerationUnit>, BoxError> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_names_output_and_template() {
        let unit = GenerationUnit::new("greeting.tera", json!({"name": "A"}), "pkg/A.txt");
        assert_eq!(unit.to_string(), "pkg/A.txt <- greeting.tera");
    }

    #[test]
    fn vec_source_preserves_order() {
        let units = vec![
            GenerationUnit::new("t", json!({}), "one"),
            GenerationUnit::new("t", json!({}), "two"),
        ];
        let fetched = units.units().expect("units");
        let ids: Vec<_> = fetched.iter().map(|u| u.output.as_str()).collect();
        assert_eq!(ids, vec!["one", "two"]);
    }
}
