//! Host-project seam and the output-root registration strategies.

use std::path::Path;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ProjectHandle
// ---------------------------------------------------------------------------

/// Handle to the host build project that receives generated roots.
///
/// The pipeline only ever calls one registration method per run, selected by
/// the configured [`OutputRootStrategy`], and only after a fully successful
/// run.
pub trait ProjectHandle {
    /// Project base directory; a relative output directory resolves
    /// against it.
    fn base_dir(&self) -> &Path;

    /// Register `dir` as a compiled-source root.
    fn add_compile_source_root(&mut self, dir: &Path);

    /// Register `dir` as a test-source root.
    fn add_test_compile_source_root(&mut self, dir: &Path);

    /// Register `dir` as a resource root.
    fn add_resource(&mut self, dir: &Path);

    /// Register `dir` as a test-resource root.
    fn add_test_resource(&mut self, dir: &Path);
}

// ---------------------------------------------------------------------------
// OutputRootStrategy
// ---------------------------------------------------------------------------

/// How a generated output directory is registered with the host project.
///
/// Closed set: extending it means adding a variant here, not implementing a
/// trait elsewhere. Callers select exactly one per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputRootStrategy {
    /// Register as a compiled-source root.
    Source,
    /// Register as a test-source root.
    TestSource,
    /// Register as a resource root.
    Resource,
    /// Register as a test-resource root.
    TestResource,
    /// Do not register the directory at all.
    None,
}

impl OutputRootStrategy {
    /// All strategy variants in a stable order.
    pub fn all() -> &'static [OutputRootStrategy] {
        &[
            OutputRootStrategy::Source,
            OutputRootStrategy::TestSource,
            OutputRootStrategy::Resource,
            OutputRootStrategy::TestResource,
            OutputRootStrategy::None,
        ]
    }

    /// Apply this strategy's registration effect to `project`.
    pub fn apply(self, project: &mut dyn ProjectHandle, dir: &Path) {
        match self {
            OutputRootStrategy::Source => project.add_compile_source_root(dir),
            OutputRootStrategy::TestSource => project.add_test_compile_source_root(dir),
            OutputRootStrategy::Resource => project.add_resource(dir),
            OutputRootStrategy::TestResource => project.add_test_resource(dir),
            OutputRootStrategy::None => {}
        }
    }
}

impl Default for OutputRootStrategy {
    fn default() -> Self {
        OutputRootStrategy::Source
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
