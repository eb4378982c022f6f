//! Persisting rendered text to the output directory.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// All errors that can arise while persisting one rendered unit.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Parent directory could not be created.
    #[error("could not create directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rendered text could not be written.
    #[error("could not write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Create `path`'s parent directories as needed, then write `content`.
///
/// Called strictly serially by the pipeline's persist phase — output paths
/// share parent directories, and serial execution is what keeps their
/// creation race-free.
pub(crate) fn persist(path: &Path, content: &str) -> Result<(), PersistError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| PersistError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, content).map_err(|source| PersistError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("wrote: {}", path.display());
    Ok(())
}
