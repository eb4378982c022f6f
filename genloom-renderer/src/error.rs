//! Error types for genloom-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from template rendering operations.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The template reference does not exist in the template cache.
    #[error("unknown template: {name}")]
    UnknownTemplate { name: String },

    /// Tera template engine error during expansion or registration.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// The model payload could not be converted into a rendering context.
    #[error("model context error for template {template}: {source}")]
    Context {
        template: String,
        #[source]
        source: tera::Error,
    },

    /// Filesystem error while loading templates from a directory.
    #[error("template io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
