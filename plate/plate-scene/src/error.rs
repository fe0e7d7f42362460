//! Error types for scene operations.

use std::path::PathBuf;
use thiserror::Error;

use crate::transform::Axis;

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Errors that can occur while editing or persisting a scene.
///
/// Unknown object ids are not errors; those operations return `false` or
/// `None` instead.
#[derive(Debug, Error)]
pub enum SceneError {
    /// A scale component would be exactly zero.
    #[error("scale along {axis} cannot be zero")]
    DegenerateScale {
        /// The offending axis.
        axis: Axis,
    },

    /// Snapshot (de)serialization failed.
    #[error("invalid project snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// Snapshot was written by an incompatible version.
    #[error("unsupported project snapshot version '{found}'")]
    UnsupportedVersion {
        /// Version string found in the document.
        found: String,
    },

    /// Failed to write a file.
    #[error("failed to write '{path}': {source}")]
    IoWrite {
        /// Target path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to read a file.
    #[error("failed to read '{path}': {source}")]
    IoRead {
        /// Source path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}
