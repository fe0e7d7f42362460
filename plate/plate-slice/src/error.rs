//! Error types for slicing and export.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during slicing operations.
///
/// A section failing at one height is not an error: that layer is kept with
/// no contours and the run continues.
#[derive(Debug, Error)]
pub enum SliceError {
    /// Layer thickness is not a positive finite number.
    #[error("Invalid layer thickness: {0} (must be > 0)")]
    InvalidLayerThickness(f64),

    /// A part would need more layers than the slicer allows.
    #[error("Too many layers: {layers} (max {max})")]
    TooManyLayers {
        /// Layers the part would need.
        layers: f64,
        /// The per-part limit.
        max: usize,
    },

    /// An export was requested before any slice produced parts.
    #[error("No slice data, run a slice first")]
    NoSliceData,

    /// The run was cancelled between layers.
    #[error("Slice cancelled")]
    Cancelled,

    /// The background slicing thread could not be started.
    #[error("Failed to start slicing worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    /// The background slicing thread panicked.
    #[error("Slicing worker panicked")]
    WorkerPanicked,

    /// Writing to a caller-supplied writer failed.
    #[error("Write failed: {0}")]
    Io(#[from] std::io::Error),

    /// IO error during file export.
    #[error("Failed to write to {path}: {source}")]
    IoWrite {
        /// The path that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Style or preset JSON could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for slicing operations.
pub type SliceResult<T> = std::result::Result<T, SliceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SliceError::InvalidLayerThickness(-0.1);
        assert!(format!("{err}").contains("-0.1"));

        let err = SliceError::NoSliceData;
        assert_eq!(format!("{err}"), "No slice data, run a slice first");
    }
}
