//! Error types for planar sectioning.

use thiserror::Error;

/// Result type for sectioning operations.
pub type SectionResult<T> = Result<T, SectionError>;

/// Errors a [`SectionAdapter`](crate::SectionAdapter) may report for one height.
///
/// Slicers treat every variant as a recoverable, per-layer failure.
#[derive(Debug, Error)]
pub enum SectionError {
    /// Mesh has no vertices or no faces.
    #[error("mesh is empty")]
    EmptyMesh,

    /// The cutting plane normal has zero length.
    #[error("section plane normal has zero length")]
    DegenerateNormal,

    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    InvalidFace {
        /// Face index.
        face: usize,
        /// Offending vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SectionError::InvalidFace {
            face: 3,
            index: 42,
            vertex_count: 8,
        };
        let msg = format!("{err}");
        assert!(msg.contains("face 3"));
        assert!(msg.contains("42"));
        assert!(msg.contains('8'));
    }
}
