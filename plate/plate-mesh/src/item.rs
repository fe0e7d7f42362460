//! World-space mesh snapshot handed from a scene to a slicer.

use std::sync::Arc;

use crate::mesh::IndexedMesh;

/// A named world-space mesh, ready for slicing.
///
/// The mesh is a baked copy: later scene edits never reach it. It is shared
/// through an [`Arc`] so slice results can reference the geometry they were
/// produced from without another copy.
#[derive(Debug, Clone)]
pub struct MeshItem {
    /// Identifier of the scene object this snapshot came from.
    pub id: String,
    /// Display name.
    pub name: String,
    /// World-space geometry.
    pub mesh: Arc<IndexedMesh>,
}

impl MeshItem {
    /// Create a new item, taking ownership of the mesh.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, mesh: IndexedMesh) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mesh: Arc::new(mesh),
        }
    }
}
