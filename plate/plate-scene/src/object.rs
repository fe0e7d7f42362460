//! Placed mesh instances.

use std::fmt;
use std::path::{Path, PathBuf};

use plate_mesh::{Aabb, IndexedMesh};

use crate::transform::Transform;

/// Identifier of a scene object.
///
/// Ids are unique within one [`SceneManager`](crate::SceneManager) and stable
/// for the lifetime of the object. They are not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

/// One mesh placed on the build plate.
///
/// The stored mesh is in local space and never moves; world coordinates are
/// always derived by baking the transform into a copy.
#[derive(Debug, Clone)]
pub struct SceneObject {
    id: ObjectId,
    name: String,
    mesh: IndexedMesh,
    pub(crate) transform: Transform,
    pub(crate) visible: bool,
    pub(crate) selected: bool,
    source_path: Option<PathBuf>,
}

impl SceneObject {
    pub(crate) fn new(
        id: ObjectId,
        name: String,
        mesh: IndexedMesh,
        source_path: Option<PathBuf>,
    ) -> Self {
        Self {
            id,
            name,
            mesh,
            transform: Transform::identity(),
            visible: true,
            selected: false,
            source_path,
        }
    }

    /// Object id.
    #[must_use]
    pub const fn id(&self) -> ObjectId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Local-space mesh.
    #[must_use]
    pub const fn mesh(&self) -> &IndexedMesh {
        &self.mesh
    }

    /// Current placement.
    #[must_use]
    pub const fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Whether the object is shown, checked and sliced.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the object is the current selection.
    #[must_use]
    pub const fn is_selected(&self) -> bool {
        self.selected
    }

    /// File the mesh was loaded from, if any.
    #[must_use]
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// A world-space copy of the mesh.
    #[must_use]
    pub fn world_mesh(&self) -> IndexedMesh {
        self.transform.apply_to(&self.mesh)
    }

    /// World-space bounding box.
    #[must_use]
    pub fn world_bounds(&self) -> Aabb {
        self.world_mesh().bounds()
    }
}
