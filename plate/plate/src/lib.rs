//! Build-plate scene editing and planar slicing.
//!
//! This umbrella crate re-exports the plate-* crates:
//!
//! - [`mesh`] - Triangle meshes, bounds and planar sections
//! - [`scene`] - Objects on the plate, transforms, undo/redo, snapshots
//! - [`slice`] - Slicing, build-time estimation, layer-file export
//!
//! The scene and slicing crates don't depend on each other; the scene hands
//! world-space [`MeshItem`](plate_mesh::MeshItem)s to the slicer.
//!
//! # Quick Start
//!
//! ```
//! use plate::prelude::*;
//!
//! let mut scene = SceneManager::new();
//! scene.add(
//!     "bracket",
//!     IndexedMesh::cuboid(Point3::origin(), Point3::new(20.0, 10.0, 4.0)),
//!     None,
//! );
//! assert!(scene.check_build_volume().is_empty());
//!
//! let mut slicer = SlicerService::default();
//! let style = PresetTables::default()
//!     .style_for("316L Stainless", "Draft (50 µm)")
//!     .unwrap();
//! let summary = slicer
//!     .slice(&scene.collect_for_slicing(), &style, &mut NullProgress)
//!     .unwrap();
//! assert_eq!(summary.total_layers, 80);
//!
//! let mut plan = Vec::new();
//! slicer.write_plan(&mut plan).unwrap();
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

// =============================================================================
// Re-exports
// =============================================================================

/// Triangle meshes, bounds and planar sections.
pub use plate_mesh as mesh;

/// Objects on the plate, transforms, undo/redo and snapshots.
pub use plate_scene as scene;

/// Slicing, build-time estimation and layer-file export.
pub use plate_slice as slice;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for scene editing and slicing.
///
/// ```
/// use plate::prelude::*;
/// ```
pub mod prelude {
    // Geometry
    pub use plate_mesh::{Aabb, IndexedMesh, MeshItem, Point3, Vector3};

    // Scene
    pub use plate_scene::{
        Axis, BuildPlate, ObjectId, ProjectSnapshot, SceneManager, Transform, TransformUpdate,
    };

    // Slicing
    pub use plate_slice::{
        BuildStyle, CancelToken, NullProgress, PresetTables, SliceProgress, SlicerService,
    };
}
