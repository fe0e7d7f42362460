//! Build-plate scene management.
//!
//! This crate keeps track of the meshes placed on a cylindrical build plate
//! and everything needed to edit them interactively:
//!
//! - [`SceneManager`] - Owns objects, selection, plate and history
//! - [`Transform`] - Translation, rotation (degrees) and scale of one object
//! - [`UndoRedoManager`] - Bounded linear history of transform edits
//! - [`BuildPlate`] - Plate dimensions and build-volume checks
//! - [`ProjectSnapshot`] - Version-tagged project document
//!
//! Geometry comes from [`plate_mesh`]. The scene hands world-space copies to
//! a slicer through [`SceneManager::collect_for_slicing`].
//!
//! # Example
//!
//! ```
//! use plate_mesh::{IndexedMesh, Point3};
//! use plate_scene::SceneManager;
//!
//! let mut scene = SceneManager::new();
//! for i in 0..4 {
//!     let part = IndexedMesh::cuboid(Point3::origin(), Point3::new(8.0, 8.0, 4.0));
//!     scene.add(format!("part_{i}"), part, None);
//! }
//!
//! scene.auto_arrange();
//! assert!(scene.check_build_volume().is_empty());
//! assert_eq!(scene.collect_for_slicing().len(), 4);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod history;
mod object;
mod plate;
mod recent;
mod scene;
mod snapshot;
mod transform;

pub use error::{SceneError, SceneResult};
pub use history::{DEFAULT_MAX_DEPTH, UndoEntry, UndoRedoManager};
pub use object::{ObjectId, SceneObject};
pub use plate::{BuildPlate, VolumeIssue, VolumeViolation, Z_TOLERANCE_MM};
pub use recent::{DEFAULT_RECENT_CAPACITY, RecentFiles};
pub use scene::{AUTO_ARRANGE_LABEL, RestoreReport, SceneManager, SkippedObject};
pub use snapshot::{ObjectRecord, ProjectSnapshot, SNAPSHOT_VERSION, TransformRecord};
pub use transform::{Axis, ParseAxisError, Transform, TransformUpdate};
