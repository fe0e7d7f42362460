//! Triangle mesh geometry for build-plate slicing.
//!
//! This crate is the geometry layer underneath the scene and slicing crates.
//! It provides:
//!
//! - [`IndexedMesh`] - A triangle mesh with indexed vertices
//! - [`Aabb`] - Axis-aligned bounding box
//! - [`SectionAdapter`] - The planar-section capability consumed by slicers
//! - [`TriangleSectioner`] - Built-in section implementation
//! - [`MeshItem`] - A world-space mesh snapshot handed from the scene to a slicer
//!
//! # Units
//!
//! All coordinates are `f64` millimeters.
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system**:
//! - X: width (left/right)
//! - Y: depth (front/back)
//! - Z: height (up/down, build direction)
//!
//! The build plate surface is the `Z = 0` plane.
//!
//! # Example
//!
//! ```
//! use plate_mesh::{IndexedMesh, Point3, SectionAdapter, TriangleSectioner, Vector3};
//!
//! let cube = IndexedMesh::cuboid(Point3::origin(), Point3::new(10.0, 10.0, 5.0));
//! let loops = TriangleSectioner
//!     .section_at(&cube, 2.5, &Vector3::z())
//!     .unwrap()
//!     .unwrap();
//!
//! assert_eq!(loops.len(), 1);
//! assert!(loops[0].is_closed());
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod bounds;
mod error;
mod item;
mod mesh;
mod section;

pub use bounds::Aabb;
pub use error::{SectionError, SectionResult};
pub use item::MeshItem;
pub use mesh::IndexedMesh;
pub use section::{Polyline, SectionAdapter, TriangleSectioner};

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point2, Point3, Vector3};
