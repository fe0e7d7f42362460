//! Planar slicing for build-plate scenes.
//!
//! This crate turns world-space meshes into stacks of horizontal contours
//! and writes them out for downstream build preparation:
//!
//! - [`PlanarSlicer`] - Built-in [`SliceBackend`], one cutting plane per layer
//! - [`SlicerService`] - Owns the backend and the latest [`SliceRun`]
//! - [`SliceJob`] - A slice running on a background thread
//! - [`BuildStyle`] / [`PresetTables`] - Process parameters and presets
//! - [`BuildTimeEstimate`] - Coarse machine-time model
//! - [`write_plan`] / [`preview_svg`] - ASCII layer file and SVG preview
//!
//! Input is a list of [`MeshItem`](plate_mesh::MeshItem) snapshots, so a
//! slice never sees later edits to the scene it came from.
//!
//! # Layer heights
//!
//! Each part is cut at `z_min + i * thickness` for
//! `i in 0..max(1, floor(height / thickness))`. A height where sectioning
//! fails is kept as an empty layer.
//!
//! # Example
//!
//! ```
//! use plate_mesh::{IndexedMesh, MeshItem, Point3};
//! use plate_slice::{BuildStyle, SliceProgress, SlicerService};
//!
//! let mut service = SlicerService::default();
//! let items = [MeshItem::new(
//!     "1",
//!     "bracket",
//!     IndexedMesh::cuboid(Point3::origin(), Point3::new(20.0, 10.0, 3.0)),
//! )];
//!
//! let mut last = 0.0;
//! let mut observer = |p: &SliceProgress| last = p.fraction;
//! let summary = service
//!     .slice(&items, &BuildStyle::default().with_layer_thickness(0.1), &mut observer)
//!     .unwrap();
//!
//! assert_eq!(summary.total_layers, 30);
//! assert_eq!(last, 1.0);
//! assert!(service.layer_preview_svg(0).unwrap().is_some());
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod estimate;
mod export;
mod layer;
mod params;
mod presets;
mod progress;
mod result;
mod service;
mod slicer;
mod worker;

pub use error::{SliceError, SliceResult};
pub use estimate::{
    BuildTimeEstimate, FALLBACK_FOOTPRINT_MM2, RECOAT_SECONDS, estimate_build_time,
    footprint_area,
};
pub use export::{preview_svg, write_plan};
pub use layer::{Layer, Part};
pub use params::{BuildStyle, SlicerOptions};
pub use presets::{MaterialPreset, PresetTables, QualityProfile};
pub use progress::{
    CancelToken, ChannelProgress, NullProgress, ObserverError, ProgressObserver, SliceProgress,
};
pub use result::{PartSummary, SliceRun, SliceSummary};
pub use service::SlicerService;
pub use slicer::{MAX_LAYERS_PER_PART, PlanarSlicer, SliceBackend, layer_heights};
pub use worker::SliceJob;
