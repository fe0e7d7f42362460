//! Coarse build-time estimation.
//!
//! The model is an area proxy, not a scan-vector simulation: every layer is
//! assumed to be hatched over the full combined footprint of all parts, with
//! lines as long as the square root of that area (at least 1 mm). It is meant for comparing
//! layouts and styles, not for scheduling a machine.

// Layer counts fit comfortably in f64.
#![allow(clippy::cast_precision_loss)]

use plate_mesh::MeshItem;
use serde::{Deserialize, Serialize};

use crate::params::BuildStyle;

/// Recoater time added to every layer, in seconds.
pub const RECOAT_SECONDS: f64 = 8.0;

/// Footprint assumed when no meshes are supplied, in mm².
pub const FALLBACK_FOOTPRINT_MM2: f64 = 2500.0;

const MIN_HATCH_SPACING_MM: f64 = 0.01;
const MIN_SCAN_SPEED_MM_PER_S: f64 = 1.0;
const MIN_LINE_LENGTH_MM: f64 = 1.0;

/// Breakdown of a build-time estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildTimeEstimate {
    /// Combined XY footprint used by the model, in mm².
    pub footprint_area_mm2: f64,
    /// Laser time per layer in seconds.
    pub scan_seconds_per_layer: f64,
    /// Recoat time per layer in seconds.
    pub recoat_seconds_per_layer: f64,
    /// Number of layers.
    pub layers: usize,
}

impl BuildTimeEstimate {
    /// Estimate for `layers` layers.
    ///
    /// Without meshes, or with an empty list, the footprint falls back to
    /// [`FALLBACK_FOOTPRINT_MM2`].
    #[must_use]
    pub fn new(style: &BuildStyle, layers: usize, items: Option<&[MeshItem]>) -> Self {
        let footprint_area_mm2 = match items {
            Some(items) if !items.is_empty() => footprint_area(items),
            _ => FALLBACK_FOOTPRINT_MM2,
        };

        let hatch = style.hatch_spacing_mm.max(MIN_HATCH_SPACING_MM);
        let speed = style.scan_speed_mm_per_s.max(MIN_SCAN_SPEED_MM_PER_S);
        let lines_per_layer = footprint_area_mm2 / hatch;
        let line_length = footprint_area_mm2.sqrt().max(MIN_LINE_LENGTH_MM);
        let scan_seconds_per_layer = lines_per_layer * line_length / speed;

        Self {
            footprint_area_mm2,
            scan_seconds_per_layer,
            recoat_seconds_per_layer: RECOAT_SECONDS,
            layers,
        }
    }

    /// Total time in seconds.
    #[must_use]
    pub fn total_seconds(&self) -> f64 {
        (self.scan_seconds_per_layer + self.recoat_seconds_per_layer) * self.layers as f64
    }

    /// Total time in hours.
    #[must_use]
    pub fn hours(&self) -> f64 {
        self.total_seconds() / 3600.0
    }
}

/// Estimated build time in hours.
///
/// # Example
///
/// ```
/// use plate_slice::{BuildStyle, estimate_build_time};
///
/// // 2500 mm² fallback at 0.1 mm hatch and 1000 mm/s: 1250 s + 8 s per layer.
/// let hours = estimate_build_time(&BuildStyle::default(), 100, None);
/// assert!((hours - 1258.0 * 100.0 / 3600.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn estimate_build_time(
    style: &BuildStyle,
    total_layers: usize,
    items: Option<&[MeshItem]>,
) -> f64 {
    BuildTimeEstimate::new(style, total_layers, items).hours()
}

/// Sum over items of world X extent times Y extent, in mm².
#[must_use]
pub fn footprint_area(items: &[MeshItem]) -> f64 {
    items.iter().map(|item| item.mesh.bounds().footprint_area()).sum()
}
