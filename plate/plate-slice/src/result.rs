//! Slice run output.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::layer::Part;
use crate::params::BuildStyle;

/// Summary line for one part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartSummary {
    /// Part name.
    pub name: String,
    /// Number of layers produced.
    pub layer_count: usize,
    /// Z extent of the sliced mesh, `(min, max)` in mm.
    pub z_range: (f64, f64),
}

/// Summary of a complete slice run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceSummary {
    /// Layers over all parts.
    pub total_layers: usize,
    /// Per-part summaries in input order.
    pub parts: Vec<PartSummary>,
    /// Wall-clock slicing time in seconds.
    pub elapsed_s: f64,
    /// Estimated machine time in hours.
    pub estimated_build_hours: f64,
    /// Style the run used.
    pub style: BuildStyle,
}

impl SliceSummary {
    /// Summarize a set of parts.
    #[must_use]
    pub fn from_parts(
        parts: &[Part],
        style: &BuildStyle,
        elapsed_s: f64,
        estimated_build_hours: f64,
    ) -> Self {
        let parts: Vec<PartSummary> = parts
            .iter()
            .map(|p| PartSummary {
                name: p.name.clone(),
                layer_count: p.layer_count(),
                z_range: p.z_range(),
            })
            .collect();

        Self {
            total_layers: parts.iter().map(|p| p.layer_count).sum(),
            parts,
            elapsed_s,
            estimated_build_hours,
            style: style.clone(),
        }
    }
}

impl fmt::Display for SliceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} layers in {} part(s) at {:.3} mm, sliced in {:.1}s, estimated build {:.2} h",
            self.total_layers,
            self.parts.len(),
            self.style.layer_thickness_mm,
            self.elapsed_s,
            self.estimated_build_hours
        )
    }
}

/// Everything a slice run produced.
///
/// Superseded wholesale by the next run; never updated incrementally.
#[derive(Debug, Clone)]
pub struct SliceRun {
    /// Layer stacks in input order.
    pub parts: Vec<Part>,
    /// Run summary.
    pub summary: SliceSummary,
}

impl SliceRun {
    /// True if the run produced no parts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::Layer;
    use plate_mesh::{IndexedMesh, Point3};
    use std::sync::Arc;

    fn part(name: &str, layers: usize) -> Part {
        Part {
            id: name.to_string(),
            name: name.to_string(),
            mesh: Arc::new(IndexedMesh::cuboid(
                Point3::origin(),
                Point3::new(1.0, 1.0, 2.0),
            )),
            layers: (0..layers).map(|i| Layer::new(i, 0.0, Vec::new())).collect(),
        }
    }

    #[test]
    fn test_summary_from_parts() {
        let parts = [part("a", 3), part("b", 4)];
        let summary = SliceSummary::from_parts(&parts, &BuildStyle::default(), 0.25, 1.5);
        assert_eq!(summary.total_layers, 7);
        assert_eq!(summary.parts[1].name, "b");
        assert_eq!(summary.parts[0].z_range, (0.0, 2.0));
    }

    #[test]
    fn test_summary_display_and_json() {
        let summary = SliceSummary::from_parts(&[part("a", 10)], &BuildStyle::default(), 1.26, 0.5);
        assert_eq!(
            summary.to_string(),
            "10 layers in 1 part(s) at 0.030 mm, sliced in 1.3s, estimated build 0.50 h"
        );

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["total_layers"], 10);
        assert_eq!(json["style"]["layer_thickness_mm"], 0.03);
    }
}
