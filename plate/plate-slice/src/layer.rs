//! Layers and per-part layer stacks.

use std::sync::Arc;

use plate_mesh::{IndexedMesh, Polyline};

/// One horizontal cross-section.
///
/// An empty contour list is valid: the height either held no material or
/// could not be sectioned.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Layer index within its part, from 0 at the bottom.
    pub index: usize,
    /// Z height of the cutting plane in mm.
    pub z_height: f64,
    /// Boundary polylines in XY.
    pub contours: Vec<Polyline>,
}

impl Layer {
    /// Create a layer.
    #[must_use]
    pub const fn new(index: usize, z_height: f64, contours: Vec<Polyline>) -> Self {
        Self {
            index,
            z_height,
            contours,
        }
    }

    /// True if the layer has no contours.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Total number of points over all contours.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.contours.iter().map(Polyline::len).sum()
    }
}

/// The layer stack produced for one input mesh.
///
/// Never modified after the run that produced it.
#[derive(Debug, Clone)]
pub struct Part {
    /// Id of the mesh item this part was sliced from.
    pub id: String,
    /// Display name.
    pub name: String,
    /// The world-space mesh that was sliced.
    pub mesh: Arc<IndexedMesh>,
    /// Layers in ascending Z.
    pub layers: Vec<Layer>,
}

impl Part {
    /// Number of layers.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Z extent of the sliced mesh, `(0, 0)` for an empty mesh.
    #[must_use]
    pub fn z_range(&self) -> (f64, f64) {
        let bounds = self.mesh.bounds();
        if bounds.is_empty() {
            (0.0, 0.0)
        } else {
            (bounds.min.z, bounds.max.z)
        }
    }

    /// Number of layers without contours.
    #[must_use]
    pub fn empty_layer_count(&self) -> usize {
        self.layers.iter().filter(|l| l.is_empty()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plate_mesh::{Point2, Point3};

    #[test]
    fn test_layer_counts() {
        let square = Polyline::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 0.0),
        ]);
        let layer = Layer::new(0, 0.5, vec![square.clone(), square]);
        assert!(!layer.is_empty());
        assert_eq!(layer.point_count(), 8);
        assert!(Layer::new(1, 1.0, Vec::new()).is_empty());
    }

    #[test]
    fn test_part_z_range() {
        let mesh = IndexedMesh::cuboid(Point3::new(0.0, 0.0, 2.0), Point3::new(1.0, 1.0, 6.0));
        let part = Part {
            id: "1".to_string(),
            name: "p".to_string(),
            mesh: Arc::new(mesh),
            layers: vec![Layer::new(0, 2.0, Vec::new())],
        };
        assert_eq!(part.z_range(), (2.0, 6.0));
        assert_eq!(part.layer_count(), 1);
        assert_eq!(part.empty_layer_count(), 1);

        let hollow = Part {
            mesh: Arc::new(IndexedMesh::new()),
            ..part
        };
        assert_eq!(hollow.z_range(), (0.0, 0.0));
    }
}
