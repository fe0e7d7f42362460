//! Cylindrical build volume and placement checks.

use std::fmt;

use plate_mesh::Aabb;
use serde::{Deserialize, Serialize};

use crate::object::ObjectId;

/// How far below `Z = 0` an object may reach before it is flagged, in mm.
///
/// Absorbs rounding left over from resting a mesh on the plate.
pub const Z_TOLERANCE_MM: f64 = 0.01;

/// Cylindrical build volume centered on the world origin.
///
/// The plate surface is the `Z = 0` plane.
///
/// # Example
///
/// ```
/// use plate_scene::BuildPlate;
///
/// let plate = BuildPlate::default();
/// assert_eq!(plate.diameter_mm, 120.0);
/// assert_eq!(plate.radius(), 60.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildPlate {
    /// Plate diameter in mm.
    pub diameter_mm: f64,
    /// Usable build height in mm.
    pub height_mm: f64,
}

impl Default for BuildPlate {
    fn default() -> Self {
        Self {
            diameter_mm: 120.0,
            height_mm: 20.0,
        }
    }
}

impl BuildPlate {
    /// Create a plate with the given dimensions.
    #[must_use]
    pub const fn new(diameter_mm: f64, height_mm: f64) -> Self {
        Self {
            diameter_mm,
            height_mm,
        }
    }

    /// Plate radius in mm.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.diameter_mm / 2.0
    }

    /// Check world-space bounds against the plate.
    ///
    /// An empty box never violates anything.
    #[must_use]
    pub fn violations(&self, bounds: &Aabb) -> Vec<VolumeViolation> {
        let mut found = Vec::new();
        if bounds.is_empty() {
            return found;
        }

        let radius = self.radius();
        if bounds
            .footprint_corners()
            .iter()
            .any(|&(x, y)| x.hypot(y) > radius)
        {
            found.push(VolumeViolation::OutsideRadius);
        }

        if bounds.min.z < -Z_TOLERANCE_MM {
            found.push(VolumeViolation::BelowPlate { z_min: bounds.min.z });
        }

        found
    }
}

/// Why an object fails the build-volume check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VolumeViolation {
    /// A footprint corner lies outside the plate radius.
    OutsideRadius,
    /// The object reaches below the plate surface.
    BelowPlate {
        /// Lowest world Z of the object.
        z_min: f64,
    },
}

impl fmt::Display for VolumeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutsideRadius => f.write_str("extends outside build plate radius"),
            Self::BelowPlate { z_min } => write!(f, "extends below build plate (Z={z_min:.2})"),
        }
    }
}

/// One build-volume finding for one object.
///
/// An object with several problems yields several issues.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeIssue {
    /// Offending object.
    pub id: ObjectId,
    /// Object name at the time of the check.
    pub name: String,
    /// What is wrong.
    pub violation: VolumeViolation,
}

impl fmt::Display for VolumeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.violation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plate_mesh::Point3;

    fn boxed(min: (f64, f64, f64), max: (f64, f64, f64)) -> Aabb {
        Aabb::new(Point3::new(min.0, min.1, min.2), Point3::new(max.0, max.1, max.2))
    }

    #[test]
    fn test_inside_plate() {
        let plate = BuildPlate::default();
        let bounds = boxed((-5.0, -5.0, 0.0), (5.0, 5.0, 5.0));
        assert!(plate.violations(&bounds).is_empty());
    }

    #[test]
    fn test_corner_outside_radius() {
        let plate = BuildPlate::default();
        // Center inside, but the (45, 45) corner is ~63.6 mm out.
        let bounds = boxed((35.0, 35.0, 0.0), (45.0, 45.0, 5.0));
        assert_eq!(plate.violations(&bounds), vec![VolumeViolation::OutsideRadius]);
    }

    #[test]
    fn test_below_plate_tolerance() {
        let plate = BuildPlate::default();
        let resting = boxed((-1.0, -1.0, -0.005), (1.0, 1.0, 1.0));
        assert!(plate.violations(&resting).is_empty());

        let sunk = boxed((-1.0, -1.0, -2.0), (1.0, 1.0, 1.0));
        let found = plate.violations(&sunk);
        assert_eq!(found, vec![VolumeViolation::BelowPlate { z_min: -2.0 }]);
        assert_eq!(found[0].to_string(), "extends below build plate (Z=-2.00)");
    }

    #[test]
    fn test_multiple_violations() {
        let plate = BuildPlate::new(20.0, 10.0);
        let bounds = boxed((50.0, 0.0, -3.0), (60.0, 5.0, 1.0));
        assert_eq!(plate.violations(&bounds).len(), 2);
    }

    #[test]
    fn test_issue_display() {
        let issue = VolumeIssue {
            id: ObjectId::new(1),
            name: "bracket".to_string(),
            violation: VolumeViolation::OutsideRadius,
        };
        assert_eq!(issue.to_string(), "bracket: extends outside build plate radius");
    }

    #[test]
    fn test_plate_json() {
        let plate: BuildPlate =
            serde_json::from_str(r#"{"diameter_mm": 100.0, "height_mm": 30.0}"#).unwrap();
        assert_eq!(plate, BuildPlate::new(100.0, 30.0));
    }
}
