//! Object placement: translation, rotation and scale.

use std::fmt;
use std::str::FromStr;

use nalgebra::{Matrix4, Vector3};
use plate_mesh::IndexedMesh;
use thiserror::Error;

use crate::error::{SceneError, SceneResult};

/// A world axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The X axis.
    X,
    /// The Y axis.
    Y,
    /// The Z axis (build direction).
    Z,
}

impl Axis {
    /// All three axes in order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Component index of this axis in a vector.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Upper-case axis letter.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when parsing an [`Axis`] from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown axis '{0}', expected X, Y or Z")]
pub struct ParseAxisError(pub String);

impl FromStr for Axis {
    type Err = ParseAxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "x" | "X" => Ok(Self::X),
            "y" | "Y" => Ok(Self::Y),
            "z" | "Z" => Ok(Self::Z),
            other => Err(ParseAxisError(other.to_string())),
        }
    }
}

/// Affine placement of one scene object.
///
/// The composed matrix is `T · Rz · Ry · Rx · S`: scale first, then rotate
/// about X, Y and Z (extrinsic), then translate. Rotations are in degrees.
/// Scale components may be negative (mirroring) but never zero.
///
/// # Example
///
/// ```
/// use plate_scene::{Axis, Transform};
///
/// let mut t = Transform::identity();
/// t.mirror(Axis::X);
/// assert_eq!(t.scale().x, -1.0);
/// t.mirror(Axis::X);
/// assert_eq!(t, Transform::identity());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    translation: Vector3<f64>,
    rotation_deg: Vector3<f64>,
    scale: Vector3<f64>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Create a transform from its three components.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::DegenerateScale`] if any scale component is zero.
    pub fn new(
        translation: Vector3<f64>,
        rotation_deg: Vector3<f64>,
        scale: Vector3<f64>,
    ) -> SceneResult<Self> {
        check_scale(&scale)?;
        Ok(Self {
            translation,
            rotation_deg,
            scale,
        })
    }

    /// The identity transform.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation_deg: Vector3::zeros(),
            scale: Vector3::repeat(1.0),
        }
    }

    /// A pure translation.
    #[must_use]
    pub fn from_translation(translation: Vector3<f64>) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    /// Translation in millimeters.
    #[must_use]
    pub const fn translation(&self) -> Vector3<f64> {
        self.translation
    }

    /// Rotation about X, Y and Z in degrees.
    #[must_use]
    pub const fn rotation_deg(&self) -> Vector3<f64> {
        self.rotation_deg
    }

    /// Per-axis scale factors.
    #[must_use]
    pub const fn scale(&self) -> Vector3<f64> {
        self.scale
    }

    /// Apply a partial update. Fields absent from `update` are unchanged.
    ///
    /// The update is all-or-nothing: on error the transform is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::DegenerateScale`] if the new scale has a zero
    /// component.
    pub fn set(&mut self, update: &TransformUpdate) -> SceneResult<()> {
        if let Some(scale) = &update.scale {
            check_scale(scale)?;
        }
        if let Some(translation) = update.translation {
            self.translation = translation;
        }
        if let Some(rotation_deg) = update.rotation_deg {
            self.rotation_deg = rotation_deg;
        }
        if let Some(scale) = update.scale {
            self.scale = scale;
        }
        Ok(())
    }

    /// Shift the translation by `offset`.
    pub fn translate_by(&mut self, offset: &Vector3<f64>) {
        self.translation += offset;
    }

    /// Overwrite the X and Y translation, keeping Z.
    pub fn place_xy(&mut self, x: f64, y: f64) {
        self.translation.x = x;
        self.translation.y = y;
    }

    /// Mirror across the plane perpendicular to `axis` by negating its scale.
    pub fn mirror(&mut self, axis: Axis) {
        let i = axis.index();
        self.scale[i] = -self.scale[i];
    }

    /// The composed 4x4 homogeneous matrix.
    #[must_use]
    pub fn to_matrix(&self) -> Matrix4<f64> {
        let r = self.rotation_deg.map(f64::to_radians);
        Matrix4::new_translation(&self.translation)
            * rotation_z(r.z)
            * rotation_y(r.y)
            * rotation_x(r.x)
            * Matrix4::new_nonuniform_scaling(&self.scale)
    }

    /// Bake this transform into a fresh copy of `mesh`.
    #[must_use]
    pub fn apply_to(&self, mesh: &IndexedMesh) -> IndexedMesh {
        mesh.transformed(&self.to_matrix())
    }
}

/// A partial [`Transform`] update.
///
/// # Example
///
/// ```
/// use plate_scene::{Transform, TransformUpdate};
/// use nalgebra::Vector3;
///
/// let mut t = Transform::identity();
/// t.set(&TransformUpdate::new().with_translation(Vector3::new(5.0, 0.0, 0.0))).unwrap();
/// assert_eq!(t.translation().x, 5.0);
/// assert_eq!(t.scale(), Vector3::repeat(1.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransformUpdate {
    /// New translation, if changing.
    pub translation: Option<Vector3<f64>>,
    /// New rotation in degrees, if changing.
    pub rotation_deg: Option<Vector3<f64>>,
    /// New scale, if changing.
    pub scale: Option<Vector3<f64>>,
}

impl TransformUpdate {
    /// An update that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the translation.
    #[must_use]
    pub fn with_translation(mut self, translation: Vector3<f64>) -> Self {
        self.translation = Some(translation);
        self
    }

    /// Set the rotation in degrees.
    #[must_use]
    pub fn with_rotation_deg(mut self, rotation_deg: Vector3<f64>) -> Self {
        self.rotation_deg = Some(rotation_deg);
        self
    }

    /// Set the scale.
    #[must_use]
    pub fn with_scale(mut self, scale: Vector3<f64>) -> Self {
        self.scale = Some(scale);
        self
    }

    /// True if no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.translation.is_none() && self.rotation_deg.is_none() && self.scale.is_none()
    }
}

fn check_scale(scale: &Vector3<f64>) -> SceneResult<()> {
    for axis in Axis::ALL {
        if scale[axis.index()] == 0.0 {
            return Err(SceneError::DegenerateScale { axis });
        }
    }
    Ok(())
}

fn rotation_x(angle: f64) -> Matrix4<f64> {
    let (s, c) = angle.sin_cos();
    #[rustfmt::skip]
    let m = Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0,   c,  -s, 0.0,
        0.0,   s,   c, 0.0,
        0.0, 0.0, 0.0, 1.0,
    );
    m
}

fn rotation_y(angle: f64) -> Matrix4<f64> {
    let (s, c) = angle.sin_cos();
    #[rustfmt::skip]
    let m = Matrix4::new(
          c, 0.0,   s, 0.0,
        0.0, 1.0, 0.0, 0.0,
         -s, 0.0,   c, 0.0,
        0.0, 0.0, 0.0, 1.0,
    );
    m
}

fn rotation_z(angle: f64) -> Matrix4<f64> {
    let (s, c) = angle.sin_cos();
    #[rustfmt::skip]
    let m = Matrix4::new(
          c,  -s, 0.0, 0.0,
          s,   c, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    );
    m
}
