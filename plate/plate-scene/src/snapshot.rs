//! Version-tagged project documents.
//!
//! A snapshot records the plate and the placement of every object, never the
//! geometry itself: meshes are re-resolved from their source paths on load.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SceneError, SceneResult};
use crate::plate::BuildPlate;
use crate::transform::Transform;

/// Version written by this crate.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// Structural snapshot of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    /// Format version, `"major.minor"`.
    pub version: String,
    /// Plate dimensions.
    pub build_plate: BuildPlate,
    /// Objects in scene order.
    #[serde(default)]
    pub objects: Vec<ObjectRecord>,
}

/// One object in a [`ProjectSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// Object id at save time.
    #[serde(alias = "uid")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Mesh source path; empty when the mesh was not loaded from a file.
    #[serde(default)]
    pub source_path: String,
    /// Placement.
    pub transform: TransformRecord,
    /// Visibility flag.
    #[serde(default = "default_visible")]
    pub visible: bool,
}

/// Plain-array form of a [`Transform`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformRecord {
    /// Translation in mm.
    pub translation: [f64; 3],
    /// Rotation in degrees.
    pub rotation_deg: [f64; 3],
    /// Scale factors.
    pub scale: [f64; 3],
}

const fn default_visible() -> bool {
    true
}

impl From<&Transform> for TransformRecord {
    fn from(t: &Transform) -> Self {
        Self {
            translation: t.translation().into(),
            rotation_deg: t.rotation_deg().into(),
            scale: t.scale().into(),
        }
    }
}

impl TryFrom<&TransformRecord> for Transform {
    type Error = SceneError;

    fn try_from(record: &TransformRecord) -> SceneResult<Self> {
        Self::new(
            record.translation.into(),
            record.rotation_deg.into(),
            record.scale.into(),
        )
    }
}

impl ProjectSnapshot {
    /// Parse a snapshot from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Json`] for malformed input and
    /// [`SceneError::UnsupportedVersion`] for a major version other than 1.
    pub fn from_json(text: &str) -> SceneResult<Self> {
        let snapshot: Self = serde_json::from_str(text)?;
        let major = snapshot.version.split('.').next().unwrap_or_default();
        if major != "1" {
            return Err(SceneError::UnsupportedVersion {
                found: snapshot.version,
            });
        }
        Ok(snapshot)
    }

    /// Serialize to indented JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Json`] if serialization fails.
    pub fn to_json_pretty(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read and parse a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::IoRead`] if the file cannot be read, or any
    /// error from [`from_json`](Self::from_json).
    pub fn load_json<P: AsRef<Path>>(path: P) -> SceneResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SceneError::IoRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}
