//! Material and quality-profile preset tables.
//!
//! The tables are plain values handed to whoever builds a [`BuildStyle`];
//! nothing in the slicer reads them implicitly.

use serde::{Deserialize, Serialize};

use crate::error::SliceResult;
use crate::params::BuildStyle;

/// Laser and hatch parameters tuned for one powder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialPreset {
    /// Material name, e.g. `"Ti-6Al-4V"`.
    pub name: String,
    /// Laser power in W.
    pub laser_power_w: f64,
    /// Scan speed in mm/s.
    pub scan_speed_mm_per_s: f64,
    /// Hatch spacing in mm.
    pub hatch_spacing_mm: f64,
    /// Hatch rotation between layers in degrees.
    pub hatch_angle_increment_deg: f64,
}

impl MaterialPreset {
    /// Create a material preset.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        laser_power_w: f64,
        scan_speed_mm_per_s: f64,
        hatch_spacing_mm: f64,
        hatch_angle_increment_deg: f64,
    ) -> Self {
        Self {
            name: name.into(),
            laser_power_w,
            scan_speed_mm_per_s,
            hatch_spacing_mm,
            hatch_angle_increment_deg,
        }
    }
}

/// A named layer thickness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityProfile {
    /// Profile name, e.g. `"Fine (20 µm)"`.
    pub name: String,
    /// Layer thickness in mm.
    pub layer_thickness_mm: f64,
}

impl QualityProfile {
    /// Create a quality profile.
    #[must_use]
    pub fn new(name: impl Into<String>, layer_thickness_mm: f64) -> Self {
        Self {
            name: name.into(),
            layer_thickness_mm,
        }
    }
}

/// Lookup tables of materials and quality profiles.
///
/// # Example
///
/// ```
/// use plate_slice::PresetTables;
///
/// let presets = PresetTables::default();
/// let style = presets.style_for("AlSi10Mg", "Draft (50 µm)").unwrap();
/// assert_eq!(style.laser_power_w, 350.0);
/// assert_eq!(style.layer_thickness_mm, 0.05);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetTables {
    /// Materials in display order.
    pub materials: Vec<MaterialPreset>,
    /// Quality profiles in display order.
    pub profiles: Vec<QualityProfile>,
}

impl Default for PresetTables {
    fn default() -> Self {
        Self {
            materials: vec![
                MaterialPreset::new("Ti-6Al-4V", 200.0, 1000.0, 0.10, 67.0),
                MaterialPreset::new("316L Stainless", 175.0, 800.0, 0.12, 67.0),
                MaterialPreset::new("AlSi10Mg", 350.0, 1300.0, 0.15, 67.0),
                MaterialPreset::new("IN718", 285.0, 960.0, 0.11, 67.0),
            ],
            profiles: vec![
                QualityProfile::new("Fine (20 µm)", 0.020),
                QualityProfile::new("Normal (30 µm)", 0.030),
                QualityProfile::new("Draft (50 µm)", 0.050),
            ],
        }
    }
}

impl PresetTables {
    /// Look up a material by name.
    #[must_use]
    pub fn material(&self, name: &str) -> Option<&MaterialPreset> {
        self.materials.iter().find(|m| m.name == name)
    }

    /// Look up a quality profile by name.
    #[must_use]
    pub fn profile(&self, name: &str) -> Option<&QualityProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// Build a style from a material and a profile, starting from defaults.
    ///
    /// Returns `None` if either name is unknown.
    #[must_use]
    pub fn style_for(&self, material: &str, profile: &str) -> Option<BuildStyle> {
        Some(
            BuildStyle::default()
                .with_material(self.material(material)?)
                .with_profile(self.profile(profile)?),
        )
    }

    /// Parse tables from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::Config`](crate::SliceError::Config) for
    /// malformed JSON.
    pub fn from_json(text: &str) -> SliceResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_tables() {
        let presets = PresetTables::default();
        assert_eq!(presets.materials.len(), 4);
        assert_eq!(presets.profiles.len(), 3);

        let steel = presets.material("316L Stainless").unwrap();
        assert_relative_eq!(steel.scan_speed_mm_per_s, 800.0);
        assert_relative_eq!(presets.profile("Fine (20 µm)").unwrap().layer_thickness_mm, 0.020);
        assert!(presets.material("Unobtainium").is_none());
    }

    #[test]
    fn test_style_for() {
        let presets = PresetTables::default();
        let style = presets.style_for("IN718", "Normal (30 µm)").unwrap();
        assert_relative_eq!(style.laser_power_w, 285.0);
        assert_relative_eq!(style.hatch_spacing_mm, 0.11);
        assert_relative_eq!(style.layer_thickness_mm, 0.030);
        assert!(presets.style_for("IN718", "Ultra").is_none());
    }

    #[test]
    fn test_tables_from_json() {
        let json = serde_json::to_string(&PresetTables::default()).unwrap();
        assert_eq!(PresetTables::from_json(&json).unwrap(), PresetTables::default());

        let custom = PresetTables::from_json(
            r#"{"materials": [], "profiles": [{"name": "Coarse", "layer_thickness_mm": 0.08}]}"#,
        )
        .unwrap();
        assert!(custom.materials.is_empty());
        assert_relative_eq!(custom.profile("Coarse").unwrap().layer_thickness_mm, 0.08);
    }
}
