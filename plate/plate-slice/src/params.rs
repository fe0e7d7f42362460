//! Process parameters and slicer options.

use serde::{Deserialize, Serialize};

use crate::error::{SliceError, SliceResult};
use crate::presets::{MaterialPreset, QualityProfile};

/// Powder-bed process parameters for one build.
///
/// A plain value: two styles with equal fields are interchangeable. Missing
/// fields fall back to the defaults when loading from JSON.
///
/// # Example
///
/// ```
/// use plate_slice::BuildStyle;
///
/// let style = BuildStyle::default().with_layer_thickness(0.05);
/// assert_eq!(style.layer_thickness_mm, 0.05);
/// assert_eq!(style.laser_power_w, 200.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildStyle {
    /// Layer thickness in mm.
    pub layer_thickness_mm: f64,

    /// Laser power in W.
    pub laser_power_w: f64,

    /// Scan speed in mm/s.
    pub scan_speed_mm_per_s: f64,

    /// Distance between hatch lines in mm.
    pub hatch_spacing_mm: f64,

    /// Hatch rotation between consecutive layers in degrees.
    pub hatch_angle_increment_deg: f64,
}

impl Default for BuildStyle {
    fn default() -> Self {
        Self {
            layer_thickness_mm: 0.03,
            laser_power_w: 200.0,
            scan_speed_mm_per_s: 1000.0,
            hatch_spacing_mm: 0.10,
            hatch_angle_increment_deg: 67.0,
        }
    }
}

impl BuildStyle {
    /// Set the layer thickness.
    #[must_use]
    pub const fn with_layer_thickness(mut self, thickness_mm: f64) -> Self {
        self.layer_thickness_mm = thickness_mm;
        self
    }

    /// Set the laser power.
    #[must_use]
    pub const fn with_laser_power(mut self, power_w: f64) -> Self {
        self.laser_power_w = power_w;
        self
    }

    /// Set the scan speed.
    #[must_use]
    pub const fn with_scan_speed(mut self, speed_mm_per_s: f64) -> Self {
        self.scan_speed_mm_per_s = speed_mm_per_s;
        self
    }

    /// Set the hatch spacing.
    #[must_use]
    pub const fn with_hatch_spacing(mut self, spacing_mm: f64) -> Self {
        self.hatch_spacing_mm = spacing_mm;
        self
    }

    /// Take laser and hatch parameters from a material preset.
    ///
    /// Layer thickness is left unchanged.
    #[must_use]
    pub fn with_material(mut self, material: &MaterialPreset) -> Self {
        self.laser_power_w = material.laser_power_w;
        self.scan_speed_mm_per_s = material.scan_speed_mm_per_s;
        self.hatch_spacing_mm = material.hatch_spacing_mm;
        self.hatch_angle_increment_deg = material.hatch_angle_increment_deg;
        self
    }

    /// Take the layer thickness from a quality profile.
    #[must_use]
    pub fn with_profile(mut self, profile: &QualityProfile) -> Self {
        self.layer_thickness_mm = profile.layer_thickness_mm;
        self
    }

    /// Check that the style can drive a slice.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvalidLayerThickness`] if the layer thickness
    /// is not a positive finite number.
    pub fn validate(&self) -> SliceResult<()> {
        let t = self.layer_thickness_mm;
        if !t.is_finite() || t <= 0.0 {
            return Err(SliceError::InvalidLayerThickness(t));
        }
        Ok(())
    }

    /// Parse a style from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::Config`] for malformed JSON.
    pub fn from_json(text: &str) -> SliceResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Tuning knobs of the built-in slicer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlicerOptions {
    /// Report progress every this many layers within a part (minimum 1).
    pub progress_interval: usize,
}

impl Default for SlicerOptions {
    fn default() -> Self {
        Self {
            progress_interval: 20,
        }
    }
}

impl SlicerOptions {
    /// Set the progress interval.
    #[must_use]
    pub const fn with_progress_interval(mut self, layers: usize) -> Self {
        self.progress_interval = layers;
        self
    }
}
