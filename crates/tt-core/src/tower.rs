//! Monopole tower description: pole sections, platforms, foundation.
//!
//! Dimensions follow the fabrication drawings the values come from: pole
//! geometry and bolts in millimetres, platform heights in metres.
//!
//! ```json
//! "tower": {
//!   "sections":   [{ "heightMm": 15000, "diameterBottomMm": 628,
//!                    "diameterTopMm": 250, "thicknessMm": 5 }],
//!   "exposure":   "C",
//!   "steelGrade": "S355",
//!   "foundation": { "boltCircleDiameterMm": 750, "boltCount": 16,
//!                   "boltDiameterMm": 22, "boltGradeMpa": 420 },
//!   "platforms":  [{ "heightM": 14.0, "weightKg": 150, "windAreaM2": 1.5 }]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// ASCE 7 terrain exposure category.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum Exposure {
    /// Urban and suburban terrain.
    B,
    /// Open terrain with scattered obstructions.
    #[default]
    C,
    /// Flat, unobstructed terrain and water surfaces.
    D,
}

/// Structural steel grade of the pole shaft.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum SteelGrade {
    A36,
    #[serde(rename = "A572-50")]
    A572Gr50,
    A992,
    #[default]
    S355,
}

impl SteelGrade {
    /// Minimum yield strength, MPa.
    pub fn yield_strength_mpa(self) -> f64 {
        match self {
            SteelGrade::A36 => 248.0,
            SteelGrade::A572Gr50 | SteelGrade::A992 => 345.0,
            SteelGrade::S355 => 355.0,
        }
    }
}

/// One tapered tubular section, listed bottom first.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoleSection {
    pub height_mm:          f64,
    pub diameter_bottom_mm: f64,
    pub diameter_top_mm:    f64,
    pub thickness_mm:       f64,
}

impl PoleSection {
    #[inline]
    pub fn mean_diameter_mm(&self) -> f64 {
        (self.diameter_bottom_mm + self.diameter_top_mm) * 0.5
    }
}

/// Anchor bolt group tying the base plate to the foundation.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorBolts {
    pub bolt_circle_diameter_mm: f64,
    pub bolt_count:              u32,
    pub bolt_diameter_mm:        f64,
    /// Tensile strength of the bolt material, MPa.
    pub bolt_grade_mpa:          f64,
}

/// Dead weight and sail area of one piece of mounted equipment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentLoad {
    #[serde(default)]
    pub label:            String,
    pub weight_kg:        f64,
    pub wind_area_m2:     f64,
    #[serde(default = "default_equipment_drag")]
    pub drag_coefficient: f64,
}

/// Crown or mid-height platform.  Simulated devices are mounted on the
/// platform nearest their height; `equipment` lists anything else it carries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    pub height_m:         f64,
    pub weight_kg:        f64,
    #[serde(default)]
    pub wind_area_m2:     f64,
    #[serde(default = "default_platform_drag")]
    pub drag_coefficient: f64,
    #[serde(default)]
    pub equipment:        Vec<EquipmentLoad>,
}

fn positive(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

fn default_equipment_drag() -> f64 {
    1.0
}

fn default_platform_drag() -> f64 {
    1.5
}

/// Structural description of the site's monopole.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TowerConfig {
    pub sections:        Vec<PoleSection>,
    #[serde(default)]
    pub exposure:        Exposure,
    #[serde(default)]
    pub steel_grade:     SteelGrade,
    /// `None` checks the pole shaft only.
    #[serde(default)]
    pub foundation:      Option<AnchorBolts>,
    #[serde(default)]
    pub platforms:       Vec<Platform>,
    /// Extra load assumed hanging at the tower top, kg.
    #[serde(default)]
    pub applied_load_kg: f64,
}

impl TowerConfig {
    /// Sum of section heights, m.
    pub fn height_m(&self) -> f64 {
        self.sections.iter().map(|s| s.height_mm).sum::<f64>() / 1_000.0
    }

    /// Reject geometry the structural check cannot evaluate.
    pub fn validate(&self) -> CoreResult<()> {
        if self.sections.is_empty() {
            return Err(CoreError::Config("tower needs at least one pole section".into()));
        }
        for (i, s) in self.sections.iter().enumerate() {
            let dims = [s.height_mm, s.diameter_bottom_mm, s.diameter_top_mm, s.thickness_mm];
            if !dims.into_iter().all(positive) {
                return Err(CoreError::Config(format!(
                    "tower section {i}: dimensions must be positive"
                )));
            }
            if 2.0 * s.thickness_mm >= s.diameter_bottom_mm.min(s.diameter_top_mm) {
                return Err(CoreError::Config(format!(
                    "tower section {i}: wall thickness exceeds the radius"
                )));
            }
        }
        if let Some(bolts) = &self.foundation {
            if bolts.bolt_count < 2
                || !positive(bolts.bolt_circle_diameter_mm)
                || !positive(bolts.bolt_diameter_mm)
                || !positive(bolts.bolt_grade_mpa)
            {
                return Err(CoreError::Config(
                    "foundation needs at least two bolts with positive dimensions".into(),
                ));
            }
        }
        let height = self.height_m();
        if let Some(p) = self.platforms.iter().find(|p| !positive(p.height_m) || p.height_m > height) {
            return Err(CoreError::Config(format!(
                "platform at {} m is outside the {height} m pole",
                p.height_m
            )));
        }
        if self.applied_load_kg < 0.0 {
            return Err(CoreError::Config("appliedLoadKg must not be negative".into()));
        }
        Ok(())
    }
}
