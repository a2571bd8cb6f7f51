//! Monopole structural check under the current wind.
//!
//! ```text
//! dead load    steel shell (7850 kg/m³) + platforms + mounted equipment
//! wind         pole sections: Cf 0.5 on the projected area, at mid-height
//!              platforms and equipment: own Cf and area, at platform height
//! capacity     min(pole:    S · fy / 2,
//!                  anchors: n/2 · 0.75 · A · fu · r / 2)
//! utilization  max over the ASCE 7 combinations of M / capacity
//! ```
//!
//! Dead load acts along the pole axis and adds no overturning moment.  Only
//! the tower's `appliedLoadKg`, hung at the top, contributes `m · g · H`.
//!
//! The pole is checked at its base, where both the moment and the section
//! are largest.

use std::fmt;

use tt_core::{
    AnchorBolts, Device, DeviceSpec, EquipmentLoad, Exposure, Platform, PoleSection, SteelGrade,
    TowerConfig,
};

use crate::wind;

pub const STEEL_DENSITY_KG_M3: f64 = 7_850.0;
pub const GRAVITY_MS2: f64 = 9.81;

/// Drag coefficient of a round tubular shaft.
const POLE_DRAG: f64 = 0.5;

/// Nominal capacity over allowable capacity, pole and foundation alike.
const SAFETY_FACTOR: f64 = 2.0;

/// Usable fraction of an anchor bolt's tensile strength.
const BOLT_TENSION_FACTOR: f64 = 0.75;

// ── Status ────────────────────────────────────────────────────────────────────

/// Utilization band, ordered from most reserve to overstressed.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum StructuralStatus {
    /// ≤ 60 %.
    Conservative,
    /// ≤ 80 %.
    Good,
    /// ≤ 90 %.
    Warning,
    /// ≤ 100 %.
    Critical,
    Fail,
}

impl StructuralStatus {
    pub fn from_utilization(utilization: f64) -> Self {
        if utilization > 1.0 {
            StructuralStatus::Fail
        } else if utilization > 0.9 {
            StructuralStatus::Critical
        } else if utilization > 0.8 {
            StructuralStatus::Warning
        } else if utilization > 0.6 {
            StructuralStatus::Good
        } else {
            StructuralStatus::Conservative
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StructuralStatus::Conservative => "conservative",
            StructuralStatus::Good => "good",
            StructuralStatus::Warning => "warning",
            StructuralStatus::Critical => "critical",
            StructuralStatus::Fail => "fail",
        }
    }
}

impl fmt::Display for StructuralStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which resistance limits the tower.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum GoverningElement {
    Pole,
    Foundation,
}

// ── Load combinations ─────────────────────────────────────────────────────────

/// ASCE 7 strength (LRFD) and allowable-stress (ASD) combinations.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum LoadCombination {
    Lrfd14D,
    Lrfd12D16W,
    Lrfd12D10W,
    Lrfd09D16W,
    AsdD,
    AsdDW,
    AsdD075W,
    Asd06D06W,
}

impl LoadCombination {
    pub const ALL: [LoadCombination; 8] = [
        LoadCombination::Lrfd14D,
        LoadCombination::Lrfd12D16W,
        LoadCombination::Lrfd12D10W,
        LoadCombination::Lrfd09D16W,
        LoadCombination::AsdD,
        LoadCombination::AsdDW,
        LoadCombination::AsdD075W,
        LoadCombination::Asd06D06W,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LoadCombination::Lrfd14D => "LRFD 1.4D",
            LoadCombination::Lrfd12D16W => "LRFD 1.2D+1.6W",
            LoadCombination::Lrfd12D10W => "LRFD 1.2D+1.0W",
            LoadCombination::Lrfd09D16W => "LRFD 0.9D+1.6W",
            LoadCombination::AsdD => "ASD D",
            LoadCombination::AsdDW => "ASD D+W",
            LoadCombination::AsdD075W => "ASD D+0.75W",
            LoadCombination::Asd06D06W => "ASD 0.6D+0.6W",
        }
    }

    /// Wind load factor.  `None` for the dead-load-only combinations, which
    /// put no bending moment on the base.
    pub fn wind_factor(self) -> Option<f64> {
        match self {
            LoadCombination::Lrfd14D | LoadCombination::AsdD => None,
            LoadCombination::Lrfd12D16W | LoadCombination::Lrfd09D16W => Some(1.6),
            LoadCombination::Lrfd12D10W | LoadCombination::AsdDW => Some(1.0),
            LoadCombination::AsdD075W => Some(0.75),
            LoadCombination::Asd06D06W => Some(0.6),
        }
    }

    /// Base moment under this combination, N·m.
    pub fn moment_nm(self, applied_moment_nm: f64, wind_moment_nm: f64) -> f64 {
        self.wind_factor()
            .map_or(0.0, |factor| applied_moment_nm + factor * wind_moment_nm)
    }
}

impl fmt::Display for LoadCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CombinationCheck {
    pub combination: LoadCombination,
    pub moment_nm:   f64,
    pub utilization: f64,
}

// ── Report ────────────────────────────────────────────────────────────────────

/// Outcome of one structural check.
#[derive(Clone, Debug, PartialEq)]
pub struct StructuralReport {
    pub wind_speed_ms:         f64,
    pub pole_weight_kg:        f64,
    /// Platforms plus everything mounted on the pole.
    pub equipment_weight_kg:   f64,
    pub wind_force_n:          f64,
    pub wind_moment_nm:        f64,
    pub applied_moment_nm:     f64,
    /// Allowable base moment of the governing element, N·m.
    pub capacity_nm:           f64,
    pub governing_element:     GoverningElement,
    pub checks:                [CombinationCheck; 8],
    pub governing_combination: LoadCombination,
    pub max_utilization:       f64,
    /// Mass that could hang at the top with no wind, kg.
    pub max_load_capacity_kg:  f64,
    /// Mass that could still be added at the top under the governing
    /// combination, kg.  Negative when overstressed.
    pub remaining_capacity_kg: f64,
    pub status:                StructuralStatus,
}

impl StructuralReport {
    #[inline]
    pub fn dead_load_kg(&self) -> f64 {
        self.pole_weight_kg + self.equipment_weight_kg
    }

    pub fn check(&self, combination: LoadCombination) -> Option<&CombinationCheck> {
        self.checks.iter().find(|c| c.combination == combination)
    }
}

// ── Section properties ────────────────────────────────────────────────────────

/// Steel mass of the pole shell, kg.
pub fn pole_weight_kg(sections: &[PoleSection]) -> f64 {
    sections
        .iter()
        .map(|s| {
            let height = s.height_mm / 1_000.0;
            let outer_r = s.mean_diameter_mm() / 2_000.0;
            let inner_r = outer_r - s.thickness_mm / 1_000.0;
            let volume = std::f64::consts::PI * (outer_r.powi(2) - inner_r.powi(2)) * height;
            volume * STEEL_DENSITY_KG_M3
        })
        .sum()
}

/// Elastic section modulus of a tube, m³.
pub fn section_modulus_m3(diameter_mm: f64, thickness_mm: f64) -> f64 {
    let outer = diameter_mm / 1_000.0;
    let inner = outer - 2.0 * thickness_mm / 1_000.0;
    std::f64::consts::PI / 32.0 * (outer.powi(4) - inner.powi(4)) / outer
}

/// Nominal yield moment of the base of `section`, N·m.
pub fn pole_moment_capacity_nm(section: &PoleSection, grade: SteelGrade) -> f64 {
    section_modulus_m3(section.diameter_bottom_mm, section.thickness_mm)
        * grade.yield_strength_mpa()
        * 1e6
}

/// Nominal overturning moment the anchor bolts resist, N·m.  Half the bolts
/// are taken in tension, acting at the bolt-circle radius.
pub fn anchor_moment_capacity_nm(bolts: &AnchorBolts) -> f64 {
    let diameter = bolts.bolt_diameter_mm / 1_000.0;
    let area = std::f64::consts::PI * diameter.powi(2) / 4.0;
    let per_bolt = area * bolts.bolt_grade_mpa * 1e6 * BOLT_TENSION_FACTOR;
    let in_tension = f64::from(bolts.bolt_count) / 2.0;
    let lever_arm = bolts.bolt_circle_diameter_mm / 2_000.0;
    in_tension * per_bolt * lever_arm
}

// ── Model ─────────────────────────────────────────────────────────────────────

/// A configured monopole with its equipment mounted.
///
/// Everything but the wind is fixed at construction, so
/// [`analyze`](Self::analyze) is cheap enough to run every tick.
#[derive(Clone, Debug)]
pub struct TowerModel {
    exposure:          Exposure,
    sections:          Vec<PoleSection>,
    platforms:         Vec<Platform>,
    /// Equipment on a tower without platforms, with its height.
    loose:             Vec<(f64, EquipmentLoad)>,
    height_m:          f64,
    pole_weight_kg:    f64,
    applied_moment_nm: f64,
    capacity_nm:       f64,
    governing_element: GoverningElement,
}

impl TowerModel {
    /// The bare tower: pole, platforms and the equipment listed in `config`.
    pub fn new(config: &TowerConfig) -> Self {
        let height_m = config.height_m();
        let pole_allowable = config
            .sections
            .first()
            .map_or(0.0, |base| pole_moment_capacity_nm(base, config.steel_grade))
            / SAFETY_FACTOR;
        let anchor_allowable = config
            .foundation
            .as_ref()
            .map(|bolts| anchor_moment_capacity_nm(bolts) / SAFETY_FACTOR);

        let (capacity_nm, governing_element) = match anchor_allowable {
            Some(anchor) if anchor < pole_allowable => (anchor, GoverningElement::Foundation),
            _ => (pole_allowable, GoverningElement::Pole),
        };

        Self {
            exposure: config.exposure,
            sections: config.sections.clone(),
            platforms: config.platforms.clone(),
            loose: Vec::new(),
            height_m,
            pole_weight_kg: pole_weight_kg(&config.sections),
            applied_moment_nm: config.applied_load_kg.max(0.0) * GRAVITY_MS2 * height_m,
            capacity_nm,
            governing_element,
        }
    }

    /// The tower with every simulated device mounted on it.
    pub fn with_devices(config: &TowerConfig, devices: &[Device]) -> Self {
        let mut model = Self::new(config);
        for device in devices {
            let (height_m, load) = device_load(device);
            model.mount(height_m, load);
        }
        model
    }

    /// Mount `load` on the platform nearest `height_m`.  A non-positive
    /// height means the tower top.
    pub fn mount(&mut self, height_m: f64, load: EquipmentLoad) {
        let height_m = if height_m > 0.0 { height_m.min(self.height_m) } else { self.height_m };
        let nearest = self.platforms.iter_mut().min_by(|a, b| {
            (a.height_m - height_m).abs().total_cmp(&(b.height_m - height_m).abs())
        });
        match nearest {
            Some(platform) => platform.equipment.push(load),
            None => self.loose.push((height_m, load)),
        }
    }

    #[inline]
    pub fn height_m(&self) -> f64 {
        self.height_m
    }

    #[inline]
    pub fn exposure(&self) -> Exposure {
        self.exposure
    }

    pub fn equipment_weight_kg(&self) -> f64 {
        let on_platforms: f64 = self
            .platforms
            .iter()
            .map(|p| p.weight_kg + p.equipment.iter().map(|e| e.weight_kg).sum::<f64>())
            .sum();
        on_platforms + self.loose.iter().map(|(_, e)| e.weight_kg).sum::<f64>()
    }

    /// Total wind force (N) and base moment (N·m) at `wind_speed_ms`.
    pub fn wind_load(&self, wind_speed_ms: f64) -> (f64, f64) {
        let v = wind_speed_ms.max(0.0);
        if v == 0.0 {
            return (0.0, 0.0);
        }
        let mut force = 0.0;
        let mut moment = 0.0;
        let mut add = |f: f64, h: f64| {
            force += f;
            moment += f * h;
        };

        let mut base = 0.0;
        for section in &self.sections {
            let height = section.height_mm / 1_000.0;
            let area = section.mean_diameter_mm() / 1_000.0 * height;
            let centre = base + height / 2.0;
            add(wind::wind_load_n(v, centre, POLE_DRAG, area, self.exposure), centre);
            base += height;
        }

        for platform in &self.platforms {
            let h = platform.height_m;
            for item in &platform.equipment {
                add(equipment_force(v, h, item, self.exposure), h);
            }
            if platform.wind_area_m2 > 0.0 {
                let f = wind::wind_load_n(
                    v,
                    h,
                    platform.drag_coefficient,
                    platform.wind_area_m2,
                    self.exposure,
                );
                add(f, h);
            }
        }

        for (h, item) in &self.loose {
            add(equipment_force(v, *h, item, self.exposure), *h);
        }
        (force, moment)
    }

    /// Check the tower at `wind_speed_ms`.
    pub fn analyze(&self, wind_speed_ms: f64) -> StructuralReport {
        let (wind_force_n, wind_moment_nm) = self.wind_load(wind_speed_ms);
        let checks = LoadCombination::ALL.map(|combination| {
            let moment_nm = combination.moment_nm(self.applied_moment_nm, wind_moment_nm);
            CombinationCheck { combination, moment_nm, utilization: self.utilization(moment_nm) }
        });

        // First of equal maxima, in `ALL` order.
        let governing = checks
            .iter()
            .skip(1)
            .fold(checks[0], |best, c| if c.utilization > best.utilization { *c } else { best });

        let weight_per_kg = GRAVITY_MS2 * self.height_m;
        let (max_load_capacity_kg, remaining_capacity_kg) = if weight_per_kg > 0.0 {
            (
                self.capacity_nm / weight_per_kg,
                (self.capacity_nm - governing.moment_nm) / weight_per_kg,
            )
        } else {
            (0.0, 0.0)
        };

        StructuralReport {
            wind_speed_ms: wind_speed_ms.max(0.0),
            pole_weight_kg: self.pole_weight_kg,
            equipment_weight_kg: self.equipment_weight_kg(),
            wind_force_n,
            wind_moment_nm,
            applied_moment_nm: self.applied_moment_nm,
            capacity_nm: self.capacity_nm,
            governing_element: self.governing_element,
            checks,
            governing_combination: governing.combination,
            max_utilization: governing.utilization,
            max_load_capacity_kg,
            remaining_capacity_kg,
            status: StructuralStatus::from_utilization(governing.utilization),
        }
    }

    fn utilization(&self, moment_nm: f64) -> f64 {
        if self.capacity_nm > 0.0 {
            moment_nm / self.capacity_nm
        } else if moment_nm > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    }
}

fn equipment_force(v: f64, height_m: f64, item: &EquipmentLoad, exposure: Exposure) -> f64 {
    wind::wind_load_n(v, height_m, item.drag_coefficient, item.wind_area_m2, exposure)
}

/// Mounting height and load of a simulated device.  Antennas hang at their
/// specified mount height, other equipment at the device's altitude.
fn device_load(device: &Device) -> (f64, EquipmentLoad) {
    let label = device.id.as_str().to_owned();
    match &device.specifications {
        DeviceSpec::Antenna(s) => (s.mount_height_m, EquipmentLoad {
            label,
            weight_kg: s.weight_kg,
            wind_area_m2: s.wind_area_m2,
            drag_coefficient: s.drag_coefficient,
        }),
        DeviceSpec::Rru(s) => (device.location.alt, EquipmentLoad {
            label,
            weight_kg: s.weight_kg,
            wind_area_m2: s.wind_area_m2,
            drag_coefficient: s.drag_coefficient,
        }),
        DeviceSpec::Microwave(s) => (device.location.alt, EquipmentLoad {
            label,
            weight_kg: s.weight_kg,
            wind_area_m2: s.wind_area_m2,
            drag_coefficient: s.drag_coefficient,
        }),
    }
}
