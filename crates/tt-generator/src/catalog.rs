//! Vendor specification catalog.
//!
//! A handful of representative models per device class ship built in.  A
//! site's `vendorSpecs` table is layered on top: an entry with the same model
//! name replaces the built-in one, a new name extends the catalog.

use std::collections::BTreeMap;

use tt_core::{
    AntennaSpec, DeviceClass, DeviceSpec, MicrowaveSpec, Modulation, RadioTechnology,
    RadioUnitSpec,
};

/// Model name → specification.
#[derive(Clone, Debug, Default)]
pub struct VendorCatalog {
    models: BTreeMap<String, DeviceSpec>,
}

impl VendorCatalog {
    /// Empty catalog; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in models.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        for spec in builtin_specs() {
            catalog.insert(spec);
        }
        catalog
    }

    /// Layer site overrides on top of `self`.
    pub fn with_overrides<'a, I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a DeviceSpec)>,
    {
        for (model, spec) in overrides {
            self.models.insert(model.clone(), spec.clone());
        }
        self
    }

    /// Insert under the entry's own model name.
    pub fn insert(&mut self, spec: DeviceSpec) {
        self.models.insert(spec.model().to_owned(), spec);
    }

    pub fn get(&self, model: &str) -> Option<&DeviceSpec> {
        self.models.get(model)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Model assigned when a topology entry names none.
    pub fn default_model(class: DeviceClass) -> &'static str {
        match class {
            DeviceClass::Antenna => "APXVAARR24",
            DeviceClass::Rru => "RRUS-4415",
            DeviceClass::Microwave => "RTN-950A-23G",
        }
    }
}

fn builtin_specs() -> Vec<DeviceSpec> {
    vec![
        // Passive multi-band panel.
        DeviceSpec::Antenna(AntennaSpec {
            model:               "APXVAARR24".into(),
            frequency_bands_mhz: vec![700, 850, 1800, 2100],
            gain_dbi:            17.5,
            beamwidth_deg:       65.0,
            azimuth_deg:         0.0,
            mechanical_tilt_deg: 2.0,
            electrical_tilt_deg: 4.0,
            max_power_w:         0.0,
            mount_height_m:      14.0,
            weight_kg:           40.0,
            wind_area_m2:        1.5,
            drag_coefficient:    1.2,
        }),
        // 64T64R massive-MIMO active antenna unit, n78.
        DeviceSpec::Antenna(AntennaSpec {
            model:               "AIR-6449".into(),
            frequency_bands_mhz: vec![3500],
            gain_dbi:            24.0,
            beamwidth_deg:       12.0,
            azimuth_deg:         0.0,
            mechanical_tilt_deg: 0.0,
            electrical_tilt_deg: 6.0,
            max_power_w:         250.0,
            mount_height_m:      14.0,
            weight_kg:           45.0,
            wind_area_m2:        0.9,
            drag_coefficient:    1.2,
        }),
        DeviceSpec::Rru(RadioUnitSpec {
            model:               "RRUS-4415".into(),
            technology:          RadioTechnology::Lte,
            frequency_bands_mhz: vec![1800],
            max_tx_power_dbm:    46.0,
            rated_power_w:       400.0,
            nominal_voltage:     -48.0,
            ports:               4,
            weight_kg:           30.0,
            wind_area_m2:        0.6,
            drag_coefficient:    1.0,
        }),
        DeviceSpec::Rru(RadioUnitSpec {
            model:               "AHEG-5G".into(),
            technology:          RadioTechnology::Nr,
            frequency_bands_mhz: vec![3500],
            max_tx_power_dbm:    49.0,
            rated_power_w:       600.0,
            nominal_voltage:     -48.0,
            ports:               8,
            weight_kg:           35.0,
            wind_area_m2:        0.7,
            drag_coefficient:    1.0,
        }),
        DeviceSpec::Microwave(MicrowaveSpec {
            model:                    "RTN-950A-23G".into(),
            frequency_ghz:            23.0,
            bandwidth_mhz:            56.0,
            range_km:                 15.0,
            transmit_power_dbm:       20.0,
            receiver_sensitivity_dbm: -88.0,
            adaptive_modulation:      true,
            fixed_modulation:         Modulation::Qam256,
            far_end_id:               None,
            weight_kg:                25.0,
            wind_area_m2:             0.3,
            drag_coefficient:         1.0,
        }),
        DeviceSpec::Microwave(MicrowaveSpec {
            model:                    "IPASOLINK-7G".into(),
            frequency_ghz:            7.0,
            bandwidth_mhz:            28.0,
            range_km:                 30.0,
            transmit_power_dbm:       28.0,
            receiver_sensitivity_dbm: -92.0,
            adaptive_modulation:      false,
            fixed_modulation:         Modulation::Qam64,
            far_end_id:               None,
            weight_kg:                38.0,
            wind_area_m2:             0.7,
            drag_coefficient:         1.0,
        }),
    ]
}
