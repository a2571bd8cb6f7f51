//! Geographic location of a tower-mounted device.

use serde::{Deserialize, Serialize};

/// A WGS-84 coordinate plus altitude above ground, in metres.
///
/// Stored as `f64` because device records are few and are handed straight to
/// 3D viewers that expect double precision.
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub alt: f64,
}

impl GeoLocation {
    #[inline]
    pub fn new(lat: f64, lng: f64, alt: f64) -> Self {
        Self { lat, lng, alt }
    }

    /// Haversine great-circle distance in kilometres, ignoring altitude.
    ///
    /// Used to derive a microwave hop length when the topology names both
    /// link ends but gives no explicit range.
    pub fn distance_km(self, other: GeoLocation) -> f64 {
        const R_KM: f64 = 6_371.0;

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lng * 0.5).sin().powi(2);
        R_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
    }
}

impl std::fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6}, {:.1} m)", self.lat, self.lng, self.alt)
    }
}
