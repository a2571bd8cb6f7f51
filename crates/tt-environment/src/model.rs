//! Season / time-of-day weather model.
//!
//! ```text
//! season      = winter {12,1,2} | monsoon {6..9} | summer (rest)
//! temperature = season base + (+5 if hour > 12 else −3) ± 3
//! humidity    = clamp(season base ± 10, 20, 95)
//! particulate = max(site base ± site jitter, 0)
//! ```
//!
//! Hour and month are taken in the site's local time.

use chrono::{DateTime, Datelike, FixedOffset, Offset, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tt_core::{SimRng, SiteConfig};

pub const HUMIDITY_MIN: f64 = 20.0;
pub const HUMIDITY_MAX: f64 = 95.0;

const DAY_OFFSET_C: f64 = 5.0;
const NIGHT_OFFSET_C: f64 = -3.0;
const TEMPERATURE_JITTER_C: f64 = 3.0;
const HUMIDITY_JITTER: f64 = 10.0;

// ── Season ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Summer,
    Monsoon,
}

impl Season {
    /// Bucket a calendar month (1–12).
    pub fn from_month(month: u32) -> Season {
        match month {
            12 | 1 | 2 => Season::Winter,
            6..=9 => Season::Monsoon,
            _ => Season::Summer,
        }
    }

    pub fn base_temperature(self) -> f64 {
        match self {
            Season::Winter => 18.0,
            Season::Summer => 32.0,
            Season::Monsoon => 28.0,
        }
    }

    pub fn base_humidity(self) -> f64 {
        match self {
            Season::Winter => 55.0,
            Season::Summer => 40.0,
            Season::Monsoon => 82.0,
        }
    }

    /// (probability of rain this tick, maximum rain rate in mm/h).
    fn rain_profile(self) -> (f64, f64) {
        match self {
            Season::Monsoon => (0.4, 60.0),
            Season::Winter | Season::Summer => (0.05, 10.0),
        }
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// Site weather at one instant.  Ephemeral: never persisted on its own.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentSnapshot {
    pub timestamp: DateTime<Utc>,
    /// Hour of day (0–23) in site-local time.
    pub local_hour: u32,
    pub season: Season,
    /// °C.
    pub temperature: f64,
    /// %, within [20, 95].
    pub humidity: f64,
    pub particulate_index: f64,
    /// m/s.
    pub wind_speed: f64,
    /// mm/h, 0 when dry.
    pub rain_rate: f64,
}

impl EnvironmentSnapshot {
    /// A dry, still, mild snapshot.  Handy as a fixed input for generator
    /// tests.
    pub fn calm(timestamp: DateTime<Utc>, local_hour: u32) -> Self {
        Self {
            timestamp,
            local_hour,
            season: Season::Summer,
            temperature: 25.0,
            humidity: 50.0,
            particulate_index: 0.0,
            wind_speed: 0.0,
            rain_rate: 0.0,
        }
    }

    /// Traffic busy hours, 08:00–22:00 local.
    #[inline]
    pub fn is_busy_hour(&self) -> bool {
        (8..22).contains(&self.local_hour)
    }
}

// ── Model ─────────────────────────────────────────────────────────────────────

/// Site constants the model needs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SiteProfile {
    pub utc_offset_minutes: i32,
    pub particulate_base: f64,
    pub particulate_jitter: f64,
}

impl From<&SiteConfig> for SiteProfile {
    fn from(config: &SiteConfig) -> Self {
        Self {
            utc_offset_minutes: config.utc_offset_minutes,
            particulate_base:   config.particulate_base,
            particulate_jitter: config.particulate_jitter,
        }
    }
}

#[derive(Clone, Debug)]
pub struct EnvironmentModel {
    site:   SiteProfile,
    offset: FixedOffset,
}

impl EnvironmentModel {
    /// Offsets outside ±24 h fall back to UTC.
    pub fn new(site: SiteProfile) -> Self {
        let offset = FixedOffset::east_opt(site.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix());
        Self { site, offset }
    }

    #[inline]
    pub fn site(&self) -> &SiteProfile {
        &self.site
    }

    /// Compute the snapshot for `now`.
    pub fn snapshot(&self, now: DateTime<Utc>, rng: &mut SimRng) -> EnvironmentSnapshot {
        let local = now.with_timezone(&self.offset);
        let local_hour = local.hour();
        let season = Season::from_month(local.month());

        let day_night = if local_hour > 12 { DAY_OFFSET_C } else { NIGHT_OFFSET_C };
        let temperature = season.base_temperature() + day_night + rng.jitter(TEMPERATURE_JITTER_C);

        let humidity = (season.base_humidity() + rng.jitter(HUMIDITY_JITTER))
            .clamp(HUMIDITY_MIN, HUMIDITY_MAX);

        let particulate_index =
            (self.site.particulate_base + rng.jitter(self.site.particulate_jitter)).max(0.0);

        let mut wind_speed = rng.gen_range(0.0..=12.0);
        if season == Season::Monsoon {
            wind_speed += rng.gen_range(0.0..=8.0);
        }

        let (rain_probability, rain_max) = season.rain_profile();
        let rain_rate = if rng.gen_bool(rain_probability) {
            rng.gen_range(0.0..=rain_max)
        } else {
            0.0
        };

        EnvironmentSnapshot {
            timestamp: now,
            local_hour,
            season,
            temperature,
            humidity,
            particulate_index,
            wind_speed,
            rain_rate,
        }
    }
}
