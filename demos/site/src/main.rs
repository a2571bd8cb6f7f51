//! site — one rooftop tower simulated for a day.
//!
//! Three sector antennas (two passive panels and one massive-MIMO unit), two
//! radio units and one 23 GHz backhaul hop, sampled every five minutes of
//! virtual time into an SQLite store.  The 36 m monopole carrying them is
//! checked against every tick's wind.  Afterwards the store is reopened
//! exported to CSV and summarised per device.
//!
//! ```text
//! cargo run -p site                  # embedded topology
//! cargo run -p site -- my-site.json  # your own SiteConfig
//! RUST_LOG=debug cargo run -p site   # per-batch logging
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tt_core::{DeviceId, DeviceStatus, SiteConfig, Tick, VirtualClock};
use tt_generator::StructuralReport;
use tt_sim::{SchedulerBuilder, SimObserver, TracingObserver};
use tt_store::{CsvExporter, RetentionStore, SqliteStore, StoreError, StoreStats};

// ── Constants ─────────────────────────────────────────────────────────────────

const OUTPUT_DIR:     &str = "output/site";
const LOG_EVERY:      u64  = 48; // every 4 h of virtual time
const START_UNIX:     i64  = 1_717_200_000; // 2024-06-01 00:00 UTC, early monsoon

// ── Embedded topology ─────────────────────────────────────────────────────────

const SITE_JSON: &str = r#"{
  "name": "MUM-ANDHERI-0142",
  "seed": 42,
  "intervalMs": 300000,
  "maxSamples": 1500,
  "maxTicks": 288,
  "utcOffsetMinutes": 330,
  "particulateBase": 140.0,
  "particulateJitter": 45.0,
  "tower": {
    "sections": [
      { "heightMm": 12000, "diameterBottomMm": 900, "diameterTopMm": 760, "thicknessMm": 8 },
      { "heightMm": 12000, "diameterBottomMm": 760, "diameterTopMm": 600, "thicknessMm": 6 },
      { "heightMm": 12000, "diameterBottomMm": 600, "diameterTopMm": 450, "thicknessMm": 6 }
    ],
    "exposure": "B",
    "steelGrade": "A572-50",
    "foundation": { "boltCircleDiameterMm": 1200, "boltCount": 24,
                    "boltDiameterMm": 30, "boltGradeMpa": 420 },
    "platforms": [
      { "heightM": 32.0, "weightKg": 180, "windAreaM2": 1.8 },
      { "heightM": 28.0, "weightKg": 150, "windAreaM2": 1.5,
        "equipment": [{ "label": "GPS + cable tray", "weightKg": 40, "windAreaM2": 0.4 }] }
    ]
  },
  "devices": [
    { "id": "ANT-A1", "type": "antenna", "azimuthDeg": 0,
      "location": { "lat": 19.1197, "lng": 72.8468, "alt": 32.0 } },
    { "id": "ANT-A2", "type": "antenna", "azimuthDeg": 120,
      "location": { "lat": 19.1197, "lng": 72.8468, "alt": 32.0 } },
    { "id": "ANT-A3", "type": "antenna", "model": "AIR-6449", "azimuthDeg": 240,
      "location": { "lat": 19.1197, "lng": 72.8468, "alt": 30.5 } },
    { "id": "RRU-L18", "type": "rru",
      "location": { "lat": 19.1197, "lng": 72.8468, "alt": 28.0 } },
    { "id": "RRU-N78", "type": "rru", "model": "AHEG-5G",
      "location": { "lat": 19.1197, "lng": 72.8468, "alt": 28.0 } },
    { "id": "MW-HUB", "type": "microwave", "name": "Backhaul to BKC hub",
      "location": { "lat": 19.0660, "lng": 72.8656, "alt": 45.0 } },
    { "id": "MW-0142", "type": "microwave", "farEndId": "MW-HUB",
      "location": { "lat": 19.1197, "lng": 72.8468, "alt": 34.0 } }
  ]
}"#;

// ── Observer ──────────────────────────────────────────────────────────────────

/// [`TracingObserver`] that also keeps the most utilized structural check.
struct TowerWatch {
    log:  TracingObserver,
    peak: Option<StructuralReport>,
}

impl SimObserver for TowerWatch {
    fn on_batch_stored(&mut self, tick: Tick, samples: usize, evicted: usize) {
        self.log.on_batch_stored(tick, samples, evicted);
    }

    fn on_store_error(&mut self, tick: Tick, error: &StoreError) {
        self.log.on_store_error(tick, error);
    }

    fn on_status_change(&mut self, tick: Tick, device: &DeviceId, status: DeviceStatus) {
        self.log.on_status_change(tick, device, status);
    }

    fn on_structural_check(&mut self, tick: Tick, report: &StructuralReport) {
        self.log.on_structural_check(tick, report);
        if self.peak.as_ref().is_none_or(|p| report.max_utilization > p.max_utilization) {
            self.peak = Some(report.clone());
        }
    }

    fn on_shutdown(&mut self, ticks: u64, stats: &StoreStats) {
        self.log.on_shutdown(ticks, stats);
    }
}

fn load_config() -> Result<SiteConfig> {
    match std::env::args().nth(1) {
        Some(path) => SiteConfig::from_path(Path::new(&path))
            .with_context(|| format!("loading site config {path}")),
        None => {
            let config = SiteConfig::from_json(SITE_JSON)?;
            config.validate()?;
            Ok(config)
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // 1. Configuration.
    let config = load_config()?;
    println!("=== site: tower telemetry twin ===");
    println!(
        "Site: {}  |  Devices: {}  |  Interval: {} ms  |  Ticks: {}  |  Seed: {}",
        config.name,
        config.devices.len(),
        config.interval_ms,
        config.max_ticks.map_or_else(|| "unbounded".to_owned(), |n| n.to_string()),
        config.seed,
    );
    println!();

    // 2. Store.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let db_path = Path::new(OUTPUT_DIR).join("telemetry.db");
    if db_path.exists() {
        std::fs::remove_file(&db_path)?;
    }
    let store = Arc::new(SqliteStore::open(&db_path, config.max_samples)?);

    // 3. Scheduler on virtual time.
    let start = Utc
        .timestamp_opt(START_UNIX, 0)
        .single()
        .context("start timestamp out of range")?;
    let (mut scheduler, warnings) = SchedulerBuilder::new(config.clone(), Arc::clone(&store))
        .clock(VirtualClock::new(start))
        .build()?;
    for w in &warnings {
        warn!("{w}");
    }
    info!(devices = scheduler.device_count(), "fleet ready");

    // 4. Run.
    let t0 = Instant::now();
    let mut watch = TowerWatch { log: TracingObserver::new(LOG_EVERY), peak: None };
    let stats = scheduler.run(&mut watch)?;
    let elapsed = t0.elapsed();

    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("{}", serde_json::to_string_pretty(&stats)?);
    println!();

    if let Some(peak) = &watch.peak {
        println!(
            "Tower peak: {:.1} % ({}) at {:.1} m/s, {:?} governs via {}",
            peak.max_utilization * 100.0,
            peak.status,
            peak.wind_speed_ms,
            peak.governing_element,
            peak.governing_combination,
        );
        println!(
            "  dead load {:.0} kg  |  remaining capacity {:.0} kg",
            peak.dead_load_kg(),
            peak.remaining_capacity_kg,
        );
        println!();
    }

    // 5. Reopen, export, summarise.
    let store = SqliteStore::open(&db_path, config.max_samples)?;
    let csv_path = Path::new(OUTPUT_DIR).join("samples.csv");
    let mut exporter = CsvExporter::create(&csv_path)?;
    let rows = exporter.write_store(&store)?;
    exporter.finish()?;
    println!("  {} : {rows} rows", csv_path.display());
    println!();

    println!("{:<10} {:<10} {:<9} {:>8} {:>6}", "Device", "Type", "Status", "Samples", "Seq");
    println!("{}", "-".repeat(47));
    for device in store.all_devices()? {
        let latest = store.by_device(&device.id, 1)?;
        println!(
            "{:<10} {:<10} {:<9} {:>8} {:>6}",
            device.id.as_str(),
            device.class.as_str(),
            format!("{:?}", device.status).to_lowercase(),
            stats.per_device.get(&device.id).copied().unwrap_or(0),
            latest.first().map_or(0, |s| s.sequence_number),
        );
    }
    store.close()?;

    Ok(())
}
