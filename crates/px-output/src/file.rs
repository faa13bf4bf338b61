//! File output backend.
//!
//! Creates two files in the configured output directory:
//! - `state.txt` — the latest state snapshot, rewritten every tick in the
//!   line-oriented format the external monitor dashboard parses.
//! - `events.csv` — the append-only notification log.
//!
//! # `state.txt` format
//!
//! ```text
//! DAY: 3
//! TIME: 42
//! PARCELS_BOOKED: 5
//! PARCELS_TRANSIT: 2
//! PARCELS_LOST: 1
//! --- TRIPS ---
//! 0 1 Bus-600 4km 15km
//! ```
//!
//! One trip line per active trip: source city index, destination city
//! index, vehicle label, distance covered, total distance.  The dashboard
//! stream-extracts the two leading integers, so city ids must stay numeric
//! here; vehicle labels contain no whitespace.

use std::fs::{self, File};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use csv::Writer;

use px_core::CityId;
use px_engine::{Event, Snapshot};

use crate::writer::MonitorWriter;
use crate::OutputResult;

/// Writes snapshots to `state.txt` and events to `events.csv`.
pub struct FileMonitorWriter {
    state_path: PathBuf,
    /// Sibling scratch path; each snapshot is written here, then renamed
    /// over `state_path` so the monitor never reads a half-written file.
    scratch_path: PathBuf,
    events: Writer<File>,
    city_names: Vec<String>,
    finished: bool,
}

impl FileMonitorWriter {
    /// Open (or create) the two files in `dir`.  `city_names` translates
    /// city ids in the event log into display names; the state file keeps
    /// numeric ids for the dashboard parser.
    pub fn new(dir: &Path, city_names: Vec<String>) -> OutputResult<Self> {
        fs::create_dir_all(dir)?;
        let mut events = Writer::from_path(dir.join("events.csv"))?;
        events.write_record(["day", "second", "city", "kind", "message"])?;
        events.flush()?;

        Ok(Self {
            state_path: dir.join("state.txt"),
            scratch_path: dir.join("state.txt.tmp"),
            events,
            city_names,
            finished: false,
        })
    }

    fn city_name(&self, city: CityId) -> &str {
        self.city_names
            .get(city.index())
            .map(String::as_str)
            .unwrap_or("?")
    }
}

impl MonitorWriter for FileMonitorWriter {
    fn write_snapshot(&mut self, snapshot: &Snapshot) -> OutputResult<()> {
        let mut out = File::create(&self.scratch_path)?;
        writeln!(out, "DAY: {}", snapshot.day)?;
        writeln!(out, "TIME: {}", snapshot.second_of_day)?;
        writeln!(out, "PARCELS_BOOKED: {}", snapshot.booked)?;
        writeln!(out, "PARCELS_TRANSIT: {}", snapshot.in_transit)?;
        writeln!(out, "PARCELS_LOST: {}", snapshot.lost_total)?;
        writeln!(out, "--- TRIPS ---")?;
        for trip in &snapshot.trips {
            writeln!(
                out,
                "{} {} {} {}km {}km",
                trip.src_city.0,
                trip.dst_city.0,
                trip.vehicle.label(),
                trip.traveled_km,
                trip.route_km,
            )?;
        }
        out.sync_all()?;
        fs::rename(&self.scratch_path, &self.state_path)?;
        Ok(())
    }

    fn write_event(&mut self, event: &Event) -> OutputResult<()> {
        let city = match event.city {
            Some(city) => self.city_name(city).to_string(),
            None => "-".to_string(),
        };
        self.events.write_record(&[
            event.day.to_string(),
            event.second.to_string(),
            city,
            event.kind.as_str().to_string(),
            event.message.clone(),
        ])?;
        // Flushed per event so the monitor tails a current log; the stream
        // runs at human cadence, not in a hot loop.
        self.events.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.events.flush()?;
        Ok(())
    }
}
