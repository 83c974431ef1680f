//! # Dataset Persistence
//!
//! Owns the append-only CSV artifact on disk.
//!
//! This module handles:
//! - One-time header creation if the file does not exist
//! - Appending one row per accepted telemetry line
//! - Flushing every row to stable storage before the next read
//!
//! The file is never rewritten or truncated while the logger runs, so a crash
//! or disconnect loses at most the row in flight, never a previously appended
//! one.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::error::Result;
use crate::label::{ActionVector, ScenarioLabel};
use crate::validate::TelemetryFields;

/// Dataset column names, fixed order matching [`DatasetRow::to_csv_line`]
pub const HEADER: [&str; 13] = [
    "timestamp",
    "rssi",
    "pktRSSI",
    "snr",
    "pdr",
    "freqError",
    "interArrival",
    "rssiVariance",
    "snrVariance",
    "jam_label",
    "action_freq_hop",
    "action_sf_change",
    "action_interval_randomize",
];

/// One persisted dataset record: telemetry fields plus the session's label
/// and action vector, 13 columns total
///
/// Immutable once constructed; written exactly once.
#[derive(Debug, Clone)]
pub struct DatasetRow {
    fields: TelemetryFields,
    label: ScenarioLabel,
    actions: ActionVector,
}

impl DatasetRow {
    pub fn new(fields: TelemetryFields, label: ScenarioLabel, actions: ActionVector) -> Self {
        Self { fields, label, actions }
    }

    /// Serialize as one CSV line (no trailing newline)
    pub fn to_csv_line(&self) -> String {
        let mut line = String::new();
        for field in self.fields.iter() {
            line.push_str(&quote_csv_field(field));
            line.push(',');
        }
        line.push_str(&format!(
            "{},{},{},{}",
            self.label.as_u8(),
            self.actions[0],
            self.actions[1],
            self.actions[2]
        ));
        line
    }
}

/// Quote a CSV field if it contains the delimiter, a quote, or a line break
///
/// Telemetry fields are normally plain numbers, but they pass through as
/// opaque text, so serial noise could smuggle a comma into a field.
fn quote_csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Create the dataset file with a header row if it does not already exist
///
/// # Arguments
///
/// * `path` - Dataset file path
///
/// # Returns
///
/// * `Ok(true)` - File was created and the header written
/// * `Ok(false)` - File already exists; left untouched (assumed to carry a
///   compatible header)
///
/// # Errors
///
/// Returns error on any I/O failure other than the file already existing.
///
/// Called exactly once, before the acquisition loop starts. Idempotent:
/// running it again against an existing file never duplicates the header.
pub fn ensure_header<P: AsRef<Path>>(path: P) -> Result<bool> {
    // create_new makes check-and-create atomic
    match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(mut file) => {
            writeln!(file, "{}", HEADER.join(","))?;
            file.sync_data()?;
            info!("New dataset file created with header: {}", path.as_ref().display());
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            info!("Appending to existing dataset file: {}", path.as_ref().display());
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// Append-mode handle over the dataset file, held for one logging session
///
/// The writer never retries: any append failure is surfaced to the
/// acquisition loop, which treats it like a transport failure and rebuilds
/// the session.
#[derive(Debug)]
pub struct DatasetWriter {
    file: File,
}

impl DatasetWriter {
    /// Open the dataset file for appending
    ///
    /// # Arguments
    ///
    /// * `path` - Dataset file path; must already exist (see [`ensure_header`])
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().append(true).open(path)?;
        Ok(Self { file })
    }

    /// Append one row and flush it to stable storage
    ///
    /// # Errors
    ///
    /// Returns error if the write or sync fails (e.g. the medium was
    /// removed). The row may then be partially on disk; the next session
    /// appends after it without rewriting anything.
    ///
    /// Each accepted row is durable before the next line is read; nothing is
    /// buffered across process restarts.
    pub fn append_row(&mut self, row: &DatasetRow) -> Result<()> {
        let line = row.to_csv_line();
        writeln!(self.file, "{}", line)?;
        self.file.sync_data()?;
        debug!("Saved: {}", line);
        Ok(())
    }
}
