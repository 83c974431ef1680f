//! # Acquisition Loop
//!
//! Owns the serial connection lifecycle: connect, read lines until failure,
//! validate and persist each line, and on any failure close the session and
//! retry after a fixed interval.
//!
//! State machine:
//! - **Disconnected**: try to open the transport and the dataset file.
//!   Failure stays Disconnected and retries after the reconnect interval,
//!   forever. The logger is meant to run unattended while the device is
//!   power-cycled at will.
//! - **Connected/Logging**: read one line at a time. Timeouts and empty
//!   lines are ignored, malformed lines are skipped with a diagnostic, valid
//!   lines become dataset rows appended strictly in read order. Any read or
//!   append error drops the session resources and returns to Disconnected.
//! - **Stopping**: entered from either state on the shutdown signal; the
//!   only graceful exit path.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::dataset::{DatasetRow, DatasetWriter};
use crate::error::Result;
use crate::label::{ActionVector, ScenarioLabel};
use crate::serial::transport::{LineTransport, TransportFactory};
use crate::validate::validate;

/// Accepted rows between status log lines
const STATUS_INTERVAL_ROWS: u64 = 100;

/// How a connected session ended
enum SessionEnd {
    /// Read or append failure; resources dropped, retry follows
    Failed,
    /// Shutdown signal received
    Shutdown,
}

/// Sequential read → validate → label → append loop with reconnect
///
/// Single logical thread of control: each line is fully processed and
/// durable before the next read begins. The dataset file is exclusively
/// owned by this loop for the process's lifetime.
pub struct AcquisitionLoop<F: TransportFactory> {
    factory: F,
    dataset_path: PathBuf,
    label: ScenarioLabel,
    /// Derived once at startup from the label; reused for every row
    actions: ActionVector,
    reconnect_interval: Duration,
    shutdown: watch::Receiver<bool>,
    rows_logged: u64,
}

impl<F: TransportFactory> AcquisitionLoop<F> {
    pub fn new(
        factory: F,
        dataset_path: impl Into<PathBuf>,
        label: ScenarioLabel,
        reconnect_interval: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            factory,
            dataset_path: dataset_path.into(),
            label,
            actions: label.actions(),
            reconnect_interval,
            shutdown,
            rows_logged: 0,
        }
    }

    /// Total rows accepted and appended across all sessions
    pub fn rows_logged(&self) -> u64 {
        self.rows_logged
    }

    /// Run until the shutdown signal fires
    ///
    /// Never returns on transport or persistence failures; those re-enter
    /// the retry path. The in-flight line may be lost on a failure, but
    /// every previously appended row is already durable.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            if *self.shutdown.borrow() {
                break;
            }

            // Disconnected -> Connected: open transport, then the dataset
            // file for append; both are dropped together on session teardown
            match self.factory.connect().await {
                Ok(transport) => match DatasetWriter::open(&self.dataset_path) {
                    Ok(writer) => {
                        info!("Connected! Logging data...");
                        match self.run_session(transport, writer).await {
                            SessionEnd::Shutdown => break,
                            SessionEnd::Failed => {}
                        }
                    }
                    Err(e) => warn!("Failed to open dataset file: {}", e),
                },
                Err(e) => debug!("Connect attempt failed: {}", e),
            }

            warn!(
                "Device disconnected. Retrying in {} seconds...",
                self.reconnect_interval.as_secs_f64()
            );

            tokio::select! {
                _ = sleep(self.reconnect_interval) => {}
                _ = self.shutdown.changed() => break,
            }
        }

        info!("Stopping logger. {} rows logged.", self.rows_logged);
        Ok(())
    }

    /// Connected/Logging state: one line per iteration until failure or shutdown
    async fn run_session(
        &mut self,
        mut transport: F::Transport,
        mut writer: DatasetWriter,
    ) -> SessionEnd {
        loop {
            let line = tokio::select! {
                result = transport.read_line() => match result {
                    Ok(Some(line)) => line,
                    // Timeout with no data; keep the loop responsive
                    Ok(None) => continue,
                    Err(e) => {
                        warn!("Serial read failed: {}", e);
                        return SessionEnd::Failed;
                    }
                },
                _ = self.shutdown.changed() => return SessionEnd::Shutdown,
            };

            if line.is_empty() {
                continue;
            }

            let fields = match validate(&line) {
                Ok(fields) => fields,
                Err(reason) => {
                    warn!("Skipped ({}): {:?}", reason, line);
                    continue;
                }
            };

            let row = DatasetRow::new(fields, self.label, self.actions);
            if let Err(e) = writer.append_row(&row) {
                warn!("Failed to append row: {}", e);
                return SessionEnd::Failed;
            }

            self.rows_logged += 1;
            if self.rows_logged % STATUS_INTERVAL_ROWS == 0 {
                info!("{} rows logged", self.rows_logged);
            }
        }
    }
}
