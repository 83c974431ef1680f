//! # LoRa Jam Logger
//!
//! Unattended CSV dataset logger for LoRa link-quality telemetry.
//!
//! Reads newline-delimited telemetry records from a serial-connected LoRa
//! receiver, validates each line, tags it with the session's jamming
//! scenario label and expert mitigation actions, and appends it to an
//! append-only CSV dataset. Survives device disconnects and resumes
//! logging automatically.

use anyhow::Result;
use std::time::Duration;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber;

mod acquisition;
mod config;
mod dataset;
mod error;
mod label;
mod serial;
mod validate;

use acquisition::AcquisitionLoop;
use config::Config;
use serial::SerialFactory;

/// Configuration file used when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Main entry point for the logger
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Set up logging with tracing subscriber
///    - Load configuration (path from argv, or `config/default.toml`)
///    - Resolve the scenario label against the action table; an unknown
///      label aborts startup
///    - Create the dataset file with its header if it does not exist
///
/// 2. **Acquisition loop**
///    - Connect to the receiver, log rows, reconnect forever on failure
///
/// 3. **Graceful Shutdown**
///    - Ctrl+C signals the loop, which releases the port and file and exits
///
/// # Errors
///
/// Returns error if:
/// - Configuration cannot be loaded or is invalid
/// - The scenario label has no entry in the action table
/// - The dataset file cannot be created
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    info!("LoRa jam logger v{} starting...", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path)?;

    // Fatal before logging starts if the label has no action mapping
    let label = config.scenario_label()?;
    info!("JAM_LABEL = {} | Actions = {:?}", label.as_u8(), label.actions());

    dataset::ensure_header(&config.dataset.path)?;

    // Ctrl+C flips the shutdown flag; the loop checks it between awaits
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down...");
            let _ = shutdown_tx.send(true);
        }
    });

    info!("Searching for receiver on {}...", config.serial.port);

    let factory = SerialFactory::new(config.serial.clone());
    let mut acquisition = AcquisitionLoop::new(
        factory,
        &config.dataset.path,
        label,
        Duration::from_millis(config.serial.reconnect_interval_ms),
        shutdown_rx,
    );
    acquisition.run().await?;

    Ok(())
}
