//! # Serial Communication Module
//!
//! Handles serial communication with the LoRa receiver node.
//!
//! This module handles:
//! - Opening the serial port at the configured baud rate (8N1, no flow control)
//! - Timeout-bounded, newline-delimited line reads
//! - Lossy decoding of serial noise (undecodable bytes are dropped, not fatal)

pub mod transport;

use std::io;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::timeout;
use tokio_serial::SerialPortBuilderExt;
use tracing::debug;

use crate::config::SerialConfig;
use crate::error::{LoggerError, Result};
use async_trait::async_trait;
use transport::{LineTransport, TransportFactory};

/// Serial connection to the receiver node, read one telemetry line at a time
pub struct TelemetrySerial {
    /// Buffered reader over the serial port
    reader: BufReader<tokio_serial::SerialStream>,
    /// Bytes of a line still in flight across timed-out reads
    pending: Vec<u8>,
    /// Per-read timeout
    read_timeout: Duration,
    /// Device path (e.g., /dev/ttyUSB0)
    port_name: String,
}

impl std::fmt::Debug for TelemetrySerial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetrySerial")
            .field("port_name", &self.port_name)
            .field("read_timeout", &self.read_timeout)
            .finish_non_exhaustive()
    }
}

impl TelemetrySerial {
    /// Open the configured serial port
    ///
    /// # Arguments
    ///
    /// * `config` - Serial port settings (port path, baud rate, read timeout)
    ///
    /// # Errors
    ///
    /// Returns `LoggerError::Serial` if the port cannot be opened (absent,
    /// busy, or a transport-level error). The caller retries; open failures
    /// are never fatal.
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let port = tokio_serial::new(&config.port, config.baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| LoggerError::Serial(format!("Failed to open {}: {}", config.port, e)))?;

        debug!("Opened serial port {} at {} baud", config.port, config.baud_rate);

        Ok(Self {
            reader: BufReader::new(port),
            pending: Vec::new(),
            read_timeout: Duration::from_millis(config.timeout_ms),
            port_name: config.port.clone(),
        })
    }

    /// Get the device path of the opened serial port
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

#[async_trait]
impl LineTransport for TelemetrySerial {
    /// Read one newline-terminated record, bounded by the configured timeout
    ///
    /// `read_until` is cancel-safe: bytes read before the timeout fires stay
    /// in `pending` and the next call resumes the same line, so a slow
    /// sender never loses a line prefix to the timeout.
    async fn read_line(&mut self) -> io::Result<Option<String>> {
        match timeout(self.read_timeout, self.reader.read_until(b'\n', &mut self.pending)).await {
            // Timeout with no complete line; not an error
            Err(_elapsed) => Ok(None),
            // Zero bytes means the port is gone
            Ok(Ok(0)) => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "serial port closed",
            )),
            Ok(Ok(_n)) => {
                let bytes = std::mem::take(&mut self.pending);
                Ok(Some(decode_lossy(&bytes)))
            }
            Ok(Err(e)) => Err(e),
        }
    }
}

/// Decode raw serial bytes, discarding undecodable sequences and trimming
/// line terminators and surrounding whitespace
fn decode_lossy(bytes: &[u8]) -> String {
    // Telemetry is ASCII; any replacement character is serial noise
    String::from_utf8_lossy(bytes)
        .replace('\u{FFFD}', "")
        .trim()
        .to_string()
}

/// Opens a fresh [`TelemetrySerial`] session per connect attempt
#[derive(Debug, Clone)]
pub struct SerialFactory {
    config: SerialConfig,
}

impl SerialFactory {
    pub fn new(config: SerialConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl TransportFactory for SerialFactory {
    type Transport = TelemetrySerial;

    async fn connect(&mut self) -> Result<TelemetrySerial> {
        TelemetrySerial::open(&self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_lossy_passes_clean_ascii() {
        let bytes = b"1700000000.0,-80,-82,7.5,0.95,120,50,3.2,1.1\r\n";
        assert_eq!(
            decode_lossy(bytes),
            "1700000000.0,-80,-82,7.5,0.95,120,50,3.2,1.1"
        );
    }

    #[test]
    fn test_decode_lossy_drops_invalid_bytes() {
        // 0xFF 0xFE is not valid UTF-8; the rest of the line must survive
        let bytes = b"\xFF\xFE42.0,-80\n";
        assert_eq!(decode_lossy(bytes), "42.0,-80");
    }

    #[test]
    fn test_decode_lossy_empty_line() {
        assert_eq!(decode_lossy(b"\r\n"), "");
    }

    #[test]
    fn test_open_with_invalid_port_returns_error() {
        let config = SerialConfig {
            port: "/dev/nonexistent_serial_device_12345".to_string(),
            baud_rate: 115_200,
            timeout_ms: 1000,
            reconnect_interval_ms: 2000,
        };

        let result = TelemetrySerial::open(&config);
        assert!(result.is_err());
        match result.unwrap_err() {
            LoggerError::Serial(msg) => {
                assert!(msg.contains("/dev/nonexistent_serial_device_12345"));
                assert!(msg.contains("Failed to open"));
            }
            other => panic!("Expected Serial error, got: {:?}", other),
        }
    }

    // Integration test - only runs if a receiver is connected
    #[test]
    #[ignore] // Run with: cargo test -- --ignored
    fn test_open_with_real_hardware() {
        let config = SerialConfig {
            port: "/dev/ttyUSB0".to_string(),
            baud_rate: 115_200,
            timeout_ms: 1000,
            reconnect_interval_ms: 2000,
        };

        match TelemetrySerial::open(&config) {
            Ok(serial) => println!("Opened receiver at: {}", serial.port_name()),
            Err(_) => println!("No receiver detected (this is OK for CI/CD)"),
        }
    }
}
