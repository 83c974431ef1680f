//! # LoRa Jam Logger Library
//!
//! Core functionality for the LoRa jamming dataset logger: telemetry line
//! validation, scenario labeling, durable CSV persistence, and the
//! reconnecting serial acquisition loop.

pub mod acquisition;
pub mod config;
pub mod dataset;
pub mod error;
pub mod label;
pub mod serial;
pub mod validate;
