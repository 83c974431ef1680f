//! # Scenario Labels and Mitigation Actions
//!
//! Maps the jamming scenario under which a logging session runs to the
//! expert mitigation-action vector persisted alongside every telemetry row.
//!
//! The mapping is operational configuration, not data: it is a fixed table,
//! checked exhaustively at startup, and never consulted per row.

use crate::error::{LoggerError, Result};

/// Fixed 3-flag mitigation response: [frequency hop, SF change, interval randomize]
pub type ActionVector = [u8; 3];

/// Jamming scenario under which the current logging session runs
///
/// Fixed for the lifetime of one process run; configured once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ScenarioLabel {
    /// No jammer active
    Clean = 0,
    /// Single-tone jammer on the operating frequency
    SingleTone = 1,
    /// Frequency-hopping jammer
    Hopping = 2,
    /// Reactive jammer triggered by channel activity
    Reactive = 3,
}

impl ScenarioLabel {
    /// Parse a raw configuration value into a scenario label
    ///
    /// # Arguments
    ///
    /// * `value` - Raw label value from configuration (0-3)
    ///
    /// # Errors
    ///
    /// Returns `LoggerError::UnknownLabel` for any value outside 0-3.
    /// This is a configuration error: the process must not start logging
    /// with an undefined action mapping.
    pub fn from_config(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Clean),
            1 => Ok(Self::SingleTone),
            2 => Ok(Self::Hopping),
            3 => Ok(Self::Reactive),
            other => Err(LoggerError::UnknownLabel(other)),
        }
    }

    /// Expert mitigation actions for this scenario
    ///
    /// The match is exhaustive over the enum, so the table is total by
    /// construction: there is no label without an action vector.
    pub fn actions(self) -> ActionVector {
        match self {
            Self::Clean => [0, 0, 0],      // do nothing
            Self::SingleTone => [1, 0, 0], // hop frequency
            Self::Hopping => [1, 1, 0],    // hop + change SF
            Self::Reactive => [0, 1, 1],   // change SF + randomize interval
        }
    }

    /// Numeric value persisted in the `jam_label` column
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_labels_round_trip() {
        for value in 0..=3u8 {
            let label = ScenarioLabel::from_config(value).unwrap();
            assert_eq!(label.as_u8(), value);
        }
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        for value in [4u8, 7, 255] {
            match ScenarioLabel::from_config(value) {
                Err(LoggerError::UnknownLabel(v)) => assert_eq!(v, value),
                other => panic!("Expected UnknownLabel error, got: {:?}", other),
            }
        }
    }

    #[test]
    fn test_action_table() {
        assert_eq!(ScenarioLabel::Clean.actions(), [0, 0, 0]);
        assert_eq!(ScenarioLabel::SingleTone.actions(), [1, 0, 0]);
        assert_eq!(ScenarioLabel::Hopping.actions(), [1, 1, 0]);
        assert_eq!(ScenarioLabel::Reactive.actions(), [0, 1, 1]);
    }
}
