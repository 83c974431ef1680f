//! # Telemetry Line Validation
//!
//! Decides whether a raw telemetry line is well-formed enough to persist.
//!
//! Device noise and partial reads on a serial line produce garbage or
//! truncated lines. A cheap numeric check on the leading timestamp field is a
//! sufficient sanity gate without fully parsing every numeric column; the
//! remaining fields are persisted as text to preserve the device's original
//! precision and formatting.

/// Number of scalar fields the receiver emits per measurement cycle:
/// timestamp, rssi, pktRSSI, snr, pdr, freqError, interArrival,
/// rssiVariance, snrVariance.
pub const TELEMETRY_FIELD_COUNT: usize = 9;

/// Field delimiter used by the receiver firmware
pub const FIELD_DELIMITER: char = ',';

/// The 9 ordered fields parsed from one telemetry line
///
/// Only the first field (timestamp) is checked to be numeric; fields 1-8 are
/// opaque text carried through to the dataset unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryFields(pub [String; TELEMETRY_FIELD_COUNT]);

impl TelemetryFields {
    /// Iterate the fields in column order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Why a raw line was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidLine {
    /// Wrong number of delimited fields
    FieldCount(usize),
    /// First field does not parse as a floating-point number
    NonNumericTimestamp(String),
}

impl std::fmt::Display for InvalidLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldCount(n) => {
                write!(f, "expected {} fields, got {}", TELEMETRY_FIELD_COUNT, n)
            }
            Self::NonNumericTimestamp(field) => {
                write!(f, "non-numeric timestamp field: {:?}", field)
            }
        }
    }
}

/// Validate one raw telemetry line
///
/// # Arguments
///
/// * `raw` - One newline-delimited text record from the device, already
///   stripped of line terminators
///
/// # Returns
///
/// * `Ok(TelemetryFields)` - The 9 fields, unmodified
/// * `Err(InvalidLine)` - Rejection reason; callers log and skip
///
/// Pure function: no side effects, no I/O.
pub fn validate(raw: &str) -> Result<TelemetryFields, InvalidLine> {
    let fields: Vec<&str> = raw.split(FIELD_DELIMITER).collect();

    if fields.len() != TELEMETRY_FIELD_COUNT {
        return Err(InvalidLine::FieldCount(fields.len()));
    }

    if fields[0].trim().parse::<f64>().is_err() {
        return Err(InvalidLine::NonNumericTimestamp(fields[0].to_string()));
    }

    // Vec -> fixed array; length was checked above
    let fields: [String; TELEMETRY_FIELD_COUNT] = fields
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>()
        .try_into()
        .unwrap_or_else(|_| unreachable!("field count checked"));

    Ok(TelemetryFields(fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_line_returns_fields_unchanged() {
        let raw = "1700000000.0,-80,-82,7.5,0.95,120,50,3.2,1.1";
        let fields = validate(raw).unwrap();

        let expected = ["1700000000.0", "-80", "-82", "7.5", "0.95", "120", "50", "3.2", "1.1"];
        for (got, want) in fields.iter().zip(expected) {
            assert_eq!(got, want);
        }
    }

    #[test]
    fn test_wrong_field_count_is_rejected() {
        assert_eq!(
            validate("garbage,only,three"),
            Err(InvalidLine::FieldCount(3))
        );
        assert_eq!(validate(""), Err(InvalidLine::FieldCount(1)));
        assert_eq!(
            validate("1,2,3,4,5,6,7,8,9,10"),
            Err(InvalidLine::FieldCount(10))
        );
    }

    #[test]
    fn test_non_numeric_timestamp_is_rejected() {
        let raw = "boot,-80,-82,7.5,0.95,120,50,3.2,1.1";
        assert_eq!(
            validate(raw),
            Err(InvalidLine::NonNumericTimestamp("boot".to_string()))
        );
    }

    #[test]
    fn test_only_first_field_is_type_checked() {
        // Fields 1-8 are opaque text; garbage there is accepted deliberately
        let raw = "42.0,noise,??,x,y,z,a,b,c";
        let fields = validate(raw).unwrap();
        assert_eq!(fields.0[1], "noise");
        assert_eq!(fields.0[8], "c");
    }

    #[test]
    fn test_truncated_line_is_rejected() {
        // Partial read cut mid-line
        assert!(validate("1700000000.0,-80,-82,7.5").is_err());
    }

    #[test]
    fn test_integer_timestamp_is_accepted() {
        assert!(validate("1700000000,-80,-82,7.5,0.95,120,50,3.2,1.1").is_ok());
    }
}
