//! Byte-size conversion utilities

use crate::error::PlatformError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// File size units supported by [`convert_bytes`], in ascending order.
pub const FILESIZE_UNITS: [SizeUnit; 6] = [
    SizeUnit::B,
    SizeUnit::Kb,
    SizeUnit::Mb,
    SizeUnit::Gb,
    SizeUnit::Tb,
    SizeUnit::Pb,
];

/// A file size unit, scaled in steps of 1024.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SizeUnit {
    B,
    Kb,
    Mb,
    Gb,
    Tb,
    Pb,
}

impl SizeUnit {
    /// Returns the unit suffix as rendered in formatted strings
    pub const fn as_str(&self) -> &'static str {
        match self {
            SizeUnit::B => "B",
            SizeUnit::Kb => "KB",
            SizeUnit::Mb => "MB",
            SizeUnit::Gb => "GB",
            SizeUnit::Tb => "TB",
            SizeUnit::Pb => "PB",
        }
    }

    /// The next larger unit, or `None` past PB.
    const fn next(self) -> Option<SizeUnit> {
        match self {
            SizeUnit::B => Some(SizeUnit::Kb),
            SizeUnit::Kb => Some(SizeUnit::Mb),
            SizeUnit::Mb => Some(SizeUnit::Gb),
            SizeUnit::Gb => Some(SizeUnit::Tb),
            SizeUnit::Tb => Some(SizeUnit::Pb),
            SizeUnit::Pb => None,
        }
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SizeUnit {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "B" => Ok(SizeUnit::B),
            "KB" => Ok(SizeUnit::Kb),
            "MB" => Ok(SizeUnit::Mb),
            "GB" => Ok(SizeUnit::Gb),
            "TB" => Ok(SizeUnit::Tb),
            "PB" => Ok(SizeUnit::Pb),
            other => Err(PlatformError::InvalidUnit(other.to_string())),
        }
    }
}

/// A byte count scaled to a human-readable unit.
///
/// The amount is rounded to 2 decimal places on construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvertedBytes {
    pub amount: f64,
    pub unit: SizeUnit,
}

impl ConvertedBytes {
    pub fn new(amount: f64, unit: SizeUnit) -> Self {
        Self {
            amount: round2(amount),
            unit,
        }
    }

    /// Construct from a raw unit string, validating it against the fixed
    /// unit set.
    pub fn with_unit_str(amount: f64, unit: &str) -> Result<Self, PlatformError> {
        Ok(Self::new(amount, unit.parse()?))
    }
}

impl fmt::Display for ConvertedBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}{}", self.amount, self.unit)
    }
}

/// Result of a byte conversion, shaped by the requested output mode.
#[derive(Debug, Clone, PartialEq)]
pub enum Converted {
    Numeric(f64),
    Object(ConvertedBytes),
    Text(String),
}

/// Scale a byte count up to the proper unit (KB, MB, GB, TB, PB).
///
/// `as_obj` returns a [`ConvertedBytes`], `as_str` a formatted string like
/// `"1.20MB"`, neither a bare number rounded to 2 decimal places. Requesting
/// both at once is a caller error and fails before any computation.
///
/// Values past the PB range stay in PB; the amount simply grows past 1024.
///
/// # Examples
///
/// ```
/// use hostinfo_platform::{Converted, convert_bytes};
///
/// let text = convert_bytes(1253656, false, true).unwrap();
/// assert_eq!(text, Converted::Text("1.20MB".to_string()));
/// ```
pub fn convert_bytes(bytes: u64, as_obj: bool, as_str: bool) -> Result<Converted, PlatformError> {
    if as_obj && as_str {
        return Err(PlatformError::ConflictingOutputModes);
    }

    let factor = 1024.0;
    let mut value = bytes as f64;
    let mut unit = SizeUnit::B;

    while value >= factor {
        match unit.next() {
            Some(larger) => {
                value /= factor;
                unit = larger;
            }
            None => break,
        }
    }

    Ok(if as_str {
        Converted::Text(format!("{value:.2}{unit}"))
    } else if as_obj {
        Converted::Object(ConvertedBytes::new(value, unit))
    } else {
        Converted::Numeric(round2(value))
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(bytes: u64) -> String {
        match convert_bytes(bytes, false, true).unwrap() {
            Converted::Text(s) => s,
            other => panic!("expected text result, got {other:?}"),
        }
    }

    fn numeric(bytes: u64) -> f64 {
        match convert_bytes(bytes, false, false).unwrap() {
            Converted::Numeric(n) => n,
            other => panic!("expected numeric result, got {other:?}"),
        }
    }

    /// Split `"1.20MB"` into its numeric and unit parts.
    fn split_formatted(s: &str) -> (f64, &str) {
        let split = s
            .find(|c: char| c.is_ascii_alphabetic())
            .expect("formatted string has a unit suffix");
        (s[..split].parse().unwrap(), &s[split..])
    }

    #[test]
    fn test_known_conversions() {
        assert_eq!(text(0), "0.00B");
        assert_eq!(text(1253656), "1.20MB");
        assert_eq!(text(1253656678), "1.17GB");
    }

    #[test]
    fn test_formatted_string_shape() {
        for bytes in [0, 1, 1023, 1024, 999_999, 10 * 1024 * 1024, u64::MAX] {
            let s = text(bytes);
            let (amount, unit) = split_formatted(&s);
            assert!(amount >= 0.0, "negative amount in {s}");
            assert!(
                FILESIZE_UNITS.iter().any(|u| u.as_str() == unit),
                "unknown unit in {s}"
            );
            // Exactly 2 fractional digits, no space before the unit
            let fraction = s.split('.').nth(1).unwrap();
            assert_eq!(fraction.len(), 2 + unit.len());
        }
    }

    #[test]
    fn test_numeric_matches_text() {
        for bytes in [0, 512, 2048, 1253656, 1253656678, 42 * 1024 * 1024] {
            let (from_text, _) = split_formatted(&text(bytes));
            assert!(
                (numeric(bytes) - from_text).abs() <= 0.01,
                "numeric and text modes disagree for {bytes}"
            );
        }
    }

    #[test]
    fn test_object_mode() {
        let converted = convert_bytes(10 * 1024 * 1024, true, false).unwrap();
        assert_eq!(
            converted,
            Converted::Object(ConvertedBytes::new(10.0, SizeUnit::Mb))
        );
    }

    #[test]
    fn test_saturates_at_pb() {
        // 4096 PB stays in the PB bucket with a large amount
        let bytes = 4096 * 1024u64.pow(5);
        let s = text(bytes);
        assert_eq!(s, "4096.00PB");
    }

    #[test]
    fn test_conflicting_modes_fail() {
        for bytes in [0, 1, 1253656] {
            let err = convert_bytes(bytes, true, true).unwrap_err();
            assert!(matches!(err, PlatformError::ConflictingOutputModes));
        }
    }

    #[test]
    fn test_unit_validation() {
        assert!(ConvertedBytes::with_unit_str(1.0, "MB").is_ok());
        let err = ConvertedBytes::with_unit_str(1.0, "XB").unwrap_err();
        assert!(matches!(err, PlatformError::InvalidUnit(unit) if unit == "XB"));
    }

    #[test]
    fn test_amount_rounding() {
        let converted = ConvertedBytes::new(1.19558, SizeUnit::Mb);
        assert_eq!(converted.amount, 1.2);
        assert_eq!(converted.to_string(), "1.20MB");
    }
}
