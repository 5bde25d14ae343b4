//! Typed scalar cell values.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single typed cell value.
///
/// Cells carry the best-inferred scalar type of the underlying stored
/// value: numbers stay `f64` (the only numeric type the file format has),
/// date-formatted numbers become [`DateTime`](CellValue::DateTime), and
/// error-valued cells surface as [`Text`](CellValue::Text) holding the
/// literal error code (e.g. `#DIV/0!`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// Empty cell (also used for gaps in sparse rows)
    Empty,
    /// String value
    Text(String),
    /// Numeric value
    Number(f64),
    /// Boolean value
    Bool(bool),
    /// Date/time value converted from an Excel serial number
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Check if the cell is empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Borrow the text content, if this is a text cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Try to interpret the cell as a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(f) => Some(*f),
            CellValue::Bool(b) => Some(f64::from(u8::from(*b))),
            CellValue::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Try to interpret the cell as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            CellValue::Number(f) => Some(*f != 0.0),
            CellValue::Text(s) => match s.to_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Borrow the date/time value, if this is a date/time cell.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Convert an Excel serial date number to a calendar date/time.
    ///
    /// In the default (1900) date system, serial 1 is 1900-01-01 and the
    /// count includes the phantom 1900-02-29 that Excel inherited from
    /// Lotus 1-2-3, so serials from 61 on are shifted back a day. The
    /// legacy 1904 system counts days from 1904-01-01 with no phantom day.
    /// The fractional part is the time of day.
    ///
    /// Returns `None` for negative, non-finite, or out-of-range serials.
    pub fn from_serial_datetime(serial: f64, date1904: bool) -> Option<NaiveDateTime> {
        if !serial.is_finite() || serial < 0.0 {
            return None;
        }

        let (epoch, adjusted) = if date1904 {
            (NaiveDate::from_ymd_opt(1904, 1, 1)?, serial)
        } else {
            let adjusted = if serial >= 61.0 { serial - 1.0 } else { serial };
            (NaiveDate::from_ymd_opt(1899, 12, 31)?, adjusted)
        };

        let mut days = adjusted.floor() as u64;
        let mut secs = (serial.fract() * 86_400.0).round() as u32;
        if secs >= 86_400 {
            days += 1;
            secs -= 86_400;
        }

        let date = epoch.checked_add_days(Days::new(days))?;
        let time = NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)?;
        Some(NaiveDateTime::new(date, time))
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::DateTime(dt) => write!(f, "{}", dt),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Number(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_accessors() {
        assert!(CellValue::Empty.is_empty());
        assert!(!CellValue::Bool(false).is_empty());

        assert_eq!(CellValue::Number(42.0).as_f64(), Some(42.0));
        assert_eq!(CellValue::Text("3.5".into()).as_f64(), Some(3.5));
        assert_eq!(CellValue::Bool(true).as_f64(), Some(1.0));

        assert_eq!(CellValue::Text("yes".into()).as_bool(), Some(true));
        assert_eq!(CellValue::Number(0.0).as_bool(), Some(false));
        assert_eq!(CellValue::Text("maybe".into()).as_bool(), None);

        assert_eq!(CellValue::Text("Alice".into()).as_str(), Some("Alice"));
        assert_eq!(CellValue::Number(1.0).as_str(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::Text("id".into()).to_string(), "id");
        assert_eq!(CellValue::Number(1.0).to_string(), "1");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Bool(true).to_string(), "true");
    }

    #[test]
    fn test_serial_1900_system() {
        let conv = |s| CellValue::from_serial_datetime(s, false).unwrap();

        assert_eq!(conv(1.0), ymd(1900, 1, 1));
        assert_eq!(conv(2.0), ymd(1900, 1, 2));
        assert_eq!(conv(59.0), ymd(1900, 2, 28));
        // Serial 60 is the phantom 1900-02-29
        assert_eq!(conv(61.0), ymd(1900, 3, 1));
        assert_eq!(conv(44197.0), ymd(2021, 1, 1));
        assert_eq!(conv(45658.0), ymd(2025, 1, 1));

        // Time component
        assert_eq!(
            conv(44197.5),
            NaiveDate::from_ymd_opt(2021, 1, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_serial_1904_system() {
        let conv = |s| CellValue::from_serial_datetime(s, true).unwrap();

        assert_eq!(conv(0.0), ymd(1904, 1, 1));
        assert_eq!(conv(1.0), ymd(1904, 1, 2));
        // 2021-01-01 is serial 42735 in the 1904 system
        assert_eq!(conv(42735.0), ymd(2021, 1, 1));
    }

    #[test]
    fn test_serial_rejects_invalid() {
        assert_eq!(CellValue::from_serial_datetime(-1.0, false), None);
        assert_eq!(CellValue::from_serial_datetime(f64::NAN, false), None);
        assert_eq!(CellValue::from_serial_datetime(f64::INFINITY, false), None);
    }
}
