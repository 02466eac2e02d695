//! Cell value types

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

/// A typed value handed to the worksheet builder.
///
/// Values are not stored as-is: [`encode`](super::encode) turns each one into
/// the data-type tag and text content that end up in the worksheet part.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Absent value, written as an empty (style-only) cell
    #[default]
    Empty,

    /// Text, written inline
    Text(String),

    /// Whole number
    Integer(i64),

    /// Boolean, written as the words "True"/"False"
    Boolean(bool),

    /// Calendar date
    Date(NaiveDate),

    /// Date and time of day; only the date part is kept
    DateTime(NaiveDateTime),

    /// Floating point number (no dedicated encoding, falls back to text)
    Float(f64),

    /// Any other value, already rendered to its display text
    Other {
        /// Name of the original type, for diagnostics
        type_name: &'static str,
        /// Display rendering of the value
        text: String,
    },
}

impl CellValue {
    /// Create a text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellValue::Text(s.into())
    }

    /// Wrap a value that has no dedicated encoding rule.
    pub fn other<T: fmt::Display>(value: T) -> Self {
        CellValue::Other {
            type_name: std::any::type_name::<T>(),
            text: value.to_string(),
        }
    }

    /// Check if the value is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Name of the value's kind, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::Text(_) => "text",
            CellValue::Integer(_) => "integer",
            CellValue::Boolean(_) => "boolean",
            CellValue::Date(_) => "date",
            CellValue::DateTime(_) => "datetime",
            CellValue::Float(_) => "f64",
            CellValue::Other { type_name, .. } => type_name,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Integer(n) => write!(f, "{}", n),
            CellValue::Boolean(b) => write!(f, "{}", b),
            CellValue::Date(d) => write!(f, "{}", d),
            CellValue::DateTime(dt) => write!(f, "{}", dt),
            CellValue::Float(n) => write!(f, "{}", n),
            CellValue::Other { text, .. } => f.write_str(text),
        }
    }
}

// Conversions from common types

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

impl From<&String> for CellValue {
    fn from(s: &String) -> Self {
        CellValue::Text(s.clone())
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Integer(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Integer(n as i64)
    }
}

impl From<u32> for CellValue {
    fn from(n: u32) -> Self {
        CellValue::Integer(n as i64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Float(n)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Empty, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(CellValue::from("abc"), CellValue::Text("abc".into()));
        assert_eq!(CellValue::from(7), CellValue::Integer(7));
        assert_eq!(CellValue::from(true), CellValue::Boolean(true));
        assert_eq!(CellValue::from(None::<i64>), CellValue::Empty);
        assert_eq!(CellValue::from(Some("x")), CellValue::Text("x".into()));
    }

    #[test]
    fn test_other_keeps_display_text() {
        let value = CellValue::other('Z');
        assert_eq!(value.to_string(), "Z");
        assert_eq!(value.type_name(), "char");
    }
}
