//! Value to cell representation mapping

use super::CellValue;

/// Display pattern used for date cells ("Jan 05, 2024")
pub const DATE_DISPLAY_FORMAT: &str = "%b %d, %Y";

/// Data-type tag of a written cell (the `t` attribute of `<c>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellDataType {
    /// Text stored inside the cell (`inlineStr`)
    InlineString,
    /// Number (`n`), the implicit default when no tag is written
    Number,
    /// Native boolean (`b`)
    Boolean,
    /// Computed text (`str`), used for rendered dates and booleans
    String,
}

impl CellDataType {
    /// The `t` attribute value
    pub fn xlsx_type(&self) -> &'static str {
        match self {
            CellDataType::InlineString => "inlineStr",
            CellDataType::Number => "n",
            CellDataType::Boolean => "b",
            CellDataType::String => "str",
        }
    }

    /// Parse a `t` attribute value. Shared strings and errors are not produced by
    /// this crate and map to `None`.
    pub fn from_xlsx(s: &str) -> Option<Self> {
        match s {
            "inlineStr" => Some(CellDataType::InlineString),
            "n" => Some(CellDataType::Number),
            "b" => Some(CellDataType::Boolean),
            "str" => Some(CellDataType::String),
            _ => None,
        }
    }
}

/// Result of encoding one value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncodedCell {
    /// Explicit data-type tag (`None` means numeric or empty)
    pub data_type: Option<CellDataType>,
    /// Serialized content (`None` for an empty cell)
    pub content: Option<String>,
}

impl EncodedCell {
    fn tagged(data_type: CellDataType, content: String) -> Self {
        Self {
            data_type: Some(data_type),
            content: Some(content),
        }
    }
}

/// Encode a typed value into its cell representation.
///
/// Never fails: values without a dedicated rule degrade to their display text
/// and a warning is logged.
pub fn encode(value: &CellValue) -> EncodedCell {
    match value {
        CellValue::Empty => EncodedCell::default(),
        CellValue::Date(date) => EncodedCell::tagged(
            CellDataType::String,
            date.format(DATE_DISPLAY_FORMAT).to_string(),
        ),
        // Time of day is dropped.
        CellValue::DateTime(dt) => EncodedCell::tagged(
            CellDataType::String,
            dt.date().format(DATE_DISPLAY_FORMAT).to_string(),
        ),
        CellValue::Integer(n) => EncodedCell {
            data_type: None,
            content: Some(n.to_string()),
        },
        CellValue::Boolean(b) => EncodedCell::tagged(
            CellDataType::String,
            if *b { "True" } else { "False" }.to_string(),
        ),
        CellValue::Text(s) => EncodedCell::tagged(CellDataType::InlineString, s.clone()),
        CellValue::Float(_) | CellValue::Other { .. } => {
            log::warn!(
                "no cell encoding for {} values, writing display text",
                value.type_name()
            );
            EncodedCell::tagged(CellDataType::InlineString, value.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn tagged(t: CellDataType, s: &str) -> EncodedCell {
        EncodedCell {
            data_type: Some(t),
            content: Some(s.to_string()),
        }
    }

    #[test]
    fn test_empty() {
        assert_eq!(encode(&CellValue::Empty), EncodedCell::default());
    }

    #[test]
    fn test_datetime_drops_time() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        assert_eq!(
            encode(&CellValue::DateTime(dt)),
            tagged(CellDataType::String, "Jan 05, 2024")
        );
    }

    #[test]
    fn test_date() {
        let d = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
        assert_eq!(
            encode(&CellValue::Date(d)),
            tagged(CellDataType::String, "Dec 31, 1999")
        );
    }

    #[test]
    fn test_integer_is_untagged() {
        let encoded = encode(&CellValue::Integer(42));
        assert_eq!(encoded.data_type, None);
        assert_eq!(encoded.content.as_deref(), Some("42"));

        let encoded = encode(&CellValue::Integer(-7));
        assert_eq!(encoded.content.as_deref(), Some("-7"));
    }

    #[test]
    fn test_boolean_is_literal_word() {
        assert_eq!(
            encode(&CellValue::Boolean(true)),
            tagged(CellDataType::String, "True")
        );
        assert_eq!(
            encode(&CellValue::Boolean(false)),
            tagged(CellDataType::String, "False")
        );
    }

    #[test]
    fn test_text_is_inline() {
        assert_eq!(
            encode(&CellValue::text("Springfield")),
            tagged(CellDataType::InlineString, "Springfield")
        );
    }

    #[test]
    fn test_fallback_uses_display_text() {
        assert_eq!(
            encode(&CellValue::Float(2.5)),
            tagged(CellDataType::InlineString, "2.5")
        );
        assert_eq!(
            encode(&CellValue::other('x')),
            tagged(CellDataType::InlineString, "x")
        );
    }

    #[test]
    fn test_xlsx_type_names() {
        for t in [
            CellDataType::InlineString,
            CellDataType::Number,
            CellDataType::Boolean,
            CellDataType::String,
        ] {
            assert_eq!(CellDataType::from_xlsx(t.xlsx_type()), Some(t));
        }
        assert_eq!(CellDataType::from_xlsx("s"), None);
    }
}
