//! Number format catalogue entries

/// First id available for custom number formats; lower ids are built in.
pub const FIRST_CUSTOM_NUMBER_FORMAT_ID: u32 = 164;

/// A custom `<numFmt>` entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NumberFormat {
    /// Format id referenced by `numFmtId`
    pub id: u32,
    /// Format code (e.g., "0.00%")
    pub code: String,
}

impl NumberFormat {
    /// 0 - General
    pub const ID_GENERAL: u32 = 0;
    /// 14 - mm-dd-yy
    pub const ID_DATE_SHORT: u32 = 14;

    /// Check if an id refers to a built-in format
    pub fn is_builtin_id(id: u32) -> bool {
        id < FIRST_CUSTOM_NUMBER_FORMAT_ID
    }
}
