//! XLSX error types

use std::path::PathBuf;

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur while building, writing or reading a package
#[derive(Debug, Error)]
pub enum XlsxError {
    /// The target file is locked or in use by another writer
    #[error("Package target is locked or in use: {}", .0.display())]
    Conflict(PathBuf),

    /// A named predefined style document does not exist
    #[error("Predefined style not found: {0}")]
    StyleNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Invalid file format or package structure
    #[error("Invalid XLSX format: {0}")]
    InvalidFormat(String),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Core error (structural invariant of the document model)
    #[error("Core error: {0}")]
    Core(#[from] xlpack_core::Error),
}

impl From<quick_xml::events::attributes::AttrError> for XlsxError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        XlsxError::Parse(e.to_string())
    }
}

impl XlsxError {
    /// Check if the error is a lock conflict the caller may retry
    pub fn is_conflict(&self) -> bool {
        matches!(self, XlsxError::Conflict(_))
    }
}
