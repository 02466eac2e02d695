//! # xlpack
//!
//! Assemble spreadsheet packages (`.xlsx`) that third-party applications open
//! without complaint.
//!
//! xlpack is a document-assembly engine, not a spreadsheet model: it encodes
//! typed values into cells, keeps a shared, index-referenced style table,
//! maintains the part and relationship bookkeeping of the package and checks
//! the result against the SpreadsheetML schema before it is written.
//!
//! ## Example
//!
//! ```rust
//! use xlpack::prelude::*;
//!
//! # fn main() -> Result<(), XlsxError> {
//! # let dir = tempfile::TempDir::new().unwrap();
//! # let path = dir.path().join("report.xlsx");
//! let mut package = Package::create(&path)?;
//! package.set_styles(ProgrammaticStyle)?;
//!
//! let sheet = package.add_worksheet("Customers")?;
//! package.add_row(sheet, ["Name", "Visits"], preset::HEADER)?;
//! package.add_row(sheet, [CellValue::from("Ada"), CellValue::from(3)], preset::BODY)?;
//!
//! let saved = package.save()?;
//! assert_eq!(saved.sheet_count(), 1);
//! # Ok(())
//! # }
//! ```

pub mod prelude;
pub mod records;

pub use records::{build_report, Field, Record, RecordSheet};

// Re-export core types
pub use xlpack_core::{
    encode,
    preset,
    Alignment,
    Border,
    BorderEdge,
    BorderLineStyle,
    Cell,
    CellAddress,
    CellDataType,
    CellFormat,
    CellStyle,
    CellValue,
    Color,
    EncodedCell,
    // Error types
    Error,
    Fill,
    Font,
    FontScheme,
    HorizontalAlignment,
    NumberFormat,
    PatternType,
    Result,
    Row,
    Sheet,
    StyleTable,
    Stylesheet,
    VerticalAlignment,
    Workbook,
    Worksheet,
    // Constants
    MAX_COLS,
    MAX_ROWS,
    MAX_SHEET_NAME_LEN,
};

// Re-export packaging types
pub use xlpack_xlsx::{
    DirectoryStyles, DocumentProperties, NamedStyles, Package, PackageOptions, PredefinedStyle,
    ProgrammaticStyle, ReadPackage, SavedPackage, SchemaValidator, SchemaViolation, SheetHandle,
    StyleSource, StyleStrategy, ValidationReport, XlsxError, XlsxReader, XlsxResult, XlsxWriter,
};
pub use xlpack_xlsx::styles::{read_styles_xml, write_styles_xml};
