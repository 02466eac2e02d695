//! # xlpack-core
//!
//! In-memory document model for xlpack.
//!
//! This crate provides the pieces a spreadsheet package is assembled from:
//! - [`CellValue`] and [`encode`] - typed input values and their cell representation
//! - [`StyleTable`] - the deduplicated font/fill/border/format catalogue
//! - [`Worksheet`] - rows of cells, each stamped with a cell format index
//! - [`Workbook`] - sheet descriptors and the optional [`Stylesheet`]
//!
//! Packaging into an OOXML file lives in `xlpack-xlsx`.
//!
//! ## Example
//!
//! ```rust
//! use xlpack_core::{preset, CellValue, StyleTable, Stylesheet, Workbook};
//!
//! let mut workbook = Workbook::new();
//! workbook.set_stylesheet(Stylesheet::built(StyleTable::programmatic()));
//!
//! let sheet_id = workbook.add_sheet("Customers", "rId1").unwrap();
//! workbook
//!     .add_row(sheet_id, ["Name", "City"].map(CellValue::from), preset::HEADER)
//!     .unwrap();
//! workbook
//!     .add_row(sheet_id, [CellValue::from("Ada"), CellValue::from(42)], preset::BODY)
//!     .unwrap();
//!
//! assert_eq!(workbook.sheet(sheet_id).unwrap().worksheet.row_count(), 2);
//! ```

pub mod cell;
pub mod error;
pub mod row;
pub mod style;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use cell::{encode, CellAddress, CellDataType, CellValue, EncodedCell};
pub use error::{Error, Result};
pub use row::{Cell, Row};
pub use workbook::{Sheet, Stylesheet, Workbook};
pub use worksheet::Worksheet;

// Re-export all style types for convenience
pub use style::{
    preset, Alignment, Border, BorderEdge, BorderLineStyle, CellFormat, CellStyle, Color, Fill,
    Font, FontScheme, HorizontalAlignment, NumberFormat, PatternType, StyleTable,
    VerticalAlignment,
};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
