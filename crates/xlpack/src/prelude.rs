//! Prelude module - common imports for xlpack users
//!
//! ```rust
//! use xlpack::prelude::*;
//! ```

pub use crate::{
    build_report,
    preset,
    CellValue,
    DirectoryStyles,
    DocumentProperties,
    Field,
    NamedStyles,
    Package,
    PackageOptions,
    PredefinedStyle,
    ProgrammaticStyle,
    Record,
    RecordSheet,
    SavedPackage,
    SchemaValidator,
    SheetHandle,
    StyleStrategy,
    ValidationReport,
    XlsxError,
    XlsxReader,
    XlsxResult,
};
