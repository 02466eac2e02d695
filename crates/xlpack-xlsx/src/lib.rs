//! # xlpack-xlsx
//!
//! Office Open XML packaging for xlpack: the part and relationship model, the
//! style part in both directions, the worksheet and workbook writers, a schema
//! conformance checker and the [`Package`] that ties them to a file on disk.

pub mod error;
pub mod options;
pub mod package;
pub mod part;
pub mod reader;
pub mod strategy;
pub mod styles;
pub mod validator;
pub mod writer;

mod xml;

pub use error::{XlsxError, XlsxResult};
pub use options::{DocumentProperties, PackageOptions};
pub use package::{Package, SavedPackage, SheetHandle};
pub use part::{PartKind, PartRegistry, Relationship, RelationshipTable, RelationshipType};
pub use reader::{ReadPackage, XlsxReader};
pub use strategy::{
    DirectoryStyles, NamedStyles, PredefinedStyle, ProgrammaticStyle, StyleSource, StyleStrategy,
};
pub use validator::{SchemaValidator, SchemaViolation, ValidationReport};
pub use writer::{RenderedPart, XlsxWriter};
