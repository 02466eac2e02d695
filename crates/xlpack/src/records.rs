//! Rendering typed records as a report sheet
//!
//! A record type declares its columns once, as an ordered list of
//! `(name, accessor)` pairs. The header row is the list of names; each data
//! row is the accessors applied to one record.
//!
//! ```rust
//! use xlpack::records::{Field, Record};
//! use xlpack::CellValue;
//!
//! struct City {
//!     name: String,
//!     population: i64,
//! }
//!
//! impl Record for City {
//!     const FIELDS: &'static [Field<Self>] = &[
//!         Field::new("Name", |c: &City| CellValue::from(c.name.as_str())),
//!         Field::new("Population", |c: &City| CellValue::from(c.population)),
//!     ];
//! }
//!
//! assert_eq!(City::field_names(), vec!["Name", "Population"]);
//! ```

use std::path::Path;

use xlpack_core::{preset, CellValue};
use xlpack_xlsx::{
    Package, PackageOptions, SavedPackage, SheetHandle, StyleStrategy, XlsxResult,
};

/// One column of a record type
pub struct Field<R> {
    /// Column header
    pub name: &'static str,
    /// Extracts the column value from a record
    pub value: fn(&R) -> CellValue,
}

impl<R> Field<R> {
    /// Declare a column
    pub const fn new(name: &'static str, value: fn(&R) -> CellValue) -> Self {
        Self { name, value }
    }
}

impl<R> Clone for Field<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Field<R> {}

impl<R> std::fmt::Debug for Field<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field").field("name", &self.name).finish()
    }
}

/// A type that can be rendered as one row of a report
pub trait Record: Sized + 'static {
    /// Columns in display order
    const FIELDS: &'static [Field<Self>];

    /// Header names in display order
    fn field_names() -> Vec<&'static str> {
        Self::FIELDS.iter().map(|f| f.name).collect()
    }

    /// Values of this record in display order
    fn values(&self) -> Vec<CellValue> {
        Self::FIELDS.iter().map(|f| (f.value)(self)).collect()
    }
}

/// Writes records into a new worksheet: one header row, then one row per record.
#[derive(Debug, Clone)]
pub struct RecordSheet {
    name: String,
    header_style: u32,
    body_style: u32,
}

impl RecordSheet {
    /// A sheet named `name` using the bold header format and the plain body format
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            header_style: preset::HEADER,
            body_style: preset::BODY,
        }
    }

    /// Cell format index for the header row
    pub fn with_header_style(mut self, style_index: u32) -> Self {
        self.header_style = style_index;
        self
    }

    /// Cell format index for data rows
    pub fn with_body_style(mut self, style_index: u32) -> Self {
        self.body_style = style_index;
        self
    }

    /// Sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add the sheet to `package` and fill it.
    ///
    /// Both style indices are checked against the installed style part before
    /// the sheet is created, so a bad index leaves the package unchanged.
    pub fn write<'r, R, I>(&self, package: &mut Package, records: I) -> XlsxResult<SheetHandle>
    where
        R: Record,
        I: IntoIterator<Item = &'r R>,
    {
        let count = package.cell_format_count();
        for index in [self.header_style, self.body_style] {
            if index as usize >= count {
                return Err(xlpack_core::Error::StyleIndexOutOfRange { index, count }.into());
            }
        }

        let sheet = package.add_worksheet(&self.name)?;
        package.add_row(sheet, R::field_names(), self.header_style)?;

        let mut written = 0usize;
        for record in records {
            package.add_row(sheet, record.values(), self.body_style)?;
            written += 1;
        }
        log::debug!("wrote {} records to sheet '{}'", written, self.name);
        Ok(sheet)
    }
}

/// Build and save a single-sheet report at `path`.
///
/// The package is dropped without a trace if any step fails.
pub fn build_report<'r, P, S, R, I>(
    path: P,
    options: PackageOptions,
    strategy: S,
    sheet: &RecordSheet,
    records: I,
) -> XlsxResult<SavedPackage>
where
    P: AsRef<Path>,
    S: StyleStrategy,
    R: Record,
    I: IntoIterator<Item = &'r R>,
{
    let mut package = Package::create_with_options(path, options)?;
    package.set_styles(strategy)?.log_warnings();
    sheet.write(&mut package, records)?;
    package.save()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use xlpack_xlsx::ProgrammaticStyle;

    struct Pair {
        key: &'static str,
        count: i64,
    }

    impl Record for Pair {
        const FIELDS: &'static [Field<Self>] = &[
            Field::new("Key", |p: &Pair| CellValue::from(p.key)),
            Field::new("Count", |p: &Pair| CellValue::from(p.count)),
        ];
    }

    #[test]
    fn test_values_follow_field_order() {
        let pair = Pair { key: "a", count: 3 };
        assert_eq!(
            pair.values(),
            vec![CellValue::from("a"), CellValue::from(3i64)]
        );
        assert_eq!(Pair::field_names(), vec!["Key", "Count"]);
    }

    #[test]
    fn test_bad_style_leaves_package_unchanged() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut package = Package::create(dir.path().join("p.xlsx")).unwrap();
        package.set_styles(ProgrammaticStyle).unwrap();

        let result = RecordSheet::new("Pairs")
            .with_body_style(9)
            .write::<Pair, _>(&mut package, &[]);
        assert!(result.is_err());
        assert_eq!(package.workbook().sheet_count(), 0);
    }

    #[test]
    fn test_header_then_rows() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut package = Package::create(dir.path().join("p.xlsx")).unwrap();
        package.set_styles(ProgrammaticStyle).unwrap();

        let pairs = [Pair { key: "a", count: 1 }, Pair { key: "b", count: 2 }];
        let sheet = RecordSheet::new("Pairs").write(&mut package, &pairs).unwrap();

        let worksheet = package.worksheet(sheet).unwrap();
        assert_eq!(worksheet.row_count(), 3);
        assert_eq!(worksheet.row(0).unwrap().texts(), vec!["Key", "Count"]);
        assert!(worksheet.row(0).unwrap().cells().iter().all(|c| c.style_index == preset::HEADER));
        assert_eq!(worksheet.row(2).unwrap().texts(), vec!["b", "2"]);
    }
}
