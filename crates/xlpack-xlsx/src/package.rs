//! Package assembly and persistence
//!
//! A [`Package`] owns the in-memory workbook plus the part and relationship
//! bookkeeping of one output file. Creating a package takes an exclusive
//! lock next to the target; saving writes into a sibling temporary file
//! which then replaces the target. A package that is dropped unsaved leaves
//! neither a partial file nor the lock behind.

use std::fs::{self, OpenOptions};
use std::io::{self, Seek, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use xlpack_core::{CellValue, Sheet, Stylesheet, Workbook, Worksheet};

use crate::error::{XlsxError, XlsxResult};
use crate::options::PackageOptions;
use crate::part::{
    worksheet_part_name, PartKind, PartRegistry, Relationship, RelationshipTable,
    RelationshipType, CORE_PROPERTIES_PART, PACKAGE_ROOT, STYLES_PART, WORKBOOK_PART,
};
use crate::strategy::StyleStrategy;
use crate::validator::{SchemaValidator, ValidationReport};
use crate::writer::{PackageContents, RenderedPart, XlsxWriter};

/// Handle to a worksheet added to a [`Package`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SheetHandle(u32);

impl SheetHandle {
    /// The sheet's `sheetId`
    pub fn sheet_id(&self) -> u32 {
        self.0
    }
}

/// Path of the lock file guarding `target`: `~$<file name>` in the same directory
pub fn lock_path_for(target: &Path) -> XlsxResult<PathBuf> {
    let file_name = target.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("package path has no file name: {}", target.display()),
        )
    })?;
    let mut lock_name = std::ffi::OsString::from("~$");
    lock_name.push(file_name);
    Ok(target.with_file_name(lock_name))
}

/// Exclusive claim on a package target, released on drop
#[derive(Debug)]
struct TargetLock {
    path: PathBuf,
}

impl TargetLock {
    fn acquire(target: &Path) -> XlsxResult<Self> {
        let path = lock_path_for(target)?;
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(XlsxError::Conflict(target.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        let lock = Self { path };
        writeln!(file, "{}", std::process::id())?;
        Ok(lock)
    }
}

impl Drop for TargetLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            log::warn!("failed to remove lock {}: {}", self.path.display(), e);
        }
    }
}

/// Sharing violations reported when another process holds the target open
fn is_in_use(e: &io::Error) -> bool {
    cfg!(windows) && matches!(e.raw_os_error(), Some(32) | Some(33))
}

/// Summary of a saved package
#[derive(Debug, Clone)]
pub struct SavedPackage {
    path: PathBuf,
    part_names: Vec<String>,
    sheet_count: usize,
    report: ValidationReport,
}

impl SavedPackage {
    /// Location of the written file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every stored part, in archive order
    pub fn part_names(&self) -> &[String] {
        &self.part_names
    }

    /// Number of worksheets written
    pub fn sheet_count(&self) -> usize {
        self.sheet_count
    }

    /// Schema violations found while saving (empty when validation was off)
    pub fn report(&self) -> &ValidationReport {
        &self.report
    }
}

/// A spreadsheet package under construction
#[derive(Debug)]
pub struct Package {
    path: PathBuf,
    options: PackageOptions,
    workbook: Workbook,
    parts: PartRegistry,
    relationships: RelationshipTable,
    // Dropped before the lock, so the scratch file is gone once the target is released.
    scratch: NamedTempFile,
    _lock: TargetLock,
}

impl Package {
    /// Start a package that will be saved to `path`
    pub fn create<P: AsRef<Path>>(path: P) -> XlsxResult<Self> {
        Self::create_with_options(path, PackageOptions::default())
    }

    /// Start a package with explicit options.
    ///
    /// Fails with [`XlsxError::Conflict`] if another package holds the target.
    /// The workbook part and the core properties part are registered up front.
    pub fn create_with_options<P: AsRef<Path>>(path: P, options: PackageOptions) -> XlsxResult<Self> {
        let path = path.as_ref().to_path_buf();
        let lock = TargetLock::acquire(&path)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let scratch = tempfile::Builder::new()
            .prefix(".xlpack-")
            .suffix(".tmp")
            .tempfile_in(dir)?;

        let mut parts = PartRegistry::new();
        let mut relationships = RelationshipTable::new();
        parts.register(WORKBOOK_PART, PartKind::Workbook)?;
        relationships.add(PACKAGE_ROOT, WORKBOOK_PART, RelationshipType::OfficeDocument);
        parts.register(CORE_PROPERTIES_PART, PartKind::CoreProperties)?;
        relationships.add(PACKAGE_ROOT, CORE_PROPERTIES_PART, RelationshipType::CoreProperties);

        log::debug!(
            "created package {} (scratch {})",
            path.display(),
            scratch.path().display()
        );

        Ok(Self {
            path,
            options,
            workbook: Workbook::new(),
            parts,
            relationships,
            scratch,
            _lock: lock,
        })
    }

    // ==================== Styles ====================

    /// Build the style part with `strategy` and install it.
    ///
    /// Schema violations in the result are logged and returned, not raised.
    pub fn set_styles<S: StyleStrategy>(&mut self, strategy: S) -> XlsxResult<ValidationReport> {
        let stylesheet = strategy.build_style_table()?;
        self.set_stylesheet(stylesheet)
    }

    /// Install an already built style part.
    ///
    /// Replacing a style part fails if existing cells reference a cell format
    /// the new part does not have.
    pub fn set_stylesheet(&mut self, stylesheet: Stylesheet) -> XlsxResult<ValidationReport> {
        let count = stylesheet.table().cell_format_count();
        for sheet in self.workbook.sheets() {
            sheet.worksheet.check_style_indices(count)?;
        }

        let report = SchemaValidator::new().validate_stylesheet(&stylesheet);
        report.log_warnings();

        if !self.parts.contains(STYLES_PART) {
            self.parts.register(STYLES_PART, PartKind::Styles)?;
            self.relationships
                .add(WORKBOOK_PART, STYLES_PART, RelationshipType::Styles);
        }
        self.workbook.set_stylesheet(stylesheet);
        Ok(report)
    }

    // ==================== Worksheets ====================

    /// Add a worksheet: registers its part, links it from the workbook and
    /// assigns the next `sheetId`.
    pub fn add_worksheet(&mut self, name: &str) -> XlsxResult<SheetHandle> {
        let sheet_id = self.workbook.next_sheet_id();
        let part_name = worksheet_part_name(sheet_id);
        if self.parts.contains(&part_name) {
            return Err(XlsxError::InvalidFormat(format!(
                "part {} is already registered",
                part_name
            )));
        }
        let relationship_id = self.relationships.next_id(WORKBOOK_PART);

        let assigned = self.workbook.add_sheet(name, relationship_id.as_str())?;
        self.parts
            .register(part_name.as_str(), PartKind::Worksheet { sheet_id: assigned })?;
        self.relationships.insert(Relationship {
            id: relationship_id,
            source: WORKBOOK_PART.to_string(),
            target: part_name,
            rel_type: RelationshipType::Worksheet,
        })?;

        Ok(SheetHandle(assigned))
    }

    /// Append a row of values, all cells stamped with `style_index`.
    ///
    /// Fails without touching the sheet if `style_index` is not a cell format
    /// of the installed style part.
    pub fn add_row<I>(&mut self, sheet: SheetHandle, values: I, style_index: u32) -> XlsxResult<()>
    where
        I: IntoIterator,
        I::Item: Into<CellValue>,
    {
        self.workbook.add_row(sheet.0, values, style_index)?;
        Ok(())
    }

    /// Get a sheet descriptor
    pub fn sheet(&self, sheet: SheetHandle) -> Option<&Sheet> {
        self.workbook.sheet(sheet.0)
    }

    /// Get a worksheet
    pub fn worksheet(&self, sheet: SheetHandle) -> XlsxResult<&Worksheet> {
        self.workbook
            .sheet(sheet.0)
            .map(|s| &s.worksheet)
            .ok_or_else(|| xlpack_core::Error::SheetNotFound(format!("sheetId {}", sheet.0)).into())
    }

    /// Get a worksheet for unchecked appends; style indices are checked again on save
    pub fn worksheet_mut(&mut self, sheet: SheetHandle) -> XlsxResult<&mut Worksheet> {
        Ok(self.workbook.worksheet_mut(sheet.0)?)
    }

    // ==================== Accessors ====================

    /// Target path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build options
    pub fn options(&self) -> &PackageOptions {
        &self.options
    }

    /// The in-memory workbook
    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    /// Registered parts
    pub fn parts(&self) -> &PartRegistry {
        &self.parts
    }

    /// Relationships between parts
    pub fn relationships(&self) -> &RelationshipTable {
        &self.relationships
    }

    /// Number of cell formats rows may reference
    pub fn cell_format_count(&self) -> usize {
        self.workbook.cell_format_count()
    }

    // ==================== Output ====================

    fn contents(&self) -> PackageContents<'_> {
        PackageContents {
            workbook: &self.workbook,
            parts: &self.parts,
            relationships: &self.relationships,
            properties: &self.options.properties,
        }
    }

    fn render(&self) -> XlsxResult<(Vec<RenderedPart>, ValidationReport)> {
        self.workbook.check_style_indices()?;
        let rendered = XlsxWriter::render(&self.contents())?;
        let report = if self.options.validate_on_save {
            let report = SchemaValidator::new()
                .validate_parts(&rendered, self.workbook.cell_format_count());
            report.log_warnings();
            report
        } else {
            ValidationReport::new()
        };
        Ok((rendered, report))
    }

    /// Serialize the package into `writer` without finishing it
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> XlsxResult<ValidationReport> {
        let (rendered, report) = self.render()?;
        XlsxWriter::write_parts(&rendered, writer)?;
        Ok(report)
    }

    /// Write the package to its target and release the target.
    ///
    /// The file appears at the target only once it is complete. On error the
    /// target is left as it was.
    pub fn save(mut self) -> XlsxResult<SavedPackage> {
        let (rendered, report) = self.render()?;
        XlsxWriter::write_parts(&rendered, self.scratch.as_file_mut())?;
        self.scratch.as_file().sync_all()?;

        let Package {
            path,
            workbook,
            scratch,
            _lock,
            ..
        } = self;
        if let Err(e) = scratch.persist(&path) {
            return Err(if is_in_use(&e.error) {
                XlsxError::Conflict(path)
            } else {
                e.error.into()
            });
        }

        let saved = SavedPackage {
            part_names: rendered.into_iter().map(|p| p.name).collect(),
            sheet_count: workbook.sheet_count(),
            report,
            path,
        };
        log::info!(
            "saved {} ({} sheets, {} parts)",
            saved.path.display(),
            saved.sheet_count,
            saved.part_names.len()
        );
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::ProgrammaticStyle;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use xlpack_core::preset;

    fn target(dir: &TempDir) -> PathBuf {
        dir.path().join("out.xlsx")
    }

    fn dir_entries(dir: &TempDir) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_lock_path() {
        assert_eq!(
            lock_path_for(Path::new("/tmp/report.xlsx")).unwrap(),
            PathBuf::from("/tmp/~$report.xlsx")
        );
        assert!(lock_path_for(Path::new("/")).is_err());
    }

    #[test]
    fn test_second_package_on_same_target_conflicts() {
        let dir = TempDir::new().unwrap();
        let first = Package::create(target(&dir)).unwrap();
        let second = Package::create(target(&dir));
        assert!(matches!(second, Err(XlsxError::Conflict(_))));
        drop(first);
        assert!(Package::create(target(&dir)).is_ok());
    }

    #[test]
    fn test_dropped_package_leaves_nothing() {
        let dir = TempDir::new().unwrap();
        {
            let mut package = Package::create(target(&dir)).unwrap();
            package.set_styles(ProgrammaticStyle).unwrap();
            let sheet = package.add_worksheet("Data").unwrap();
            package.add_row(sheet, ["a"], preset::BODY).unwrap();
            assert_eq!(dir_entries(&dir).len(), 2);
        }
        assert!(dir_entries(&dir).is_empty());
    }

    #[test]
    fn test_save_replaces_scratch_and_lock_with_target() {
        let dir = TempDir::new().unwrap();
        let mut package = Package::create(target(&dir)).unwrap();
        package.set_styles(ProgrammaticStyle).unwrap();
        let sheet = package.add_worksheet("Data").unwrap();
        package.add_row(sheet, ["a", "b"], preset::HEADER).unwrap();

        let saved = package.save().unwrap();
        assert_eq!(saved.path(), target(&dir));
        assert_eq!(saved.sheet_count(), 1);
        assert!(saved.report().is_conformant(), "{:?}", saved.report());
        assert_eq!(dir_entries(&dir), vec!["out.xlsx".to_string()]);
    }

    #[test]
    fn test_sheet_ids_and_relationships() {
        let dir = TempDir::new().unwrap();
        let mut package = Package::create(target(&dir)).unwrap();
        package.set_styles(ProgrammaticStyle).unwrap();
        let a = package.add_worksheet("A").unwrap();
        let b = package.add_worksheet("B").unwrap();
        let c = package.add_worksheet("C").unwrap();

        assert_eq!([a.sheet_id(), b.sheet_id(), c.sheet_id()], [1, 2, 3]);
        let ids: Vec<&str> = package
            .relationships()
            .from_source(WORKBOOK_PART)
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["rId1", "rId2", "rId3", "rId4"]);
        assert_eq!(package.sheet(b).unwrap().relationship_id, "rId3");
        assert!(package.parts().contains("/xl/worksheets/sheet3.xml"));
    }

    #[test]
    fn test_rejected_sheet_name_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut package = Package::create(target(&dir)).unwrap();
        package.add_worksheet("Data").unwrap();
        let parts = package.parts().len();
        let rels = package.relationships().len();

        assert!(package.add_worksheet("data").is_err());
        assert!(package.add_worksheet("bad/name").is_err());
        assert_eq!(package.parts().len(), parts);
        assert_eq!(package.relationships().len(), rels);
        assert_eq!(package.workbook().sheet_count(), 1);
    }

    #[test]
    fn test_add_row_checks_style_index() {
        let dir = TempDir::new().unwrap();
        let mut package = Package::create(target(&dir)).unwrap();
        package.set_styles(ProgrammaticStyle).unwrap();
        let sheet = package.add_worksheet("Data").unwrap();

        let err = package.add_row(sheet, ["x"], 4).unwrap_err();
        assert!(matches!(
            err,
            XlsxError::Core(xlpack_core::Error::StyleIndexOutOfRange { index: 4, count: 4 })
        ));
        assert_eq!(package.worksheet(sheet).unwrap().row_count(), 0);
    }

    #[test]
    fn test_unchecked_append_fails_at_save() {
        let dir = TempDir::new().unwrap();
        let mut package = Package::create(target(&dir)).unwrap();
        package.set_styles(ProgrammaticStyle).unwrap();
        let sheet = package.add_worksheet("Data").unwrap();
        package.worksheet_mut(sheet).unwrap().add_row(["x"], 17);

        assert!(package.save().is_err());
        assert!(dir_entries(&dir).is_empty());
    }

    #[test]
    fn test_shrinking_style_part_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut package = Package::create(target(&dir)).unwrap();
        package.set_styles(ProgrammaticStyle).unwrap();
        let sheet = package.add_worksheet("Data").unwrap();
        package.add_row(sheet, ["x"], preset::HEADER_CENTERED).unwrap();

        let smaller = Stylesheet::built(xlpack_core::StyleTable::new());
        assert!(package.set_stylesheet(smaller).is_err());
        assert_eq!(package.cell_format_count(), 4);
    }
}
