//! Package-level rules: sheet numbering, target conflicts, style sources and
//! schema diagnostics.

use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;
use xlpack::prelude::*;
use xlpack::{write_styles_xml, CellFormat, SchemaValidator, StyleTable, Stylesheet};

#[test]
fn test_sheet_ids_are_sequential() {
    let dir = TempDir::new().unwrap();
    let mut package = Package::create(dir.path().join("ids.xlsx")).unwrap();

    let ids: Vec<u32> = ["North", "South", "East", "West"]
        .iter()
        .map(|name| package.add_worksheet(name).unwrap().sheet_id())
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);

    // A rejected name does not consume an id.
    assert!(package.add_worksheet("north").is_err());
    assert!(package.add_worksheet("").is_err());
    assert_eq!(package.add_worksheet("Central").unwrap().sheet_id(), 5);

    let saved = package.save().unwrap();
    let read = XlsxReader::read_file(saved.path()).unwrap();
    let read_ids: Vec<u32> = read.workbook.sheets().map(|s| s.sheet_id).collect();
    assert_eq!(read_ids, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_target_in_use_is_a_conflict() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shared.xlsx");

    let first = Package::create(&path).unwrap();
    let second = Package::create(&path);
    assert!(matches!(second, Err(ref e) if e.is_conflict()));
    assert!(!path.exists());

    drop(first);
    assert!(Package::create(&path).is_ok());
}

#[test]
fn test_lock_left_by_another_application_is_a_conflict() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("open.xlsx");
    fs::write(dir.path().join("~$open.xlsx"), "someone").unwrap();

    let result = Package::create(&path);
    assert!(matches!(result, Err(XlsxError::Conflict(p)) if p == path));
    assert!(!path.exists());
    // Only the foreign lock remains.
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_abandoned_build_leaves_nothing_behind() {
    let dir = TempDir::new().unwrap();
    {
        let mut package = Package::create(dir.path().join("abandoned.xlsx")).unwrap();
        package.set_styles(ProgrammaticStyle).unwrap();
        let sheet = package.add_worksheet("Data").unwrap();
        package.add_row(sheet, ["a", "b"], preset::BODY).unwrap();
        assert!(package.add_row(sheet, ["c"], 4).is_err());
    }
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_predefined_style_is_written_verbatim() {
    let dir = TempDir::new().unwrap();
    let markup = fs::read_to_string(write_programmatic_markup(&dir)).unwrap();
    let styles = DirectoryStyles::new(dir.path());

    let mut package = Package::create(dir.path().join("branded.xlsx")).unwrap();
    let report = package
        .set_styles(PredefinedStyle::new(&styles, "branded"))
        .unwrap();
    assert!(report.is_conformant(), "{:?}", report);
    assert_eq!(package.cell_format_count(), 4);

    let sheet = package.add_worksheet("Data").unwrap();
    package.add_row(sheet, ["x"], preset::HEADER_CENTERED).unwrap();
    let saved = package.save().unwrap();

    let read = XlsxReader::read_file(saved.path()).unwrap();
    let stylesheet = read.workbook.stylesheet().unwrap();
    assert_eq!(stylesheet.markup(), Some(markup.as_str()));
}

#[test]
fn test_unknown_predefined_style_is_not_found() {
    let dir = TempDir::new().unwrap();
    let mut package = Package::create(dir.path().join("plain.xlsx")).unwrap();

    let result = package.set_styles(PredefinedStyle::new(NamedStyles::new(), "corporate"));
    assert!(matches!(result, Err(XlsxError::StyleNotFound(ref n)) if n == "corporate"));
    assert!(package.workbook().stylesheet().is_none());
    assert!(!package.parts().contains("/xl/styles.xml"));
}

#[test]
fn test_malformed_style_table_is_reported_not_raised() {
    let mut table = StyleTable::new();
    table.push_cell_format(CellFormat::based_on(0).with_font(7));

    let report = SchemaValidator::new().validate_stylesheet(&Stylesheet::built(table.clone()));
    assert!(!report.is_conformant());
    assert!(report
        .iter()
        .any(|v| v.path.contains("cellXfs") && v.message.contains("fontId=7")));

    // The build goes on and the file is still written.
    let dir = TempDir::new().unwrap();
    let mut package = Package::create(dir.path().join("odd.xlsx")).unwrap();
    let report = package.set_stylesheet(Stylesheet::built(table)).unwrap();
    assert!(!report.is_empty());
    let sheet = package.add_worksheet("Data").unwrap();
    package.add_row(sheet, ["odd"], 1).unwrap();

    let saved = package.save().unwrap();
    assert!(saved.path().exists());
    assert!(!saved.report().is_conformant());
}

fn write_programmatic_markup(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("branded.xml");
    fs::write(&path, write_styles_xml(&StyleTable::programmatic())).unwrap();
    path
}
