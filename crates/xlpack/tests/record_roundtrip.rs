//! End-to-end tests for record reports (build -> save -> read -> verify)

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use std::io::Cursor;
use tempfile::TempDir;
use xlpack::prelude::*;
use xlpack::CellDataType;

struct Customer {
    name: String,
    address: String,
    city: String,
    state: String,
    zip: String,
    entry_date: NaiveDate,
}

impl Record for Customer {
    const FIELDS: &'static [Field<Self>] = &[
        Field::new("Name", |c: &Customer| CellValue::from(c.name.as_str())),
        Field::new("Address", |c: &Customer| CellValue::from(c.address.as_str())),
        Field::new("City", |c: &Customer| CellValue::from(c.city.as_str())),
        Field::new("State", |c: &Customer| CellValue::from(c.state.as_str())),
        Field::new("Zip", |c: &Customer| CellValue::from(c.zip.as_str())),
        Field::new("EntryDate", |c: &Customer| CellValue::from(c.entry_date)),
    ];
}

fn customers(n: u32) -> Vec<Customer> {
    (1..=n)
        .map(|i| Customer {
            name: format!("Customer {}", i),
            address: format!("{} Main St", 100 + i),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip: format!("627{:02}", i),
            entry_date: NaiveDate::from_ymd_opt(2024, 1, i).unwrap(),
        })
        .collect()
}

/// Header plus ten records of six columns reads back as 11 rows of 6 cells
#[test]
fn test_header_and_ten_records_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("customers.xlsx");
    let records = customers(10);

    let saved = build_report(
        &path,
        PackageOptions::default(),
        ProgrammaticStyle,
        &RecordSheet::new("Customers"),
        &records,
    )
    .unwrap();
    assert!(saved.report().is_conformant(), "{:?}", saved.report());

    let read = XlsxReader::read_file(&path).unwrap();
    let sheet = read.workbook.sheet_by_name("Customers").unwrap();
    let rows = sheet.worksheet.rows();

    assert_eq!(rows.len(), 11);
    assert!(rows.iter().all(|r| r.cell_count() == 6));
    assert_eq!(rows[0].texts(), Customer::field_names());
    assert!(rows[0].cells().iter().all(|c| c.style_index == preset::HEADER));
    assert!(rows[1..].iter().flat_map(|r| r.cells()).all(|c| c.style_index == preset::BODY));

    let fifth = &rows[5];
    assert_eq!(fifth.texts()[0], "Customer 5");
    let date = fifth.cell(5).unwrap();
    assert_eq!(date.data_type, Some(CellDataType::String));
    assert_eq!(date.text(), "Jan 05, 2024");
}

/// Each value kind lands with the tag and text the encoder gives it
#[test]
fn test_cell_encoding_survives_the_package() {
    let dir = TempDir::new().unwrap();
    let mut package = Package::create(dir.path().join("kinds.xlsx")).unwrap();
    package.set_styles(ProgrammaticStyle).unwrap();
    let sheet = package.add_worksheet("Kinds").unwrap();
    package
        .add_row(
            sheet,
            [
                CellValue::from("text & <markup>"),
                CellValue::from(42),
                CellValue::from(true),
                CellValue::from(
                    NaiveDate::from_ymd_opt(2024, 1, 5)
                        .unwrap()
                        .and_hms_opt(14, 30, 0)
                        .unwrap(),
                ),
                CellValue::Empty,
            ],
            preset::BODY_CENTERED,
        )
        .unwrap();

    let mut buf = Vec::new();
    package.write_to(Cursor::new(&mut buf)).unwrap();
    let read = XlsxReader::read(Cursor::new(&buf)).unwrap();
    let row = read.workbook.sheet_by_name("Kinds").unwrap().worksheet.row(0).unwrap().clone();

    let kinds: Vec<_> = row.cells().iter().map(|c| (c.data_type, c.content.clone())).collect();
    assert_eq!(
        kinds,
        vec![
            (Some(CellDataType::InlineString), Some("text & <markup>".to_string())),
            (None, Some("42".to_string())),
            (Some(CellDataType::String), Some("True".to_string())),
            (Some(CellDataType::String), Some("Jan 05, 2024".to_string())),
            (None, None),
        ]
    );
    assert!(row.cells().iter().all(|c| c.style_index == preset::BODY_CENTERED));
}

/// Saving writes the manifest, relationships and every registered part
#[test]
fn test_saved_part_names() {
    let dir = TempDir::new().unwrap();
    let records = customers(2);
    let saved = build_report(
        dir.path().join("parts.xlsx"),
        PackageOptions::default(),
        ProgrammaticStyle,
        &RecordSheet::new("Customers"),
        &records,
    )
    .unwrap();

    assert_eq!(
        saved.part_names(),
        &[
            "/[Content_Types].xml",
            "/_rels/.rels",
            "/xl/_rels/workbook.xml.rels",
            "/xl/workbook.xml",
            "/docProps/core.xml",
            "/xl/styles.xml",
            "/xl/worksheets/sheet1.xml",
        ]
    );

    let read = XlsxReader::read_file(saved.path()).unwrap();
    for name in saved.part_names() {
        assert!(read.part_names.contains(name), "missing {}", name);
    }
    assert_eq!(
        read.properties.and_then(|p| p.creator).as_deref(),
        Some("xlpack")
    );
}

/// Characters XML cannot carry survive the package as `_xHHHH_` escapes
#[test]
fn test_control_characters_round_trip() {
    let dir = TempDir::new().unwrap();
    let mut package = Package::create(dir.path().join("control.xlsx")).unwrap();
    package.set_styles(ProgrammaticStyle).unwrap();
    let sheet = package.add_worksheet("Raw").unwrap();
    package
        .add_row(sheet, ["bell\u{7}here", "nul\u{0}x"], preset::BODY)
        .unwrap();
    let saved = package.save().unwrap();
    assert!(saved.report().is_conformant(), "{:?}", saved.report());

    let read = XlsxReader::read_file(saved.path()).unwrap();
    let row = read.workbook.sheet_by_name("Raw").unwrap().worksheet.row(0).unwrap().clone();
    assert_eq!(row.texts(), vec!["bell\u{7}here", "nul\u{0}x"]);
}
