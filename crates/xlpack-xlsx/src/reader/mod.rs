//! XLSX reader
//!
//! Re-opens a package by following its relationships: `_rels/.rels` to the
//! workbook, the workbook's relationships to the style and worksheet parts.
//! Only inline strings and literal values are understood; there is no
//! shared-string table support.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use xlpack_core::{Cell, CellAddress, CellDataType, Row, Sheet, Stylesheet, Workbook, Worksheet};

use crate::error::{XlsxError, XlsxResult};
use crate::options::DocumentProperties;
use crate::part::{
    rels_part_name, resolve_target, zip_entry_name, Relationship, RelationshipTable,
    RelationshipType, CONTENT_TYPES_PART, PACKAGE_ROOT,
};
use crate::styles::read_styles_xml;
use crate::xml::decode_cell_text;

/// A package read back from storage
#[derive(Debug)]
pub struct ReadPackage {
    /// Sheets with their rows, plus the style part
    pub workbook: Workbook,
    /// Relationships found in the package
    pub relationships: RelationshipTable,
    /// Archive entries as absolute part names
    pub part_names: Vec<String>,
    /// Core document properties, if the package has them
    pub properties: Option<DocumentProperties>,
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a package from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<ReadPackage> {
        let file = File::open(path)?;
        Self::read(file)
    }

    /// Read a package from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<ReadPackage> {
        let mut archive = zip::ZipArchive::new(reader)?;

        if archive.by_name(zip_entry_name(CONTENT_TYPES_PART)).is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let part_names: Vec<String> = archive.file_names().map(|n| format!("/{}", n)).collect();

        let mut relationships = RelationshipTable::new();
        Self::read_relationships(&mut archive, PACKAGE_ROOT, &mut relationships)?;

        let workbook_part = relationships
            .find_by_type(PACKAGE_ROOT, RelationshipType::OfficeDocument)
            .map(|r| r.target.clone())
            .ok_or_else(|| XlsxError::MissingPart("officeDocument relationship".into()))?;
        Self::read_relationships(&mut archive, &workbook_part, &mut relationships)?;

        let mut workbook = Workbook::new();

        if let Some(styles) = relationships.find_by_type(&workbook_part, RelationshipType::Styles) {
            let markup = Self::read_part_string(&mut archive, &styles.target)?;
            let table = read_styles_xml(markup.as_bytes())?;
            workbook.set_stylesheet(Stylesheet::predefined(styles.target.clone(), markup, table));
        }

        for (name, sheet_id, relationship_id) in Self::read_workbook_xml(&mut archive, &workbook_part)? {
            let rel = relationships
                .get(&workbook_part, &relationship_id)
                .ok_or_else(|| {
                    XlsxError::InvalidFormat(format!(
                        "sheet '{}' references unknown relationship {}",
                        name, relationship_id
                    ))
                })?;
            let worksheet = Self::read_worksheet(&mut archive, &rel.target)?;
            workbook.push_sheet(Sheet {
                name,
                sheet_id,
                relationship_id,
                worksheet,
            })?;
        }

        let properties = match relationships.find_by_type(PACKAGE_ROOT, RelationshipType::CoreProperties) {
            Some(rel) => {
                let target = rel.target.clone();
                Some(Self::read_core_properties(&mut archive, &target)?)
            }
            None => None,
        };

        Ok(ReadPackage {
            workbook,
            relationships,
            part_names,
            properties,
        })
    }

    fn read_part_string<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        part_name: &str,
    ) -> XlsxResult<String> {
        let mut file = archive
            .by_name(zip_entry_name(part_name))
            .map_err(|_| XlsxError::MissingPart(part_name.to_string()))?;
        let mut content = String::new();
        file.read_to_string(&mut content)?;
        Ok(content)
    }

    /// Read the `.rels` part of `source` into `table`. Relationship types this
    /// crate does not produce are skipped.
    fn read_relationships<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        source: &str,
        table: &mut RelationshipTable,
    ) -> XlsxResult<()> {
        let rels_name = rels_part_name(source);
        let file = archive
            .by_name(zip_entry_name(&rels_name))
            .map_err(|_| XlsxError::MissingPart(rels_name.clone()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut found = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let mut id = None;
                    let mut target = None;
                    let mut rel_type = None;

                    for attr in e.attributes().flatten() {
                        let value = attr.unescape_value()?.into_owned();
                        match attr.key.as_ref() {
                            b"Id" => id = Some(value),
                            b"Target" => target = Some(value),
                            b"Type" => rel_type = Some(value),
                            _ => {}
                        }
                    }

                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        match RelationshipType::from_uri(&rel_type) {
                            Some(rel_type) => found.push(Relationship {
                                id,
                                source: source.to_string(),
                                target: resolve_target(source, &target),
                                rel_type,
                            }),
                            None => log::debug!("skipping relationship {} of type {}", id, rel_type),
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        for rel in found {
            table.insert(rel)?;
        }
        Ok(())
    }

    /// Read workbook.xml to get (name, sheetId, r:id) per sheet
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        part_name: &str,
    ) -> XlsxResult<Vec<(String, u32, String)>> {
        let file = archive
            .by_name(zip_entry_name(part_name))
            .map_err(|_| XlsxError::MissingPart(part_name.to_string()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == b"sheet" => {
                    let mut name = None;
                    let mut sheet_id = None;
                    let mut r_id = None;

                    for attr in e.attributes().flatten() {
                        let value = attr.unescape_value()?;
                        match attr.key.as_ref() {
                            b"name" => name = Some(value.into_owned()),
                            b"sheetId" => sheet_id = value.parse::<u32>().ok(),
                            b"r:id" => r_id = Some(value.into_owned()),
                            _ => {}
                        }
                    }

                    match (name, sheet_id, r_id) {
                        (Some(name), Some(sheet_id), Some(r_id)) => sheets.push((name, sheet_id, r_id)),
                        _ => {
                            return Err(XlsxError::InvalidFormat(
                                "<sheet> without name, sheetId or r:id".into(),
                            ))
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Read a worksheet part into rows of cells
    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        part_name: &str,
    ) -> XlsxResult<Worksheet> {
        let file = archive
            .by_name(zip_entry_name(part_name))
            .map_err(|_| XlsxError::MissingPart(part_name.to_string()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        // Cell text keeps its whitespace.
        xml_reader.trim_text(false);

        let mut buf = Vec::new();
        let mut worksheet = Worksheet::new();
        let mut row: Option<Row> = None;
        let mut cell: Option<(usize, Cell)> = None;
        let mut in_value = false;
        let mut in_inline = false;
        let mut in_text = false;
        let mut text = String::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"row" => {
                        Self::pad_rows(&mut worksheet, row_number(&e)?);
                        row = Some(Row::new());
                    }
                    b"c" => cell = Some(Self::start_cell(&e, row.as_ref())?),
                    b"v" => {
                        in_value = true;
                        text.clear();
                    }
                    b"is" => {
                        in_inline = true;
                        text.clear();
                    }
                    b"t" if in_inline => in_text = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                    b"row" => {
                        Self::pad_rows(&mut worksheet, row_number(&e)?);
                        worksheet.push_row(Row::new());
                    }
                    b"c" => {
                        let (col, cell) = Self::start_cell(&e, row.as_ref())?;
                        if let Some(row) = row.as_mut() {
                            place_cell(row, col, cell);
                        }
                    }
                    _ => {}
                },
                // Rich-text runs inside <is> concatenate.
                Ok(Event::Text(e)) if in_value || in_text => {
                    text.push_str(&e.unescape()?);
                }
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"v" => {
                        in_value = false;
                        if let Some((_, cell)) = cell.as_mut() {
                            cell.content = Some(decode_cell_text(&text));
                        }
                    }
                    b"is" => {
                        in_inline = false;
                        if let Some((_, cell)) = cell.as_mut() {
                            cell.content = Some(decode_cell_text(&text));
                        }
                    }
                    b"c" => {
                        if let (Some((col, cell)), Some(row)) = (cell.take(), row.as_mut()) {
                            place_cell(row, col, cell);
                        }
                    }
                    b"t" => in_text = false,
                    b"row" => {
                        if let Some(row) = row.take() {
                            worksheet.push_row(row);
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(worksheet)
    }

    /// Add empty rows so the next pushed row lands at 1-based `row_number`
    fn pad_rows(worksheet: &mut Worksheet, row_number: Option<u32>) {
        if let Some(r) = row_number {
            while (worksheet.row_count() as u32) + 1 < r {
                worksheet.push_row(Row::new());
            }
        }
    }

    fn start_cell(
        e: &quick_xml::events::BytesStart<'_>,
        row: Option<&Row>,
    ) -> XlsxResult<(usize, Cell)> {
        let mut col = row.map_or(0, Row::cell_count);
        let mut cell = Cell::empty(0);

        for attr in e.attributes().flatten() {
            let value = attr.unescape_value()?;
            match attr.key.as_ref() {
                b"r" => col = CellAddress::parse(&value)?.col as usize,
                b"s" => {
                    cell.style_index = value.parse().map_err(|_| {
                        XlsxError::Parse(format!("invalid style index s=\"{}\"", value))
                    })?
                }
                b"t" => {
                    cell.data_type = match value.as_ref() {
                        // Numbers are the untagged default.
                        "n" => None,
                        other => {
                            let data_type = CellDataType::from_xlsx(other);
                            if data_type.is_none() {
                                log::warn!("unsupported cell type t=\"{}\", keeping raw value", other);
                            }
                            data_type
                        }
                    }
                }
                _ => {}
            }
        }
        Ok((col, cell))
    }

    fn read_core_properties<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        part_name: &str,
    ) -> XlsxResult<DocumentProperties> {
        let file = archive
            .by_name(zip_entry_name(part_name))
            .map_err(|_| XlsxError::MissingPart(part_name.to_string()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut properties = DocumentProperties {
            creator: None,
            title: None,
            created: None,
        };
        let mut current: Option<&'static str> = None;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    current = match e.local_name().as_ref() {
                        b"creator" => Some("creator"),
                        b"title" => Some("title"),
                        b"created" => Some("created"),
                        _ => None,
                    };
                }
                Ok(Event::Text(e)) => {
                    let value = e.unescape()?.into_owned();
                    match current {
                        Some("creator") => properties.creator = Some(value),
                        Some("title") => properties.title = Some(value),
                        Some("created") => {
                            properties.created = DateTime::parse_from_rfc3339(&value)
                                .ok()
                                .map(|dt| dt.with_timezone(&Utc));
                        }
                        _ => {}
                    }
                }
                Ok(Event::End(_)) => current = None,
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(properties)
    }
}

fn row_number(e: &quick_xml::events::BytesStart<'_>) -> XlsxResult<Option<u32>> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"r" {
            let value = attr.unescape_value()?;
            return value
                .parse::<u32>()
                .map(Some)
                .map_err(|_| XlsxError::Parse(format!("invalid row number r=\"{}\"", value)));
        }
    }
    Ok(None)
}

/// Put `cell` at column `col`, filling any gap with empty cells
fn place_cell(row: &mut Row, col: usize, cell: Cell) {
    while row.cell_count() < col {
        row.push(Cell::empty(0));
    }
    row.push(cell);
}
