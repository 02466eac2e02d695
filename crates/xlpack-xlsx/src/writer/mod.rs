//! XLSX writer

use std::io::{Seek, Write};

use chrono::Utc;
use xlpack_core::{CellAddress, CellDataType, Workbook, Worksheet, MAX_COLS, MAX_ROWS};

use crate::error::{XlsxError, XlsxResult};
use crate::options::DocumentProperties;
use crate::part::{
    rels_part_name, zip_entry_name, PartKind, PartRegistry, Relationship, RelationshipTable,
    CONTENT_TYPES_PART, RELATIONSHIPS_CONTENT_TYPE,
};
use crate::styles::write_styles_xml;
use crate::xml::{escape_cell_text, escape_xml_attr, escape_xml_text, needs_space_preserve};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Everything a package is serialized from
#[derive(Debug, Clone, Copy)]
pub struct PackageContents<'a> {
    /// Sheets, rows and the style part
    pub workbook: &'a Workbook,
    /// Registered parts
    pub parts: &'a PartRegistry,
    /// Relationships between parts
    pub relationships: &'a RelationshipTable,
    /// Core document properties
    pub properties: &'a DocumentProperties,
}

/// A serialized XML part, ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPart {
    /// Absolute part name
    pub name: String,
    /// What the part holds; `None` for content types and relationship parts
    pub kind: Option<PartKind>,
    /// XML text
    pub xml: String,
}

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Serialize and store a package into a writer
    pub fn write<W: Write + Seek>(contents: &PackageContents<'_>, writer: W) -> XlsxResult<()> {
        let parts = Self::render(contents)?;
        Self::write_parts(&parts, writer)
    }

    /// Serialize every part of a package.
    ///
    /// The result starts with `[Content_Types].xml`, followed by the
    /// relationship parts and then the registered parts in registration order.
    pub fn render(contents: &PackageContents<'_>) -> XlsxResult<Vec<RenderedPart>> {
        contents.relationships.check_targets(contents.parts)?;

        let mut rendered = Vec::with_capacity(contents.parts.len() + 3);
        rendered.push(RenderedPart {
            name: CONTENT_TYPES_PART.to_string(),
            kind: None,
            xml: content_types_xml(contents.parts),
        });

        for source in contents.relationships.sources() {
            rendered.push(RenderedPart {
                name: rels_part_name(source),
                kind: None,
                xml: relationships_xml(contents.relationships.from_source(source)),
            });
        }

        for part in contents.parts.iter() {
            let xml = match part.kind {
                PartKind::Workbook => workbook_xml(contents.workbook),
                PartKind::Worksheet { sheet_id } => {
                    let sheet = contents
                        .workbook
                        .sheet(sheet_id)
                        .ok_or_else(|| XlsxError::MissingPart(part.name.clone()))?;
                    worksheet_xml(&sheet.worksheet)?
                }
                PartKind::Styles => {
                    let stylesheet = contents
                        .workbook
                        .stylesheet()
                        .ok_or_else(|| XlsxError::MissingPart(part.name.clone()))?;
                    match stylesheet.markup() {
                        Some(markup) => markup.to_string(),
                        None => write_styles_xml(stylesheet.table()),
                    }
                }
                PartKind::CoreProperties => core_properties_xml(contents.properties),
            };
            rendered.push(RenderedPart {
                name: part.name.clone(),
                kind: Some(part.kind),
                xml,
            });
        }

        Ok(rendered)
    }

    /// Store rendered parts as a zip archive
    pub fn write_parts<W: Write + Seek>(parts: &[RenderedPart], writer: W) -> XlsxResult<()> {
        let mut zip = zip::ZipWriter::new(writer);
        let options = zip::write::SimpleFileOptions::default();
        for part in parts {
            zip.start_file(zip_entry_name(&part.name), options)?;
            zip.write_all(part.xml.as_bytes())?;
        }
        zip.finish()?;
        Ok(())
    }
}

/// `[Content_Types].xml`: defaults for `.rels`/`.xml` plus one override per part
pub fn content_types_xml(parts: &PartRegistry) -> String {
    let mut content = format!(
        r#"{}
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="{}"/>
    <Default Extension="xml" ContentType="application/xml"/>"#,
        XML_DECLARATION, RELATIONSHIPS_CONTENT_TYPE
    );
    for part in parts.iter() {
        content.push_str(&format!(
            r#"
    <Override PartName="{}" ContentType="{}"/>"#,
            escape_xml_attr(&part.name),
            part.kind.content_type()
        ));
    }
    content.push_str("\n</Types>");
    content
}

/// A `.rels` part listing the given relationships
pub fn relationships_xml<'a, I>(relationships: I) -> String
where
    I: IntoIterator<Item = &'a Relationship>,
{
    let mut content = format!(
        r#"{}
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        XML_DECLARATION
    );
    for rel in relationships {
        content.push_str(&format!(
            r#"
    <Relationship Id="{}" Type="{}" Target="{}"/>"#,
            escape_xml_attr(&rel.id),
            rel.rel_type.uri(),
            escape_xml_attr(&rel.relative_target())
        ));
    }
    content.push_str("\n</Relationships>");
    content
}

/// `xl/workbook.xml`: the sheet list
pub fn workbook_xml(workbook: &Workbook) -> String {
    let mut content = format!(
        r#"{}
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <sheets>"#,
        XML_DECLARATION
    );
    for sheet in workbook.sheets() {
        content.push_str(&format!(
            r#"
        <sheet name="{}" sheetId="{}" r:id="{}"/>"#,
            escape_xml_attr(&sheet.name),
            sheet.sheet_id,
            escape_xml_attr(&sheet.relationship_id)
        ));
    }
    content.push_str(
        r#"
    </sheets>
</workbook>"#,
    );
    content
}

/// A worksheet part: `<dimension>` plus `<sheetData>` with one `<row>` per row
pub fn worksheet_xml(sheet: &Worksheet) -> XlsxResult<String> {
    if sheet.row_count() > MAX_ROWS as usize {
        return Err(xlpack_core::Error::RowOutOfBounds(sheet.row_count() as u32, MAX_ROWS).into());
    }
    if sheet.column_count() > MAX_COLS as usize {
        return Err(xlpack_core::Error::ColumnOutOfBounds(
            sheet.column_count().min(u16::MAX as usize) as u16,
            MAX_COLS,
        )
        .into());
    }

    let mut content = format!(
        r#"{}
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <dimension ref="{}"/>"#,
        XML_DECLARATION,
        dimension_ref(sheet)
    );

    if !sheet.has_row_data() {
        content.push_str("\n    <sheetData/>\n</worksheet>");
        return Ok(content);
    }

    content.push_str("\n    <sheetData>");
    for (row_index, row) in sheet.rows().iter().enumerate() {
        if row.is_empty() {
            content.push_str(&format!("\n        <row r=\"{}\"/>", row_index + 1));
            continue;
        }
        content.push_str(&format!("\n        <row r=\"{}\">", row_index + 1));
        for (col_index, cell) in row.cells().iter().enumerate() {
            let cell_ref = CellAddress::new(row_index as u32, col_index as u16).to_a1_string();
            let style_attr = if cell.style_index != 0 {
                format!(" s=\"{}\"", cell.style_index)
            } else {
                String::new()
            };
            let type_attr = cell
                .data_type
                .filter(|t| *t != CellDataType::Number)
                .map(|t| format!(" t=\"{}\"", t.xlsx_type()))
                .unwrap_or_default();

            match (cell.data_type, cell.content.as_deref()) {
                (_, None) => content.push_str(&format!(
                    "\n            <c r=\"{}\"{}{}/>",
                    cell_ref, style_attr, type_attr
                )),
                (Some(CellDataType::InlineString), Some(text)) => {
                    let space = if needs_space_preserve(text) {
                        " xml:space=\"preserve\""
                    } else {
                        ""
                    };
                    content.push_str(&format!(
                        "\n            <c r=\"{}\"{}{}><is><t{}>{}</t></is></c>",
                        cell_ref,
                        style_attr,
                        type_attr,
                        space,
                        escape_cell_text(text)
                    ));
                }
                (_, Some(text)) => content.push_str(&format!(
                    "\n            <c r=\"{}\"{}{}><v>{}</v></c>",
                    cell_ref,
                    style_attr,
                    type_attr,
                    escape_cell_text(text)
                )),
            }
        }
        content.push_str("\n        </row>");
    }
    content.push_str("\n    </sheetData>\n</worksheet>");
    Ok(content)
}

/// The used range of a worksheet, `A1` when it holds no cells
fn dimension_ref(sheet: &Worksheet) -> String {
    let rows = sheet.row_count();
    let cols = sheet.column_count();
    if rows == 0 || cols == 0 {
        return "A1".to_string();
    }
    let last = CellAddress::new((rows - 1) as u32, (cols - 1) as u16);
    format!("A1:{}", last.to_a1_string())
}

/// `docProps/core.xml`
pub fn core_properties_xml(properties: &DocumentProperties) -> String {
    let created = properties.created.unwrap_or_else(Utc::now);
    let mut content = format!(
        r#"{}
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
        XML_DECLARATION
    );
    if let Some(title) = &properties.title {
        content.push_str(&format!("\n    <dc:title>{}</dc:title>", escape_xml_text(title)));
    }
    if let Some(creator) = &properties.creator {
        content.push_str(&format!(
            "\n    <dc:creator>{}</dc:creator>",
            escape_xml_text(creator)
        ));
    }
    content.push_str(&format!(
        "\n    <dcterms:created xsi:type=\"dcterms:W3CDTF\">{}</dcterms:created>",
        created.format("%Y-%m-%dT%H:%M:%SZ")
    ));
    content.push_str("\n</cp:coreProperties>");
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::part::{
        worksheet_part_name, RelationshipType, PACKAGE_ROOT, STYLES_PART, WORKBOOK_PART,
    };
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use xlpack_core::{preset, CellValue, StyleTable, Stylesheet};

    fn sample_workbook() -> (Workbook, PartRegistry, RelationshipTable) {
        let mut workbook = Workbook::new();
        let mut parts = PartRegistry::new();
        let mut rels = RelationshipTable::new();

        parts.register(WORKBOOK_PART, PartKind::Workbook).unwrap();
        rels.add(PACKAGE_ROOT, WORKBOOK_PART, RelationshipType::OfficeDocument);

        workbook.set_stylesheet(Stylesheet::built(StyleTable::programmatic()));
        parts.register(STYLES_PART, PartKind::Styles).unwrap();
        rels.add(WORKBOOK_PART, STYLES_PART, RelationshipType::Styles);

        let rid = rels.next_id(WORKBOOK_PART);
        let sheet_id = workbook.add_sheet("People", rid.as_str()).unwrap();
        let part = worksheet_part_name(sheet_id);
        parts
            .register(part.as_str(), PartKind::Worksheet { sheet_id })
            .unwrap();
        rels.add(WORKBOOK_PART, &part, RelationshipType::Worksheet);

        workbook
            .add_row(sheet_id, ["Name", "Joined"], preset::HEADER)
            .unwrap();
        workbook
            .add_row(
                sheet_id,
                [CellValue::from(" Ada & co "), CellValue::from(true)],
                preset::BODY,
            )
            .unwrap();
        (workbook, parts, rels)
    }

    #[test]
    fn test_render_order_and_names() {
        let (workbook, parts, rels) = sample_workbook();
        let properties = DocumentProperties::default();
        let contents = PackageContents {
            workbook: &workbook,
            parts: &parts,
            relationships: &rels,
            properties: &properties,
        };
        let rendered = XlsxWriter::render(&contents).unwrap();
        let names: Vec<&str> = rendered.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "/[Content_Types].xml",
                "/_rels/.rels",
                "/xl/_rels/workbook.xml.rels",
                "/xl/workbook.xml",
                "/xl/styles.xml",
                "/xl/worksheets/sheet1.xml",
            ]
        );
    }

    #[test]
    fn test_worksheet_markup() {
        let (workbook, _, _) = sample_workbook();
        let sheet = workbook.sheet_by_name("People").unwrap();
        let xml = worksheet_xml(&sheet.worksheet).unwrap();

        assert!(xml.contains(r#"<dimension ref="A1:B2"/>"#));
        assert!(xml.contains(r#"<row r="1">"#));
        assert!(xml.contains(r#"<c r="A1" s="2" t="inlineStr"><is><t>Name</t></is></c>"#));
        assert!(xml.contains(
            r#"<c r="A2" t="inlineStr"><is><t xml:space="preserve"> Ada &amp; co </t></is></c>"#
        ));
        assert!(xml.contains(r#"<c r="B2" t="str"><v>True</v></c>"#));
    }

    #[test]
    fn test_integer_cells_have_no_type_tag() {
        let mut sheet = Worksheet::new();
        sheet.add_row([CellValue::from(42)], 0);
        let xml = worksheet_xml(&sheet).unwrap();
        assert!(xml.contains(r#"<c r="A1"><v>42</v></c>"#));
    }

    #[test]
    fn test_control_characters_in_cells_are_escaped() {
        let mut sheet = Worksheet::new();
        sheet.add_row(["bell\u{7}here", "nul\u{0}x"], 0);
        let xml = worksheet_xml(&sheet).unwrap();
        assert!(xml.contains("<t>bell_x0007_here</t>"));
        assert!(xml.contains("<t>nul_x0000_x</t>"));
        assert!(!xml.contains('\u{7}') && !xml.contains('\u{0}'));
    }

    #[test]
    fn test_sheet_without_rows() {
        let xml = worksheet_xml(&Worksheet::new()).unwrap();
        assert!(xml.contains("<sheetData/>"));
        assert!(xml.contains(r#"<dimension ref="A1"/>"#));
    }

    #[test]
    fn test_relationship_targets_are_relative() {
        let (_, _, rels) = sample_workbook();
        let xml = relationships_xml(rels.from_source(WORKBOOK_PART));
        assert!(xml.contains(r#"Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml""#));
        assert!(xml.contains(r#"Target="worksheets/sheet1.xml""#));
    }

    #[test]
    fn test_content_types_list_every_part() {
        let (_, parts, _) = sample_workbook();
        let xml = content_types_xml(&parts);
        assert!(xml.contains(r#"<Override PartName="/xl/workbook.xml""#));
        assert!(xml.contains(r#"<Override PartName="/xl/styles.xml""#));
        assert!(xml.contains(r#"<Override PartName="/xl/worksheets/sheet1.xml""#));
    }

    #[test]
    fn test_core_properties() {
        let properties = DocumentProperties::new()
            .with_title("Q3 <report>")
            .with_created(Utc.with_ymd_and_hms(2024, 1, 5, 14, 30, 0).unwrap());
        let xml = core_properties_xml(&properties);
        assert!(xml.contains("<dc:title>Q3 &lt;report&gt;</dc:title>"));
        assert!(xml.contains("<dc:creator>xlpack</dc:creator>"));
        assert!(xml.contains(">2024-01-05T14:30:00Z</dcterms:created>"));
    }

    #[test]
    fn test_dangling_relationship_is_rejected() {
        let (workbook, parts, mut rels) = sample_workbook();
        rels.add(WORKBOOK_PART, "/xl/worksheets/sheet9.xml", RelationshipType::Worksheet);
        let properties = DocumentProperties::default();
        let contents = PackageContents {
            workbook: &workbook,
            parts: &parts,
            relationships: &rels,
            properties: &properties,
        };
        assert!(matches!(
            XlsxWriter::render(&contents),
            Err(XlsxError::MissingPart(_))
        ));
    }
}
