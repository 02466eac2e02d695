//! Workbook type - the main document structure

use crate::cell::CellValue;
use crate::error::{Error, Result};
use crate::style::StyleTable;
use crate::worksheet::Worksheet;
use crate::MAX_SHEET_NAME_LEN;

/// A sheet descriptor: name, 1-based id, relationship to its worksheet part,
/// and the worksheet itself
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    /// Sheet name (unique within the workbook, case-insensitively)
    pub name: String,
    /// 1-based `sheetId`, assigned in append order
    pub sheet_id: u32,
    /// Relationship id linking the workbook part to the worksheet part
    pub relationship_id: String,
    /// Rows of the sheet
    pub worksheet: Worksheet,
}

/// The workbook's style part.
///
/// Either built in code, or installed from predefined markup. Predefined
/// markup is written out verbatim; its parsed catalogue is kept so cell
/// format indices can still be checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Stylesheet {
    table: StyleTable,
    markup: Option<String>,
    source: Option<String>,
}

impl Stylesheet {
    /// A style part serialized from the given table
    pub fn built(table: StyleTable) -> Self {
        Self {
            table,
            markup: None,
            source: None,
        }
    }

    /// A style part installed from named predefined markup
    pub fn predefined<S: Into<String>, M: Into<String>>(
        source: S,
        markup: M,
        table: StyleTable,
    ) -> Self {
        Self {
            table,
            markup: Some(markup.into()),
            source: Some(source.into()),
        }
    }

    /// The style catalogue
    pub fn table(&self) -> &StyleTable {
        &self.table
    }

    /// Verbatim markup, if predefined
    pub fn markup(&self) -> Option<&str> {
        self.markup.as_deref()
    }

    /// Name of the predefined source, if any
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Check if the part is written from predefined markup
    pub fn is_predefined(&self) -> bool {
        self.markup.is_some()
    }
}

/// A workbook (spreadsheet document)
///
/// A workbook owns its sheets and at most one style part.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    /// Sheets in the workbook, in append order
    sheets: Vec<Sheet>,
    /// Style part
    stylesheet: Option<Stylesheet>,
}

impl Workbook {
    /// Create an empty workbook with no sheets and no style part
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of sheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Check if the workbook has no sheets
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Iterate over all sheets in order
    pub fn sheets(&self) -> impl Iterator<Item = &Sheet> {
        self.sheets.iter()
    }

    /// Get a sheet by its `sheetId`
    pub fn sheet(&self, sheet_id: u32) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.sheet_id == sheet_id)
    }

    /// Get a mutable sheet by its `sheetId`
    pub fn sheet_mut(&mut self, sheet_id: u32) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.sheet_id == sheet_id)
    }

    /// Get a sheet by name
    pub fn sheet_by_name(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Get a sheet by position
    pub fn sheet_at(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    /// Get the worksheet of a sheet
    pub fn worksheet_mut(&mut self, sheet_id: u32) -> Result<&mut Worksheet> {
        self.sheet_mut(sheet_id)
            .map(|s| &mut s.worksheet)
            .ok_or_else(|| Error::SheetNotFound(format!("sheetId {}", sheet_id)))
    }

    /// Add a sheet linked through `relationship_id`, returning its `sheetId`.
    ///
    /// Ids are assigned 1, 2, 3, ... in append order.
    pub fn add_sheet<S: Into<String>>(&mut self, name: &str, relationship_id: S) -> Result<u32> {
        self.validate_sheet_name(name)?;

        let sheet_id = self.next_sheet_id();
        self.sheets.push(Sheet {
            name: name.to_string(),
            sheet_id,
            relationship_id: relationship_id.into(),
            worksheet: Worksheet::new(),
        });
        Ok(sheet_id)
    }

    /// Add a sheet as read from a document, keeping its stored `sheetId`
    pub fn push_sheet(&mut self, sheet: Sheet) -> Result<()> {
        self.validate_sheet_name(&sheet.name)?;
        if self.sheet(sheet.sheet_id).is_some() {
            return Err(Error::other(format!(
                "duplicate sheetId {} for sheet '{}'",
                sheet.sheet_id, sheet.name
            )));
        }
        self.sheets.push(sheet);
        Ok(())
    }

    /// Get the style part
    pub fn stylesheet(&self) -> Option<&Stylesheet> {
        self.stylesheet.as_ref()
    }

    /// Install the style part, returning the one it replaces
    pub fn set_stylesheet(&mut self, stylesheet: Stylesheet) -> Option<Stylesheet> {
        self.stylesheet.replace(stylesheet)
    }

    /// Get the style catalogue
    pub fn style_table(&self) -> Option<&StyleTable> {
        self.stylesheet.as_ref().map(Stylesheet::table)
    }

    /// Number of cell formats cells may reference.
    ///
    /// Without a style part only the implicit default format 0 exists.
    pub fn cell_format_count(&self) -> usize {
        self.style_table()
            .map_or(1, StyleTable::cell_format_count)
    }

    /// Append a row to a sheet after checking `style_index` against the
    /// style table. On error the sheet is left unchanged.
    pub fn add_row<I>(&mut self, sheet_id: u32, values: I, style_index: u32) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<CellValue>,
    {
        let count = self.cell_format_count();
        if style_index as usize >= count {
            return Err(Error::StyleIndexOutOfRange {
                index: style_index,
                count,
            });
        }
        self.worksheet_mut(sheet_id)?.add_row(values, style_index);
        Ok(())
    }

    /// Verify every cell in every sheet references an existing cell format
    pub fn check_style_indices(&self) -> Result<()> {
        let count = self.cell_format_count();
        for sheet in &self.sheets {
            sheet.worksheet.check_style_indices(count)?;
        }
        Ok(())
    }

    /// The `sheetId` the next [`add_sheet`](Self::add_sheet) will assign
    pub fn next_sheet_id(&self) -> u32 {
        self.sheets.iter().map(|s| s.sheet_id).max().unwrap_or(0) + 1
    }

    /// Validate a sheet name
    fn validate_sheet_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
        }
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name too long (max {} characters)",
                MAX_SHEET_NAME_LEN
            )));
        }

        // Check for invalid characters
        const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];
        for c in INVALID_CHARS {
            if name.contains(*c) {
                return Err(Error::InvalidSheetName(format!(
                    "Sheet name cannot contain '{}'",
                    c
                )));
            }
        }

        // Check for duplicate names (case-insensitive)
        let name_lower = name.to_lowercase();
        if self
            .sheets
            .iter()
            .any(|s| s.name.to_lowercase() == name_lower)
        {
            return Err(Error::DuplicateSheetName(name.into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::preset;

    #[test]
    fn test_new_workbook_is_empty() {
        let wb = Workbook::new();
        assert!(wb.is_empty());
        assert!(wb.stylesheet().is_none());
        assert_eq!(wb.cell_format_count(), 1);
    }

    #[test]
    fn test_sheet_ids_are_sequential() {
        let mut wb = Workbook::new();
        let ids: Vec<u32> = ["A", "B", "C", "D"]
            .iter()
            .enumerate()
            .map(|(i, name)| wb.add_sheet(name, format!("rId{}", i + 1)).unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(wb.sheet(3).unwrap().name, "C");
        assert_eq!(wb.sheet_at(0).unwrap().relationship_id, "rId1");
    }

    #[test]
    fn test_failed_add_does_not_consume_id() {
        let mut wb = Workbook::new();
        assert_eq!(wb.add_sheet("Data", "rId1").unwrap(), 1);
        assert!(wb.add_sheet("Data", "rId2").is_err());
        assert_eq!(wb.add_sheet("More", "rId2").unwrap(), 2);
        assert_eq!(wb.sheet_count(), 2);
    }

    #[test]
    fn test_duplicate_name() {
        let mut wb = Workbook::new();
        wb.add_sheet("Sheet1", "rId1").unwrap();

        // Case-insensitive duplicate check
        assert!(matches!(
            wb.add_sheet("SHEET1", "rId2"),
            Err(Error::DuplicateSheetName(_))
        ));
        assert!(wb.add_sheet("sheet1", "rId2").is_err());
    }

    #[test]
    fn test_invalid_sheet_name() {
        let mut wb = Workbook::new();

        assert!(wb.add_sheet("", "rId1").is_err());
        assert!(wb.add_sheet("Sheet/1", "rId1").is_err());
        assert!(wb.add_sheet("Sheet:1", "rId1").is_err());
        assert!(wb.add_sheet("Sheet[1]", "rId1").is_err());

        // Too long
        let long_name = "A".repeat(MAX_SHEET_NAME_LEN + 1);
        assert!(wb.add_sheet(&long_name, "rId1").is_err());
        assert!(wb.is_empty());
    }

    #[test]
    fn test_add_row_checks_style_index() {
        let mut wb = Workbook::new();
        let id = wb.add_sheet("Data", "rId1").unwrap();

        // No style part: only format 0 exists
        assert!(wb.add_row(id, ["a"], 0).is_ok());
        assert!(wb.add_row(id, ["a"], 1).is_err());

        wb.set_stylesheet(Stylesheet::built(StyleTable::programmatic()));
        assert!(wb.add_row(id, ["h"], preset::HEADER_CENTERED).is_ok());
        assert!(matches!(
            wb.add_row(id, ["x"], 4),
            Err(Error::StyleIndexOutOfRange { index: 4, count: 4 })
        ));

        // Rejected rows were not appended
        assert_eq!(wb.sheet(id).unwrap().worksheet.row_count(), 2);
        assert!(wb.check_style_indices().is_ok());
    }

    #[test]
    fn test_add_row_unknown_sheet() {
        let mut wb = Workbook::new();
        assert!(matches!(
            wb.add_row(9, ["a"], 0),
            Err(Error::SheetNotFound(_))
        ));
    }

    #[test]
    fn test_push_sheet_rejects_duplicate_id() {
        let mut wb = Workbook::new();
        wb.add_sheet("One", "rId1").unwrap();
        let dup = Sheet {
            name: "Two".into(),
            sheet_id: 1,
            relationship_id: "rId2".into(),
            worksheet: Worksheet::new(),
        };
        assert!(wb.push_sheet(dup).is_err());
    }
}
