//! The shared style table

use super::{
    Border, Catalogue, CellFormat, CellStyle, Fill, Font, NumberFormat,
    FIRST_CUSTOM_NUMBER_FORMAT_ID,
};
use crate::error::{Error, Result};

/// The workbook-wide style catalogue (the content of `styles.xml`).
///
/// Fonts, fills and borders are independent catalogues referenced by
/// position. Cell formats combine them; cells reference a cell format by its
/// index in [`cell_formats`](Self::cell_formats). Index 0 of every catalogue
/// is the default entry.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleTable {
    number_formats: Vec<NumberFormat>,
    fonts: Catalogue<Font>,
    fills: Catalogue<Fill>,
    borders: Catalogue<Border>,
    cell_style_formats: Catalogue<CellFormat>,
    cell_formats: Catalogue<CellFormat>,
    cell_styles: Vec<CellStyle>,
}

impl StyleTable {
    /// Create a table holding only the mandatory default entries:
    /// the body font, the "none" and "gray125" fills, an unstyled border,
    /// one base format, one cell format and the "Normal" cell style.
    pub fn new() -> Self {
        let mut table = Self::empty();
        table.fonts.insert(Font::default());
        table.fills.insert(Fill::none());
        table.fills.insert(Fill::gray125());
        table.borders.insert(Border::new());
        table.cell_style_formats.insert(CellFormat::new());
        table.cell_formats.insert(CellFormat::based_on(0));
        table.cell_styles.push(CellStyle::normal());
        table
    }

    /// Create a table with every catalogue empty (used by readers)
    pub fn empty() -> Self {
        Self {
            number_formats: Vec::new(),
            fonts: Catalogue::new(),
            fills: Catalogue::new(),
            borders: Catalogue::new(),
            cell_style_formats: Catalogue::new(),
            cell_formats: Catalogue::new(),
            cell_styles: Vec::new(),
        }
    }

    // ==================== Building ====================

    /// Get or create a custom number format, returning its id
    pub fn add_number_format<S: Into<String>>(&mut self, code: S) -> u32 {
        let code = code.into();
        if let Some(existing) = self.number_formats.iter().find(|f| f.code == code) {
            return existing.id;
        }
        let id = self
            .number_formats
            .iter()
            .map(|f| f.id + 1)
            .max()
            .unwrap_or(FIRST_CUSTOM_NUMBER_FORMAT_ID)
            .max(FIRST_CUSTOM_NUMBER_FORMAT_ID);
        self.number_formats.push(NumberFormat { id, code });
        id
    }

    /// Get or create a font, returning its index
    pub fn add_font(&mut self, font: Font) -> u32 {
        self.fonts.insert(font)
    }

    /// Get or create a fill, returning its index
    pub fn add_fill(&mut self, fill: Fill) -> u32 {
        self.fills.insert(fill)
    }

    /// Get or create a border, returning its index
    pub fn add_border(&mut self, border: Border) -> u32 {
        self.borders.insert(border)
    }

    /// Get or create a base (named) format, returning its index
    pub fn add_cell_style_format(&mut self, mut format: CellFormat) -> Result<u32> {
        format.format_id = None;
        self.check_components(&format, "cell style format")?;
        Ok(self.cell_style_formats.insert(format))
    }

    /// Get or create a cell format, returning the index cells refer to.
    ///
    /// The `apply_*` flags are derived from the base format the entry points
    /// at (index 0 when unset).
    pub fn add_cell_format(&mut self, format: CellFormat) -> Result<u32> {
        self.check_components(&format, "cell format")?;
        let base_id = format.format_id.unwrap_or(0);
        if !self.cell_style_formats.contains_index(base_id) {
            return Err(Error::InvalidStyleTable(format!(
                "cell format references base format {} but only {} exist",
                base_id,
                self.cell_style_formats.len()
            )));
        }
        Ok(self.insert_cell_format(format))
    }

    /// Add a named cell style
    pub fn add_cell_style(&mut self, style: CellStyle) -> Result<()> {
        if !self.cell_style_formats.contains_index(style.format_id) {
            return Err(Error::InvalidStyleTable(format!(
                "cell style '{}' references base format {} but only {} exist",
                style.name,
                style.format_id,
                self.cell_style_formats.len()
            )));
        }
        self.cell_styles.push(style);
        Ok(())
    }

    /// Derive apply flags and insert without reference checks.
    pub(crate) fn insert_cell_format(&mut self, mut format: CellFormat) -> u32 {
        let base_id = format.format_id.unwrap_or(0);
        let base = self.cell_style_formats.get(base_id).cloned().unwrap_or_default();
        format.format_id = Some(base_id);
        format.derive_apply_flags(&base);
        self.cell_formats.insert(format)
    }

    // ==================== Reading ====================
    //
    // Positional appends that keep entries exactly as found in a document.
    // References are not checked; use `check_references` afterwards.

    /// Append a number format as read
    pub fn push_number_format(&mut self, format: NumberFormat) {
        self.number_formats.push(format);
    }

    /// Append a font as read
    pub fn push_font(&mut self, font: Font) -> u32 {
        self.fonts.push(font)
    }

    /// Append a fill as read
    pub fn push_fill(&mut self, fill: Fill) -> u32 {
        self.fills.push(fill)
    }

    /// Append a border as read
    pub fn push_border(&mut self, border: Border) -> u32 {
        self.borders.push(border)
    }

    /// Append a base format as read
    pub fn push_cell_style_format(&mut self, format: CellFormat) -> u32 {
        self.cell_style_formats.push(format)
    }

    /// Append a cell format as read
    pub fn push_cell_format(&mut self, format: CellFormat) -> u32 {
        self.cell_formats.push(format)
    }

    /// Append a named cell style as read
    pub fn push_cell_style(&mut self, style: CellStyle) {
        self.cell_styles.push(style);
    }

    // ==================== Accessors ====================

    /// Custom number formats
    pub fn number_formats(&self) -> &[NumberFormat] {
        &self.number_formats
    }

    /// Font catalogue
    pub fn fonts(&self) -> &[Font] {
        self.fonts.as_slice()
    }

    /// Fill catalogue
    pub fn fills(&self) -> &[Fill] {
        self.fills.as_slice()
    }

    /// Border catalogue
    pub fn borders(&self) -> &[Border] {
        self.borders.as_slice()
    }

    /// Base formats (`cellStyleXfs`)
    pub fn cell_style_formats(&self) -> &[CellFormat] {
        self.cell_style_formats.as_slice()
    }

    /// Cell formats (`cellXfs`), the list cells index into
    pub fn cell_formats(&self) -> &[CellFormat] {
        self.cell_formats.as_slice()
    }

    /// Named cell styles
    pub fn cell_styles(&self) -> &[CellStyle] {
        &self.cell_styles
    }

    /// Number of cell formats, the exclusive upper bound for cell style indices
    pub fn cell_format_count(&self) -> usize {
        self.cell_formats.len()
    }

    /// Get a cell format by index
    pub fn cell_format(&self, index: u32) -> Option<&CellFormat> {
        self.cell_formats.get(index)
    }

    // ==================== Integrity ====================

    /// Verify that every index reference in the table is within bounds.
    pub fn check_references(&self) -> Result<()> {
        if self.cell_formats.is_empty() {
            return Err(Error::InvalidStyleTable("no cell formats defined".into()));
        }
        for (i, format) in self.cell_style_formats.iter().enumerate() {
            self.check_components(format, &format!("cell style format {}", i))?;
        }
        for (i, format) in self.cell_formats.iter().enumerate() {
            self.check_components(format, &format!("cell format {}", i))?;
            if let Some(base) = format.format_id {
                if !self.cell_style_formats.contains_index(base) {
                    return Err(Error::InvalidStyleTable(format!(
                        "cell format {} references base format {} but only {} exist",
                        i,
                        base,
                        self.cell_style_formats.len()
                    )));
                }
            }
        }
        for style in &self.cell_styles {
            if !self.cell_style_formats.contains_index(style.format_id) {
                return Err(Error::InvalidStyleTable(format!(
                    "cell style '{}' references base format {} but only {} exist",
                    style.name,
                    style.format_id,
                    self.cell_style_formats.len()
                )));
            }
        }
        Ok(())
    }

    fn check_components(&self, format: &CellFormat, what: &str) -> Result<()> {
        let checks = [
            ("font", format.font_id, self.fonts.len()),
            ("fill", format.fill_id, self.fills.len()),
            ("border", format.border_id, self.borders.len()),
        ];
        for (kind, id, len) in checks {
            if id as usize >= len {
                return Err(Error::InvalidStyleTable(format!(
                    "{} references {} {} but only {} exist",
                    what, kind, id, len
                )));
            }
        }
        let num_fmt = format.number_format_id;
        if !NumberFormat::is_builtin_id(num_fmt)
            && !self.number_formats.iter().any(|f| f.id == num_fmt)
        {
            return Err(Error::InvalidStyleTable(format!(
                "{} references undeclared number format {}",
                what, num_fmt
            )));
        }
        Ok(())
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::new()
    }
}
