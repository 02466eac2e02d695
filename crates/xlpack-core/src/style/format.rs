//! Composite cell format (`<xf>`) and named cell style entries

use super::Alignment;

/// A composite format referencing a font, fill, border and number format.
///
/// Used both for the named base formats (`cellStyleXfs`) and for the formats
/// cells index into (`cellXfs`). The `apply_*` flags mark which attributes
/// override the base format instead of inheriting it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CellFormat {
    /// Number format id (built-in or declared in the table)
    pub number_format_id: u32,
    /// Index into the font catalogue
    pub font_id: u32,
    /// Index into the fill catalogue
    pub fill_id: u32,
    /// Index into the border catalogue
    pub border_id: u32,
    /// Base entry in `cellStyleXfs` (only for entries of `cellXfs`)
    pub format_id: Option<u32>,
    /// Alignment override
    pub alignment: Option<Alignment>,
    /// Number format is an override
    pub apply_number_format: bool,
    /// Font is an override
    pub apply_font: bool,
    /// Fill is an override
    pub apply_fill: bool,
    /// Border is an override
    pub apply_border: bool,
    /// Alignment is an override
    pub apply_alignment: bool,
}

impl CellFormat {
    /// A format referencing every catalogue's default entry
    pub fn new() -> Self {
        Self::default()
    }

    /// A cell format deriving from the given base format
    pub fn based_on(format_id: u32) -> Self {
        Self {
            format_id: Some(format_id),
            ..Self::default()
        }
    }

    /// Set the font
    pub fn with_font(mut self, font_id: u32) -> Self {
        self.font_id = font_id;
        self
    }

    /// Set the fill
    pub fn with_fill(mut self, fill_id: u32) -> Self {
        self.fill_id = fill_id;
        self
    }

    /// Set the border
    pub fn with_border(mut self, border_id: u32) -> Self {
        self.border_id = border_id;
        self
    }

    /// Set the number format
    pub fn with_number_format(mut self, number_format_id: u32) -> Self {
        self.number_format_id = number_format_id;
        self
    }

    /// Set the alignment
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Set each `apply_*` flag to whether the attribute differs from `base`.
    pub fn derive_apply_flags(&mut self, base: &CellFormat) {
        self.apply_number_format = self.number_format_id != base.number_format_id;
        self.apply_font = self.font_id != base.font_id;
        self.apply_fill = self.fill_id != base.fill_id;
        self.apply_border = self.border_id != base.border_id;
        let own = self.alignment.as_ref().filter(|a| !a.is_empty());
        let inherited = base.alignment.as_ref().filter(|a| !a.is_empty());
        self.apply_alignment = own.is_some() && own != inherited;
    }
}

/// A named cell style (`<cellStyle>`), an alias for a `cellStyleXfs` entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellStyle {
    /// Display name
    pub name: String,
    /// Index into `cellStyleXfs`
    pub format_id: u32,
    /// Built-in style id (0 = Normal)
    pub builtin_id: Option<u32>,
}

impl CellStyle {
    /// The mandatory "Normal" style
    pub fn normal() -> Self {
        Self {
            name: "Normal".to_string(),
            format_id: 0,
            builtin_id: Some(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_flags_follow_overrides() {
        let base = CellFormat::new();

        let mut header = CellFormat::based_on(0).with_font(1).with_fill(2);
        header.derive_apply_flags(&base);
        assert!(header.apply_font);
        assert!(header.apply_fill);
        assert!(!header.apply_border);
        assert!(!header.apply_alignment);
        assert!(!header.apply_number_format);

        let mut centered = CellFormat::based_on(0).with_alignment(Alignment::centered());
        centered.derive_apply_flags(&base);
        assert!(centered.apply_alignment);
        assert!(!centered.apply_font);

        let mut plain = CellFormat::based_on(0).with_alignment(Alignment::new());
        plain.derive_apply_flags(&base);
        assert!(!plain.apply_alignment);
    }
}
