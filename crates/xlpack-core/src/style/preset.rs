//! The built-in four-format style table
//!
//! | index | font          | fill        | alignment |
//! |-------|---------------|-------------|-----------|
//! | 0     | body          | none        | inherited |
//! | 1     | body          | none        | centered  |
//! | 2     | bold 14pt     | accent tint | inherited |
//! | 3     | bold 14pt     | accent tint | centered  |
//!
//! Tables derived from this one may append entries but never reorder them,
//! so indices written into existing cells stay valid.

use super::{Alignment, CellFormat, Color, Fill, Font, StyleTable};

/// Body text
pub const BODY: u32 = 0;
/// Body text, centered
pub const BODY_CENTERED: u32 = 1;
/// Bold header on the accent fill
pub const HEADER: u32 = 2;
/// Bold header on the accent fill, centered
pub const HEADER_CENTERED: u32 = 3;

/// Header font size in points
pub const HEADER_FONT_SIZE: f64 = 14.0;

/// Theme accent used behind header rows (Accent 1)
pub const HEADER_FILL_THEME: u8 = 4;

/// Tint applied to the header fill ("60% lighter")
pub const HEADER_FILL_TINT: f64 = 0.599_993_896_298_104_8;

impl StyleTable {
    /// Build the programmatic style table: two fonts, three fills, one border
    /// and the four cell formats listed in the [module docs](self).
    pub fn programmatic() -> Self {
        let mut table = StyleTable::new();

        let header_font = table.add_font(
            Font::default()
                .with_bold(true)
                .with_size(HEADER_FONT_SIZE),
        );
        let header_fill = table.add_fill(Fill::solid(Color::theme_tinted(
            HEADER_FILL_THEME,
            HEADER_FILL_TINT,
        )));

        for (font_id, fill_id) in [(0, 0), (header_font, header_fill)] {
            for centered in [false, true] {
                let mut format = CellFormat::based_on(0).with_font(font_id).with_fill(fill_id);
                if centered {
                    format = format.with_alignment(Alignment::centered());
                }
                table.insert_cell_format(format);
            }
        }

        table
    }
}
