//! Style table types
//!
//! This module contains the catalogue entries of `styles.xml`:
//! - [`Font`], [`Fill`], [`Border`] - independently indexed component catalogues
//! - [`CellFormat`] - composite formats referencing the components
//! - [`CellStyle`] - named aliases for base formats
//! - [`StyleTable`] - the table tying them together
//! - [`preset`] - the built-in header/body format layout

mod alignment;
mod border;
mod catalogue;
mod color;
mod fill;
mod font;
mod format;
mod number_format;
pub mod preset;
mod table;

pub use alignment::{Alignment, HorizontalAlignment, VerticalAlignment};
pub use border::{Border, BorderEdge, BorderLineStyle};
pub use catalogue::Catalogue;
pub use color::Color;
pub use fill::{Fill, PatternType};
pub use font::{Font, FontScheme, DEFAULT_FONT_NAME, DEFAULT_FONT_SIZE};
pub use format::{CellFormat, CellStyle};
pub use number_format::{NumberFormat, FIRST_CUSTOM_NUMBER_FORMAT_ID};
pub use table::StyleTable;
