//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellValue`] - A typed value handed to the worksheet builder
//! - [`encode`] - The value to cell representation mapping
//! - [`CellAddress`] - A cell's location (e.g., "A1")

mod address;
mod encode;
mod value;

pub use address::CellAddress;
pub use encode::{encode, CellDataType, EncodedCell, DATE_DISPLAY_FORMAT};
pub use value::CellValue;
