//! Row and cell types

use crate::cell::{encode, CellDataType, CellValue, EncodedCell};

/// A written cell: data-type tag, serialized content and cell format index
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cell {
    /// Explicit data-type tag (`None` = numeric or empty)
    pub data_type: Option<CellDataType>,
    /// Serialized content (`None` = empty cell)
    pub content: Option<String>,
    /// Index into the workbook's cell formats (0 = default)
    pub style_index: u32,
}

impl Cell {
    /// Encode a value into a cell with the given cell format index
    pub fn new(value: &CellValue, style_index: u32) -> Self {
        let EncodedCell { data_type, content } = encode(value);
        Self {
            data_type,
            content,
            style_index,
        }
    }

    /// Create a cell with no value
    pub fn empty(style_index: u32) -> Self {
        Self {
            style_index,
            ..Self::default()
        }
    }

    /// Check if the cell has no content
    pub fn is_empty(&self) -> bool {
        self.content.is_none()
    }

    /// Content as text, empty string for an empty cell
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

/// A row of cells in column order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a row from cells
    pub fn from_cells(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// Append a cell in the next column
    pub fn push(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// Cells in column order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Get a cell by column index
    pub fn cell(&self, col: usize) -> Option<&Cell> {
        self.cells.get(col)
    }

    /// Number of cells in row
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Check if row has any cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell contents as text, in column order
    pub fn texts(&self) -> Vec<&str> {
        self.cells.iter().map(Cell::text).collect()
    }
}
