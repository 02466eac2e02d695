//! Worksheet type

use crate::cell::CellValue;
use crate::error::{Error, Result};
use crate::row::{Cell, Row};

/// A worksheet: an ordered sequence of rows.
///
/// The row container is created by the first appended row and kept for the
/// worksheet's lifetime, so a sheet that never received a row is
/// distinguishable from one that did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Worksheet {
    rows: Option<Vec<Row>>,
}

impl Worksheet {
    /// Create a worksheet with no row container
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row, encoding each value and stamping every cell with
    /// `style_index`.
    ///
    /// The index is not checked against the style table here; callers that
    /// need the check go through [`Workbook::add_row`](crate::Workbook::add_row).
    pub fn add_row<I>(&mut self, values: I, style_index: u32)
    where
        I: IntoIterator,
        I::Item: Into<CellValue>,
    {
        let cells = values
            .into_iter()
            .map(|v| Cell::new(&v.into(), style_index))
            .collect();
        self.push_row(Row::from_cells(cells));
    }

    /// Append an already built row
    pub fn push_row(&mut self, row: Row) {
        self.rows.get_or_insert_with(Vec::new).push(row);
    }

    /// Check whether the row container exists
    pub fn has_row_data(&self) -> bool {
        self.rows.is_some()
    }

    /// All rows in order
    pub fn rows(&self) -> &[Row] {
        self.rows.as_deref().unwrap_or(&[])
    }

    /// Get a row by 0-based index
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows().get(index)
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows().len()
    }

    /// Width of the widest row
    pub fn column_count(&self) -> usize {
        self.rows().iter().map(Row::cell_count).max().unwrap_or(0)
    }

    /// Iterate over all cells as (row, col, cell), row-major
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, &Cell)> {
        self.rows().iter().enumerate().flat_map(|(r, row)| {
            row.cells()
                .iter()
                .enumerate()
                .map(move |(c, cell)| (r, c, cell))
        })
    }

    /// Verify every cell's format index is below `cell_format_count`.
    pub fn check_style_indices(&self, cell_format_count: usize) -> Result<()> {
        match self
            .iter_cells()
            .find(|(_, _, cell)| cell.style_index as usize >= cell_format_count)
        {
            Some((_, _, cell)) => Err(Error::StyleIndexOutOfRange {
                index: cell.style_index,
                count: cell_format_count,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellDataType;

    #[test]
    fn test_row_container_is_lazy() {
        let mut ws = Worksheet::new();
        assert!(!ws.has_row_data());
        assert_eq!(ws.row_count(), 0);

        ws.add_row(Vec::<CellValue>::new(), 0);
        assert!(ws.has_row_data());
        assert_eq!(ws.row_count(), 1);
        assert!(ws.row(0).unwrap().is_empty());
    }

    #[test]
    fn test_add_row_stamps_style() {
        let mut ws = Worksheet::new();
        ws.add_row(
            vec![
                CellValue::from("a"),
                CellValue::from(1),
                CellValue::Empty,
            ],
            3,
        );

        let row = ws.row(0).unwrap();
        assert_eq!(row.cell_count(), 3);
        assert!(row.cells().iter().all(|c| c.style_index == 3));
        assert_eq!(row.cell(0).unwrap().data_type, Some(CellDataType::InlineString));
        assert_eq!(row.cell(1).unwrap().data_type, None);
        assert!(row.cell(2).unwrap().is_empty());
        assert_eq!(row.texts(), vec!["a", "1", ""]);
    }

    #[test]
    fn test_each_append_adds_one_row() {
        let mut ws = Worksheet::new();
        for n in 0..5 {
            ws.add_row(["x", "y"], 0);
            assert_eq!(ws.row_count(), n + 1);
        }
        assert_eq!(ws.column_count(), 2);
        assert_eq!(ws.iter_cells().count(), 10);
    }

    #[test]
    fn test_check_style_indices() {
        let mut ws = Worksheet::new();
        ws.add_row(["x"], 1);
        assert!(ws.check_style_indices(2).is_ok());
        assert!(matches!(
            ws.check_style_indices(1),
            Err(Error::StyleIndexOutOfRange { index: 1, count: 1 })
        ));
    }
}
