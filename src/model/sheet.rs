//! Per-sheet table model.

use super::CellValue;
use serde::{Deserialize, Serialize};

/// One parsed sheet: an ordered grid of typed cells with a header row.
///
/// The first grid row becomes the column labels (the default header
/// convention); remaining rows are the data. Every table is normalized to
/// its widest row: short rows are padded with [`CellValue::Empty`] and a
/// header shorter than the widest data row gets empty-string labels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    /// Sheet name as declared in the workbook
    pub name: String,

    /// Column labels from the header row
    #[serde(default)]
    pub columns: Vec<String>,

    /// Data rows, each padded to the table width
    #[serde(default)]
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Create a new empty sheet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Build a sheet from a raw cell grid, applying the header convention
    /// and width normalization.
    pub fn from_grid(name: impl Into<String>, grid: Vec<Vec<CellValue>>) -> Self {
        let width = grid.iter().map(Vec::len).max().unwrap_or(0);

        let mut grid = grid.into_iter();
        let columns = match grid.next() {
            Some(header) => {
                let mut columns: Vec<String> =
                    header.iter().map(CellValue::to_string).collect();
                columns.resize(width, String::new());
                columns
            }
            None => Vec::new(),
        };

        let rows = grid
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();

        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Number of data rows (the header row is not counted).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Find the index of a column by its label.
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }

    /// Get a data cell by row and column index.
    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Get a whole data row.
    pub fn row(&self, index: usize) -> Option<&[CellValue]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Check if the sheet has no columns and no rows.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_grid_header_convention() {
        let sheet = Sheet::from_grid(
            "Sheet1",
            vec![
                vec![CellValue::from("id"), CellValue::from("name")],
                vec![CellValue::Number(1.0), CellValue::from("Alice")],
            ],
        );

        assert_eq!(sheet.name, "Sheet1");
        assert_eq!(sheet.columns, vec!["id", "name"]);
        assert_eq!(sheet.row_count(), 1);
        assert_eq!(sheet.column_count(), 2);
        assert_eq!(sheet.get(0, 0), Some(&CellValue::Number(1.0)));
        assert_eq!(sheet.get(0, 1), Some(&CellValue::from("Alice")));
    }

    #[test]
    fn test_from_grid_empty() {
        let sheet = Sheet::from_grid("Blank", Vec::new());
        assert!(sheet.is_empty());
        assert_eq!(sheet.row_count(), 0);
        assert_eq!(sheet.column_count(), 0);
    }

    #[test]
    fn test_from_grid_ragged_rows() {
        let sheet = Sheet::from_grid(
            "Ragged",
            vec![
                vec![CellValue::from("a"), CellValue::from("b")],
                vec![CellValue::Number(1.0)],
                vec![
                    CellValue::Number(2.0),
                    CellValue::Number(3.0),
                    CellValue::Number(4.0),
                ],
            ],
        );

        // Widest row wins; header gets empty labels for the overflow
        assert_eq!(sheet.columns, vec!["a", "b", ""]);
        assert_eq!(
            sheet.row(0),
            Some(&[CellValue::Number(1.0), CellValue::Empty, CellValue::Empty][..])
        );
        assert_eq!(sheet.row(1).unwrap().len(), 3);
    }

    #[test]
    fn test_column_index() {
        let sheet = Sheet::from_grid(
            "S",
            vec![vec![CellValue::from("id"), CellValue::from("name")]],
        );
        assert_eq!(sheet.column_index("name"), Some(1));
        assert_eq!(sheet.column_index("age"), None);
    }

    #[test]
    fn test_numeric_header_labels() {
        let sheet = Sheet::from_grid(
            "S",
            vec![vec![CellValue::Number(2024.0), CellValue::Bool(true)]],
        );
        assert_eq!(sheet.columns, vec!["2024", "true"]);
    }
}
