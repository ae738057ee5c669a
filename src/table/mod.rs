// src/table/mod.rs
pub mod load;
pub mod write;

pub use load::TableLoader;
pub use write::TableWriter;

/// A generic tabular structure: named columns and rows of cell text.
///
/// Every row has exactly `headers.len()` cells; loaders pad or truncate
/// ragged input to keep that true.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// Column names, as the source file spells them.
    pub headers: Vec<String>,
    /// Each data row, one `String` per column.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Build a table from string slices; handy for fixtures.
    pub fn from_rows<H, R, S>(headers: H, rows: R) -> Self
    where
        H: IntoIterator<Item = S>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(headers.into_iter().map(Into::into).collect());
        for row in rows {
            table.push_row(row.into_iter().map(Into::into).collect());
        }
        table
    }

    /// Append a row, padding short rows with empty cells and dropping cells
    /// beyond the header width.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
