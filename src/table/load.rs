// src/table/load.rs
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::{fs::File, io::Read, path::Path};
use tracing::{debug, trace};

use super::RawTable;
use crate::error::{Error, Result};

/// Reads delimited text files and workbooks into [`RawTable`]s.
#[derive(Debug, Clone, Copy)]
pub struct TableLoader {
    delimiter: u8,
}

impl Default for TableLoader {
    /// Tab-separated, as data dictionaries are usually exported.
    fn default() -> Self {
        Self { delimiter: b'\t' }
    }
}

impl TableLoader {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Load a delimited file. The first record names the columns.
    #[tracing::instrument(level = "debug", skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<RawTable> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::unreadable(path, e))?;
        let table = self.read_from(file).map_err(|e| Error::unreadable(path, e))?;
        debug!(
            columns = table.column_count(),
            rows = table.row_count(),
            "loaded table"
        );
        Ok(table)
    }

    /// Parse delimited text from any reader.
    pub fn read_from<R: Read>(&self, reader: R) -> std::result::Result<RawTable, csv::Error> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true) // ragged rows are padded/truncated to the header width
            .from_reader(reader);

        let headers = rdr
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let mut table = RawTable::new(headers);

        for (idx, result) in rdr.records().enumerate() {
            let record = result?;
            trace!(idx, fields = record.len(), "record");
            table.push_row(record.iter().map(str::to_string).collect());
        }

        Ok(table)
    }

    /// Load every sheet of a workbook, in workbook order. The first row of
    /// each sheet names its columns; an empty sheet yields an empty table.
    ///
    /// Only an unopenable workbook is an error here. A sheet that cannot be
    /// read is returned as its own `Err` so the other sheets still load.
    #[tracing::instrument(level = "debug", skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load_workbook<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<Vec<(String, Result<RawTable>)>> {
        let path = path.as_ref();
        let mut workbook = open_workbook_auto(path).map_err(|e| Error::unreadable(path, e))?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            let table = workbook
                .worksheet_range(&name)
                .map_err(|e| Error::unreadable(path, format!("sheet {name}: {e}")))
                .map(|range| {
                    let mut rows = range.rows();
                    match rows.next() {
                        Some(header) => {
                            let mut table = RawTable::new(header.iter().map(cell_text).collect());
                            for row in rows {
                                table.push_row(row.iter().map(cell_text).collect());
                            }
                            table
                        }
                        None => RawTable::default(),
                    }
                });
            match &table {
                Ok(t) => debug!(sheet = %name, rows = t.row_count(), "loaded sheet"),
                Err(e) => debug!(sheet = %name, error = %e, "sheet unreadable"),
            }
            sheets.push((name, table));
        }

        Ok(sheets)
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}
