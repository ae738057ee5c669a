// src/table/write.rs
use csv::{Terminator, WriterBuilder};
use std::{fs::File, io::Write, path::Path};
use tracing::info;

use super::RawTable;
use crate::error::{Error, Result};

/// Serializes a [`RawTable`] to delimited text.
#[derive(Debug, Clone, Copy)]
pub struct TableWriter {
    delimiter: u8,
}

impl TableWriter {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Write `table` to `path`, replacing any existing file.
    pub fn write<P: AsRef<Path>>(&self, table: &RawTable, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| Error::write(path, e))?;
        self.write_to(table, file).map_err(|e| Error::write(path, e))?;
        info!(path = %path.display(), rows = table.row_count(), "table written");
        Ok(())
    }

    /// Header line then one line per row, `\n`-terminated with no blank lines.
    pub fn write_to<W: Write>(&self, table: &RawTable, sink: W) -> std::result::Result<(), csv::Error> {
        let mut wtr = WriterBuilder::new()
            .delimiter(self.delimiter)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(sink);

        wtr.write_record(&table.headers)?;
        for row in &table.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_tab_output_has_no_blank_lines() -> anyhow::Result<()> {
        let table = RawTable::from_rows(
            ["source", "field", "tokens"],
            vec![
                vec!["dict", "balance_amt", "institutions,balance"],
                vec!["dict", "acct_id", "account,key"],
            ],
        );
        let mut buf = Vec::new();
        TableWriter::new(b'\t').write_to(&table, &mut buf)?;
        let text = String::from_utf8(buf)?;
        assert_eq!(
            text,
            "source\tfield\ttokens\n\
             dict\tbalance_amt\tinstitutions,balance\n\
             dict\tacct_id\taccount,key\n"
        );
        Ok(())
    }

    #[test]
    fn test_comma_output_quotes_embedded_commas() -> anyhow::Result<()> {
        let table = RawTable::from_rows(["category", "text"], vec![vec!["money", "a, b"]]);
        let mut buf = Vec::new();
        TableWriter::new(b',').write_to(&table, &mut buf)?;
        assert_eq!(String::from_utf8(buf)?, "category,text\nmoney,\"a, b\"\n");
        Ok(())
    }

    #[test]
    fn test_write_into_missing_directory_fails() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let target = dir.path().join("no_such_dir").join("out.tsv");
        let err = TableWriter::new(b'\t')
            .write(&RawTable::default(), &target)
            .unwrap_err();
        assert!(matches!(err, Error::WriteError { .. }));
        Ok(())
    }
}
