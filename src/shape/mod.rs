// src/shape/mod.rs
//! Turns a raw data dictionary table into normalized records.

pub mod locate;
pub mod policy;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::table::RawTable;
use crate::text::{cleanse, Lancaster, Stem};
pub use locate::DescriptorLocator;
pub use policy::{ColumnLayout, DescriptorSlot};

/// Default separator used when joining description tokens.
pub const DEFAULT_TOKEN_SEPARATOR: &str = ",";

/// One input row in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRecord {
    /// Originating file stem or sheet name.
    pub source: String,
    /// Field name, lower-cased.
    pub field: String,
    /// Cleansed description tokens, in source order.
    pub description_tokens: Vec<String>,
    /// `description_tokens` joined with the run's token separator.
    pub description: String,
    /// Lower-cased label; present only for labeled input.
    pub label: Option<String>,
}

/// Ordered records from one or more sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedDataset {
    labeled: bool,
    records: Vec<NormalizedRecord>,
}

impl NormalizedDataset {
    pub fn new(labeled: bool, records: Vec<NormalizedRecord>) -> Self {
        Self { labeled, records }
    }

    /// True when every record carries a label.
    pub fn is_labeled(&self) -> bool {
        self.labeled
    }

    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a NormalizedDataset {
    type Item = &'a NormalizedRecord;
    type IntoIter = std::slice::Iter<'a, NormalizedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Mode and join settings for [`RecordShaper`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeOptions {
    /// Treat the last column as a classification label.
    pub labeled: bool,
    /// Joins description tokens into [`NormalizedRecord::description`].
    pub token_separator: String,
}

impl Default for ShapeOptions {
    fn default() -> Self {
        Self {
            labeled: false,
            token_separator: DEFAULT_TOKEN_SEPARATOR.to_string(),
        }
    }
}

/// Builds [`NormalizedDataset`]s from [`RawTable`]s.
///
/// The stemmer is only used to recognise the description header; output
/// tokens are never stemmed.
pub struct RecordShaper {
    stemmer: Box<dyn Stem>,
    options: ShapeOptions,
}

impl RecordShaper {
    pub fn new(stemmer: Box<dyn Stem>, options: ShapeOptions) -> Self {
        Self { stemmer, options }
    }

    /// Resolve which columns hold the field, description and label.
    pub fn resolve_layout(&self, headers: &[String]) -> Result<(usize, usize, Option<usize>)> {
        let ColumnLayout {
            field,
            descriptor,
            label,
        } = policy::layout(headers.len(), self.options.labeled)?;

        let descriptor = match descriptor {
            DescriptorSlot::Fixed(idx) => idx,
            DescriptorSlot::Search(range) => {
                let start = range.start;
                DescriptorLocator::new(self.stemmer.as_ref())
                    .locate(&headers[range])
                    .map(|offset| start + offset)
                    .ok_or_else(|| Error::DescriptorColumnNotFound {
                        columns: headers.to_vec(),
                    })?
            }
        };

        Ok((field, descriptor, label))
    }

    /// Normalize every row of `table`, tagging each record with `source`.
    pub fn shape(&self, table: &RawTable, source: &str) -> Result<NormalizedDataset> {
        let (field_idx, desc_idx, label_idx) = self.resolve_layout(&table.headers)?;
        debug!(
            source,
            description = %table.headers[desc_idx],
            labeled = self.options.labeled,
            "resolved columns"
        );

        let records = table
            .rows
            .iter()
            .map(|row| {
                let cell = |idx: usize| row.get(idx).map(String::as_str).unwrap_or("");
                let description_tokens = cleanse(cell(desc_idx));
                NormalizedRecord {
                    source: source.to_string(),
                    field: cell(field_idx).to_lowercase(),
                    description: description_tokens.join(self.options.token_separator.as_str()),
                    description_tokens,
                    label: label_idx.map(|idx| cell(idx).to_lowercase()),
                }
            })
            .collect();

        Ok(NormalizedDataset::new(self.options.labeled, records))
    }
}

/// Shape `table` with the default (Lancaster) header matching.
pub fn shape(
    table: &RawTable,
    source: &str,
    labeled: bool,
    token_separator: &str,
) -> Result<NormalizedDataset> {
    let options = ShapeOptions {
        labeled,
        token_separator: token_separator.to_string(),
    };
    RecordShaper::new(Box::new(Lancaster), options).shape(table, source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_column_table() -> RawTable {
        RawTable::from_rows(
            ["Field", "Some Description", "Type", "Length"],
            vec![
                vec!["BALANCE_AMT", "The Institution's balance", "NUMBER", "12"],
                vec!["Acct_Id", "Account identifier (primary key)", "CHAR", "10"],
            ],
        )
    }

    #[test]
    fn test_two_columns_bypass_locator() -> anyhow::Result<()> {
        // neither header stems to "description"
        let table = RawTable::from_rows(
            ["Name", "Notes"],
            vec![vec!["balance_amt", "The Institution's Balance"]],
        );
        let ds = shape(&table, "dict", false, " ")?;
        assert_eq!(ds.len(), 1);
        let rec = &ds.records()[0];
        assert_eq!(rec.source, "dict");
        assert_eq!(rec.field, "balance_amt");
        assert_eq!(rec.description_tokens, vec!["institutions", "balance"]);
        assert_eq!(rec.description, "institutions balance");
        assert_eq!(rec.label, None);
        Ok(())
    }

    #[test]
    fn test_wide_table_uses_located_column() -> anyhow::Result<()> {
        let ds = shape(&four_column_table(), "sap", false, ",")?;
        assert!(!ds.is_labeled());
        let fields: Vec<_> = ds.iter().map(|r| r.field.as_str()).collect();
        assert_eq!(fields, vec!["balance_amt", "acct_id"]);
        assert_eq!(ds.records()[0].description, "institutions,balance");
        assert_eq!(
            ds.records()[1].description,
            "account,identifier,primary,key"
        );
        Ok(())
    }

    #[test]
    fn test_too_few_columns() {
        let one = RawTable::from_rows(["Field"], vec![vec!["x"]]);
        assert!(matches!(
            shape(&one, "s", false, ","),
            Err(Error::TooFewColumns { found: 1, .. })
        ));

        let two = RawTable::from_rows(["Field", "Description"], vec![vec!["x", "y"]]);
        assert!(matches!(
            shape(&two, "s", true, ","),
            Err(Error::TooFewColumns { found: 2, required: 3, labeled: true })
        ));
    }

    #[test]
    fn test_missing_descriptor_column() {
        let table = RawTable::from_rows(["Field", "Comment", "Type"], vec![vec!["a", "b", "c"]]);
        let err = shape(&table, "s", false, ",").unwrap_err();
        assert!(err.is_data_shape());
        match err {
            Error::DescriptorColumnNotFound { columns } => assert_eq!(columns.len(), 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_labeled_table_takes_trailing_label() -> anyhow::Result<()> {
        let table = RawTable::from_rows(
            ["Field", "Type", "Field Description", "Owner", "Category"],
            vec![
                vec!["CUST_NM", "CHAR", "Customer's full name", "crm", "Personal Data"],
                vec!["TXN_AMT", "NUMBER", "Transaction amount", "gl", "FINANCIAL"],
            ],
        );
        let ds = shape(&table, "Sheet1", true, " ")?;
        assert!(ds.is_labeled());
        assert_eq!(ds.records()[0].label.as_deref(), Some("personal data"));
        assert_eq!(ds.records()[0].description, "customers full name");
        assert_eq!(ds.records()[1].label.as_deref(), Some("financial"));
        Ok(())
    }

    #[test]
    fn test_labeled_search_excludes_label_column() {
        // only the label header mentions descriptions, so nothing is found
        let table = RawTable::from_rows(
            ["Field", "Notes", "Type", "Description"],
            vec![vec!["a", "b", "c", "d"]],
        );
        assert!(matches!(
            shape(&table, "s", true, ","),
            Err(Error::DescriptorColumnNotFound { .. })
        ));
    }

    #[test]
    fn test_labeled_three_columns_fixed_layout() -> anyhow::Result<()> {
        let table = RawTable::from_rows(
            ["Field", "Text", "Class"],
            vec![vec!["ID", "Unique key", "Identifier"]],
        );
        let ds = shape(&table, "s", true, ",")?;
        assert_eq!(ds.records()[0].description, "unique,key");
        assert_eq!(ds.records()[0].label.as_deref(), Some("identifier"));
        Ok(())
    }

    #[test]
    fn test_zero_rows_is_empty_dataset() -> anyhow::Result<()> {
        let table = RawTable::new(vec!["Field".into(), "Description".into()]);
        assert!(shape(&table, "s", false, ",")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_row_order_preserved() -> anyhow::Result<()> {
        let rows: Vec<Vec<String>> = (0..5)
            .map(|i| vec![format!("F{i}"), format!("value {i}")])
            .collect();
        let table = RawTable::from_rows(
            ["Field".to_string(), "Description".to_string()],
            rows,
        );
        let ds = shape(&table, "s", false, ",")?;
        let fields: Vec<_> = ds.iter().map(|r| r.field.clone()).collect();
        assert_eq!(fields, vec!["f0", "f1", "f2", "f3", "f4"]);
        Ok(())
    }
}
