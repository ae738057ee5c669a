// src/export.rs
//! Output shapes derived from a [`NormalizedDataset`]. No I/O happens here.

use crate::config::OutputMode;
use crate::error::{Error, Result};
use crate::shape::NormalizedDataset;
use crate::table::RawTable;

pub const SOURCE: &str = "source";
pub const FIELD: &str = "field";
pub const DESCRIPTION: &str = "tokenized_description";
pub const LABEL: &str = "label";
pub const CATEGORY: &str = "category";
pub const TEXT: &str = "text";

/// Canonical columns: source, field, joined description tokens, then the
/// label when the dataset is labeled.
pub fn tokenized(dataset: &NormalizedDataset) -> RawTable {
    let labeled = dataset.is_labeled();
    let mut headers = vec![SOURCE.to_string(), FIELD.to_string(), DESCRIPTION.to_string()];
    if labeled {
        headers.push(LABEL.to_string());
    }

    let mut table = RawTable::new(headers);
    for rec in dataset {
        let mut row = vec![
            rec.source.clone(),
            rec.field.clone(),
            rec.description.clone(),
        ];
        if labeled {
            row.push(rec.label.clone().unwrap_or_default());
        }
        table.push_row(row);
    }
    table
}

/// Two columns for classifier training: `category` (the label) and `text`
/// (source, field and joined description, space-separated).
pub fn training(dataset: &NormalizedDataset) -> Result<RawTable> {
    if !dataset.is_labeled() {
        return Err(Error::MissingLabelColumn);
    }

    let mut table = RawTable::new(vec![CATEGORY.to_string(), TEXT.to_string()]);
    for rec in dataset {
        let category = rec.label.clone().ok_or(Error::MissingLabelColumn)?;
        let text = [rec.source.as_str(), rec.field.as_str(), rec.description.as_str()].join(" ");
        table.push_row(vec![category, text]);
    }
    Ok(table)
}

/// The export `mode` asks for.
pub fn render(dataset: &NormalizedDataset, mode: OutputMode) -> Result<RawTable> {
    match mode {
        OutputMode::Tokenized => Ok(tokenized(dataset)),
        OutputMode::Training => training(dataset),
    }
}
