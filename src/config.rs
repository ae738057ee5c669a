// src/config.rs
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::shape::ShapeOptions;
use crate::text::StemAlgorithm;

/// Sheet that holds workbook bookkeeping rather than a data dictionary.
pub const STATUS_SHEET: &str = "Status list";

/// Which export a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Source, field, joined tokens and optional label; tab-delimited.
    #[default]
    Tokenized,
    /// `category,text` rows for classifier training.
    #[value(alias = "bert")]
    Training,
}

impl OutputMode {
    /// Separator used to join description tokens.
    pub fn token_separator(self) -> &'static str {
        match self {
            OutputMode::Tokenized => ",",
            OutputMode::Training => " ",
        }
    }

    /// File extension of the written export.
    pub fn extension(self) -> &'static str {
        match self {
            OutputMode::Tokenized => "tsv",
            OutputMode::Training => "csv",
        }
    }

    /// Column delimiter used when writing the export.
    pub fn column_delimiter(self) -> u8 {
        match self {
            OutputMode::Tokenized => b'\t',
            OutputMode::Training => b',',
        }
    }
}

/// Everything a run needs beyond its input and target paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSettings {
    pub output_mode: OutputMode,
    pub stemmer: StemAlgorithm,
    /// Column delimiter of delimited input files.
    pub input_delimiter: u8,
    /// File-name suffix selecting inputs in directory mode.
    pub suffix: String,
    /// Workbook sheets never processed.
    pub excluded_sheets: Vec<String>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            output_mode: OutputMode::default(),
            stemmer: StemAlgorithm::default(),
            input_delimiter: b'\t',
            suffix: ".txt".to_string(),
            excluded_sheets: vec![STATUS_SHEET.to_string()],
        }
    }
}

impl RunSettings {
    pub fn shape_options(&self, labeled: bool) -> ShapeOptions {
        ShapeOptions {
            labeled,
            token_separator: self.output_mode.token_separator().to_string(),
        }
    }
}
