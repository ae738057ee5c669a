pub mod batch;
pub mod config;
pub mod error;
pub mod export;
pub mod invocation;
pub mod shape;
pub mod table;
pub mod text;

pub use batch::{collate, BatchReport, Collator, FileFailure, FileOutcome};
pub use config::{OutputMode, RunSettings};
pub use error::{Error, Result};
pub use shape::{NormalizedDataset, NormalizedRecord, RecordShaper, ShapeOptions};
pub use table::{RawTable, TableLoader, TableWriter};
