use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("table has {found} column(s); {required} required when labeled={labeled}")]
    TooFewColumns {
        found: usize,
        required: usize,
        labeled: bool,
    },

    #[error("no description column among {columns:?}")]
    DescriptorColumnNotFound { columns: Vec<String> },

    #[error("dataset was not built in labeled mode")]
    MissingLabelColumn,

    #[error("unreadable source {path:?}: {reason}")]
    UnreadableSource { path: PathBuf, reason: String },

    #[error("failed to write {path:?}: {reason}")]
    WriteError { path: PathBuf, reason: String },
}

impl Error {
    /// True for failures raised by the normalization core itself, as opposed
    /// to the loader/writer collaborators.
    pub fn is_data_shape(&self) -> bool {
        matches!(
            self,
            Error::TooFewColumns { .. }
                | Error::DescriptorColumnNotFound { .. }
                | Error::MissingLabelColumn
        )
    }

    pub(crate) fn unreadable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::UnreadableSource {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::WriteError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
