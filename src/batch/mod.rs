// src/batch/mod.rs
//! Drives shaping over one file, a directory of files, or a workbook.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::shape::{NormalizedDataset, RecordShaper};
use crate::table::{RawTable, TableLoader};

/// A file (or workbook sheet) that could not be turned into records.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: Error,
}

impl std::fmt::Display for FileFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.error)
    }
}

/// Result of processing one input.
#[derive(Debug)]
pub enum FileOutcome {
    Processed {
        path: PathBuf,
        dataset: NormalizedDataset,
    },
    Failed(FileFailure),
}

impl FileOutcome {
    fn from_result(path: PathBuf, result: Result<NormalizedDataset>) -> Self {
        match result {
            Ok(dataset) => FileOutcome::Processed { path, dataset },
            Err(error) => FileOutcome::Failed(FileFailure { path, error }),
        }
    }
}

/// Successes and failures of a batch, each in discovery order.
#[derive(Debug, Default)]
pub struct BatchReport {
    processed: Vec<(PathBuf, NormalizedDataset)>,
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    fn record(mut self, outcome: FileOutcome) -> Self {
        match outcome {
            FileOutcome::Processed { path, dataset } => self.processed.push((path, dataset)),
            FileOutcome::Failed(failure) => {
                warn!(path = %failure.path.display(), error = %failure.error, "input rejected");
                self.failures.push(failure);
            }
        }
        self
    }

    pub fn datasets(&self) -> impl Iterator<Item = &NormalizedDataset> + '_ {
        self.processed.iter().map(|(_, ds)| ds)
    }

    pub fn processed(&self) -> &[(PathBuf, NormalizedDataset)] {
        &self.processed
    }

    /// Successful datasets keyed by file name.
    pub fn keyed(&self) -> BTreeMap<String, &NormalizedDataset> {
        self.processed
            .iter()
            .map(|(path, ds)| {
                let key = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                (key, ds)
            })
            .collect()
    }

    /// Split into the success list and the failure list.
    pub fn into_parts(self) -> (Vec<NormalizedDataset>, Vec<FileFailure>) {
        let datasets = self.processed.into_iter().map(|(_, ds)| ds).collect();
        (datasets, self.failures)
    }

    /// Concatenate every success into one dataset.
    pub fn collate(&self) -> NormalizedDataset {
        collate(self.datasets())
    }
}

impl FromIterator<FileOutcome> for BatchReport {
    fn from_iter<I: IntoIterator<Item = FileOutcome>>(iter: I) -> Self {
        iter.into_iter().fold(BatchReport::default(), BatchReport::record)
    }
}

/// Concatenate datasets in order. The result is labeled only when there is at
/// least one input and all inputs are labeled.
///
/// Mixing labeled and unlabeled inputs yields an unlabeled dataset: records
/// keep their `label`, but the tokenized export omits the label column and
/// the training export refuses the dataset. A warning is logged when this
/// happens.
pub fn collate<'a, I>(datasets: I) -> NormalizedDataset
where
    I: IntoIterator<Item = &'a NormalizedDataset>,
{
    let mut labeled = 0usize;
    let mut unlabeled = 0usize;
    let mut records = Vec::new();
    for ds in datasets {
        if ds.is_labeled() {
            labeled += 1;
        } else {
            unlabeled += 1;
        }
        records.extend(ds.iter().cloned());
    }
    if labeled > 0 && unlabeled > 0 {
        warn!(
            labeled,
            unlabeled,
            "mixed labeled and unlabeled inputs; labels dropped from collation"
        );
    }
    NormalizedDataset::new(labeled > 0 && unlabeled == 0, records)
}

/// Loads and shapes data dictionary files sequentially.
pub struct Collator {
    loader: TableLoader,
    shaper: RecordShaper,
}

impl Collator {
    pub fn new(loader: TableLoader, shaper: RecordShaper) -> Self {
        Self { loader, shaper }
    }

    /// Load and shape a single file; its stem becomes the record source.
    #[tracing::instrument(level = "info", skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn process_one<P: AsRef<Path>>(&self, path: P) -> Result<NormalizedDataset> {
        let path = path.as_ref();
        let table = self.loader.load(path)?;
        let dataset = self.shaper.shape(&table, &source_name(path))?;
        info!(records = dataset.len(), "processed");
        Ok(dataset)
    }

    /// Every regular file directly inside `dir` whose name ends with `suffix`,
    /// sorted by file name.
    pub fn discover<P: AsRef<Path>>(dir: P, suffix: &str) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| Error::unreadable(dir, e))? {
            let path = entry.map_err(|e| Error::unreadable(dir, e))?.path();
            let name_matches = path
                .file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| n.ends_with(suffix));
            if path.is_file() && name_matches {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Process every matching file in `dir`. One file's failure never stops
    /// the others; only an unlistable directory is an error.
    #[tracing::instrument(level = "info", skip(self, dir), fields(dir = %dir.as_ref().display()))]
    pub fn process_many<P: AsRef<Path>>(&self, dir: P, suffix: &str) -> Result<BatchReport> {
        let files = Self::discover(dir, suffix)?;
        info!(files = files.len(), suffix, "discovered inputs");

        let report: BatchReport = files
            .into_iter()
            .map(|path| {
                let result = self.process_one(&path);
                FileOutcome::from_result(path, result)
            })
            .collect();

        info!(
            processed = report.processed.len(),
            failed = report.failures.len(),
            "batch complete"
        );
        Ok(report)
    }

    /// Shape every sheet of a workbook except `excluded`, using the sheet name
    /// as record source. Failing sheets are reported as `workbook#sheet`.
    #[tracing::instrument(level = "info", skip(self, path, excluded), fields(path = %path.as_ref().display()))]
    pub fn process_workbook<P: AsRef<Path>>(
        &self,
        path: P,
        excluded: &[String],
    ) -> Result<BatchReport> {
        let path = path.as_ref();
        let sheets = self.loader.load_workbook(path)?;
        Ok(self.shape_sheets(path, sheets, excluded))
    }

    /// Shape already-loaded sheets; see [`Collator::process_workbook`]. A sheet
    /// that failed to load is reported like one that failed to shape.
    pub fn shape_sheets(
        &self,
        path: &Path,
        sheets: Vec<(String, Result<RawTable>)>,
        excluded: &[String],
    ) -> BatchReport {
        sheets
            .into_iter()
            .filter(|(name, _)| {
                let skip = excluded.iter().any(|x| x == name);
                if skip {
                    info!(sheet = %name, "skipping excluded sheet");
                }
                !skip
            })
            .map(|(name, table)| {
                let sheet_path = PathBuf::from(format!("{}#{}", path.display(), name));
                let result = table.and_then(|t| self.shaper.shape(&t, &name));
                FileOutcome::from_result(sheet_path, result)
            })
            .collect()
    }
}

/// The file name without its extension.
pub fn source_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
