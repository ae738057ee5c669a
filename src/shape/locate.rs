// src/shape/locate.rs
use tracing::trace;

use crate::text::{cleanse_and_stem, Stem};

/// The word whose stem marks a column as holding field descriptions.
pub const DESCRIPTOR_WORD: &str = "description";

/// Finds the description column among arbitrarily named headers by stem.
///
/// Each header is cleansed into tokens and stemmed; a header matches when any
/// of its stems equals the stem of [`DESCRIPTOR_WORD`]. "Description",
/// "Field Description" and "descriptions" all match under the Lancaster
/// stemmer.
pub struct DescriptorLocator<'a> {
    stemmer: &'a dyn Stem,
    target: String,
}

impl<'a> DescriptorLocator<'a> {
    pub fn new(stemmer: &'a dyn Stem) -> Self {
        Self {
            target: stemmer.stem(DESCRIPTOR_WORD),
            stemmer,
        }
    }

    pub fn target_stem(&self) -> &str {
        &self.target
    }

    /// Whether a single header names a description column.
    pub fn matches(&self, header: &str) -> bool {
        let stems = cleanse_and_stem(header, self.stemmer);
        trace!(header, ?stems, "header stems");
        stems.iter().any(|s| *s == self.target)
    }

    /// Index of the first matching header in declaration order, or `None`.
    pub fn locate<S: AsRef<str>>(&self, headers: &[S]) -> Option<usize> {
        headers.iter().position(|h| self.matches(h.as_ref()))
    }
}
