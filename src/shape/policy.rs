// src/shape/policy.rs
//! Column-count policy: which column holds field names, descriptions and
//! labels for a given mode and column count.

use std::ops::Range;

use crate::error::{Error, Result};

/// Where the description column comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorSlot {
    /// Fixed by convention; no header search.
    Fixed(usize),
    /// Search these header indices, in order, for a description header.
    Search(Range<usize>),
}

/// Column roles resolved for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub field: usize,
    pub descriptor: DescriptorSlot,
    pub label: Option<usize>,
}

/// Minimum column counts: field + description, plus a trailing label when labeled.
pub const fn min_columns(labeled: bool) -> usize {
    if labeled {
        3
    } else {
        2
    }
}

/// Resolve the layout for a table with `columns` columns.
///
/// | mode      | columns | description          | label  |
/// |-----------|---------|----------------------|--------|
/// | unlabeled | < 2     | `TooFewColumns`      |        |
/// | unlabeled | 2       | column 1             |        |
/// | unlabeled | > 2     | search 1..n          |        |
/// | labeled   | < 3     | `TooFewColumns`      |        |
/// | labeled   | 3       | column 1             | last   |
/// | labeled   | > 3     | search 1..n-1        | last   |
pub fn layout(columns: usize, labeled: bool) -> Result<ColumnLayout> {
    let required = min_columns(labeled);
    if columns < required {
        return Err(Error::TooFewColumns {
            found: columns,
            required,
            labeled,
        });
    }

    let label = labeled.then(|| columns - 1);
    let interior_end = if labeled { columns - 1 } else { columns };
    let descriptor = if columns == required {
        DescriptorSlot::Fixed(1)
    } else {
        DescriptorSlot::Search(1..interior_end)
    };

    Ok(ColumnLayout {
        field: 0,
        descriptor,
        label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlabeled_policy() {
        assert!(matches!(
            layout(1, false),
            Err(Error::TooFewColumns { found: 1, required: 2, .. })
        ));
        assert_eq!(layout(2, false).unwrap().descriptor, DescriptorSlot::Fixed(1));
        let wide = layout(4, false).unwrap();
        assert_eq!(wide.descriptor, DescriptorSlot::Search(1..4));
        assert_eq!(wide.label, None);
    }

    #[test]
    fn test_labeled_policy() {
        assert!(matches!(
            layout(2, true),
            Err(Error::TooFewColumns { found: 2, required: 3, .. })
        ));
        let exact = layout(3, true).unwrap();
        assert_eq!(exact.descriptor, DescriptorSlot::Fixed(1));
        assert_eq!(exact.label, Some(2));
        let wide = layout(5, true).unwrap();
        assert_eq!(wide.descriptor, DescriptorSlot::Search(1..4));
        assert_eq!(wide.label, Some(4));
    }

    #[test]
    fn test_zero_columns() {
        assert!(layout(0, false).is_err());
        assert!(layout(0, true).is_err());
    }
}
