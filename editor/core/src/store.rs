//! Line Store
//!
//! The canonical ordered sequence of [`SaleLine`]s for the current bill
//! draft. Every operation is synchronous: network calls happen before the
//! store is touched, so nothing here ever waits.
//!
//! Order mirrors entry order. The only position an operation may disturb is
//! the one it targets; everything else keeps its relative order.

use thiserror::Error;

use crate::model::SaleLine;

/// Errors from positional store operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The index does not name a line
    #[error("line index {index} out of range (store has {len} lines)")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Store length at the time of the call
        len: usize,
    },
}

/// Monetary summary of the draft
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BillTotals {
    /// Sum of billable line amounts
    pub subtotal: f64,
    /// Lines contributing to the subtotal
    pub billable_lines: usize,
    /// Out-of-stock and unknown lines (contribute nothing)
    pub excluded_lines: usize,
}

impl BillTotals {
    /// Grand total. Tax and payment adjustments are outside the editor, so
    /// this equals the subtotal.
    #[must_use]
    pub fn grand_total(&self) -> f64 {
        self.subtotal
    }
}

/// Ordered, mutable sequence of sale lines
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineStore {
    lines: Vec<SaleLine>,
}

impl LineStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lines
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the draft has no lines
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Index of the last line, if any
    #[must_use]
    pub fn last_index(&self) -> Option<usize> {
        self.lines.len().checked_sub(1)
    }

    /// Line at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SaleLine> {
        self.lines.get(index)
    }

    /// Iterate lines in entry order
    pub fn iter(&self) -> std::slice::Iter<'_, SaleLine> {
        self.lines.iter()
    }

    /// Add lines at the tail
    pub fn append(&mut self, lines: impl IntoIterator<Item = SaleLine>) {
        self.lines.extend(lines);
    }

    /// Splice: remove exactly the line at `index` and insert `lines` in its
    /// place. Replacing with nothing is a deletion.
    ///
    /// Returns the number of lines inserted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IndexOutOfRange`] and leaves the store untouched
    /// when `index` does not name a line.
    pub fn replace_at(
        &mut self,
        index: usize,
        lines: impl IntoIterator<Item = SaleLine>,
    ) -> Result<usize, StoreError> {
        self.check_index(index)?;
        let before = self.lines.len();
        self.lines.splice(index..=index, lines);
        Ok(self.lines.len() + 1 - before)
    }

    /// Delete the line at `index`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IndexOutOfRange`] when `index` does not name a line.
    pub fn remove_at(&mut self, index: usize) -> Result<SaleLine, StoreError> {
        self.check_index(index)?;
        Ok(self.lines.remove(index))
    }

    /// Drop every line
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Billable subtotal and line counts
    #[must_use]
    pub fn totals(&self) -> BillTotals {
        self.lines
            .iter()
            .fold(BillTotals::default(), |mut totals, line| {
                match line.amount() {
                    Some(amount) => {
                        totals.subtotal += amount;
                        totals.billable_lines += 1;
                    }
                    None => totals.excluded_lines += 1,
                }
                totals
            })
    }

    fn check_index(&self, index: usize) -> Result<(), StoreError> {
        if index < self.lines.len() {
            Ok(())
        } else {
            Err(StoreError::IndexOutOfRange {
                index,
                len: self.lines.len(),
            })
        }
    }
}

impl<'a> IntoIterator for &'a LineStore {
    type Item = &'a SaleLine;
    type IntoIter = std::slice::Iter<'a, SaleLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}
