// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use crate::util::BitVec;
use serde::{Deserialize, Serialize};

/// The set of rows a step of evaluation applies to: a dense bitmap over row
/// indices with a cached covering range and cardinality.
///
/// Mutators do not maintain the cache; call [`Selection::update_bounds`] after
/// a batch of mutations, mirroring how the bounds of a selection are managed
/// by the callers that narrow it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Selection {
    bits: BitVec,
    begin: usize,
    end: usize,
    count: usize,
}

impl Selection {
    /// All rows in [0, size) selected.
    pub fn with_all(size: usize) -> Self {
        Self { bits: BitVec::repeat(size, true), begin: 0, end: size, count: size }
    }

    /// No rows selected; size() is still 'size'.
    pub fn empty(size: usize) -> Self {
        Self { bits: BitVec::repeat(size, false), begin: 0, end: 0, count: 0 }
    }

    /// A single selected row, sized 'row + 1'.
    pub fn single(row: usize) -> Self {
        let mut selection = Self::empty(row + 1);
        selection.select(row);
        selection.update_bounds();
        selection
    }

    /// Number of rows the selection spans (not the number selected).
    pub fn size(&self) -> usize {
        self.bits.len()
    }

    /// Number of selected rows, as of the last update_bounds.
    pub fn count(&self) -> usize {
        self.count
    }

    /// First selected row, as of the last update_bounds.
    pub fn begin(&self) -> usize {
        self.begin
    }

    /// One past the last selected row, as of the last update_bounds.
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn is_selected(&self, row: usize) -> bool {
        row < self.bits.len() && self.bits.get(row)
    }

    pub fn select(&mut self, row: usize) {
        self.bits.set(row, true);
    }

    pub fn deselect(&mut self, row: usize) {
        self.bits.set(row, false);
    }

    pub fn select_all(&mut self) {
        self.bits = BitVec::repeat(self.bits.len(), true);
        self.update_bounds();
    }

    pub fn clear_all(&mut self) {
        self.bits = BitVec::repeat(self.bits.len(), false);
        self.update_bounds();
    }

    /// Resizes to 'size' rows, all set to 'value'.
    pub fn resize_fill(&mut self, size: usize, value: bool) {
        self.bits = BitVec::repeat(size, value);
        self.update_bounds();
    }

    /// Recomputes the cached begin/end/count after mutations.
    pub fn update_bounds(&mut self) {
        self.begin = self.bits.find_first_set(0).unwrap_or(0);
        self.end = self.bits.find_last_set().map(|last| last + 1).unwrap_or(0);
        if self.end == 0 {
            self.begin = 0;
        }
        self.count = self.bits.count_ones();
    }

    /// Narrows self to the rows also selected in 'other'.
    pub fn intersect(&mut self, other: &Selection) {
        assert_eq!(self.size(), other.size());
        self.bits = self.bits.and(&other.bits);
        self.update_bounds();
    }

    /// Removes every row whose bit is set in 'mask'. 'mask' may be shorter
    /// than the selection; rows beyond it are kept.
    pub fn deselect_mask(&mut self, mask: &BitVec) {
        let limit = mask.len().min(self.bits.len());
        let mut row = mask.find_first_set(0);
        while let Some(idx) = row {
            if idx >= limit {
                break;
            }
            if self.bits.get(idx) {
                self.bits.set(idx, false);
            }
            row = mask.find_first_set(idx + 1);
        }
        self.update_bounds();
    }

    /// Iterates selected rows in ascending order.
    pub fn iter_selected(&self) -> SelectedRows<'_> {
        SelectedRows { selection: self, next: self.begin }
    }

    /// Applies 'f' to selected rows in ascending order until it returns
    /// false. Returns false if iteration was stopped early.
    pub fn test_selected(&self, mut f: impl FnMut(usize) -> bool) -> bool {
        for row in self.iter_selected() {
            if !f(row) {
                return false;
            }
        }
        true
    }

    pub fn bits(&self) -> &BitVec {
        &self.bits
    }
}

impl PartialEq for Selection {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

pub struct SelectedRows<'a> {
    selection: &'a Selection,
    next: usize,
}

impl Iterator for SelectedRows<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.next >= self.selection.end {
            return None;
        }
        match self.selection.bits.find_first_set(self.next) {
            Some(row) if row < self.selection.end => {
                self.next = row + 1;
                Some(row)
            }
            _ => {
                self.next = self.selection.end;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    mod construction {
        use crate::selection::Selection;

        #[test]
        fn test_with_all() {
            let sel = Selection::with_all(5);
            assert_eq!(sel.size(), 5);
            assert_eq!(sel.count(), 5);
            assert_eq!(sel.begin(), 0);
            assert_eq!(sel.end(), 5);
        }

        #[test]
        fn test_empty() {
            let sel = Selection::empty(5);
            assert_eq!(sel.size(), 5);
            assert_eq!(sel.count(), 0);
            assert_eq!(sel.end(), 0);
        }

        #[test]
        fn test_single() {
            let sel = Selection::single(3);
            assert_eq!(sel.size(), 4);
            assert_eq!(sel.count(), 1);
            assert!(sel.is_selected(3));
            assert!(!sel.is_selected(2));
            assert_eq!(sel.begin(), 3);
            assert_eq!(sel.end(), 4);
        }
    }

    mod bounds {
        use crate::selection::Selection;

        #[test]
        fn test_update_after_mutation() {
            let mut sel = Selection::empty(10);
            sel.select(2);
            sel.select(7);
            sel.update_bounds();
            assert_eq!(sel.begin(), 2);
            assert_eq!(sel.end(), 8);
            assert_eq!(sel.count(), 2);
        }

        #[test]
        fn test_deselect_to_empty() {
            let mut sel = Selection::with_all(3);
            for row in 0..3 {
                sel.deselect(row);
            }
            sel.update_bounds();
            assert_eq!(sel.count(), 0);
            assert_eq!(sel.begin(), 0);
            assert_eq!(sel.end(), 0);
        }
    }

    mod iteration {
        use crate::selection::Selection;

        #[test]
        fn test_iter_selected() {
            let mut sel = Selection::empty(10);
            sel.select(1);
            sel.select(4);
            sel.select(9);
            sel.update_bounds();
            let rows: Vec<usize> = sel.iter_selected().collect();
            assert_eq!(rows, vec![1, 4, 9]);
        }

        #[test]
        fn test_test_selected_early_stop() {
            let sel = Selection::with_all(10);
            let mut visited = Vec::new();
            let completed = sel.test_selected(|row| {
                visited.push(row);
                row < 3
            });
            assert!(!completed);
            assert_eq!(visited, vec![0, 1, 2, 3]);
        }
    }

    mod combinators {
        use crate::selection::Selection;
        use crate::util::BitVec;

        #[test]
        fn test_intersect() {
            let mut a = Selection::with_all(6);
            let mut b = Selection::empty(6);
            b.select(1);
            b.select(4);
            b.update_bounds();
            a.intersect(&b);
            assert_eq!(a.iter_selected().collect::<Vec<_>>(), vec![1, 4]);
        }

        #[test]
        fn test_deselect_mask() {
            let mut sel = Selection::with_all(6);
            let mask = BitVec::from([false, true, false, true, false, false]);
            sel.deselect_mask(&mask);
            assert_eq!(sel.iter_selected().collect::<Vec<_>>(), vec![0, 2, 4, 5]);
        }

        #[test]
        fn test_deselect_mask_shorter_than_selection() {
            let mut sel = Selection::with_all(6);
            let mask = BitVec::from([true, true]);
            sel.deselect_mask(&mask);
            assert_eq!(sel.iter_selected().collect::<Vec<_>>(), vec![2, 3, 4, 5]);
        }
    }

    mod equality {
        use crate::selection::Selection;

        #[test]
        fn test_eq_ignores_cached_bounds() {
            let mut a = Selection::empty(4);
            a.select(2);
            let mut b = Selection::empty(4);
            b.select(2);
            b.update_bounds();
            assert_eq!(a, b);
        }

        #[test]
        fn test_ne_different_rows() {
            let mut a = Selection::with_all(4);
            let b = Selection::with_all(4);
            a.deselect(1);
            assert_ne!(a, b);
        }
    }
}
