// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use reifydb_vector::error::diagnostic::internal::error_detail_missing;
use reifydb_vector::util::BitVec;
use reifydb_vector::{Error, Selection};
use std::sync::Arc;

/// Per-row record of failures encountered during expression evaluation.
///
/// The presence bitmap is inverted relative to the vector null convention on
/// purpose: a bit in `ok_bits` is *set* when the row has no error. Detail
/// slots are only allocated once a first detail is stored, so batches where
/// every row succeeds never pay for them.
///
/// All merge operations are first-writer-wins per row: an error that is
/// already recorded survives every later write, which lets conjunct
/// short-circuiting, TRY and save/restore compose without history tracking.
#[derive(Debug, Clone, Default)]
pub struct EvalErrors {
    ok_bits: BitVec,
    details: Vec<Option<Arc<Error>>>,
}

impl EvalErrors {
    pub fn with_capacity(size: usize) -> Self {
        // The detail slots stay unallocated; most rows succeed.
        Self { ok_bits: BitVec::repeat(size, true), details: Vec::new() }
    }

    /// Rows the set can address.
    pub fn size(&self) -> usize {
        self.ok_bits.len()
    }

    /// Grows to at least 'size' rows; new rows have no error. No-op when
    /// already large enough, so capacity is monotone.
    pub fn ensure_capacity(&mut self, size: usize) {
        if self.ok_bits.len() < size {
            self.ok_bits.resize(size, true);
            if !self.details.is_empty() {
                self.details.resize(size, None);
            }
        }
    }

    /// True if at least one row has an error.
    pub fn has_error(&self) -> bool {
        self.ok_bits.count_ones() < self.ok_bits.len()
    }

    pub fn has_error_at(&self, index: usize) -> bool {
        index < self.ok_bits.len() && !self.ok_bits.get(index)
    }

    /// Number of rows with errors.
    pub fn count_errors(&self) -> usize {
        self.ok_bits.len() - self.ok_bits.count_ones()
    }

    /// Marks 'index' as errored without detail.
    pub fn set_error(&mut self, index: usize) {
        self.ensure_capacity(index + 1);
        self.ok_bits.set(index, false);
    }

    /// Marks 'index' as errored with detail. No-op if 'index' already has an
    /// error: the first writer wins.
    pub fn set_error_with(&mut self, index: usize, error: Arc<Error>) {
        self.ensure_capacity(index + 1);
        if self.ok_bits.get(index) {
            self.ok_bits.set(index, false);
            self.detail_slot(index).replace(error);
        }
    }

    /// Clears the error at 'index'. Out-of-range rows are left alone.
    pub fn clear_error(&mut self, index: usize) {
        if index < self.ok_bits.len() {
            self.ok_bits.set(index, true);
            if let Some(slot) = self.details.get_mut(index) {
                *slot = None;
            }
        }
    }

    /// None when 'index' has no error; Some(None) when the row errored but
    /// details were not captured; Some(Some(_)) otherwise.
    pub fn error_at(&self, index: usize) -> Option<Option<&Arc<Error>>> {
        if !self.has_error_at(index) {
            return None;
        }
        Some(self.details.get(index).and_then(|slot| slot.as_ref()))
    }

    /// Copies the error of 'from' at 'from_index' to 'to_index' here. No-op
    /// when the source row has no error or this row already has one.
    pub fn copy_error(&mut self, from: &EvalErrors, from_index: usize, to_index: usize) {
        if !from.has_error_at(from_index) {
            return;
        }
        self.ensure_capacity(to_index + 1);
        if self.ok_bits.get(to_index) {
            self.ok_bits.set(to_index, false);
            if let Some(detail) = from.error_at(from_index).flatten() {
                self.detail_slot(to_index).replace(detail.clone());
            }
        }
    }

    /// Copies errors of 'from' at 'rows' into the same rows here, never
    /// overwriting an existing error.
    pub fn copy_errors(&mut self, rows: &Selection, from: &EvalErrors) {
        let limit = from.size().min(rows.end());
        self.ensure_capacity(limit);
        for row in rows.iter_selected() {
            if row >= from.size() {
                break;
            }
            self.copy_error(from, row, row);
        }
    }

    /// Copies every errored row of 'from' here, never overwriting.
    pub fn copy_all_errors(&mut self, from: &EvalErrors) {
        self.ensure_capacity(from.size());
        let mut row = 0;
        while row < from.size() {
            if from.has_error_at(row) {
                self.copy_error(from, row, row);
            }
            row += 1;
        }
    }

    /// Merges self into 'sink' first-writer-wins and clears self. An absent
    /// sink takes self wholesale.
    pub fn move_append_to(&mut self, sink: &mut Option<EvalErrors>) {
        let drained = std::mem::take(self);
        match sink {
            Some(existing) => existing.copy_all_errors(&drained),
            None => *sink = Some(drained),
        }
    }

    /// Fails with the error at 'index', if any. The caller must ensure the
    /// detail was captured; a detail-less error degrades to an internal
    /// failure instead of surfacing the original.
    pub fn throw_if_error_at(&self, index: usize) -> crate::Result<()> {
        match self.error_at(index) {
            None => Ok(()),
            Some(Some(error)) => Err(error.as_ref().clone()),
            Some(None) => Err(Error(error_detail_missing(index))),
        }
    }

    /// Fails with the error of the smallest selected row that has one.
    /// Rows outside the selection never surface their errors.
    pub fn throw_first_error(&self, rows: &Selection) -> crate::Result<()> {
        for row in rows.iter_selected() {
            if row >= self.size() {
                break;
            }
            self.throw_if_error_at(row)?;
        }
        Ok(())
    }

    /// The presence bitmap: bit clear = error at that row. Only the first
    /// size() bits are valid.
    pub fn error_mask(&self) -> &BitVec {
        &self.ok_bits
    }

    fn detail_slot(&mut self, index: usize) -> &mut Option<Arc<Error>> {
        if self.details.len() < self.ok_bits.len() {
            self.details.resize(self.ok_bits.len(), None);
        }
        &mut self.details[index]
    }
}
