// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Scratch objects borrowed from the [`ExecCtx`] pools and released on every
//! exit path through Drop.

use crate::exec::ExecCtx;
use reifydb_vector::{DecodedVector, Selection, VectorRef};

/// A pooled [`Selection`], acquired eagerly with a size or lazily on first
/// use.
pub struct LocalSelection<'a> {
    exec: &'a ExecCtx,
    selection: Option<Selection>,
}

impl<'a> LocalSelection<'a> {
    /// Grabs a selection of 'size' rows, all selected.
    pub fn with_size(exec: &'a ExecCtx, size: usize) -> Self {
        Self { exec, selection: Some(exec.get_selection(size)) }
    }

    /// Defers acquisition to the first `get_sized` call.
    pub fn deferred(exec: &'a ExecCtx) -> Self {
        Self { exec, selection: None }
    }

    /// Grabs a selection initialized from 'value'.
    pub fn with_value(exec: &'a ExecCtx, value: &Selection) -> Self {
        let mut selection = exec.get_selection(value.size());
        selection.clone_from(value);
        Self { exec, selection: Some(selection) }
    }

    /// Releases the held selection and acquires a fresh one of 'size'.
    pub fn allocate(&mut self, size: usize) -> &mut Selection {
        if let Some(old) = self.selection.take() {
            self.exec.release_selection(old);
        }
        self.selection = Some(self.exec.get_selection(size));
        self.get_sized(size)
    }

    /// The held selection, acquiring one of 'size' if none is held yet.
    pub fn get_sized(&mut self, size: usize) -> &mut Selection {
        if self.selection.is_none() {
            self.selection = Some(self.exec.get_selection(size));
        }
        self.selection.as_mut().unwrap_or_else(|| unreachable!())
    }

    /// The held selection. Only valid after eager construction or a
    /// `get_sized`/`allocate` call.
    pub fn get(&mut self) -> &mut Selection {
        debug_assert!(self.selection.is_some(), "selection not acquired yet");
        self.get_sized(0)
    }
}

impl Drop for LocalSelection<'_> {
    fn drop(&mut self) {
        if let Some(selection) = self.selection.take() {
            self.exec.release_selection(selection);
        }
    }
}

/// A pooled selection of exactly one row, sized 'row + 1'.
pub struct LocalSingleRow<'a> {
    exec: &'a ExecCtx,
    selection: Option<Selection>,
}

impl<'a> LocalSingleRow<'a> {
    pub fn new(exec: &'a ExecCtx, row: usize) -> Self {
        let mut selection = exec.get_selection(row + 1);
        selection.clear_all();
        selection.select(row);
        selection.update_bounds();
        Self { exec, selection: Some(selection) }
    }

    pub fn get(&self) -> &Selection {
        match &self.selection {
            Some(selection) => selection,
            None => unreachable!("selection held until drop"),
        }
    }
}

impl Drop for LocalSingleRow<'_> {
    fn drop(&mut self) {
        if let Some(selection) = self.selection.take() {
            self.exec.release_selection(selection);
        }
    }
}

impl std::ops::Deref for LocalSingleRow<'_> {
    type Target = Selection;

    fn deref(&self) -> &Selection {
        self.get()
    }
}

/// A pooled [`DecodedVector`], decoded eagerly over a vector and rows or
/// acquired lazily.
pub struct LocalDecoded<'a> {
    exec: &'a ExecCtx,
    decoded: Option<DecodedVector>,
}

impl<'a> LocalDecoded<'a> {
    pub fn deferred(exec: &'a ExecCtx) -> Self {
        Self { exec, decoded: None }
    }

    pub fn decode(
        exec: &'a ExecCtx,
        vector: &VectorRef,
        rows: &Selection,
    ) -> reifydb_vector::Result<Self> {
        let mut decoded = exec.get_decoded();
        decoded.decode(vector, rows)?;
        Ok(Self { exec, decoded: Some(decoded) })
    }

    pub fn get(&mut self) -> &mut DecodedVector {
        if self.decoded.is_none() {
            self.decoded = Some(self.exec.get_decoded());
        }
        self.decoded.as_mut().unwrap_or_else(|| unreachable!())
    }

    pub fn view(&self) -> &DecodedVector {
        match &self.decoded {
            Some(decoded) => decoded,
            None => unreachable!("decoded vector not acquired yet"),
        }
    }
}

impl Drop for LocalDecoded<'_> {
    fn drop(&mut self) {
        if let Some(decoded) = self.decoded.take() {
            self.exec.release_decoded(decoded);
        }
    }
}
