// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use crate::errors::EvalErrors;
use crate::exec::{ExecCtx, ExprSet};
use crate::peel::PeeledEncoding;
use reifydb_vector::error;
use reifydb_vector::error::diagnostic::evaluate::lazy_load_failed;
use reifydb_vector::error::diagnostic::internal::internal;
use reifydb_vector::error::diagnostic::Diagnostic;
use reifydb_vector::pool::MemoryPool;
use reifydb_vector::util::BitVec;
use reifydb_vector::{
    copy_rows, ensure_writable, Encoding, Error, RowBatch, Selection, Type, Vector, VectorRef,
};
use std::sync::Arc;
use tracing::trace;

/// Threads the state one expression-tree evaluation needs through its nested
/// sub-evaluations: the row batch, peeled inputs and their encoding, the
/// final-selection invariant, the error policy and the per-row error set.
///
/// One instance per top-level evaluation, bound to a single thread.
pub struct EvalContext<'a> {
    exec: &'a ExecCtx,
    expr_set: &'a ExprSet,
    row: &'a RowBatch,
    cache_enabled: bool,
    max_shared_subexpr_results_cached: u32,
    input_flat_no_nulls: bool,

    // One slot per column of 'row'; a set slot replaces the column after
    // common-encoding peeling.
    peeled_fields: Vec<Option<VectorRef>>,
    peeled_encoding: Option<Arc<PeeledEncoding>>,

    nulls_pruned: bool,
    throw_on_error: bool,
    capture_error_details: bool,
    is_final_selection: bool,
    // The widest row set whose results must be preserved when narrowed
    // (is_final_selection == false). None = never narrowed.
    final_selection: Option<Selection>,
    errors: Option<EvalErrors>,
}

impl<'a> EvalContext<'a> {
    pub fn new(exec: &'a ExecCtx, expr_set: &'a ExprSet, row: &'a RowBatch) -> Self {
        let input_flat_no_nulls =
            row.children().iter().all(|column| column.is_flat_or_constant_no_nulls());
        Self {
            exec,
            expr_set,
            row,
            cache_enabled: exec.cache_enabled(),
            max_shared_subexpr_results_cached: exec.max_shared_subexpr_results_cached(),
            input_flat_no_nulls,
            peeled_fields: Vec::new(),
            peeled_encoding: None,
            nulls_pruned: false,
            throw_on_error: true,
            capture_error_details: true,
            is_final_selection: true,
            final_selection: None,
            errors: None,
        }
    }

    pub fn exec_ctx(&self) -> &'a ExecCtx {
        self.exec
    }

    pub fn expr_set(&self) -> &'a ExprSet {
        self.expr_set
    }

    pub fn row(&self) -> &'a RowBatch {
        self.row
    }

    pub fn pool(&self) -> &MemoryPool {
        self.exec.pool()
    }

    /// True if all input columns are flat or constant and have no nulls.
    pub fn input_flat_no_nulls(&self) -> bool {
        self.input_flat_no_nulls
    }

    // ---- fields and peeling ------------------------------------------------

    /// The index-th column of the effective batch: the peeled stand-in when
    /// wrappers have been stripped, the row batch column otherwise.
    pub fn field(&self, index: usize) -> &VectorRef {
        match self.peeled_fields.get(index) {
            Some(Some(peeled)) => peeled,
            _ => self.row.child(index),
        }
    }

    /// The effective column with lazy wrappers resolved over 'rows'.
    pub fn ensure_field_loaded(
        &self,
        index: usize,
        rows: &Selection,
    ) -> crate::Result<VectorRef> {
        let field = self.field(index);
        match &**field {
            Vector::Lazy(lazy) => lazy
                .load(rows)
                .map_err(|error| Error(lazy_load_failed(index, error.into_diagnostic()))),
            _ => Ok(field.clone()),
        }
    }

    pub fn set_peeled(&mut self, index: usize, vector: VectorRef) {
        if self.peeled_fields.len() <= index {
            self.peeled_fields.resize(index + 1, None);
        }
        self.peeled_fields[index] = Some(vector);
    }

    pub fn peeled_fields(&self) -> &[Option<VectorRef>] {
        &self.peeled_fields
    }

    pub fn set_peeled_encoding(&mut self, peeled: Arc<PeeledEncoding>) {
        self.peeled_encoding = Some(peeled);
    }

    pub fn peeled_encoding(&self) -> Option<&Arc<PeeledEncoding>> {
        self.peeled_encoding.as_ref()
    }

    /// The wrapper the published result must be re-encoded with; Flat when
    /// nothing was peeled.
    pub fn wrap_encoding(&self) -> Encoding {
        self.peeled_encoding.as_ref().map(|peeled| peeled.encoding()).unwrap_or(Encoding::Flat)
    }

    // ---- scoped save/restore ----------------------------------------------

    /// Snapshots peeled state, the final selection, the null pruning flag and
    /// the error set into 'saver', then clears them for the inner scope. The
    /// inner scope sees 'rows' as its final selection and starts without
    /// accumulated errors.
    pub fn save_and_reset(&mut self, saver: &mut ContextSaver, rows: &Selection) {
        saver.taken = true;
        saver.peeled_fields = std::mem::take(&mut self.peeled_fields);
        saver.peeled_encoding = self.peeled_encoding.take();
        saver.nulls_pruned = self.nulls_pruned;
        saver.rows = Some(rows.clone());
        saver.final_selection = self.final_selection.take();
        saver.errors = self.errors.take();

        self.nulls_pruned = false;
        self.final_selection = Some(rows.clone());
    }

    /// Reinstates a snapshot taken by [`EvalContext::save_and_reset`] and
    /// folds the errors accumulated inside the scope into the restored outer
    /// set. Outer errors win on rows both scopes touched.
    pub fn restore(&mut self, saver: &mut ContextSaver) {
        debug_assert!(saver.taken, "restore without a matching save_and_reset");
        self.peeled_fields = std::mem::take(&mut saver.peeled_fields);
        self.peeled_encoding = saver.peeled_encoding.take();
        self.nulls_pruned = saver.nulls_pruned;
        self.final_selection = saver.final_selection.take();

        let inner = self.errors.take();
        self.errors = saver.errors.take();
        if let Some(mut inner) = inner {
            let folded = inner.count_errors();
            inner.move_append_to(&mut self.errors);
            trace!(folded, "folded inner scope errors on restore");
        }
        saver.taken = false;
        saver.rows = None;
    }

    // ---- error recording ---------------------------------------------------

    /// Records a failure at 'index'. Detail is kept only under
    /// capture_error_details; otherwise only presence is marked.
    pub fn set_error(&mut self, index: usize, error: Error) {
        let capture = self.capture_error_details;
        let errors = self.errors_slot();
        if capture {
            errors.set_error_with(index, Arc::new(error));
        } else {
            errors.set_error(index);
        }
    }

    /// Like [`EvalContext::set_error`] for failures the caller knows are
    /// user-level domain errors, skipping the classification check.
    pub fn set_fast_error(&mut self, index: usize, error: Error) {
        debug_assert!(!error.is_internal(), "internal failures are not recordable per-row");
        let capture = self.capture_error_details;
        let errors = self.errors_slot();
        if capture {
            errors.set_error_with(index, Arc::new(error));
        } else {
            errors.set_error(index);
        }
    }

    /// Records the same failure at every selected row that does not already
    /// have one.
    pub fn set_errors(&mut self, rows: &Selection, error: Error) {
        let capture = self.capture_error_details;
        let shared = Arc::new(error);
        let errors = self.errors_slot();
        for row in rows.iter_selected() {
            if capture {
                errors.set_error_with(row, shared.clone());
            } else {
                errors.set_error(row);
            }
        }
    }

    /// Translates a non-ok status into a captured failure at 'index'.
    pub fn set_status(&mut self, index: usize, status: Diagnostic) {
        self.set_error(index, Error(status));
    }

    /// Runs 'f' on each selected row, funnelling user-level failures into the
    /// error set. Internal failures abort the batch and propagate.
    pub fn apply_to_selected_no_throw(
        &mut self,
        rows: &Selection,
        mut f: impl FnMut(usize) -> crate::Result<()>,
    ) -> crate::Result<()> {
        for row in rows.iter_selected() {
            match f(row) {
                Ok(()) => {}
                Err(error) if error.is_internal() => return Err(error),
                Err(error) => self.set_fast_error(row, error),
            }
        }
        Ok(())
    }

    /// Records a failure into an external error set, allocating and resizing
    /// it as needed. Detail is kept only under capture_error_details.
    pub fn add_error(&self, index: usize, error: Error, sink: &mut Option<EvalErrors>) {
        let errors =
            sink.get_or_insert_with(|| EvalErrors::with_capacity(self.row.row_count()));
        if self.capture_error_details {
            errors.set_error_with(index, Arc::new(error));
        } else {
            errors.set_error(index);
        }
    }

    /// Copies errors of 'from' at 'rows' into 'to' without overwriting.
    pub fn add_errors(
        &self,
        rows: &Selection,
        from: &Option<EvalErrors>,
        to: &mut Option<EvalErrors>,
    ) {
        if let Some(from) = from {
            let to = to.get_or_insert_with(|| EvalErrors::with_capacity(from.size()));
            to.copy_errors(rows, from);
        }
    }

    /// Projects element-level errors of this context onto their top-level
    /// rows in 'top', without overwriting.
    pub fn add_element_errors_to_top_level(
        &self,
        element_rows: &Selection,
        element_to_top: &[usize],
        top: &mut Option<EvalErrors>,
    ) {
        let Some(errors) = &self.errors else {
            return;
        };
        for row in element_rows.iter_selected() {
            if row < errors.size() && errors.has_error_at(row) {
                let top_row = element_to_top[row];
                let sink =
                    top.get_or_insert_with(|| EvalErrors::with_capacity(top_row + 1));
                sink.copy_error(errors, row, top_row);
            }
        }
    }

    /// Nulls the top-level rows whose element rows errored.
    pub fn convert_element_errors_to_top_level_nulls(
        &mut self,
        element_rows: &Selection,
        element_to_top: &[usize],
        result: &mut Option<VectorRef>,
    ) -> crate::Result<()> {
        let nulled: Vec<usize> = match &self.errors {
            None => return Ok(()),
            Some(errors) => element_rows
                .iter_selected()
                .filter(|&row| row < errors.size() && errors.has_error_at(row))
                .map(|row| element_to_top[row])
                .collect(),
        };
        if nulled.is_empty() {
            return Ok(());
        }
        let current = result.as_ref().ok_or_else(|| {
            error!(internal("cannot null top-level rows of an absent result".to_string()))
        })?;
        let ty = current.vector_type();
        let size = current.len().max(nulled.iter().max().map(|&row| row + 1).unwrap_or(0));
        let mut mask = BitVec::repeat(size, false);
        for &row in &nulled {
            mask.set(row, true);
        }
        let mut rows = Selection::empty(size);
        for &row in &nulled {
            rows.select(row);
        }
        rows.update_bounds();
        self.add_nulls(&rows, &mask, ty, result)
    }

    /// Unselects rows that already have an error. Idempotent.
    pub fn deselect_errors(&self, rows: &mut Selection) {
        let Some(errors) = &self.errors else {
            return;
        };
        let mask = errors.error_mask();
        let limit = errors.size().min(rows.size());
        for row in 0..limit {
            if !mask.get(row) && rows.is_selected(row) {
                rows.deselect(row);
            }
        }
        rows.update_bounds();
    }

    pub fn errors(&self) -> Option<&EvalErrors> {
        self.errors.as_ref()
    }

    pub fn errors_mut(&mut self) -> &mut Option<EvalErrors> {
        &mut self.errors
    }

    /// Makes the error set addressable up to 'size' rows.
    pub fn ensure_errors_size(&mut self, size: usize) {
        self.errors_slot().ensure_capacity(size);
    }

    pub fn swap_errors(&mut self, other: &mut Option<EvalErrors>) {
        std::mem::swap(&mut self.errors, other);
    }

    /// Merges this context's errors into 'other' first-writer-wins and leaves
    /// the context without errors.
    pub fn move_append_errors(&mut self, other: &mut Option<EvalErrors>) {
        if let Some(mut errors) = self.errors.take() {
            errors.move_append_to(other);
        }
    }

    fn errors_slot(&mut self) -> &mut EvalErrors {
        let capacity = self.row.row_count();
        self.errors.get_or_insert_with(|| EvalErrors::with_capacity(capacity))
    }

    // ---- policy flags -------------------------------------------------------

    /// Whether failures surface immediately to the caller (true) or are
    /// absorbed per-row for the TRY family (false).
    pub fn throw_on_error(&self) -> bool {
        self.throw_on_error
    }

    pub fn set_throw_on_error(&mut self, throw_on_error: bool) {
        self.throw_on_error = throw_on_error;
    }

    /// Whether recorded failures keep their detail. Conjuncts need details to
    /// rethrow the first error; TRY only needs presence bits.
    pub fn capture_error_details(&self) -> bool {
        self.capture_error_details
    }

    pub fn set_capture_error_details(&mut self, capture: bool) {
        self.capture_error_details = capture;
    }

    /// True if nulls in the inputs were pruned from the current selection.
    pub fn nulls_pruned(&self) -> bool {
        self.nulls_pruned
    }

    pub fn set_nulls_pruned(&mut self, pruned: bool) {
        self.nulls_pruned = pruned;
    }

    /// False while evaluating a narrowed row set (e.g. one branch of IF)
    /// whose surrounding rows must not be clobbered.
    pub fn is_final_selection(&self) -> bool {
        self.is_final_selection
    }

    pub fn final_selection(&self) -> Option<&Selection> {
        self.final_selection.as_ref()
    }

    pub(crate) fn final_selection_state(&self) -> (bool, Option<Selection>) {
        (self.is_final_selection, self.final_selection.clone())
    }

    pub(crate) fn set_final_selection_state(
        &mut self,
        is_final: bool,
        selection: Option<Selection>,
    ) {
        self.is_final_selection = is_final;
        self.final_selection = selection;
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    pub fn max_shared_subexpr_results_cached(&self) -> u32 {
        self.max_shared_subexpr_results_cached
    }

    // ---- results -------------------------------------------------------------

    /// True when 'result' is partially populated and must survive: a result
    /// exists, the selection is narrowed, and 'rows' is not the full final
    /// selection. An unset final selection never requires preservation.
    pub fn result_should_be_preserved(
        &self,
        result: &Option<VectorRef>,
        rows: &Selection,
    ) -> bool {
        result.is_some()
            && !self.is_final_selection
            && self.final_selection.as_ref().map(|selection| selection != rows).unwrap_or(false)
    }

    /// Publishes 'local' into 'result': row-wise copy over 'rows' when the
    /// existing result must be preserved, cheap handle transfer otherwise.
    pub fn move_or_copy_result(
        &mut self,
        local: VectorRef,
        rows: &Selection,
        result: &mut Option<VectorRef>,
    ) -> crate::Result<()> {
        if self.result_should_be_preserved(result, rows) {
            let ty = match result.as_ref() {
                Some(current) => current.vector_type(),
                None => local.vector_type(),
            };
            self.ensure_writable(rows, ty, result)?;
            let target = result
                .as_mut()
                .and_then(Arc::get_mut)
                .and_then(Vector::as_flat_mut)
                .ok_or_else(|| {
                    error!(internal("writable result must be a unique flat vector".to_string()))
                })?;
            copy_rows(&local, rows, target)?;
        } else {
            *result = Some(local);
        }
        Ok(())
    }

    /// ORs 'null_mask' (bit set = null) into 'result' over 'rows'. The result
    /// is made writable, of 'ty', sized for 'rows' and able to carry nulls; a
    /// fresh vector is allocated when the old one cannot. Values of rows that
    /// are not being nulled are preserved.
    pub fn add_nulls(
        &mut self,
        rows: &Selection,
        null_mask: &BitVec,
        ty: Type,
        result: &mut Option<VectorRef>,
    ) -> crate::Result<()> {
        let required = rows.end();
        match result {
            None => {
                *result = Some(self.exec.get_vector(ty, required));
            }
            Some(current) => {
                let reusable = Arc::strong_count(current) == 1
                    && matches!(&**current, Vector::Flat(flat) if flat.vector_type() == ty);
                if reusable {
                    if let Some(flat) = Arc::get_mut(current).and_then(Vector::as_flat_mut) {
                        if flat.len() < required {
                            flat.resize(required);
                        }
                    }
                } else {
                    // Unlike ensure_writable, every row's value survives; only
                    // the masked rows gain nulls.
                    let old = current.clone();
                    let len = required.max(old.len());
                    let mut fresh = self.exec.get_vector(ty, len);
                    {
                        let flat = Arc::get_mut(&mut fresh)
                            .and_then(Vector::as_flat_mut)
                            .ok_or_else(|| {
                                error!(internal("pool returned a shared vector".to_string()))
                            })?;
                        if old.vector_type() == ty {
                            for row in 0..old.len() {
                                flat.set_scalar(row, old.scalar_at(row)?);
                            }
                        }
                    }
                    *result = Some(fresh);
                }
            }
        }
        let flat = result
            .as_mut()
            .and_then(Arc::get_mut)
            .and_then(Vector::as_flat_mut)
            .ok_or_else(|| {
                error!(internal("writable result must be a unique flat vector".to_string()))
            })?;
        for row in rows.iter_selected() {
            if row < null_mask.len() && null_mask.get(row) {
                flat.set_null(row, true);
            }
        }
        Ok(())
    }

    // ---- vector pool passthrough ----------------------------------------------

    pub fn get_vector(&self, ty: Type, size: usize) -> VectorRef {
        self.exec.get_vector(ty, size)
    }

    /// Returns true if the vector was moved to the pool.
    pub fn release_vector(&self, vector: VectorRef) -> bool {
        self.exec.release_vector(vector)
    }

    pub fn release_vectors(&self, vectors: &mut Vec<VectorRef>) -> usize {
        self.exec.release_vectors(vectors)
    }

    /// Makes 'result' writable for 'rows', reusing pooled vectors.
    pub fn ensure_writable(
        &self,
        rows: &Selection,
        ty: Type,
        result: &mut Option<VectorRef>,
    ) -> crate::Result<()> {
        ensure_writable(rows, ty, self.exec.vector_pool(), result)
    }
}

/// Snapshot of the context state a peeling or sub-expression scope replaces.
/// The non-default `taken` flag discriminates "snapshot was taken".
#[derive(Default)]
pub struct ContextSaver {
    taken: bool,
    peeled_fields: Vec<Option<VectorRef>>,
    peeled_encoding: Option<Arc<PeeledEncoding>>,
    nulls_pruned: bool,
    // The selection the inner scope runs on.
    rows: Option<Selection>,
    final_selection: Option<Selection>,
    errors: Option<EvalErrors>,
}

impl ContextSaver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_taken(&self) -> bool {
        self.taken
    }

    pub fn rows(&self) -> Option<&Selection> {
        self.rows.as_ref()
    }
}

/// Runs 'f' and restores the context from the saver if 'f' took a snapshot,
/// on success and on failure alike.
pub fn with_context_saver<'a, T>(
    ctx: &mut EvalContext<'a>,
    f: impl FnOnce(&mut EvalContext<'a>, &mut ContextSaver) -> crate::Result<T>,
) -> crate::Result<T> {
    let mut saver = ContextSaver::new();
    let result = f(ctx, &mut saver);
    if saver.taken {
        ctx.restore(&mut saver);
    }
    result
}
