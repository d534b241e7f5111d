// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use crate::context::EvalContext;
use reifydb_vector::Selection;

/// Installs a narrowed final selection for the duration of a scope. The only
/// sanctioned way to enter a narrowed-selection scope, e.g. one branch of a
/// conditional.
///
/// The selection is installed when `override_existing` is set, or when
/// `check_condition` holds and the context is still on its final selection.
/// Destruction restores the previous state if anything was installed.
pub struct ScopedFinalSelectionSetter<'a, 'b> {
    ctx: &'b mut EvalContext<'a>,
    saved: Option<(bool, Option<Selection>)>,
}

impl<'a, 'b> ScopedFinalSelectionSetter<'a, 'b> {
    pub fn new(
        ctx: &'b mut EvalContext<'a>,
        new_final: &Selection,
        check_condition: bool,
        override_existing: bool,
    ) -> Self {
        let should_set = override_existing || (check_condition && ctx.is_final_selection());
        let saved = if should_set {
            let old = ctx.final_selection_state();
            ctx.set_final_selection_state(false, Some(new_final.clone()));
            Some(old)
        } else {
            None
        };
        Self { ctx, saved }
    }

    /// The context, for use inside the scope.
    pub fn ctx(&mut self) -> &mut EvalContext<'a> {
        self.ctx
    }
}

impl Drop for ScopedFinalSelectionSetter<'_, '_> {
    fn drop(&mut self) {
        if let Some((is_final, selection)) = self.saved.take() {
            self.ctx.set_final_selection_state(is_final, selection);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ScopedFinalSelectionSetter;
    use crate::context::EvalContext;
    use crate::exec::{ExecCtx, ExprSet};
    use reifydb_vector::{FlatVector, RowBatch, Selection, Type, Vector};
    use std::sync::Arc;

    fn batch() -> RowBatch {
        let column = Arc::new(Vector::Flat(
            FlatVector::from_values(Type::Int8, vec![1i64, 2, 3, 4]).unwrap(),
        ));
        RowBatch::new(vec![column]).unwrap()
    }

    #[test]
    fn test_sets_and_restores() {
        let exec = ExecCtx::new();
        let exprs = ExprSet::new();
        let row = batch();
        let mut ctx = EvalContext::new(&exec, &exprs, &row);
        let narrowed = Selection::with_all(2);

        {
            let mut scope = ScopedFinalSelectionSetter::new(&mut ctx, &narrowed, true, false);
            assert!(!scope.ctx().is_final_selection());
            assert_eq!(scope.ctx().final_selection(), Some(&narrowed));
        }

        assert!(ctx.is_final_selection());
        assert_eq!(ctx.final_selection(), None);
    }

    #[test]
    fn test_no_set_when_condition_fails() {
        let exec = ExecCtx::new();
        let exprs = ExprSet::new();
        let row = batch();
        let mut ctx = EvalContext::new(&exec, &exprs, &row);
        let narrowed = Selection::with_all(2);

        {
            let mut scope = ScopedFinalSelectionSetter::new(&mut ctx, &narrowed, false, false);
            assert!(scope.ctx().is_final_selection(), "context untouched");
        }
        assert!(ctx.is_final_selection());
    }

    #[test]
    fn test_nested_does_not_reset_without_override() {
        let exec = ExecCtx::new();
        let exprs = ExprSet::new();
        let row = batch();
        let mut ctx = EvalContext::new(&exec, &exprs, &row);
        let outer_rows = Selection::with_all(4);
        let inner_rows = Selection::with_all(2);

        let mut outer = ScopedFinalSelectionSetter::new(&mut ctx, &outer_rows, true, false);
        {
            let mut inner =
                ScopedFinalSelectionSetter::new(outer.ctx(), &inner_rows, true, false);
            // Already narrowed: the inner scope leaves the outer selection.
            assert_eq!(inner.ctx().final_selection(), Some(&outer_rows));
        }
        assert_eq!(outer.ctx().final_selection(), Some(&outer_rows));
    }

    #[test]
    fn test_override_replaces_existing() {
        let exec = ExecCtx::new();
        let exprs = ExprSet::new();
        let row = batch();
        let mut ctx = EvalContext::new(&exec, &exprs, &row);
        let outer_rows = Selection::with_all(4);
        let inner_rows = Selection::with_all(2);

        let mut outer = ScopedFinalSelectionSetter::new(&mut ctx, &outer_rows, true, false);
        {
            let mut inner =
                ScopedFinalSelectionSetter::new(outer.ctx(), &inner_rows, true, true);
            assert_eq!(inner.ctx().final_selection(), Some(&inner_rows));
        }
        assert_eq!(outer.ctx().final_selection(), Some(&outer_rows), "restored on drop");
    }
}
