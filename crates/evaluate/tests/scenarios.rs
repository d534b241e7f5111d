// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! End-to-end evaluation scenarios: kernels driven through the evaluation
//! context with null propagation, per-row failures, scoped save/restore and
//! branch-result preservation.

use reifydb_evaluate::function::comparison::{make_comparison, ComparisonOp};
use reifydb_evaluate::function::decimal::{CheckOverflowFunction, RoundDecimalFunction};
use reifydb_evaluate::function::{evaluate_function, VectorFunction};
use reifydb_evaluate::{
    ContextSaver, EvalContext, ExecCtx, ExprSet, ScopedFinalSelectionSetter,
};
use reifydb_vector::{
    ConstantVector, FlatVector, RowBatch, Selection, Type, Value, Vector, VectorRef,
};
use std::sync::Arc;

fn flat_i64(values: Vec<i64>) -> VectorRef {
    Arc::new(Vector::Flat(FlatVector::from_values(Type::Int8, values).unwrap()))
}

fn const_i64(value: i64, len: usize) -> VectorRef {
    Arc::new(Vector::Constant(ConstantVector::new(Type::Int8, Value::Int8(value), len)))
}

fn const_bool(value: bool, len: usize) -> VectorRef {
    Arc::new(Vector::Constant(ConstantVector::new(Type::Bool, Value::Bool(value), len)))
}

fn decimal_flat(precision: u8, scale: u8, values: Vec<i64>) -> VectorRef {
    let ty = Type::decimal(precision, scale).unwrap();
    Arc::new(Vector::Flat(FlatVector::from_values(ty, values).unwrap()))
}

fn decimal_witness(precision: u8, scale: u8, len: usize) -> VectorRef {
    let ty = Type::decimal(precision, scale).unwrap();
    Arc::new(Vector::Constant(ConstantVector::new(ty, Value::Decimal(0), len)))
}

fn empty_batch() -> RowBatch {
    RowBatch::new(vec![]).unwrap()
}

// Equality over a flat int64 column against a constant.
#[test]
fn test_equality_identity_times_constant() {
    let exec = ExecCtx::new();
    let exprs = ExprSet::new();
    let row = empty_batch();
    let mut ctx = EvalContext::new(&exec, &exprs, &row);
    let rows = Selection::with_all(4);
    let mut args = vec![flat_i64(vec![1, 2, 3, 4]), const_i64(3, 4)];
    let mut result = None;

    let eq = make_comparison(ComparisonOp::Eq, Type::Int8).unwrap();
    evaluate_function(eq.as_ref(), &rows, &mut args, Type::Bool, &mut ctx, &mut result)
        .unwrap();

    let vector = result.unwrap();
    let flat = vector.as_flat().unwrap();
    assert_eq!(
        (0..4).map(|row| flat.value::<bool>(row)).collect::<Vec<_>>(),
        vec![false, false, true, false]
    );
    assert!(!flat.has_nulls());
    assert!(ctx.errors().is_none());
}

// A null in either argument nulls the row without invoking the kernel.
#[test]
fn test_equality_null_propagation() {
    let exec = ExecCtx::new();
    let exprs = ExprSet::new();
    let row = empty_batch();
    let mut ctx = EvalContext::new(&exec, &exprs, &row);
    let rows = Selection::with_all(4);
    let values = Arc::new(Vector::Flat(
        FlatVector::from_options(Type::Int8, vec![Some(1i64), None, Some(3), None]).unwrap(),
    ));
    let mut args: Vec<VectorRef> = vec![values, const_i64(3, 4)];
    let mut result = None;

    let eq = make_comparison(ComparisonOp::Eq, Type::Int8).unwrap();
    evaluate_function(eq.as_ref(), &rows, &mut args, Type::Bool, &mut ctx, &mut result)
        .unwrap();

    let vector = result.unwrap();
    let flat = vector.as_flat().unwrap();
    assert!(!flat.value::<bool>(0));
    assert!(flat.is_null(1));
    assert!(flat.value::<bool>(2));
    assert!(flat.is_null(3));
    assert!(ctx.errors().is_none());
}

// check_overflow with null_on_overflow = true: the overflowing row is nulled
// and nothing is raised.
#[test]
fn test_check_overflow_null_on_overflow() {
    let exec = ExecCtx::new();
    let exprs = ExprSet::new();
    let row = empty_batch();
    let mut ctx = EvalContext::new(&exec, &exprs, &row);
    let rows = Selection::with_all(2);
    let mut args: Vec<VectorRef> = vec![
        decimal_flat(10, 2, vec![12345, 99999999999]),
        const_bool(true, 2),
        decimal_witness(6, 2, 2),
    ];
    let mut result = None;

    evaluate_function(
        &CheckOverflowFunction,
        &rows,
        &mut args,
        Type::decimal(6, 2).unwrap(),
        &mut ctx,
        &mut result,
    )
    .unwrap();

    let vector = result.unwrap();
    let flat = vector.as_flat().unwrap();
    assert_eq!(flat.value::<i64>(0), 12345);
    assert!(flat.is_null(1));
    assert!(ctx.errors().is_none());
}

// check_overflow with null_on_overflow = false: absorbed under
// throw_on_error = false, raised by rethrow under throw_on_error = true.
#[test]
fn test_check_overflow_error_absorbed() {
    let exec = ExecCtx::new();
    let exprs = ExprSet::new();
    let row = empty_batch();
    let mut ctx = EvalContext::new(&exec, &exprs, &row);
    ctx.set_throw_on_error(false);
    let rows = Selection::with_all(2);
    let mut args: Vec<VectorRef> = vec![
        decimal_flat(10, 2, vec![12345, 99999999999]),
        const_bool(false, 2),
        decimal_witness(6, 2, 2),
    ];
    let mut result = None;

    evaluate_function(
        &CheckOverflowFunction,
        &rows,
        &mut args,
        Type::decimal(6, 2).unwrap(),
        &mut ctx,
        &mut result,
    )
    .unwrap();

    let vector = result.unwrap();
    assert!(vector.as_flat().unwrap().is_null(1));
    let errors = ctx.errors().unwrap();
    assert!(!errors.has_error_at(0));
    assert!(errors.has_error_at(1));
}

#[test]
fn test_check_overflow_error_rethrown() {
    let exec = ExecCtx::new();
    let exprs = ExprSet::new();
    let row = empty_batch();
    let mut ctx = EvalContext::new(&exec, &exprs, &row);
    let rows = Selection::with_all(2);
    let mut args: Vec<VectorRef> = vec![
        decimal_flat(10, 2, vec![12345, 99999999999]),
        const_bool(false, 2),
        decimal_witness(6, 2, 2),
    ];
    let mut result = None;

    // Record the per-row failure without the driver surfacing it.
    CheckOverflowFunction
        .apply(&rows, &mut args, Type::decimal(6, 2).unwrap(), &mut ctx, &mut result)
        .unwrap();

    let errors = ctx.errors().unwrap();
    let surviving = Selection::single(1);
    let raised = errors.throw_first_error(&surviving).unwrap_err();
    assert_eq!(raised.diagnostic().code, "DECIMAL_001");

    // The default throw_on_error path surfaces it at the driver boundary too.
    let mut args: Vec<VectorRef> = vec![
        decimal_flat(10, 2, vec![12345, 99999999999]),
        const_bool(false, 2),
        decimal_witness(6, 2, 2),
    ];
    let mut ctx = EvalContext::new(&exec, &exprs, &row);
    let mut result = None;
    let raised = evaluate_function(
        &CheckOverflowFunction,
        &rows,
        &mut args,
        Type::decimal(6, 2).unwrap(),
        &mut ctx,
        &mut result,
    )
    .unwrap_err();
    assert_eq!(raised.diagnostic().code, "DECIMAL_001");
}

// round_decimal derives the output type and rescales half-up.
#[test]
fn test_round_decimal() {
    let exec = ExecCtx::new();
    let exprs = ExprSet::new();
    let row = empty_batch();
    let mut ctx = EvalContext::new(&exec, &exprs, &row);
    let rows = Selection::with_all(1);
    let scale: VectorRef =
        Arc::new(Vector::Constant(ConstantVector::new(Type::Int4, Value::Int4(1), 1)));
    let mut args: Vec<VectorRef> = vec![decimal_flat(5, 3, vec![12345]), scale];
    let mut result = None;

    evaluate_function(
        &RoundDecimalFunction,
        &rows,
        &mut args,
        Type::decimal(5, 3).unwrap(),
        &mut ctx,
        &mut result,
    )
    .unwrap();

    let vector = result.unwrap();
    assert_eq!(vector.vector_type(), Type::decimal(4, 1).unwrap());
    assert_eq!(vector.as_flat().unwrap().value::<i64>(0), 123);
}

// Errors recorded inside a save/restore scope fold into the outer set
// without overwriting a pre-existing outer error.
#[test]
fn test_save_restore_over_inner_failure() {
    let exec = ExecCtx::new();
    let exprs = ExprSet::new();
    let columns = RowBatch::new(vec![flat_i64(vec![1, 2, 3, 4])]).unwrap();
    let mut ctx = EvalContext::new(&exec, &exprs, &columns);
    let rows = Selection::with_all(4);

    // Hypothetical outer error already present at row 1.
    let outer = reifydb_vector::Error(
        reifydb_vector::error::diagnostic::decimal::decimal_overflow(111, (10, 2), (6, 2)),
    );
    ctx.set_error(1, outer);

    let mut saver = ContextSaver::new();
    ctx.save_and_reset(&mut saver, &rows);
    assert!(ctx.errors().is_none());

    // Inner kernel records failures at rows 1 and 3.
    let mut args: Vec<VectorRef> = vec![
        decimal_flat(10, 2, vec![12345, 99999999999, 500, 88888888888]),
        const_bool(false, 4),
        decimal_witness(6, 2, 4),
    ];
    let mut result = None;
    CheckOverflowFunction
        .apply(&rows, &mut args, Type::decimal(6, 2).unwrap(), &mut ctx, &mut result)
        .unwrap();
    assert!(ctx.errors().unwrap().has_error_at(1));
    assert!(ctx.errors().unwrap().has_error_at(3));

    ctx.restore(&mut saver);

    let errors = ctx.errors().unwrap();
    assert!(errors.has_error_at(1));
    assert!(errors.has_error_at(3));
    let at_one = errors.error_at(1).unwrap().unwrap();
    assert!(
        at_one.diagnostic().label.as_deref().unwrap().contains("value 111 "),
        "the pre-existing outer error survives the fold"
    );
}

// The then-branch of a conditional must not clobber the rows of the other
// branch: narrowed evaluation copies into the existing result.
#[test]
fn test_then_branch_preserves_else_rows() {
    let exec = ExecCtx::new();
    let exprs = ExprSet::new();
    let row = empty_batch();
    let mut ctx = EvalContext::new(&exec, &exprs, &row);

    let strings = |values: Vec<&str>| -> VectorRef {
        Arc::new(Vector::Flat(FlatVector::from_strings(
            values.into_iter().map(String::from).collect(),
        )))
    };

    let full = Selection::with_all(4);
    let mut branch_rows = Selection::empty(4);
    branch_rows.select(0);
    branch_rows.select(2);
    branch_rows.update_bounds();

    let mut result = Some(strings(vec!["a", "b", "c", "d"]));
    let local = strings(vec!["A", "", "C", ""]);

    {
        let mut scope = ScopedFinalSelectionSetter::new(&mut ctx, &full, true, false);
        scope.ctx().move_or_copy_result(local, &branch_rows, &mut result).unwrap();
    }

    let vector = result.unwrap();
    let flat = vector.as_flat().unwrap();
    assert_eq!(flat.utf8(0), "A");
    assert_eq!(flat.utf8(1), "b");
    assert_eq!(flat.utf8(2), "C");
    assert_eq!(flat.utf8(3), "d");
    assert!(ctx.is_final_selection(), "scope restored on drop");
}
