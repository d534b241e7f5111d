// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Elementwise binary comparisons, bound to a comparator and a scalar type at
//! construction time.

use super::{DecodedArgs, VectorFunction};
use crate::context::EvalContext;
use reifydb_vector::error::diagnostic::evaluate::{
    argument_count_mismatch, unsupported_comparison_type,
};
use reifydb_vector::error::diagnostic::internal::internal;
use reifydb_vector::{error, return_error};
use reifydb_vector::{FlatVector, NativeType, Physical, Selection, Type, Vector, VectorRef};
use std::marker::PhantomData;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Lt,
    Gt,
    LtEq,
    GtEq,
}

impl ComparisonOp {
    fn compare<T: PartialOrd>(self, left: T, right: T) -> bool {
        match self {
            ComparisonOp::Eq => left == right,
            ComparisonOp::Lt => left < right,
            ComparisonOp::Gt => left > right,
            ComparisonOp::LtEq => left <= right,
            ComparisonOp::GtEq => left >= right,
        }
    }
}

/// Builds a comparison kernel for arguments of 'ty'. Decimals compare on
/// their physical unscaled integers.
pub fn make_comparison(op: ComparisonOp, ty: Type) -> crate::Result<Box<dyn VectorFunction>> {
    Ok(match ty.physical() {
        Physical::Bool => Box::new(ComparisonFunction::<bool>::new(op)),
        Physical::Int1 => Box::new(ComparisonFunction::<i8>::new(op)),
        Physical::Int2 => Box::new(ComparisonFunction::<i16>::new(op)),
        Physical::Int4 => Box::new(ComparisonFunction::<i32>::new(op)),
        Physical::Int8 => Box::new(ComparisonFunction::<i64>::new(op)),
        Physical::Int16 => Box::new(ComparisonFunction::<i128>::new(op)),
        Physical::Float4 => Box::new(ComparisonFunction::<f32>::new(op)),
        Physical::Float8 => Box::new(ComparisonFunction::<f64>::new(op)),
        Physical::Utf8 => {
            if ty != Type::Utf8 {
                return_error!(unsupported_comparison_type(ty));
            }
            Box::new(Utf8ComparisonFunction { op })
        }
    })
}

struct ComparisonFunction<T: NativeType> {
    op: ComparisonOp,
    _marker: PhantomData<T>,
}

impl<T: NativeType> ComparisonFunction<T> {
    fn new(op: ComparisonOp) -> Self {
        Self { op, _marker: PhantomData }
    }
}

fn writable_bool<'r>(
    rows: &Selection,
    ctx: &EvalContext<'_>,
    result: &'r mut Option<VectorRef>,
) -> crate::Result<&'r mut FlatVector> {
    ctx.ensure_writable(rows, Type::Bool, result)?;
    result
        .as_mut()
        .and_then(Arc::get_mut)
        .and_then(Vector::as_flat_mut)
        .ok_or_else(|| error!(internal("writable result must be a unique flat vector".to_string())))
}

impl<T: NativeType> VectorFunction for ComparisonFunction<T> {
    fn is_default_null(&self) -> bool {
        true
    }

    fn supports_flat_no_nulls_fast_path(&self) -> bool {
        true
    }

    fn apply(
        &self,
        rows: &Selection,
        args: &mut Vec<VectorRef>,
        _out_type: Type,
        ctx: &mut EvalContext<'_>,
        result: &mut Option<VectorRef>,
    ) -> crate::Result<()> {
        if args.len() != 2 {
            return_error!(argument_count_mismatch(2, args.len()));
        }
        let decoded = DecodedArgs::new(rows, args, ctx)?;
        let flat = writable_bool(rows, ctx, result)?;
        let arg0 = decoded.at(0);
        let arg1 = decoded.at(1);

        if arg0.is_identity_mapping() && arg1.is_constant_mapping() {
            let right = arg1.value::<T>(0);
            for row in rows.iter_selected() {
                flat.set_value(row, self.op.compare(arg0.value::<T>(row), right));
            }
        } else if arg0.is_constant_mapping() && arg1.is_identity_mapping() {
            let left = arg0.value::<T>(0);
            for row in rows.iter_selected() {
                flat.set_value(row, self.op.compare(left, arg1.value::<T>(row)));
            }
        } else {
            for row in rows.iter_selected() {
                flat.set_value(row, self.op.compare(arg0.value::<T>(row), arg1.value::<T>(row)));
            }
        }
        Ok(())
    }
}

struct Utf8ComparisonFunction {
    op: ComparisonOp,
}

impl VectorFunction for Utf8ComparisonFunction {
    fn is_default_null(&self) -> bool {
        true
    }

    fn supports_flat_no_nulls_fast_path(&self) -> bool {
        true
    }

    fn apply(
        &self,
        rows: &Selection,
        args: &mut Vec<VectorRef>,
        _out_type: Type,
        ctx: &mut EvalContext<'_>,
        result: &mut Option<VectorRef>,
    ) -> crate::Result<()> {
        if args.len() != 2 {
            return_error!(argument_count_mismatch(2, args.len()));
        }
        let decoded = DecodedArgs::new(rows, args, ctx)?;
        let flat = writable_bool(rows, ctx, result)?;
        let arg0 = decoded.at(0);
        let arg1 = decoded.at(1);

        if arg0.is_identity_mapping() && arg1.is_constant_mapping() {
            let right = arg1.utf8(0);
            for row in rows.iter_selected() {
                flat.set_value(row, self.op.compare(arg0.utf8(row), right));
            }
        } else if arg0.is_constant_mapping() && arg1.is_identity_mapping() {
            let left = arg0.utf8(0);
            for row in rows.iter_selected() {
                flat.set_value(row, self.op.compare(left, arg1.utf8(row)));
            }
        } else {
            for row in rows.iter_selected() {
                flat.set_value(row, self.op.compare(arg0.utf8(row), arg1.utf8(row)));
            }
        }
        Ok(())
    }
}
