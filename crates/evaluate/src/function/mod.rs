// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! The contract between scalar kernels and the evaluation context, plus the
//! row-set driver that applies default null behaviour around a kernel.

use crate::context::EvalContext;
use crate::local::{LocalDecoded, LocalSelection};
use reifydb_vector::util::BitVec;
use reifydb_vector::{DecodedVector, Selection, Type, Vector, VectorRef};
use tracing::instrument;

pub mod comparison;
pub mod decimal;

/// A vectorized scalar kernel. It receives the rows it must produce, its
/// arguments, a context and a result slot; it decodes what it needs, runs
/// row-wise, and publishes into the slot.
pub trait VectorFunction {
    /// A null in any argument produces a null result without invoking the
    /// kernel; the driver prunes those rows.
    fn is_default_null(&self) -> bool {
        true
    }

    /// The kernel is safe to run without null handling when every input is
    /// flat or constant and free of nulls.
    fn supports_flat_no_nulls_fast_path(&self) -> bool {
        false
    }

    fn apply(
        &self,
        rows: &Selection,
        args: &mut Vec<VectorRef>,
        out_type: Type,
        ctx: &mut EvalContext<'_>,
        result: &mut Option<VectorRef>,
    ) -> crate::Result<()>;
}

/// Pooled decoded views of a kernel's arguments, one per argument.
pub struct DecodedArgs<'a> {
    decoded: Vec<LocalDecoded<'a>>,
}

impl<'a> DecodedArgs<'a> {
    pub fn new(
        rows: &Selection,
        args: &[VectorRef],
        ctx: &EvalContext<'a>,
    ) -> crate::Result<Self> {
        let exec = ctx.exec_ctx();
        let mut decoded = Vec::with_capacity(args.len());
        for arg in args {
            decoded.push(LocalDecoded::decode(exec, arg, rows)?);
        }
        Ok(Self { decoded })
    }

    pub fn at(&self, index: usize) -> &DecodedVector {
        self.decoded[index].view()
    }

    pub fn len(&self) -> usize {
        self.decoded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoded.is_empty()
    }
}

/// Applies 'function' over 'rows' with default null behaviour: rows where any
/// argument is null are pruned before the kernel runs and nulled in the
/// result afterwards. Under throw_on_error, a recorded error of the smallest
/// selected row surfaces before the call returns.
#[instrument(level = "trace", skip_all, name = "evaluate::function")]
pub fn evaluate_function<'a>(
    function: &dyn VectorFunction,
    rows: &Selection,
    args: &mut Vec<VectorRef>,
    out_type: Type,
    ctx: &mut EvalContext<'a>,
    result: &mut Option<VectorRef>,
) -> crate::Result<()> {
    // Resolve lazy arguments up front; both the null scan and the kernel
    // need materialised values.
    for arg in args.iter_mut() {
        let loaded = match &**arg {
            Vector::Lazy(lazy) => Some(lazy.load(rows)?),
            _ => None,
        };
        if let Some(loaded) = loaded {
            *arg = loaded;
        }
    }

    let args_null_free = args.iter().all(|arg| arg.is_flat_or_constant_no_nulls());
    if function.is_default_null() && !args_null_free {
        let mut null_mask = BitVec::repeat(rows.end(), false);
        let mut any_nulls = false;
        for arg in args.iter() {
            for row in rows.iter_selected() {
                if arg.is_null(row) {
                    null_mask.set(row, true);
                    any_nulls = true;
                }
            }
        }

        if any_nulls {
            let mut remaining = LocalSelection::with_value(ctx.exec_ctx(), rows);
            let remaining = remaining.get();
            remaining.deselect_mask(&null_mask);

            let had_pruned = ctx.nulls_pruned();
            ctx.set_nulls_pruned(true);
            let applied = if remaining.count() > 0 {
                function.apply(remaining, args, out_type, ctx, result)
            } else {
                Ok(())
            };
            ctx.set_nulls_pruned(had_pruned);
            applied?;

            ctx.add_nulls(rows, &null_mask, out_type, result)?;
            return throw_pending(rows, ctx);
        }
    }

    function.apply(rows, args, out_type, ctx, result)?;
    throw_pending(rows, ctx)
}

fn throw_pending(rows: &Selection, ctx: &EvalContext<'_>) -> crate::Result<()> {
    if ctx.throw_on_error() {
        if let Some(errors) = ctx.errors() {
            errors.throw_first_error(rows)?;
        }
    }
    Ok(())
}
