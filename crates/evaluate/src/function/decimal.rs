// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Decimal kernels: precision-checked rescale, construction from unscaled
//! integers, scale rounding and unscaled extraction. These exercise the
//! null-or-raise per-row failure pathways of the evaluation context.

use super::{DecodedArgs, VectorFunction};
use crate::context::EvalContext;
use reifydb_vector::error::diagnostic::decimal::{decimal_overflow, unscaled_value_too_large};
use reifydb_vector::error::diagnostic::evaluate::{
    argument_count_mismatch, constant_argument_required, decimal_argument_required,
    short_decimal_required,
};
use reifydb_vector::error::diagnostic::internal::internal;
use reifydb_vector::value::{rescale_with_round_up, DecimalNative, POWERS_OF_TEN};
use reifydb_vector::{err, error, return_error};
use reifydb_vector::{
    DecodedVector, FlatVector, NativeType, Selection, Type, Vector, VectorRef,
};
use std::sync::Arc;

fn writable_flat<'r>(
    rows: &Selection,
    ty: Type,
    ctx: &EvalContext<'_>,
    result: &'r mut Option<VectorRef>,
) -> crate::Result<&'r mut FlatVector> {
    ctx.ensure_writable(rows, ty, result)?;
    result
        .as_mut()
        .and_then(Arc::get_mut)
        .and_then(Vector::as_flat_mut)
        .ok_or_else(|| error!(internal("writable result must be a unique flat vector".to_string())))
}

fn precision_scale_of(arg: usize, ty: Type) -> crate::Result<(u8, u8)> {
    match ty.precision_scale() {
        Some(parts) => Ok(parts),
        None => err!(decimal_argument_required(arg, ty)),
    }
}

fn constant_bool(decoded: &DecodedArgs<'_>, index: usize) -> crate::Result<bool> {
    if !decoded.at(index).is_constant_mapping() {
        return_error!(constant_argument_required(index));
    }
    Ok(decoded.at(index).value::<bool>(0))
}

/// Rescales a decimal to the witness output type with half-up rounding.
/// Overflowing rows are nulled or fail as user errors, per the constant
/// null_on_overflow argument.
///
/// Arguments: decimal input, null_on_overflow (constant bool), type witness.
pub struct CheckOverflowFunction;

impl CheckOverflowFunction {
    fn apply_typed<I, O>(
        rows: &Selection,
        value: &DecodedVector,
        from: (u8, u8),
        to: (u8, u8),
        null_on_overflow: bool,
        ctx: &mut EvalContext<'_>,
        flat: &mut FlatVector,
    ) -> crate::Result<()>
    where
        I: NativeType + DecimalNative,
        O: NativeType + DecimalNative,
    {
        ctx.apply_to_selected_no_throw(rows, |row| {
            let unscaled = value.value::<I>(row);
            match rescale_with_round_up::<I, O>(unscaled, from, to) {
                Some(rescaled) => {
                    flat.set_value(row, rescaled);
                    Ok(())
                }
                None => {
                    flat.set_null(row, true);
                    if null_on_overflow {
                        Ok(())
                    } else {
                        err!(decimal_overflow(unscaled.to_i128(), from, to))
                    }
                }
            }
        })
    }
}

impl VectorFunction for CheckOverflowFunction {
    fn apply(
        &self,
        rows: &Selection,
        args: &mut Vec<VectorRef>,
        _out_type: Type,
        ctx: &mut EvalContext<'_>,
        result: &mut Option<VectorRef>,
    ) -> crate::Result<()> {
        if args.len() != 3 {
            return_error!(argument_count_mismatch(3, args.len()));
        }
        let from_type = args[0].vector_type();
        let to_type = args[2].vector_type();
        let from = precision_scale_of(0, from_type)?;
        let to = precision_scale_of(2, to_type)?;

        let decoded = DecodedArgs::new(rows, args, ctx)?;
        let null_on_overflow = constant_bool(&decoded, 1)?;
        let flat = writable_flat(rows, to_type, ctx, result)?;
        let value = decoded.at(0);

        match (from_type.is_short_decimal(), to_type.is_short_decimal()) {
            (true, true) => Self::apply_typed::<i64, i64>(
                rows, value, from, to, null_on_overflow, ctx, flat,
            ),
            (true, false) => Self::apply_typed::<i64, i128>(
                rows, value, from, to, null_on_overflow, ctx, flat,
            ),
            (false, true) => Self::apply_typed::<i128, i64>(
                rows, value, from, to, null_on_overflow, ctx, flat,
            ),
            (false, false) => Self::apply_typed::<i128, i128>(
                rows, value, from, to, null_on_overflow, ctx, flat,
            ),
        }
    }
}

/// Builds a decimal of the witness type from unscaled 64-bit integers.
/// Short-decimal outputs reject magnitudes reaching 10^precision; long
/// outputs widen and accept.
///
/// Arguments: unscaled int64, type witness, null_on_overflow (constant bool).
pub struct MakeDecimalFunction {
    precision: u8,
    short: bool,
}

impl MakeDecimalFunction {
    pub fn new(out_type: Type) -> crate::Result<Self> {
        let (precision, _) = precision_scale_of(1, out_type)?;
        Ok(Self { precision, short: out_type.is_short_decimal() })
    }
}

impl VectorFunction for MakeDecimalFunction {
    fn apply(
        &self,
        rows: &Selection,
        args: &mut Vec<VectorRef>,
        out_type: Type,
        ctx: &mut EvalContext<'_>,
        result: &mut Option<VectorRef>,
    ) -> crate::Result<()> {
        if args.len() != 3 {
            return_error!(argument_count_mismatch(3, args.len()));
        }
        let decoded = DecodedArgs::new(rows, args, ctx)?;
        let flat = writable_flat(rows, out_type, ctx, result)?;
        let unscaled = decoded.at(0);

        if self.short {
            let null_on_overflow = constant_bool(&decoded, 2)?;
            let bound = POWERS_OF_TEN[self.precision as usize];
            let precision = self.precision;
            ctx.apply_to_selected_no_throw(rows, |row| {
                let value = unscaled.value::<i64>(row);
                if (value as i128) <= -bound || (value as i128) >= bound {
                    // Requested precision is too low to represent this value.
                    flat.set_null(row, true);
                    if null_on_overflow {
                        Ok(())
                    } else {
                        err!(unscaled_value_too_large(value, precision))
                    }
                } else {
                    flat.set_value(row, value);
                    Ok(())
                }
            })
        } else {
            for row in rows.iter_selected() {
                flat.set_value(row, unscaled.value::<i64>(row) as i128);
            }
            Ok(())
        }
    }
}

/// Rounds a decimal to a new scale, deriving the output type from the input
/// type and the constant scale argument. Overflowing rows are nulled.
///
/// Arguments: decimal input, scale (constant int32).
pub struct RoundDecimalFunction;

impl RoundDecimalFunction {
    /// The output type of rounding 'from' to 'scale'.
    pub fn out_type(from: (u8, u8), scale: i32) -> crate::Result<Type> {
        let (from_precision, from_scale) = from;
        let integral_digits = i32::from(from_precision) - i32::from(from_scale) + 1;
        let (to_precision, to_scale) = if scale < 0 {
            let precision = integral_digits.max(-i32::from(from_scale) + 1);
            (precision.min(38), 0)
        } else {
            let to_scale = i32::from(from_scale).min(scale);
            ((integral_digits + to_scale).min(38), to_scale)
        };
        Type::decimal(to_precision as u8, to_scale as u8)
    }

    fn apply_typed<I, O>(
        rows: &Selection,
        value: &DecodedVector,
        from: (u8, u8),
        to: (u8, u8),
        flat: &mut FlatVector,
    ) where
        I: NativeType + DecimalNative,
        O: NativeType + DecimalNative,
    {
        for row in rows.iter_selected() {
            match rescale_with_round_up::<I, O>(value.value::<I>(row), from, to) {
                Some(rescaled) => flat.set_value(row, rescaled),
                None => flat.set_null(row, true),
            }
        }
    }
}

impl VectorFunction for RoundDecimalFunction {
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
        let from_type = args[0].vector_type();
        let from = precision_scale_of(0, from_type)?;

        let decoded = DecodedArgs::new(rows, args, ctx)?;
        if !decoded.at(1).is_constant_mapping() {
            return_error!(constant_argument_required(1));
        }
        let scale = decoded.at(1).value::<i32>(0);

        let out_type = Self::out_type(from, scale)?;
        let to = match out_type.precision_scale() {
            Some(parts) => parts,
            None => return err!(internal("round output type must be decimal".to_string())),
        };
        let flat = writable_flat(rows, out_type, ctx, result)?;
        let value = decoded.at(0);

        match (from_type.is_short_decimal(), out_type.is_short_decimal()) {
            (true, true) => Self::apply_typed::<i64, i64>(rows, value, from, to, flat),
            (true, false) => Self::apply_typed::<i64, i128>(rows, value, from, to, flat),
            (false, true) => Self::apply_typed::<i128, i64>(rows, value, from, to, flat),
            (false, false) => Self::apply_typed::<i128, i128>(rows, value, from, to, flat),
        }
        Ok(())
    }
}

/// Extracts the unscaled 64-bit integer of a short decimal. The result is
/// the argument vector itself, transferred into the result slot.
pub struct UnscaledValueFunction;

impl VectorFunction for UnscaledValueFunction {
    fn apply(
        &self,
        _rows: &Selection,
        args: &mut Vec<VectorRef>,
        _out_type: Type,
        _ctx: &mut EvalContext<'_>,
        result: &mut Option<VectorRef>,
    ) -> crate::Result<()> {
        if args.len() != 1 {
            return_error!(argument_count_mismatch(1, args.len()));
        }
        let ty = args[0].vector_type();
        if !ty.is_short_decimal() {
            return_error!(short_decimal_required(ty));
        }
        *result = Some(args[0].clone());
        Ok(())
    }
}
