// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use super::{FlatVector, Vector, VectorRef};
use crate::error::diagnostic::internal::internal;
use crate::pool::VectorPool;
use crate::selection::Selection;
use crate::value::Type;
use std::sync::Arc;

/// Makes `result` a flat vector of 'ty' that is safely mutable over 'rows'.
///
/// A uniquely owned flat vector of the right type is kept (grown if needed).
/// A shared, differently typed or differently encoded result is replaced by
/// a fresh vector from the pool with the rows *outside* 'rows' copied over,
/// so a partially populated result survives.
pub fn ensure_writable(
    rows: &Selection,
    ty: Type,
    pool: &VectorPool,
    result: &mut Option<VectorRef>,
) -> crate::Result<()> {
    let required = rows.end();
    match result {
        None => {
            *result = Some(pool.get(ty, required));
            Ok(())
        }
        Some(current) => {
            let reusable = Arc::strong_count(current) == 1
                && matches!(&**current, Vector::Flat(flat) if flat.vector_type() == ty);
            if reusable {
                let flat = Arc::get_mut(current)
                    .and_then(Vector::as_flat_mut)
                    .ok_or_else(|| crate::error!(internal("unique flat vector expected".to_string())))?;
                if flat.len() < required {
                    flat.resize(required);
                }
                return Ok(());
            }

            let old = current.clone();
            let len = required.max(old.len());
            let mut fresh = pool.get(ty, len);
            {
                let flat = Arc::get_mut(&mut fresh)
                    .and_then(Vector::as_flat_mut)
                    .ok_or_else(|| crate::error!(internal("pool returned a shared vector".to_string())))?;
                let preserve_same_type = old.vector_type() == ty;
                if preserve_same_type {
                    for row in 0..old.len().min(len) {
                        if !rows.is_selected(row) {
                            flat.set_scalar(row, old.scalar_at(row)?);
                        }
                    }
                }
            }
            *result = Some(fresh);
            Ok(())
        }
    }
}

/// Row-wise copy of values and nulls from 'src' into 'dst' over 'rows'.
pub fn copy_rows(src: &Vector, rows: &Selection, dst: &mut FlatVector) -> crate::Result<()> {
    for row in rows.iter_selected() {
        dst.set_scalar(row, src.scalar_at(row)?);
    }
    Ok(())
}
