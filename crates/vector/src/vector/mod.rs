// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use crate::error::diagnostic::internal::internal;
use crate::value::{Type, Value};
use std::sync::Arc;

mod constant;
mod data;
mod dictionary;
mod flat;
mod lazy;
mod row;
mod writable;

pub use constant::ConstantVector;
pub use data::{NativeType, VectorData};
pub use dictionary::DictionaryVector;
pub use flat::FlatVector;
pub use lazy::{LazyVector, VectorLoader};
pub use row::RowBatch;
pub use writable::{copy_rows, ensure_writable};

/// Shared handle to a vector. Producers and readers that retain a vector
/// beyond the call site share ownership through this.
pub type VectorRef = Arc<Vector>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Flat,
    Constant,
    Dictionary,
    Lazy,
}

/// A columnar value in one of its encodings.
#[derive(Debug, Clone)]
pub enum Vector {
    Flat(FlatVector),
    Constant(ConstantVector),
    Dictionary(DictionaryVector),
    Lazy(LazyVector),
}

impl Vector {
    pub fn vector_type(&self) -> Type {
        match self {
            Vector::Flat(v) => v.vector_type(),
            Vector::Constant(v) => v.vector_type(),
            Vector::Dictionary(v) => v.vector_type(),
            Vector::Lazy(v) => v.vector_type(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Vector::Flat(v) => v.len(),
            Vector::Constant(v) => v.len(),
            Vector::Dictionary(v) => v.len(),
            Vector::Lazy(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn encoding(&self) -> Encoding {
        match self {
            Vector::Flat(_) => Encoding::Flat,
            Vector::Constant(_) => Encoding::Constant,
            Vector::Dictionary(_) => Encoding::Dictionary,
            Vector::Lazy(_) => Encoding::Lazy,
        }
    }

    /// Null at 'row', resolving dictionary indirection. Lazy vectors report
    /// their loaded state; unloaded columns have no known nulls yet.
    pub fn is_null(&self, row: usize) -> bool {
        match self {
            Vector::Flat(v) => v.is_null(row),
            Vector::Constant(v) => v.is_null(),
            Vector::Dictionary(v) => {
                v.is_wrapper_null(row) || v.base().is_null(v.indices()[row])
            }
            Vector::Lazy(v) => v.loaded().map(|inner| inner.is_null(row)).unwrap_or(false),
        }
    }

    /// True for the encodings the flat-no-nulls fast path accepts: flat or
    /// constant without any null.
    pub fn is_flat_or_constant_no_nulls(&self) -> bool {
        match self {
            Vector::Flat(v) => !v.has_nulls(),
            Vector::Constant(v) => !v.is_null(),
            _ => false,
        }
    }

    pub fn as_flat(&self) -> Option<&FlatVector> {
        match self {
            Vector::Flat(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_flat_mut(&mut self) -> Option<&mut FlatVector> {
        match self {
            Vector::Flat(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<&ConstantVector> {
        match self {
            Vector::Constant(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&DictionaryVector> {
        match self {
            Vector::Dictionary(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_lazy(&self) -> Option<&LazyVector> {
        match self {
            Vector::Lazy(v) => Some(v),
            _ => None,
        }
    }

    /// The scalar at 'row' with all encodings resolved; Undefined when null.
    /// Unloaded lazy vectors are an invariant violation here.
    pub fn scalar_at(&self, row: usize) -> crate::Result<Value> {
        match self {
            Vector::Flat(v) => Ok(v.scalar(row)),
            Vector::Constant(v) => Ok(v.value().clone()),
            Vector::Dictionary(v) => {
                if v.is_wrapper_null(row) {
                    return Ok(Value::Undefined);
                }
                v.base().scalar_at(v.indices()[row])
            }
            Vector::Lazy(v) => match v.loaded() {
                Some(inner) => inner.scalar_at(row),
                None => crate::err!(internal(
                    "scalar access on an unloaded lazy vector".to_string()
                )),
            },
        }
    }
}
