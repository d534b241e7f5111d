// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Columnar vector model for vectorized expression evaluation: typed
//! copy-on-write buffers behind flat, constant, dictionary and lazy
//! encodings, row-set selections, decoded views and recycling pools.

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod error;
pub mod pool;
pub mod util;
pub mod value;
pub mod vector;

mod decoded;
mod selection;

pub use decoded::DecodedVector;
pub use error::{Error, Result};
pub use selection::Selection;
pub use util::{BitVec, CowVec};
pub use value::{Physical, Precision, Scale, Type, Value};
pub use vector::{
    copy_rows, ensure_writable, ConstantVector, DictionaryVector, Encoding, FlatVector,
    LazyVector, NativeType, RowBatch, Vector, VectorData, VectorLoader, VectorRef,
};
