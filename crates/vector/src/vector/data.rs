// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use crate::util::CowVec;
use crate::value::{Physical, Value};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Typed payload of a flat vector, one copy-on-write buffer per physical
/// kind. Decimals live in the Int8/Int16 buffers as unscaled integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VectorData {
    Bool(CowVec<bool>),
    Int1(CowVec<i8>),
    Int2(CowVec<i16>),
    Int4(CowVec<i32>),
    Int8(CowVec<i64>),
    Int16(CowVec<i128>),
    Float4(CowVec<f32>),
    Float8(CowVec<f64>),
    Utf8(CowVec<String>),
}

impl VectorData {
    /// A buffer of 'len' default values of the given physical kind.
    pub fn filled(physical: Physical, len: usize) -> Self {
        match physical {
            Physical::Bool => VectorData::Bool(CowVec::filled(len)),
            Physical::Int1 => VectorData::Int1(CowVec::filled(len)),
            Physical::Int2 => VectorData::Int2(CowVec::filled(len)),
            Physical::Int4 => VectorData::Int4(CowVec::filled(len)),
            Physical::Int8 => VectorData::Int8(CowVec::filled(len)),
            Physical::Int16 => VectorData::Int16(CowVec::filled(len)),
            Physical::Float4 => VectorData::Float4(CowVec::filled(len)),
            Physical::Float8 => VectorData::Float8(CowVec::filled(len)),
            Physical::Utf8 => VectorData::Utf8(CowVec::filled(len)),
        }
    }

    pub fn physical(&self) -> Physical {
        match self {
            VectorData::Bool(_) => Physical::Bool,
            VectorData::Int1(_) => Physical::Int1,
            VectorData::Int2(_) => Physical::Int2,
            VectorData::Int4(_) => Physical::Int4,
            VectorData::Int8(_) => Physical::Int8,
            VectorData::Int16(_) => Physical::Int16,
            VectorData::Float4(_) => Physical::Float4,
            VectorData::Float8(_) => Physical::Float8,
            VectorData::Utf8(_) => Physical::Utf8,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            VectorData::Bool(v) => v.len(),
            VectorData::Int1(v) => v.len(),
            VectorData::Int2(v) => v.len(),
            VectorData::Int4(v) => v.len(),
            VectorData::Int8(v) => v.len(),
            VectorData::Int16(v) => v.len(),
            VectorData::Float4(v) => v.len(),
            VectorData::Float8(v) => v.len(),
            VectorData::Utf8(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grows or shrinks to 'len' entries; new entries take the default value.
    pub fn resize(&mut self, len: usize) {
        match self {
            VectorData::Bool(v) => v.resize(len, false),
            VectorData::Int1(v) => v.resize(len, 0),
            VectorData::Int2(v) => v.resize(len, 0),
            VectorData::Int4(v) => v.resize(len, 0),
            VectorData::Int8(v) => v.resize(len, 0),
            VectorData::Int16(v) => v.resize(len, 0),
            VectorData::Float4(v) => v.resize(len, 0.0),
            VectorData::Float8(v) => v.resize(len, 0.0),
            VectorData::Utf8(v) => v.resize(len, String::new()),
        }
    }
}

/// Scalar types that live directly in a [`VectorData`] buffer. Hot paths are
/// monomorphised on this trait, not on the vector variant; decoding resolves
/// the variant once per call.
pub trait NativeType: Copy + PartialEq + PartialOrd + Debug + 'static {
    fn data(data: &VectorData) -> Option<&CowVec<Self>>;
    fn data_mut(data: &mut VectorData) -> Option<&mut CowVec<Self>>;
    /// Extracts the native from a constant's scalar, if it carries this kind.
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! native_type {
    ($native:ty, $variant:ident, $from_value:expr) => {
        impl NativeType for $native {
            fn data(data: &VectorData) -> Option<&CowVec<Self>> {
                match data {
                    VectorData::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn data_mut(data: &mut VectorData) -> Option<&mut CowVec<Self>> {
                match data {
                    VectorData::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn from_value(value: &Value) -> Option<Self> {
                let extract: fn(&Value) -> Option<Self> = $from_value;
                extract(value)
            }
        }
    };
}

native_type!(bool, Bool, |v| match v {
    Value::Bool(b) => Some(*b),
    _ => None,
});
native_type!(i8, Int1, |v| match v {
    Value::Int1(x) => Some(*x),
    _ => None,
});
native_type!(i16, Int2, |v| match v {
    Value::Int2(x) => Some(*x),
    _ => None,
});
native_type!(i32, Int4, |v| match v {
    Value::Int4(x) => Some(*x),
    _ => None,
});
native_type!(i64, Int8, |v| match v {
    Value::Int8(x) => Some(*x),
    Value::Decimal(x) => i64::try_from(*x).ok(),
    _ => None,
});
native_type!(i128, Int16, |v| match v {
    Value::Int16(x) => Some(*x),
    Value::Decimal(x) => Some(*x),
    _ => None,
});
native_type!(f32, Float4, |v| match v {
    Value::Float4(x) => Some(*x),
    _ => None,
});
native_type!(f64, Float8, |v| match v {
    Value::Float8(x) => Some(*x),
    _ => None,
});
