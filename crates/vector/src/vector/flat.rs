// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use super::data::{NativeType, VectorData};
use crate::error::diagnostic::evaluate::type_mismatch;
use crate::util::BitVec;
use crate::value::{Type, Value};
use serde::{Deserialize, Serialize};

/// Dense values plus an optional null bitmap (bit set = null at that row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatVector {
    ty: Type,
    data: VectorData,
    nulls: Option<BitVec>,
}

impl FlatVector {
    pub fn new(ty: Type, data: VectorData, nulls: Option<BitVec>) -> Self {
        debug_assert_eq!(ty.physical(), data.physical());
        if let Some(nulls) = &nulls {
            debug_assert_eq!(nulls.len(), data.len());
        }
        Self { ty, data, nulls }
    }

    /// A vector of 'len' default values, no nulls.
    pub fn with_size(ty: Type, len: usize) -> Self {
        Self { ty, data: VectorData::filled(ty.physical(), len), nulls: None }
    }

    /// Builds a flat vector from natives of the matching physical kind.
    pub fn from_values<T: NativeType>(ty: Type, values: Vec<T>) -> crate::Result<Self> {
        let mut data = VectorData::filled(ty.physical(), 0);
        match T::data_mut(&mut data) {
            Some(buffer) => buffer.extend(values),
            None => crate::return_error!(type_mismatch(ty, ty)),
        }
        Ok(Self { ty, data, nulls: None })
    }

    /// Builds a Utf8 flat vector; strings have no native carrier.
    pub fn from_strings(values: Vec<String>) -> Self {
        Self { ty: Type::Utf8, data: VectorData::Utf8(values.into()), nulls: None }
    }

    /// Builds a flat vector where None entries become nulls.
    pub fn from_options<T: NativeType + Default>(
        ty: Type,
        values: Vec<Option<T>>,
    ) -> crate::Result<Self> {
        let nulls = BitVec::from_fn(values.len(), |i| values[i].is_none());
        let natives: Vec<T> = values.into_iter().map(|v| v.unwrap_or_default()).collect();
        let mut vector = Self::from_values(ty, natives)?;
        vector.nulls = if nulls.any() { Some(nulls) } else { None };
        Ok(vector)
    }

    pub fn vector_type(&self) -> Type {
        self.ty
    }

    pub(crate) fn set_type(&mut self, ty: Type) {
        debug_assert_eq!(ty.physical(), self.data.physical());
        self.ty = ty;
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &VectorData {
        &self.data
    }

    pub fn nulls(&self) -> Option<&BitVec> {
        self.nulls.as_ref()
    }

    pub fn has_nulls(&self) -> bool {
        self.nulls.as_ref().map(|nulls| nulls.any()).unwrap_or(false)
    }

    pub fn is_null(&self, row: usize) -> bool {
        self.nulls.as_ref().map(|nulls| nulls.get(row)).unwrap_or(false)
    }

    pub fn set_null(&mut self, row: usize, null: bool) {
        match (&mut self.nulls, null) {
            (Some(nulls), _) => nulls.set(row, null),
            (slot @ None, true) => {
                let mut nulls = BitVec::repeat(self.data.len(), false);
                nulls.set(row, true);
                *slot = Some(nulls);
            }
            (None, false) => {}
        }
    }

    /// The native at 'row'. The caller has validated the physical kind; a
    /// mismatch is an invariant violation.
    pub fn value<T: NativeType>(&self, row: usize) -> T {
        let data = T::data(&self.data);
        debug_assert!(data.is_some(), "flat vector physical kind mismatch");
        data.map(|buffer| buffer[row]).unwrap_or_else(|| unreachable!())
    }

    pub fn set_value<T: NativeType>(&mut self, row: usize, value: T) {
        let data = T::data_mut(&mut self.data);
        debug_assert!(data.is_some(), "flat vector physical kind mismatch");
        if let Some(buffer) = data {
            buffer.make_mut()[row] = value;
        }
    }

    pub fn utf8(&self, row: usize) -> &str {
        match &self.data {
            VectorData::Utf8(v) => v[row].as_str(),
            _ => unreachable!("flat vector physical kind mismatch"),
        }
    }

    pub fn set_utf8(&mut self, row: usize, value: String) {
        match &mut self.data {
            VectorData::Utf8(v) => v.make_mut()[row] = value,
            _ => unreachable!("flat vector physical kind mismatch"),
        }
    }

    /// The scalar at 'row' as an owned value; Undefined when null.
    pub fn scalar(&self, row: usize) -> Value {
        if self.is_null(row) {
            return Value::Undefined;
        }
        match &self.data {
            VectorData::Bool(v) => Value::Bool(v[row]),
            VectorData::Int1(v) => Value::Int1(v[row]),
            VectorData::Int2(v) => Value::Int2(v[row]),
            VectorData::Int4(v) => Value::Int4(v[row]),
            VectorData::Int8(v) => {
                if self.ty.is_decimal() {
                    Value::Decimal(v[row] as i128)
                } else {
                    Value::Int8(v[row])
                }
            }
            VectorData::Int16(v) => {
                if self.ty.is_decimal() {
                    Value::Decimal(v[row])
                } else {
                    Value::Int16(v[row])
                }
            }
            VectorData::Float4(v) => Value::Float4(v[row]),
            VectorData::Float8(v) => Value::Float8(v[row]),
            VectorData::Utf8(v) => Value::Utf8(v[row].clone()),
        }
    }

    /// Writes a scalar at 'row'; Undefined sets the null bit.
    pub fn set_scalar(&mut self, row: usize, value: Value) {
        match value {
            Value::Undefined => {
                self.set_null(row, true);
                return;
            }
            Value::Bool(v) => self.set_value(row, v),
            Value::Int1(v) => self.set_value(row, v),
            Value::Int2(v) => self.set_value(row, v),
            Value::Int4(v) => self.set_value(row, v),
            Value::Int8(v) => self.set_value(row, v),
            Value::Int16(v) => self.set_value(row, v),
            Value::Float4(v) => self.set_value(row, v),
            Value::Float8(v) => self.set_value(row, v),
            Value::Utf8(v) => self.set_utf8(row, v),
            Value::Decimal(v) => match &mut self.data {
                VectorData::Int8(buffer) => buffer.make_mut()[row] = v as i64,
                VectorData::Int16(buffer) => buffer.make_mut()[row] = v,
                _ => unreachable!("flat vector physical kind mismatch"),
            },
        }
        self.set_null(row, false);
    }

    /// Grows or shrinks to 'len' rows; new rows are non-null defaults.
    pub fn resize(&mut self, len: usize) {
        self.data.resize(len);
        if let Some(nulls) = &mut self.nulls {
            nulls.resize(len, false);
        }
    }

    /// Drops the null bitmap entirely.
    pub fn clear_nulls(&mut self) {
        self.nulls = None;
    }
}

#[cfg(test)]
mod tests {
    mod construction {
        use crate::value::Type;
        use crate::vector::FlatVector;

        #[test]
        fn test_from_values() {
            let v = FlatVector::from_values(Type::Int8, vec![1i64, 2, 3]).unwrap();
            assert_eq!(v.len(), 3);
            assert_eq!(v.value::<i64>(1), 2);
            assert!(!v.has_nulls());
        }

        #[test]
        fn test_from_values_kind_mismatch() {
            assert!(FlatVector::from_values(Type::Int8, vec![true, false]).is_err());
        }

        #[test]
        fn test_from_options() {
            let v = FlatVector::from_options(Type::Int8, vec![Some(1i64), None, Some(3)]).unwrap();
            assert!(!v.is_null(0));
            assert!(v.is_null(1));
            assert_eq!(v.value::<i64>(2), 3);
        }

        #[test]
        fn test_decimal_storage() {
            let ty = Type::decimal(10, 2).unwrap();
            let v = FlatVector::from_values(ty, vec![12345i64]).unwrap();
            assert_eq!(v.value::<i64>(0), 12345);
        }
    }

    mod nulls {
        use crate::value::Type;
        use crate::vector::FlatVector;

        #[test]
        fn test_set_null_allocates_bitmap() {
            let mut v = FlatVector::with_size(Type::Bool, 4);
            assert!(!v.has_nulls());
            v.set_null(2, true);
            assert!(v.is_null(2));
            assert!(!v.is_null(1));
        }

        #[test]
        fn test_set_null_false_without_bitmap() {
            let mut v = FlatVector::with_size(Type::Bool, 4);
            v.set_null(2, false);
            assert!(!v.has_nulls());
        }
    }

    mod scalar {
        use crate::value::{Type, Value};
        use crate::vector::FlatVector;

        #[test]
        fn test_roundtrip() {
            let mut v = FlatVector::with_size(Type::Int8, 2);
            v.set_scalar(0, Value::Int8(7));
            v.set_scalar(1, Value::Undefined);
            assert_eq!(v.scalar(0), Value::Int8(7));
            assert_eq!(v.scalar(1), Value::Undefined);
        }

        #[test]
        fn test_set_scalar_clears_null() {
            let mut v = FlatVector::with_size(Type::Int8, 1);
            v.set_null(0, true);
            v.set_scalar(0, Value::Int8(5));
            assert!(!v.is_null(0));
        }

        #[test]
        fn test_decimal_scalar() {
            let ty = Type::decimal(10, 2).unwrap();
            let mut v = FlatVector::with_size(ty, 1);
            v.set_scalar(0, Value::Decimal(123));
            assert_eq!(v.scalar(0), Value::Decimal(123));
        }
    }
}
