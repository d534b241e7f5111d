// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use crate::value::{Type, Value};
use serde::{Deserialize, Serialize};

/// A single scalar replicated over 'len' rows. An Undefined scalar is the
/// all-null constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantVector {
    ty: Type,
    value: Value,
    len: usize,
}

impl ConstantVector {
    pub fn new(ty: Type, value: Value, len: usize) -> Self {
        Self { ty, value, len }
    }

    pub fn vector_type(&self) -> Type {
        self.ty
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_null(&self) -> bool {
        self.value.is_undefined()
    }
}

#[cfg(test)]
mod tests {
    use crate::value::{Type, Value};
    use crate::vector::ConstantVector;

    #[test]
    fn test_constant() {
        let c = ConstantVector::new(Type::Int8, Value::Int8(3), 4);
        assert_eq!(c.len(), 4);
        assert!(!c.is_null());
        assert_eq!(c.value(), &Value::Int8(3));
    }

    #[test]
    fn test_null_constant() {
        let c = ConstantVector::new(Type::Int8, Value::Undefined, 4);
        assert!(c.is_null());
    }
}
