// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use super::VectorRef;
use crate::util::{BitVec, CowVec};
use crate::value::Type;

/// Indices into a base vector plus optional wrapper-level nulls (bit set =
/// null). The logical type is the base's type; peeling strips this wrapper
/// off the inputs and re-applies it to the published result.
#[derive(Debug, Clone)]
pub struct DictionaryVector {
    ty: Type,
    indices: CowVec<usize>,
    nulls: Option<BitVec>,
    base: VectorRef,
}

impl DictionaryVector {
    pub fn new(indices: CowVec<usize>, nulls: Option<BitVec>, base: VectorRef) -> Self {
        debug_assert!(indices.iter().all(|&idx| idx < base.len()));
        if let Some(nulls) = &nulls {
            debug_assert_eq!(nulls.len(), indices.len());
        }
        Self { ty: base.vector_type(), indices, nulls, base }
    }

    pub fn vector_type(&self) -> Type {
        self.ty
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &CowVec<usize> {
        &self.indices
    }

    pub fn nulls(&self) -> Option<&BitVec> {
        self.nulls.as_ref()
    }

    pub fn base(&self) -> &VectorRef {
        &self.base
    }

    /// Null at the wrapper level only; base nulls are resolved by decoding.
    pub fn is_wrapper_null(&self, row: usize) -> bool {
        self.nulls.as_ref().map(|nulls| nulls.get(row)).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use crate::util::BitVec;
    use crate::value::Type;
    use crate::vector::{DictionaryVector, FlatVector, Vector};
    use std::sync::Arc;

    #[test]
    fn test_dictionary_over_flat() {
        let base = Arc::new(Vector::Flat(
            FlatVector::from_values(Type::Int8, vec![10i64, 20, 30]).unwrap(),
        ));
        let dict = DictionaryVector::new(vec![2usize, 0, 2, 1].into(), None, base);
        assert_eq!(dict.len(), 4);
        assert_eq!(dict.vector_type(), Type::Int8);
        assert_eq!(dict.indices().as_slice(), &[2, 0, 2, 1]);
    }

    #[test]
    fn test_wrapper_nulls() {
        let base = Arc::new(Vector::Flat(
            FlatVector::from_values(Type::Int8, vec![10i64, 20]).unwrap(),
        ));
        let nulls = BitVec::from([false, true]);
        let dict = DictionaryVector::new(vec![0usize, 1].into(), Some(nulls), base);
        assert!(!dict.is_wrapper_null(0));
        assert!(dict.is_wrapper_null(1));
    }
}
