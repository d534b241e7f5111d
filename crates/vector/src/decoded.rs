// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use crate::error::diagnostic::internal::internal;
use crate::selection::Selection;
use crate::util::BitVec;
use crate::value::Value;
use crate::vector::{NativeType, Vector, VectorRef};

/// A view of a vector over a selection with dictionary indirection and lazy
/// loading resolved once. Accessors take source-row coordinates.
///
/// Instances are reusable: `decode` resets all prior state, so they can be
/// pooled and borrowed per call.
#[derive(Debug, Default, Clone)]
pub struct DecodedVector {
    base: Option<VectorRef>,
    // Source row -> base row; only meaningful for selected rows. Empty for
    // identity and constant mappings.
    indices: Vec<usize>,
    // Nulls contributed by dictionary wrappers, in source coordinates.
    wrapper_nulls: Option<BitVec>,
    constant: bool,
    identity: bool,
}

impl DecodedVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves 'vector' over 'rows'. Lazy columns are loaded; nested
    /// dictionary wrappers are composed into a single mapping.
    pub fn decode(&mut self, vector: &VectorRef, rows: &Selection) -> crate::Result<()> {
        self.base = None;
        self.indices.clear();
        self.wrapper_nulls = None;
        self.constant = false;
        self.identity = false;

        let mut current = vector.clone();
        let mut mapped = false;
        loop {
            let next = match &*current {
                Vector::Flat(_) => {
                    self.identity = !mapped;
                    self.base = Some(current.clone());
                    return Ok(());
                }
                Vector::Constant(_) => {
                    // Wrapper nulls accumulated on the way down still apply.
                    self.constant = true;
                    self.indices.clear();
                    self.base = Some(current.clone());
                    return Ok(());
                }
                Vector::Dictionary(dictionary) => {
                    let end = rows.end();
                    if !mapped {
                        self.indices.resize(end, 0);
                        let mut nulls = BitVec::repeat(end, false);
                        for row in rows.iter_selected() {
                            self.indices[row] = dictionary.indices()[row];
                            if dictionary.is_wrapper_null(row) {
                                nulls.set(row, true);
                            }
                        }
                        self.wrapper_nulls = if nulls.any() { Some(nulls) } else { None };
                        mapped = true;
                    } else {
                        let mut nulls =
                            self.wrapper_nulls.take().unwrap_or_else(|| BitVec::repeat(end, false));
                        for row in rows.iter_selected() {
                            if nulls.get(row) {
                                continue;
                            }
                            let inner = self.indices[row];
                            if dictionary.is_wrapper_null(inner) {
                                nulls.set(row, true);
                            } else {
                                self.indices[row] = dictionary.indices()[inner];
                            }
                        }
                        self.wrapper_nulls = if nulls.any() { Some(nulls) } else { None };
                    }
                    dictionary.base().clone()
                }
                Vector::Lazy(lazy) => lazy.load(rows)?,
            };
            current = next;
        }
    }

    /// True when source rows map one-to-one onto the base vector.
    pub fn is_identity_mapping(&self) -> bool {
        self.identity
    }

    /// True when every row resolves to the same single value.
    pub fn is_constant_mapping(&self) -> bool {
        self.constant
    }

    /// Base row backing source 'row'.
    pub fn index(&self, row: usize) -> usize {
        if self.constant {
            0
        } else if self.identity {
            row
        } else {
            self.indices[row]
        }
    }

    pub fn is_null(&self, row: usize) -> bool {
        if let Some(nulls) = &self.wrapper_nulls {
            if nulls.get(row) {
                return true;
            }
        }
        match self.base.as_deref() {
            Some(Vector::Flat(flat)) => flat.is_null(self.index(row)),
            Some(Vector::Constant(constant)) => constant.is_null(),
            _ => false,
        }
    }

    /// The native at source 'row'. The caller has validated the physical
    /// kind and non-nullness.
    pub fn value<T: NativeType>(&self, row: usize) -> T {
        match self.base.as_deref() {
            Some(Vector::Flat(flat)) => flat.value(self.index(row)),
            Some(Vector::Constant(constant)) => {
                let value = T::from_value(constant.value());
                debug_assert!(value.is_some(), "constant scalar kind mismatch");
                value.unwrap_or_else(|| unreachable!())
            }
            _ => unreachable!("decode() must be called first"),
        }
    }

    pub fn utf8(&self, row: usize) -> &str {
        match self.base.as_deref() {
            Some(Vector::Flat(flat)) => flat.utf8(self.index(row)),
            Some(Vector::Constant(constant)) => match constant.value() {
                Value::Utf8(text) => text.as_str(),
                _ => unreachable!("constant scalar kind mismatch"),
            },
            _ => unreachable!("decode() must be called first"),
        }
    }

    /// The resolved base vector (flat or constant).
    pub fn base(&self) -> crate::Result<&VectorRef> {
        self.base
            .as_ref()
            .ok_or_else(|| crate::error!(internal("decode() must be called first".to_string())))
    }
}
