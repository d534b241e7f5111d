// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use reifydb_vector::util::{BitVec, CowVec};
use reifydb_vector::{DictionaryVector, Encoding, Selection, Vector, VectorRef};
use std::sync::Arc;

/// The common wrapper stripped off a subexpression's inputs, kept so the
/// published result can be wrapped back into the caller's coordinates.
///
/// Peeling succeeds when every input carries the same dictionary mapping; the
/// subexpression then runs once per distinct base row instead of once per
/// outer row.
#[derive(Debug, Clone)]
pub struct PeeledEncoding {
    indices: CowVec<usize>,
    nulls: Option<BitVec>,
}

impl PeeledEncoding {
    /// Strips a shared dictionary wrapper off 'args'. Returns the handle, the
    /// inner vectors, and the translated inner selection, or None when the
    /// inputs do not share a peelable encoding.
    pub fn peel(
        args: &[VectorRef],
        rows: &Selection,
    ) -> Option<(Arc<PeeledEncoding>, Vec<VectorRef>, Selection)> {
        let mut inner = Vec::with_capacity(args.len());
        let mut shared: Option<&DictionaryVector> = None;
        for arg in args {
            let dictionary = arg.as_dictionary()?;
            if let Some(first) = shared {
                if dictionary.indices() != first.indices() || dictionary.nulls() != first.nulls() {
                    return None;
                }
            } else {
                shared = Some(dictionary);
            }
            inner.push(dictionary.base().clone());
        }
        let first = shared?;
        let peeled = Arc::new(PeeledEncoding {
            indices: first.indices().clone(),
            nulls: first.nulls().cloned(),
        });
        let base_size = first.base().len();
        let inner_rows = peeled.translate_rows(rows, base_size);
        Some((peeled, inner, inner_rows))
    }

    /// The kind of wrapper this peel re-applies.
    pub fn encoding(&self) -> Encoding {
        Encoding::Dictionary
    }

    /// Maps an outer selection onto the base rows it references. Rows that
    /// are null at the wrapper level reference no base row.
    pub fn translate_rows(&self, rows: &Selection, base_size: usize) -> Selection {
        let mut inner = Selection::empty(base_size);
        for row in rows.iter_selected() {
            let wrapper_null =
                self.nulls.as_ref().map(|nulls| nulls.get(row)).unwrap_or(false);
            if !wrapper_null {
                inner.select(self.indices[row]);
            }
        }
        inner.update_bounds();
        inner
    }

    /// Re-applies the peeled wrapper to a result computed on base rows.
    pub fn wrap(&self, inner: VectorRef) -> VectorRef {
        Arc::new(Vector::Dictionary(DictionaryVector::new(
            self.indices.clone(),
            self.nulls.clone(),
            inner,
        )))
    }
}
