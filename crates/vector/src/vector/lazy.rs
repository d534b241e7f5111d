// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use super::VectorRef;
use crate::selection::Selection;
use crate::value::Type;
use std::fmt;
use std::sync::{Arc, OnceLock};

pub type VectorLoader = dyn Fn(&Selection) -> crate::Result<VectorRef> + Send + Sync;

/// Deferred materialisation: the loader runs at most once, driven
/// synchronously by the first caller that needs the column.
pub struct LazyVector {
    ty: Type,
    len: usize,
    loader: Arc<VectorLoader>,
    loaded: OnceLock<VectorRef>,
}

impl LazyVector {
    pub fn new(ty: Type, len: usize, loader: Arc<VectorLoader>) -> Self {
        Self { ty, len, loader, loaded: OnceLock::new() }
    }

    pub fn vector_type(&self) -> Type {
        self.ty
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    pub fn loaded(&self) -> Option<&VectorRef> {
        self.loaded.get()
    }

    /// Materialises the column over 'rows'. The first load wins; later calls
    /// return the cached vector regardless of their selection.
    pub fn load(&self, rows: &Selection) -> crate::Result<VectorRef> {
        if let Some(vector) = self.loaded.get() {
            return Ok(vector.clone());
        }
        let vector = (self.loader)(rows)?;
        let _ = self.loaded.set(vector.clone());
        Ok(vector)
    }
}

impl Clone for LazyVector {
    fn clone(&self) -> Self {
        let loaded = OnceLock::new();
        if let Some(vector) = self.loaded.get() {
            let _ = loaded.set(vector.clone());
        }
        Self { ty: self.ty, len: self.len, loader: self.loader.clone(), loaded }
    }
}

impl fmt::Debug for LazyVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyVector")
            .field("ty", &self.ty)
            .field("len", &self.len)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
