// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Recycling pools for the allocation-heavy evaluation objects: result
//! vectors, selections and decoded views. All pools are bounded free-lists
//! with interior mutability; the evaluation is single-threaded by contract.

use crate::decoded::DecodedVector;
use crate::selection::Selection;
use crate::value::Type;
use crate::vector::{FlatVector, Vector, VectorRef};
use std::cell::{Cell, RefCell};
use std::sync::Arc;
use tracing::trace;

/// Upper bound of retained instances per pool.
const MAX_POOLED: usize = 64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub hits: usize,
    pub misses: usize,
}

/// Recycles flat result vectors. A recycled vector is reused when its
/// physical kind matches the requested type; the logical type is rewritten.
#[derive(Debug, Default)]
pub struct VectorPool {
    free: RefCell<Vec<FlatVector>>,
    stats: Cell<PoolStats>,
}

impl VectorPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, ty: Type, size: usize) -> VectorRef {
        let mut free = self.free.borrow_mut();
        let physical = ty.physical();
        if let Some(pos) = free.iter().position(|vector| vector.data().physical() == physical) {
            let mut flat = free.swap_remove(pos);
            drop(free);
            self.bump(true);
            flat.set_type(ty);
            flat.clear_nulls();
            flat.resize(size);
            return Arc::new(Vector::Flat(flat));
        }
        drop(free);
        self.bump(false);
        Arc::new(Vector::Flat(FlatVector::with_size(ty, size)))
    }

    /// Returns true if the vector was moved into the pool. Shared or
    /// non-flat vectors are simply dropped.
    pub fn release(&self, vector: VectorRef) -> bool {
        match Arc::try_unwrap(vector) {
            Ok(Vector::Flat(flat)) => {
                let mut free = self.free.borrow_mut();
                if free.len() < MAX_POOLED {
                    free.push(flat);
                    return true;
                }
                false
            }
            _ => false,
        }
    }

    /// Releases a batch; returns how many were retained.
    pub fn release_all(&self, vectors: &mut Vec<VectorRef>) -> usize {
        vectors.drain(..).map(|vector| self.release(vector)).filter(|&kept| kept).count()
    }

    pub fn stats(&self) -> PoolStats {
        self.stats.get()
    }

    fn bump(&self, hit: bool) {
        let mut stats = self.stats.get();
        if hit {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        self.stats.set(stats);
        trace!(hit, "vector pool acquire");
    }
}

/// Recycles [`Selection`] instances.
#[derive(Debug, Default)]
pub struct SelectionPool {
    free: RefCell<Vec<Selection>>,
    stats: Cell<PoolStats>,
}

impl SelectionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// A selection of 'size' rows, all selected.
    pub fn get(&self, size: usize) -> Selection {
        let recycled = self.free.borrow_mut().pop();
        let mut stats = self.stats.get();
        match recycled {
            Some(mut selection) => {
                stats.hits += 1;
                self.stats.set(stats);
                selection.resize_fill(size, true);
                selection
            }
            None => {
                stats.misses += 1;
                self.stats.set(stats);
                Selection::with_all(size)
            }
        }
    }

    pub fn release(&self, selection: Selection) {
        let mut free = self.free.borrow_mut();
        if free.len() < MAX_POOLED {
            free.push(selection);
        }
    }

    pub fn stats(&self) -> PoolStats {
        self.stats.get()
    }
}

/// Recycles [`DecodedVector`] instances.
#[derive(Debug, Default)]
pub struct DecodedPool {
    free: RefCell<Vec<DecodedVector>>,
}

impl DecodedPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> DecodedVector {
        self.free.borrow_mut().pop().unwrap_or_default()
    }

    pub fn release(&self, decoded: DecodedVector) {
        let mut free = self.free.borrow_mut();
        if free.len() < MAX_POOLED {
            free.push(decoded);
        }
    }
}

/// Byte accounting stand-in for the query memory arena.
#[derive(Debug, Default)]
pub struct MemoryPool {
    allocated: Cell<usize>,
}

impl MemoryPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserve(&self, bytes: usize) {
        self.allocated.set(self.allocated.get() + bytes);
    }

    pub fn free(&self, bytes: usize) {
        self.allocated.set(self.allocated.get().saturating_sub(bytes));
    }

    pub fn allocated(&self) -> usize {
        self.allocated.get()
    }
}

#[cfg(test)]
mod tests {
    mod vector_pool {
        use crate::pool::VectorPool;
        use crate::value::Type;

        #[test]
        fn test_miss_then_hit() {
            let pool = VectorPool::new();
            let vector = pool.get(Type::Int8, 4);
            assert_eq!(pool.stats().misses, 1);

            assert!(pool.release(vector));
            let reused = pool.get(Type::Int8, 8);
            assert_eq!(pool.stats().hits, 1);
            assert_eq!(reused.len(), 8);
        }

        #[test]
        fn test_reuse_rewrites_logical_type() {
            let pool = VectorPool::new();
            let vector = pool.get(Type::Int8, 2);
            pool.release(vector);

            let decimal = Type::decimal(10, 2).unwrap();
            let reused = pool.get(decimal, 2);
            assert_eq!(reused.vector_type(), decimal, "same physical kind, new logical type");
        }

        #[test]
        fn test_release_shared_is_dropped() {
            let pool = VectorPool::new();
            let vector = pool.get(Type::Int8, 2);
            let retained = vector.clone();
            assert!(!pool.release(vector));
            drop(retained);
        }

        #[test]
        fn test_reuse_clears_nulls() {
            let pool = VectorPool::new();
            let mut vector = pool.get(Type::Int8, 2);
            std::sync::Arc::get_mut(&mut vector)
                .unwrap()
                .as_flat_mut()
                .unwrap()
                .set_null(1, true);
            pool.release(vector);

            let reused = pool.get(Type::Int8, 2);
            assert!(!reused.as_flat().unwrap().has_nulls());
        }
    }

    mod selection_pool {
        use crate::pool::SelectionPool;

        #[test]
        fn test_recycles() {
            let pool = SelectionPool::new();
            let mut selection = pool.get(4);
            selection.deselect(0);
            selection.update_bounds();
            pool.release(selection);

            let fresh = pool.get(6);
            assert_eq!(fresh.size(), 6);
            assert_eq!(fresh.count(), 6, "recycled selection must come back fully selected");
            assert_eq!(pool.stats().hits, 1);
        }
    }

    mod memory_pool {
        use crate::pool::MemoryPool;

        #[test]
        fn test_accounting() {
            let pool = MemoryPool::new();
            pool.reserve(128);
            pool.reserve(64);
            pool.free(100);
            assert_eq!(pool.allocated(), 92);
        }
    }
}
