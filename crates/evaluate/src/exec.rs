// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use reifydb_vector::pool::{DecodedPool, MemoryPool, SelectionPool, VectorPool};
use reifydb_vector::{DecodedVector, Selection, Type, VectorRef};
use serde::{Deserialize, Serialize};

/// Per-query evaluation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecConfig {
    /// Enables result caching for shared subexpressions.
    pub cache_enabled: bool,
    /// Maximum number of distinct inputs to cache results for in a given
    /// shared subexpression.
    pub max_shared_subexpr_results_cached: u32,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self { cache_enabled: true, max_shared_subexpr_results_cached: 10 }
    }
}

/// Query-level execution state: the memory arena and the recycling pools
/// every evaluation on this thread draws from. One instance per thread;
/// nothing here is shared across threads.
#[derive(Debug, Default)]
pub struct ExecCtx {
    pool: MemoryPool,
    vector_pool: VectorPool,
    selection_pool: SelectionPool,
    decoded_pool: DecodedPool,
    config: ExecConfig,
}

impl ExecCtx {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExecConfig) -> Self {
        Self { config, ..Self::default() }
    }

    pub fn pool(&self) -> &MemoryPool {
        &self.pool
    }

    pub fn vector_pool(&self) -> &VectorPool {
        &self.vector_pool
    }

    pub fn selection_pool(&self) -> &SelectionPool {
        &self.selection_pool
    }

    pub fn get_vector(&self, ty: Type, size: usize) -> VectorRef {
        self.vector_pool.get(ty, size)
    }

    pub fn release_vector(&self, vector: VectorRef) -> bool {
        self.vector_pool.release(vector)
    }

    pub fn release_vectors(&self, vectors: &mut Vec<VectorRef>) -> usize {
        self.vector_pool.release_all(vectors)
    }

    pub fn get_selection(&self, size: usize) -> Selection {
        self.selection_pool.get(size)
    }

    pub fn release_selection(&self, selection: Selection) {
        self.selection_pool.release(selection)
    }

    pub fn get_decoded(&self) -> DecodedVector {
        self.decoded_pool.get()
    }

    pub fn release_decoded(&self, decoded: DecodedVector) {
        self.decoded_pool.release(decoded)
    }

    pub fn cache_enabled(&self) -> bool {
        self.config.cache_enabled
    }

    pub fn max_shared_subexpr_results_cached(&self) -> u32 {
        self.config.max_shared_subexpr_results_cached
    }
}

/// Handle to the compiled expression set an evaluation runs against. The
/// expression compiler and dispatcher own its contents; the evaluation
/// context only threads the borrow through to kernels and drivers.
#[derive(Debug, Default)]
pub struct ExprSet {
    _private: (),
}

impl ExprSet {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::{ExecConfig, ExecCtx};
    use reifydb_vector::Type;

    #[test]
    fn test_defaults() {
        let exec = ExecCtx::new();
        assert!(exec.cache_enabled());
        assert_eq!(exec.max_shared_subexpr_results_cached(), 10);
    }

    #[test]
    fn test_with_config() {
        let exec = ExecCtx::with_config(ExecConfig {
            cache_enabled: false,
            max_shared_subexpr_results_cached: 3,
        });
        assert!(!exec.cache_enabled());
        assert_eq!(exec.max_shared_subexpr_results_cached(), 3);
    }

    #[test]
    fn test_vector_roundtrip() {
        let exec = ExecCtx::new();
        let vector = exec.get_vector(Type::Bool, 4);
        assert!(exec.release_vector(vector));
        let _reused = exec.get_vector(Type::Bool, 4);
        assert_eq!(exec.vector_pool().stats().hits, 1);
    }
}
