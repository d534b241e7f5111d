// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Vectorized expression evaluation core: the evaluation context that
//! threads a row batch, peeled encodings, the final-selection invariant and
//! a per-row error set through nested sub-evaluations, plus the scoped state
//! and scratch handles that keep save/restore and pooling correct on every
//! exit path.

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod context;
mod errors;
mod exec;
mod local;
mod peel;
mod scoped;

pub mod function;

pub use context::{with_context_saver, ContextSaver, EvalContext};
pub use errors::EvalErrors;
pub use exec::{ExecConfig, ExecCtx, ExprSet};
pub use local::{LocalDecoded, LocalSelection, LocalSingleRow};
pub use peel::PeeledEncoding;
pub use reifydb_vector::{Error, Result};
pub use scoped::ScopedFinalSelectionSetter;
