// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Diagnostic error modules for the vector and evaluation layers.

use serde::{Deserialize, Serialize};

pub mod decimal;
pub mod evaluate;
pub mod internal;
pub mod render;

/// Structured description of a failure. Wrapped into [`crate::Error`] by the
/// `error!` family of macros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: String,
    pub message: String,
    pub label: Option<String>,
    pub help: Option<String>,
    pub notes: Vec<String>,
    pub cause: Option<Box<Diagnostic>>,
}
