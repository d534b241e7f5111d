// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use super::VectorRef;
use crate::error::diagnostic::internal::internal;

/// The tuple of columns an expression tree is evaluated against. Borrowed by
/// the evaluation context for the duration of one evaluation.
#[derive(Debug, Clone)]
pub struct RowBatch {
    columns: Vec<VectorRef>,
    row_count: usize,
}

impl RowBatch {
    pub fn new(columns: Vec<VectorRef>) -> crate::Result<Self> {
        let row_count = columns.first().map(|column| column.len()).unwrap_or(0);
        for column in &columns {
            if column.len() != row_count {
                crate::return_error!(internal(format!(
                    "row batch columns disagree on row count: {} vs {}",
                    row_count,
                    column.len()
                )));
            }
        }
        Ok(Self { columns, row_count })
    }

    pub fn child(&self, index: usize) -> &VectorRef {
        &self.columns[index]
    }

    pub fn children(&self) -> &[VectorRef] {
        &self.columns
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }
}
