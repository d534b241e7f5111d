// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use std::fmt::{Display, Formatter};

pub mod diagnostic;
mod r#macro;

use diagnostic::{render, Diagnostic};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub struct Error(pub Diagnostic);

impl Error {
    pub fn diagnostic(&self) -> &Diagnostic {
        &self.0
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        self.0
    }

    /// System failures carry an `INTERNAL` code; they are never captured
    /// per-row and must propagate to the top of the batch.
    pub fn is_internal(&self) -> bool {
        self.0.code.starts_with("INTERNAL")
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(render::render_string(&self.0).as_str())
    }
}

impl std::error::Error for Error {}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Error(Diagnostic {
            code: "GENERIC_001".to_string(),
            message,
            label: None,
            help: None,
            notes: vec![],
            cause: None,
        })
    }
}

impl From<&str> for Error {
    fn from(message: &str) -> Self {
        Error::from(message.to_string())
    }
}
