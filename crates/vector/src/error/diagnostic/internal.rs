// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use super::Diagnostic;

/// Invariant violations inside the engine. Never captured per-row; the
/// evaluation of the whole batch aborts with these.
pub fn internal(message: String) -> Diagnostic {
    Diagnostic {
        code: "INTERNAL_001".to_string(),
        message,
        label: None,
        help: Some("this is a bug, please report it".to_string()),
        notes: vec![],
        cause: None,
    }
}

pub fn error_detail_missing(index: usize) -> Diagnostic {
    Diagnostic {
        code: "INTERNAL_002".to_string(),
        message: "error recorded without detail".to_string(),
        label: Some(format!(
            "row {} has an error but no captured failure; the recording context disabled \
             capture_error_details",
            index
        )),
        help: Some("record errors with capture_error_details enabled before rethrowing".to_string()),
        notes: vec![],
        cause: None,
    }
}
