// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use super::Diagnostic;
use std::fmt::Write;

/// Renders a diagnostic into the canonical single-block text form.
pub fn render_string(diagnostic: &Diagnostic) -> String {
    let mut out = String::new();
    let _ = write!(out, "[{}] {}", diagnostic.code, diagnostic.message);
    if let Some(label) = &diagnostic.label {
        let _ = write!(out, "\n  label: {}", label);
    }
    if let Some(help) = &diagnostic.help {
        let _ = write!(out, "\n  help: {}", help);
    }
    for note in &diagnostic.notes {
        let _ = write!(out, "\n  note: {}", note);
    }
    if let Some(cause) = &diagnostic.cause {
        let _ = write!(out, "\ncaused by: {}", render_string(cause));
    }
    out
}
