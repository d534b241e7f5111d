// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use super::Diagnostic;
use crate::value::Type;

pub fn type_mismatch(expected: Type, found: Type) -> Diagnostic {
    Diagnostic {
        code: "EVALUATE_001".to_string(),
        message: "vector type mismatch".to_string(),
        label: Some(format!("expected {}, found {}", expected, found)),
        help: None,
        notes: vec![],
        cause: None,
    }
}

pub fn argument_count_mismatch(expected: usize, found: usize) -> Diagnostic {
    Diagnostic {
        code: "EVALUATE_002".to_string(),
        message: "argument count mismatch".to_string(),
        label: Some(format!("kernel expects {} arguments, got {}", expected, found)),
        help: None,
        notes: vec![],
        cause: None,
    }
}

pub fn constant_argument_required(index: usize) -> Diagnostic {
    Diagnostic {
        code: "EVALUATE_003".to_string(),
        message: "constant argument required".to_string(),
        label: Some(format!("argument {} must resolve to a constant", index)),
        help: None,
        notes: vec![],
        cause: None,
    }
}

pub fn lazy_load_failed(column: usize, cause: Diagnostic) -> Diagnostic {
    Diagnostic {
        code: "EVALUATE_004".to_string(),
        message: "lazy column load failed".to_string(),
        label: Some(format!("column {}", column)),
        help: None,
        notes: vec![],
        cause: Some(Box::new(cause)),
    }
}

pub fn decimal_argument_required(index: usize, found: Type) -> Diagnostic {
    Diagnostic {
        code: "EVALUATE_006".to_string(),
        message: "decimal argument required".to_string(),
        label: Some(format!("argument {} has type {}", index, found)),
        help: None,
        notes: vec![],
        cause: None,
    }
}

pub fn short_decimal_required(found: Type) -> Diagnostic {
    Diagnostic {
        code: "EVALUATE_007".to_string(),
        message: "short decimal input required".to_string(),
        label: Some(format!("found {}", found)),
        help: Some("unscaled value extraction only applies to 64-bit decimals".to_string()),
        notes: vec![],
        cause: None,
    }
}

pub fn unsupported_comparison_type(ty: Type) -> Diagnostic {
    Diagnostic {
        code: "EVALUATE_005".to_string(),
        message: "comparison not supported for type".to_string(),
        label: Some(format!("type {}", ty)),
        help: None,
        notes: vec![],
        cause: None,
    }
}
