// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use super::Diagnostic;

pub fn decimal_overflow(unscaled: i128, from: (u8, u8), to: (u8, u8)) -> Diagnostic {
    Diagnostic {
        code: "DECIMAL_001".to_string(),
        message: "decimal rescale overflow".to_string(),
        label: Some(format!(
            "unscaled value {} of decimal({}, {}) does not fit decimal({}, {})",
            unscaled, from.0, from.1, to.0, to.1
        )),
        help: Some("widen the target precision or allow null on overflow".to_string()),
        notes: vec![],
        cause: None,
    }
}

pub fn unscaled_value_too_large(unscaled: i64, precision: u8) -> Diagnostic {
    Diagnostic {
        code: "DECIMAL_002".to_string(),
        message: "unscaled value too large for precision".to_string(),
        label: Some(format!(
            "|{}| reaches 10^{}, the smallest magnitude a decimal of precision {} cannot hold",
            unscaled, precision, precision
        )),
        help: Some("widen the target precision or allow null on overflow".to_string()),
        notes: vec![],
        cause: None,
    }
}

pub fn precision_out_of_range(precision: u8) -> Diagnostic {
    Diagnostic {
        code: "DECIMAL_003".to_string(),
        message: "decimal precision out of range".to_string(),
        label: Some(format!("precision {} exceeds the maximum of 38", precision)),
        help: Some("use a precision between 1 and 38".to_string()),
        notes: vec![],
        cause: None,
    }
}

pub fn scale_exceeds_precision(scale: u8, precision: u8) -> Diagnostic {
    Diagnostic {
        code: "DECIMAL_004".to_string(),
        message: "decimal scale exceeds precision".to_string(),
        label: Some(format!("scale {} is larger than precision {}", scale, precision)),
        help: Some("use a scale no larger than the precision".to_string()),
        notes: vec![],
        cause: None,
    }
}
