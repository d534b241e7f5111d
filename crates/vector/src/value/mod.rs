// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

pub mod decimal;
mod r#type;
mod value;

pub use decimal::{rescale_with_round_up, DecimalNative, POWERS_OF_TEN};
pub use r#type::{Physical, Precision, Scale, Type};
pub use value::Value;
