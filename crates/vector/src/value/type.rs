// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use crate::error::diagnostic::decimal::{precision_out_of_range, scale_exceeds_precision};
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Total number of digits of a decimal type. At most 38.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Precision(u8);

impl Precision {
    pub const MAX: u8 = 38;

    pub fn new(value: u8) -> Self {
        debug_assert!(value >= 1 && value <= Self::MAX);
        Self(value)
    }

    pub fn try_new(value: u8) -> crate::Result<Self> {
        if value < 1 || value > Self::MAX {
            return Err(Error(precision_out_of_range(value)));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

/// Number of fractional digits of a decimal type. At most the precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Scale(u8);

impl Scale {
    pub fn new(value: u8) -> Self {
        Self(value)
    }

    pub fn try_new_with_precision(value: u8, precision: Precision) -> crate::Result<Self> {
        if value > precision.value() {
            return Err(Error(scale_exceeds_precision(value, precision.value())));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

/// Logical type of a vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Bool,
    Int1,
    Int2,
    Int4,
    Int8,
    Int16,
    Float4,
    Float8,
    Utf8,
    Decimal { precision: Precision, scale: Scale },
}

/// Physical representation backing a flat vector of a given logical type.
/// Decimals are stored as their unscaled integers: 64-bit up to precision 18
/// (short decimal), 128-bit beyond (long decimal).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Physical {
    Bool,
    Int1,
    Int2,
    Int4,
    Int8,
    Int16,
    Float4,
    Float8,
    Utf8,
}

impl Type {
    pub fn decimal(precision: u8, scale: u8) -> crate::Result<Self> {
        let precision = Precision::try_new(precision)?;
        let scale = Scale::try_new_with_precision(scale, precision)?;
        Ok(Type::Decimal { precision, scale })
    }

    pub fn is_decimal(&self) -> bool {
        matches!(self, Type::Decimal { .. })
    }

    pub fn is_short_decimal(&self) -> bool {
        matches!(self, Type::Decimal { precision, .. } if precision.value() <= 18)
    }

    pub fn is_long_decimal(&self) -> bool {
        matches!(self, Type::Decimal { precision, .. } if precision.value() > 18)
    }

    /// Precision and scale of a decimal type; None otherwise.
    pub fn precision_scale(&self) -> Option<(u8, u8)> {
        match self {
            Type::Decimal { precision, scale } => Some((precision.value(), scale.value())),
            _ => None,
        }
    }

    pub fn physical(&self) -> Physical {
        match self {
            Type::Bool => Physical::Bool,
            Type::Int1 => Physical::Int1,
            Type::Int2 => Physical::Int2,
            Type::Int4 => Physical::Int4,
            Type::Int8 => Physical::Int8,
            Type::Int16 => Physical::Int16,
            Type::Float4 => Physical::Float4,
            Type::Float8 => Physical::Float8,
            Type::Utf8 => Physical::Utf8,
            Type::Decimal { .. } => {
                if self.is_short_decimal() {
                    Physical::Int8
                } else {
                    Physical::Int16
                }
            }
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Bool => write!(f, "Bool"),
            Type::Int1 => write!(f, "Int1"),
            Type::Int2 => write!(f, "Int2"),
            Type::Int4 => write!(f, "Int4"),
            Type::Int8 => write!(f, "Int8"),
            Type::Int16 => write!(f, "Int16"),
            Type::Float4 => write!(f, "Float4"),
            Type::Float8 => write!(f, "Float8"),
            Type::Utf8 => write!(f, "Utf8"),
            Type::Decimal { precision, scale } => {
                write!(f, "Decimal({}, {})", precision.value(), scale.value())
            }
        }
    }
}
