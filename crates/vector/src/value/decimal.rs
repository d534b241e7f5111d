// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Rescaling of unscaled decimal integers between (precision, scale) pairs.

/// 10^0 through 10^38. Index 38 is the overflow bound of a precision-38
/// decimal and still fits in i128.
pub const POWERS_OF_TEN: [i128; 39] = {
    let mut table = [1i128; 39];
    let mut i = 1;
    while i < 39 {
        table[i] = table[i - 1] * 10;
        i += 1;
    }
    table
};

/// Physical carrier of an unscaled decimal value.
pub trait DecimalNative: Copy {
    fn to_i128(self) -> i128;
    fn from_i128(value: i128) -> Option<Self>;
}

impl DecimalNative for i64 {
    fn to_i128(self) -> i128 {
        self as i128
    }

    fn from_i128(value: i128) -> Option<Self> {
        i64::try_from(value).ok()
    }
}

impl DecimalNative for i128 {
    fn to_i128(self) -> i128 {
        self
    }

    fn from_i128(value: i128) -> Option<Self> {
        Some(value)
    }
}

/// Rescales `value` from `(from_precision, from_scale)` to
/// `(to_precision, to_scale)` with half-up rounding. Returns None when the
/// rescaled magnitude reaches 10^to_precision or does not fit the output
/// carrier.
pub fn rescale_with_round_up<I, O>(value: I, from: (u8, u8), to: (u8, u8)) -> Option<O>
where
    I: DecimalNative,
    O: DecimalNative,
{
    let (_, from_scale) = from;
    let (to_precision, to_scale) = to;
    let input = value.to_i128();

    let rescaled = if to_scale >= from_scale {
        let factor = POWERS_OF_TEN[(to_scale - from_scale) as usize];
        input.checked_mul(factor)?
    } else {
        let factor = POWERS_OF_TEN[(from_scale - to_scale) as usize];
        let mut quotient = input / factor;
        let remainder = input % factor;
        // Half-up: a remainder of at least half the factor rounds away from
        // zero, for both signs.
        if remainder >= factor / 2 {
            quotient += 1;
        } else if remainder <= -(factor / 2) {
            quotient -= 1;
        }
        quotient
    };

    let bound = POWERS_OF_TEN[to_precision as usize];
    if rescaled <= -bound || rescaled >= bound {
        return None;
    }
    O::from_i128(rescaled)
}
