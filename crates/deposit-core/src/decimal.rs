//! # Decimal Codec
//!
//! Conversions between user-facing decimal strings and exact integer
//! amounts scaled by a token's fractional-digit count. All arithmetic is
//! arbitrary precision; display strings never go through floats.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::errors::{CoreResult, DepositError};

/// Count the digits after the decimal separator.
///
/// Strings without a separator, including the empty string, have scale 0.
pub fn scale_of(s: &str) -> usize {
    match s.split_once('.') {
        Some((_, frac)) => frac.len(),
        None => 0,
    }
}

/// Parse a decimal string into an integer equal to value * 10^decimals.
///
/// Fractional digits are padded to exactly `decimals` places. The empty
/// string parses to zero (a pristine input field drives nothing). Fails
/// when the string carries more fractional digits than `decimals`, or
/// contains anything but digits and a single separator.
pub fn to_integer(s: &str, decimals: u8) -> CoreResult<BigUint> {
    let (int_part, frac_part) = match s.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (s, ""),
    };

    if frac_part.len() > decimals as usize {
        return Err(DepositError::ScaleExceedsPrecision {
            scale: frac_part.len(),
            decimals,
        });
    }

    if !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(DepositError::MalformedAmount(s.to_string()));
    }

    let mut digits = String::with_capacity(int_part.len() + decimals as usize);
    digits.push_str(int_part);
    digits.push_str(frac_part);
    for _ in frac_part.len()..decimals as usize {
        digits.push('0');
    }

    if digits.is_empty() {
        return Ok(BigUint::zero());
    }

    BigUint::parse_bytes(digits.as_bytes(), 10)
        .ok_or_else(|| DepositError::MalformedAmount(s.to_string()))
}

/// Format a scaled integer back into a display string.
///
/// Trailing fractional zeros are trimmed; a fraction that trims away
/// entirely leaves the bare integer part. Round-trips with [`to_integer`]
/// for any value it can produce.
pub fn to_display(value: &BigUint, decimals: u8) -> String {
    let raw = value.to_string();
    let decimals = decimals as usize;

    let (int_part, frac_part) = if raw.len() <= decimals {
        ("0".to_string(), format!("{:0>width$}", raw, width = decimals))
    } else {
        let split = raw.len() - decimals;
        (raw[..split].to_string(), raw[split..].to_string())
    };

    let frac = frac_part.trim_end_matches('0');
    if frac.is_empty() {
        int_part
    } else {
        format!("{}.{}", int_part, frac)
    }
}
