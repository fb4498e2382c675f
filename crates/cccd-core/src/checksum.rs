//! # Checksum Codec
//!
//! Weighted-sum check digit over the first 11 digits of an identifier.
//! Weights alternate 1, 3 starting from the leftmost digit; the check digit
//! is `(10 - sum mod 10) mod 10`.
//!
//! ## Sensitivity
//!
//! Both weights are units modulo 10, so multiplying any non-zero digit
//! delta by either weight leaves a non-zero residue. Every single-digit
//! substitution, at any of the 12 positions including the check digit
//! itself, therefore breaks verification. Adjacent transpositions are not
//! always caught: swapping `a` and `b` shifts the sum by `2 * (b - a)`,
//! which vanishes mod 10 whenever the two digits differ by 5.

use crate::error::CccdError;

/// Digit weights, leftmost first.
pub const WEIGHTS: [u32; 11] = [1, 3, 1, 3, 1, 3, 1, 3, 1, 3, 1];

/// Number of digits the check digit is computed over.
pub const BODY_LEN: usize = 11;

/// Compute the check digit for an 11-digit body.
///
/// # Errors
///
/// Returns [`CccdError::MalformedInput`] unless `body` is exactly 11 ASCII
/// digits.
pub fn compute_check_digit(body: &str) -> Result<u8, CccdError> {
    if body.len() != BODY_LEN {
        return Err(CccdError::MalformedInput {
            reason: format!("expected {BODY_LEN} digits, got {} characters", body.len()),
        });
    }
    if !body.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CccdError::MalformedInput {
            reason: format!("non-digit character in \"{body}\""),
        });
    }
    Ok(check_digit_of(body.as_bytes()))
}

/// Return `true` iff `identifier` is 12 ASCII digits whose last digit
/// matches the check digit of the first 11. Never fails.
pub fn verify(identifier: &str) -> bool {
    let bytes = identifier.as_bytes();
    if bytes.len() != BODY_LEN + 1 || !bytes.iter().all(u8::is_ascii_digit) {
        return false;
    }
    check_digit_of(&bytes[..BODY_LEN]) == bytes[BODY_LEN] - b'0'
}

/// Caller guarantees `digits` is exactly 11 ASCII digits.
fn check_digit_of(digits: &[u8]) -> u8 {
    let sum: u32 = digits
        .iter()
        .zip(WEIGHTS)
        .map(|(d, w)| u32::from(d - b'0') * w)
        .sum();
    ((10 - sum % 10) % 10) as u8
}
