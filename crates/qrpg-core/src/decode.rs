//! Measurement outcome → password character.
//!
//! Each 5-bit outcome is read as an unsigned integer `v` (most significant
//! bit first). Its last two bits select an offset:
//!
//! | tag (`v & 0b11`) | code | correction |
//! |------------------|------|------------|
//! | 1 | `v + 32` | 32 becomes 33 |
//! | 3 | `v + 96` | 127 becomes 126 |
//! | 0, 2 | `v + 64` | none |
//!
//! Every code lands in printable ASCII, 33..=126.

use qrpg_hal::Counts;
use qrpg_ir::PASSWORD_QUBITS;
use thiserror::Error;

use crate::password::{Password, PasswordLength};

/// Width of an outcome string.
pub const OUTCOME_BITS: usize = PASSWORD_QUBITS as usize;

/// Errors decoding measurement outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Outcome string has the wrong number of bits.
    #[error("Outcome '{outcome}' has {got} bits, expected {expected}")]
    WrongWidth {
        outcome: String,
        expected: usize,
        got: usize,
    },

    /// Outcome string contains something other than `0` and `1`.
    #[error("Outcome '{0}' is not a bitstring")]
    NotBinary(String),
}

/// Character code for an outcome value in `0..32`.
pub fn decode_value(value: u8) -> u8 {
    let value = value & 0b1_1111;
    match value & 0b11 {
        1 => match value + 32 {
            32 => 33,
            code => code,
        },
        3 => match value + 96 {
            127 => 126,
            code => code,
        },
        _ => value + 64,
    }
}

/// Integer value of a 5-bit outcome string.
pub fn outcome_value(outcome: &str) -> Result<u8, DecodeError> {
    if outcome.len() != OUTCOME_BITS {
        return Err(DecodeError::WrongWidth {
            outcome: outcome.to_string(),
            expected: OUTCOME_BITS,
            got: outcome.chars().count(),
        });
    }

    outcome.bytes().try_fold(0u8, |acc, bit| match bit {
        b'0' => Ok(acc << 1),
        b'1' => Ok((acc << 1) | 1),
        _ => Err(DecodeError::NotBinary(outcome.to_string())),
    })
}

/// Decode one outcome string into its password character.
pub fn decode_outcome(outcome: &str) -> Result<char, DecodeError> {
    outcome_value(outcome).map(|value| char::from(decode_value(value)))
}

/// Decode a whole histogram: one character per shot, outcomes in map order.
pub fn decode_counts(counts: &Counts) -> Result<Password, DecodeError> {
    let capacity = counts
        .total_shots()
        .and_then(|total| usize::try_from(total).ok())
        .unwrap_or(0)
        .min(PasswordLength::MAX as usize);
    let mut password = String::with_capacity(capacity);
    for (outcome, count) in counts.iter() {
        let ch = decode_outcome(outcome)?;
        for _ in 0..count {
            password.push(ch);
        }
    }
    Ok(Password::new(password))
}
