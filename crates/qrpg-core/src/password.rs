//! Password and password-length types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GeneratorError, GeneratorResult};

/// A generated password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    pub(crate) fn new(password: String) -> Self {
        Self(password)
    }

    /// The password text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    /// Whether the password is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Requested password length: even, between 4 and 12.
///
/// One shot is taken per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PasswordLength(u32);

impl PasswordLength {
    /// Shortest length.
    pub const MIN: u32 = 4;
    /// Longest length.
    pub const MAX: u32 = 12;
    /// Spacing between allowed lengths.
    pub const STEP: u32 = 2;
    /// Length used when none is given.
    pub const DEFAULT: u32 = 8;

    /// Validate a length.
    pub fn new(length: u32) -> GeneratorResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&length) && (length - Self::MIN) % Self::STEP == 0 {
            Ok(Self(length))
        } else {
            Err(GeneratorError::InvalidLength { length })
        }
    }

    /// The length as a number.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Shots to request from the backend.
    pub fn shots(self) -> u32 {
        self.0
    }

    /// Every allowed length, shortest first.
    pub fn choices() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX)
            .step_by(Self::STEP as usize)
            .map(Self)
    }
}

impl Default for PasswordLength {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u32> for PasswordLength {
    type Error = GeneratorError;

    fn try_from(length: u32) -> Result<Self, Self::Error> {
        Self::new(length)
    }
}

impl From<PasswordLength> for u32 {
    fn from(length: PasswordLength) -> Self {
        length.0
    }
}

impl fmt::Display for PasswordLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_lengths() {
        let all: Vec<u32> = PasswordLength::choices().map(PasswordLength::get).collect();
        assert_eq!(all, vec![4, 6, 8, 10, 12]);
        for length in all {
            assert_eq!(PasswordLength::new(length).unwrap().shots(), length);
        }
    }

    #[test]
    fn test_invalid_lengths() {
        for length in [0, 2, 3, 5, 7, 11, 13, 14, 100] {
            assert!(matches!(
                PasswordLength::new(length),
                Err(GeneratorError::InvalidLength { length: l }) if l == length
            ));
        }
    }

    #[test]
    fn test_default_length() {
        assert_eq!(PasswordLength::default().get(), 8);
    }

    #[test]
    fn test_length_deserialization_validates() {
        let ok: PasswordLength = serde_json::from_str("10").unwrap();
        assert_eq!(ok.get(), 10);
        assert!(serde_json::from_str::<PasswordLength>("9").is_err());
    }

    #[test]
    fn test_password_display() {
        let password = Password::new("@@c".into());
        assert_eq!(password.to_string(), "@@c");
        assert_eq!(password.len(), 3);
        assert!(!password.is_empty());
    }
}
