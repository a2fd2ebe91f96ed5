//! Ten-digit phone number type used for shipping contacts.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input is empty after trimming.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input is not exactly ten ASCII digits.
    #[error("phone number must be exactly {expected} digits")]
    InvalidFormat {
        /// Required digit count.
        expected: usize,
    },
}

/// A phone number made of exactly ten digits.
///
/// No separators, country prefixes, or spaces are accepted; callers strip
/// surrounding whitespace only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Number of digits a valid phone number has.
    pub const DIGITS: usize = 10;

    /// Parse a `Phone` from user input.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::Empty`] for blank input and
    /// [`PhoneError::InvalidFormat`] for anything but ten ASCII digits.
    pub fn parse(input: &str) -> Result<Self, PhoneError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }
        if s.len() != Self::DIGITS || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PhoneError::InvalidFormat {
                expected: Self::DIGITS,
            });
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the digits as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ten_digits() {
        assert!(Phone::parse("0771234567").is_ok());
        assert!(Phone::parse(" 0771234567 ").is_ok());
    }

    #[test]
    fn test_parse_rejects_short_and_long() {
        let expected = Err(PhoneError::InvalidFormat { expected: 10 });
        assert_eq!(Phone::parse("12345"), expected);
        assert_eq!(Phone::parse("077123456789"), expected);
    }

    #[test]
    fn test_parse_rejects_separators() {
        assert!(Phone::parse("077-123-4567").is_err());
        assert!(Phone::parse("+947712345").is_err());
        assert!(Phone::parse("077123456٣").is_err());
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert_eq!(Phone::parse(""), Err(PhoneError::Empty));
    }
}
