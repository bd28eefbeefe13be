//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input has the wrong number of characters.
    #[error("phone number must be exactly {expected} digits")]
    WrongLength {
        /// Required number of digits.
        expected: usize,
    },
    /// The input contains something other than ASCII digits.
    #[error("phone number must contain only digits")]
    NonDigit,
}

/// A ten-digit mobile number used for delivery contact.
///
/// ## Constraints
///
/// - Exactly 10 characters
/// - ASCII digits only (no spaces, dashes or country prefix)
///
/// ## Examples
///
/// ```
/// use bakehouse_core::Phone;
///
/// assert!(Phone::parse("9876543210").is_ok());
///
/// assert!(Phone::parse("").is_err());            // empty
/// assert!(Phone::parse("98765").is_err());       // too short
/// assert!(Phone::parse("98765-4321").is_err());  // non-digit
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Required number of digits.
    pub const LENGTH: usize = 10;

    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, is not exactly 10 characters
    /// long, or contains a non-digit character.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        if s.len() != Self::LENGTH {
            return Err(PhoneError::WrongLength {
                expected: Self::LENGTH,
            });
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PhoneError::NonDigit);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as a string slice.
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

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_phone() {
        let phone = Phone::parse("9876543210").unwrap();
        assert_eq!(phone.as_str(), "9876543210");
    }

    #[test]
    fn test_empty_phone() {
        assert_eq!(Phone::parse(""), Err(PhoneError::Empty));
    }

    #[test]
    fn test_wrong_length() {
        assert_eq!(
            Phone::parse("123456789"),
            Err(PhoneError::WrongLength { expected: 10 })
        );
        assert_eq!(
            Phone::parse("12345678901"),
            Err(PhoneError::WrongLength { expected: 10 })
        );
    }

    #[test]
    fn test_non_digit() {
        assert_eq!(Phone::parse("98765 4321"), Err(PhoneError::NonDigit));
        assert_eq!(Phone::parse("+919876543"), Err(PhoneError::NonDigit));
    }

    #[test]
    fn test_multibyte_digits_rejected() {
        // Ten Devanagari digits are 30 bytes, so the length check catches them
        assert!(Phone::parse("९८७६५४३२१०").is_err());
    }
}
