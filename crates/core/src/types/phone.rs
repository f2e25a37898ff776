//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("phone number must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character that is not a digit, space, or one of `+ - ( )`.
    #[error("phone number contains invalid character '{0}'")]
    InvalidCharacter(char),
    /// The input contains too few digits.
    #[error("phone number must contain at least {min} digits")]
    TooFewDigits {
        /// Minimum required digit count.
        min: usize,
    },
}

/// A customer- or shop-facing phone number.
///
/// Stored as entered (digits plus common separators) so it round-trips to the
/// record store unchanged; validation only guards structure, not any national
/// numbering plan.
///
/// ## Constraints
///
/// - Length: 1-20 characters
/// - Characters: digits, spaces, and `+ - ( )`
/// - At least 5 digits
///
/// ## Examples
///
/// ```
/// use tailordesk_core::Phone;
///
/// assert!(Phone::parse("+91 98765 43210").is_ok());
/// assert!(Phone::parse("(022) 555-0199").is_ok());
///
/// assert!(Phone::parse("").is_err());          // empty
/// assert!(Phone::parse("call me").is_err());   // letters
/// assert!(Phone::parse("12").is_err());        // too few digits
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Maximum length of a phone number.
    pub const MAX_LENGTH: usize = 20;

    /// Minimum number of digits a phone number must contain.
    pub const MIN_DIGITS: usize = 5;

    /// Parse a `Phone` from a string.
    ///
    /// Leading and trailing whitespace is trimmed before validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty after trimming
    /// - Is longer than 20 characters
    /// - Contains characters other than digits, spaces, and `+ - ( )`
    /// - Contains fewer than 5 digits
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let s = s.trim();

        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(PhoneError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(bad) = s
            .chars()
            .find(|c| !c.is_ascii_digit() && !matches!(*c, ' ' | '+' | '-' | '(' | ')'))
        {
            return Err(PhoneError::InvalidCharacter(bad));
        }

        if s.chars().filter(char::is_ascii_digit).count() < Self::MIN_DIGITS {
            return Err(PhoneError::TooFewDigits {
                min: Self::MIN_DIGITS,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns only the digit characters, dropping separators.
    #[must_use]
    pub fn digits(&self) -> String {
        self.0.chars().filter(char::is_ascii_digit).collect()
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
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
    fn test_parse_valid_numbers() {
        assert!(Phone::parse("9876543210").is_ok());
        assert!(Phone::parse("+91 98765 43210").is_ok());
        assert!(Phone::parse("(022) 555-0199").is_ok());
        assert!(Phone::parse("  98765  ").is_ok()); // trimmed
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Phone::parse(""), Err(PhoneError::Empty)));
        assert!(matches!(Phone::parse("   "), Err(PhoneError::Empty)));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "9".repeat(21);
        assert!(matches!(
            Phone::parse(&long),
            Err(PhoneError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_invalid_character() {
        assert!(matches!(
            Phone::parse("98765x3210"),
            Err(PhoneError::InvalidCharacter('x'))
        ));
    }

    #[test]
    fn test_parse_too_few_digits() {
        assert!(matches!(
            Phone::parse("+1-2"),
            Err(PhoneError::TooFewDigits { .. })
        ));
    }

    #[test]
    fn test_digits_drops_separators() {
        let phone = Phone::parse("+91 (98) 765-43").unwrap();
        assert_eq!(phone.digits(), "919876543");
    }

    #[test]
    fn test_round_trips_as_entered() {
        let phone = Phone::parse("+91 98765 43210").unwrap();
        assert_eq!(phone.as_str(), "+91 98765 43210");
    }
}
