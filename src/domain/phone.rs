//! PhoneNumber value object and the policy that validates it.

use super::errors::ValidationError;
use serde::{Serialize, Serializer};
use std::fmt;

/// Normalization and validation rules for phone numbers.
///
/// The prefix and expected digit-body length are configuration, not
/// constants: the defaults (`"+2"`, 11 digits) match one locale and other
/// deployments override them via the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhonePolicy {
    prefix: String,
    body_length: usize,
}

impl PhonePolicy {
    /// Create a policy. The prefix must be `+` followed by ASCII digits
    /// and the body length must be nonzero; config validation enforces
    /// both before a policy is built.
    pub fn new(prefix: impl Into<String>, body_length: usize) -> Self {
        Self {
            prefix: prefix.into(),
            body_length,
        }
    }

    /// The country-code prefix applied during normalization.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Expected number of digits after the prefix.
    pub fn body_length(&self) -> usize {
        self.body_length
    }

    /// Canonicalize a raw phone field: strip all whitespace, prepend the
    /// prefix. Always succeeds; validity is checked separately so the
    /// skip report can show the normalized form of rejected numbers.
    pub fn normalize(&self, raw: &str) -> String {
        let stripped: String = raw.split_whitespace().collect();
        format!("{}{}", self.prefix, stripped)
    }
}

impl Default for PhonePolicy {
    fn default() -> Self {
        Self::new("+2", 11)
    }
}

/// A type-safe wrapper for a normalized, validated phone number.
///
/// Constructed only through [`PhoneNumber::parse`], so holding one proves
/// the number passed the policy's length check.
///
/// # Example
///
/// ```
/// use bulk_sender::domain::{PhoneNumber, PhonePolicy};
///
/// let policy = PhonePolicy::new("+2", 11);
/// let phone = PhoneNumber::parse("010 1234 5678", &policy).unwrap();
/// assert_eq!(phone.as_str(), "+201012345678");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalize a raw phone field and validate it against the policy.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidLength` when the digit body after
    /// the prefix is not exactly `policy.body_length()` characters, or
    /// `ValidationError::NonNumeric` when the body contains a non-digit.
    pub fn parse(raw: &str, policy: &PhonePolicy) -> Result<Self, ValidationError> {
        let normalized = policy.normalize(raw);
        let body = &normalized[policy.prefix().len()..];

        if body.chars().count() != policy.body_length() {
            return Err(ValidationError::InvalidLength {
                expected: policy.body_length(),
                actual: body.chars().count(),
                phone: normalized,
            });
        }

        if !body.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::NonNumeric { phone: normalized });
        }

        Ok(Self(normalized))
    }

    /// Get the normalized phone number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the underlying String.
    pub fn into_inner(self) -> String {
        self.0
    }
}

// Serde support - serialize as string
impl Serialize for PhoneNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

// Display support
impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> PhonePolicy {
        PhonePolicy::new("+2", 11)
    }

    #[test]
    fn test_parse_valid() {
        let phone = PhoneNumber::parse("01012345678", &policy()).unwrap();
        assert_eq!(phone.as_str(), "+201012345678");
    }

    #[test]
    fn test_normalize_strips_whitespace() {
        let phone = PhoneNumber::parse("010 1234 5678", &policy()).unwrap();
        assert_eq!(phone.as_str(), "+201012345678");
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        let err = PhoneNumber::parse("012", &policy()).unwrap_err();
        match err {
            ValidationError::InvalidLength {
                phone,
                expected,
                actual,
            } => {
                assert_eq!(phone, "+2012");
                assert_eq!(expected, 11);
                assert_eq!(actual, 3);
            }
            other => panic!("expected InvalidLength, got: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_non_digits() {
        let err = PhoneNumber::parse("0101234567x", &policy()).unwrap_err();
        assert!(matches!(err, ValidationError::NonNumeric { .. }));
        assert_eq!(err.phone(), "+20101234567x");
    }

    #[test]
    fn test_parse_rejects_empty() {
        let err = PhoneNumber::parse("", &policy()).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidLength { actual: 0, .. }
        ));
    }

    #[test]
    fn test_custom_policy() {
        let policy = PhonePolicy::new("+44", 10);
        let phone = PhoneNumber::parse("7911123456", &policy).unwrap();
        assert_eq!(phone.as_str(), "+447911123456");
        assert!(PhoneNumber::parse("7911", &policy).is_err());
    }

    #[test]
    fn test_phone_display() {
        let phone = PhoneNumber::parse("01012345678", &policy()).unwrap();
        assert_eq!(format!("{}", phone), "+201012345678");
    }

    #[test]
    fn test_phone_serialization() {
        let phone = PhoneNumber::parse("01012345678", &policy()).unwrap();
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"+201012345678\"");
    }
}
