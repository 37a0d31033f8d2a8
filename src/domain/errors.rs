//! Validation errors for domain value objects.

use thiserror::Error;

/// Per-contact validation failures.
///
/// These are non-fatal: a contact that fails validation is skipped, not
/// the batch. Each variant carries the normalized phone string so the
/// skip report can show what was actually rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Digit body after the country prefix has the wrong length
    #[error("invalid phone length for {phone}: expected {expected} digits, found {actual}")]
    InvalidLength {
        phone: String,
        expected: usize,
        actual: usize,
    },

    /// Digit body contains a non-digit character
    #[error("phone {phone} contains non-digit characters")]
    NonNumeric { phone: String },
}

impl ValidationError {
    /// The normalized phone string the error refers to.
    pub fn phone(&self) -> &str {
        match self {
            ValidationError::InvalidLength { phone, .. } => phone,
            ValidationError::NonNumeric { phone } => phone,
        }
    }
}
