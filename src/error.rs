//! Error types for the bulk sender.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use thiserror::Error;

/// Errors that can occur when invoking the messaging automation gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Gateway returned an error status code
    #[error("Gateway error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Failed to serialize or parse a JSON payload
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Network timeout
    #[error("Request timeout")]
    Timeout,

    /// Authentication failed
    #[error("Authentication failed")]
    Unauthorized,

    /// Gateway refused further sends for now
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Errors raised while accepting and processing an upload.
///
/// Only the upload handler turns these into user-facing messages; inner
/// components construct and propagate them.
#[derive(Error, Debug)]
pub enum UploadError {
    /// Multipart form had no file part
    #[error("No file part")]
    MissingFile,

    /// File part present but with an empty filename
    #[error("No selected file")]
    EmptyFilename,

    /// Message field missing or blank after trimming
    #[error("Please enter a message to send")]
    MissingMessage,

    /// Extension not in the allowed set
    #[error("Invalid file type: .{0}")]
    UnsupportedFileType(String),

    /// A CSV row could not be split into exactly two fields
    #[error("Bad contact file at row {row}: {reason}")]
    Format { row: usize, reason: String },

    /// Filesystem fault while persisting or reading the upload
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results with GatewayError
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Convenience type alias for Results with UploadError
pub type UploadResult<T> = Result<T, UploadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GatewayError::Timeout;
        assert_eq!(err.to_string(), "Request timeout");

        let err = ConfigError::MissingVar("GATEWAY_API_KEY".to_string());
        assert_eq!(
            err.to_string(),
            "Missing required environment variable: GATEWAY_API_KEY"
        );

        let err = UploadError::MissingMessage;
        assert_eq!(err.to_string(), "Please enter a message to send");

        let err = UploadError::UnsupportedFileType("xlsx".to_string());
        assert_eq!(err.to_string(), "Invalid file type: .xlsx");
    }

    #[test]
    fn test_gateway_error_variants() {
        let err = GatewayError::ApiError {
            status: 502,
            message: "Bad gateway".to_string(),
        };
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("Bad gateway"));
    }

    #[test]
    fn test_format_error_carries_row() {
        let err = UploadError::Format {
            row: 3,
            reason: "expected 2 fields, found 5".to_string(),
        };
        assert!(err.to_string().contains("row 3"));
    }
}
