//! Configuration management for the bulk sender.
//!
//! This module handles loading and validating configuration from environment
//! variables. Everything the front door and dispatcher need — upload
//! directory, allowed extensions, phone policy, delay ranges — is explicit
//! configuration rather than module-level state.

use crate::domain::PhonePolicy;
use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::ops::RangeInclusive;
use std::path::PathBuf;

/// An inclusive seconds range a randomized delay is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min: u64,
    pub max: u64,
}

impl DelayRange {
    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    pub fn as_range(&self) -> RangeInclusive<u64> {
        self.min..=self.max
    }
}

/// Configuration for the bulk sender service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub bind_addr: String,

    /// Messaging gateway base URL
    pub gateway_base_url: String,

    /// Gateway API key for authentication
    pub gateway_api_key: String,

    /// Directory uploads are persisted into for the duration of a request
    pub upload_dir: PathBuf,

    /// Directory skip reports are written to (default: working directory)
    pub report_dir: PathBuf,

    /// Allowed upload extensions, lowercase (default: csv)
    pub allowed_extensions: Vec<String>,

    /// Country-code prefix prepended during normalization (default: "+2")
    pub phone_prefix: String,

    /// Expected digit count after the prefix (default: 11)
    pub phone_body_length: usize,

    /// Gateway wait-before-send range in seconds (default: 10..=15)
    pub send_wait_secs: DelayRange,

    /// Gateway close-after-send range in seconds (default: 3..=5)
    pub tab_close_secs: DelayRange,

    /// Inter-send throttle range in seconds (default: 5..=10)
    pub throttle_secs: DelayRange,

    /// Gateway HTTP request timeout in seconds (default: 30)
    pub request_timeout: u64,

    /// Log level (default: "info")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `GATEWAY_BASE_URL`: Base URL for the messaging gateway
    /// - `GATEWAY_API_KEY`: API key for authentication
    ///
    /// Optional environment variables:
    /// - `BIND_ADDR`: HTTP bind address (default: 127.0.0.1:8080)
    /// - `UPLOAD_DIR`: upload scratch directory (default: uploads)
    /// - `REPORT_DIR`: skip report directory (default: .)
    /// - `ALLOWED_EXTENSIONS`: comma-separated extensions (default: csv)
    /// - `COUNTRY_PREFIX`: phone prefix (default: +2)
    /// - `PHONE_BODY_LENGTH`: digits after the prefix (default: 11)
    /// - `SEND_WAIT_SECS_MIN` / `SEND_WAIT_SECS_MAX` (default: 10 / 15)
    /// - `TAB_CLOSE_SECS_MIN` / `TAB_CLOSE_SECS_MAX` (default: 3 / 5)
    /// - `THROTTLE_SECS_MIN` / `THROTTLE_SECS_MAX` (default: 5 / 10)
    /// - `REQUEST_TIMEOUT`: gateway timeout in seconds (default: 30)
    /// - `LOG_LEVEL`: logging level (default: "info")
    pub fn from_env() -> ConfigResult<Self> {
        // Load .env if present; a missing file is not an error
        let _ = dotenvy::dotenv();

        let gateway_base_url = env::var("GATEWAY_BASE_URL")
            .map_err(|_| ConfigError::MissingVar("GATEWAY_BASE_URL".to_string()))?;

        let gateway_api_key = env::var("GATEWAY_API_KEY")
            .map_err(|_| ConfigError::MissingVar("GATEWAY_API_KEY".to_string()))?;

        if !gateway_base_url.starts_with("http://") && !gateway_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: "GATEWAY_BASE_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        if gateway_api_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "GATEWAY_API_KEY".to_string(),
                reason: "Cannot be empty".to_string(),
            });
        }

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let upload_dir = PathBuf::from(env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()));
        let report_dir = PathBuf::from(env::var("REPORT_DIR").unwrap_or_else(|_| ".".into()));

        let allowed_extensions = env::var("ALLOWED_EXTENSIONS")
            .unwrap_or_else(|_| "csv".to_string())
            .split(',')
            .map(|ext| ext.trim().to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect::<Vec<_>>();
        if allowed_extensions.is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "ALLOWED_EXTENSIONS".to_string(),
                reason: "Must name at least one extension".to_string(),
            });
        }

        let phone_prefix = env::var("COUNTRY_PREFIX").unwrap_or_else(|_| "+2".to_string());
        Self::validate_prefix(&phone_prefix)?;

        let phone_body_length = Self::parse_env_usize("PHONE_BODY_LENGTH", 11)?;
        if phone_body_length == 0 {
            return Err(ConfigError::InvalidValue {
                var: "PHONE_BODY_LENGTH".to_string(),
                reason: "Must be nonzero".to_string(),
            });
        }

        let send_wait_secs = Self::parse_env_range("SEND_WAIT_SECS", 10, 15)?;
        let tab_close_secs = Self::parse_env_range("TAB_CLOSE_SECS", 3, 5)?;
        let throttle_secs = Self::parse_env_range("THROTTLE_SECS", 5, 10)?;

        let request_timeout = Self::parse_env_u64("REQUEST_TIMEOUT", 30)?;
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Config {
            bind_addr,
            gateway_base_url,
            gateway_api_key,
            upload_dir,
            report_dir,
            allowed_extensions,
            phone_prefix,
            phone_body_length,
            send_wait_secs,
            tab_close_secs,
            throttle_secs,
            request_timeout,
            log_level,
        })
    }

    /// Build the phone normalization policy from this configuration.
    pub fn phone_policy(&self) -> PhonePolicy {
        PhonePolicy::new(self.phone_prefix.clone(), self.phone_body_length)
    }

    /// Whether a lowercase extension is in the allowed set.
    pub fn extension_allowed(&self, ext: &str) -> bool {
        self.allowed_extensions.iter().any(|a| a == ext)
    }

    /// The prefix must be `+` followed by one or more digits.
    fn validate_prefix(prefix: &str) -> ConfigResult<()> {
        let mut chars = prefix.chars();
        let plausible = chars.next() == Some('+')
            && prefix.len() > 1
            && chars.all(|c| c.is_ascii_digit());
        if !plausible {
            return Err(ConfigError::InvalidValue {
                var: "COUNTRY_PREFIX".to_string(),
                reason: format!("Must be '+' followed by digits, got: {}", prefix),
            });
        }
        Ok(())
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as usize with a default value.
    fn parse_env_usize(var_name: &str, default: usize) -> ConfigResult<usize> {
        match env::var(var_name) {
            Ok(val) => val.parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse a `<BASE>_MIN` / `<BASE>_MAX` pair, enforcing min <= max.
    fn parse_env_range(base: &str, default_min: u64, default_max: u64) -> ConfigResult<DelayRange> {
        let min = Self::parse_env_u64(&format!("{}_MIN", base), default_min)?;
        let max = Self::parse_env_u64(&format!("{}_MAX", base), default_max)?;
        if min > max {
            return Err(ConfigError::InvalidValue {
                var: format!("{}_MIN", base),
                reason: format!("Must not exceed {}_MAX ({} > {})", base, min, max),
            });
        }
        Ok(DelayRange::new(min, max))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: "127.0.0.1:8080".to_string(),
            gateway_base_url: String::new(),
            gateway_api_key: String::new(),
            upload_dir: PathBuf::from("uploads"),
            report_dir: PathBuf::from("."),
            allowed_extensions: vec!["csv".to_string()],
            phone_prefix: "+2".to_string(),
            phone_body_length: 11,
            send_wait_secs: DelayRange::new(10, 15),
            tab_close_secs: DelayRange::new(3, 5),
            throttle_secs: DelayRange::new(5, 10),
            request_timeout: 30,
            log_level: "info".to_string(),
        }
    }
}
