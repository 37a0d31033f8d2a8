//! HTTP client for the messaging automation gateway.
//!
//! The gateway drives a browser session on its side; this client only
//! dispatches an attempt and reports success or failure. It is synchronous
//! by design — the dispatch pipeline runs on a blocking worker thread and
//! one batch never invokes the gateway concurrently.

use crate::config::Config;
use crate::domain::PhoneNumber;
use crate::error::{GatewayError, GatewayResult};
use crate::metrics::Metrics;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Timing parameters forwarded to the automation tool for one send.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SendTiming {
    /// Seconds the tool waits before typing the message
    pub wait_seconds: u64,

    /// Seconds after which the tool closes its session
    pub close_seconds: u64,
}

/// One send attempt: who, what, and how the tool should pace itself.
#[derive(Debug, Clone, Serialize)]
pub struct SendRequest {
    pub phone: PhoneNumber,

    #[serde(rename = "message")]
    pub text: String,

    #[serde(flatten)]
    pub timing: SendTiming,
}

/// The send capability.
///
/// The external mechanism that actually delivers a message is opaque to the
/// dispatcher; anything implementing this trait can stand in for it, which
/// is how the dispatch loop is tested without driving real automation.
pub trait MessageSender: Send + Sync {
    /// Dispatch one message. `Ok(())` means the attempt was handed to the
    /// external channel, not that the message was delivered.
    fn send(&self, request: &SendRequest) -> GatewayResult<()>;
}

/// HTTP client for the messaging automation gateway.
#[derive(Clone)]
pub struct GatewayClient {
    /// Base URL for the gateway
    base_url: String,

    /// API key for authentication
    api_key: String,

    /// HTTP client agent
    agent: Arc<ureq::Agent>,

    /// Metrics collector
    metrics: Metrics,
}

impl GatewayClient {
    /// Create a new GatewayClient from configuration.
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout))
            .build();

        Self {
            base_url: config.gateway_base_url.clone(),
            api_key: config.gateway_api_key.clone(),
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Create a GatewayClient with a custom base URL (useful for testing).
    #[doc(hidden)]
    pub fn with_base_url(base_url: String, api_key: String) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();

        Self {
            base_url,
            api_key,
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Build a full URL from a path.
    fn build_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Execute a POST request with authentication and JSON body.
    fn post(&self, path: &str, body: &serde_json::Value) -> GatewayResult<ureq::Response> {
        let start = Instant::now();
        let url = self.build_url(path);

        tracing::debug!("POST {}", url);

        let result = self
            .agent
            .post(&url)
            .set("x-api-key", &self.api_key)
            .set("Content-Type", "application/json")
            .send_json(body)
            .map_err(|e| self.map_error(e));

        let duration = start.elapsed();
        if result.is_err() {
            self.metrics.record_gateway_error();
        }
        self.metrics.record_gateway_request(duration);

        result
    }

    /// Map a ureq error to a GatewayError.
    fn map_error(&self, error: ureq::Error) -> GatewayError {
        match error {
            ureq::Error::Status(code, response) => {
                let message = response
                    .into_string()
                    .unwrap_or_else(|_| "Unknown error".to_string());

                match code {
                    401 => GatewayError::Unauthorized,
                    429 => GatewayError::RateLimitExceeded,
                    _ => GatewayError::ApiError {
                        status: code,
                        message,
                    },
                }
            }
            ureq::Error::Transport(transport) => {
                if transport.kind() == ureq::ErrorKind::ConnectionFailed {
                    GatewayError::HttpError("Connection failed".to_string())
                } else if transport.kind() == ureq::ErrorKind::Io {
                    GatewayError::Timeout
                } else {
                    GatewayError::HttpError(transport.to_string())
                }
            }
        }
    }
}

impl MessageSender for GatewayClient {
    fn send(&self, request: &SendRequest) -> GatewayResult<()> {
        let body = serde_json::to_value(request).map_err(GatewayError::JsonError)?;
        self.post("/send", &body)?;
        Ok(())
    }
}
