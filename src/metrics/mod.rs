//! Basic metrics instrumentation for tracking gateway performance.
//!
//! Provides counters and duration tracking for gateway requests and
//! dispatch outcomes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Metrics collector for gateway and dispatch activity.
#[derive(Debug, Clone)]
pub struct Metrics {
    /// Total number of gateway requests made
    gateway_requests_total: Arc<AtomicU64>,

    /// Total number of gateway request errors
    gateway_errors_total: Arc<AtomicU64>,

    /// Total duration of all gateway requests in milliseconds
    gateway_duration_total_ms: Arc<AtomicU64>,

    /// Number of messages successfully dispatched
    messages_sent_total: Arc<AtomicU64>,

    /// Number of contacts skipped (invalid phone or failed send)
    contacts_skipped_total: Arc<AtomicU64>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self {
            gateway_requests_total: Arc::new(AtomicU64::new(0)),
            gateway_errors_total: Arc::new(AtomicU64::new(0)),
            gateway_duration_total_ms: Arc::new(AtomicU64::new(0)),
            messages_sent_total: Arc::new(AtomicU64::new(0)),
            contacts_skipped_total: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record a gateway request with duration.
    pub fn record_gateway_request(&self, duration: Duration) {
        self.gateway_requests_total.fetch_add(1, Ordering::Relaxed);
        self.gateway_duration_total_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Record a gateway request error.
    pub fn record_gateway_error(&self) {
        self.gateway_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record messages sent.
    pub fn record_messages_sent(&self, count: usize) {
        self.messages_sent_total
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Record contacts skipped.
    pub fn record_contacts_skipped(&self, count: usize) {
        self.contacts_skipped_total
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Get total gateway requests.
    pub fn gateway_requests_total(&self) -> u64 {
        self.gateway_requests_total.load(Ordering::Relaxed)
    }

    /// Get total gateway errors.
    pub fn gateway_errors_total(&self) -> u64 {
        self.gateway_errors_total.load(Ordering::Relaxed)
    }

    /// Get total gateway duration in milliseconds.
    pub fn gateway_duration_total_ms(&self) -> u64 {
        self.gateway_duration_total_ms.load(Ordering::Relaxed)
    }

    /// Get average gateway request duration in milliseconds.
    pub fn gateway_duration_avg_ms(&self) -> f64 {
        let total = self.gateway_duration_total_ms.load(Ordering::Relaxed);
        let count = self.gateway_requests_total.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    /// Get total messages sent.
    pub fn messages_sent_total(&self) -> u64 {
        self.messages_sent_total.load(Ordering::Relaxed)
    }

    /// Get total contacts skipped.
    pub fn contacts_skipped_total(&self) -> u64 {
        self.contacts_skipped_total.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = Metrics::new();
        metrics.record_gateway_request(Duration::from_millis(100));
        metrics.record_gateway_request(Duration::from_millis(300));
        metrics.record_gateway_error();
        metrics.record_messages_sent(2);
        metrics.record_contacts_skipped(1);

        assert_eq!(metrics.gateway_requests_total(), 2);
        assert_eq!(metrics.gateway_errors_total(), 1);
        assert_eq!(metrics.gateway_duration_total_ms(), 400);
        assert_eq!(metrics.messages_sent_total(), 2);
        assert_eq!(metrics.contacts_skipped_total(), 1);
    }

    #[test]
    fn test_avg_duration() {
        let metrics = Metrics::new();
        assert_eq!(metrics.gateway_duration_avg_ms(), 0.0);

        metrics.record_gateway_request(Duration::from_millis(100));
        metrics.record_gateway_request(Duration::from_millis(200));
        assert!((metrics.gateway_duration_avg_ms() - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clone_shares_counters() {
        let metrics = Metrics::new();
        let cloned = metrics.clone();
        cloned.record_messages_sent(5);
        assert_eq!(metrics.messages_sent_total(), 5);
    }
}
