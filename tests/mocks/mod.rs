//! Test doubles for the send capability.

use bulk_sender::client::{MessageSender, SendRequest};
use bulk_sender::error::{GatewayError, GatewayResult};
use std::sync::{Arc, Mutex};

/// `MessageSender` double that records every request and can be told to
/// fail for specific phones.
pub struct MockSender {
    requests: Mutex<Vec<SendRequest>>,
    fail_phones: Vec<String>,
}

#[allow(dead_code)]
impl MockSender {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            fail_phones: Vec::new(),
        })
    }

    pub fn failing_on(phones: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            fail_phones: phones.iter().map(|p| p.to_string()).collect(),
        })
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<SendRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn sent_phones(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.phone.as_str().to_string())
            .collect()
    }
}

impl MessageSender for MockSender {
    fn send(&self, request: &SendRequest) -> GatewayResult<()> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail_phones.iter().any(|p| p == request.phone.as_str()) {
            return Err(GatewayError::ApiError {
                status: 500,
                message: "automation session crashed".to_string(),
            });
        }
        Ok(())
    }
}
