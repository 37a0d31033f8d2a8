//! The batch dispatch loop.
//!
//! Walks a contact batch strictly in order: validates each phone against
//! the configured policy, personalizes the message, invokes the send
//! capability with randomized tool timing, and throttles between attempts.
//! Per-contact failures are recorded and skipped, never fatal to the batch.

use crate::client::{MessageSender, SendRequest, SendTiming};
use crate::config::{Config, DelayRange};
use crate::domain::{PhoneNumber, PhonePolicy};
use crate::models::{ContactBatch, DispatchSummary, SkipReason};
use rand::Rng;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Source of randomized delays and the sleeps that consume them.
///
/// Injectable so tests can record the draw/sleep sequence without real
/// sleeping.
pub trait Pacing {
    /// Draw a uniform value from an inclusive seconds range.
    fn pick_secs(&mut self, range: RangeInclusive<u64>) -> u64;

    /// Block for the given number of seconds.
    fn pause_secs(&mut self, secs: u64);
}

/// Production pacing: thread-local RNG and a real blocking sleep.
#[derive(Debug, Default)]
pub struct ThreadPacing;

impl Pacing for ThreadPacing {
    fn pick_secs(&mut self, range: RangeInclusive<u64>) -> u64 {
        rand::thread_rng().gen_range(range)
    }

    fn pause_secs(&mut self, secs: u64) {
        std::thread::sleep(Duration::from_secs(secs));
    }
}

/// Everything the dispatch loop needs from configuration.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    pub policy: PhonePolicy,
    pub send_wait_secs: DelayRange,
    pub tab_close_secs: DelayRange,
    pub throttle_secs: DelayRange,
}

impl DispatchOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            policy: config.phone_policy(),
            send_wait_secs: config.send_wait_secs,
            tab_close_secs: config.tab_close_secs,
            throttle_secs: config.throttle_secs,
        }
    }
}

/// Iterates a contact batch and dispatches through the send capability.
pub struct Dispatcher {
    sender: Arc<dyn MessageSender>,
    options: DispatchOptions,
}

impl Dispatcher {
    pub fn new(sender: Arc<dyn MessageSender>, options: DispatchOptions) -> Self {
        Self { sender, options }
    }

    /// Run the batch to completion and tally outcomes.
    ///
    /// Contacts are processed strictly in batch order. Invalid phones are
    /// skipped before any gateway call and consume no delay; a real send
    /// attempt — success or failure — is followed by a randomized
    /// throttle sleep.
    pub fn run(
        &self,
        batch: &ContactBatch,
        message: &str,
        pacing: &mut dyn Pacing,
    ) -> DispatchSummary {
        let mut summary = DispatchSummary::new(batch.len());

        for contact in batch {
            let phone = match PhoneNumber::parse(&contact.phone, &self.options.policy) {
                Ok(phone) => phone,
                Err(e) => {
                    warn!("skipping {}: {}", contact.name, e);
                    summary.record_skipped(
                        contact.name.clone(),
                        e.phone().to_string(),
                        SkipReason::InvalidPhone(e.to_string()),
                    );
                    continue;
                }
            };

            let request = SendRequest {
                text: format!("Hello {}, {}", contact.name, message),
                timing: SendTiming {
                    wait_seconds: pacing.pick_secs(self.options.send_wait_secs.as_range()),
                    close_seconds: pacing.pick_secs(self.options.tab_close_secs.as_range()),
                },
                phone,
            };

            match self.sender.send(&request) {
                Ok(()) => {
                    info!("message sent to {}", request.phone);
                    summary.record_sent();
                }
                Err(e) => {
                    error!("failed to send to {}: {}", request.phone, e);
                    summary.record_skipped(
                        contact.name.clone(),
                        request.phone.as_str().to_string(),
                        SkipReason::SendFailed(e.to_string()),
                    );
                }
            }

            let delay = pacing.pick_secs(self.options.throttle_secs.as_range());
            pacing.pause_secs(delay);
        }

        debug_assert!(summary.is_consistent());
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GatewayError, GatewayResult};
    use crate::models::Contact;
    use std::sync::Mutex;

    /// Sender double that records requests and fails on request.
    struct RecordingSender {
        requests: Mutex<Vec<SendRequest>>,
        fail_phones: Vec<String>,
    }

    impl RecordingSender {
        fn new() -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                fail_phones: Vec::new(),
            }
        }

        fn failing_on(phone: &str) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                fail_phones: vec![phone.to_string()],
            }
        }

        fn sent_phones(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|r| r.phone.as_str().to_string())
                .collect()
        }
    }

    impl MessageSender for RecordingSender {
        fn send(&self, request: &SendRequest) -> GatewayResult<()> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail_phones.iter().any(|p| p == request.phone.as_str()) {
                return Err(GatewayError::ApiError {
                    status: 500,
                    message: "session crashed".to_string(),
                });
            }
            Ok(())
        }
    }

    /// Pacing double: deterministic draws (always the range minimum) and
    /// recorded sleeps instead of real ones.
    #[derive(Default)]
    struct RecordedPacing {
        picks: Vec<u64>,
        pauses: Vec<u64>,
    }

    impl Pacing for RecordedPacing {
        fn pick_secs(&mut self, range: RangeInclusive<u64>) -> u64 {
            let value = *range.start();
            self.picks.push(value);
            value
        }

        fn pause_secs(&mut self, secs: u64) {
            self.pauses.push(secs);
        }
    }

    fn options() -> DispatchOptions {
        DispatchOptions {
            policy: PhonePolicy::new("+2", 11),
            send_wait_secs: DelayRange::new(10, 15),
            tab_close_secs: DelayRange::new(3, 5),
            throttle_secs: DelayRange::new(5, 10),
        }
    }

    fn batch(contacts: Vec<Contact>) -> ContactBatch {
        ContactBatch::new(contacts)
    }

    #[test]
    fn test_every_contact_classified_once() {
        let sender = Arc::new(RecordingSender::new());
        let dispatcher = Dispatcher::new(sender.clone(), options());
        let mut pacing = RecordedPacing::default();

        let summary = dispatcher.run(
            &batch(vec![
                Contact::new("Ada", "01012345678"),
                Contact::new("Bo", "2012"),
                Contact::new("Cy", "01012345679"),
            ]),
            "hi",
            &mut pacing,
        );

        assert_eq!(summary.total, 3);
        assert_eq!(summary.sent_count, 2);
        assert_eq!(summary.skipped_count(), 1);
        assert!(summary.is_consistent());
    }

    #[test]
    fn test_invalid_phone_never_reaches_sender() {
        let sender = Arc::new(RecordingSender::new());
        let dispatcher = Dispatcher::new(sender.clone(), options());
        let mut pacing = RecordedPacing::default();

        dispatcher.run(
            &batch(vec![
                Contact::new("Bo", "2012"),
                Contact::new("Ada", "01012345678"),
            ]),
            "hi",
            &mut pacing,
        );

        assert_eq!(sender.sent_phones(), vec!["+201012345678"]);
    }

    #[test]
    fn test_invalid_phone_consumes_no_delay() {
        let sender = Arc::new(RecordingSender::new());
        let dispatcher = Dispatcher::new(sender.clone(), options());
        let mut pacing = RecordedPacing::default();

        dispatcher.run(&batch(vec![Contact::new("Bo", "2012")]), "hi", &mut pacing);

        assert!(pacing.picks.is_empty());
        assert!(pacing.pauses.is_empty());
    }

    #[test]
    fn test_throttle_after_success_and_failure() {
        let sender = Arc::new(RecordingSender::failing_on("+201012345679"));
        let dispatcher = Dispatcher::new(sender.clone(), options());
        let mut pacing = RecordedPacing::default();

        dispatcher.run(
            &batch(vec![
                Contact::new("Ada", "01012345678"),
                Contact::new("Cy", "01012345679"),
            ]),
            "hi",
            &mut pacing,
        );

        // Two attempts, one throttle pause each
        assert_eq!(pacing.pauses, vec![5, 5]);
        // wait + close picked per attempt, throttle after
        assert_eq!(pacing.picks, vec![10, 3, 5, 10, 3, 5]);
    }

    #[test]
    fn test_send_failure_does_not_abort_batch() {
        let sender = Arc::new(RecordingSender::failing_on("+201012345678"));
        let dispatcher = Dispatcher::new(sender.clone(), options());
        let mut pacing = RecordedPacing::default();

        let summary = dispatcher.run(
            &batch(vec![
                Contact::new("Ada", "01012345678"),
                Contact::new("Cy", "01012345679"),
            ]),
            "hi",
            &mut pacing,
        );

        assert_eq!(summary.sent_count, 1);
        assert_eq!(summary.skipped_count(), 1);
        assert!(matches!(
            summary.skipped[0].reason,
            SkipReason::SendFailed(_)
        ));
        // The failing contact still got its attempt before the next one
        assert_eq!(sender.sent_phones().len(), 2);
    }

    #[test]
    fn test_personalization_prepends_greeting() {
        let sender = Arc::new(RecordingSender::new());
        let dispatcher = Dispatcher::new(sender.clone(), options());
        let mut pacing = RecordedPacing::default();

        dispatcher.run(
            &batch(vec![Contact::new("Ada", "01012345678")]),
            "your order shipped",
            &mut pacing,
        );

        let requests = sender.requests.lock().unwrap();
        assert_eq!(requests[0].text, "Hello Ada, your order shipped");
    }

    #[test]
    fn test_empty_batch() {
        let sender = Arc::new(RecordingSender::new());
        let dispatcher = Dispatcher::new(sender.clone(), options());
        let mut pacing = RecordedPacing::default();

        let summary = dispatcher.run(&batch(vec![]), "hi", &mut pacing);
        assert_eq!(summary.total, 0);
        assert!(summary.is_consistent());
        assert!(sender.sent_phones().is_empty());
    }
}
