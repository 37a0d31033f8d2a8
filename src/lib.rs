//! Bulk Sender - a web-triggered bulk messaging service.
//!
//! Accepts a CSV of (name, phone) contacts and a message template over
//! HTTP, validates phone numbers against a configurable policy, dispatches
//! a personalized message per valid contact through an external messaging
//! automation gateway with randomized throttling, and writes a report of
//! skipped contacts.
//!
//! # Architecture
//!
//! - **domain**: phone number value object and validation policy
//! - **models**: contact batches and dispatch outcomes
//! - **loader**: CSV contact list parsing
//! - **client**: HTTP client for the messaging gateway, behind the
//!   `MessageSender` seam
//! - **dispatch**: the sequential send loop with injectable pacing
//! - **report**: timestamped skip report artifact
//! - **server**: actix-web front door (form, upload endpoint, health)
//! - **config**: environment-driven configuration
//! - **error**: custom error types for precise error handling
//! - **metrics**: counters for gateway and dispatch activity

pub mod client;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod models;
pub mod report;
pub mod server;

pub use client::{GatewayClient, MessageSender, SendRequest, SendTiming};
pub use config::{Config, DelayRange};
pub use dispatch::{DispatchOptions, Dispatcher, Pacing, ThreadPacing};
pub use error::{ConfigError, GatewayError, UploadError};
pub use metrics::Metrics;
pub use models::{Contact, ContactBatch, DispatchSummary, SkipReason, SkippedContact};
pub use report::SkipReport;
pub use server::AppState;
