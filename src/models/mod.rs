//! Data structures for contact batches and dispatch outcomes.

pub mod contact;
pub mod outcome;

pub use contact::{Contact, ContactBatch};
pub use outcome::{DispatchSummary, SkipReason, SkippedContact};
