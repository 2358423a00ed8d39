//! Shared helpers for jobtrack integration tests.
//!
//! - builders for messages and records
//! - in-memory fakes for the mail source, summarizer and table store

pub mod builders;
pub mod fakes;

pub use builders::*;
pub use fakes::*;
