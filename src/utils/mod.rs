// src/utils/mod.rs

//! Shared utilities.

pub mod retry;
pub mod time;

pub use retry::{RetryPolicy, retry_with_backoff};
pub use time::parse_period;
