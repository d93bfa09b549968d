// src/utils/time.rs

//! Timestamp parsing helpers.
//!
//! The Bungie API reports activity periods as ISO-8601 strings, usually with
//! a `Z` UTC suffix. Cached documents carry the explicit `+00:00` form, so
//! both spellings must parse to the same instant.

use chrono::{DateTime, FixedOffset};

use crate::error::{AppError, Result};

/// Parse an activity period timestamp, accepting both the `Z` suffix and an
/// explicit numeric offset.
pub fn parse_period(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).map_err(|e| AppError::timestamp(value, e))
}

/// Render a timestamp with an explicit offset (`+00:00`, never `Z`).
pub fn to_offset_string(value: &DateTime<FixedOffset>) -> String {
    value.to_rfc3339()
}
