// src/models/activity.rs

//! Activity history data structures.
//!
//! Records arrive from the activity-history endpoint in pages of up to 250,
//! newest first. Only the fields the pipeline touches are typed; everything
//! else is kept in a flattened map so cached documents round-trip unchanged.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::utils::time::parse_period;

/// Character class codes as reported by the profile endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum CharacterClass {
    Titan,
    Hunter,
    Warlock,
    Unknown,
}

impl From<i32> for CharacterClass {
    fn from(code: i32) -> Self {
        match code {
            0 => Self::Titan,
            1 => Self::Hunter,
            2 => Self::Warlock,
            _ => Self::Unknown,
        }
    }
}

impl From<CharacterClass> for i32 {
    fn from(class: CharacterClass) -> Self {
        match class {
            CharacterClass::Titan => 0,
            CharacterClass::Hunter => 1,
            CharacterClass::Warlock => 2,
            CharacterClass::Unknown => 3,
        }
    }
}

impl std::fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Titan => "Titan",
            Self::Hunter => "Hunter",
            Self::Warlock => "Warlock",
            Self::Unknown => "Unknown",
        };
        write!(f, "{name}")
    }
}

/// Identifying detail of one played activity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDetails {
    /// Opaque instance identifier, unique per played activity
    pub instance_id: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One played activity instance as returned by the history endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    /// ISO-8601 timestamp, possibly with a `Z` suffix
    pub period: String,

    /// Payload forwarded to the detail fetch
    pub activity_details: ActivityDetails,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ActivityRecord {
    /// Parsed, offset-normalized timestamp of this activity.
    pub fn timestamp(&self) -> Result<DateTime<FixedOffset>> {
        parse_period(&self.period)
    }
}

/// One page of the activity-history endpoint.
///
/// A response without an `activities` key is the end-of-history sentinel,
/// not an error.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityPage {
    #[serde(default)]
    pub activities: Option<Vec<ActivityRecord>>,
}

/// A page of up to 250 records for one character.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityBatch {
    /// Class code of the character that played these activities
    pub character: CharacterClass,

    /// Records, newest first, as returned by the API
    pub data: Vec<ActivityRecord>,

    /// Timestamp of the oldest record in the page
    pub from: DateTime<FixedOffset>,

    /// Timestamp of the newest record in the page
    pub to: DateTime<FixedOffset>,
}

impl ActivityBatch {
    /// Build a batch from one non-empty page of records (newest first).
    pub fn from_page(character: CharacterClass, data: Vec<ActivityRecord>) -> Result<Self> {
        let newest = data
            .first()
            .ok_or_else(|| AppError::validation("cannot build a batch from an empty page"))?;
        let oldest = data.last().expect("non-empty page has a last record");

        let to = parse_period(&newest.period)?;
        let from = parse_period(&oldest.period)?;

        Ok(Self {
            character,
            data,
            from,
            to,
        })
    }
}
