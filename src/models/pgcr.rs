// src/models/pgcr.rs

//! Post-Game Carnage Report structures.
//!
//! A PGCR is the per-activity detail report listing every participant. The
//! pipeline only reads the participant membership ids; the rest of the
//! payload is carried through the cache untouched via flattened maps.

use serde::{Deserialize, Serialize};

use super::activity::ActivityDetails;
use super::player::DestinyMembership;

/// One participant entry of a PGCR.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PgcrEntry {
    pub player: PgcrPlayer,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PgcrPlayer {
    pub destiny_user_info: DestinyMembership,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A full per-activity detail report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PgcrReport {
    /// ISO-8601 timestamp of the activity
    pub period: String,

    pub activity_details: ActivityDetails,

    /// Participant records
    pub entries: Vec<PgcrEntry>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
