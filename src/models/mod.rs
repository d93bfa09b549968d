// src/models/mod.rs

//! Domain models for the clanscan application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod activity;
mod filter;
mod pgcr;
mod player;

// Re-export all public types
pub use activity::{ActivityBatch, ActivityDetails, ActivityPage, ActivityRecord, CharacterClass};
pub use filter::{ClassValue, DateOperator, Filter, ModeValue, SetOperator};
pub use pgcr::{PgcrEntry, PgcrPlayer, PgcrReport};
pub use player::{
    CharacterSummary, ClanDetail, ClanMember, ClanMemberList, DestinyMembership, LinkedProfiles,
    PlayerIdentity, ProfileCharacters, SearchByBungieName,
};
