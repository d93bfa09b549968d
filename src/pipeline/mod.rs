// src/pipeline/mod.rs

//! Pipeline stages for the activity scan.
//!
//! - `roster`: resolve the player and fetch the clan roster
//! - `batches`: page through per-character activity history
//! - `filters`: prune batches and records by the configured rules
//! - `details`: fetch PGCRs in bounded concurrent chunks
//! - `compare`: report activities shared with clanmates
//! - `run`: full pipeline orchestration

pub mod batches;
pub mod compare;
pub mod details;
pub mod filters;
pub mod roster;
pub mod run;

pub use batches::fetch_activity_batches;
pub use compare::report_shared_activities;
pub use details::fetch_activity_details;
pub use filters::{filter_activities, sort_by_period};
pub use roster::{fetch_clan_members, resolve_player};
pub use run::run_scan;
