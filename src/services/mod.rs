// src/services/mod.rs

//! Remote API access services.

pub mod api;
pub mod pgcr;

pub use api::{ApiTransport, BungieClient};
pub use pgcr::{DetailResponse, DetailSource, PgcrClient};
