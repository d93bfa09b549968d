// src/config.rs

//! Application configuration.
//!
//! Loaded once from a TOML file and passed by reference through the pipeline
//! entry points; there is no process-global state. The `init` subcommand
//! writes a commented stub for new users.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::Filter;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Bungie API key
    pub api_key: String,

    /// Player Bungie name in `Name#1234` form
    pub bungie_name: String,

    /// GroupId of the clan to compare against
    pub clan_id: String,

    /// Stop the report after this many matches, 0 to list all
    #[serde(default)]
    pub only_list_first_n: usize,

    /// Per-stage requery toggles
    #[serde(default)]
    pub requery: RequeryConfig,

    /// Activity filter rules, evaluated in order
    #[serde(default)]
    pub filters: Vec<Filter>,

    /// Directory for cache documents
    #[serde(default = "defaults::data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub advanced: AdvancedConfig,
}

/// Selects "always fetch fresh" vs "fail if no cache" per pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequeryConfig {
    #[serde(default = "defaults::yes")]
    pub clanmates: bool,

    #[serde(default = "defaults::yes")]
    pub activity_batches: bool,

    /// This is the costly one.
    #[serde(default = "defaults::yes")]
    pub activity_details: bool,
}

impl Default for RequeryConfig {
    fn default() -> Self {
        Self {
            clanmates: true,
            activity_batches: true,
            activity_details: true,
        }
    }
}

/// Advanced tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvancedConfig {
    /// Concurrency width of the detail fetcher. Larger values are faster but
    /// risk a temporary block by the API.
    #[serde(default = "defaults::concurrency")]
    pub concurrency: usize,

    /// Backoff between retries of a transiently failed detail request
    #[serde(default = "defaults::retry_backoff")]
    pub retry_backoff_secs: u64,

    /// Request timeout for platform API calls
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Verbose connection logging for detail requests. This generates a
    /// *lot* of output.
    #[serde(default)]
    pub http_verbose: bool,

    /// Platform API base URL
    #[serde(default = "defaults::api_base")]
    pub api_base: String,

    /// Stats host base URL for PGCR requests
    #[serde(default = "defaults::stats_base")]
    pub stats_base: String,
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            concurrency: defaults::concurrency(),
            retry_backoff_secs: defaults::retry_backoff(),
            timeout_secs: defaults::timeout(),
            http_verbose: false,
            api_base: defaults::api_base(),
            stats_base: defaults::stats_base(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("cannot read config {}: {e}", path.display()))
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(AppError::validation("api_key was not set"));
        }
        if !self.bungie_name.contains('#') {
            return Err(AppError::validation(
                "bungie_name must be in Name#1234 form",
            ));
        }
        if self.clan_id.trim().is_empty() {
            return Err(AppError::validation("clan_id was not set"));
        }
        if self.advanced.concurrency == 0 {
            return Err(AppError::validation("advanced.concurrency must be > 0"));
        }
        Url::parse(&self.advanced.api_base)
            .map_err(|e| AppError::validation(format!("advanced.api_base is invalid: {e}")))?;
        Url::parse(&self.advanced.stats_base)
            .map_err(|e| AppError::validation(format!("advanced.stats_base is invalid: {e}")))?;
        Ok(())
    }

    /// Write a commented stub config for the user to fill out. Refuses to
    /// overwrite an existing file unless `force` is set.
    pub fn write_stub(path: impl AsRef<Path>, force: bool) -> Result<()> {
        let path = path.as_ref();
        if path.exists() && !force {
            return Err(AppError::config(format!(
                "{} already exists, use --force to overwrite",
                path.display()
            )));
        }
        fs::write(path, STUB)?;
        Ok(())
    }
}

const STUB: &str = r#"## clanscan configuration

## Bungie API key (https://www.bungie.net/en/Application)
api_key = ""

## Bungie name of the player to scan
bungie_name = "Name#1234"

## GroupId of the clan
clan_id = ""

## Only list the first n matches, 0 to list all
only_list_first_n = 0

## Cache directory
# data_dir = "data"

## Requery these things from the API? If disabled, a previous cached run
## must exist or the program exits.
[requery]
clanmates = true
activity_batches = true
activity_details = true # this one is costly!

## Filter rules, evaluated in order. Examples:
##
## Filter by date:
# [[filters]]
# type = "date"
# operator = "before"        # or "after"
# value = "2020-05-01T00:00:00+00:00"
##
## Filter by character class (0 = Titan, 1 = Hunter, 2 = Warlock):
# [[filters]]
# type = "character"
# operator = "is"            # or "is not", "in", "not in"
# value = 2
##
## Filter by activity mode (currently has no effect):
# [[filters]]
# type = "activity"
# operator = "in"
# value = [5, 7]

[advanced]
## Chunk size for concurrent detail requests. Larger values are faster but
## risk a temporary block by the API.
concurrency = 10

## Verbose connection logging for detail requests. Generates a *lot* of text.
http_verbose = false
"#;

mod defaults {
    use std::path::PathBuf;

    pub fn yes() -> bool {
        true
    }
    pub fn concurrency() -> usize {
        10
    }
    pub fn retry_backoff() -> u64 {
        30
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn data_dir() -> PathBuf {
        PathBuf::from("data")
    }
    pub fn api_base() -> String {
        "https://www.bungie.net/Platform".into()
    }
    pub fn stats_base() -> String {
        "https://stats.bungie.net/Platform".into()
    }
}
