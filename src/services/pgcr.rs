// src/services/pgcr.rs

//! Post-Game Carnage Report fetch client.
//!
//! PGCRs come from the dedicated stats host, not the regular platform host.
//! Each request gets a fresh HTTP client: the stats host is sensitive to
//! connection reuse during bulk scrapes, so every request declares
//! `Connection: close` and tears its client down afterwards. Failing to
//! *build* a client signals resource exhaustion and is fatal, while a failed
//! send is transient and retried per the configured policy.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::PgcrReport;
use crate::utils::retry::{RetryPolicy, retry_with_backoff};

/// A fetched PGCR plus the server-declared cooldown.
#[derive(Debug, Clone)]
pub struct DetailResponse {
    /// Seconds the server asks us to wait before further requests
    pub throttle_seconds: u64,

    /// The detail report itself
    pub report: PgcrReport,
}

/// Seam over the detail endpoint so the chunked fetcher can run against
/// mocks.
#[async_trait]
pub trait DetailSource: Send + Sync {
    /// Fetch the PGCR for one activity instance.
    async fn fetch(&self, instance_id: &str) -> Result<DetailResponse>;
}

/// The stats endpoint does not use the platform envelope; it carries the
/// throttle value alongside the payload.
#[derive(Debug, Deserialize)]
struct DetailEnvelope {
    #[serde(rename = "ThrottleSeconds", default)]
    throttle_seconds: u64,

    #[serde(rename = "Response")]
    response: PgcrReport,
}

/// HTTP client for the stats host.
pub struct PgcrClient {
    base: String,
    api_key: String,
    verbose: bool,
    retry: RetryPolicy,
}

impl PgcrClient {
    pub fn new(config: &Config) -> Self {
        Self {
            base: config.advanced.stats_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            verbose: config.advanced.http_verbose,
            retry: RetryPolicy::unbounded(std::time::Duration::from_secs(
                config.advanced.retry_backoff_secs,
            )),
        }
    }

    /// Acquire a fresh client for one request. Builder failure means the
    /// system cannot sustain the configured concurrency; it is not retried.
    fn acquire_handle(&self) -> Result<Client> {
        Client::builder()
            .http2_prior_knowledge()
            .danger_accept_invalid_certs(true)
            .connection_verbose(self.verbose)
            .build()
            .map_err(|e| AppError::HandleAcquisition(e.to_string()))
    }
}

#[async_trait]
impl DetailSource for PgcrClient {
    async fn fetch(&self, instance_id: &str) -> Result<DetailResponse> {
        let client = self.acquire_handle()?;
        let url = format!(
            "{}/Destiny2/Stats/PostGameCarnageReport/{}/",
            self.base, instance_id
        );

        // Transport failures retry forever; a response, whatever its status,
        // ends the retry loop.
        let (status, body) = retry_with_backoff(&self.retry, || {
            let request = client
                .get(&url)
                .header("X-API-Key", self.api_key.as_str())
                .header("Connection", "close")
                .header("Accept", "application/json");
            async move {
                let response = request.send().await?;
                let status = response.status().as_u16();
                let body = response.text().await?;
                Ok((status, body))
            }
        })
        .await?;

        if status != 200 {
            return Err(AppError::remote(status, body));
        }

        let envelope: DetailEnvelope = serde_json::from_str(&body)?;
        Ok(DetailResponse {
            throttle_seconds: envelope.throttle_seconds,
            report: envelope.response,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_envelope_extracts_throttle_and_report() {
        let body = serde_json::json!({
            "ThrottleSeconds": 2,
            "Response": {
                "period": "2020-03-01T18:00:00Z",
                "activityDetails": { "instanceId": "555" },
                "entries": []
            },
            "ErrorCode": 1
        })
        .to_string();

        let envelope: DetailEnvelope = serde_json::from_str(&body).unwrap();
        assert_eq!(envelope.throttle_seconds, 2);
        assert_eq!(envelope.response.activity_details.instance_id, "555");
    }

    #[test]
    fn missing_throttle_defaults_to_zero() {
        let body = serde_json::json!({
            "Response": {
                "period": "2020-03-01T18:00:00Z",
                "activityDetails": { "instanceId": "1" },
                "entries": []
            }
        })
        .to_string();

        let envelope: DetailEnvelope = serde_json::from_str(&body).unwrap();
        assert_eq!(envelope.throttle_seconds, 0);
    }
}
