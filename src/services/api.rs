// src/services/api.rs

//! Bungie platform API transport.
//!
//! Every platform endpoint wraps its payload in an envelope; `get`/`post`
//! unwrap it and hand back the `Response` value. Non-200 statuses surface as
//! [`AppError::Remote`] carrying the raw body for diagnostics.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::{AppError, Result};

/// Seam over the platform API so pipelines can run against mocks.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// GET an endpoint path (leading slash included) and return the
    /// `Response` payload.
    async fn get(&self, endpoint: &str) -> Result<Value>;

    /// POST a JSON body to an endpoint path and return the `Response`
    /// payload.
    async fn post(&self, endpoint: &str, body: Value) -> Result<Value>;
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    #[serde(rename = "Response")]
    response: Value,
}

/// HTTP client for the Bungie platform API.
pub struct BungieClient {
    client: Client,
    base: String,
    api_key: String,
}

impl BungieClient {
    /// Build a client from the configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.advanced.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base: config.advanced.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base, endpoint)
    }

    fn unwrap_envelope(status: u16, body: String, endpoint: &str) -> Result<Value> {
        if status != 200 {
            return Err(AppError::remote(
                status,
                format!("request to {endpoint} failed: {body}"),
            ));
        }
        let envelope: ApiEnvelope = serde_json::from_str(&body)?;
        Ok(envelope.response)
    }
}

#[async_trait]
impl ApiTransport for BungieClient {
    async fn get(&self, endpoint: &str) -> Result<Value> {
        let response = self
            .client
            .get(self.url(endpoint))
            .header("X-API-Key", self.api_key.as_str())
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Self::unwrap_envelope(status, body, endpoint)
    }

    async fn post(&self, endpoint: &str, body: Value) -> Result<Value> {
        let response = self
            .client
            .post(self.url(endpoint))
            .header("X-API-Key", self.api_key.as_str())
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Self::unwrap_envelope(status, body, endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_unwraps_response_payload() {
        let body = r#"{"Response": {"value": 1}, "ErrorCode": 1, "ThrottleSeconds": 0}"#;
        let value = BungieClient::unwrap_envelope(200, body.to_string(), "/Test/").unwrap();
        assert_eq!(value, serde_json::json!({"value": 1}));
    }

    #[test]
    fn non_200_preserves_raw_body() {
        let err =
            BungieClient::unwrap_envelope(503, "down for maintenance".to_string(), "/Test/")
                .unwrap_err();
        match err {
            AppError::Remote { status, body } => {
                assert_eq!(status, 503);
                assert!(body.contains("down for maintenance"));
                assert!(body.contains("/Test/"));
            }
            other => panic!("expected remote error, got {other:?}"),
        }
    }
}
