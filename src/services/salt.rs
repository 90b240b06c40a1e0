// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Salt service client.
//!
//! The salt service maps an identity token to a per-user salt. The salt
//! must be stable per end-user identity; that stability is the service's
//! responsibility, not validated here. Treated as a pluggable collaborator
//! so deployments can swap in their own salt management.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::ServiceError;

const SERVICE_NAME: &str = "salt service";

#[derive(Debug, Serialize)]
struct SaltRequest<'a> {
    jwt: &'a str,
}

#[derive(Debug, Deserialize)]
struct SaltResponse {
    salt: String,
}

/// Salt-issuing collaborator keyed by end-user identity
#[async_trait]
pub trait SaltService: Send + Sync {
    /// Exchange the raw identity token for the user's salt (decimal string)
    async fn fetch_salt(&self, jwt: &str) -> Result<String, ServiceError>;
}

/// HTTP implementation posting `{ jwt }` and expecting `{ salt }`
pub struct HttpSaltService {
    url: String,
    client: Client,
    timeout: Duration,
}

impl HttpSaltService {
    /// Create a client for the given endpoint with a bounded request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            url: url.into(),
            client,
            timeout,
        }
    }
}

#[async_trait]
impl SaltService for HttpSaltService {
    async fn fetch_salt(&self, jwt: &str) -> Result<String, ServiceError> {
        let timeout_ms = self.timeout.as_millis() as u64;

        let response = self
            .client
            .post(&self.url)
            .json(&SaltRequest { jwt })
            .send()
            .await
            .map_err(|e| ServiceError::from_reqwest(SERVICE_NAME, timeout_ms, e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                service: SERVICE_NAME,
                status: status.as_u16(),
                message,
            });
        }

        let body: SaltResponse =
            response
                .json()
                .await
                .map_err(|e| ServiceError::MalformedBody {
                    service: SERVICE_NAME,
                    message: e.to_string(),
                })?;

        debug!("✅ Salt service success");
        Ok(body.salt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(SaltRequest { jwt: "a.b.c" }).unwrap();
        assert_eq!(body, serde_json::json!({ "jwt": "a.b.c" }));
    }

    #[test]
    fn test_response_parses_decimal_string() {
        let body: SaltResponse = serde_json::from_str(r#"{"salt":"42"}"#).unwrap();
        assert_eq!(body.salt, "42");
    }
}
