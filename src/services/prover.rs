// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Proving service client.
//!
//! Posts the proof-request payload and returns the opaque proof-input
//! bundle. The request field names are fixed by the proving service's
//! contract; the response schema is provider-defined and passed through
//! untouched. The service also verifies the identity token; the session
//! subsystem never checks token signatures itself.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use super::ServiceError;
use crate::session::types::ZkProofBundle;

const SERVICE_NAME: &str = "proving service";

/// Proof-request payload; field names are the proving service's contract
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofRequest<'a> {
    pub max_epoch: u64,
    pub jwt_randomness: &'a str,
    pub extended_ephemeral_public_key: &'a str,
    pub jwt: &'a str,
    pub salt: &'a str,
    pub key_claim_name: &'a str,
}

/// Zero-knowledge-proof-issuing collaborator
#[async_trait]
pub trait ProofService: Send + Sync {
    /// Exchange the proof request for an opaque proof-input bundle
    async fn fetch_proof(&self, request: &ProofRequest<'_>) -> Result<ZkProofBundle, ServiceError>;
}

/// HTTP implementation of the proving-service contract
pub struct HttpProofService {
    url: String,
    client: Client,
    timeout: Duration,
}

impl HttpProofService {
    /// Create a client for the given endpoint with a bounded request timeout
    ///
    /// Proof generation can take several seconds; the timeout should leave
    /// headroom above the service's normal latency.
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
impl ProofService for HttpProofService {
    async fn fetch_proof(&self, request: &ProofRequest<'_>) -> Result<ZkProofBundle, ServiceError> {
        let timeout_ms = self.timeout.as_millis() as u64;

        debug!("⏳ Requesting ZK proof (maxEpoch: {})", request.max_epoch);

        let response = self
            .client
            .post(&self.url)
            .json(request)
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

        let bundle: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| ServiceError::MalformedBody {
                    service: SERVICE_NAME,
                    message: e.to_string(),
                })?;

        debug!("✅ Proving service success");
        Ok(ZkProofBundle(bundle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_contract_field_names() {
        let request = ProofRequest {
            max_epoch: 12,
            jwt_randomness: "9999",
            extended_ephemeral_public_key: "AJxg==",
            jwt: "a.b.c",
            salt: "42",
            key_claim_name: "sub",
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["maxEpoch"], 12);
        assert_eq!(body["jwtRandomness"], "9999");
        assert_eq!(body["extendedEphemeralPublicKey"], "AJxg==");
        assert_eq!(body["jwt"], "a.b.c");
        assert_eq!(body["salt"], "42");
        assert_eq!(body["keyClaimName"], "sub");
    }
}
