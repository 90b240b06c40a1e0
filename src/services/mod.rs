// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Proof Exchange Clients
//!
//! Request/response clients for the two external services that turn a raw
//! identity token into usable zero-knowledge inputs:
//!
//! - **Salt service**: identity token → per-user salt
//! - **Proving service**: token + ephemeral-key material → proof bundle
//!
//! Every failure mode (network error, timeout, non-2xx, malformed body)
//! surfaces as a typed `ServiceError`; the session state machine converts
//! any of them into an abort of the current completion attempt. Neither
//! client retries.

pub mod prover;
pub mod salt;

use thiserror::Error;

/// Errors from the salt and proving service clients
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request never produced a response (DNS, connect, TLS, ...)
    #[error("Request to {service} failed: {message}")]
    Transport {
        /// Which service was called
        service: &'static str,
        message: String,
    },

    /// Request exceeded the configured timeout
    #[error("{service} timed out after {timeout_ms}ms")]
    Timeout {
        service: &'static str,
        timeout_ms: u64,
    },

    /// Service answered with a non-success status
    #[error("{service} returned {status}: {message}")]
    Status {
        service: &'static str,
        /// HTTP status code
        status: u16,
        message: String,
    },

    /// Response body did not match the service contract
    #[error("Malformed {service} response: {message}")]
    MalformedBody {
        service: &'static str,
        message: String,
    },
}

impl ServiceError {
    pub(crate) fn from_reqwest(service: &'static str, timeout_ms: u64, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceError::Timeout {
                service,
                timeout_ms,
            }
        } else {
            ServiceError::Transport {
                service,
                message: err.to_string(),
            }
        }
    }
}

pub use prover::{HttpProofService, ProofRequest, ProofService};
pub use salt::{HttpSaltService, SaltService};
