// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Transaction Signing Module
//!
//! Turns an established zkLogin session plus an externally built payload
//! into signed bytes and a composite signature, and submits them through
//! the ledger gateway. This is the one place in the subsystem that raises a
//! distinguished error type: callers need to tell "the chain rejected it"
//! apart from "the inputs were bad" for user-facing messaging.

pub mod signer;

use thiserror::Error;

use crate::crypto::CryptoError;
use crate::ledger::GatewayError;

/// Errors from signing and submitting transactions
#[derive(Debug, Error)]
pub enum TransactionError {
    /// Persisted session data could not be used for signing
    #[error("Invalid account data: {0}")]
    InvalidAccount(String),

    /// The ledger executed the transaction and reported non-success
    #[error("Ledger rejected transaction {digest}: {reason}")]
    ExecutionFailed { digest: String, reason: String },

    /// Submission never reached a verdict
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl From<CryptoError> for TransactionError {
    fn from(err: CryptoError) -> Self {
        TransactionError::InvalidAccount(err.to_string())
    }
}

pub use signer::{SignedTransaction, TransactionPayload, ZkLoginSigner};
