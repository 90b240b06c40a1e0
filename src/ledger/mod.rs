// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Ledger Gateway
//!
//! Narrow request/response surface to the ledger fullnode: epoch lookup,
//! transaction submission and balance queries. Everything else about the
//! chain (consensus, object model, Move runtime) is out of scope and stays
//! behind this seam.

pub mod gateway;

use thiserror::Error;

/// Errors from the ledger gateway transport
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Request never produced a response
    #[error("Ledger request failed: {0}")]
    Transport(String),

    /// The node answered with a JSON-RPC error object
    #[error("Ledger RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Response body did not match the expected shape
    #[error("Malformed ledger response: {0}")]
    MalformedResponse(String),
}

pub use gateway::{
    Balance, ExecutionStatus, JsonRpcGateway, LedgerGateway, TransactionResponse,
};

#[cfg(test)]
pub use gateway::MockLedgerGateway;
