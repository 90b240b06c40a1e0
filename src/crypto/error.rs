// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for session cryptography.

use thiserror::Error;

/// Errors raised by keypair handling and the derivation primitives
#[derive(Debug, Clone, Error)]
pub enum CryptoError {
    /// A persisted key encoding could not be decoded or has the wrong size
    #[error("Invalid key ({key_type}): {reason}")]
    InvalidKey {
        /// Which key failed (e.g. "ephemeral_private_key")
        key_type: String,
        /// Specific failure reason
        reason: String,
    },

    /// A string-encoded value failed to decode
    #[error("Invalid encoding for {field}: {reason}")]
    InvalidEncoding {
        /// Which field failed to decode
        field: String,
        /// Specific failure reason
        reason: String,
    },
}
