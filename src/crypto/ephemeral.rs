// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Ephemeral Key Manager
//!
//! Generates and reconstructs the short-lived Ed25519 keypair that backs a
//! zkLogin session. The keypair is only valid until the session's max epoch;
//! it is never a long-term account key.
//!
//! String encodings used throughout the session subsystem:
//! - private key: base64 of the 32-byte secret
//! - extended public key: base64 of (scheme flag byte || 32-byte public key),
//!   the form the proving service consumes

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use rand::Rng;

use super::error::CryptoError;

/// Signature-scheme flag byte prepended to the public key in its extended
/// encoding. Ed25519 on the target ledger.
pub const ED25519_SCHEME_FLAG: u8 = 0x00;

/// Short-lived Ed25519 keypair for a single login session
#[derive(Clone)]
pub struct EphemeralKeyPair {
    signing_key: SigningKey,
}

impl EphemeralKeyPair {
    /// Generate a fresh keypair from the OS entropy source
    ///
    /// Entropy failure aborts the process; there is no recovery path for a
    /// login attempt without fresh key material.
    pub fn generate() -> Self {
        let mut secret_bytes = [0u8; 32];
        OsRng.fill(&mut secret_bytes);
        let signing_key = SigningKey::from_bytes(&secret_bytes);

        Self { signing_key }
    }

    /// Reconstruct a keypair from its persisted private-key encoding
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKey` if the encoding is not valid base64
    /// or does not hold exactly 32 bytes.
    pub fn from_encoded(private_key: &str) -> Result<Self, CryptoError> {
        let bytes = BASE64
            .decode(private_key)
            .map_err(|e| CryptoError::InvalidKey {
                key_type: "ephemeral_private_key".to_string(),
                reason: format!("base64 decode failed: {}", e),
            })?;

        let secret_bytes: [u8; 32] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| CryptoError::InvalidKey {
                    key_type: "ephemeral_private_key".to_string(),
                    reason: format!("expected 32 bytes, got {}", bytes.len()),
                })?;

        Ok(Self {
            signing_key: SigningKey::from_bytes(&secret_bytes),
        })
    }

    /// Base64 encoding of the 32-byte secret, the form persisted in SetupData
    pub fn encoded_private(&self) -> String {
        BASE64.encode(self.signing_key.to_bytes())
    }

    /// Extended public key: base64 of (scheme flag || public key bytes)
    pub fn extended_public(&self) -> String {
        let verifying_key: VerifyingKey = self.signing_key.verifying_key();

        let mut extended = Vec::with_capacity(33);
        extended.push(ED25519_SCHEME_FLAG);
        extended.extend_from_slice(verifying_key.as_bytes());

        BASE64.encode(extended)
    }

    /// Sign arbitrary payload bytes with the ephemeral key
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message)
    }

    /// Verifying half of the keypair
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }
}

impl std::fmt::Debug for EphemeralKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Secret material stays out of debug output
        f.debug_struct("EphemeralKeyPair")
            .field("public", &self.extended_public())
            .finish()
    }
}
