// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Randomness and nonce derivation for the OIDC handshake.
//!
//! The nonce embedded in the authorization request is a deterministic
//! function of {extended ephemeral public key, max epoch, randomness}. The
//! identity provider echoes it back inside the signed token, which binds the
//! token to this specific ephemeral key and validity window.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Generate the per-login randomness value, encoded as a decimal string
///
/// 128 bits from the OS entropy source. The decimal encoding is what the
/// proving service expects in its `jwtRandomness` field.
pub fn generate_randomness() -> String {
    let value: u128 = OsRng.gen();
    value.to_string()
}

/// Derive the OIDC nonce from the session's binding inputs
///
/// SHA-256 over the three inputs in fixed order, with each field length
/// prefixed so the encoding is injective, then base64-url without padding
/// (the character set providers accept in a `nonce` parameter).
pub fn derive_nonce(extended_public_key: &str, max_epoch: u64, randomness: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update((extended_public_key.len() as u64).to_be_bytes());
    hasher.update(extended_public_key.as_bytes());
    hasher.update(max_epoch.to_be_bytes());
    hasher.update((randomness.len() as u64).to_be_bytes());
    hasher.update(randomness.as_bytes());

    URL_SAFE_NO_PAD.encode(hasher.finalize())
}
