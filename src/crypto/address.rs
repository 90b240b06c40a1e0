// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Ledger address derivation for zkLogin accounts.
//!
//! Both functions are pure: for a fixed identity token and salt they always
//! produce the same output, which is what keeps a user's address stable
//! across logins. The address seed is recomputed at signing time and never
//! persisted.

use sha2::{Digest, Sha256};

/// Address-scheme flag byte for zkLogin-derived addresses
pub const ZKLOGIN_SCHEME_FLAG: u8 = 0x05;

fn update_length_prefixed(hasher: &mut Sha256, field: &str) {
    hasher.update((field.len() as u64).to_be_bytes());
    hasher.update(field.as_bytes());
}

/// Derive the address seed binding the user's salt to their identity claims
///
/// Inputs are length prefixed so the encoding is injective. Returned as a
/// hex string; the value is sensitive-adjacent and is intentionally
/// regenerated on demand rather than stored.
pub fn derive_address_seed(salt: &str, key_claim_name: &str, sub: &str, aud: &str) -> String {
    let mut hasher = Sha256::new();
    update_length_prefixed(&mut hasher, salt);
    update_length_prefixed(&mut hasher, key_claim_name);
    update_length_prefixed(&mut hasher, sub);
    update_length_prefixed(&mut hasher, aud);

    hex::encode(hasher.finalize())
}

/// Derive the user's ledger address from the token issuer and address seed
///
/// 0x-prefixed hex of SHA-256 over (scheme flag || length-prefixed issuer ||
/// address seed).
pub fn derive_user_address(iss: &str, address_seed: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update([ZKLOGIN_SCHEME_FLAG]);
    update_length_prefixed(&mut hasher, iss);
    hasher.update(address_seed.as_bytes());

    format!("0x{}", hex::encode(hasher.finalize()))
}
