// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Session Cryptography Module
//!
//! Cryptographic primitives backing the zkLogin session subsystem:
//!
//! - **Ephemeral**: short-lived Ed25519 keypair generation and encoding
//! - **Nonce**: randomness generation and OIDC nonce derivation
//! - **Address**: deterministic address-seed and user-address derivation
//!
//! The nonce and address derivations are pure functions; everything the
//! ledger treats as a native primitive is isolated here so a different
//! backend can replace it without touching the session state machine.

pub mod address;
pub mod ephemeral;
pub mod error;
pub mod nonce;

pub use address::{derive_address_seed, derive_user_address, ZKLOGIN_SCHEME_FLAG};
pub use ephemeral::{EphemeralKeyPair, ED25519_SCHEME_FLAG};
pub use error::CryptoError;
pub use nonce::{derive_nonce, generate_randomness};
