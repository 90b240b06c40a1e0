// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! zkLogin Session Module
//!
//! Everything between "user clicks login" and "wallet holds a signing-ready
//! session":
//!
//! - **Types**: SetupData / AccountData and the provider enum
//! - **Store**: single-slot durable persistence across the redirect
//! - **Jwt**: local, verification-free claim extraction
//! - **Navigator**: browser-handoff seam with one-shot fragment reads
//! - **Flow**: the begin/complete state machine tying it together
//!
//! UI-facing code only observes the resulting `AccountData | None`; all
//! session state transitions happen behind `ZkLoginFlow`'s two operations.

pub mod flow;
pub mod jwt;
pub mod navigator;
pub mod store;
pub mod types;

pub use flow::{LoginRedirect, ZkLoginFlow, KEY_CLAIM_NAME};
pub use jwt::{decode_id_token_claims, Audience, IdTokenClaims, TokenError};
pub use navigator::{Navigator, RedirectBuffer};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
pub use types::{AccountData, OpenIdProvider, SetupData, ZkProofBundle};
