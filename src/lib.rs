// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod cli;
pub mod config;
pub mod crypto;
pub mod expiry;
pub mod ledger;
pub mod services;
pub mod session;
pub mod tx;

// Re-export main types
pub use config::WalletConfig;
pub use crypto::{derive_address_seed, derive_user_address, EphemeralKeyPair};
pub use expiry::ExpiryMonitor;
pub use ledger::{
    Balance, ExecutionStatus, GatewayError, JsonRpcGateway, LedgerGateway, TransactionResponse,
};
pub use services::{
    HttpProofService, HttpSaltService, ProofRequest, ProofService, SaltService, ServiceError,
};
pub use session::{
    AccountData, FileSessionStore, LoginRedirect, MemorySessionStore, Navigator, OpenIdProvider,
    RedirectBuffer, SessionStore, SetupData, ZkLoginFlow, ZkProofBundle,
};
pub use tx::{SignedTransaction, TransactionError, TransactionPayload, ZkLoginSigner};
