// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Composite transaction signing for zkLogin sessions.
//!
//! A zkLogin transaction is authorized by a composite signature: the proof
//! bundle from the proving service, the recomputed address seed, the max
//! epoch, and a conventional Ed25519 signature by the ephemeral key. The
//! address seed is derived fresh on every signing call and never persisted.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

use super::TransactionError;
use crate::crypto::{derive_address_seed, EphemeralKeyPair};
use crate::ledger::{LedgerGateway, TransactionResponse};
use crate::session::flow::KEY_CLAIM_NAME;
use crate::session::types::AccountData;

/// Transaction payload from an external builder, treated as opaque bytes
///
/// The wallet only sets the sender and signs; what the bytes mean is the
/// builder's business.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionPayload {
    sender: Option<String>,
    data: Vec<u8>,
}

impl TransactionPayload {
    pub fn new(data: Vec<u8>) -> Self {
        Self { sender: None, data }
    }

    pub fn set_sender(&mut self, sender: impl Into<String>) {
        self.sender = Some(sender.into());
    }

    pub fn sender(&self) -> Option<&str> {
        self.sender.as_deref()
    }

    /// Canonical byte encoding that gets signed and submitted
    ///
    /// Sender is length prefixed ahead of the payload bytes so the encoding
    /// is injective.
    pub fn signing_bytes(&self) -> Vec<u8> {
        let sender = self.sender.as_deref().unwrap_or_default();

        let mut bytes = Vec::with_capacity(8 + sender.len() + self.data.len());
        bytes.extend_from_slice(&(sender.len() as u64).to_be_bytes());
        bytes.extend_from_slice(sender.as_bytes());
        bytes.extend_from_slice(&self.data);
        bytes
    }
}

/// Signed transaction ready for submission to the ledger gateway
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    /// Base64 transaction bytes
    pub tx_bytes: String,
    /// Base64 serialized composite signature
    pub signature: String,
}

/// Signs transactions on behalf of an established zkLogin session
pub struct ZkLoginSigner {
    gateway: Arc<dyn LedgerGateway>,
}

impl ZkLoginSigner {
    pub fn new(gateway: Arc<dyn LedgerGateway>) -> Self {
        Self { gateway }
    }

    /// Produce signed bytes and the composite signature for a payload
    ///
    /// Sets the payload sender to the session address, signs with the
    /// reconstructed ephemeral key, recomputes the address seed from the
    /// persisted salt and claims, and assembles the composite signature.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::InvalidAccount` when the persisted key
    /// material or proof bundle cannot be used.
    pub fn sign_for_submission(
        &self,
        account: &AccountData,
        mut payload: TransactionPayload,
    ) -> Result<SignedTransaction, TransactionError> {
        payload.set_sender(&account.user_addr);

        let keypair = EphemeralKeyPair::from_encoded(&account.ephemeral_private_key)?;

        let signing_bytes = payload.signing_bytes();
        let user_signature = keypair.sign(&signing_bytes);

        let address_seed = derive_address_seed(
            &account.user_salt,
            KEY_CLAIM_NAME,
            &account.sub,
            &account.aud,
        );

        let mut inputs = match account.zk_proofs.0.clone() {
            Value::Object(map) => map,
            _ => {
                return Err(TransactionError::InvalidAccount(
                    "proof bundle is not a JSON object".to_string(),
                ))
            }
        };
        inputs.insert("addressSeed".to_string(), json!(address_seed));

        let composite = json!({
            "inputs": Value::Object(inputs),
            "maxEpoch": account.max_epoch,
            "userSignature": BASE64.encode(user_signature.to_bytes()),
        });
        let signature = BASE64.encode(serde_json::to_vec(&composite).expect("composite signature serializes"));

        debug!("Transaction signed for {}", account.user_addr);
        Ok(SignedTransaction {
            tx_bytes: BASE64.encode(signing_bytes),
            signature,
        })
    }

    /// Submit a signed transaction, refreshing caller state on every exit
    ///
    /// The `refresh` hook runs whether the submission succeeds, the ledger
    /// rejects the transaction, or the transport fails; balances are
    /// always re-read after a signing attempt. A ledger rejection is
    /// surfaced as the distinguished `ExecutionFailed` error so callers can
    /// tell on-chain failure apart from input errors.
    pub async fn submit_with_refresh<F, Fut>(
        &self,
        signed: &SignedTransaction,
        refresh: F,
    ) -> Result<TransactionResponse, TransactionError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        let result = self.execute(signed).await;
        refresh().await;
        result
    }

    async fn execute(
        &self,
        signed: &SignedTransaction,
    ) -> Result<TransactionResponse, TransactionError> {
        let response = self
            .gateway
            .execute_transaction(&signed.tx_bytes, &signed.signature)
            .await?;

        match &response.status {
            crate::ledger::ExecutionStatus::Success => {
                info!("✅ Transaction executed: {}", response.digest);
                Ok(response)
            }
            crate::ledger::ExecutionStatus::Failure { error } => {
                Err(TransactionError::ExecutionFailed {
                    digest: response.digest.clone(),
                    reason: error.clone(),
                })
            }
        }
    }
}
