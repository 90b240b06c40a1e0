// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fullnode JSON-RPC client and the `LedgerGateway` trait.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

use super::GatewayError;

/// Coin balance owned by an address
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub coin_type: String,
    pub total_balance: String,
}

/// Outcome the ledger reports for an executed transaction
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionStatus {
    Success,
    Failure { error: String },
}

impl ExecutionStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionStatus::Success)
    }
}

/// Effects summary returned from transaction submission
#[derive(Debug, Clone)]
pub struct TransactionResponse {
    pub digest: String,
    pub status: ExecutionStatus,
}

/// Ledger collaborator: epoch clock, submission, balance queries
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Current ledger epoch
    async fn current_epoch(&self) -> Result<u64, GatewayError>;

    /// Submit signed transaction bytes with a serialized signature
    async fn execute_transaction(
        &self,
        tx_bytes: &str,
        signature: &str,
    ) -> Result<TransactionResponse, GatewayError>;

    /// Coin balances for an address
    async fn get_balances(&self, address: &str) -> Result<Vec<Balance>, GatewayError>;
}

/// JSON-RPC 2.0 client against the fullnode URL
pub struct JsonRpcGateway {
    url: String,
    client: Client,
}

impl JsonRpcGateway {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            url: url.into(),
            client,
        }
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, GatewayError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let envelope: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

        if let Some(error) = envelope.get("error") {
            return Err(GatewayError::Rpc {
                code: error.get("code").and_then(Value::as_i64).unwrap_or(0),
                message: error
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string(),
            });
        }

        envelope
            .get("result")
            .cloned()
            .ok_or_else(|| GatewayError::MalformedResponse("missing result field".to_string()))
    }
}

#[async_trait]
impl LedgerGateway for JsonRpcGateway {
    async fn current_epoch(&self) -> Result<u64, GatewayError> {
        let result = self
            .call("suix_getLatestSuiSystemState", json!([]))
            .await?;

        // The node encodes the epoch as a decimal string
        let epoch = result
            .get("epoch")
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<u64>().ok())
            .ok_or_else(|| {
                GatewayError::MalformedResponse("system state missing epoch".to_string())
            })?;

        debug!("Ledger epoch: {}", epoch);
        Ok(epoch)
    }

    async fn execute_transaction(
        &self,
        tx_bytes: &str,
        signature: &str,
    ) -> Result<TransactionResponse, GatewayError> {
        let result = self
            .call(
                "sui_executeTransactionBlock",
                json!([
                    tx_bytes,
                    [signature],
                    { "showEffects": true },
                    "WaitForEffectsCert",
                ]),
            )
            .await?;

        let digest = result
            .get("digest")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let status_obj = result
            .pointer("/effects/status")
            .ok_or_else(|| GatewayError::MalformedResponse("missing effects status".to_string()))?;

        let status = match status_obj.get("status").and_then(Value::as_str) {
            Some("success") => ExecutionStatus::Success,
            Some(_) => ExecutionStatus::Failure {
                error: status_obj
                    .get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("execution failed")
                    .to_string(),
            },
            None => {
                return Err(GatewayError::MalformedResponse(
                    "effects status missing status field".to_string(),
                ))
            }
        };

        Ok(TransactionResponse { digest, status })
    }

    async fn get_balances(&self, address: &str) -> Result<Vec<Balance>, GatewayError> {
        let result = self.call("suix_getAllBalances", json!([address])).await?;

        serde_json::from_value(result)
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))
    }
}
