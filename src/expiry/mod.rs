// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Expiry Monitor
//!
//! Watches the ledger epoch and invalidates the session once the ephemeral
//! key's validity window elapses. When the observed epoch exceeds the
//! session's max epoch, both store slots are wiped together: a stale
//! ephemeral key cannot produce valid signatures regardless of which slot
//! it lives in.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::config::WalletConfig;
use crate::ledger::LedgerGateway;
use crate::session::store::SessionStore;

/// Periodic epoch watcher that clears expired sessions
pub struct ExpiryMonitor {
    gateway: Arc<dyn LedgerGateway>,
    store: Arc<dyn SessionStore>,
    config: WalletConfig,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl ExpiryMonitor {
    pub fn new(
        gateway: Arc<dyn LedgerGateway>,
        store: Arc<dyn SessionStore>,
        config: WalletConfig,
    ) -> Self {
        Self {
            gateway,
            store,
            config,
            handle: Mutex::new(None),
        }
    }

    /// Start the polling task; a second call is a no-op while one is running
    pub async fn start(&self) {
        let mut handle = self.handle.lock().await;
        if handle.is_some() {
            return;
        }

        info!(
            "Starting session expiry monitor (interval: {:?})",
            self.config.epoch_check_interval
        );

        let gateway = self.gateway.clone();
        let store = self.store.clone();
        let check_interval = self.config.epoch_check_interval;

        *handle = Some(tokio::spawn(async move {
            let mut ticker = interval(check_interval);
            loop {
                ticker.tick().await;
                Self::check_once(gateway.as_ref(), store.as_ref()).await;
            }
        }));
    }

    /// Stop the polling task
    pub async fn stop(&self) {
        if let Some(handle) = self.handle.lock().await.take() {
            debug!("Stopping session expiry monitor");
            handle.abort();
        }
    }

    /// Single expiry check; returns true when the session was cleared
    ///
    /// Split out of the polling loop so tests can drive it deterministically.
    pub async fn check_once(gateway: &dyn LedgerGateway, store: &dyn SessionStore) -> bool {
        // Account data is the primary validity clock; residual setup data
        // shares its invalidation
        let max_epoch = match store.load_account().await {
            Some(account) => account.max_epoch,
            None => match store.load_setup().await {
                Some(setup) => setup.max_epoch,
                None => return false,
            },
        };

        let epoch = match gateway.current_epoch().await {
            Ok(epoch) => epoch,
            Err(e) => {
                warn!("Epoch check failed, keeping session: {}", e);
                return false;
            }
        };

        if epoch > max_epoch {
            info!(
                "🗑️ Session expired (epoch {} > maxEpoch {}), clearing",
                epoch, max_epoch
            );
            store.clear().await;
            return true;
        }

        debug!("Session still valid (epoch {} <= maxEpoch {})", epoch, max_epoch);
        false
    }
}
