// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Session Store
//!
//! Durable single-slot persistence for the login flow: one setup slot for
//! the state carried across the OIDC redirect, one account slot for the
//! established session. No history, no multi-account support.
//!
//! Loads treat malformed payloads as absent and never raise; `clear` wipes
//! both slots. Single writer per process is assumed; two processes racing
//! on the same session directory are not defended against.

use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::types::{AccountData, SetupData};

const SETUP_FILE: &str = "setup.json";
const ACCOUNT_FILE: &str = "account.json";

/// Trait for session persistence backends
///
/// Injected into the login flow and the expiry monitor so the single-writer
/// assumption stays testable and the backend swappable.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Overwrite the setup slot
    async fn save_setup(&self, data: &SetupData) -> Result<()>;

    /// Load the setup slot; absent or malformed payloads return None
    async fn load_setup(&self) -> Option<SetupData>;

    /// Overwrite the account slot
    async fn save_account(&self, data: &AccountData) -> Result<()>;

    /// Load the account slot; absent or malformed payloads return None
    async fn load_account(&self) -> Option<AccountData>;

    /// Delete both slots (best effort, per slot)
    async fn clear(&self);
}

/// File-based session store: one JSON file per slot under a base directory
pub struct FileSessionStore {
    base_path: PathBuf,
}

impl FileSessionStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn slot_path(&self, file: &str) -> PathBuf {
        self.base_path.join(file)
    }

    async fn write_slot<T: serde::Serialize>(&self, file: &str, data: &T) -> Result<()> {
        if !self.base_path.exists() {
            fs::create_dir_all(&self.base_path).await?;
        }

        let path = self.slot_path(file);
        let json = serde_json::to_string_pretty(data)?;

        // Write atomically using a temp file
        let temp_path = path.with_extension("tmp");
        let mut f = fs::File::create(&temp_path).await?;
        f.write_all(json.as_bytes()).await?;
        f.sync_all().await?;
        fs::rename(temp_path, path).await?;

        Ok(())
    }

    async fn read_slot<T: serde::de::DeserializeOwned>(&self, file: &str) -> Option<T> {
        let path = self.slot_path(file);
        let contents = match fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(_) => return None,
        };

        match serde_json::from_str(&contents) {
            Ok(data) => Some(data),
            Err(e) => {
                warn!("⚠️ Malformed session slot {:?}, treating as absent: {}", path, e);
                None
            }
        }
    }

    async fn remove_slot(&self, file: &str) {
        let path = self.slot_path(file);
        if let Err(e) = fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove session slot {:?}: {}", path, e);
            }
        }
    }

    /// Base directory holding the slot files
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn save_setup(&self, data: &SetupData) -> Result<()> {
        debug!("📥 Saving login setup (provider: {})", data.provider.name());
        self.write_slot(SETUP_FILE, data).await
    }

    async fn load_setup(&self) -> Option<SetupData> {
        self.read_slot(SETUP_FILE).await
    }

    async fn save_account(&self, data: &AccountData) -> Result<()> {
        debug!("📥 Saving account session for {}", data.user_addr);
        self.write_slot(ACCOUNT_FILE, data).await
    }

    async fn load_account(&self) -> Option<AccountData> {
        self.read_slot(ACCOUNT_FILE).await
    }

    async fn clear(&self) {
        debug!("🗑️ Clearing session slots");
        self.remove_slot(SETUP_FILE).await;
        self.remove_slot(ACCOUNT_FILE).await;
    }
}

/// In-memory session store for tests and embedding
#[derive(Default)]
pub struct MemorySessionStore {
    setup: RwLock<Option<SetupData>>,
    account: RwLock<Option<AccountData>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn save_setup(&self, data: &SetupData) -> Result<()> {
        *self.setup.write().await = Some(data.clone());
        Ok(())
    }

    async fn load_setup(&self) -> Option<SetupData> {
        self.setup.read().await.clone()
    }

    async fn save_account(&self, data: &AccountData) -> Result<()> {
        *self.account.write().await = Some(data.clone());
        Ok(())
    }

    async fn load_account(&self) -> Option<AccountData> {
        self.account.read().await.clone()
    }

    async fn clear(&self) {
        *self.setup.write().await = None;
        *self.account.write().await = None;
    }
}
