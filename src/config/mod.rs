// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Wallet configuration.
//!
//! All knobs the session subsystem needs, loadable from `ZKDEX_*`
//! environment variables with workable defaults for a devnet deployment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::session::types::OpenIdProvider;

/// Configuration for the zkLogin wallet
#[derive(Debug, Clone)]
pub struct WalletConfig {
    pub google_client_id: String,
    pub facebook_client_id: String,
    pub twitch_client_id: String,
    /// Redirect target registered with the identity providers
    pub redirect_uri: String,
    pub salt_service_url: String,
    pub prover_service_url: String,
    pub fullnode_url: String,
    /// Ephemeral-key validity window in epochs beyond the current one
    pub validity_epochs: u64,
    /// Bounded timeout for salt/prover requests
    pub service_timeout: Duration,
    /// Poll interval for the expiry monitor
    pub epoch_check_interval: Duration,
    /// Directory holding the persisted session slots
    pub session_dir: PathBuf,
}

impl Default for WalletConfig {
    fn default() -> Self {
        WalletConfig {
            google_client_id: String::new(),
            facebook_client_id: String::new(),
            twitch_client_id: String::new(),
            redirect_uri: "http://localhost:3000".to_string(),
            salt_service_url: "http://localhost:5002/get-salt".to_string(),
            prover_service_url: "http://localhost:5001/v1".to_string(),
            fullnode_url: "https://fullnode.devnet.sui.io:443".to_string(),
            validity_epochs: 2,
            service_timeout: Duration::from_secs(15), // proof generation takes seconds
            epoch_check_interval: Duration::from_secs(30),
            session_dir: PathBuf::from("./session"),
        }
    }
}

impl WalletConfig {
    /// Load configuration from `ZKDEX_*` environment variables
    ///
    /// Unset variables fall back to the defaults; numeric variables that
    /// fail to parse fall back as well.
    pub fn from_env() -> Self {
        let defaults = WalletConfig::default();

        let parse_secs = |var: &str, default: Duration| {
            env::var(var)
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(default)
        };

        WalletConfig {
            google_client_id: env::var("ZKDEX_CLIENT_ID_GOOGLE")
                .unwrap_or(defaults.google_client_id),
            facebook_client_id: env::var("ZKDEX_CLIENT_ID_FACEBOOK")
                .unwrap_or(defaults.facebook_client_id),
            twitch_client_id: env::var("ZKDEX_CLIENT_ID_TWITCH")
                .unwrap_or(defaults.twitch_client_id),
            redirect_uri: env::var("ZKDEX_REDIRECT_URI").unwrap_or(defaults.redirect_uri),
            salt_service_url: env::var("ZKDEX_SALT_SERVICE_URL")
                .unwrap_or(defaults.salt_service_url),
            prover_service_url: env::var("ZKDEX_PROVER_SERVICE_URL")
                .unwrap_or(defaults.prover_service_url),
            fullnode_url: env::var("ZKDEX_FULLNODE_URL").unwrap_or(defaults.fullnode_url),
            validity_epochs: env::var("ZKDEX_VALIDITY_EPOCHS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.validity_epochs),
            service_timeout: parse_secs("ZKDEX_SERVICE_TIMEOUT_SECS", defaults.service_timeout),
            epoch_check_interval: parse_secs(
                "ZKDEX_EPOCH_CHECK_INTERVAL_SECS",
                defaults.epoch_check_interval,
            ),
            session_dir: env::var("ZKDEX_SESSION_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_dir),
        }
    }

    /// Client identifier registered with the given provider
    pub fn client_id(&self, provider: OpenIdProvider) -> &str {
        match provider {
            OpenIdProvider::Google => &self.google_client_id,
            OpenIdProvider::Facebook => &self.facebook_client_id,
            OpenIdProvider::Twitch => &self.twitch_client_id,
        }
    }
}
