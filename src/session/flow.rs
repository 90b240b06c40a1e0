// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! zkLogin flow orchestration.
//!
//! `begin_login` runs the pre-redirect leg: epoch lookup, ephemeral key and
//! nonce generation, setup persistence, authorization-URL handoff. It fails
//! closed: if the epoch lookup fails nothing is persisted and no redirect
//! happens.
//!
//! `complete_login` runs the post-redirect leg as a strictly sequential
//! state machine: fragment extraction, local claim decoding, salt exchange,
//! address derivation, one-shot setup consumption, proof exchange, session
//! assembly. Every abort path returns `None` and leaves no partial durable
//! state; retry is only possible via a fresh `begin_login`.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::WalletConfig;
use crate::crypto::{derive_address_seed, derive_nonce, derive_user_address, generate_randomness,
    EphemeralKeyPair};
use crate::ledger::LedgerGateway;
use crate::services::{ProofRequest, ProofService, SaltService};
use crate::session::jwt::decode_id_token_claims;
use crate::session::navigator::Navigator;
use crate::session::store::SessionStore;
use crate::session::types::{AccountData, OpenIdProvider, SetupData};

/// Claim the proving service keys the proof on; fixed by its contract
pub const KEY_CLAIM_NAME: &str = "sub";

/// Outcome of the pre-redirect leg: where the browser was sent
#[derive(Debug, Clone)]
pub struct LoginRedirect {
    pub url: String,
    pub max_epoch: u64,
}

/// Orchestrates the login handshake across its injected collaborators
pub struct ZkLoginFlow {
    config: WalletConfig,
    store: Arc<dyn SessionStore>,
    gateway: Arc<dyn LedgerGateway>,
    salt_service: Arc<dyn SaltService>,
    proof_service: Arc<dyn ProofService>,
    navigator: Arc<dyn Navigator>,
}

impl ZkLoginFlow {
    pub fn new(
        config: WalletConfig,
        store: Arc<dyn SessionStore>,
        gateway: Arc<dyn LedgerGateway>,
        salt_service: Arc<dyn SaltService>,
        proof_service: Arc<dyn ProofService>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            config,
            store,
            gateway,
            salt_service,
            proof_service,
            navigator,
        }
    }

    /// Start a login: persist setup state and hand off to the provider
    ///
    /// The ephemeral key is valid until `current epoch + validity window`.
    /// The nonce binds the identity token the provider will issue to this
    /// specific key and window.
    ///
    /// # Errors
    ///
    /// Fails closed if the epoch lookup or setup persistence fails: no
    /// partial SetupData survives and no navigation happens.
    pub async fn begin_login(&self, provider: OpenIdProvider) -> Result<LoginRedirect> {
        info!("🔑 Logging in with {}...", provider.name());

        let epoch = self
            .gateway
            .current_epoch()
            .await
            .context("epoch lookup failed, aborting login")?;
        let max_epoch = epoch + self.config.validity_epochs;

        let keypair = EphemeralKeyPair::generate();
        let randomness = generate_randomness();
        let nonce = derive_nonce(&keypair.extended_public(), max_epoch, &randomness);

        let setup = SetupData {
            provider,
            max_epoch,
            randomness,
            ephemeral_public_key: keypair.extended_public(),
            ephemeral_private_key: keypair.encoded_private(),
        };
        self.store
            .save_setup(&setup)
            .await
            .context("failed to persist login setup")?;

        let url = provider.authorization_url(
            self.config.client_id(provider),
            &self.config.redirect_uri,
            &nonce,
        );

        debug!("Login redirect prepared (maxEpoch: {})", max_epoch);
        self.navigator.navigate(&url);

        Ok(LoginRedirect { url, max_epoch })
    }

    /// Finish a login after the provider redirected back
    ///
    /// Returns the established session, or `None` on any abort: no pending
    /// redirect fragment (the normal case on a fresh start), missing
    /// claims, a failed salt or proof exchange, or setup state lost between
    /// the redirect legs. The caller persists the returned AccountData.
    pub async fn complete_login(&self) -> Option<AccountData> {
        // Taking the fragment strips it before the first await; a racing
        // second invocation observes no fragment and aborts harmlessly.
        let fragment = match self.navigator.take_fragment() {
            Some(fragment) => fragment,
            None => return None,
        };

        let jwt = match extract_id_token(&fragment) {
            Some(jwt) => jwt,
            None => return None,
        };

        let claims = match decode_id_token_claims(&jwt) {
            Ok(claims) => claims,
            Err(e) => {
                warn!("Login aborted: {}", e);
                return None;
            }
        };
        // Required claims are checked by the decoder; aud is non-empty here
        let aud = claims.aud.primary().unwrap_or_default().to_string();

        let salt = match self.salt_service.fetch_salt(&jwt).await {
            Ok(salt) => salt,
            Err(e) => {
                warn!("Login aborted: {}", e);
                return None;
            }
        };

        let address_seed = derive_address_seed(&salt, KEY_CLAIM_NAME, &claims.sub, &aud);
        let user_addr = derive_user_address(&claims.iss, &address_seed);

        let setup = match self.store.load_setup().await {
            Some(setup) => setup,
            None => {
                warn!("Login aborted: setup state lost between redirect legs");
                return None;
            }
        };
        // One-time use: consume the setup slot before the proof exchange
        self.store.clear().await;

        let request = ProofRequest {
            max_epoch: setup.max_epoch,
            jwt_randomness: &setup.randomness,
            extended_ephemeral_public_key: &setup.ephemeral_public_key,
            jwt: &jwt,
            salt: &salt,
            key_claim_name: KEY_CLAIM_NAME,
        };
        let zk_proofs = match self.proof_service.fetch_proof(&request).await {
            Ok(bundle) => bundle,
            Err(e) => {
                warn!("Login aborted: {}", e);
                return None;
            }
        };

        info!("✅ Session established for {}", user_addr);
        Some(AccountData {
            provider: setup.provider,
            user_addr,
            zk_proofs,
            ephemeral_public_key: setup.ephemeral_public_key,
            ephemeral_private_key: setup.ephemeral_private_key,
            user_salt: salt,
            sub: claims.sub,
            aud,
            max_epoch: setup.max_epoch,
        })
    }
}

/// Pull the `id_token` parameter out of a redirect-return fragment
fn extract_id_token(fragment: &str) -> Option<String> {
    url::form_urlencoded::parse(fragment.as_bytes())
        .find(|(key, _)| key == "id_token")
        .map(|(_, value)| value.into_owned())
}
