// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for the zkLogin session subsystem
//!
//! Wire and storage formats use camelCase field names; the persisted JSON is
//! the same shape the proving service and the session store consume.

use serde::{Deserialize, Serialize};
use url::Url;

/// OpenID Connect identity providers supported for login
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpenIdProvider {
    Google,
    Facebook,
    Twitch,
}

impl OpenIdProvider {
    /// Provider name used in logs and CLI arguments
    pub fn name(&self) -> &'static str {
        match self {
            OpenIdProvider::Google => "Google",
            OpenIdProvider::Facebook => "Facebook",
            OpenIdProvider::Twitch => "Twitch",
        }
    }

    /// Authorization endpoint the login redirect targets
    pub fn authorization_endpoint(&self) -> &'static str {
        match self {
            OpenIdProvider::Google => "https://accounts.google.com/o/oauth2/v2/auth",
            OpenIdProvider::Facebook => "https://www.facebook.com/v18.0/dialog/oauth",
            OpenIdProvider::Twitch => "https://id.twitch.tv/oauth2/authorize",
        }
    }

    /// Provider-specific query parameters beyond the common OIDC set
    pub fn extra_params(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            OpenIdProvider::Google | OpenIdProvider::Facebook => &[],
            OpenIdProvider::Twitch => &[
                ("force_verify", "true"),
                ("lang", "en"),
                ("login_type", "zk-login"),
            ],
        }
    }

    /// Build the full authorization URL for this provider
    ///
    /// Common parameters: `nonce`, `redirect_uri`, `response_type=id_token`,
    /// `scope=openid`, `client_id`; provider extras appended after.
    pub fn authorization_url(&self, client_id: &str, redirect_uri: &str, nonce: &str) -> String {
        let mut url = Url::parse(self.authorization_endpoint())
            .expect("provider authorization endpoints are valid URLs");

        url.query_pairs_mut()
            .append_pair("nonce", nonce)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("response_type", "id_token")
            .append_pair("scope", "openid")
            .append_pair("client_id", client_id);

        for (key, value) in self.extra_params() {
            url.query_pairs_mut().append_pair(key, value);
        }

        url.to_string()
    }

    /// Parse a provider from its CLI/display name
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "google" => Some(OpenIdProvider::Google),
            "facebook" => Some(OpenIdProvider::Facebook),
            "twitch" => Some(OpenIdProvider::Twitch),
            _ => None,
        }
    }
}

/// Opaque proof-input bundle returned by the proving service
///
/// Passed through to signature composition untouched. The `addressSeed`
/// input is never part of the bundle; it is recomputed at signing time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZkProofBundle(pub serde_json::Value);

/// Transient state persisted between the two legs of the login redirect
///
/// Created by `begin_login`, consumed exactly once by `complete_login`.
/// Only one instance exists at a time; a new login overwrites it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupData {
    pub provider: OpenIdProvider,
    /// Ledger epoch after which the ephemeral key is invalid
    pub max_epoch: u64,
    /// Decimal-encoded randomness used in nonce derivation
    pub randomness: String,
    /// Extended ephemeral public key (base64, flag byte included)
    pub ephemeral_public_key: String,
    /// Ephemeral private key (base64 of the 32-byte secret)
    pub ephemeral_private_key: String,
}

/// Established session: everything needed to sign transactions until expiry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountData {
    pub provider: OpenIdProvider,
    /// Derived ledger address (deterministic in {identity token, salt})
    pub user_addr: String,
    /// Proof inputs from the proving service, minus the address seed
    pub zk_proofs: ZkProofBundle,
    pub ephemeral_public_key: String,
    pub ephemeral_private_key: String,
    /// Salt-service value; stable per identity so the address stays stable
    pub user_salt: String,
    /// Subject claim, kept to regenerate the address seed at signing time
    pub sub: String,
    /// Audience claim, kept for the same reason
    pub aud: String,
    pub max_epoch: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_url_carries_common_params() {
        let url = OpenIdProvider::Google.authorization_url("client-123", "https://dex.example", "n0nce");

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("nonce=n0nce"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fdex.example"));
        assert!(url.contains("response_type=id_token"));
        assert!(url.contains("scope=openid"));
        assert!(url.contains("client_id=client-123"));
    }

    #[test]
    fn test_twitch_url_carries_extras() {
        let url = OpenIdProvider::Twitch.authorization_url("tw-client", "https://dex.example", "n");

        assert!(url.starts_with("https://id.twitch.tv/oauth2/authorize?"));
        assert!(url.contains("force_verify=true"));
        assert!(url.contains("lang=en"));
        assert!(url.contains("login_type=zk-login"));
    }

    #[test]
    fn test_google_url_has_no_extras() {
        let url = OpenIdProvider::Google.authorization_url("c", "r", "n");
        assert!(!url.contains("force_verify"));
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!(OpenIdProvider::parse("google"), Some(OpenIdProvider::Google));
        assert_eq!(OpenIdProvider::parse("Twitch"), Some(OpenIdProvider::Twitch));
        assert_eq!(OpenIdProvider::parse("github"), None);
    }

    #[test]
    fn test_setup_data_serializes_camel_case() {
        let setup = SetupData {
            provider: OpenIdProvider::Google,
            max_epoch: 12,
            randomness: "42".to_string(),
            ephemeral_public_key: "pub".to_string(),
            ephemeral_private_key: "priv".to_string(),
        };

        let json = serde_json::to_value(&setup).unwrap();
        assert_eq!(json["maxEpoch"], 12);
        assert_eq!(json["ephemeralPublicKey"], "pub");
        assert_eq!(json["provider"], "Google");
    }

    #[test]
    fn test_account_data_roundtrip() {
        let account = AccountData {
            provider: OpenIdProvider::Twitch,
            user_addr: "0xabc".to_string(),
            zk_proofs: ZkProofBundle(serde_json::json!({"a": 1, "b": 2})),
            ephemeral_public_key: "pub".to_string(),
            ephemeral_private_key: "priv".to_string(),
            user_salt: "42".to_string(),
            sub: "u1".to_string(),
            aud: "client-x".to_string(),
            max_epoch: 12,
        };

        let json = serde_json::to_string(&account).unwrap();
        let back: AccountData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, account);
        assert!(json.contains("\"userSalt\":\"42\""));
    }
}
