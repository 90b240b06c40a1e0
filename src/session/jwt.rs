// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Local identity-token claim extraction.
//!
//! Decodes the payload segment of the OIDC token without verifying the
//! signature. Verification is delegated to the proving service, which must
//! reject tokens it cannot validate; the claims here only feed address
//! derivation and session bookkeeping.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use thiserror::Error;

/// Errors from local token decoding
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Invalid token format: {0}")]
    InvalidFormat(String),

    #[error("Missing required claim: {0}")]
    MissingClaim(&'static str),
}

/// Audience claim, which providers emit as a string or an array
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

impl Audience {
    /// First audience value; the one bound into the session
    pub fn primary(&self) -> Option<&str> {
        match self {
            Audience::One(aud) => Some(aud.as_str()),
            Audience::Many(auds) => auds.first().map(|s| s.as_str()),
        }
    }
}

/// Claims the session subsystem needs from the identity token
#[derive(Debug, Clone, Deserialize)]
pub struct IdTokenClaims {
    pub iss: String,
    pub sub: String,
    pub aud: Audience,
}

/// Decode the claims segment of an identity token
///
/// Splits on '.', base64-url decodes the payload, and parses it as JSON.
/// Requires `iss`, `sub` and a non-empty `aud`; no signature check is
/// performed here.
pub fn decode_id_token_claims(token: &str) -> Result<IdTokenClaims, TokenError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(TokenError::InvalidFormat(format!(
            "expected 3 segments, got {}",
            parts.len()
        )));
    }

    let payload_bytes = URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|e| TokenError::InvalidFormat(format!("payload decode failed: {}", e)))?;

    let claims: IdTokenClaims = serde_json::from_slice(&payload_bytes)
        .map_err(|e| TokenError::InvalidFormat(format!("claims parse failed: {}", e)))?;

    if claims.iss.is_empty() {
        return Err(TokenError::MissingClaim("iss"));
    }
    if claims.sub.is_empty() {
        return Err(TokenError::MissingClaim("sub"));
    }
    if claims.aud.primary().map_or(true, |aud| aud.is_empty()) {
        return Err(TokenError::MissingClaim("aud"));
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_token(payload: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(b"{\"alg\":\"RS256\",\"typ\":\"JWT\"}");
        let body = URL_SAFE_NO_PAD.encode(payload.as_bytes());
        format!("{}.{}.signature", header, body)
    }

    #[test]
    fn test_decode_valid_token() {
        let token = encode_token(
            r#"{"iss":"https://accounts.google.com","sub":"u1","aud":"client-x","exp":1}"#,
        );

        let claims = decode_id_token_claims(&token).unwrap();
        assert_eq!(claims.iss, "https://accounts.google.com");
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.aud.primary(), Some("client-x"));
    }

    #[test]
    fn test_decode_array_audience() {
        let token = encode_token(r#"{"iss":"i","sub":"s","aud":["client-x","client-y"]}"#);

        let claims = decode_id_token_claims(&token).unwrap();
        assert_eq!(claims.aud.primary(), Some("client-x"));
    }

    #[test]
    fn test_rejects_wrong_segment_count() {
        let result = decode_id_token_claims("only.two");
        assert!(matches!(result, Err(TokenError::InvalidFormat(_))));
    }

    #[test]
    fn test_rejects_non_json_payload() {
        let header = URL_SAFE_NO_PAD.encode(b"{\"alg\":\"RS256\"}");
        let body = URL_SAFE_NO_PAD.encode(b"not-json");
        let token = format!("{}.{}.sig", header, body);

        assert!(matches!(
            decode_id_token_claims(&token),
            Err(TokenError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_missing_sub() {
        let token = encode_token(r#"{"iss":"i","sub":"","aud":"a"}"#);
        assert!(matches!(
            decode_id_token_claims(&token),
            Err(TokenError::MissingClaim("sub"))
        ));
    }

    #[test]
    fn test_rejects_empty_audience_list() {
        let token = encode_token(r#"{"iss":"i","sub":"s","aud":[]}"#);
        assert!(matches!(
            decode_id_token_claims(&token),
            Err(TokenError::MissingClaim("aud"))
        ));
    }
}
