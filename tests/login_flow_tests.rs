// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! End-to-end login flow tests against throwaway HTTP services.
//!
//! The salt service, proving service and fullnode are stood up as local
//! axum servers, so the real reqwest clients and the JSON-RPC gateway are
//! exercised along with the state machine.

use axum::{routing::post, Json, Router};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use zkdex_wallet::{
    ExpiryMonitor, FileSessionStore, HttpProofService, HttpSaltService, JsonRpcGateway,
    OpenIdProvider, RedirectBuffer, SessionStore, TransactionPayload, WalletConfig, ZkLoginFlow,
    ZkLoginSigner,
};

async fn spawn_app(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Minimal fullnode double: epoch 10, successful execution, no balances
fn fullnode_router() -> Router {
    Router::new().route(
        "/",
        post(|Json(body): Json<Value>| async move {
            let result = match body["method"].as_str() {
                Some("suix_getLatestSuiSystemState") => json!({ "epoch": "10" }),
                Some("sui_executeTransactionBlock") => json!({
                    "digest": "D1GEST",
                    "effects": { "status": { "status": "success" } }
                }),
                Some("suix_getAllBalances") => json!([]),
                _ => Value::Null,
            };
            Json(json!({ "jsonrpc": "2.0", "id": 1, "result": result }))
        }),
    )
}

#[derive(Serialize)]
struct TestClaims {
    iss: String,
    sub: String,
    aud: String,
    exp: u64,
}

fn issue_token(sub: &str, aud: &str) -> String {
    let claims = TestClaims {
        iss: "https://accounts.google.com".to_string(),
        sub: sub.to_string(),
        aud: aud.to_string(),
        exp: 4_000_000_000,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"test-secret"),
    )
    .unwrap()
}

struct TestWallet {
    store: Arc<FileSessionStore>,
    navigator: Arc<RedirectBuffer>,
    gateway: Arc<JsonRpcGateway>,
    flow: ZkLoginFlow,
    _session_dir: tempfile::TempDir,
}

async fn build_wallet(salt_router: Router, prover_router: Router) -> TestWallet {
    let salt_url = spawn_app(salt_router).await;
    let prover_url = spawn_app(prover_router).await;
    let fullnode_url = spawn_app(fullnode_router()).await;

    let session_dir = tempfile::TempDir::new().unwrap();
    let timeout = Duration::from_secs(5);

    let config = WalletConfig {
        google_client_id: "client-x".to_string(),
        redirect_uri: "https://dex.example".to_string(),
        salt_service_url: salt_url,
        prover_service_url: prover_url,
        fullnode_url: fullnode_url.clone(),
        service_timeout: timeout,
        session_dir: session_dir.path().to_path_buf(),
        ..WalletConfig::default()
    };

    let store = Arc::new(FileSessionStore::new(session_dir.path()));
    let gateway = Arc::new(JsonRpcGateway::new(fullnode_url, timeout));
    let navigator = Arc::new(RedirectBuffer::new());

    let flow = ZkLoginFlow::new(
        config.clone(),
        store.clone(),
        gateway.clone(),
        Arc::new(HttpSaltService::new(config.salt_service_url.clone(), timeout)),
        Arc::new(HttpProofService::new(config.prover_service_url.clone(), timeout)),
        navigator.clone(),
    );

    TestWallet {
        store,
        navigator,
        gateway,
        flow,
        _session_dir: session_dir,
    }
}

fn ok_salt_router() -> Router {
    Router::new().route(
        "/",
        post(|| async { Json(json!({ "salt": "42" })) }),
    )
}

fn ok_prover_router() -> Router {
    Router::new().route(
        "/",
        post(|| async { Json(json!({ "a": 1, "b": 2 })) }),
    )
}

#[tokio::test]
async fn test_full_login_happy_path() {
    let wallet = build_wallet(ok_salt_router(), ok_prover_router()).await;

    // Begin: epoch 10 from the fullnode plus the 2-epoch validity window
    let redirect = wallet.flow.begin_login(OpenIdProvider::Google).await.unwrap();
    assert_eq!(redirect.max_epoch, 12);
    assert!(redirect.url.contains("accounts.google.com"));

    let setup = wallet.store.load_setup().await.unwrap();
    assert_eq!(setup.max_epoch, 12);

    // Simulated provider redirect return
    wallet
        .navigator
        .set_fragment(format!("id_token={}", issue_token("u1", "client-x")));

    let account = wallet.flow.complete_login().await.unwrap();
    assert_eq!(account.user_salt, "42");
    assert_eq!(account.sub, "u1");
    assert_eq!(account.aud, "client-x");
    assert_eq!(account.max_epoch, 12);
    assert_eq!(account.zk_proofs.0, json!({ "a": 1, "b": 2 }));

    // One-shot setup consumption
    assert!(wallet.store.load_setup().await.is_none());

    // The caller persists the session
    wallet.store.save_account(&account).await.unwrap();
    assert!(wallet.store.load_account().await.is_some());
}

#[tokio::test]
async fn test_user_address_is_stable_across_logins() {
    let wallet = build_wallet(ok_salt_router(), ok_prover_router()).await;

    wallet.flow.begin_login(OpenIdProvider::Google).await.unwrap();
    wallet
        .navigator
        .set_fragment(format!("id_token={}", issue_token("u1", "client-x")));
    let first = wallet.flow.complete_login().await.unwrap();

    wallet.flow.begin_login(OpenIdProvider::Google).await.unwrap();
    wallet
        .navigator
        .set_fragment(format!("id_token={}", issue_token("u1", "client-x")));
    let second = wallet.flow.complete_login().await.unwrap();

    // Same identity and salt give the same address; ephemeral keys differ
    assert_eq!(first.user_addr, second.user_addr);
    assert_ne!(first.ephemeral_private_key, second.ephemeral_private_key);
}

#[tokio::test]
async fn test_salt_service_error_fails_closed() {
    let failing_salt = Router::new().route(
        "/",
        post(|| async {
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "salt backend down",
            )
        }),
    );
    let wallet = build_wallet(failing_salt, ok_prover_router()).await;

    wallet.flow.begin_login(OpenIdProvider::Google).await.unwrap();
    wallet
        .navigator
        .set_fragment(format!("id_token={}", issue_token("u1", "client-x")));

    assert!(wallet.flow.complete_login().await.is_none());
    // No partial session is ever written
    assert!(wallet.store.load_account().await.is_none());
}

#[tokio::test]
async fn test_malformed_prover_body_fails_closed() {
    let broken_prover = Router::new().route("/", post(|| async { "not json at all" }));
    let wallet = build_wallet(ok_salt_router(), broken_prover).await;

    wallet.flow.begin_login(OpenIdProvider::Google).await.unwrap();
    wallet
        .navigator
        .set_fragment(format!("id_token={}", issue_token("u1", "client-x")));

    assert!(wallet.flow.complete_login().await.is_none());
    assert!(wallet.store.load_account().await.is_none());
}

#[tokio::test]
async fn test_completed_session_signs_and_submits() {
    let wallet = build_wallet(ok_salt_router(), ok_prover_router()).await;

    wallet.flow.begin_login(OpenIdProvider::Google).await.unwrap();
    wallet
        .navigator
        .set_fragment(format!("id_token={}", issue_token("u1", "client-x")));
    let account = wallet.flow.complete_login().await.unwrap();

    let signer = ZkLoginSigner::new(wallet.gateway.clone());
    let signed = signer
        .sign_for_submission(&account, TransactionPayload::new(vec![1, 2, 3]))
        .unwrap();

    let refreshed = std::sync::atomic::AtomicBool::new(false);
    let response = signer
        .submit_with_refresh(&signed, || async {
            refreshed.store(true, std::sync::atomic::Ordering::SeqCst);
        })
        .await
        .unwrap();

    assert_eq!(response.digest, "D1GEST");
    assert!(response.status.is_success());
    assert!(refreshed.load(std::sync::atomic::Ordering::SeqCst));
}

#[tokio::test]
async fn test_fresh_start_has_no_pending_login() {
    let wallet = build_wallet(ok_salt_router(), ok_prover_router()).await;

    // No redirect return pending: completion is a silent no-op
    assert!(wallet.flow.complete_login().await.is_none());
    assert!(wallet.store.load_account().await.is_none());
}

#[tokio::test]
async fn test_expiry_sweep_after_login() {
    let wallet = build_wallet(ok_salt_router(), ok_prover_router()).await;

    wallet.flow.begin_login(OpenIdProvider::Google).await.unwrap();
    wallet
        .navigator
        .set_fragment(format!("id_token={}", issue_token("u1", "client-x")));
    let mut account = wallet.flow.complete_login().await.unwrap();

    // Persist a session that is already past its window (fullnode reports 10)
    account.max_epoch = 9;
    wallet.store.save_account(&account).await.unwrap();

    let cleared = ExpiryMonitor::check_once(wallet.gateway.as_ref(), wallet.store.as_ref()).await;
    assert!(cleared);
    assert!(wallet.store.load_account().await.is_none());
    assert!(wallet.store.load_setup().await.is_none());
}
