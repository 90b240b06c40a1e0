// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use url::Url;

use crate::config::WalletConfig;
use crate::expiry::ExpiryMonitor;
use crate::ledger::{JsonRpcGateway, LedgerGateway};
use crate::services::{HttpProofService, HttpSaltService};
use crate::session::{
    FileSessionStore, OpenIdProvider, RedirectBuffer, SessionStore, ZkLoginFlow,
};

/// zkDEX Wallet CLI
#[derive(Parser, Debug)]
#[command(name = "zkdex-wallet")]
#[command(version = "0.1.0")]
#[command(about = "Headless zkLogin wallet for the zkDEX client", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Begin a login and print the authorization URL to open in a browser
    Login(LoginArgs),

    /// Complete a login from the redirect URL the provider returned to
    Complete(CompleteArgs),

    /// Show the current session and its balances
    Status,

    /// Keep running and clear the session once its epoch window elapses
    Watch,

    /// Sign out and clear the persisted session
    Logout,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Identity provider: google, facebook or twitch
    pub provider: String,
}

#[derive(Args, Debug)]
pub struct CompleteArgs {
    /// Full redirect URL including the #id_token=... fragment
    pub url: String,
}

struct Wallet {
    config: WalletConfig,
    store: Arc<FileSessionStore>,
    gateway: Arc<JsonRpcGateway>,
    navigator: Arc<RedirectBuffer>,
    flow: ZkLoginFlow,
}

fn build_wallet() -> Wallet {
    let config = WalletConfig::from_env();

    let store = Arc::new(FileSessionStore::new(config.session_dir.clone()));
    let gateway = Arc::new(JsonRpcGateway::new(
        config.fullnode_url.clone(),
        config.service_timeout,
    ));
    let navigator = Arc::new(RedirectBuffer::new());

    let flow = ZkLoginFlow::new(
        config.clone(),
        store.clone(),
        gateway.clone(),
        Arc::new(HttpSaltService::new(
            config.salt_service_url.clone(),
            config.service_timeout,
        )),
        Arc::new(HttpProofService::new(
            config.prover_service_url.clone(),
            config.service_timeout,
        )),
        navigator.clone(),
    );

    Wallet {
        config,
        store,
        gateway,
        navigator,
        flow,
    }
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Login(args) => login(args).await,
        Commands::Complete(args) => complete(args).await,
        Commands::Status => status().await,
        Commands::Watch => watch().await,
        Commands::Logout => logout().await,
    }
}

async fn login(args: LoginArgs) -> Result<()> {
    let provider = OpenIdProvider::parse(&args.provider)
        .ok_or_else(|| anyhow!("Unknown provider '{}'", args.provider))?;

    let wallet = build_wallet();
    let redirect = wallet.flow.begin_login(provider).await?;

    println!("Open this URL in a browser to sign in with {}:", provider.name());
    println!();
    println!("  {}", redirect.url);
    println!();
    println!(
        "Then run: zkdex-wallet complete '<redirect URL>'  (session valid until epoch {})",
        redirect.max_epoch
    );
    Ok(())
}

async fn complete(args: CompleteArgs) -> Result<()> {
    let url = Url::parse(&args.url)?;
    let fragment = url
        .fragment()
        .ok_or_else(|| anyhow!("Redirect URL carries no fragment"))?;

    let wallet = build_wallet();
    wallet.navigator.set_fragment(fragment);

    match wallet.flow.complete_login().await {
        Some(account) => {
            wallet.store.save_account(&account).await?;
            println!("✅ Logged in with {}", account.provider.name());
            println!("   Address:  {}", account.user_addr);
            println!("   Valid to: epoch {}", account.max_epoch);
            Ok(())
        }
        None => Err(anyhow!("Login did not complete; start again with 'login'")),
    }
}

async fn status() -> Result<()> {
    let wallet = build_wallet();

    // Opportunistic expiry sweep before reporting
    ExpiryMonitor::check_once(wallet.gateway.as_ref(), wallet.store.as_ref()).await;

    match wallet.store.load_account().await {
        Some(account) => {
            println!("Session: {} via {}", account.user_addr, account.provider.name());
            println!("Valid to epoch {}", account.max_epoch);

            match wallet.gateway.get_balances(&account.user_addr).await {
                Ok(balances) if balances.is_empty() => println!("No coin balances"),
                Ok(balances) => {
                    for balance in balances {
                        println!("  {}  {}", balance.total_balance, balance.coin_type);
                    }
                }
                Err(e) => println!("Balance lookup failed: {}", e),
            }
        }
        None => println!("No active session"),
    }
    Ok(())
}

async fn watch() -> Result<()> {
    let wallet = build_wallet();

    let monitor = ExpiryMonitor::new(
        wallet.gateway.clone(),
        wallet.store.clone(),
        wallet.config.clone(),
    );
    monitor.start().await;

    println!("Watching session expiry (Ctrl-C to stop)...");
    tokio::signal::ctrl_c().await?;
    monitor.stop().await;
    Ok(())
}

async fn logout() -> Result<()> {
    let wallet = build_wallet();
    wallet.store.clear().await;
    println!("Signed out");
    Ok(())
}
