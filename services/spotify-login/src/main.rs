//! Spotify login CLI
//!
//! Single-binary flow that:
//! 1. Loads configuration (client ID, scope, callback port)
//! 2. Opens the authorization page in the system browser
//! 3. Catches the redirect on the loopback callback listener
//! 4. Exchanges the authorization code for an access token

mod config;
mod error;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use spotify_auth::{Authenticator, CredentialStore, SystemBrowser, TokenClient};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and LOG_LEVEL / RUST_LOG support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("starting spotify-login");

    // CLI: simple --config flag parsing
    let args: Vec<String> = std::env::args().collect();
    let config_path = Config::resolve_path(cli_config_arg(&args));
    info!(path = %config_path.display(), "loading configuration");

    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    info!(
        client_id = %config.spotify.client_id,
        scope = %config.spotify.scope,
        callback_port = config.callback.port,
        "configuration loaded"
    );

    let store = Arc::new(CredentialStore::default());
    let authenticator = Authenticator::new(
        config.flow_config(),
        Box::new(SystemBrowser),
        store.clone(),
    );

    let grant = authenticator
        .authenticate()
        .await
        .context("authorization flow failed")?;

    if grant.code.is_empty() {
        anyhow::bail!("callback carried no authorization code, nothing to exchange");
    }

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("failed to build http client")?;

    let token = TokenClient::new(http, config.spotify.client_id.clone(), config.redirect_uri())
        .with_endpoint(config.spotify.token_endpoint.clone())
        .exchange_code_for_token(&grant.code, &grant.verifier)
        .await
        .context("token exchange failed")?;

    store.set_token(token).await?;
    info!("access token obtained and stored");

    Ok(())
}

/// Extract the value following `--config`, if present.
fn cli_config_arg(args: &[String]) -> Option<&str> {
    args.iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}
