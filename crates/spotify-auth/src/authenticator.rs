//! Interactive authorization flow
//!
//! Ties the pieces together into the user-facing sequence: generate the
//! PKCE pair, build the authorization URL, open it in the browser, wait on
//! the loopback listener for the redirect, then record the authorization
//! code. The returned [`CodeGrant`] carries both the code and the verifier
//! so the caller can finish with [`crate::token::TokenClient`].
//!
//! The browser hop and the credential store are injected, which keeps the
//! flow drivable from tests: a browser double can answer the callback
//! itself, and every flow gets its own store instead of sharing process
//! globals.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::browser::BrowserOpener;
use crate::callback::CallbackServer;
use crate::constants::{
    AUTHORIZE_ENDPOINT, CALLBACK_PORT, DEFAULT_CALLBACK_TIMEOUT, DEFAULT_SCOPE,
    DEFAULT_SHUTDOWN_GRACE,
};
use crate::error::{Error, Result};
use crate::pkce::{compute_code_challenge, generate_code_verifier};
use crate::store::CredentialStore;

/// Everything the flow needs to know about this client and its listener.
#[derive(Debug, Clone)]
pub struct FlowConfig {
    /// Public OAuth client identifier.
    pub client_id: String,
    /// Redirect URI registered with the provider. Must point at the
    /// loopback listener for the callback to arrive.
    pub redirect_uri: String,
    /// Space-separated scopes to request.
    pub scope: String,
    /// Authorization page base URL.
    pub authorize_endpoint: String,
    /// Address the callback listener binds.
    pub callback_addr: SocketAddr,
    /// How long to wait for the redirect before giving up.
    pub callback_timeout: Duration,
    /// Bound on listener teardown after the wait resolves.
    pub shutdown_grace: Duration,
}

impl FlowConfig {
    /// Config with the provider defaults filled in.
    pub fn new(client_id: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            scope: DEFAULT_SCOPE.to_string(),
            authorize_endpoint: AUTHORIZE_ENDPOINT.to_string(),
            callback_addr: SocketAddr::from(([127, 0, 0, 1], CALLBACK_PORT)),
            callback_timeout: DEFAULT_CALLBACK_TIMEOUT,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        }
    }
}

/// Outcome of a completed authorization: the code from the redirect plus
/// the verifier that must accompany it to the token endpoint.
#[derive(Debug, Clone)]
pub struct CodeGrant {
    pub code: String,
    pub verifier: String,
}

/// Drives one interactive authorization pass.
pub struct Authenticator {
    config: FlowConfig,
    browser: Box<dyn BrowserOpener>,
    store: Arc<CredentialStore>,
}

impl Authenticator {
    pub fn new(
        config: FlowConfig,
        browser: Box<dyn BrowserOpener>,
        store: Arc<CredentialStore>,
    ) -> Self {
        Self {
            config,
            browser,
            store,
        }
    }

    /// Build the authorization page URL carrying `code_challenge`.
    ///
    /// Parameters are emitted in a fixed order so the URL is stable for a
    /// given config and challenge.
    pub fn authorization_url(&self, code_challenge: &str) -> String {
        format!(
            "{}?client_id={}&code_challenge={}&code_challenge_method=S256&redirect_uri={}&response_type=code&scope={}",
            self.config.authorize_endpoint,
            self.config.client_id,
            code_challenge,
            urlencoded(&self.config.redirect_uri),
            urlencoded(&self.config.scope),
        )
    }

    /// Run the flow once: PKCE pair, browser, callback, store the code.
    ///
    /// A browser launch failure aborts before the listener is bound, so no
    /// socket is held for a flow the user never saw. A redirect carrying a
    /// provider error becomes [`Error::AuthorizationDenied`] and nothing is
    /// stored.
    pub async fn authenticate(&self) -> Result<CodeGrant> {
        let verifier =
            generate_code_verifier().map_err(|e| Error::PkceGeneration(e.to_string()))?;
        let challenge = compute_code_challenge(&verifier);
        let url = self.authorization_url(&challenge);
        debug!(%url, "built authorization URL");

        self.browser.open(&url)?;

        let result = CallbackServer::bind(self.config.callback_addr)
            .await?
            .with_shutdown_grace(self.config.shutdown_grace)
            .await_callback(self.config.callback_timeout)
            .await?;

        if !result.error.is_empty() {
            warn!(error = %result.error, "provider reported authorization failure");
            return Err(Error::AuthorizationDenied(result.error));
        }

        self.store.set_code(result.code.clone()).await?;
        info!("authorization code captured");

        Ok(CodeGrant {
            code: result.code,
            verifier,
        })
    }
}

/// Minimal URL encoding for parameter values.
/// Only encodes characters that would break URL parameter parsing.
fn urlencoded(s: &str) -> String {
    s.replace(' ', "%20")
        .replace(':', "%3A")
        .replace('/', "%2F")
}
