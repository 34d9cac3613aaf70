//! Authorization code exchange
//!
//! Second half of the PKCE flow: POST the authorization code together with
//! the original code verifier to the token endpoint and pull the access
//! token out of the JSON response. The verifier proves to the provider that
//! whoever is redeeming the code is the party that started the flow.
//!
//! Failures are split by where they happened: [`Error::Transport`] for the
//! network, [`Error::UnexpectedStatus`] for a non-2xx answer,
//! [`Error::ResponseParse`] for a body that is not JSON, and
//! [`Error::TokenFieldMissing`] when the JSON lacks a string access token.

use serde::Deserialize;
use tracing::debug;

use crate::constants::TOKEN_ENDPOINT;
use crate::error::{Error, Result};
use crate::secret::SecretString;

/// Token endpoint response, reduced to the one field the flow consumes.
/// `access_token` is kept as a raw JSON value so that a present-but-wrong
/// type (a number, an object) is distinguishable from valid data rather
/// than rejected by serde as a parse failure.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<serde_json::Value>,
}

/// Client for the provider's token endpoint.
pub struct TokenClient {
    http: reqwest::Client,
    endpoint: String,
    client_id: String,
    redirect_uri: String,
}

impl TokenClient {
    /// Build a client against the default token endpoint.
    pub fn new(
        http: reqwest::Client,
        client_id: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            http,
            endpoint: TOKEN_ENDPOINT.to_string(),
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
        }
    }

    /// Point the client at a different token endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Exchange an authorization code for an access token.
    ///
    /// `verifier` must be the code verifier whose challenge was sent in the
    /// authorization request that produced `code`.
    pub async fn exchange_code_for_token(&self, code: &str, verifier: &str) -> Result<SecretString> {
        let response = self
            .http
            .post(&self.endpoint)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("client_id", self.client_id.as_str()),
                ("code_verifier", verifier),
            ])
            .send()
            .await
            .map_err(|e| Error::Transport(format!("token exchange request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<no body>"));
            debug!(status = status.as_u16(), %body, "token endpoint rejected the exchange");
            return Err(Error::UnexpectedStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("reading token response failed: {e}")))?;
        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| Error::ResponseParse(format!("invalid token response: {e}")))?;

        let token = parsed
            .access_token
            .as_ref()
            .and_then(|value| value.as_str())
            .map(str::to_owned)
            .ok_or(Error::TokenFieldMissing)?;

        Ok(SecretString::new(token))
    }
}
