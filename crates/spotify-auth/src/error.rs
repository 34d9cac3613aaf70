//! Error types for the authorization flow
//!
//! Every component surfaces its failures through this one enum so a caller
//! can always tell which stage failed. Nothing here is retried internally;
//! a failed flow is restarted in full, with fresh PKCE material, by whoever
//! drives it.

use std::net::SocketAddr;
use std::time::Duration;

/// Errors from authorization-flow operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("code verifier randomness unavailable: {0}")]
    Randomness(String),

    #[error("could not generate PKCE material: {0}")]
    PkceGeneration(String),

    #[error("browser launch failed: {0}")]
    BrowserLaunch(String),

    #[error("callback listener failed to bind {addr}: {source}")]
    ListenerBind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("callback listener stopped before a redirect arrived")]
    ListenerClosed,

    #[error("callback timed out after {0:?}")]
    CallbackTimeout(Duration),

    #[error("authorization denied: {0}")]
    AuthorizationDenied(String),

    #[error("{0} already set in credential store")]
    CredentialAlreadySet(&'static str),

    #[error("token request transport failed: {0}")]
    Transport(String),

    #[error("token endpoint returned unexpected status {0}")]
    UnexpectedStatus(u16),

    #[error("token response is not valid JSON: {0}")]
    ResponseParse(String),

    #[error("token response has no access_token string")]
    TokenFieldMissing,
}

/// Result alias for flow operations.
pub type Result<T> = std::result::Result<T, Error>;
