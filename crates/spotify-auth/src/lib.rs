//! Spotify OAuth authorization library
//!
//! Client side of the Authorization Code + PKCE flow for a desktop or CLI
//! app: generate the PKCE pair, send the user to the authorization page,
//! catch the loopback redirect, and exchange the code for an access token.
//! This crate is a standalone library with no dependency on the login
//! binary; it can be tested and used independently.
//!
//! Flow:
//! 1. `Authenticator::authenticate()` generates the PKCE pair, opens the
//!    authorization URL in the browser, and waits on the callback listener
//! 2. The redirect delivers the authorization code, recorded write-once in
//!    the injected `CredentialStore`
//! 3. `TokenClient::exchange_code_for_token()` redeems the code with the
//!    verifier and returns the access token
//! 4. The token is stored via `CredentialStore::set_token()`

pub mod authenticator;
pub mod browser;
pub mod callback;
pub mod constants;
pub mod error;
pub mod pkce;
pub mod secret;
pub mod store;
pub mod token;

pub use authenticator::{Authenticator, CodeGrant, FlowConfig};
pub use browser::{BrowserOpener, SystemBrowser};
pub use callback::{CallbackResult, CallbackServer};
pub use constants::*;
pub use error::{Error, Result};
pub use pkce::{compute_code_challenge, generate_code_verifier};
pub use secret::SecretString;
pub use store::CredentialStore;
pub use token::TokenClient;
