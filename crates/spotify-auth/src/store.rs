//! Write-once credential storage
//!
//! Holds the authorization code and access token for whatever scope owns the
//! store. The store is constructed explicitly and passed in by the caller;
//! there is no global instance to reach for. Each field is single-assignment:
//! the emptiness check and the assignment share one mutex critical section,
//! so concurrent writers serialize and the second one fails instead of
//! overwriting the first.

use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::secret::SecretString;

#[derive(Default)]
struct Credentials {
    code: String,
    token: SecretString,
}

/// Thread-safe single-assignment holder for the flow's two credentials.
///
/// Reads clone the stored value under a brief lock; writes hold the same
/// lock across check and assignment.
pub struct CredentialStore {
    state: Mutex<Credentials>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(Credentials::default()),
        }
    }

    /// Record the authorization code.
    ///
    /// Fails with [`Error::CredentialAlreadySet`] when a code is already
    /// present; the stored value is never overwritten. An empty input is a
    /// no-op and the slot stays claimable by a later flow.
    pub async fn set_code(&self, code: String) -> Result<()> {
        if code.is_empty() {
            return Ok(());
        }
        let mut state = self.state.lock().await;
        if !state.code.is_empty() {
            return Err(Error::CredentialAlreadySet("authorization code"));
        }
        state.code = code;
        debug!("authorization code recorded");
        Ok(())
    }

    /// The recorded authorization code, if any.
    pub async fn code(&self) -> Option<String> {
        let state = self.state.lock().await;
        if state.code.is_empty() {
            None
        } else {
            Some(state.code.clone())
        }
    }

    /// Record the access token. Same single-assignment rule as
    /// [`CredentialStore::set_code`].
    pub async fn set_token(&self, token: SecretString) -> Result<()> {
        if token.is_empty() {
            return Ok(());
        }
        let mut state = self.state.lock().await;
        if !state.token.is_empty() {
            return Err(Error::CredentialAlreadySet("access token"));
        }
        state.token = token;
        debug!("access token recorded");
        Ok(())
    }

    /// The recorded access token, if any.
    pub async fn token(&self) -> Option<SecretString> {
        let state = self.state.lock().await;
        if state.token.is_empty() {
            None
        } else {
            Some(state.token.clone())
        }
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}
