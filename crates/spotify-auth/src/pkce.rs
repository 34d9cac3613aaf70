//! PKCE (Proof Key for Code Exchange) implementation per RFC 7636
//!
//! Generates the code verifier and S256 challenge used during the
//! authorization flow. The verifier stays with the client and is sent only
//! during token exchange; the challenge travels in the authorization URL so
//! the provider can verify that the exchange request comes from the party
//! that started the flow.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Entropy drawn for each verifier. 32 bytes encode to 43 characters, the
/// bottom of RFC 7636's 43-128 window.
const VERIFIER_ENTROPY_BYTES: usize = 32;

/// Generate a cryptographically random PKCE code verifier.
///
/// Draws 32 bytes from the OS CSPRNG and encodes them as URL-safe base64
/// without padding. Entropy failure surfaces as [`Error::Randomness`];
/// there is no fallback to a weaker source.
pub fn generate_code_verifier() -> Result<String> {
    let mut bytes = [0u8; VERIFIER_ENTROPY_BYTES];
    getrandom::getrandom(&mut bytes).map_err(|e| Error::Randomness(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Compute the S256 code challenge for a verifier.
///
/// `challenge = BASE64URL(SHA256(verifier))`. Pure, so the same verifier
/// always yields the same challenge.
pub fn compute_code_challenge(verifier: &str) -> String {
    let digest = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}
