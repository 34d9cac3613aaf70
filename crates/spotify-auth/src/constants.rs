//! Spotify OAuth constants
//!
//! Public client configuration for the authorization-code + PKCE flow.
//! None of these values are secrets: the client ID identifies a public
//! desktop application and the PKCE verifier replaces a client secret.
//! The sensitive values (authorization code, access token) live in the
//! credential store.

use std::time::Duration;

/// Authorization endpoint the user's browser is sent to.
pub const AUTHORIZE_ENDPOINT: &str = "https://accounts.spotify.com/authorize";

/// Token endpoint for exchanging an authorization code.
pub const TOKEN_ENDPOINT: &str = "https://accounts.spotify.com/api/token";

/// Scope requested during authorization.
pub const DEFAULT_SCOPE: &str = "user-read-private";

/// Local port the redirect listener binds by default.
pub const CALLBACK_PORT: u16 = 8080;

/// Path the provider redirects back to.
pub const CALLBACK_PATH: &str = "/callback";

/// Redirect URI registered with the provider, matching the default
/// callback port and path.
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080/callback";

/// How long the flow waits for the browser redirect before giving up.
/// A policy default, not a protocol constant.
pub const DEFAULT_CALLBACK_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on the callback listener's graceful shutdown. After this
/// the serve task is aborted so the port can never stay held.
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);
