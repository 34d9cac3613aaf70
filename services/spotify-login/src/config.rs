//! Configuration types and loading
//!
//! Config precedence: CLI args > env vars > config file > defaults. Only
//! the client ID is required; everything else falls back to the provider
//! defaults. No secrets live in the TOML: the client ID identifies a
//! public client, and the access token only ever exists in memory.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use spotify_auth::{
    AUTHORIZE_ENDPOINT, CALLBACK_PATH, CALLBACK_PORT, DEFAULT_CALLBACK_TIMEOUT, DEFAULT_SCOPE,
    DEFAULT_SHUTDOWN_GRACE, FlowConfig, TOKEN_ENDPOINT,
};

use crate::error::{Error, Result};

/// Root configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    pub spotify: SpotifyConfig,
    #[serde(default)]
    pub callback: CallbackConfig,
}

/// Provider and client settings
#[derive(Debug, Deserialize)]
pub struct SpotifyConfig {
    pub client_id: String,
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default = "default_authorize_endpoint")]
    pub authorize_endpoint: String,
    #[serde(default = "default_token_endpoint")]
    pub token_endpoint: String,
}

/// Redirect listener settings
#[derive(Debug, Deserialize)]
pub struct CallbackConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
}

impl Default for CallbackConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            shutdown_grace_secs: default_shutdown_grace_secs(),
        }
    }
}

fn default_scope() -> String {
    DEFAULT_SCOPE.to_string()
}

fn default_authorize_endpoint() -> String {
    AUTHORIZE_ENDPOINT.to_string()
}

fn default_token_endpoint() -> String {
    TOKEN_ENDPOINT.to_string()
}

fn default_port() -> u16 {
    CALLBACK_PORT
}

fn default_timeout_secs() -> u64 {
    DEFAULT_CALLBACK_TIMEOUT.as_secs()
}

fn default_shutdown_grace_secs() -> u64 {
    DEFAULT_SHUTDOWN_GRACE.as_secs()
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;

        if config.spotify.client_id.trim().is_empty() {
            return Err(Error::Config("client_id must not be empty".into()));
        }

        if config.callback.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be greater than 0".into()));
        }

        if config.callback.shutdown_grace_secs == 0 {
            return Err(Error::Config(
                "shutdown_grace_secs must be greater than 0".into(),
            ));
        }

        Ok(config)
    }

    /// Resolve config file path from CLI arg or CONFIG_PATH env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from("spotify-login.toml")
    }

    /// Redirect URI derived from the callback port. Must match what the
    /// provider has registered for this client.
    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}{}", self.callback.port, CALLBACK_PATH)
    }

    /// Loopback address the callback listener binds.
    pub fn callback_addr(&self) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], self.callback.port))
    }

    /// Assemble the library's flow config from the file settings.
    pub fn flow_config(&self) -> FlowConfig {
        let mut flow = FlowConfig::new(self.spotify.client_id.clone(), self.redirect_uri());
        flow.scope = self.spotify.scope.clone();
        flow.authorize_endpoint = self.spotify.authorize_endpoint.clone();
        flow.callback_addr = self.callback_addr();
        flow.callback_timeout = Duration::from_secs(self.callback.timeout_secs);
        flow.shutdown_grace = Duration::from_secs(self.callback.shutdown_grace_secs);
        flow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mutex to serialize tests that mutate environment variables, preventing
    /// data races when tests run in parallel.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// SAFETY: Callers must hold ENV_MUTEX to prevent concurrent env mutation.
    unsafe fn set_env(key: &str, val: &str) {
        unsafe { std::env::set_var(key, val) };
    }

    unsafe fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) };
    }

    fn valid_toml() -> &'static str {
        r#"
[spotify]
client_id = "5fe01282e44241328a84e7c5cc169165"
scope = "user-read-private user-read-email"

[callback]
port = 9090
timeout_secs = 60
"#
    }

    #[test]
    fn test_load_valid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, valid_toml()).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(
            config.spotify.client_id,
            "5fe01282e44241328a84e7c5cc169165"
        );
        assert_eq!(config.spotify.scope, "user-read-private user-read-email");
        assert_eq!(config.callback.port, 9090);
        assert_eq!(config.callback.timeout_secs, 60);
        // Unset fields keep the provider defaults
        assert_eq!(config.spotify.authorize_endpoint, AUTHORIZE_ENDPOINT);
        assert_eq!(config.spotify.token_endpoint, TOKEN_ENDPOINT);
        assert_eq!(config.callback.shutdown_grace_secs, 5);
    }

    #[test]
    fn test_load_minimal_config_applies_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[spotify]\nclient_id = \"clientId\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.spotify.scope, "user-read-private");
        assert_eq!(config.callback.port, 8080);
        assert_eq!(config.callback.timeout_secs, 30);
        assert_eq!(config.callback.shutdown_grace_secs, 5);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "not valid {{{{ toml").unwrap();

        let result = Config::load(&path);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_client_id_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[spotify]\nclient_id = \"  \"\n").unwrap();

        let result = Config::load(&path);
        assert!(result.is_err(), "blank client_id must be rejected");
        let err = result.unwrap_err().to_string();
        assert!(
            err.contains("client_id must not be empty"),
            "error message should explain the issue, got: {err}"
        );
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[spotify]\nclient_id = \"clientId\"\n\n[callback]\ntimeout_secs = 0\n",
        )
        .unwrap();

        let result = Config::load(&path);
        assert!(result.is_err(), "timeout_secs = 0 must be rejected");
    }

    #[test]
    fn test_zero_shutdown_grace_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[spotify]\nclient_id = \"clientId\"\n\n[callback]\nshutdown_grace_secs = 0\n",
        )
        .unwrap();

        let result = Config::load(&path);
        assert!(result.is_err(), "shutdown_grace_secs = 0 must be rejected");
    }

    #[test]
    fn test_resolve_path_cli_arg() {
        let path = Config::resolve_path(Some("/custom/path.toml"));
        assert_eq!(path, PathBuf::from("/custom/path.toml"));
    }

    #[test]
    fn test_resolve_path_env_var() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { set_env("CONFIG_PATH", "/env/path.toml") };
        let path = Config::resolve_path(None);
        assert_eq!(path, PathBuf::from("/env/path.toml"));
        unsafe { remove_env("CONFIG_PATH") };
    }

    #[test]
    fn test_resolve_path_default() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { remove_env("CONFIG_PATH") };
        let path = Config::resolve_path(None);
        assert_eq!(path, PathBuf::from("spotify-login.toml"));
    }

    #[test]
    fn test_resolve_path_cli_overrides_env() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { set_env("CONFIG_PATH", "/env/should-lose.toml") };
        let path = Config::resolve_path(Some("/cli/wins.toml"));
        assert_eq!(
            path,
            PathBuf::from("/cli/wins.toml"),
            "CLI arg must take precedence over CONFIG_PATH env var"
        );
        unsafe { remove_env("CONFIG_PATH") };
    }

    #[test]
    fn test_redirect_uri_follows_callback_port() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, valid_toml()).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.redirect_uri(), "http://localhost:9090/callback");
        assert_eq!(config.callback_addr(), "127.0.0.1:9090".parse().unwrap());
    }

    #[test]
    fn test_flow_config_carries_file_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, valid_toml()).unwrap();

        let flow = Config::load(&path).unwrap().flow_config();
        assert_eq!(flow.client_id, "5fe01282e44241328a84e7c5cc169165");
        assert_eq!(flow.redirect_uri, "http://localhost:9090/callback");
        assert_eq!(flow.scope, "user-read-private user-read-email");
        assert_eq!(flow.callback_timeout, Duration::from_secs(60));
        assert_eq!(flow.shutdown_grace, Duration::from_secs(5));
    }
}
