//! Service-specific error types

use thiserror::Error;

/// Startup errors for the login binary. Flow errors keep the library's own
/// type and reach `main` through anyhow.
#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result alias using service Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages_are_descriptive() {
        assert_eq!(
            Error::Config("client_id must not be empty".into()).to_string(),
            "configuration error: client_id must not be empty"
        );

        let io: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(io.to_string().contains("gone"));
    }

    #[test]
    fn error_debug_includes_variant_name() {
        let err = Error::Config("test error".into());
        let debug = format!("{err:?}");
        assert!(
            debug.contains("Config"),
            "Debug output must include variant name, got: {debug}"
        );
    }
}
