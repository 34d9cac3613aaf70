//! Opening the authorization URL
//!
//! The flow hands the user off to the provider through whatever browser the
//! desktop offers. That hop is behind [`BrowserOpener`] so tests can swap in
//! a double that drives the callback directly instead of launching anything.

use tracing::debug;

use crate::error::{Error, Result};

/// Seam between the flow and the desktop browser.
pub trait BrowserOpener: Send + Sync {
    /// Open `url` for the user. A launch failure aborts the flow before the
    /// callback listener is ever bound.
    fn open(&self, url: &str) -> Result<()>;
}

/// Default opener backed by the platform browser.
pub struct SystemBrowser;

impl BrowserOpener for SystemBrowser {
    fn open(&self, url: &str) -> Result<()> {
        webbrowser::open(url).map_err(|e| Error::BrowserLaunch(e.to_string()))?;
        debug!(%url, "opened system browser");
        Ok(())
    }
}
