//! Browser session and page abstractions.
//!
//! A pipeline run owns exactly one [`BrowserSession`] and passes it by
//! reference into every task. Each task opens its own [`PageHandle`], uses it
//! exclusively, and closes it exactly once when done.

mod chrome;

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ScraperError;

pub use chrome::{ChromeBrowser, ChromePage};

/// Launch options for the shared browser process.
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    /// Explicit executable. `None` lets the driver auto-detect an installed
    /// Chrome/Chromium.
    pub chrome_path: Option<PathBuf>,
    pub headless: bool,
    /// Upper bound for a single DevTools protocol request.
    pub request_timeout: Duration,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            chrome_path: None,
            headless: true,
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl BrowserSettings {
    #[must_use]
    pub fn from_app_config(config: &staylead_core::AppConfig) -> Self {
        Self {
            chrome_path: config.chrome_path.clone(),
            headless: config.browser_headless,
            request_timeout: Duration::from_secs(config.navigation_timeout_secs),
        }
    }
}

/// A running browser that hands out independent pages.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    type Page: PageHandle;

    /// Open a fresh blank page owned by the caller.
    async fn new_page(&self) -> Result<Self::Page, ScraperError>;
}

/// One browser page (tab). Never shared between tasks.
#[async_trait]
pub trait PageHandle: Send + Sync + Sized {
    /// Navigate and wait for the `load` event, failing after `timeout`.
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), ScraperError>;

    /// URL the page ended up on after any redirects.
    async fn current_url(&self) -> Result<Option<String>, ScraperError>;

    /// `document.body.scrollHeight`.
    async fn scroll_height(&self) -> Result<i64, ScraperError>;

    /// Scroll the window to the current bottom of the document.
    async fn scroll_to_bottom(&self) -> Result<(), ScraperError>;

    async fn title(&self) -> Result<Option<String>, ScraperError>;

    /// Serialized DOM of the rendered page.
    async fn content(&self) -> Result<String, ScraperError>;

    async fn close(self) -> Result<(), ScraperError>;
}
