//! Chrome DevTools implementation of the browser traits.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;

use super::{BrowserSession, BrowserSettings, PageHandle};
use crate::error::ScraperError;

const SCROLL_HEIGHT_SCRIPT: &str = "document.body.scrollHeight";
const SCROLL_TO_BOTTOM_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight)";

/// A launched Chrome/Chromium process plus the task draining its CDP events.
///
/// Call [`ChromeBrowser::close`] once every task using the browser has
/// finished, on success and failure paths alike.
pub struct ChromeBrowser {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl ChromeBrowser {
    /// Launch the browser process.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Launch`] if no executable can be found or the
    /// process fails to start. Callers treat this as fatal.
    pub async fn launch(settings: &BrowserSettings) -> Result<Self, ScraperError> {
        let mut builder = BrowserConfig::builder().request_timeout(settings.request_timeout);

        if let Some(path) = &settings.chrome_path {
            builder = builder.chrome_executable(path);
        }
        if !settings.headless {
            builder = builder.with_head();
        }

        builder = builder
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-background-networking")
            .arg("--disable-gpu")
            .arg("--no-sandbox");

        let config = builder
            .build()
            .map_err(|reason| ScraperError::Launch { reason })?;

        tracing::info!(headless = settings.headless, "launching browser");
        let (browser, mut handler) =
            Browser::launch(config)
                .await
                .map_err(|e| ScraperError::Launch {
                    reason: e.to_string(),
                })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!(error = %e, "browser handler stopped");
                    break;
                }
            }
        });

        Ok(Self { browser, handler })
    }

    /// Close the browser and reap the process.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Browser`] if the close command fails. The
    /// process is still waited on and the event task stopped.
    pub async fn close(mut self) -> Result<(), ScraperError> {
        let closed = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            tracing::warn!(error = %e, "failed waiting for browser process to exit");
        }
        self.handler.abort();
        tracing::info!("browser closed");
        closed.map(|_| ()).map_err(ScraperError::from)
    }
}

#[async_trait]
impl BrowserSession for ChromeBrowser {
    type Page = ChromePage;

    async fn new_page(&self) -> Result<ChromePage, ScraperError> {
        let page = self.browser.new_page("about:blank").await?;
        Ok(ChromePage { page })
    }
}

pub struct ChromePage {
    page: Page,
}

#[async_trait]
impl PageHandle for ChromePage {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), ScraperError> {
        tokio::time::timeout(timeout, self.page.goto(url))
            .await
            .map_err(|_| ScraperError::NavigationTimeout {
                url: url.to_owned(),
                secs: timeout.as_secs(),
            })?
            .map_err(|e| ScraperError::Navigation {
                url: url.to_owned(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    async fn current_url(&self) -> Result<Option<String>, ScraperError> {
        Ok(self.page.url().await?)
    }

    async fn scroll_height(&self) -> Result<i64, ScraperError> {
        let result = self.page.evaluate(SCROLL_HEIGHT_SCRIPT.to_string()).await?;
        result
            .into_value::<i64>()
            .map_err(|e| ScraperError::Evaluation {
                reason: format!("{SCROLL_HEIGHT_SCRIPT} did not return a number: {e}"),
            })
    }

    async fn scroll_to_bottom(&self) -> Result<(), ScraperError> {
        self.page.evaluate(SCROLL_TO_BOTTOM_SCRIPT.to_string()).await?;
        Ok(())
    }

    async fn title(&self) -> Result<Option<String>, ScraperError> {
        Ok(self.page.get_title().await?)
    }

    async fn content(&self) -> Result<String, ScraperError> {
        Ok(self.page.content().await?)
    }

    async fn close(self) -> Result<(), ScraperError> {
        self.page.close().await?;
        Ok(())
    }
}
