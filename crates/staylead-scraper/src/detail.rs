//! Bounded-concurrency detail scraping.
//!
//! Every URL becomes one task. A task acquires a permit from a shared
//! semaphore before opening its page and releases it only after the page is
//! closed, so at most `max_concurrent` pages are ever open at once. Task
//! failures become [`DetailOutcome::Failed`] rows and never affect siblings.

use std::time::Duration;

use tokio::sync::Semaphore;

use crate::browser::{BrowserSession, PageHandle};
use crate::error::ScraperError;
use crate::extract::extract_detail;
use crate::scroll::{realize_infinite_scroll, ScrollPolicy};
use crate::types::{DetailOutcome, DetailRecord};

#[derive(Debug, Clone)]
pub struct DetailSettings {
    pub max_concurrent: usize,
    pub navigation_timeout: Duration,
    pub scroll: ScrollPolicy,
}

impl Default for DetailSettings {
    fn default() -> Self {
        Self {
            max_concurrent: 5,
            navigation_timeout: Duration::from_secs(60),
            scroll: ScrollPolicy::default(),
        }
    }
}

impl DetailSettings {
    #[must_use]
    pub fn from_app_config(config: &staylead_core::AppConfig) -> Self {
        Self {
            max_concurrent: config.max_concurrent_pages.max(1),
            navigation_timeout: Duration::from_secs(config.navigation_timeout_secs),
            scroll: ScrollPolicy::from_app_config(config),
        }
    }
}

/// Scrape every URL and return one outcome per input, in input order.
///
/// All tasks run to completion before this returns.
pub async fn scrape_details<S: BrowserSession>(
    session: &S,
    urls: &[String],
    settings: &DetailSettings,
) -> Vec<DetailOutcome> {
    let gate = Semaphore::new(settings.max_concurrent.max(1));
    tracing::info!(
        count = urls.len(),
        max_concurrent = settings.max_concurrent,
        "scraping detail pages"
    );

    let tasks = urls
        .iter()
        .map(|url| scrape_one(session, &gate, url, settings));
    let outcomes = futures::future::join_all(tasks).await;

    let failed = outcomes.iter().filter(|o| !o.is_scraped()).count();
    tracing::info!(
        scraped = outcomes.len() - failed,
        failed,
        "detail scraping finished"
    );
    outcomes
}

async fn scrape_one<S: BrowserSession>(
    session: &S,
    gate: &Semaphore,
    url: &str,
    settings: &DetailSettings,
) -> DetailOutcome {
    let Ok(_permit) = gate.acquire().await else {
        return failed(url, &ScraperError::GateClosed { url: url.to_owned() });
    };

    let page = match session.new_page().await {
        Ok(page) => page,
        Err(e) => return failed(url, &e),
    };

    let result = scrape_page(&page, url, settings).await;

    if let Err(e) = page.close().await {
        tracing::warn!(url, error = %e, "failed to close page");
    }

    match result {
        Ok(record) => {
            tracing::info!(url, "scraped");
            DetailOutcome::Scraped(record)
        }
        Err(e) => failed(url, &e),
    }
}

async fn scrape_page<P: PageHandle>(
    page: &P,
    url: &str,
    settings: &DetailSettings,
) -> Result<DetailRecord, ScraperError> {
    page.goto(url, settings.navigation_timeout).await?;
    let scroll = realize_infinite_scroll(page, &settings.scroll).await?;
    tracing::debug!(
        url,
        iterations = scroll.iterations,
        height = scroll.final_height,
        "content realized"
    );

    let title = page.title().await?;
    let html = page.content().await?;
    extract_detail(title, url, &html)
}

fn failed(url: &str, error: &ScraperError) -> DetailOutcome {
    tracing::error!(url, error = %error, "detail scrape failed");
    DetailOutcome::Failed {
        url: url.to_owned(),
        error: error.to_string(),
    }
}
