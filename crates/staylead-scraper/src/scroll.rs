//! Infinite-scroll realization ahead of extraction.

use std::time::Duration;

use crate::browser::PageHandle;
use crate::error::ScraperError;

#[derive(Debug, Clone)]
pub struct ScrollPolicy {
    /// Wait after each scroll for lazy content to render.
    pub settle: Duration,
    /// Upper bound on scroll rounds. `0` disables scrolling entirely.
    pub max_iterations: u32,
}

impl Default for ScrollPolicy {
    fn default() -> Self {
        Self {
            settle: Duration::from_secs(1),
            max_iterations: 50,
        }
    }
}

impl ScrollPolicy {
    #[must_use]
    pub fn from_app_config(config: &staylead_core::AppConfig) -> Self {
        Self {
            settle: Duration::from_millis(config.scroll_settle_ms),
            max_iterations: config.scroll_max_iterations,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollReport {
    /// Scroll rounds performed.
    pub iterations: u32,
    pub final_height: i64,
    /// `true` when two consecutive height readings matched, `false` when the
    /// iteration guard stopped the loop first.
    pub stabilized: bool,
}

/// Scroll to the bottom repeatedly until the document height stops growing.
///
/// Each round scrolls, waits `policy.settle`, and re-reads
/// `document.body.scrollHeight`. The loop ends on the first reading equal to
/// the previous one, or after `policy.max_iterations` rounds.
///
/// # Errors
///
/// Returns [`ScraperError`] if a height read or scroll script fails.
pub async fn realize_infinite_scroll<P: PageHandle>(
    page: &P,
    policy: &ScrollPolicy,
) -> Result<ScrollReport, ScraperError> {
    let mut last_height = page.scroll_height().await?;
    let mut iterations = 0;

    while iterations < policy.max_iterations {
        page.scroll_to_bottom().await?;
        iterations += 1;
        tokio::time::sleep(policy.settle).await;

        let height = page.scroll_height().await?;
        tracing::debug!(iterations, height, "scrolled");
        if height == last_height {
            return Ok(ScrollReport {
                iterations,
                final_height: height,
                stabilized: true,
            });
        }
        last_height = height;
    }

    if policy.max_iterations > 0 {
        tracing::warn!(
            iterations,
            height = last_height,
            "page height never settled; extracting what has loaded"
        );
    }

    Ok(ScrollReport {
        iterations,
        final_height: last_height,
        stabilized: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::BrowserSession;
    use crate::fake::{FakeBrowser, FakeSite};

    const URL: &str = "https://x.test/room/1";

    async fn scroll(site: FakeSite, policy: &ScrollPolicy) -> ScrollReport {
        let browser = FakeBrowser::new().site(URL, site);
        let page = browser.new_page().await.unwrap();
        page.goto(URL, Duration::from_secs(60)).await.unwrap();
        let report = realize_infinite_scroll(&page, policy).await.unwrap();
        page.close().await.unwrap();
        report
    }

    #[tokio::test(start_paused = true)]
    async fn stops_on_two_equal_readings() {
        let report = scroll(
            FakeSite::default().heights(&[1000, 2000, 3000, 3000]),
            &ScrollPolicy::default(),
        )
        .await;

        assert_eq!(
            report,
            ScrollReport {
                iterations: 3,
                final_height: 3000,
                stabilized: true,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn static_page_needs_one_round() {
        let report = scroll(FakeSite::default(), &ScrollPolicy::default()).await;
        assert_eq!(report.iterations, 1);
        assert!(report.stabilized);
    }

    #[tokio::test(start_paused = true)]
    async fn settle_time_elapses_per_round() {
        let started = tokio::time::Instant::now();
        scroll(
            FakeSite::default().heights(&[1000, 2000, 2000]),
            &ScrollPolicy::default(),
        )
        .await;
        assert!(started.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn ever_growing_page_is_bounded() {
        let policy = ScrollPolicy {
            settle: Duration::from_secs(1),
            max_iterations: 5,
        };
        let report = scroll(FakeSite::default().ever_growing(), &policy).await;

        assert_eq!(report.iterations, 5);
        assert!(!report.stabilized);
        assert_eq!(report.final_height, 6000);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_iterations_disables_scrolling() {
        let policy = ScrollPolicy {
            settle: Duration::from_secs(1),
            max_iterations: 0,
        };
        let report = scroll(FakeSite::default().heights(&[1500]), &policy).await;
        assert_eq!(report.iterations, 0);
        assert_eq!(report.final_height, 1500);
    }
}
