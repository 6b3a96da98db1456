//! Single-URL navigation with redirect classification and fixed back-off retry.
//!
//! Every candidate URL ends in exactly one [`NavigationOutcome`]:
//!
//! | Attempt result | Outcome | Retried? |
//! |----------------|---------|----------|
//! | landed on a different URL | [`NavigationOutcome::Redirected`] | no |
//! | landed on the requested URL | [`NavigationOutcome::NoRedirection`] | no |
//! | navigation error or timeout | next attempt after `retry_delay` | yes |
//!
//! Once `max_retries` attempts have failed the outcome is
//! [`NavigationOutcome::Failed`] with reason `"Failed after {max_retries} retries"`.

use std::time::Duration;

use crate::browser::{BrowserSession, PageHandle};
use crate::error::ScraperError;
use crate::types::ResolutionResult;

/// Error reason recorded when the browser stays on the requested URL.
pub const NO_REDIRECTION: &str = "No redirection";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Redirected { final_url: String },
    NoRedirection,
    Failed { reason: String },
}

impl NavigationOutcome {
    /// Reason string for the two error states, `None` for a redirect.
    #[must_use]
    pub fn error_reason(&self) -> Option<&str> {
        match self {
            NavigationOutcome::Redirected { .. } => None,
            NavigationOutcome::NoRedirection => Some(NO_REDIRECTION),
            NavigationOutcome::Failed { reason } => Some(reason.as_str()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts before giving up.
    pub max_retries: u32,
    /// Fixed sleep between a failed attempt and the next one.
    pub retry_delay: Duration,
    pub navigation_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_secs(2),
            navigation_timeout: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn from_app_config(config: &staylead_core::AppConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            navigation_timeout: Duration::from_secs(config.navigation_timeout_secs),
        }
    }
}

/// Classify a completed navigation by comparing where the page landed with
/// what was requested.
#[must_use]
pub fn classify_navigation(requested: &str, landed: &str) -> NavigationOutcome {
    if requested == landed {
        NavigationOutcome::NoRedirection
    } else {
        NavigationOutcome::Redirected {
            final_url: landed.to_owned(),
        }
    }
}

/// Resolve `url` to its post-redirect destination on a page of its own.
///
/// The page is opened once, reused across attempts and closed exactly once
/// whatever the outcome. A page that cannot be opened yields a
/// [`NavigationOutcome::Failed`] carrying the open error.
pub async fn resolve_final_url<S: BrowserSession>(
    session: &S,
    url: &str,
    policy: &RetryPolicy,
) -> ResolutionResult {
    let page = match session.new_page().await {
        Ok(page) => page,
        Err(e) => {
            tracing::error!(url, error = %e, "could not open page");
            return ResolutionResult::new(
                url,
                NavigationOutcome::Failed {
                    reason: e.to_string(),
                },
            );
        }
    };

    let outcome = navigate_with_retry(&page, url, policy).await;

    if let Err(e) = page.close().await {
        tracing::warn!(url, error = %e, "failed to close page");
    }

    match &outcome {
        NavigationOutcome::Redirected { final_url } => {
            tracing::info!(original = url, final_url = %final_url, "redirected");
        }
        NavigationOutcome::NoRedirection => tracing::info!(url, "no redirection"),
        NavigationOutcome::Failed { reason } => {
            tracing::error!(url, reason = %reason, "could not resolve URL");
        }
    }

    ResolutionResult::new(url, outcome)
}

/// Drive up to `policy.max_retries` navigation attempts on `page`.
pub(crate) async fn navigate_with_retry<P: PageHandle>(
    page: &P,
    url: &str,
    policy: &RetryPolicy,
) -> NavigationOutcome {
    for attempt in 1..=policy.max_retries {
        match attempt_navigation(page, url, policy.navigation_timeout).await {
            Ok(landed) => return classify_navigation(url, &landed),
            Err(err) => {
                tracing::warn!(
                    url,
                    attempt,
                    max_retries = policy.max_retries,
                    error = %err,
                    "navigation failed"
                );
                if attempt < policy.max_retries {
                    tokio::time::sleep(policy.retry_delay).await;
                }
            }
        }
    }

    NavigationOutcome::Failed {
        reason: format!("Failed after {} retries", policy.max_retries),
    }
}

async fn attempt_navigation<P: PageHandle>(
    page: &P,
    url: &str,
    timeout: Duration,
) -> Result<String, ScraperError> {
    page.goto(url, timeout).await?;
    page.current_url()
        .await?
        .ok_or_else(|| ScraperError::Navigation {
            url: url.to_owned(),
            reason: "page reported no URL after load".to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeBrowser, FakeSite};

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            retry_delay: Duration::from_secs(2),
            navigation_timeout: Duration::from_secs(60),
        }
    }

    #[test]
    fn classify_same_url_is_no_redirection() {
        assert_eq!(
            classify_navigation("https://x.test/h/1", "https://x.test/h/1"),
            NavigationOutcome::NoRedirection
        );
    }

    #[test]
    fn classify_different_url_is_redirect() {
        assert_eq!(
            classify_navigation("https://x.test/h/1", "https://x.test/room/1"),
            NavigationOutcome::Redirected {
                final_url: "https://x.test/room/1".to_owned()
            }
        );
    }

    #[test]
    fn error_reasons() {
        assert_eq!(
            NavigationOutcome::NoRedirection.error_reason(),
            Some(NO_REDIRECTION)
        );
        assert_eq!(
            NavigationOutcome::Redirected {
                final_url: "https://x.test/a".to_owned()
            }
            .error_reason(),
            None
        );
    }

    #[tokio::test(start_paused = true)]
    async fn redirect_resolves_on_first_attempt() {
        let browser = FakeBrowser::new().site(
            "https://x.test/h/1",
            FakeSite::default().redirect_to("https://x.test/room/1"),
        );
        let result = resolve_final_url(&browser, "https://x.test/h/1", &fast_policy(3)).await;

        assert_eq!(result.final_url(), Some("https://x.test/room/1"));
        assert!(result.error().is_none());
        assert_eq!(browser.goto_calls(), 1);
        assert_eq!(browser.pages_opened(), 1);
        assert_eq!(browser.pages_closed(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unchanged_url_is_terminal_and_not_retried() {
        let browser = FakeBrowser::new().site("https://x.test/h/1", FakeSite::default());
        let result = resolve_final_url(&browser, "https://x.test/h/1", &fast_policy(3)).await;

        assert_eq!(result.outcome, NavigationOutcome::NoRedirection);
        assert_eq!(result.error(), Some("No redirection"));
        assert!(result.final_url().is_none());
        assert_eq!(browser.goto_calls(), 1);
        assert_eq!(browser.pages_closed(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_below_budget_end_in_success() {
        for k in 0..3 {
            let browser = FakeBrowser::new().site(
                "https://x.test/h/1",
                FakeSite::default()
                    .redirect_to("https://x.test/room/1")
                    .failing(k),
            );
            let result =
                resolve_final_url(&browser, "https://x.test/h/1", &fast_policy(3)).await;

            assert_eq!(
                result.final_url(),
                Some("https://x.test/room/1"),
                "k = {k}"
            );
            assert!(result.error().is_none(), "k = {k}");
            assert_eq!(browser.goto_calls(), k as usize + 1);
            assert_eq!(browser.pages_opened(), 1);
            assert_eq!(browser.pages_closed(), 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_budget_reports_exact_reason() {
        let browser = FakeBrowser::new().site(
            "https://x.test/h/1",
            FakeSite::default()
                .redirect_to("https://x.test/room/1")
                .failing(3),
        );
        let result = resolve_final_url(&browser, "https://x.test/h/1", &fast_policy(3)).await;

        assert_eq!(
            result.outcome,
            NavigationOutcome::Failed {
                reason: "Failed after 3 retries".to_owned()
            }
        );
        assert!(result.final_url().is_none());
        assert_eq!(browser.goto_calls(), 3);
        assert_eq!(browser.pages_closed(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn back_off_sleeps_between_attempts_only() {
        let browser = FakeBrowser::new().site("https://x.test/h/1", FakeSite::default().failing(u32::MAX));
        let started = tokio::time::Instant::now();
        let result = resolve_final_url(&browser, "https://x.test/h/1", &fast_policy(3)).await;

        assert!(matches!(result.outcome, NavigationOutcome::Failed { .. }));
        // Two sleeps of 2s between three attempts; none after the last one.
        let elapsed = started.elapsed();
        assert!(
            elapsed >= Duration::from_secs(4) && elapsed < Duration::from_secs(5),
            "elapsed {elapsed:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_host_fails_after_retries() {
        let browser = FakeBrowser::new();
        let result = resolve_final_url(&browser, "https://nowhere.test/1", &fast_policy(2)).await;
        assert_eq!(result.error(), Some("Failed after 2 retries"));
        assert_eq!(browser.pages_closed(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn page_open_failure_is_contained() {
        let browser = FakeBrowser::new().refuse_pages();
        let result = resolve_final_url(&browser, "https://x.test/h/1", &fast_policy(3)).await;

        assert!(matches!(result.outcome, NavigationOutcome::Failed { .. }));
        assert_eq!(browser.goto_calls(), 0);
        assert_eq!(browser.pages_closed(), 0);
    }
}
