//! Group iteration for the redirect resolver.
//!
//! Each URL group is expanded into candidate URLs and resolved sequentially
//! with a pacing delay between navigations. Groups run concurrently with each
//! other on the same browser session.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use staylead_core::UrlGroup;

use crate::browser::BrowserSession;
use crate::navigate::{resolve_final_url, RetryPolicy};
use crate::types::ResolutionResult;

/// Substring marking a redirect that landed on an error page.
const ERROR_LANDING_MARKER: &str = "error";

#[derive(Debug, Clone)]
pub struct ResolverSettings {
    pub retry: RetryPolicy,
    /// Politeness delay between consecutive navigations within one group.
    pub pacing: Duration,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            pacing: Duration::from_secs(1),
        }
    }
}

impl ResolverSettings {
    #[must_use]
    pub fn from_app_config(config: &staylead_core::AppConfig) -> Self {
        Self {
            retry: RetryPolicy::from_app_config(config),
            pacing: Duration::from_millis(config.pacing_delay_ms),
        }
    }
}

/// Leads kept for one URL group.
#[derive(Debug, Clone)]
pub struct GroupReport {
    pub title: String,
    /// File-system friendly name for the group's output.
    pub slug: String,
    /// Only redirected results, in candidate order.
    pub results: Vec<ResolutionResult>,
    pub attempted: usize,
    pub dropped: usize,
}

/// Resolve every candidate URL of `group`.
///
/// Returns `None` when the group's range is invalid; nothing is navigated in
/// that case.
pub async fn resolve_group<S: BrowserSession>(
    session: &S,
    group: &UrlGroup,
    settings: &ResolverSettings,
) -> Option<GroupReport> {
    let urls = match group.candidate_urls() {
        Ok(urls) => urls,
        Err(e) => {
            tracing::error!(group = %group.title, error = %e, "skipping URL group");
            return None;
        }
    };

    tracing::info!(group = %group.title, count = urls.len(), "resolving group");

    let mut resolved = Vec::with_capacity(urls.len());
    for (i, url) in urls.iter().enumerate() {
        resolved.push(resolve_final_url(session, url, &settings.retry).await);
        if i + 1 < urls.len() {
            tokio::time::sleep(settings.pacing).await;
        }
    }

    let attempted = resolved.len();
    let results: Vec<ResolutionResult> = resolved.into_iter().filter(is_lead).collect();
    let dropped = attempted - results.len();

    tracing::info!(
        group = %group.title,
        attempted,
        kept = results.len(),
        dropped,
        "group resolved"
    );

    Some(GroupReport {
        title: group.title.clone(),
        slug: group.slug(),
        results,
        attempted,
        dropped,
    })
}

/// Resolve all groups concurrently. Reports follow `groups` order; invalid
/// groups are left out.
pub async fn resolve_groups<S: BrowserSession>(
    session: &S,
    groups: &[UrlGroup],
    settings: &ResolverSettings,
) -> Vec<GroupReport> {
    stream::iter(groups)
        .map(|group| resolve_group(session, group, settings))
        .buffered(groups.len().max(1))
        .filter_map(|report| async move { report })
        .collect()
        .await
}

fn is_lead(result: &ResolutionResult) -> bool {
    result
        .final_url()
        .is_some_and(|url| !url.contains(ERROR_LANDING_MARKER))
}
