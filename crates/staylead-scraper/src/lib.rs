//! Browser-driven resolution and detail scraping for parametrized lead URLs.
//!
//! Two pipelines share one [`BrowserSession`] per run:
//!
//! - [`resolve_groups`] expands each [`staylead_core::UrlGroup`] into candidate
//!   URLs and keeps only those that redirect somewhere else.
//! - [`scrape_details`] visits resolved URLs under a concurrency cap, realizes
//!   infinite-scroll content and extracts contact/location fields.

pub mod browser;
pub mod detail;
pub mod error;
pub mod extract;
pub mod navigate;
pub mod resolver;
pub mod scroll;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use browser::{BrowserSession, BrowserSettings, ChromeBrowser, PageHandle};
pub use detail::{scrape_details, DetailSettings};
pub use error::ScraperError;
pub use extract::{extract_detail, extract_json_graph, GraphLocation};
pub use navigate::{classify_navigation, resolve_final_url, NavigationOutcome, RetryPolicy};
pub use resolver::{resolve_group, resolve_groups, GroupReport, ResolverSettings};
pub use scroll::{realize_infinite_scroll, ScrollPolicy, ScrollReport};
pub use types::{DetailOutcome, DetailRecord, DetailRow, ResolutionResult, ResolutionRow};
