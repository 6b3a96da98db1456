//! Result records produced by the two pipelines and their tabular row views.

use serde::{Deserialize, Serialize};

use crate::navigate::NavigationOutcome;

/// Outcome of resolving one candidate URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    pub original_url: String,
    pub outcome: NavigationOutcome,
}

impl ResolutionResult {
    #[must_use]
    pub fn new(original_url: impl Into<String>, outcome: NavigationOutcome) -> Self {
        Self {
            original_url: original_url.into(),
            outcome,
        }
    }

    #[must_use]
    pub fn final_url(&self) -> Option<&str> {
        match &self.outcome {
            NavigationOutcome::Redirected { final_url } => Some(final_url.as_str()),
            NavigationOutcome::NoRedirection | NavigationOutcome::Failed { .. } => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.outcome.error_reason()
    }
}

/// One `original_url, final_url, error` row of a group's output table.
///
/// Exactly one of `final_url` / `error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionRow {
    pub original_url: String,
    pub final_url: Option<String>,
    pub error: Option<String>,
}

impl ResolutionRow {
    /// Header of a group's output table, in field order.
    pub const COLUMNS: [&'static str; 3] = ["original_url", "final_url", "error"];
}

impl From<&ResolutionResult> for ResolutionRow {
    fn from(result: &ResolutionResult) -> Self {
        Self {
            original_url: result.original_url.clone(),
            final_url: result.final_url().map(str::to_owned),
            error: result.error().map(str::to_owned),
        }
    }
}

/// Contact and location fields extracted from one rendered detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub title: Option<String>,
    pub url: String,
    pub email: Option<String>,
    pub whatsapp: Option<String>,
    pub instagram: Option<String>,
    pub address: Option<String>,
    pub map_url: Option<String>,
}

/// Result of one detail-scraping task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailOutcome {
    Scraped(DetailRecord),
    Failed { url: String, error: String },
}

impl DetailOutcome {
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            DetailOutcome::Scraped(record) => &record.url,
            DetailOutcome::Failed { url, .. } => url,
        }
    }

    #[must_use]
    pub fn is_scraped(&self) -> bool {
        matches!(self, DetailOutcome::Scraped(_))
    }
}

/// Flat row for the detail output table.
///
/// Success rows leave `error` empty; failure rows carry only `url` and `error`.
/// Every column is optional so both shapes share one header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRow {
    pub title: Option<String>,
    pub url: Option<String>,
    pub email: Option<String>,
    pub whatsapp: Option<String>,
    pub instagram: Option<String>,
    pub address: Option<String>,
    pub map_url: Option<String>,
    pub error: Option<String>,
}

impl DetailRow {
    /// Header of the detail output table, in field order.
    pub const COLUMNS: [&'static str; 8] = [
        "title",
        "url",
        "email",
        "whatsapp",
        "instagram",
        "address",
        "map_url",
        "error",
    ];
}

impl From<&DetailOutcome> for DetailRow {
    fn from(outcome: &DetailOutcome) -> Self {
        match outcome {
            DetailOutcome::Scraped(record) => Self {
                title: record.title.clone(),
                url: Some(record.url.clone()),
                email: record.email.clone(),
                whatsapp: record.whatsapp.clone(),
                instagram: record.instagram.clone(),
                address: record.address.clone(),
                map_url: record.map_url.clone(),
                error: None,
            },
            DetailOutcome::Failed { url, error } => Self {
                url: Some(url.clone()),
                error: Some(error.clone()),
                ..Self::default()
            },
        }
    }
}
