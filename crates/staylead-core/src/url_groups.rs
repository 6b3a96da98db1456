use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Placeholder substituted with each integer of a group's range.
pub const NUMBER_PLACEHOLDER: &str = "{number}";

fn default_bound() -> i64 {
    1
}

/// A named family of parametrized URLs: `parent_url` with `{number}` filled in
/// for every integer of the inclusive range `[start, end]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlGroup {
    pub title: String,
    pub parent_url: String,
    #[serde(default = "default_bound")]
    pub start: i64,
    #[serde(default = "default_bound")]
    pub end: i64,
}

impl UrlGroup {
    /// Check that the range is non-empty and 1-based.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRange`] when `start > end` or either
    /// bound is below 1.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start > self.end {
            return Err(ConfigError::InvalidRange {
                title: self.title.clone(),
                reason: format!("start ({}) > end ({})", self.start, self.end),
            });
        }
        if self.start < 1 || self.end < 1 {
            return Err(ConfigError::InvalidRange {
                title: self.title.clone(),
                reason: format!(
                    "start ({}) or end ({}) is less than 1",
                    self.start, self.end
                ),
            });
        }
        Ok(())
    }

    /// Materialize the concrete URLs of this group, in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRange`] if the range fails [`Self::validate`];
    /// no URLs are produced for an invalid group.
    pub fn candidate_urls(&self) -> Result<Vec<String>, ConfigError> {
        self.validate()?;
        Ok((self.start..=self.end)
            .map(|n| self.parent_url.replace(NUMBER_PLACEHOLDER, &n.to_string()))
            .collect())
    }

    /// File-name-safe slug derived from the title.
    ///
    /// Letters and digits of any script are kept. Distinct titles can still
    /// share a slug (`"Villa Ubud"` and `"villa-ubud"`).
    #[must_use]
    pub fn slug(&self) -> String {
        self.title
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else if c == ' ' || c == '/' || c == '.' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// Load the URL group list from a JSON file (or YAML, by `.yaml`/`.yml` extension).
///
/// Ranges are not validated here: an invalid group is skipped at run time
/// without failing the whole file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed.
pub fn load_url_groups(path: &Path) -> Result<Vec<UrlGroup>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::UrlGroupsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let parsed = if is_yaml {
        serde_yaml::from_str::<Vec<UrlGroup>>(&content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str::<Vec<UrlGroup>>(&content).map_err(|e| e.to_string())
    };

    parsed.map_err(|reason| ConfigError::UrlGroupsFileParse {
        path: path.display().to_string(),
        reason,
    })
}

#[cfg(test)]
#[path = "url_groups_test.rs"]
mod tests;
