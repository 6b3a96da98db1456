//! CSV persistence for resolver and detail results.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use csv::{Reader, Writer};
use serde::Serialize;

const FINAL_URL_COLUMN: &str = "final_url";

/// Write `rows` as CSV to `path`, creating parent directories as needed.
///
/// `None` fields become empty cells, so rows of differing shape share one
/// header. `header` must match the field order of `T`; it is written
/// explicitly when `rows` is empty so the file is still a table.
pub(crate) fn write_rows<T: Serialize>(
    path: &Path,
    header: &[&str],
    rows: &[T],
) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let mut wtr = Writer::from_path(path)
        .with_context(|| format!("failed to open {} for writing", path.display()))?;
    if rows.is_empty() {
        wtr.write_record(header)?;
    }
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// All `*.csv` files directly inside `dir`, sorted by path.
///
/// A missing directory yields no files.
pub(crate) fn discover_result_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "input directory does not exist");
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if path.is_file() && is_csv {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Non-empty values of the `final_url` column. Files without that column
/// contribute nothing.
pub(crate) fn read_final_urls(path: &Path) -> anyhow::Result<Vec<String>> {
    let mut rdr = Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let Some(column) = rdr
        .headers()?
        .iter()
        .position(|h| h.trim() == FINAL_URL_COLUMN)
    else {
        tracing::debug!(path = %path.display(), "no final_url column");
        return Ok(Vec::new());
    };

    let mut urls = Vec::new();
    for record in rdr.records() {
        let record = record.with_context(|| format!("malformed row in {}", path.display()))?;
        if let Some(url) = record.get(column).map(str::trim).filter(|u| !u.is_empty()) {
            urls.push(url.to_owned());
        }
    }
    Ok(urls)
}

/// Union of every file's `final_url` values, without duplicates, sorted.
pub(crate) fn collect_unique_urls(files: &[PathBuf]) -> anyhow::Result<Vec<String>> {
    let mut unique = BTreeSet::new();
    for file in files {
        unique.extend(read_final_urls(file)?);
    }
    Ok(unique.into_iter().collect())
}

#[cfg(test)]
#[path = "output_test.rs"]
mod tests;
