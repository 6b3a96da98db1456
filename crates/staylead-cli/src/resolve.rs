use std::collections::HashSet;
use std::path::Path;

use staylead_core::AppConfig;
use staylead_scraper::{
    resolve_groups, BrowserSettings, ChromeBrowser, GroupReport, ResolutionRow, ResolverSettings,
};

use crate::output::write_rows;

pub(crate) async fn run_resolve(config: &AppConfig) -> anyhow::Result<()> {
    let groups = staylead_core::load_url_groups(&config.url_groups_path)?;
    if groups.is_empty() {
        tracing::info!(path = %config.url_groups_path.display(), "no URL groups found");
        return Ok(());
    }

    let browser = ChromeBrowser::launch(&BrowserSettings::from_app_config(config)).await?;
    let reports =
        resolve_groups(&browser, &groups, &ResolverSettings::from_app_config(config)).await;
    if let Err(e) = browser.close().await {
        tracing::warn!(error = %e, "failed to close browser");
    }

    let write_result = write_reports(&config.output_dir, &reports);

    let kept: usize = reports.iter().map(|r| r.results.len()).sum();
    let attempted: usize = reports.iter().map(|r| r.attempted).sum();
    println!(
        "resolved {kept} of {attempted} URLs across {} of {} groups",
        reports.len(),
        groups.len()
    );
    write_result
}

/// Write one CSV per report into `output_dir`.
///
/// A failed write is logged and the remaining reports are still written; the
/// failures are returned together at the end.
fn write_reports(output_dir: &Path, reports: &[GroupReport]) -> anyhow::Result<()> {
    let names = output_file_names(reports);
    let mut failed = Vec::new();

    for (report, name) in reports.iter().zip(&names) {
        let path = output_dir.join(name);
        let rows: Vec<ResolutionRow> = report.results.iter().map(ResolutionRow::from).collect();
        match write_rows(&path, &ResolutionRow::COLUMNS, &rows) {
            Ok(()) => tracing::info!(
                group = %report.title,
                path = %path.display(),
                rows = rows.len(),
                "wrote group results"
            ),
            Err(e) => {
                tracing::error!(group = %report.title, path = %path.display(), error = %e, "failed to write group results");
                failed.push(format!("{}: {e:#}", report.title));
            }
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        anyhow::bail!(
            "failed to write {} of {} group files: {}",
            failed.len(),
            reports.len(),
            failed.join("; ")
        )
    }
}

/// `<slug>.csv` per report, suffixed `-2`, `-3`, ... where slugs collide.
fn output_file_names(reports: &[GroupReport]) -> Vec<String> {
    let mut taken = HashSet::new();
    reports
        .iter()
        .map(|report| {
            let base = if report.slug.is_empty() {
                "untitled"
            } else {
                report.slug.as_str()
            };
            let mut stem = base.to_owned();
            let mut n = 2;
            while !taken.insert(stem.clone()) {
                stem = format!("{base}-{n}");
                n += 1;
            }
            if n > 2 {
                tracing::warn!(group = %report.title, file = %stem, "group name collides with an earlier group");
            }
            format!("{stem}.csv")
        })
        .collect()
}
