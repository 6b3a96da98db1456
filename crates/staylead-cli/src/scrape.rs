use staylead_core::AppConfig;
use staylead_scraper::{scrape_details, BrowserSettings, ChromeBrowser, DetailRow, DetailSettings};

use crate::output::{collect_unique_urls, discover_result_files, write_rows};

pub(crate) async fn run_scrape(config: &AppConfig) -> anyhow::Result<()> {
    let files = discover_result_files(&config.output_dir)?;
    let urls = collect_unique_urls(&files)?;
    if urls.is_empty() {
        anyhow::bail!(
            "no URLs found to scrape in {} ({} CSV files)",
            config.output_dir.display(),
            files.len()
        );
    }
    tracing::info!(files = files.len(), urls = urls.len(), "loaded detail inputs");

    let browser = ChromeBrowser::launch(&BrowserSettings::from_app_config(config)).await?;
    let outcomes = scrape_details(&browser, &urls, &DetailSettings::from_app_config(config)).await;
    if let Err(e) = browser.close().await {
        tracing::warn!(error = %e, "failed to close browser");
    }

    let rows: Vec<DetailRow> = outcomes.iter().map(DetailRow::from).collect();
    write_rows(&config.detail_output_path, &DetailRow::COLUMNS, &rows)?;

    let scraped = outcomes.iter().filter(|o| o.is_scraped()).count();
    println!(
        "scraped {scraped} of {} pages ({} failed) into {}",
        outcomes.len(),
        outcomes.len() - scraped,
        config.detail_output_path.display()
    );
    Ok(())
}
