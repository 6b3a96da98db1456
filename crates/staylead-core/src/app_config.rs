use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub url_groups_path: PathBuf,
    pub output_dir: PathBuf,
    pub detail_output_path: PathBuf,
    /// Explicit browser executable. When `None` the scraper probes well-known
    /// install locations and `PATH`.
    pub chrome_path: Option<PathBuf>,
    pub browser_headless: bool,
    pub navigation_timeout_secs: u64,
    /// Total navigation attempts per candidate URL before it is reported as failed.
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub pacing_delay_ms: u64,
    pub max_concurrent_pages: usize,
    pub scroll_settle_ms: u64,
    pub scroll_max_iterations: u32,
}
