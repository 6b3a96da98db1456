use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every setting has a default, so an empty environment yields a usable
/// configuration. Parsing is decoupled from the real environment so tests can
/// feed a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        parse_flag(&or_default(var, default))
            .ok_or_else(|| invalid(var, "expected true/false, 1/0 or yes/no".to_string()))
    };

    let log_level = or_default("STAYLEAD_LOG_LEVEL", "info");
    let url_groups_path = PathBuf::from(or_default("STAYLEAD_URL_GROUPS_PATH", "./urls.json"));
    let output_dir = PathBuf::from(or_default("STAYLEAD_OUTPUT_DIR", "./outputs"));
    let detail_output_path = PathBuf::from(or_default(
        "STAYLEAD_DETAIL_OUTPUT_PATH",
        "./outputs/result/scraped_result.csv",
    ));
    let chrome_path = lookup("STAYLEAD_CHROME_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let browser_headless = parse_bool("STAYLEAD_BROWSER_HEADLESS", "true")?;
    let navigation_timeout_secs = parse_u64("STAYLEAD_NAVIGATION_TIMEOUT_SECS", "60")?;
    let max_retries = parse_u32("STAYLEAD_MAX_RETRIES", "3")?;
    if max_retries == 0 {
        return Err(invalid(
            "STAYLEAD_MAX_RETRIES",
            "must allow at least one attempt".to_string(),
        ));
    }
    let retry_delay_ms = parse_u64("STAYLEAD_RETRY_DELAY_MS", "2000")?;
    let pacing_delay_ms = parse_u64("STAYLEAD_PACING_DELAY_MS", "1000")?;
    let max_concurrent_pages = parse_usize("STAYLEAD_MAX_CONCURRENT_PAGES", "5")?.max(1);
    let scroll_settle_ms = parse_u64("STAYLEAD_SCROLL_SETTLE_MS", "1000")?;
    let scroll_max_iterations = parse_u32("STAYLEAD_SCROLL_MAX_ITERATIONS", "50")?;

    Ok(AppConfig {
        log_level,
        url_groups_path,
        output_dir,
        detail_output_path,
        chrome_path,
        browser_headless,
        navigation_timeout_secs,
        max_retries,
        retry_delay_ms,
        pacing_delay_ms,
        max_concurrent_pages,
        scroll_settle_ms,
        scroll_max_iterations,
    })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
