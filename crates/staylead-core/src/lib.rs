pub mod app_config;
pub mod config;
pub mod url_groups;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use url_groups::{load_url_groups, UrlGroup};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read URL group file {path}: {source}")]
    UrlGroupsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse URL group file {path}: {reason}")]
    UrlGroupsFileParse { path: String, reason: String },

    #[error("invalid range for {title}: {reason}")]
    InvalidRange { title: String, reason: String },
}
