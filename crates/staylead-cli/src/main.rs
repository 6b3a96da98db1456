mod output;
mod resolve;
mod scrape;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "staylead")]
#[command(about = "Resolve parametrized listing URLs and scrape contact details")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve every URL group to its redirect destinations, one CSV per group
    Resolve {
        /// URL group file (JSON array, or YAML by extension)
        #[arg(long)]
        groups: Option<PathBuf>,
        /// Directory receiving `<group>.csv` files
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Scrape contact details from the `final_url` column of resolver output
    Scrape {
        /// Directory whose `*.csv` files are read
        #[arg(long)]
        input_dir: Option<PathBuf>,
        /// Detail CSV to write
        #[arg(long)]
        output: Option<PathBuf>,
        /// Maximum browser pages open at once
        #[arg(long)]
        max_concurrent: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = staylead_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Resolve { groups, output_dir } => {
            if let Some(path) = groups {
                config.url_groups_path = path;
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            resolve::run_resolve(&config).await?;
        }
        Commands::Scrape {
            input_dir,
            output,
            max_concurrent,
        } => {
            if let Some(dir) = input_dir {
                config.output_dir = dir;
            }
            if let Some(path) = output {
                config.detail_output_path = path;
            }
            if let Some(n) = max_concurrent {
                config.max_concurrent_pages = n.max(1);
            }
            scrape::run_scrape(&config).await?;
        }
    }

    Ok(())
}
