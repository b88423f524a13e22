mod config;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use engine_logging::{engine_error, engine_info};

use crate::config::TrendingConfig;

#[derive(Parser, Debug)]
#[command(name = "trending", about = "Build the consolidated SSAWG trending page")]
pub struct Cli {
    /// Output data directory
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    /// RON configuration file (default: <data-dir>/trending.ron when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Jinja-style report template looping over `html_chunks`
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Harvest only this page into its own output file
    #[arg(long)]
    pub page: Option<String>,

    /// Take the page from this URL instead of resolving it
    #[arg(long, requires = "page")]
    pub url: Option<String>,

    /// Current-period URL to pair with --url (default: same as --url)
    #[arg(long, requires = "url")]
    pub url_current: Option<String>,

    /// Output file for single page mode
    #[arg(long, requires = "page")]
    pub output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, config_source) = match TrendingConfig::load(cli.config.as_deref(), &cli.data_dir) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("trending: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    let level = match config.log_level_filter() {
        Ok(level) => level,
        Err(err) => {
            eprintln!("trending: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    engine_logging::initialize(level, config.log_destination());
    match &config_source {
        Some(path) => engine_info!("Loaded configuration from {}", path.display()),
        None => engine_info!("No configuration file, using defaults"),
    }

    match run::run(&cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            engine_error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
