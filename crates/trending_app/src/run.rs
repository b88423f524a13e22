use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use engine_logging::engine_info;
use trending_core::ResolvedLocation;
use trending_engine::{
    aspect_registry, write_report, Credentials, Harvester, RenderMetadata, ReportWriter,
    ReqwestFetcher, Template,
};

use crate::config::TrendingConfig;
use crate::Cli;

/// Default output of single page mode.
const PAGE_OUTPUT_FILENAME: &str = "trending.html";

pub async fn run(cli: &Cli, config: &TrendingConfig) -> Result<()> {
    let template = load_template(cli.template.as_deref().or(config.template_path.as_deref()))?;
    let credentials = match config.netrc_path() {
        Some(path) => Credentials::load_netrc(&path)?,
        None => Credentials::new(),
    };
    let fetcher = ReqwestFetcher::new(config.fetch_settings())?;
    let harvester = Harvester::new(
        Arc::new(fetcher),
        Arc::new(credentials),
        config.harvest_settings(),
    );

    let now = Utc::now();
    let mut registry = aspect_registry(&config.base_url)?;

    let (outcomes, writer, filename) = match &cli.page {
        None => {
            let outcomes = harvester.harvest(&registry, now).await?;
            (
                outcomes,
                ReportWriter::new(cli.data_dir.clone()),
                config.output_filename.clone(),
            )
        }
        Some(key) => {
            registry = registry.retain_only(key)?;
            let (dir, filename) = page_output(cli);
            engine_info!("Generating test trending page for {} into {}", key, dir.join(&filename).display());

            let outcomes = match &cli.url {
                None => harvester.harvest(&registry, now).await?,
                Some(url) => {
                    registry.check_credentials(harvester.credentials())?;
                    let current = cli.url_current.clone().unwrap_or_else(|| url.clone());
                    let location = ResolvedLocation::split(url.clone(), current);
                    let mut outcomes = Vec::with_capacity(registry.len());
                    for kind in registry.iter() {
                        outcomes.push(harvester.harvest_page(kind, now, Some(location.clone())).await);
                    }
                    outcomes
                }
            };
            (outcomes, ReportWriter::new(dir), filename)
        }
    };

    let summary = write_report(&writer, &filename, &template, outcomes, &RenderMetadata::new(now))
        .context("cannot write trending page")?;
    engine_info!(
        "Trending page {} ready: {} pages ok, {} failed",
        summary.output_path.display(),
        summary.succeeded,
        summary.failed
    );
    Ok(())
}

fn load_template(path: Option<&Path>) -> Result<Template> {
    match path {
        Some(path) => Ok(Template::load(path)?),
        None => Ok(Template::default()),
    }
}

/// Directory and file name for single page mode.
fn page_output(cli: &Cli) -> (PathBuf, String) {
    let Some(output) = &cli.output else {
        return (cli.data_dir.clone(), PAGE_OUTPUT_FILENAME.to_string());
    };
    let filename = output
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| PAGE_OUTPUT_FILENAME.to_string());
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    (dir, filename)
}
