use std::error::Error as _;
use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use engine_logging::{engine_error, engine_info};
use futures_util::{stream, StreamExt};
use trending_core::{PageRun, ResolvedLocation, Stage};

use crate::credentials::Credentials;
use crate::error::{ConfigurationError, PageError};
use crate::extract::MarkupExtractor;
use crate::fetch::Fetcher;
use crate::registry::{PageKind, Registry};
use crate::resolve::Resolver;

#[derive(Debug, Clone)]
pub struct HarvestSettings {
    /// Pages processed at once. 1 harvests strictly one after another.
    pub concurrency: usize,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

/// Result of harvesting one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestOutcome {
    Success {
        key: String,
        fragments: Vec<String>,
    },
    Failure {
        key: String,
        stage: Stage,
        /// Full error report, already HTML-escaped.
        detail: String,
    },
}

impl HarvestOutcome {
    pub fn key(&self) -> &str {
        match self {
            HarvestOutcome::Success { key, .. } | HarvestOutcome::Failure { key, .. } => key,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, HarvestOutcome::Success { .. })
    }

    /// Fragments this page contributes to the report. A failed page
    /// contributes a single diagnostic block.
    pub fn into_fragments(self) -> Vec<String> {
        match self {
            HarvestOutcome::Success { fragments, .. } => fragments,
            HarvestOutcome::Failure { key, detail, .. } => vec![format!(
                "<h2>{}: FAILED PROCESSING</h2>\n<pre>\n{}\n</pre>\n",
                html_escape::encode_text(&key),
                detail
            )],
        }
    }
}

/// Drives every registered page through resolve, fetch, extract and select.
pub struct Harvester {
    fetcher: Arc<dyn Fetcher>,
    credentials: Arc<Credentials>,
    extractor: MarkupExtractor,
    settings: HarvestSettings,
}

impl Harvester {
    pub fn new(fetcher: Arc<dyn Fetcher>, credentials: Arc<Credentials>, settings: HarvestSettings) -> Self {
        Self {
            fetcher,
            credentials,
            extractor: MarkupExtractor,
            settings,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Harvests every page in registry order.
    ///
    /// Only configuration problems fail the call, and they do so before the
    /// first request. Page problems become [`HarvestOutcome::Failure`] entries.
    pub async fn harvest(
        &self,
        registry: &Registry,
        now: DateTime<Utc>,
    ) -> Result<Vec<HarvestOutcome>, ConfigurationError> {
        registry.check_credentials(&self.credentials)?;

        let concurrency = self.settings.concurrency.max(1);
        engine_info!("Harvesting {} pages (concurrency {})", registry.len(), concurrency);

        // `buffered` yields in input order whatever order the pages finish in.
        let outcomes: Vec<HarvestOutcome> = stream::iter(registry.iter())
            .map(|kind| self.harvest_page(kind, now, None))
            .buffered(concurrency)
            .collect()
            .await;

        let failed = outcomes.iter().filter(|o| !o.is_success()).count();
        engine_info!(
            "Harvest finished: {} succeeded, {} failed",
            outcomes.len() - failed,
            failed
        );
        Ok(outcomes)
    }

    /// Harvests a single page. With `location` set, resolution is skipped and
    /// the given URLs are used as-is.
    pub async fn harvest_page(
        &self,
        kind: &PageKind,
        now: DateTime<Utc>,
        location: Option<ResolvedLocation>,
    ) -> HarvestOutcome {
        let key = kind.spec().key().to_string();
        let mut run = PageRun::new(key.clone());
        let mut url = None;

        match self.run_page(kind, now, location, &mut run, &mut url).await {
            Ok(fragments) => {
                run.advance();
                engine_info!(page = key; "{} fragments", fragments.len());
                HarvestOutcome::Success { key, fragments }
            }
            Err(err) => {
                let stage = run.fail();
                engine_error!(page = key; "failed while {}: {}", stage, err);
                let detail = failure_detail(&key, stage, url.as_deref(), &err);
                HarvestOutcome::Failure { key, stage, detail }
            }
        }
    }

    async fn run_page(
        &self,
        kind: &PageKind,
        now: DateTime<Utc>,
        location: Option<ResolvedLocation>,
        run: &mut PageRun,
        url: &mut Option<String>,
    ) -> Result<Vec<String>, PageError> {
        let spec = kind.spec();

        run.advance();
        let location = match location {
            Some(location) => location,
            None => {
                Resolver::new(self.fetcher.as_ref(), &self.credentials)
                    .resolve(spec, now)
                    .await?
            }
        };

        *url = Some(location.primary().to_string());

        run.advance();
        let login = self.credentials.login_for(spec)?;
        let page = self.fetcher.fetch(location.primary(), login).await?;

        run.advance();
        let extracted = self.extractor.extract(spec, &page.text, &location)?;

        run.advance();
        Ok(kind.selector().select(&extracted)?)
    }
}

/// Operator-facing report of a page failure, escaped for embedding in HTML.
fn failure_detail(key: &str, stage: Stage, url: Option<&str>, err: &PageError) -> String {
    let mut detail = String::new();
    let _ = writeln!(detail, "page: {key}");
    let _ = writeln!(detail, "stage: {stage}");
    if let Some(url) = url {
        let _ = writeln!(detail, "url: {url}");
    }
    let _ = writeln!(detail, "{}: {err}", err.kind_name());
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(detail, "caused by: {cause}");
        source = cause.source();
    }
    html_escape::encode_text(detail.trim_end()).into_owned()
}
