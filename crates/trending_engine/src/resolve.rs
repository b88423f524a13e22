//! Finding where a periodic report page is published right now.

use chrono::{DateTime, Utc};
use engine_logging::{engine_debug, engine_info};
use trending_core::{
    month_url, page_url, quarter_url, Month, PageSpec, Periodicity, Quarter, ResolvedLocation,
};

use crate::credentials::{Credentials, Login};
use crate::error::{PageError, ResolutionError};
use crate::fetch::Fetcher;
use crate::period_table::period_bounds;

/// Turns a [`PageSpec`] into the URLs to harvest for a given instant.
///
/// Quarterly pages are probed from the current quarter backwards until one
/// answers 2xx. While that quarter is not yet half over its report is too thin
/// to show, so the previous quarter becomes the primary URL and the probed one
/// is kept as the current-period URL.
pub struct Resolver<'a> {
    fetcher: &'a dyn Fetcher,
    credentials: &'a Credentials,
}

impl<'a> Resolver<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, credentials: &'a Credentials) -> Self {
        Self {
            fetcher,
            credentials,
        }
    }

    pub async fn resolve(&self, spec: &PageSpec, now: DateTime<Utc>) -> Result<ResolvedLocation, PageError> {
        let location = match spec.periodicity() {
            Periodicity::Fixed => ResolvedLocation::fixed(page_url(spec.base_url(), spec.path())),
            Periodicity::Quarterly => {
                let login = self.credentials.login_for(spec)?;
                self.resolve_quarterly(spec, login, now).await?
            }
            Periodicity::Monthly => {
                let login = self.credentials.login_for(spec)?;
                self.resolve_monthly(spec, login, now).await?
            }
        };
        engine_debug!(
            page = spec.key();
            "resolved primary={} current={}",
            location.primary(),
            location.current_period()
        );
        Ok(location)
    }

    async fn resolve_quarterly(
        &self,
        spec: &PageSpec,
        login: Option<&Login>,
        now: DateTime<Utc>,
    ) -> Result<ResolvedLocation, PageError> {
        let mut probed = Vec::new();
        for quarter in Quarter::candidates(&now) {
            let url = quarter_url(spec.base_url(), spec.path(), quarter);
            let response = self.fetcher.get(&url, login).await?;
            if !response.is_success() {
                engine_debug!(page = spec.key(); "{} answered {}, trying an earlier quarter", url, response.status);
                probed.push(format!("{url} ({})", response.status));
                continue;
            }

            let bounds = period_bounds(&response.text, spec.period_table(), &url)?;
            if bounds.is_past_midpoint(&now) {
                return Ok(ResolvedLocation::fixed(url));
            }

            let previous = quarter_url(spec.base_url(), spec.path(), quarter.previous());
            engine_info!(
                page = spec.key();
                "{} is before its midpoint {}; reporting on {}",
                quarter,
                bounds.midpoint(),
                quarter.previous()
            );
            return Ok(ResolvedLocation::split(previous, url));
        }

        Err(ResolutionError::NoReachablePeriod {
            page: spec.key().to_string(),
            periodicity: spec.periodicity(),
            probed,
        }
        .into())
    }

    async fn resolve_monthly(
        &self,
        spec: &PageSpec,
        login: Option<&Login>,
        now: DateTime<Utc>,
    ) -> Result<ResolvedLocation, PageError> {
        let month = Month::settled(&now);
        let url = month_url(spec.base_url(), spec.path(), month);
        let response = self.fetcher.get(&url, login).await?;
        if !response.is_success() {
            return Err(ResolutionError::MonthUnavailable {
                page: spec.key().to_string(),
                url,
                status: response.status,
            }
            .into());
        }
        Ok(ResolvedLocation::fixed(url))
    }
}
