use std::io;
use std::path::PathBuf;

use trending_core::Periodicity;

use crate::extract::Category;
use crate::types::FetchError;

/// No candidate period of a page could be reached.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("no reachable {periodicity} period for {page}; probed {}", .probed.join(", "))]
    NoReachablePeriod {
        page: String,
        periodicity: Periodicity,
        probed: Vec<String>,
    },
    #[error("monthly summary {url} for {page} is not published (http status {status})")]
    MonthUnavailable {
        page: String,
        url: String,
        status: u16,
    },
}

/// A fetched page does not have the shape its configuration expects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("{page}: no <{category}> at position {index} (page has {available})")]
    MissingElement {
        page: String,
        category: Category,
        index: usize,
        available: usize,
    },
    #[error("{page}: <{category}> at position {index} has no sibling {depth} step(s) ahead")]
    MissingSibling {
        page: String,
        category: Category,
        index: usize,
        depth: usize,
    },
    #[error("{page}: no .png/.gif image with src {name:?}")]
    MissingImage { page: String, name: String },
    #[error("period table #{index} not found on {url}")]
    MissingPeriodTable { url: String, index: usize },
    #[error("period table on {url} has no data row")]
    EmptyPeriodTable { url: String },
    #[error("period table on {url} has no {column} column")]
    MissingPeriodColumn { url: String, column: &'static str },
    #[error("cannot parse {column} value {value:?} on {url}")]
    BadTimestamp {
        url: String,
        column: &'static str,
        value: String,
    },
    #[error("invalid selector {css:?}: {message}")]
    Selector { css: String, message: String },
}

/// Problems with the run's setup. These abort the run before any page is
/// harvested.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("page {page} needs credentials for {site:?}, but none are configured")]
    MissingCredential { page: String, site: String },
    #[error("cannot read credentials from {path:?}")]
    CredentialFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed netrc at line {line}: {message}")]
    Netrc { line: usize, message: String },
    #[error("page key {key:?} is registered twice")]
    DuplicatePage { key: String },
    #[error("unknown page key {key:?}")]
    UnknownPage { key: String },
    #[error("cannot build http client: {message}")]
    HttpClient { message: String },
    #[error("invalid template: {message}")]
    Template { message: String },
    #[error("cannot read template {path:?}")]
    TemplateFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Everything that can go wrong while harvesting a single page.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl PageError {
    pub fn kind_name(&self) -> &'static str {
        match self {
            PageError::Resolution(_) => "ResolutionError",
            PageError::Fetch(_) => "FetchError",
            PageError::Extraction(_) => "ExtractionError",
            PageError::Configuration(_) => "ConfigurationError",
        }
    }
}
