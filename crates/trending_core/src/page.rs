use std::fmt;

/// Index of the table holding `TSTART`/`TSTOP` on quarterly report pages.
/// Report pages put a summary table first and the period table second.
pub const DEFAULT_PERIOD_TABLE: usize = 1;

/// How the published location of a page moves with the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Periodicity {
    /// The page always lives at `{base}/{path}/`.
    Fixed,
    /// One report per calendar quarter under `{year}/Q{n}/`.
    Quarterly,
    /// One summary per month under `SUMMARY_DATA/{year}-M{mm}/`.
    Monthly,
}

impl fmt::Display for Periodicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Periodicity::Fixed => write!(f, "fixed"),
            Periodicity::Quarterly => write!(f, "quarterly"),
            Periodicity::Monthly => write!(f, "monthly"),
        }
    }
}

/// Whether relative link targets in a page are made absolute during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkPolicy {
    #[default]
    Rewrite,
    /// The page already publishes fully qualified links; prefixing would break them.
    Verbatim,
}

/// Static description of one report page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSpec {
    key: String,
    base_url: String,
    path: String,
    periodicity: Periodicity,
    auth_site: Option<String>,
    link_policy: LinkPolicy,
    period_table: usize,
}

impl PageSpec {
    /// A fixed page whose path under `base_url` equals its key.
    pub fn new(key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            path: key.clone(),
            key,
            base_url: base_url.into(),
            periodicity: Periodicity::Fixed,
            auth_site: None,
            link_policy: LinkPolicy::default(),
            period_table: DEFAULT_PERIOD_TABLE,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_periodicity(mut self, periodicity: Periodicity) -> Self {
        self.periodicity = periodicity;
        self
    }

    /// Requests to this page carry the credentials stored under `site`.
    pub fn requiring_auth(mut self, site: impl Into<String>) -> Self {
        self.auth_site = Some(site.into());
        self
    }

    pub fn with_link_policy(mut self, policy: LinkPolicy) -> Self {
        self.link_policy = policy;
        self
    }

    pub fn with_period_table(mut self, index: usize) -> Self {
        self.period_table = index;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn periodicity(&self) -> Periodicity {
        self.periodicity
    }

    pub fn auth_site(&self) -> Option<&str> {
        self.auth_site.as_deref()
    }

    pub fn link_policy(&self) -> LinkPolicy {
        self.link_policy
    }

    /// 0-based index of the table carrying the period bounds.
    pub fn period_table(&self) -> usize {
        self.period_table
    }
}
