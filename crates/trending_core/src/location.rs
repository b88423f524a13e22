use crate::period::{Month, Quarter};

/// Where a page's content comes from for one harvest.
///
/// `primary` backs the bulk of the fragments. `current_period` reflects "right
/// now"; it differs from `primary` only while the current quarter is too young
/// to report on and the primary URL points at the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    primary: String,
    current_period: String,
}

impl ResolvedLocation {
    pub fn fixed(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            current_period: url.clone(),
            primary: url,
        }
    }

    pub fn split(primary: impl Into<String>, current_period: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            current_period: current_period.into(),
        }
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn current_period(&self) -> &str {
        &self.current_period
    }

    pub fn has_distinct_current_period(&self) -> bool {
        self.primary != self.current_period
    }
}

/// `{base}/{path}/`
pub fn page_url(base: &str, path: &str) -> String {
    format!("{}/{}/", base.trim_end_matches('/'), path.trim_matches('/'))
}

/// `{base}/{path}/{year}/Q{n}/`
pub fn quarter_url(base: &str, path: &str, quarter: Quarter) -> String {
    format!(
        "{}{}/Q{}/",
        page_url(base, path),
        quarter.year(),
        quarter.number()
    )
}

/// `{base}/{path}/SUMMARY_DATA/{year}-M{mm}/`
pub fn month_url(base: &str, path: &str, month: Month) -> String {
    format!(
        "{}SUMMARY_DATA/{}-M{:02}/",
        page_url(base, path),
        month.year(),
        month.month()
    )
}
