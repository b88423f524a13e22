//! Trending core: page descriptions, period arithmetic and the per-page stage
//! machine. Nothing in this crate touches the network or the filesystem.
mod location;
mod page;
mod period;
mod stage;
mod timestamp;

pub use location::{month_url, page_url, quarter_url, ResolvedLocation};
pub use page::{LinkPolicy, PageSpec, Periodicity, DEFAULT_PERIOD_TABLE};
pub use period::{
    Month, PeriodBounds, Quarter, MONTH_LOOKBACK_DAYS, MONTH_SETTLED_AFTER_DAY,
    QUARTER_CANDIDATES,
};
pub use stage::{PageRun, Stage};
pub use timestamp::parse_timestamp;
