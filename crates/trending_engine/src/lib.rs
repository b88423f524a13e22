//! Trending engine: resolves, fetches and extracts report pages and renders the
//! consolidated report.
mod catalog;
mod credentials;
mod decode;
mod error;
mod extract;
mod fetch;
mod harvest;
mod markup;
mod period_table;
mod persist;
mod registry;
mod render;
mod resolve;
mod select;
mod types;

pub use catalog::{aspect_registry, ASPECT_BASE_URL, PERISCOPE_SITE};
pub use credentials::{Credentials, Login};
pub use decode::{decode_body, DecodedText};
pub use error::{ConfigurationError, ExtractionError, PageError, ResolutionError};
pub use extract::{
    Category, ExtractedElement, ExtractedPage, MarkupExtractor, MAX_FOLLOWING_SIBLINGS,
};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use harvest::{HarvestOutcome, HarvestSettings, Harvester};
pub use markup::{absolutize, is_absolute};
pub use period_table::period_bounds;
pub use persist::{ensure_output_dir, PersistError, ReportWriter};
pub use registry::{PageKind, Registry};
pub use render::{
    assemble, write_report, RenderMetadata, ReportError, ReportSummary, Template,
    DEFAULT_OUTPUT_FILENAME, FRAGMENTS_VARIABLE,
};
pub use resolve::Resolver;
pub use select::{FragmentSelector, Pick, PickList};
pub use types::{FailureKind, FetchError, FetchResult};
