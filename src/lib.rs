//! FEMA NFIP DOWNLOADER
//! Pulls every policy or claim row for a county out of the OpenFEMA API,
//! 10 000 rows at a time, and saves them as one JSON file.

pub mod cli;
pub mod config;
pub mod dataset;
mod error;
mod macros;
pub mod parse;
pub mod process;
pub mod request;
pub mod retry;
pub mod sink;

pub use config::FetchConfig;
pub use dataset::{DatasetKind, OutputKey, RegionCode};
pub use error::{Error, Result};
pub use process::{DownloadReport, Fetcher, StopReason};
pub use request::{HttpIssuer, PageRequest, RequestIssuer};
pub use retry::RetryPolicy;
pub use sink::{JsonFileSink, Sink};

pub const BASE_URL: &str = "https://www.fema.gov/api/open/v2/";
/// Prefix shared by both collections, e.g. `FimaNfipClaims`.
pub const COLLECTION_PREFIX: &str = "FimaNfip";
/// Rows per page. A page with fewer rows is the last one.
pub const PAGE_SIZE: usize = 10_000;
/// Pause between full pages, to stay under the API rate limit.
pub const PAGE_DELAY_SECS: u64 = 5;
/// 10 million rows per county is far beyond any real county.
pub const DEFAULT_MAX_PAGES: usize = 1_000;
pub const DEFAULT_OUTPUT_DIR: &str = "data";
const USER_AGENT: &str = concat!("nfip-fetch/", env!("CARGO_PKG_VERSION"));
const TIMEOUT_SECS: u64 = 60;
