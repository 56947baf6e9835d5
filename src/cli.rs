use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use serde_json::Value;

use crate::retry::RetryPolicy;
use crate::{
    DatasetKind, Error, FetchConfig, Result, DEFAULT_MAX_PAGES, DEFAULT_OUTPUT_DIR, PAGE_DELAY_SECS,
};

/// Download FEMA NFIP policies or claims for one or more counties
#[derive(Parser, Debug)]
#[command(author, version)]
pub struct Cli {
    /// Dataset to download: `policies` or `claims`
    pub dataset: String,

    /// County FIPS codes, e.g. 12086
    pub regions: Vec<String>,

    /// JSON file holding an array of county codes, read in addition to REGIONS
    #[arg(long)]
    pub regions_file: Option<PathBuf>,

    /// Directory the JSON files are written to
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Tries per page before giving up on transient errors
    #[arg(long, default_value_t = 3)]
    pub max_attempts: u32,

    /// Stop after this many pages per county
    #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
    pub max_pages: usize,

    /// Seconds to wait between pages
    #[arg(long, default_value_t = PAGE_DELAY_SECS)]
    pub page_delay_secs: u64,

    /// Log every page
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parsed once per run, before any region is touched.
    pub fn dataset_kind(&self) -> Result<DatasetKind> {
        self.dataset.parse()
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig::new()
            .with_max_pages(self.max_pages)
            .with_retry(RetryPolicy::new(self.max_attempts))
            .with_page_delay(Duration::from_secs(self.page_delay_secs))
    }

    /// Regions from the command line followed by those in `--regions-file`,
    /// as raw JSON values so the fetcher can reject non-string entries.
    pub fn region_values(&self) -> Result<Vec<Value>> {
        let mut values: Vec<Value> = self.regions.iter().cloned().map(Value::String).collect();
        if let Some(path) = &self.regions_file {
            let text = std::fs::read_to_string(path)?;
            let parsed: Value = serde_json::from_str(&text)?;
            match parsed {
                Value::Array(items) => values.extend(items),
                _ => {
                    return Err(Error::InvalidArgument(format!(
                        "{} must hold a JSON array of county codes",
                        path.display()
                    )))
                }
            }
        }
        if values.is_empty() {
            return Err(Error::InvalidArgument(
                "no county codes given, pass REGIONS or --regions-file".into(),
            ));
        }
        Ok(values)
    }
}
