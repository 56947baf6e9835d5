use std::path::PathBuf;

use chrono::Local;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::FetchConfig;
use crate::dataset::{DatasetKind, OutputKey, RegionCode};
use crate::parse::{extract_page, PageOutcome};
use crate::request::{PageRequest, RequestIssuer};
use crate::sink::Sink;
use crate::{info_time, Result};

/// Why the page loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// A page came back without the collection key, or unparseable.
    EndOfData,
    /// A page held fewer rows than the page size.
    ShortPage,
    /// The configured page ceiling was hit after a full page.
    PageLimit,
    /// A page could not be fetched, even after retrying.
    TransportFailed(String),
}

/// Summary of one finished download. The records themselves are in the sink.
#[derive(Debug, Clone)]
pub struct DownloadReport {
    pub key: OutputKey,
    pub path: PathBuf,
    pub records: usize,
    /// Every request issued, retries included.
    pub requests: usize,
    /// Pages that returned rows (possibly zero rows).
    pub pages: usize,
    /// Rate-limit pauses taken between pages.
    pub delays: usize,
    pub stop: StopReason,
}

impl DownloadReport {
    /// `false` when the saved result may be missing rows.
    pub fn is_complete(&self) -> bool {
        matches!(self.stop, StopReason::EndOfData | StopReason::ShortPage)
    }
}

#[derive(Debug, Default)]
struct Counters {
    requests: usize,
    pages: usize,
    delays: usize,
}

/// Downloads every record of a (dataset, county) pair page by page and hands
/// the whole set to a `Sink`.
pub struct Fetcher<I, S> {
    issuer: I,
    sink: S,
    config: FetchConfig,
}

impl<I: RequestIssuer, S: Sink> Fetcher<I, S> {
    pub fn new(issuer: I, sink: S, config: FetchConfig) -> Self {
        Self {
            issuer,
            sink,
            config,
        }
    }

    pub fn issuer(&self) -> &I {
        &self.issuer
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Validates loosely typed arguments, then runs `download`.
    /// Bad input fails before any request goes out.
    pub async fn download_args(&self, dataset: &str, region: &Value) -> Result<DownloadReport> {
        let dataset = dataset.parse::<DatasetKind>()?;
        let region = RegionCode::try_from(region)?;
        self.download(dataset, &region).await
    }

    /// Fetches all pages and saves them in one write.
    ///
    /// Network trouble never fails the call: the loop stops and whatever was
    /// collected is saved, with the reason in `DownloadReport::stop`. Only a
    /// failed save is returned as an error. At least one page is always
    /// requested, whatever `max_pages` says.
    pub async fn download(
        &self,
        dataset: DatasetKind,
        region: &RegionCode,
    ) -> Result<DownloadReport> {
        let start_time = Local::now();
        let key = OutputKey::new(dataset, region.clone());
        let collection = dataset.collection_name();
        info_time!("Starting to download {} data for county {}", dataset, region);

        let mut records: Vec<Value> = Vec::new();
        let mut counters = Counters::default();
        let mut request = PageRequest::first(dataset, region.clone());

        let stop = loop {
            debug!(skip = request.offset, "Requesting page");

            let body = match self.request_page(&request, &mut counters).await {
                Ok(body) => body,
                Err(e) => {
                    error!(
                        skip = request.offset,
                        "Giving up on {collection} for county {region}: {e}"
                    );
                    break StopReason::TransportFailed(e.to_string());
                }
            };

            let rows = match extract_page(&body, &collection) {
                PageOutcome::Records(rows) => rows,
                PageOutcome::EndOfData => {
                    warn!(
                        skip = request.offset,
                        "No data returned for {collection} for county {region}. Stopping download."
                    );
                    break StopReason::EndOfData;
                }
            };

            let rows_len = rows.len();
            counters.pages += 1;
            records.extend(rows);
            debug!("Fetched {rows_len} rows.");

            if rows_len < request.page_size {
                info!(
                    "Chunk has {rows_len} rows, less than {}, finishing download.",
                    request.page_size
                );
                break StopReason::ShortPage;
            }

            if self
                .config
                .max_pages
                .is_some_and(|max| counters.pages >= max)
            {
                warn!(
                    pages = counters.pages,
                    "Reached the page limit for {collection} in county {region}. Stopping download."
                );
                break StopReason::PageLimit;
            }

            request = request.next();
            sleep(self.config.page_delay).await;
            counters.delays += 1;
        };

        info_time!(
            start_time,
            "Download completed. Total rows fetched: {}",
            records.len()
        );

        let path = self.sink.save(&key, &records).await?;
        info!("Data saved to {}", path.display());

        Ok(DownloadReport {
            key,
            path,
            records: records.len(),
            requests: counters.requests,
            pages: counters.pages,
            delays: counters.delays,
            stop,
        })
    }

    /// Issues the request for one page, retrying transient failures with
    /// backoff as the configured policy allows.
    async fn request_page(
        &self,
        request: &PageRequest,
        counters: &mut Counters,
    ) -> Result<String> {
        let url = request.url(&self.config.base_url);
        let retry = &self.config.retry;
        let mut attempt = 0;

        loop {
            counters.requests += 1;
            match self.issuer.get(&url).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_transient() && attempt + 1 < retry.attempts() => {
                    let backoff = retry.backoff(attempt);
                    warn!(
                        attempt = attempt + 1,
                        backoff_secs = backoff.as_secs_f64(),
                        "Error making request to {url}: {e}. Retrying."
                    );
                    sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
