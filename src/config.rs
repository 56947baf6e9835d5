use std::time::Duration;

use crate::retry::RetryPolicy;
use crate::{BASE_URL, DEFAULT_MAX_PAGES, PAGE_DELAY_SECS, TIMEOUT_SECS, USER_AGENT};

/// Knobs for one `Fetcher`. Defaults mirror what the public API tolerates.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub base_url: String,
    /// Pause between two full pages.
    pub page_delay: Duration,
    /// Hard ceiling on pages per download. `None` means unbounded.
    pub max_pages: Option<usize>,
    pub retry: RetryPolicy,
    pub user_agent: String,
    pub timeout: Duration,
}

impl FetchConfig {
    pub fn new() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            page_delay: Duration::from_secs(PAGE_DELAY_SECS),
            max_pages: Some(DEFAULT_MAX_PAGES),
            retry: RetryPolicy::default(),
            user_agent: USER_AGENT.to_string(),
            timeout: Duration::from_secs(TIMEOUT_SECS),
        }
    }

    pub fn with_max_pages(mut self, max: usize) -> Self {
        self.max_pages = Some(max);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::new()
    }
}
