use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::dataset::{DatasetKind, RegionCode};
use crate::{Error, Result, PAGE_SIZE};

/// Everything needed to build the request for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub dataset: DatasetKind,
    pub region: RegionCode,
    pub offset: usize,
    pub page_size: usize,
}

impl PageRequest {
    pub fn first(dataset: DatasetKind, region: RegionCode) -> Self {
        Self {
            dataset,
            region,
            offset: 0,
            page_size: PAGE_SIZE,
        }
    }

    /// The request for the page right after this one.
    pub fn next(&self) -> Self {
        Self {
            offset: self.offset + self.page_size,
            ..self.clone()
        }
    }

    /// Builds the page URL. Parameter order matches what the API documents.
    pub fn url(&self, base_url: &str) -> String {
        format!(
            "{base_url}{collection}?$format=json&$metadata=off\
             &$filter=countyCode%20eq%20%27{region}%27&$skip={skip}&$top={top}",
            collection = self.dataset.collection_name(),
            region = urlencoding::encode(self.region.as_str()),
            skip = self.offset,
            top = self.page_size,
        )
    }
}

/// Performs a GET and hands back the raw body, or a transport error.
#[async_trait]
pub trait RequestIssuer: Send + Sync {
    async fn get(&self, url: &str) -> Result<String>;
}

/// `RequestIssuer` backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpIssuer {
    client: Client,
}

impl HttpIssuer {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RequestIssuer for HttpIssuer {
    async fn get(&self, url: &str) -> Result<String> {
        let res = self.client.get(url).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(Error::Status(status));
        }
        let body = res.text().await?;
        Ok(body)
    }
}
