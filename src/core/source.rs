//! Listing endpoint client.
//!
//! [`ListingSource`] is the seam between the loader and the network.  The
//! production implementation is [`HttpSource`]; tests substitute their own.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;

use super::query::RequestDescriptor;
use super::render::ListingItem;

/// One decoded page of the listing API.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingPage {
    /// `null` and a missing key both mean "no items".
    #[serde(default)]
    pub movies: Option<Vec<ListingItem>>,
    pub page: u32,
    pub total_pages: u32,
}

impl ListingPage {
    pub fn into_items(self) -> Vec<ListingItem> {
        self.movies.unwrap_or_default()
    }
}

/// Why a fetch did not produce a page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
    /// Connection refused, reset, timed out, …
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {0}")]
    Status(StatusCode),
    #[error("malformed listing payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub trait ListingSource {
    fn fetch(
        &self,
        request: &RequestDescriptor,
    ) -> impl Future<Output = Result<ListingPage, FetchError>> + Send;
}

/// `reqwest`-backed source.  Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    origin: Url,
}

impl HttpSource {
    /// `origin` is any URL on the listing server; only its scheme, host and
    /// port matter.  `timeout` bounds each request end to end.
    pub fn new(origin: Url, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, origin })
    }
}

impl ListingSource for HttpSource {
    fn fetch(
        &self,
        request: &RequestDescriptor,
    ) -> impl Future<Output = Result<ListingPage, FetchError>> + Send {
        let url = request.to_url(&self.origin);
        let page = request.page();
        let client = self.client.clone();
        async move {
            let url = url.map_err(FetchError::InvalidUrl)?;
            tracing::debug!(%url, ?page, "GET listing page");
            let response = client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status));
            }
            let body = response.bytes().await?;
            Ok(serde_json::from_slice(&body)?)
        }
    }
}
