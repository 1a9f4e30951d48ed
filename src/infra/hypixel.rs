//! Thin asynchronous client for the Hypixel SkyBlock auctions endpoint.
//!
//! - Typed page payloads validated at the boundary.
//! - Partial-result pagination: a transient page failure ends the loop
//!   instead of aborting the run.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::Listing;

const DEFAULT_BASE_URL: &str = "https://api.hypixel.net/skyblock/auctions";
const USER_AGENT: &str = "pet-flip-scanner/1.0.0";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status: {0}")]
    Status(StatusCode),
}

/// One page of the paged auctions endpoint. `auctions` stays `None` when
/// the body lacks the field; `totalPages` is only guaranteed on page 0.
#[derive(Debug, Deserialize)]
pub struct AuctionPage {
    #[serde(default)]
    pub auctions: Option<Vec<Listing>>,
    #[serde(rename = "totalPages", default)]
    pub total_pages: Option<u32>,
}

/// Anything that can serve auction pages. The HTTP client is the real
/// implementation; tests drive the pagination loop with canned pages.
#[async_trait]
pub trait AuctionPageSource {
    async fn fetch_page(&self, page: u32) -> Result<AuctionPage, FetchError>;
}

pub struct HypixelClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl HypixelClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    pub fn with_base_url(base: &str, api_key: impl Into<String>) -> Result<Self, FetchError> {
        let base_url = Url::parse(base)?;
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
        })
    }

    fn page_url(&self, page: u32) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("page", &page.to_string());
        url
    }
}

#[async_trait]
impl AuctionPageSource for HypixelClient {
    async fn fetch_page(&self, page: u32) -> Result<AuctionPage, FetchError> {
        let response = self.http.get(self.page_url(page)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        Ok(response.json::<AuctionPage>().await?)
    }
}

/// Accumulate every page the source will yield, in source order.
///
/// Pages are requested sequentially from index 0. Each iteration stops the
/// loop when the page request fails, when the body has no `auctions` field,
/// or when the index reaches the `totalPages` count reported by the first
/// page that supplied one. The first two cases keep whatever has been
/// gathered so far; the auction house favors serving some data over none,
/// and so do we. No dedup across pages: the API does not repeat listings.
pub async fn fetch_all(source: &impl AuctionPageSource) -> Vec<Listing> {
    println!("[fetch] fetching auction pages...");
    let mut all = Vec::new();
    let mut total_pages: Option<u32> = None;
    let mut page = 0;

    loop {
        let body = match source.fetch_page(page).await {
            Ok(body) => body,
            Err(e) => {
                println!(
                    "[fetch] page {page} failed ({e}), keeping {} listings",
                    all.len()
                );
                break;
            }
        };

        let Some(listings) = body.auctions else {
            println!(
                "[fetch] page {page} had no auctions field, keeping {} listings",
                all.len()
            );
            break;
        };
        all.extend(listings);

        if total_pages.is_none() {
            total_pages = body.total_pages;
        }
        page += 1;

        match total_pages {
            Some(total) if page >= total => break,
            Some(_) => {}
            // Page 0 never said how many pages exist; treat the body as
            // malformed and stop with what we have.
            None => break,
        }
    }

    println!(
        "[fetch] accumulated {} listings across {page} page(s)",
        all.len()
    );
    all
}
