//! Catalog page fetcher
//!
//! This module handles all HTTP requests for the harvest:
//! - Building the HTTP client
//! - Taking a rate limiter permit before every request
//! - Classifying transport, status and markup failures

use crate::config::{CatalogConfig, Config, HttpConfig};
use crate::crawler::limiter::RateLimiter;
use crate::crawler::parser::parse_catalog_page;
use crate::state::Item;
use crate::HarvestError;
use reqwest::Client;
use std::time::Duration;

/// Items and (on discovery) page count extracted from one page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub items: Vec<Item>,
    pub total_pages: Option<u32>,
}

/// Builds an HTTP client with the configured timeouts
///
/// No custom headers are set; requests go out with transport defaults.
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches and parses catalog pages, one rate-limited request at a time
pub struct PageFetcher {
    client: Client,
    limiter: RateLimiter,
    catalog: CatalogConfig,
}

impl PageFetcher {
    pub fn new(client: Client, limiter: RateLimiter, catalog: CatalogConfig) -> Self {
        Self {
            client,
            limiter,
            catalog,
        }
    }

    /// Builds a fetcher with its own client and limiter from configuration
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        let client = build_http_client(&config.http)?;
        let limiter = RateLimiter::from_config(&config.rate_limit)?;
        Ok(Self::new(client, limiter, config.catalog.clone()))
    }

    pub fn page_url(&self, page: u32) -> String {
        self.catalog.page_url(page)
    }

    /// Fetches one catalog page
    ///
    /// # Arguments
    ///
    /// * `page` - Page number, appended to the base URL
    /// * `discover_limit` - Also read the catalog's total page count
    ///
    /// # Errors
    ///
    /// * `RateLimitExceeded` - No permit was available; nothing was sent
    /// * `Fetch` / `HttpStatus` - Transport failure or non-2xx response
    /// * `Parse` - The page lacks the expected markup
    pub async fn fetch_page(
        &self,
        page: u32,
        discover_limit: bool,
    ) -> Result<FetchedPage, HarvestError> {
        let url = self.page_url(page);

        if let Err(denied) = self.limiter.acquire().await {
            tracing::warn!("Not requesting {}: {}", url, denied);
            return Err(HarvestError::RateLimitExceeded { page });
        }

        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| HarvestError::Fetch {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| HarvestError::Fetch {
                url: url.clone(),
                source,
            })?;

        let parsed = parse_catalog_page(&body, discover_limit)
            .map_err(|message| HarvestError::Parse { url, message })?;

        Ok(FetchedPage {
            items: parsed.items,
            total_pages: parsed.total_pages,
        })
    }
}
