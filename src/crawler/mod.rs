//! Crawler module for catalog page fetching
//!
//! This module contains the crawling logic:
//! - Request throttling with jitter
//! - HTTP fetching of single catalog pages
//! - HTML parsing of item containers and the pager
//! - The crawl driver walking a page range

mod driver;
mod fetcher;
mod limiter;
mod parser;

pub use driver::{crawl, CrawlReport, SkippedPage};
pub use fetcher::{build_http_client, FetchedPage, PageFetcher};
pub use limiter::{RateLimitDenied, RateLimiter};
pub use parser::{parse_catalog_page, ParsedPage};
