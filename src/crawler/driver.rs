//! Crawl driver - walks a page range and collects items
//!
//! Pages are fetched strictly in ascending order, one at a time. A page that
//! fails is logged, recorded and skipped; the walk always reaches the end of
//! its range.

use crate::crawler::fetcher::PageFetcher;
use crate::state::{CatalogCursor, Item};
use crate::HarvestError;

/// A page that produced no items because its fetch failed
#[derive(Debug)]
pub struct SkippedPage {
    pub page: u32,
    pub error: HarvestError,
}

/// Everything a crawl produced
#[derive(Debug)]
pub struct CrawlReport {
    /// Items in page order, then in-page order
    pub items: Vec<Item>,

    /// Number of pages a fetch was attempted for
    pub pages_attempted: u32,

    /// Pages whose fetch failed
    pub skipped: Vec<SkippedPage>,

    /// The cursor after the crawl, with the discovered page limit if any
    pub cursor: CatalogCursor,
}

impl CrawlReport {
    pub fn pages_succeeded(&self) -> u32 {
        self.pages_attempted - self.skipped.len() as u32
    }
}

/// Crawls pages `start_page..=end_page`, clamped to the cursor's page limit
///
/// The upper bound is computed once, before the first fetch. If the cursor
/// does not yet know the real page limit, the bound uses its guess and is not
/// shrunk when the real limit turns up; pages past the real end then fail
/// like any other fetch and are skipped.
///
/// # Arguments
///
/// * `fetcher` - Fetches and parses single pages
/// * `cursor` - Page limit state; pass a fresh one per crawl
/// * `start_page` - First page, must be >= 1
/// * `end_page` - Last page requested (inclusive)
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Always, once the range is valid
/// * `Err(HarvestError::InvalidRange)` - `start_page` is 0
pub async fn crawl(
    fetcher: &PageFetcher,
    mut cursor: CatalogCursor,
    start_page: u32,
    end_page: u32,
) -> Result<CrawlReport, HarvestError> {
    if start_page < 1 {
        return Err(HarvestError::InvalidRange {
            start: start_page,
            end: end_page,
        });
    }

    let upper_bound = cursor.upper_bound(end_page);
    let mut report = CrawlReport {
        items: Vec::new(),
        pages_attempted: 0,
        skipped: Vec::new(),
        cursor: cursor.clone(),
    };

    if start_page > upper_bound {
        tracing::info!(
            "Nothing to crawl: start page {} is past the last page {}",
            start_page,
            upper_bound
        );
        return Ok(report);
    }

    tracing::info!("Crawling pages {}..={}", start_page, upper_bound);

    for page in start_page..=upper_bound {
        if cursor.is_known() {
            tracing::info!("Scraping page {} of {}", page, cursor.page_limit());
        } else {
            tracing::info!("Scraping page {}", page);
        }

        report.pages_attempted += 1;

        match fetcher.fetch_page(page, !cursor.is_known()).await {
            Ok(fetched) => {
                if let Some(total) = fetched.total_pages {
                    if cursor.record_page_limit(total) {
                        tracing::info!("Catalog has {} pages", total);
                    }
                }
                tracing::debug!("Page {} yielded {} items", page, fetched.items.len());
                report.items.extend(fetched.items);
            }
            Err(error) => {
                tracing::warn!("Skipping page {}: {}", page, error);
                report.skipped.push(SkippedPage { page, error });
            }
        }
    }

    tracing::info!(
        "Crawl finished: {} items from {} of {} pages",
        report.items.len(),
        report.pages_succeeded(),
        report.pages_attempted
    );

    report.cursor = cursor;
    Ok(report)
}
