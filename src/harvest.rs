//! One full harvest pass: crawl the configured range, then reconcile
//!
//! Per-page and per-write failures never end the pass; they show up in the
//! returned summary instead.

use crate::config::Config;
use crate::crawler::{crawl, PageFetcher};
use crate::output::HarvestSummary;
use crate::reconcile::reconcile;
use crate::state::CatalogCursor;
use crate::storage::Storage;
use crate::HarvestError;

/// Runs a crawl-and-reconcile pass over the configured page range
///
/// # Returns
///
/// * `Ok(HarvestSummary)` - The pass ran; the summary records skipped pages
///   and store failures
/// * `Err(HarvestError)` - The fetcher could not be built or the page range
///   is invalid
pub async fn run_harvest(
    config: &Config,
    storage: &mut dyn Storage,
) -> Result<HarvestSummary, HarvestError> {
    let fetcher = PageFetcher::from_config(config)?;
    harvest_with(&fetcher, config, storage).await
}

/// Like [`run_harvest`], with a caller-supplied fetcher
pub async fn harvest_with(
    fetcher: &PageFetcher,
    config: &Config,
    storage: &mut dyn Storage,
) -> Result<HarvestSummary, HarvestError> {
    let cursor = CatalogCursor::new(config.catalog.default_page_limit);

    let report = crawl(
        fetcher,
        cursor,
        config.catalog.start_page,
        config.catalog.end_page,
    )
    .await?;

    tracing::info!("Scraped {} items in total", report.items.len());

    let mut summary = HarvestSummary::from_crawl(&report);

    match reconcile(storage, &report.items) {
        Ok(reconciled) => summary.reconcile = Some(reconciled),
        Err(e) => {
            tracing::error!("Reconciliation failed: {}", e);
            summary.reconcile_error = Some(e.to_string());
        }
    }

    Ok(summary)
}
