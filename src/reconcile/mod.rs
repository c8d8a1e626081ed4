//! Reconciliation of scraped items into the store
//!
//! One batched lookup reads the stored items sharing a title with the
//! scraped ones; only new or changed items are written back, as a single
//! unordered batch of independent operations.

mod diff;

pub use diff::{diff_items, Change};

use crate::state::Item;
use crate::storage::{Storage, WriteOp};
use crate::HarvestError;

/// Outcome of a reconcile pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Operations submitted to the store
    pub attempted: usize,

    /// Operations of each kind that were scheduled
    pub scheduled_inserts: usize,
    pub scheduled_updates: usize,

    /// Operations that committed
    pub inserted: usize,
    pub updated: usize,

    /// Scraped items that already matched the store
    pub unchanged: usize,

    /// Titles rejected by the store's unique index
    pub duplicates: Vec<String>,

    /// Operations that failed or were never reached
    pub failed: usize,

    /// Set when a store failure ended the batch early
    pub halted_by: Option<String>,
}

impl ReconcileReport {
    /// Whether every scheduled operation committed
    pub fn is_complete(&self) -> bool {
        self.inserted + self.updated == self.attempted
    }
}

/// Reconciles freshly scraped items with the store
///
/// # Returns
///
/// * `Ok(ReconcileReport)` - The batch ran; it may contain per-operation
///   failures and may have halted early, but committed writes stand
/// * `Err(HarvestError::StoreUnavailable)` - The initial lookup failed and
///   nothing was written
pub fn reconcile(
    storage: &mut dyn Storage,
    scraped: &[Item],
) -> Result<ReconcileReport, HarvestError> {
    let mut report = ReconcileReport::default();

    if scraped.is_empty() {
        tracing::info!("No items to reconcile");
        return Ok(report);
    }

    let titles: Vec<&str> = scraped.iter().map(|item| item.title.as_str()).collect();
    let stored = storage
        .find_by_titles(&titles)
        .map_err(|e| HarvestError::StoreUnavailable(format!("item lookup failed: {}", e)))?;

    tracing::debug!(
        "{} of {} scraped titles already stored",
        stored.len(),
        scraped.len()
    );

    let mut ops = Vec::new();
    for change in diff_items(scraped, &stored) {
        match &change {
            Change::Insert(_) => report.scheduled_inserts += 1,
            Change::Update(_) => report.scheduled_updates += 1,
            Change::Unchanged(_) => report.unchanged += 1,
        }
        ops.extend(change.into_write());
    }

    report.attempted = ops.len();
    if ops.is_empty() {
        tracing::info!("Store already up to date ({} items unchanged)", report.unchanged);
        return Ok(report);
    }

    let outcome = storage.bulk_write(&ops);

    report.inserted = outcome.inserted;
    report.updated = outcome.updated;
    report.failed = ops.len() - outcome.applied();

    for failure in &outcome.failures {
        if failure.error.is_recoverable() {
            if matches!(ops[failure.index], WriteOp::Insert(_)) {
                let duplicate = HarvestError::DuplicateKey {
                    title: failure.title.clone(),
                };
                tracing::warn!("{}", duplicate);
                report.duplicates.push(failure.title.clone());
            } else {
                tracing::warn!("Update skipped for '{}': {}", failure.title, failure.error);
            }
        } else {
            tracing::error!(
                "Store failure at operation {} ('{}'): {}",
                failure.index,
                failure.title,
                failure.error
            );
            report.halted_by = Some(failure.error.to_string());
        }
    }

    if outcome.halted {
        tracing::error!(
            "Batch halted after {} of {} operations; committed writes stand",
            outcome.applied(),
            ops.len()
        );
    }

    tracing::info!("{} items processed in total", report.attempted);
    tracing::info!("{} items updated", report.updated);
    tracing::info!("{} new items saved", report.inserted);

    Ok(report)
}
