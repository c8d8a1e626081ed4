//! End-of-run harvest summary
//!
//! Produced for every run, including runs where pages were skipped or the
//! store write failed part way.

use crate::crawler::CrawlReport;
use crate::reconcile::ReconcileReport;
use std::fmt;

/// A page that was skipped, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPageSummary {
    pub page: u32,
    pub reason: String,
}

/// Summary of one crawl-and-reconcile pass
#[derive(Debug, Clone, Default)]
pub struct HarvestSummary {
    pub pages_attempted: u32,
    pub skipped_pages: Vec<SkippedPageSummary>,

    /// Page limit discovered from the catalog, if any page reported it
    pub discovered_page_limit: Option<u32>,

    pub items_scraped: usize,

    /// Missing when reconciliation could not run at all
    pub reconcile: Option<ReconcileReport>,

    /// Why reconciliation could not run
    pub reconcile_error: Option<String>,
}

impl HarvestSummary {
    /// Builds the crawl half of a summary
    pub fn from_crawl(report: &CrawlReport) -> Self {
        Self {
            pages_attempted: report.pages_attempted,
            skipped_pages: report
                .skipped
                .iter()
                .map(|skipped| SkippedPageSummary {
                    page: skipped.page,
                    reason: skipped.error.to_string(),
                })
                .collect(),
            discovered_page_limit: report
                .cursor
                .is_known()
                .then(|| report.cursor.page_limit()),
            items_scraped: report.items.len(),
            reconcile: None,
            reconcile_error: None,
        }
    }

    pub fn pages_skipped(&self) -> usize {
        self.skipped_pages.len()
    }

    /// Whether every page and every write went through
    pub fn is_clean(&self) -> bool {
        self.skipped_pages.is_empty()
            && self.reconcile_error.is_none()
            && self
                .reconcile
                .as_ref()
                .map(|r| r.is_complete() && r.duplicates.is_empty())
                .unwrap_or(false)
    }
}

impl fmt::Display for HarvestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Harvest Summary ===")?;
        writeln!(f)?;

        writeln!(f, "Pages:")?;
        writeln!(f, "  Attempted: {}", self.pages_attempted)?;
        writeln!(f, "  Skipped: {}", self.pages_skipped())?;
        if let Some(limit) = self.discovered_page_limit {
            writeln!(f, "  Catalog size: {} pages", limit)?;
        }
        for skipped in &self.skipped_pages {
            writeln!(f, "    - page {}: {}", skipped.page, skipped.reason)?;
        }
        writeln!(f)?;

        writeln!(f, "Items:")?;
        writeln!(f, "  Scraped: {}", self.items_scraped)?;

        match (&self.reconcile, &self.reconcile_error) {
            (Some(report), _) => {
                writeln!(
                    f,
                    "  Scheduled: {} inserts / {} updates",
                    report.scheduled_inserts, report.scheduled_updates
                )?;
                writeln!(f, "  Inserted: {}", report.inserted)?;
                writeln!(f, "  Updated: {}", report.updated)?;
                writeln!(f, "  Unchanged: {}", report.unchanged)?;
                if !report.duplicates.is_empty() {
                    writeln!(f, "  Duplicate titles: {}", report.duplicates.join(", "))?;
                }
                if report.failed > 0 {
                    writeln!(f, "  Failed writes: {}", report.failed)?;
                }
                if let Some(reason) = &report.halted_by {
                    writeln!(f, "  Store write halted: {}", reason)?;
                }
            }
            (None, Some(reason)) => writeln!(f, "  Not reconciled: {}", reason)?,
            (None, None) => writeln!(f, "  Not reconciled")?,
        }

        Ok(())
    }
}

/// Prints the summary to stdout
pub fn print_summary(summary: &HarvestSummary) {
    print!("{}", summary);
}
