/// Page limit assumed before the catalog reports its real size
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Tracks how many pages the catalog has during one crawl
///
/// A cursor starts with a conservative guess and is corrected exactly once,
/// after the first page that reports the real total. Create a fresh cursor
/// per crawl; it is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogCursor {
    page_limit: u32,
    page_limit_known: bool,
}

impl CatalogCursor {
    /// Creates a cursor with the given page limit guess
    pub fn new(default_page_limit: u32) -> Self {
        Self {
            page_limit: default_page_limit,
            page_limit_known: false,
        }
    }

    /// Creates a cursor whose page limit is already known
    pub fn known(page_limit: u32) -> Self {
        Self {
            page_limit,
            page_limit_known: true,
        }
    }

    /// The discovered page limit, or the guess if not yet discovered
    pub fn page_limit(&self) -> u32 {
        self.page_limit
    }

    pub fn is_known(&self) -> bool {
        self.page_limit_known
    }

    /// Records the discovered page limit
    ///
    /// Returns `true` if the cursor changed. Once the limit is known, later
    /// calls are ignored.
    pub fn record_page_limit(&mut self, page_limit: u32) -> bool {
        if self.page_limit_known {
            return false;
        }
        self.page_limit = page_limit;
        self.page_limit_known = true;
        true
    }

    /// Last page of a requested range, clamped to the current page limit
    pub fn upper_bound(&self, end_page: u32) -> u32 {
        end_page.min(self.page_limit)
    }
}

impl Default for CatalogCursor {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_LIMIT)
    }
}
