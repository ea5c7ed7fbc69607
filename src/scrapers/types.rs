use crate::config::PageCap;
use std::time::Duration;

/// Parameters of one scrape run
#[derive(Debug, Clone)]
pub struct ScrapeParams {
    /// Ceiling on pages fetched per category
    pub page_cap: PageCap,
    /// Number of pages in flight at once
    pub concurrency: usize,
    /// Abort the whole run after this long; partial results are dropped
    pub deadline: Option<Duration>,
}

impl Default for ScrapeParams {
    fn default() -> Self {
        Self {
            page_cap: PageCap::default(),
            concurrency: 4,
            deadline: None,
        }
    }
}
