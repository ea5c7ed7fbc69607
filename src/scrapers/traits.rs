use crate::scrapers::fetcher::{FetchError, RawDocument};
use async_trait::async_trait;
use url::Url;

/// Source of raw listing pages.
///
/// The orchestrator only talks to this seam, so tests can swap the network
/// for canned pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page. Exactly one attempt, no retry.
    async fn fetch(&self, url: &Url) -> Result<RawDocument, FetchError>;

    /// Get the name of the fetcher
    fn source_name(&self) -> &'static str;
}
