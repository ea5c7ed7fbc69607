pub mod extractor;
pub mod fetcher;
pub mod orchestrator;
pub mod registry;
pub mod traits;
pub mod types;

pub use extractor::{CardExtractor, CardSelectors};
pub use fetcher::{FetchError, HttpFetcher, RawDocument};
pub use orchestrator::{ScrapeError, ScrapeOrchestrator, ScrapeOutcome};
pub use registry::{CategoryRegistry, CategorySpec};
pub use traits::PageFetcher;
pub use types::ScrapeParams;
