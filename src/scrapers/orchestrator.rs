use crate::config::PageCap;
use crate::models::{Dataset, ListingRecord, Source};
use crate::scrapers::extractor::CardExtractor;
use crate::scrapers::registry::CategorySpec;
use crate::scrapers::traits::PageFetcher;
use futures::stream::{self, StreamExt};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error, PartialEq)]
pub enum ScrapeError {
    #[error("scrape did not finish within {0:?}; partial results discarded")]
    DeadlineExceeded(Duration),
}

/// Result of one page visit
#[derive(Debug)]
enum PageOutcome {
    Fetched(Vec<ListingRecord>),
    Failed,
}

/// Counters of one scrape run, next to its dataset
#[derive(Debug)]
pub struct ScrapeOutcome {
    pub dataset: Dataset,
    pub pages_attempted: usize,
    pub pages_failed: usize,
}

/// Drives fetcher and extractor over categories x pages
pub struct ScrapeOrchestrator<F: PageFetcher> {
    fetcher: F,
    extractor: CardExtractor,
    concurrency: usize,
}

impl<F: PageFetcher> ScrapeOrchestrator<F> {
    /// Pages are fetched `concurrency` at a time (at least one).
    pub fn new(fetcher: F, extractor: CardExtractor, concurrency: usize) -> Self {
        Self {
            fetcher,
            extractor,
            concurrency: concurrency.max(1),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Scrape every category up to `page_cap` pages each.
    ///
    /// A failed page contributes nothing and never stops its siblings.
    pub async fn scrape(&self, categories: &[CategorySpec], page_cap: PageCap) -> Dataset {
        self.run(categories, page_cap).await.dataset
    }

    /// Like [`scrape`](Self::scrape), but gives up after `deadline`.
    pub async fn scrape_with_deadline(
        &self,
        categories: &[CategorySpec],
        page_cap: PageCap,
        deadline: Duration,
    ) -> Result<Dataset, ScrapeError> {
        match tokio::time::timeout(deadline, self.scrape(categories, page_cap)).await {
            Ok(dataset) => Ok(dataset),
            Err(_) => {
                warn!("Scrape aborted after {:?}", deadline);
                Err(ScrapeError::DeadlineExceeded(deadline))
            }
        }
    }

    /// Scrape and report page counters.
    ///
    /// Records come out in (category order, page ascending, card position)
    /// order whatever the concurrency, since `buffered` yields in input order.
    pub async fn run(&self, categories: &[CategorySpec], page_cap: PageCap) -> ScrapeOutcome {
        let jobs: Vec<(&CategorySpec, u32)> = categories
            .iter()
            .flat_map(|spec| {
                (1..=spec.effective_pages(page_cap.get())).map(move |page| (spec, page))
            })
            .collect();
        let pages_attempted = jobs.len();

        info!(
            "Scraping {} categories via {}, {} pages (cap {}, {} in flight)",
            categories.len(),
            self.fetcher.source_name(),
            pages_attempted,
            page_cap,
            self.concurrency
        );

        let outcomes: Vec<PageOutcome> = stream::iter(jobs)
            .map(|(spec, page)| self.scrape_page(spec, page))
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut records = Vec::new();
        let mut pages_failed = 0;
        for outcome in outcomes {
            match outcome {
                PageOutcome::Fetched(page_records) => records.extend(page_records),
                PageOutcome::Failed => pages_failed += 1,
            }
        }

        info!(
            "✅ Scraped {} records ({} of {} pages failed)",
            records.len(),
            pages_failed,
            pages_attempted
        );

        ScrapeOutcome {
            dataset: Dataset::new(records, Source::Scraped),
            pages_attempted,
            pages_failed,
        }
    }

    async fn scrape_page(&self, spec: &CategorySpec, page: u32) -> PageOutcome {
        let url = spec.page_url(page);

        match self.fetcher.fetch(&url).await {
            Ok(doc) => {
                let records = self.extractor.extract(&doc.body, &spec.name, page);
                debug!("{} page {}: {} records", spec.name, page, records.len());
                PageOutcome::Fetched(records)
            }
            Err(e) => {
                warn!("Skipping {} page {} ({}): {}", spec.name, page, url, e);
                PageOutcome::Failed
            }
        }
    }
}
