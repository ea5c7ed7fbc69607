use crate::scrapers::types::ScrapeParams;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const MIN_PAGE_CAP: u32 = 1;
pub const MAX_PAGE_CAP: u32 = 20;
pub const DEFAULT_PAGE_CAP: u32 = 2;

const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 ",
    "(KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
);

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("page cap must be between 1 and 20, got {0}")]
    PageCapOutOfRange(u32),

    #[error("concurrency must be at least 1")]
    ZeroConcurrency,
}

/// Operator-chosen ceiling on pages fetched per category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCap(u32);

impl PageCap {
    pub fn new(pages: u32) -> Result<Self, ConfigError> {
        if (MIN_PAGE_CAP..=MAX_PAGE_CAP).contains(&pages) {
            Ok(Self(pages))
        } else {
            Err(ConfigError::PageCapOutOfRange(pages))
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for PageCap {
    fn default() -> Self {
        Self(DEFAULT_PAGE_CAP)
    }
}

impl fmt::Display for PageCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Application-wide settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// File produced by the browser-extension scraper, loaded as "default file"
    pub default_data_path: PathBuf,
    pub feedback_url: String,
    pub request_timeout: Duration,
    pub user_agent: String,
    pub scrape: ScrapeParams,
    /// Rows shown when a dataset is displayed; `None` shows all
    pub preview_rows: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_data_path: PathBuf::from("data/data_animaux.csv"),
            feedback_url: "https://ee.kobotoolbox.org/single/eDXBD6en".to_string(),
            request_timeout: Duration::from_secs(10),
            user_agent: USER_AGENT.to_string(),
            scrape: ScrapeParams::default(),
            preview_rows: Some(50),
        }
    }
}

impl AppConfig {
    pub fn with_concurrency(mut self, concurrency: usize) -> Result<Self, ConfigError> {
        if concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        self.scrape.concurrency = concurrency;
        Ok(self)
    }
}
