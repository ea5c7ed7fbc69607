use crate::scrapers::traits::PageFetcher;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Why a single page could not be fetched
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    ConnectionFailure(String),

    #[error("server returned HTTP {0}")]
    HttpStatus(u16),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = err.status() {
            FetchError::HttpStatus(status.as_u16())
        } else {
            FetchError::ConnectionFailure(err.to_string())
        }
    }
}

/// Body of a successfully fetched listing page
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub url: Url,
    pub body: String,
}

/// Page fetcher backed by a reqwest client with a fixed total timeout
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<RawDocument, FetchError> {
        debug!("Fetching URL: {}", url);

        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        // The client timeout also covers reading the body
        let body = response.text().await?;
        debug!("Downloaded {} bytes from {}", body.len(), url);

        Ok(RawDocument {
            url: url.clone(),
            body,
        })
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
