use crate::config::{AppConfig, PageCap};
use crate::dashboard::{self, view, Summary};
use crate::models::Source;
use crate::scrapers::registry::CategoryRegistry;
use crate::scrapers::orchestrator::ScrapeOrchestrator;
use crate::scrapers::traits::PageFetcher;
use crate::store::{self, DatasetStore};
use anyhow::{anyhow, bail, Context, Result};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

const HELP: &str = "\
Commands:
  scrape [pages]   scrape every category, up to `pages` pages each (1-20)
  load [path]      load a .csv/.xlsx file, or the default data file
  show             display the current dataset
  dashboard [json] summary charts of the current dataset
  save <path>      write the current dataset as CSV
  feedback         link to the feedback form
  help             this text
  quit             leave the session";

/// One operator request. Scrape, load, dashboard and feedback are the four
/// views; the rest inspect or export the shared dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Scrape(Option<u32>),
    Load(Option<PathBuf>),
    Show,
    Dashboard { json: bool },
    Save(PathBuf),
    Feedback,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            bail!("empty command");
        };
        let arg = words.next();
        if words.next().is_some() {
            bail!("too many arguments for '{}'", verb);
        }

        let command = match (verb.to_lowercase().as_str(), arg) {
            ("scrape", None) => Command::Scrape(None),
            ("scrape", Some(n)) => Command::Scrape(Some(
                n.parse().with_context(|| format!("'{}' is not a page count", n))?,
            )),
            ("load", path) => Command::Load(path.map(PathBuf::from)),
            ("show", None) => Command::Show,
            ("dashboard", None) => Command::Dashboard { json: false },
            ("dashboard", Some("json")) => Command::Dashboard { json: true },
            ("save", Some(path)) => Command::Save(PathBuf::from(path)),
            ("save", None) => bail!("save needs a file path"),
            ("feedback", None) => Command::Feedback,
            ("help", None) => Command::Help,
            ("quit" | "exit", None) => Command::Quit,
            _ => bail!("unknown command '{}' (try 'help')", line.trim()),
        };
        Ok(command)
    }
}

/// All views share one dataset store for the lifetime of the session.
pub struct Session<F: PageFetcher> {
    config: AppConfig,
    registry: CategoryRegistry,
    scraper: ScrapeOrchestrator<F>,
    store: DatasetStore,
}

impl<F: PageFetcher> Session<F> {
    pub fn new(
        config: AppConfig,
        registry: CategoryRegistry,
        scraper: ScrapeOrchestrator<F>,
    ) -> Self {
        Self {
            config,
            registry,
            scraper,
            store: DatasetStore::new(),
        }
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Scrape all categories and make the result the current dataset.
    ///
    /// When a deadline is configured and hit, nothing is stored.
    pub async fn scrape(&self, page_cap: PageCap) -> Result<String> {
        let categories = self.registry.list();
        let dataset = match self.config.scrape.deadline {
            Some(deadline) => self
                .scraper
                .scrape_with_deadline(categories, page_cap, deadline)
                .await?,
            None => self.scraper.scrape(categories, page_cap).await,
        };

        self.store.replace(dataset);
        info!("Scraping terminé");
        self.show()
    }

    /// Load a user file, or the default data file when no path is given.
    pub fn load(&self, path: Option<&Path>) -> Result<String> {
        let (path, source) = match path {
            Some(path) => (path, Source::UploadedFile),
            None => (self.config.default_data_path.as_path(), Source::DefaultFile),
        };

        self.store.load_file(path, source)?;
        self.show()
    }

    /// Upload entry point: the parser is chosen from `file_name`.
    pub fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String> {
        self.store.load_upload(file_name, bytes)?;
        self.show()
    }

    /// Display the current dataset, loading the default data file first
    /// when nothing is loaded yet.
    pub fn show(&self) -> Result<String> {
        let dataset = self
            .store
            .load_default_if_empty(&self.config.default_data_path)
            .context("default data file")?
            .ok_or(dashboard::AggregationError::NoData)?;
        Ok(view::render_table(&dataset, self.config.preview_rows))
    }

    pub fn dashboard(&self, json: bool) -> Result<String> {
        let current = self.store.current();
        let summary = Summary::compute(current.as_deref())?;
        let charts = view::charts(&summary);

        if json {
            return Ok(serde_json::to_string_pretty(&charts)?);
        }
        Ok(charts
            .iter()
            .map(view::render_chart_text)
            .collect::<Vec<_>>()
            .join("\n"))
    }

    pub fn save(&self, path: &Path) -> Result<String> {
        let dataset = self
            .store
            .current()
            .ok_or_else(|| anyhow!("nothing to save, no dataset loaded"))?;
        store::save_csv(&dataset, path)?;
        Ok(format!("Saved {} records to {}", dataset.len(), path.display()))
    }

    pub fn feedback(&self) -> String {
        format!(
            "Donnez votre avis sur l'application : {}",
            self.config.feedback_url
        )
    }

    pub async fn execute(&self, command: &Command) -> Result<String> {
        debug!("Executing {:?}", command);
        match command {
            Command::Scrape(pages) => {
                let page_cap = match pages {
                    Some(n) => PageCap::new(*n)?,
                    None => self.config.scrape.page_cap,
                };
                self.scrape(page_cap).await
            }
            Command::Load(path) => self.load(path.as_deref()),
            Command::Show => self.show(),
            Command::Dashboard { json } => self.dashboard(*json),
            Command::Save(path) => self.save(path),
            Command::Feedback => Ok(self.feedback()),
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok(String::new()),
        }
    }

    /// Line-oriented loop. Errors are reported and the loop goes on.
    pub async fn run_interactive<R, W>(&self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        output.write_all(b"> ").await?;
        output.flush().await?;

        while let Some(line) = lines.next_line().await? {
            if !line.trim().is_empty() {
                let reply = match Command::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => self.execute(&command).await,
                    Err(e) => Err(e),
                };
                let text = match reply {
                    Ok(text) => text,
                    Err(e) => format!("error: {:#}", e),
                };
                output.write_all(text.as_bytes()).await?;
                output.write_all(b"\n").await?;
            }
            output.write_all(b"> ").await?;
            output.flush().await?;
        }

        output.flush().await?;
        Ok(())
    }
}
