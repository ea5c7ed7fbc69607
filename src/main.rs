use animal_scout::config::{AppConfig, PageCap};
use animal_scout::scrapers::{CardExtractor, CategoryRegistry, HttpFetcher, ScrapeOrchestrator};
use animal_scout::session::Session;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "animal-scout",
    version,
    about = "CoinAfrique animal market data: scrape, load and summarise listings"
)]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Default data file
    #[arg(long, global = true, env = "ANIMAL_SCOUT_DATA")]
    data: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, env = "ANIMAL_SCOUT_TIMEOUT_SECS", default_value_t = 10)]
    timeout_secs: u64,

    /// Pages fetched at once
    #[arg(long, global = true, env = "ANIMAL_SCOUT_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Show every row instead of a preview
    #[arg(long, global = true)]
    all_rows: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape all categories
    Scrape {
        /// Pages per category (1-20)
        #[arg(short, long, env = "ANIMAL_SCOUT_PAGES", default_value_t = 2)]
        pages: u32,

        /// Also write the result to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Abort the whole scrape after this many seconds
        #[arg(long)]
        deadline_secs: Option<u64>,
    },
    /// Load a .csv or .xlsx file (the default data file when omitted)
    Load { path: Option<PathBuf> },
    /// Summary charts of a data file
    Dashboard {
        /// File to summarise (the default data file when omitted)
        path: Option<PathBuf>,

        /// Print chart specs as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the feedback form link
    Feedback,
    /// Interactive session over one shared dataset (default)
    Session,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = AppConfig::default().with_concurrency(cli.concurrency)?;
    config.request_timeout = Duration::from_secs(cli.timeout_secs);
    if let Some(data) = cli.data {
        config.default_data_path = data;
    }
    if cli.all_rows {
        config.preview_rows = None;
    }

    let command = cli.command.unwrap_or(Command::Session);
    if let Command::Scrape { pages, deadline_secs, .. } = &command {
        config.scrape.page_cap = PageCap::new(*pages)?;
        config.scrape.deadline = deadline_secs.map(Duration::from_secs);
    }

    let fetcher = HttpFetcher::new(config.request_timeout, &config.user_agent)?;
    let scraper =
        ScrapeOrchestrator::new(fetcher, CardExtractor::new()?, config.scrape.concurrency);
    let session = Session::new(config, CategoryRegistry::coinafrique()?, scraper);

    info!("🐾 Animal Scout - CoinAfrique animal market data");

    let output = match command {
        Command::Scrape { output, .. } => {
            let page_cap = session.config().scrape.page_cap;
            let table = session.scrape(page_cap).await?;
            if let Some(path) = output {
                info!("{}", session.save(&path)?);
            }
            table
        }
        Command::Load { path } => session.load(path.as_deref())?,
        Command::Dashboard { path, json } => {
            session.load(path.as_deref())?;
            session.dashboard(json)?
        }
        Command::Feedback => session.feedback(),
        Command::Session => {
            let stdin = BufReader::new(tokio::io::stdin());
            session.run_interactive(stdin, tokio::io::stdout()).await?;
            return Ok(());
        }
    };

    println!("{}", output);
    Ok(())
}
