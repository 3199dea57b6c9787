//! exemplar - debounced client for the exemplar article search service

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use exemplar_client::config::Config;
use exemplar_client::controller::SearchController;
use exemplar_client::display::{DisplaySurface, PlainSurface, TerminalSurface};
use exemplar_client::input::InteractiveApp;
use exemplar_client::render;
use exemplar_client::service::{HttpQueryService, QueryService};
use exemplar_client::telemetry::UsageReporter;

#[derive(Parser)]
#[command(name = "exemplar")]
#[command(about = "Debounced search client for the exemplar article service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Query service base URL
    #[arg(long, env = "EXEMPLAR_URL")]
    url: Option<String>,

    /// Path to the configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disable ANSI styling and transitions
    #[arg(long)]
    no_ansi: bool,

    /// Disable usage recording
    #[arg(long)]
    no_telemetry: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Live search with debounced keystrokes
    Interactive {
        /// Debounce window in milliseconds
        #[arg(long)]
        debounce_ms: Option<u64>,
    },
    /// One-shot query (empty or omitted text lists the prototypical articles)
    Query {
        /// Search text
        text: Option<String>,
        /// Print the raw JSON envelope instead of rendered blocks
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(url) = cli.url.clone() {
        config.service.url = url;
    }
    if cli.no_telemetry {
        config.telemetry.enabled = false;
    }

    let use_ansi = !cli.no_ansi;
    match cli.command {
        Commands::Interactive { debounce_ms } => {
            run_interactive(use_ansi, &config, debounce_ms).await?;
        }
        Commands::Query { text, json } => {
            run_query(&config, text.unwrap_or_default(), json).await?;
        }
    }

    Ok(())
}

async fn run_interactive(use_ansi: bool, config: &Config, debounce_ms: Option<u64>) -> Result<()> {
    let service = Arc::new(HttpQueryService::new(&config.service)?);
    let surface = Arc::new(TerminalSurface::new(use_ansi));

    let reporter = open_reporter(config)?;

    let mut controller = SearchController::new(service, surface.clone());
    if let Some(reporter) = &reporter {
        controller = controller.with_usage(reporter.handle());
    }

    let debounce = Duration::from_millis(debounce_ms.unwrap_or(config.search.debounce_ms));
    let app = InteractiveApp::new(Arc::new(controller), surface, debounce);
    let result = app.run().await;

    // The controller's usage handle is gone with the app; the reporter can
    // now drain and stop.
    drop(app);
    if let Some(reporter) = reporter {
        reporter.shutdown().await;
    }

    result
}

async fn run_query(config: &Config, text: String, json: bool) -> Result<()> {
    let service = HttpQueryService::new(&config.service)?;

    let reporter = open_reporter(config)?;
    if let Some(reporter) = &reporter {
        reporter.report_usage("query", &text);
    }

    let mut results = if text.is_empty() {
        service.fetch_prototypical().await?
    } else {
        service.fetch_search(&text).await?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        results.normalize();
        let blocks = render::render(&results);
        PlainSurface::new().render(&blocks).await;
    }

    if let Some(reporter) = reporter {
        reporter.shutdown().await;
    }

    Ok(())
}

fn open_reporter(config: &Config) -> Result<Option<UsageReporter>> {
    let Some(path) = config.telemetry.resolved_db_path() else {
        return Ok(None);
    };

    let reporter = UsageReporter::open(&path)
        .with_context(|| format!("failed to open usage store at {}", path.display()))?;
    Ok(Some(reporter))
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .init();
    }

    Ok(())
}
