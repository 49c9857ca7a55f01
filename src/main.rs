use anyhow::{Context, Result};
use clap::Parser;
use listing_search::app::{self, events::UserEvent, state::SearchContext, SearchController};
use listing_search::config::{self, SearchConfig};
use listing_search::core::load_snapshot;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Runs a property search over a listings snapshot.
#[derive(Debug, Parser)]
#[command(name = "listing-search", version)]
struct Cli {
    /// JSON snapshot with properties, categories, subcategories, cities and towns.
    #[arg(long, value_name = "PATH")]
    snapshot: PathBuf,

    /// Query string of the search page URL, e.g. `listingType=RENT&sort=rent-asc`.
    #[arg(long, default_value = "")]
    query: String,

    /// Configuration file to use instead of the platform default.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the featured listings instead of the search page.
    #[arg(long)]
    featured: bool,

    /// Read IPC messages from stdin, one JSON object per line, and print the
    /// resulting events.
    #[arg(long)]
    ipc: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let search_config = match &cli.config {
        Some(path) => config::settings::load_config(Some(path.as_path()))?,
        None => SearchConfig::load()?,
    };

    let snapshot = load_snapshot(&cli.snapshot)
        .await
        .with_context(|| format!("Failed to load snapshot {:?}", cli.snapshot))?;
    let inconsistent = snapshot.audit();
    if !inconsistent.is_empty() {
        tracing::info!("{} properties have inconsistent references", inconsistent.len());
    }
    let context = SearchContext::from_snapshot(snapshot);

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UserEvent>();
    let mut controller =
        SearchController::from_query_string(search_config, context, &cli.query, event_tx);

    if cli.featured {
        println!("{}", serde_json::to_string_pretty(&controller.featured())?);
        return Ok(());
    }

    if !cli.ipc {
        println!("{}", serde_json::to_string_pretty(&controller.view())?);
        return Ok(());
    }

    let printer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if let Err(e) = print_event(event) {
                tracing::error!("Failed to print event: {}", e);
            }
        }
    });

    controller.refresh();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        app::handle_ipc_message(&line, &mut controller);
    }

    // Dropping the controller closes the channel and ends the printer.
    drop(controller);
    printer.await?;
    Ok(())
}

/// Writes one event to stdout as a single JSON line.
fn print_event(event: UserEvent) -> Result<()> {
    let line = match event {
        UserEvent::StateUpdate(view) => {
            serde_json::json!({ "type": "stateUpdate", "view": view })
        }
        UserEvent::Navigate(url) => serde_json::json!({ "type": "navigate", "url": url }),
        UserEvent::ShowError(message) => {
            serde_json::json!({ "type": "showError", "message": message })
        }
    };
    println!("{}", serde_json::to_string(&line)?);
    Ok(())
}
