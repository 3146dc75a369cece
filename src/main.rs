//! pagewatch — polls a list of web pages and reports when they change.
//!
//! ## Architecture overview
//!
//! ```text
//!               ┌──────────┐
//!               │ config   │ (read once)
//!               └────┬─────┘
//!                    ▼
//! ┌──────────┐  seed / check  ┌──────────┐  fetch()   ┌──────────┐
//! │ poll.rs  │ ─────────────► │  app.rs  │ ─────────► │ source/  │
//! │ (loop)   │                │ (targets)│            │ (HTTP)   │
//! └──────────┘                └────┬─────┘            └──────────┘
//!                                  │ sanitize()  ┌─────────────┐
//!                                  ├───────────► │ sanitize.rs │
//!                                  │ report()    ┌─────────────┐
//!                                  └───────────► │ report.rs   │
//!                                                └─────────────┘
//! ```
//!
//! * **`config`** — loads and validates the JSON configuration.
//! * **`source/`** — the `Fetcher` trait and the blocking HTTP fetcher.
//! * **`sanitize`** — pluggable normalization applied before comparison.
//! * **`target`** — one watched page and its snapshot.
//! * **`app`** — owns the targets and runs one fetch/compare step.
//! * **`poll`** — the init phase, the endless cycle and shutdown handling.
//! * **`report`** — change banners and the terminal bell.
//! * **`main`** — wires everything together: parse args, set up logging,
//!   load the configuration and hand over to the loop.

mod app;
mod config;
mod poll;
mod report;
mod sanitize;
mod source;
mod target;

#[cfg(test)]
mod testing;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::App;
use poll::Shutdown;
use report::ConsoleReporter;
use source::HttpFetcher;

#[derive(Parser, Debug)]
#[command(name = "pagewatch")]
#[command(about = "Poll web pages and report when their content changes")]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = config::DEFAULT_PATH)]
    config: PathBuf,

    /// Do not ring the terminal bell on changes
    #[arg(long)]
    no_bell: bool,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    // -- configuration (fatal on any error, nothing fetched yet) -------------
    let config = config::load(&args.config)
        .with_context(|| format!("failed to load configuration from {}", args.config.display()))?;

    let fetcher = HttpFetcher::new(config.timeout()).context("failed to build HTTP client")?;
    let reporter = ConsoleReporter::new(!args.no_bell);
    let mut app = App::from_config(&config, Box::new(fetcher), Box::new(reporter));

    info!(
        targets = app.targets.len(),
        interval_secs = app.interval.as_secs(),
        "Watching"
    );

    // -- run until Ctrl-C ----------------------------------------------------
    let shutdown = Shutdown::on_ctrl_c();
    poll::run(&mut app, &shutdown);

    Ok(())
}
