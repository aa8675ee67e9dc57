//! nqview CLI: batch CSV export of NQ futures data.
//!
//! With no subcommand, fetches OHLCV bars for the configured window and
//! writes them to the configured output file.
//!
//! Commands:
//! - `fetch <kind>`: fetch bars, trades, depth or reference data over any
//!   window and export it

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use nqview_cli::{default_output, resolve_range, run_batch, run_fetch};
use nqview_core::config::AppConfig;
use nqview_core::domain::DataKind;
use nqview_core::logging::{self, LogTarget};
use nqview_core::retrieval::RetrievalClient;
use nqview_core::vendor::{DatabentoHistorical, FixtureSource, HistoricalSource};
use tracing::error;

#[derive(Parser)]
#[command(
    name = "nqview",
    about = "nqview CLI: historical NQ futures data export"
)]
struct Cli {
    /// Path to a TOML config file. Defaults to $NQVIEW_CONFIG, then built-ins.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Serve the built-in sample session instead of calling the vendor.
    #[arg(long, global = true, default_value_t = false)]
    demo: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one data kind and export it as CSV.
    Fetch {
        /// Data kind: bars, trades, depth, reference.
        kind: DataKind,

        /// Window start (RFC 3339 or YYYY-MM-DD). Defaults to the config window.
        #[arg(long)]
        start: Option<String>,

        /// Window end (RFC 3339 or YYYY-MM-DD). Defaults to the config window.
        #[arg(long)]
        end: Option<String>,

        /// Output CSV path.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = logging::init(&config.logging, LogTarget::Stderr) {
        eprintln!("Warning: {e}");
    }

    if let Err(e) = run(&config, cli.demo, cli.command) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(config: &AppConfig, demo: bool, command: Option<Commands>) -> Result<()> {
    if demo {
        let client = RetrievalClient::new(config, FixtureSource::nq_sample()?);
        dispatch(&client, command)
    } else {
        let client = RetrievalClient::new(config, DatabentoHistorical::new(&config.vendor)?);
        dispatch(&client, command)
    }
}

fn dispatch<S: HistoricalSource>(
    client: &RetrievalClient<'_, S>,
    command: Option<Commands>,
) -> Result<()> {
    let outcome = match command {
        None => run_batch(client)?,
        Some(Commands::Fetch {
            kind,
            start,
            end,
            out,
        }) => {
            let config = client.config();
            let range = resolve_range(config, start.as_deref(), end.as_deref())?;
            let out = out.unwrap_or_else(|| default_output(config, kind));
            run_fetch(client, kind, range, &out)?
        }
    };
    println!("{}", outcome.message());
    Ok(())
}
