//! nqview TUI: date-range picker, fetch, chart, summary, raw rows, download.
//!
//! Keys are listed in the help overlay (`?`).

use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{info, warn};

use nqview_core::config::AppConfig;
use nqview_core::logging::{self, LogTarget};
use nqview_core::retrieval::RetrievalClient;
use nqview_core::vendor::{DatabentoHistorical, FixtureSource, HistoricalSource};
use nqview_tui::app::AppState;
use nqview_tui::{input, persistence, session, ui};

/// Log file written inside the export directory.
const LOG_FILE: &str = "nqview-tui.log";

#[derive(Parser)]
#[command(name = "nqview-tui", about = "nqview dashboard for historical NQ futures data")]
struct Cli {
    /// Path to a TOML config file. Defaults to $NQVIEW_CONFIG, then built-ins.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Serve the built-in sample session instead of calling the vendor.
    #[arg(long, default_value_t = false)]
    demo: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    let log_path = config.output.export_dir.join(LOG_FILE);
    if let Err(e) = logging::init(&config.logging, LogTarget::File(log_path)) {
        eprintln!("Warning: {e}");
    }

    if cli.demo {
        let client = RetrievalClient::new(&config, FixtureSource::nq_sample()?);
        run(&config, &client)
    } else {
        let client = RetrievalClient::new(&config, DatabentoHistorical::new(&config.vendor)?);
        run(&config, &client)
    }
}

fn run<S: HistoricalSource>(config: &AppConfig, client: &RetrievalClient<'_, S>) -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let state_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nqview")
        .join("state.json");

    let mut app = AppState::new(config);
    persistence::apply(&mut app, persistence::load(&state_path));
    info!(source = client.source().name(), "dashboard started");

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app, client);

    if let Err(e) = persistence::save(&state_path, &persistence::extract(&app)) {
        warn!("failed to save dashboard state: {e:#}");
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<S: HistoricalSource>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    client: &RetrievalClient<'_, S>,
) -> Result<()> {
    loop {
        // 1. Render (shows the busy indicator before a blocking fetch)
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Run any requested fetch or download
        if session::has_work(app) {
            session::service(app, client);
            continue;
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}
