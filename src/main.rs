use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use tickr::app::{
    r#loop::{run_loop, Services},
    state::AppState,
};
use tickr::config::{self, AppConfig};
use tickr::domain::lookup::StockLookup;
use tickr::infrastructure::{CatalogLookup, FinnhubLookup};
use tickr::logging;

#[derive(Parser, Debug)]
#[command(name = "tickr", version, about = "Search stocks from your terminal")]
struct Cli {
    /// Config file (defaults to ~/.config/tickr/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file (defaults to ~/.config/tickr/tickr.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Search the built-in catalog instead of the network
    #[arg(long)]
    offline: bool,

    /// Override the search debounce in milliseconds
    #[arg(long)]
    debounce_ms: Option<i64>,

    /// Finnhub API token
    #[arg(long, env = "FINNHUB_TOKEN", hide_env_values = true)]
    api_token: Option<String>,
}

fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        );
        original_hook(panic_info);
    }));
}

fn build_lookup(config: &AppConfig, offline: bool) -> Arc<dyn StockLookup> {
    if !offline && config.has_api_token() {
        match FinnhubLookup::from_config(config) {
            Ok(lookup) => return Arc::new(lookup),
            Err(e) => warn!(error = %e, "falling back to offline catalog"),
        }
    }
    Arc::new(CatalogLookup::from_config(config))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Everything that can fail runs before the terminal enters raw mode.
    let log_path = match cli.log_file.clone() {
        Some(path) => path,
        None => logging::default_log_path().context("could not determine home directory")?,
    };
    logging::init(&log_path)?;

    let mut config = config::load(cli.config.as_deref()).context("failed to load config")?;
    if let Some(ms) = cli.debounce_ms {
        config.debounce_ms = ms;
    }
    if let Some(token) = cli.api_token {
        config.api_token = Some(token);
    }

    let lookup = build_lookup(&config, cli.offline);
    info!(
        backend = lookup.backend_name(),
        debounce_ms = config.debounce_delay().as_millis() as u64,
        "starting tickr"
    );
    let app_state = AppState::new(&config, lookup.backend_name());
    let services = Services {
        lookup,
        navigator: None,
        debounce_delay: config.debounce_delay(),
    };

    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let res = run_loop(&mut terminal, app_state, services).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "event loop failed");
        eprintln!("{err:?}");
    }

    Ok(())
}
