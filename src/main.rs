use std::io;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use initiative_tracker::config::AppConfig;
use initiative_tracker::core::logging;
use initiative_tracker::core::session::EncounterTracker;
use initiative_tracker::core::storage::{FileStore, KeyValueStore, MemoryStore, SnapshotRepository};
use initiative_tracker::tui::app::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_path();
    let (config, config_error) = AppConfig::load_or_default(&config_path);

    // Initialize logging
    let _log_guard = logging::init_tui(&config.log_dir());
    log::info!("{} v{} starting", initiative_tracker::NAME, initiative_tracker::VERSION);
    match config_error {
        Some(e) => log::warn!("{e}, using defaults"),
        None => log::info!("Config path: {}", config_path.display()),
    }

    let store: Box<dyn KeyValueStore> = if config.data.persist {
        Box::new(FileStore::open(config.store_dir())?)
    } else {
        log::info!("Persistence disabled, encounter lives in memory");
        Box::new(MemoryStore::new())
    };
    let tracker = EncounterTracker::open(
        SnapshotRepository::new(store),
        config.tracker.turn_anchor,
    );
    let mut app = AppState::new(tracker);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let tick_rate = Duration::from_millis(config.tui.tick_rate_ms.max(1));
    let result = app.run(&mut terminal, tick_rate).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        log::error!("Application error: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    log::info!("Shutdown complete");
    Ok(())
}
