// src/main.rs
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gym_log_lib::{AppEvent, AppService, Session};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{io, process, time::Duration};
use tracing::{error, info};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn main() {
    if let Err(err) = run() {
        error!("exiting with error: {err:#}");
        eprintln!("Error: {err:?}"); // Print errors to stderr
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let app_service = AppService::initialize()?;
    info!(db = ?app_service.db_path, config = ?app_service.config_path, "starting");
    let mut session = app_service.start();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut session);

    // Queued writes are flushed even when restoring the terminal fails
    let restored = session.close_then(|| restore_terminal(&mut terminal));
    info!("session closed");
    res.and(restored)
}

fn restore_terminal<B: Backend + io::Write>(terminal: &mut Terminal<B>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, session: &mut Session) -> Result<()> {
    loop {
        session.navigator.clear_expired_error();
        terminal.draw(|f| session.navigator.render(f))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events
                if key.kind == KeyEventKind::Press {
                    session.navigator.handle_event(AppEvent::Key(key))?;
                }
            }
        }
        // Lookup results and failed writes arrive between key presses
        session.drain_background_events()?;

        if session.navigator.should_quit() {
            return Ok(());
        }
    }
}
