//! Main chat event loop.
//!
//! Single-owner, single-writer: the loop owns the [`App`], draws frames,
//! feeds key and mouse events into it, and drains query outcomes from the
//! transport channel. The UI never blocks on a pending query; only message
//! dispatch is gated while one is in flight.

use std::error::Error;
use std::io;
use std::time::Duration;

use ratatui::crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use crate::commands::{process_input, CommandResult};
use crate::core::app::App;
use crate::core::config::{Config, ThemeColor};
use crate::core::transport::{QueryOutcome, QueryService};
use crate::ui::renderer::{transcript_line_count, ui, INPUT_AREA_HEIGHT};

pub struct ChatOptions {
    pub server_url: String,
    pub log_file: Option<String>,
    pub dark: bool,
    pub theme: Option<ThemeColor>,
}

pub async fn run_chat(options: ChatOptions) -> Result<(), Box<dyn Error>> {
    let config_path = Config::config_path();
    let mut config = match &config_path {
        Some(path) => Config::load_from_path(path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default preferences");
            Config::default()
        }),
        None => Config::default(),
    };

    // Command-line appearance flags win over stored preferences for this
    // session; they are only written back if the user changes them again.
    if options.dark {
        config.dark_mode = Some(true);
    }
    if let Some(color) = options.theme {
        config.theme_color = Some(color);
    }

    let (query, mut outcomes) = QueryService::new();
    let mut app = App::new(options.server_url, config, config_path, query)?;

    if let Some(log_file) = options.log_file {
        match app.session.logging.set_log_file(log_file) {
            Ok(message) => app.session.add_notice(message),
            Err(e) => app.session.add_notice(format!("Error setting log file: {e}")),
        }
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, &mut app, &mut outcomes).await;

    // Abandon any in-flight query; its outcome is discarded.
    app.query.shutdown();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    outcomes: &mut mpsc::UnboundedReceiver<(QueryOutcome, u64)>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key(app, terminal.size()?.height, key.code, key.modifiers);
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => scroll_up(app, 3),
                    MouseEventKind::ScrollDown => {
                        scroll_down(app, 3, terminal.size()?.height);
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        while let Ok((outcome, generation)) = outcomes.try_recv() {
            app.session.resolve(generation, outcome);
            if app.auto_scroll {
                app.scroll_offset = max_scroll_offset(app, terminal.size()?.height);
            }
        }

        if app.exit_requested {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, terminal_height: u16, code: KeyCode, modifiers: KeyModifiers) {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.exit_requested = true;
        }
        KeyCode::Enter => submit_input(app),
        // Chorded characters (Ctrl+V and the like) are not text input.
        KeyCode::Char(c) if modifiers.is_empty() || modifiers == KeyModifiers::SHIFT => {
            app.input.push(c);
        }
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Up => scroll_up(app, 1),
        KeyCode::Down => scroll_down(app, 1, terminal_height),
        _ => {}
    }
}

fn submit_input(app: &mut App) {
    if app.input.trim().is_empty() {
        return;
    }

    let input = app.input.clone();
    match process_input(app, &input) {
        CommandResult::Continue => app.input.clear(),
        CommandResult::ProcessAsMessage(text) => {
            // Input survives a rejected send (already pending); the
            // whitespace case is filtered above.
            if app.dispatch_prompt(&text) {
                app.input.clear();
            }
        }
    }
    app.auto_scroll = true;
}

fn scroll_up(app: &mut App, amount: u16) {
    app.auto_scroll = false;
    app.scroll_offset = app.scroll_offset.saturating_sub(amount);
}

fn scroll_down(app: &mut App, amount: u16, terminal_height: u16) {
    let max_offset = max_scroll_offset(app, terminal_height);
    app.scroll_offset = app.scroll_offset.saturating_add(amount).min(max_offset);
    // Reaching the bottom re-engages follow mode.
    if app.scroll_offset >= max_offset {
        app.auto_scroll = true;
    }
}

fn max_scroll_offset(app: &App, terminal_height: u16) -> u16 {
    let available_height = terminal_height
        .saturating_sub(INPUT_AREA_HEIGHT)
        .saturating_sub(1);
    transcript_line_count(app).saturating_sub(available_height)
}
