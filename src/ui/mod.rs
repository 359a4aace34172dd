//! TUI module using ratatui.
//!
//! One screen: the four inputs, the submit control, and whatever the request
//! state has to show (spinner, error banner, or the suggestion cards).

pub mod components;
pub mod event;

use crate::agent::SuggestionClient;
use crate::app::App;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use event::{AppEvent, EventHandler};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stderr};
use std::sync::Arc;
use tracing::info;

pub type Tui = Terminal<CrosstermBackend<Stderr>>;

/// Run the interactive form until the user quits
pub async fn run(client: Arc<dyn SuggestionClient>) -> anyhow::Result<()> {
    install_panic_hook();
    let mut terminal = init()?;

    let mut events = EventHandler::new();
    let mut app = App::new(client, events.sender());

    let result = run_loop(&mut terminal, &mut app, &mut events).await;
    restore()?;
    info!("terminal restored");
    result
}

async fn run_loop(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> anyhow::Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| components::render(app, frame))?;

        match events.next().await {
            Some(AppEvent::Key(key)) => app.handle_key(key),
            Some(AppEvent::Tick) => app.tick(),
            Some(AppEvent::Resize(_, _)) => {}
            Some(AppEvent::Completion(completion)) => app.on_completion(completion),
            None => break,
        }
    }
    Ok(())
}

pub fn init() -> io::Result<Tui> {
    enable_raw_mode()?;
    execute!(io::stderr(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(io::stderr());
    Terminal::new(backend)
}

pub fn restore() -> io::Result<()> {
    execute!(io::stderr(), LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

/// Install panic hook to restore terminal on panic
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        original_hook(panic_info);
    }));
}
