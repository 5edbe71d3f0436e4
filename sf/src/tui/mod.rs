//! Terminal User Interface for Skillfolio
//!
//! A single scrolling page of full-height screens:
//! - Hero with a pointer glow and parallax backdrop
//! - About text
//! - Skill cards with an add prompt
//! - Slider index with an aggregate gauge
//!
//! Indicator dots on the right follow the section in view.

mod app;
mod events;
mod runner;
pub mod state;
mod views;

pub use app::App;
pub use events::{Event, EventHandler};
pub use runner::TuiRunner;
pub use state::{AppState, HitTarget, InteractionMode, SkillPrompt};

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use eyre::Result;
use keystore::Storage;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;

use crate::config::Config;

/// Terminal type alias
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture, DisableFocusChange)?;
    Ok(())
}

/// Run the TUI against `storage` until the user quits
pub async fn run(config: &Config, storage: Box<dyn Storage>) -> Result<()> {
    let terminal = init()?;

    // Use a guard to ensure terminal is restored even on early return/error
    struct TerminalGuard;
    impl Drop for TerminalGuard {
        fn drop(&mut self) {
            let _ = restore();
        }
    }
    let _guard = TerminalGuard;

    let size = terminal.size()?;
    info!(width = size.width, height = size.height, "Starting TUI");
    let app = App::new(config, storage, size.width, size.height)?;
    let frame_interval = Duration::from_millis(config.effects.frame_interval_ms.max(1));
    let mut runner = TuiRunner::new(terminal, app, frame_interval);
    runner.run().await
}
