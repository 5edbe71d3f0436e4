//! TUI Runner - main loop that owns the terminal
//!
//! The TuiRunner is responsible for:
//! - Dispatching events to App for handling
//! - Driving animation frames from ticks
//! - Redrawing whenever something changed

use std::time::{Duration, Instant};

use crossterm::event::MouseEvent;
use eyre::Result;
use tracing::{debug, trace};

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::views;

/// TUI Runner that manages the terminal and event loop
pub struct TuiRunner {
    /// Application state
    app: App,
    /// Terminal handle
    terminal: Tui,
    /// Event handler
    event_handler: EventHandler,
    /// Origin for pointer timestamps
    started: Instant,
    /// Redraw needed before waiting again
    dirty: bool,
}

impl TuiRunner {
    /// Create a runner emitting a frame every `frame_interval`
    pub fn new(terminal: Tui, app: App, frame_interval: Duration) -> Self {
        debug!(?frame_interval, "TuiRunner::new: called");
        Self {
            app,
            terminal,
            event_handler: EventHandler::new(frame_interval),
            started: Instant::now(),
            dirty: true,
        }
    }

    /// Run the TUI main loop
    pub async fn run(&mut self) -> Result<()> {
        debug!("TuiRunner::run: entering main loop");
        loop {
            if self.dirty {
                self.terminal.draw(|frame| views::render(self.app.state_mut(), frame))?;
                self.dirty = false;
            }

            match self.event_handler.next().await? {
                Event::Tick => {
                    self.dirty |= self.app.on_frame();
                }
                Event::Key(key_event) => {
                    self.dirty = true;
                    if self.app.handle_key(key_event) {
                        break;
                    }
                }
                Event::Mouse(mouse_event) => {
                    self.handle_mouse(mouse_event);
                }
                Event::Resize(width, height) => {
                    self.app.handle_resize(width, height);
                    self.dirty = true;
                }
                Event::FocusLost => {
                    // The glow fades over the following ticks
                    self.app.handle_pointer_leave();
                    self.dirty = true;
                }
            }

            if self.app.state().should_quit {
                debug!("TuiRunner::run: should_quit is true, breaking");
                break;
            }
        }

        debug!("TuiRunner::run: exiting");
        Ok(())
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let now_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        trace!(?mouse, now_ms, "TuiRunner::handle_mouse: called");
        self.app.handle_mouse(mouse, now_ms);
        // Pointer moves only show up once the next frame runs
        if !matches!(mouse.kind, crossterm::event::MouseEventKind::Moved) {
            self.dirty = true;
        }
    }
}
