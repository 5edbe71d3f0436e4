//! TUI event handling
//!
//! Async-compatible event handling for the TUI using tokio channels.
//! Ticks double as animation frames, so they keep flowing under constant input.

use std::time::{Duration, Instant};

use crossterm::event::{self, KeyEvent, KeyEventKind, MouseEvent};
use eyre::Result;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Terminal events
#[derive(Debug)]
pub enum Event {
    /// Key press
    Key(KeyEvent),
    /// Mouse event
    Mouse(MouseEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// Terminal lost focus (the pointer left the window)
    FocusLost,
    /// Animation frame
    Tick,
}

/// Event handler for the TUI
pub struct EventHandler {
    /// Event receiver
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Create a new event handler emitting a tick every `frame_interval`
    pub fn new(frame_interval: Duration) -> Self {
        debug!(?frame_interval, "EventHandler::new: called");
        let (tx, rx) = mpsc::unbounded_channel();

        // Spawn event polling task in a blocking thread
        std::thread::spawn(move || {
            debug!("EventHandler::new: event polling thread started");
            let mut last_tick = Instant::now();
            loop {
                let timeout = frame_interval.saturating_sub(last_tick.elapsed());
                if event::poll(timeout).unwrap_or(false)
                    && let Ok(evt) = event::read()
                {
                    let event = match evt {
                        event::Event::Key(key) if key.kind != KeyEventKind::Release => {
                            debug!(?key, "EventHandler: key event received");
                            Some(Event::Key(key))
                        }
                        event::Event::Mouse(mouse) => {
                            trace!(?mouse, "EventHandler: mouse event received");
                            Some(Event::Mouse(mouse))
                        }
                        event::Event::Resize(w, h) => {
                            debug!(w, h, "EventHandler: resize event received");
                            Some(Event::Resize(w, h))
                        }
                        event::Event::FocusLost => {
                            debug!("EventHandler: focus lost");
                            Some(Event::FocusLost)
                        }
                        _ => None,
                    };

                    if let Some(event) = event
                        && tx.send(event).is_err()
                    {
                        debug!("EventHandler: channel closed, exiting loop");
                        break;
                    }
                }

                if last_tick.elapsed() >= frame_interval {
                    last_tick = Instant::now();
                    if tx.send(Event::Tick).is_err() {
                        debug!("EventHandler: channel closed on tick, exiting loop");
                        break;
                    }
                }
            }
            debug!("EventHandler: event polling thread exiting");
        });

        debug!("EventHandler::new: returning handler");
        Self { rx }
    }

    /// Get the next event (async)
    pub async fn next(&mut self) -> Result<Event> {
        self.rx.recv().await.ok_or_else(|| eyre::eyre!("Event channel closed"))
    }
}
