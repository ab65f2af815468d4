use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent};
use rebound_core::Edge;

/// Event handler for terminal events
pub struct EventHandler {
    tick_rate: Duration,
}

/// Work the demo hands to a background task when a component fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRequest {
    pub edge: Edge,
    /// Page being requested; a header refresh always asks for page 0
    pub page: usize,
}

/// Result of a simulated load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadResult {
    pub edge: Edge,
    pub page: usize,
    pub items: Vec<String>,
}

impl LoadResult {
    /// Fabricate the rows of `page`
    pub fn for_request(request: LoadRequest, page_size: usize, generation: usize) -> Self {
        let first = request.page * page_size;
        let items = (first..first + page_size)
            .map(|n| format!("Item {:>3}  (refresh #{generation})", n + 1))
            .collect();
        Self {
            edge: request.edge,
            page: request.page,
            items,
        }
    }
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    /// Poll for the next event
    pub fn next(&self) -> Result<Option<AppEvent>> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events, ignore release events
                    if key.kind == KeyEventKind::Press {
                        Ok(Some(AppEvent::Key(key)))
                    } else {
                        Ok(None)
                    }
                }
                Event::Mouse(mouse) => Ok(Some(AppEvent::Mouse(mouse))),
                Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
                _ => Ok(None),
            }
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Mouse button, drag or wheel
    Mouse(MouseEvent),
    /// Terminal was resized
    Resize(u16, u16),
    /// Tick event for periodic updates
    Tick,
}
