use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

pub enum AppEvent {
    Key(KeyEvent),
    /// Nothing happened within the poll window, or a resize/mouse event
    /// that only needs a redraw.
    Tick,
}

pub fn poll(timeout: Duration) -> Result<AppEvent> {
    if event::poll(timeout)?
        && let Event::Key(key) = event::read()?
        && key.kind != KeyEventKind::Release
    {
        return Ok(AppEvent::Key(key));
    }
    Ok(AppEvent::Tick)
}
