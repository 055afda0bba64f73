use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::time::Duration;

use crate::core::state::NavKey;

/// TUI-specific input events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuiEvent {
    Nav(NavKey),
    Resize,
}

/// Maps a physical key to one of the logical navigation keys.
pub fn map_key(key: KeyEvent) -> Option<NavKey> {
    // Release/repeat events arrive when keyboard enhancement is on
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(NavKey::Interrupt),
        (_, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => Some(NavKey::Up),
        (_, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('j')) => Some(NavKey::Down),
        (_, KeyCode::Enter) | (KeyModifiers::NONE, KeyCode::Char(' ')) => Some(NavKey::Select),
        (_, KeyCode::Esc) | (_, KeyCode::Backspace) | (KeyModifiers::NONE, KeyCode::Char('q')) => {
            Some(NavKey::Cancel)
        }
        _ => None,
    }
}

/// Poll for an event with timeout
pub fn poll_event_timeout(timeout: Duration) -> io::Result<Option<TuiEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    let event = match event::read()? {
        Event::Key(key_event) => {
            log::debug!("Key event: {:?} with modifiers {:?}", key_event.code, key_event.modifiers);
            map_key(key_event).map(TuiEvent::Nav)
        }
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    };
    Ok(event)
}
