//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the active
//! menu, and translates keyboard events into
//! [`NavKey`](crate::core::state::NavKey) values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! Nothing animates, so the loop only draws when [`App::handle_key`] asks
//! for it or the terminal is resized. After an action ran in plain mode
//! the whole screen is cleared and repainted.

mod event;
mod prompt;
pub mod theme;
mod ui;

use log::info;
use std::io::{self, stdout};
use std::time::Duration;

use async_trait::async_trait;
use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::DefaultTerminal;

use crate::core::binder::Prompter;
use crate::core::state::{App, Redraw};
use crate::core::suspension::{Foreground, ScreenMode};
use crate::tui::event::{TuiEvent, poll_event_timeout};
use crate::tui::theme::Theme;

const POLL_TIMEOUT: Duration = Duration::from_millis(250);

/// Owns the full-screen terminal and hands it over to plain mode on
/// request.
pub struct TuiHost {
    terminal: DefaultTerminal,
}

impl TuiHost {
    pub fn new(terminal: DefaultTerminal) -> Self {
        Self { terminal }
    }
}

impl ScreenMode for TuiHost {
    fn leave(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(stdout(), LeaveAlternateScreen, Show)?;
        Ok(())
    }

    fn enter(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, Hide)?;
        self.terminal.clear()
    }
}

#[async_trait]
impl Prompter for TuiHost {
    async fn prompt(&mut self, message: &str, default: &str) -> io::Result<String> {
        let (message, default) = (message.to_string(), default.to_string());
        tokio::task::spawn_blocking(move || prompt::read_line(&message, &default))
            .await
            .map_err(io::Error::other)?
    }

    async fn pause(&mut self, message: &str) -> io::Result<()> {
        let message = message.to_string();
        tokio::task::spawn_blocking(move || prompt::wait_for_enter(&message))
            .await
            .map_err(io::Error::other)?
    }
}

/// Restores the terminal on every exit path out of [`run`].
struct RestoreGuard;

impl Drop for RestoreGuard {
    fn drop(&mut self) {
        ratatui::restore();
    }
}

pub async fn run(mut app: App, theme: Theme) -> io::Result<()> {
    let terminal = ratatui::init();
    let _restore = RestoreGuard;
    let mut fg = Foreground::new(TuiHost::new(terminal));
    info!("Terminal initialized, entering event loop");

    let mut needs_redraw = true; // Force first frame
    while !app.is_terminated() {
        if needs_redraw {
            fg.host_mut()
                .terminal
                .draw(|f| ui::draw_ui(f, &app, &theme))?;
            needs_redraw = false;
        }

        match poll_event_timeout(POLL_TIMEOUT)? {
            Some(TuiEvent::Resize) => needs_redraw = true,
            Some(TuiEvent::Nav(key)) => match app.handle_key(key, &mut fg).await {
                Redraw::None => {}
                Redraw::Full => {
                    fg.host_mut().terminal.clear()?;
                    needs_redraw = true;
                }
                Redraw::Status | Redraw::Menu => needs_redraw = true,
            },
            None => {}
        }
    }

    info!("Event loop finished");
    Ok(())
}

