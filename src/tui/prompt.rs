//! Plain-terminal input while the full-screen UI is suspended: a single
//! line editor with an editable default, and the "press enter" cue.

use std::io::{self, Write, stdout};

use crossterm::cursor::MoveToColumn;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode};
use crossterm::queue;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Continue,
    Submit,
    Abort,
}

/// Text buffer plus a cursor counted in chars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEditor {
    chars: Vec<char>,
    cursor: usize,
}

impl LineEditor {
    /// Starts with `default` filled in and the cursor at its end.
    pub fn new(default: &str) -> Self {
        let chars: Vec<char> = default.chars().collect();
        let cursor = chars.len();
        Self { chars, cursor }
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Display width of the text left of the cursor.
    pub fn cursor_width(&self) -> usize {
        let before: String = self.chars[..self.cursor].iter().collect();
        before.width()
    }

    pub fn handle(&mut self, key: KeyEvent) -> Edit {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => return Edit::Submit,
            KeyCode::Esc => return Edit::Abort,
            KeyCode::Char('c') if ctrl => return Edit::Abort,
            KeyCode::Char('d') if ctrl && self.chars.is_empty() => return Edit::Abort,
            KeyCode::Char('a') if ctrl => self.cursor = 0,
            KeyCode::Char('e') if ctrl => self.cursor = self.chars.len(),
            KeyCode::Char('u') if ctrl => {
                self.chars.drain(..self.cursor);
                self.cursor = 0;
            }
            KeyCode::Char(_) if ctrl => {}
            KeyCode::Char(c) => {
                self.chars.insert(self.cursor, c);
                self.cursor += 1;
            }
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                self.chars.remove(self.cursor);
            }
            KeyCode::Delete if self.cursor < self.chars.len() => {
                self.chars.remove(self.cursor);
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.chars.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.chars.len(),
            _ => {}
        }
        Edit::Continue
    }
}

/// Leaves raw mode on drop.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

fn render(out: &mut impl Write, message: &str, editor: &LineEditor) -> io::Result<()> {
    let column = message.width() + editor.cursor_width();
    queue!(
        out,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(message),
        Print(editor.text()),
        MoveToColumn(u16::try_from(column).unwrap_or(u16::MAX))
    )?;
    out.flush()
}

/// Reads one line, pre-filled with `default`. Blocks; run it off the
/// async runtime. Esc or Ctrl+C fails with `Interrupted`.
pub fn read_line(message: &str, default: &str) -> io::Result<String> {
    let mut editor = LineEditor::new(default);
    let mut out = stdout();
    let _raw = RawMode::enable()?;
    render(&mut out, message, &editor)?;

    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match editor.handle(key) {
            Edit::Continue => render(&mut out, message, &editor)?,
            Edit::Submit => {
                write!(out, "\r\n")?;
                out.flush()?;
                return Ok(editor.text());
            }
            Edit::Abort => {
                write!(out, "\r\n")?;
                out.flush()?;
                return Err(io::Error::new(io::ErrorKind::Interrupted, "prompt cancelled"));
            }
        }
    }
}

/// What a key press means at the pause cue. Other keys are ignored.
fn pause_key(key: KeyEvent) -> Option<Edit> {
    match key.code {
        KeyCode::Enter => Some(Edit::Submit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Edit::Abort),
        _ => None,
    }
}

/// Prints `message` and waits for Enter, reading keys in raw mode so
/// nothing else is echoed or swallowed as a line. Ctrl+C fails with
/// `Interrupted`.
pub fn wait_for_enter(message: &str) -> io::Result<()> {
    let mut out = stdout();
    let _raw = RawMode::enable()?;
    write!(out, "\r\n{message}")?;
    out.flush()?;

    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match pause_key(key) {
            Some(Edit::Submit) => {
                write!(out, "\r\n")?;
                out.flush()?;
                return Ok(());
            }
            Some(Edit::Abort) => {
                write!(out, "\r\n")?;
                out.flush()?;
                return Err(io::Error::new(io::ErrorKind::Interrupted, "pause interrupted"));
            }
            _ => {}
        }
    }
}
