//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::binder::Prompter;
use crate::core::console::Console;
use crate::core::exec::{CommandRunner, ProcessOutput};
use crate::core::menu::StaticMenu;
use crate::core::registry::{ActionContext, MenuSnapshot, menu_factory};
use crate::core::state::App;
use crate::core::suspension::{Foreground, ScreenMode};

/// Collects console lines instead of printing them.
#[derive(Default)]
pub struct CaptureConsole {
    lines: Mutex<Vec<String>>,
}

impl CaptureConsole {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl Console for CaptureConsole {
    fn write_line(&self, line: &str) {
        // blank spacer lines are noise in assertions
        if !line.is_empty() && !line.chars().all(|c| c == '-') {
            self.lines.lock().unwrap().push(line.to_string());
        }
    }
}

/// Records command lines and returns a canned result without spawning.
#[derive(Default)]
pub struct RecordingRunner {
    commands: Mutex<Vec<String>>,
    output: Mutex<ProcessOutput>,
}

impl RecordingRunner {
    pub fn returning(output: ProcessOutput) -> Self {
        Self {
            commands: Mutex::default(),
            output: Mutex::new(output),
        }
    }

    pub fn set_output(&self, output: ProcessOutput) {
        *self.output.lock().unwrap() = output;
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &str) -> io::Result<ProcessOutput> {
        self.commands.lock().unwrap().push(command.to_string());
        Ok(self.output.lock().unwrap().clone())
    }
}

/// A terminal host that replays scripted answers and records every
/// screen switch, prompt and pause in `events`.
#[derive(Default)]
pub struct ScriptedHost {
    answers: VecDeque<String>,
    pub prompts: Vec<(String, String)>,
    pub pauses: Vec<String>,
    pub events: Vec<String>,
    pub fail_prompts: bool,
    pub fail_leave: bool,
    /// The pause cue reports Ctrl+C instead of Enter.
    pub interrupt_pause: bool,
}

impl ScriptedHost {
    pub fn with_answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

impl ScreenMode for ScriptedHost {
    fn leave(&mut self) -> io::Result<()> {
        self.events.push("leave".to_string());
        if self.fail_leave {
            return Err(io::Error::other("no tty"));
        }
        Ok(())
    }

    fn enter(&mut self) -> io::Result<()> {
        self.events.push("enter".to_string());
        Ok(())
    }
}

#[async_trait]
impl Prompter for ScriptedHost {
    async fn prompt(&mut self, message: &str, default: &str) -> io::Result<String> {
        self.events.push(format!("prompt:{message}"));
        self.prompts.push((message.to_string(), default.to_string()));
        if self.fail_prompts {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
        }
        // an exhausted script accepts the default unchanged
        Ok(self
            .answers
            .pop_front()
            .unwrap_or_else(|| default.to_string()))
    }

    async fn pause(&mut self, message: &str) -> io::Result<()> {
        self.events.push(format!("pause:{message}"));
        self.pauses.push(message.to_string());
        if self.interrupt_pause {
            return Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted"));
        }
        Ok(())
    }
}

/// Creates a context whose output lands in the returned console.
pub fn test_context() -> (ActionContext, Arc<CaptureConsole>) {
    let console = Arc::new(CaptureConsole::default());
    let menu = MenuSnapshot {
        name: "main".to_string(),
        title: "Main".to_string(),
        items: vec![("item".to_string(), "Item".to_string())],
        selected: 0,
    };
    let ctx = ActionContext::new("test", menu, "item", vec!["main".to_string()], console.clone());
    (ctx, console)
}

/// An app wired to fakes, plus handles to inspect them.
pub struct TestRig {
    pub app: App,
    pub fg: Foreground<ScriptedHost>,
    pub runner: Arc<RecordingRunner>,
    pub console: Arc<CaptureConsole>,
}

/// Creates a test App whose main menu is `main`.
pub fn test_app(main: StaticMenu) -> TestRig {
    let runner = Arc::new(RecordingRunner::default());
    let console = Arc::new(CaptureConsole::default());
    let app = App::new(menu_factory(main))
        .with_runner(runner.clone())
        .with_console(console.clone());
    TestRig {
        app,
        fg: Foreground::new(ScriptedHost::default()),
        runner,
        console,
    }
}
