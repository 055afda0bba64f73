//! Fakes shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use termenu::core::binder::Prompter;
use termenu::core::console::Console;
use termenu::core::suspension::{Foreground, ScreenMode};
use termenu::{App, NavKey, Redraw};

/// Answers prompts from a script and records what the user would see.
#[derive(Default)]
pub struct FakeTerminal {
    pub answers: VecDeque<String>,
    pub log: Vec<String>,
    pub fullscreen: bool,
}

impl FakeTerminal {
    pub fn new() -> Self {
        Self::answering(&[])
    }

    pub fn answering(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            fullscreen: true,
            ..Self::default()
        }
    }
}

impl ScreenMode for FakeTerminal {
    fn leave(&mut self) -> io::Result<()> {
        assert!(self.fullscreen, "left plain mode twice");
        self.fullscreen = false;
        self.log.push("leave".into());
        Ok(())
    }

    fn enter(&mut self) -> io::Result<()> {
        assert!(!self.fullscreen, "entered full-screen twice");
        self.fullscreen = true;
        self.log.push("enter".into());
        Ok(())
    }
}

#[async_trait]
impl Prompter for FakeTerminal {
    async fn prompt(&mut self, message: &str, default: &str) -> io::Result<String> {
        self.log.push(format!("prompt {message}[{default}]"));
        Ok(self
            .answers
            .pop_front()
            .unwrap_or_else(|| default.to_string()))
    }

    async fn pause(&mut self, message: &str) -> io::Result<()> {
        self.log.push(format!("pause {message}"));
        Ok(())
    }
}

#[derive(Default)]
pub struct Transcript {
    lines: Mutex<Vec<String>>,
}

impl Transcript {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }
}

impl Console for Transcript {
    fn write_line(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}

pub fn transcript() -> Arc<Transcript> {
    Arc::new(Transcript::default())
}

pub async fn press(app: &mut App, fg: &mut Foreground<FakeTerminal>, keys: &[NavKey]) -> Redraw {
    let mut last = Redraw::None;
    for key in keys {
        last = app.handle_key(*key, fg).await;
    }
    last
}
