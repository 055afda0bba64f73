//! # Process Execution
//!
//! A synchronous command invocation is one suspension point returning
//! `(exit code, stdout, stderr)`. The exit code is `None` when the process
//! was killed by a signal.

use std::io;
use std::process::Stdio;

use async_trait::async_trait;
use log::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &str) -> io::Result<ProcessOutput>;
}

/// Runs command lines through a shell (`sh -c` / `cmd /C`).
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: String,
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(default_shell())
    }
}

impl ShellRunner {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    fn command_flag(&self) -> &'static str {
        let name = self
            .shell
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.shell)
            .to_ascii_lowercase();
        if name == "cmd" || name == "cmd.exe" {
            "/C"
        } else {
            "-c"
        }
    }
}

pub fn default_shell() -> &'static str {
    if cfg!(windows) { "cmd" } else { "sh" }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str) -> io::Result<ProcessOutput> {
        info!("Running via {}: {}", self.shell, command);
        let output = tokio::process::Command::new(&self.shell)
            .arg(self.command_flag())
            .arg(command)
            .stdin(Stdio::inherit())
            .output()
            .await?;

        let result = ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(
            "Process finished: code={:?}, stdout={} bytes, stderr={} bytes",
            result.code,
            result.stdout.len(),
            result.stderr.len()
        );
        Ok(result)
    }
}
