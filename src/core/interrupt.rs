//! Ctrl+C while the terminal is in plain mode.
//!
//! Raw mode is off while an action runs, so the terminal turns Ctrl+C into
//! SIGINT for the whole foreground process group. A child process handles
//! its copy however it likes. Ours is only recorded here and turned into a
//! queued [`NavKey::Interrupt`] once the action has returned.
//!
//! [`NavKey::Interrupt`]: crate::core::state::NavKey::Interrupt

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{info, warn};
use tokio::task::JoinHandle;

/// Records Ctrl+C for as long as it is alive.
pub struct InterruptWatch {
    seen: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl InterruptWatch {
    /// The signal handler is installed before this returns, so an
    /// interrupt raised right afterwards is not lost. Must be called from
    /// inside a tokio runtime.
    pub fn start() -> Self {
        let seen = Arc::new(AtomicBool::new(false));
        let task = match listener() {
            Ok(mut listener) => {
                let flag = seen.clone();
                Some(tokio::spawn(async move {
                    while listener.recv().await.is_some() {
                        info!("Interrupt received while suspended, queued");
                        flag.store(true, Ordering::SeqCst);
                    }
                }))
            }
            Err(e) => {
                warn!("Cannot listen for Ctrl+C: {}", e);
                None
            }
        };
        Self { seen, task }
    }

    pub fn interrupted(&self) -> bool {
        self.seen.load(Ordering::SeqCst)
    }

    /// Records an interrupt that arrived some other way, such as Ctrl+C
    /// read as a key by a raw-mode prompt.
    pub fn record(&self) {
        self.seen.store(true, Ordering::SeqCst);
    }

    /// Stops listening and reports whether an interrupt arrived.
    pub async fn finish(mut self) -> bool {
        // gives the listener a turn to pick up a signal already delivered
        tokio::task::yield_now().await;
        self.stop();
        self.interrupted()
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for InterruptWatch {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(unix)]
fn listener() -> io::Result<tokio::signal::unix::Signal> {
    use tokio::signal::unix::{SignalKind, signal};
    signal(SignalKind::interrupt())
}

#[cfg(windows)]
fn listener() -> io::Result<tokio::signal::windows::CtrlC> {
    tokio::signal::windows::ctrl_c()
}
