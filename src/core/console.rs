//! Plain-terminal output used while the full-screen UI is suspended.

/// Line sink for action output and recovered errors.
pub trait Console: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Writes straight to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn write_line(&self, line: &str) {
        println!("{line}");
    }
}
