//! # Foreground Suspension
//!
//! Hands the terminal from the full-screen UI to plain line mode for the
//! duration of one action and takes it back afterwards.
//!
//! ```text
//! Foreground::suspend()        depth 0 → 1, host.leave()
//! │   ... prompts, subprocess output, pause cue ...
//! │   Suspended::suspend()     depth 1 → 2, no terminal change
//! │   drop                     depth 2 → 1, no terminal change
//! drop (any exit path)         depth 1 → 0, host.enter()
//! ```
//!
//! The guard re-enters full-screen mode in `Drop`, so an early return, an
//! error or an unwinding panic all restore the screen.

use std::io;
use std::ops::{Deref, DerefMut};

use log::{debug, warn};

/// Switches the process-wide terminal between full-screen and plain mode.
pub trait ScreenMode: Send {
    /// Full-screen → plain.
    fn leave(&mut self) -> io::Result<()>;

    /// Plain → full-screen.
    fn enter(&mut self) -> io::Result<()>;
}

pub struct Foreground<H: ScreenMode> {
    host: H,
    depth: usize,
}

impl<H: ScreenMode> Foreground<H> {
    pub fn new(host: H) -> Self {
        Self { host, depth: 0 }
    }

    /// Number of live suspension guards.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_suspended(&self) -> bool {
        self.depth > 0
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Leaves full-screen mode (outermost call only) and returns a guard
    /// that restores it when the last guard drops. A failure to leave is
    /// logged; the action still runs.
    pub fn suspend(&mut self) -> Suspended<'_, H> {
        if self.depth == 0 {
            debug!("Suspending full-screen UI");
            if let Err(e) = self.host.leave() {
                warn!("Failed to leave full-screen mode: {}", e);
            }
        }
        self.depth += 1;
        Suspended { foreground: self }
    }
}

/// Scoped suspension. Derefs to [`Foreground`] so it can nest.
pub struct Suspended<'a, H: ScreenMode> {
    foreground: &'a mut Foreground<H>,
}

impl<H: ScreenMode> Deref for Suspended<'_, H> {
    type Target = Foreground<H>;

    fn deref(&self) -> &Self::Target {
        self.foreground
    }
}

impl<H: ScreenMode> DerefMut for Suspended<'_, H> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.foreground
    }
}

impl<H: ScreenMode> Drop for Suspended<'_, H> {
    fn drop(&mut self) {
        let fg = &mut *self.foreground;
        fg.depth = fg.depth.saturating_sub(1);
        if fg.depth == 0 {
            debug!("Resuming full-screen UI");
            if let Err(e) = fg.host.enter() {
                warn!("Failed to resume full-screen mode: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedHost;

    #[test]
    fn test_suspend_and_resume_once() {
        let mut fg = Foreground::new(ScriptedHost::default());
        {
            let screen = fg.suspend();
            assert!(screen.is_suspended());
        }
        assert!(!fg.is_suspended());
        assert_eq!(fg.host().events, vec!["leave", "enter"]);
    }

    #[test]
    fn test_nested_suspension_switches_terminal_once() {
        let mut fg = Foreground::new(ScriptedHost::default());
        {
            let mut outer = fg.suspend();
            {
                let inner = outer.suspend();
                assert_eq!(inner.depth(), 2);
            }
            assert_eq!(outer.depth(), 1);
            assert_eq!(outer.host().events, vec!["leave"]);
        }
        assert_eq!(fg.depth(), 0);
        assert_eq!(fg.host().events, vec!["leave", "enter"]);
    }

    fn failing_action(fg: &mut Foreground<ScriptedHost>) -> io::Result<()> {
        let _screen = fg.suspend();
        Err(io::Error::other("action failed"))
    }

    #[test]
    fn test_resumes_when_action_errors() {
        let mut fg = Foreground::new(ScriptedHost::default());
        assert!(failing_action(&mut fg).is_err());
        assert_eq!(fg.host().events, vec!["leave", "enter"]);
    }

    #[test]
    fn test_resumes_when_action_panics() {
        let mut fg = Foreground::new(ScriptedHost::default());
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _screen = fg.suspend();
            panic!("handler blew up");
        }));
        assert!(result.is_err());
        assert_eq!(fg.depth(), 0);
        assert_eq!(fg.host().events, vec!["leave", "enter"]);
    }

    #[test]
    fn test_failed_leave_still_counts_and_resumes() {
        let mut host = ScriptedHost::default();
        host.fail_leave = true;
        let mut fg = Foreground::new(host);
        drop(fg.suspend());
        assert_eq!(fg.host().events, vec!["leave", "enter"]);
        assert_eq!(fg.depth(), 0);
    }
}
