//! # Core Engine
//!
//! Menu state, navigation and action dispatch. Knows nothing about any
//! specific terminal library; the `tui` module plugs in through the
//! [`suspension::ScreenMode`], [`binder::Prompter`] and
//! [`console::Console`] seams.
//!
//! ```text
//!                    ┌─────────────────────────────┐
//!                    │            CORE             │
//!                    │                             │
//!                    │  App (state)                │
//!                    │   ├── MenuModel stack       │
//!                    │   ├── ActionRegistry        │
//!                    │   └── MenuRegistry          │
//!                    │  bind → resolve → run       │
//!                    │                             │
//!                    └──────────────┬──────────────┘
//!                                   │
//!            ┌──────────────────────┼──────────────────────┐
//!            ▼                      ▼                      ▼
//!     ┌────────────┐         ┌────────────┐         ┌────────────┐
//!     │    TUI     │         │   menus    │         │   tests    │
//!     │ (ratatui)  │         │ (sources)  │         │  (fakes)   │
//!     └────────────┘         └────────────┘         └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`item`]: `MenuItem`, `ArgumentSpec`, `ActionRef`
//! - [`menu`]: `MenuSource` and the `MenuModel` cursor/scroll state
//! - [`registry`]: action and menu registries, handler adapters
//! - [`action`]: `type::value` identifiers and template substitution
//! - [`binder`]: preset + prompted argument binding
//! - [`exec`]: shell command execution
//! - [`resolver`]: identifier → runnable action
//! - [`suspension`]: full-screen ↔ plain terminal handoff
//! - [`interrupt`]: Ctrl+C queued while an action runs
//! - [`state`]: the `App` navigation controller
//! - [`config`]: TOML configuration

pub mod action;
pub mod binder;
pub mod config;
pub mod console;
pub mod exec;
pub mod interrupt;
pub mod item;
pub mod menu;
pub mod registry;
pub mod resolver;
pub mod state;
pub mod suspension;
