//! termenu library exports

pub mod core;
pub mod menus;
pub mod tui;

#[cfg(test)]
pub mod test_support;

pub use crate::core::state::{App, AppState, NavKey, Redraw, Settings};
