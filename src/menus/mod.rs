//! # Menu Sources
//!
//! Everything that produces menu items beyond a hand-built
//! [`StaticMenu`](crate::core::menu::StaticMenu): TOML-declared menus, a
//! filesystem explorer, a JSON task runner, and the built-in actions they
//! can call.

pub mod builtin;
pub mod directory;
pub mod loader;
pub mod tasks;

pub use builtin::Builtins;
pub use directory::DirectoryMenu;
pub use loader::build_app;
pub use tasks::TaskFileMenu;
