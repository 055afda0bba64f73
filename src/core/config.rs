//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.termenu/config.toml`. If missing on first run, a
//! starter file with a working main menu is generated so users can
//! discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::exec::default_shell;
use crate::core::item::{ArgumentSpec, Bindings};
use crate::core::menu::DEFAULT_PAGE_SIZE;
use crate::core::registry::MAIN_MENU;
use crate::core::state::DEFAULT_PAUSE_MESSAGE;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TermenuConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub style: BTreeMap<String, String>,
    #[serde(default)]
    pub menus: BTreeMap<String, MenuConfig>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub title: Option<String>,
    pub page_size: Option<usize>,
    pub shell: Option<String>,
    pub pause_message: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuKind {
    #[default]
    Static,
    /// Filesystem explorer rooted at `path`.
    Directory,
    /// Task list read from the JSON file at `path`.
    Tasks,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MenuConfig {
    pub doc: Option<String>,
    #[serde(default)]
    pub kind: MenuKind,
    pub path: Option<String>,
    #[serde(default)]
    pub items: Vec<ItemConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItemConfig {
    pub key: String,
    pub description: String,
    /// A `type::value` string or a `{type, value, args, prompt_args}`
    /// table. Anything else is kept and rejected when selected.
    pub action: Option<serde_json::Value>,
    pub target_menu: Option<String>,
    #[serde(default)]
    pub is_quit: bool,
    pub pause: Option<bool>,
    #[serde(default)]
    pub args: Bindings,
    #[serde(default)]
    pub prompt_args: Vec<ArgumentSpec>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_TITLE: &str = "termenu";
pub const DEFAULT_LOG_LEVEL: &str = "debug";

pub const DEFAULT_STYLES: [(&str, &str); 3] = [
    ("title", "bold underline"),
    ("selected", "bg:#0055aa fg:#ffffff bold"),
    ("menu-item", ""),
];

const DEFAULT_CONFIG: &str = r#"# termenu configuration
# Override hierarchy: defaults → this file → env vars → CLI flags.

[general]
title = "termenu"
# page_size = 10                     # Or set TERMENU_PAGE_SIZE
# shell = "sh"                       # Or set TERMENU_SHELL
# pause_message = "Press Enter to continue..."
# log_level = "debug"                # "error", "warn", "info", "debug", "trace", "off"

[style]
# title = "bold underline"
# selected = "bg:#0055aa fg:#ffffff bold"
# menu-item = ""

[menus.main]
doc = "Main Menu"

[[menus.main.items]]
key = "hello"
description = "Say hello"
action = "command::echo Hello from termenu"

[[menus.main.items]]
key = "echo"
description = "Echo a message"
action = { type = "internal", value = "echo", prompt_args = [{ name = "message", prompt = "Message", default = "Hello!" }] }

[[menus.main.items]]
key = "files"
description = "Browse files"
target_menu = "files"

[[menus.main.items]]
key = "quit"
description = "Exit"
is_quit = true

[menus.files]
doc = "File Explorer"
kind = "directory"
path = "."

# [menus.tasks]
# doc = "Task Runner"
# kind = "tasks"
# path = "tasks.json"
"#;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub title: String,
    pub page_size: usize,
    pub shell: String,
    pub pause_message: String,
    pub log_level: String,
    /// Defaults merged with `[style]`.
    pub style: BTreeMap<String, String>,
    pub menus: BTreeMap<String, MenuConfig>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.termenu/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".termenu").join("config.toml"))
}

pub fn parse_config(contents: &str) -> Result<TermenuConfig, ConfigError> {
    Ok(toml::from_str(contents)?)
}

/// Load config from `explicit`, or from `~/.termenu/config.toml`.
///
/// An explicit path must exist. A missing default file is generated and
/// its contents used. A malformed file is `ConfigError::Parse`.
pub fn load_config(explicit: Option<&Path>) -> Result<TermenuConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_from(path);
    }

    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using built-in config");
            return parse_config(DEFAULT_CONFIG);
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return parse_config(DEFAULT_CONFIG);
    }

    load_from(&path)
}

fn load_from(path: &Path) -> Result<TermenuConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config = parse_config(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Writes the starter config at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(
    config: &TermenuConfig,
    cli_page_size: Option<usize>,
) -> Result<ResolvedConfig, ConfigError> {
    resolve_with(config, cli_page_size, |key| std::env::var(key).ok())
}

/// [`resolve`] with an explicit environment lookup.
pub fn resolve_with(
    config: &TermenuConfig,
    cli_page_size: Option<usize>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig, ConfigError> {
    // Page size: CLI → env → config → default
    let env_page_size = env("TERMENU_PAGE_SIZE").and_then(|raw| match raw.trim().parse() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!("Ignoring TERMENU_PAGE_SIZE={:?}: not a number", raw);
            None
        }
    });
    let page_size = cli_page_size
        .or(env_page_size)
        .or(config.general.page_size)
        .unwrap_or(DEFAULT_PAGE_SIZE);
    if page_size == 0 {
        return Err(ConfigError::Invalid("page_size must be at least 1".into()));
    }

    // Shell: env → config → platform default
    let shell = env("TERMENU_SHELL")
        .or_else(|| config.general.shell.clone())
        .unwrap_or_else(|| default_shell().to_string());

    if !config.menus.contains_key(MAIN_MENU) {
        return Err(ConfigError::Invalid(format!(
            "no [menus.{MAIN_MENU}] defined"
        )));
    }

    let mut style: BTreeMap<String, String> = DEFAULT_STYLES
        .iter()
        .map(|(class, value)| (class.to_string(), value.to_string()))
        .collect();
    style.extend(config.style.clone());

    Ok(ResolvedConfig {
        title: config
            .general
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        page_size,
        shell,
        pause_message: config
            .general
            .pause_message
            .clone()
            .unwrap_or_else(|| DEFAULT_PAUSE_MESSAGE.to_string()),
        log_level: config
            .general
            .log_level
            .clone()
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        style,
        menus: config.menus.clone(),
    })
}
