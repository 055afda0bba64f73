//! Maps style classes to ratatui styles.
//!
//! Style strings are space-separated tokens:
//!
//! ```text
//! "bg:#0055aa fg:#ffffff bold"   colors by hex or name, plus attributes
//! "bold underline"
//! ""                             no styling
//! ```

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use log::warn;
use ratatui::style::{Color, Modifier, Style};

use crate::core::config::DEFAULT_STYLES;
use crate::core::menu::StyleClass;

#[derive(Debug, Clone)]
pub struct Theme {
    styles: HashMap<String, Style>,
}

impl Default for Theme {
    fn default() -> Self {
        let defaults: BTreeMap<String, String> = DEFAULT_STYLES
            .iter()
            .map(|(class, value)| (class.to_string(), value.to_string()))
            .collect();
        Self::from_map(&defaults)
    }
}

impl Theme {
    pub fn from_map(styles: &BTreeMap<String, String>) -> Self {
        Self {
            styles: styles
                .iter()
                .map(|(class, value)| (class.clone(), parse_style(value)))
                .collect(),
        }
    }

    pub fn style(&self, class: StyleClass) -> Style {
        self.style_named(class.as_str())
    }

    /// Unknown classes get no styling.
    pub fn style_named(&self, class: &str) -> Style {
        self.styles.get(class).copied().unwrap_or_default()
    }
}

pub fn parse_style(spec: &str) -> Style {
    spec.split_whitespace()
        .fold(Style::default(), |style, token| apply_token(style, token))
}

fn apply_token(style: Style, token: &str) -> Style {
    if let Some(color) = token.strip_prefix("bg:") {
        return match parse_color(color) {
            Some(c) => style.bg(c),
            None => style,
        };
    }
    if let Some(color) = token.strip_prefix("fg:") {
        return match parse_color(color) {
            Some(c) => style.fg(c),
            None => style,
        };
    }
    let modifier = match token.to_ascii_lowercase().as_str() {
        "bold" => Modifier::BOLD,
        "italic" => Modifier::ITALIC,
        "underline" => Modifier::UNDERLINED,
        "reverse" => Modifier::REVERSED,
        "dim" => Modifier::DIM,
        "blink" => Modifier::SLOW_BLINK,
        "hidden" => Modifier::HIDDEN,
        "strike" => Modifier::CROSSED_OUT,
        "noinherit" => return style,
        _ => {
            // a bare color is a foreground
            return match Color::from_str(token) {
                Ok(c) => style.fg(c),
                Err(_) => {
                    warn!("Ignoring unknown style token '{}'", token);
                    style
                }
            };
        }
    };
    style.add_modifier(modifier)
}

fn parse_color(value: &str) -> Option<Color> {
    match Color::from_str(value) {
        Ok(color) => Some(color),
        Err(_) => {
            warn!("Ignoring unknown color '{}'", value);
            None
        }
    }
}
