//! # Argument Binding
//!
//! Merges an item's preset arguments with the ones prompted for at
//! selection time. Prompts run strictly in authored order; a prompted value
//! replaces a preset of the same name.

use std::io;

use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use thiserror::Error;

use crate::core::item::{ArgumentSpec, Bindings};

#[derive(Debug, Error)]
pub enum BindError {
    #[error("No value bound for placeholder '{{{0}}}'.")]
    UnresolvedPlaceholder(String),
    #[error("Unbalanced brace in template '{0}'.")]
    UnbalancedBrace(String),
    #[error("Prompt for '{name}' failed: {source}")]
    Prompt {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Line-oriented user interaction in plain terminal mode.
#[async_trait]
pub trait Prompter: Send {
    /// Asks for one line of text with `default` pre-filled and editable.
    async fn prompt(&mut self, message: &str, default: &str) -> io::Result<String>;

    /// Waits for the user to acknowledge `message`.
    async fn pause(&mut self, message: &str) -> io::Result<()>;
}

/// The final argument mapping for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub args: Bindings,
    /// Whether any prompt was shown.
    pub prompted: bool,
}

pub async fn bind(
    preset: &Bindings,
    specs: &[ArgumentSpec],
    prompter: &mut dyn Prompter,
) -> Result<Binding, BindError> {
    let mut args = preset.clone();

    for spec in specs {
        let message = format!("{}: ", spec.prompt);
        let answer = prompter
            .prompt(&message, &spec.default_text())
            .await
            .map_err(|source| BindError::Prompt {
                name: spec.name.clone(),
                source,
            })?;
        debug!("Bound prompted argument '{}'", spec.name);
        args.insert(spec.name.clone(), Value::String(answer));
    }

    Ok(Binding {
        args,
        prompted: !specs.is_empty(),
    })
}
