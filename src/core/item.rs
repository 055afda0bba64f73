//! # Menu Items
//!
//! Immutable descriptors for one selectable entry, plus the argument
//! specifications an item collects when it is selected.
//!
//! ```text
//! MenuItem
//! ├── description: String          // display text
//! ├── action: Option<ActionRef>    // Direct(handler) | Symbolic("type::value")
//! ├── target_menu: Option<String>  // menu pushed after the action
//! ├── is_quit: bool                // pops the stack, wins over everything else
//! ├── pause: bool                  // show the "press enter" cue after the action
//! ├── preset_args: Bindings        // fixed at authoring time
//! └── prompt_specs: Vec<ArgumentSpec>
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::registry::ActionHandler;

/// Argument mapping handed to an action invocation.
pub type Bindings = serde_json::Map<String, Value>;

/// One interactively prompted argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentSpec {
    pub name: String,
    pub prompt: String,
    #[serde(default)]
    pub default: Option<Value>,
}

impl ArgumentSpec {
    pub fn new(name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prompt: prompt.into(),
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// The default as editable text (empty when unset).
    pub fn default_text(&self) -> String {
        self.default.as_ref().map(value_text).unwrap_or_default()
    }
}

/// What selecting an item runs.
#[derive(Clone)]
pub enum ActionRef {
    /// A handler bound directly in code.
    Direct(Arc<dyn ActionHandler>),
    /// An identifier of the form `type::value`, resolved at selection time.
    Symbolic(String),
    /// An authored action that was not an identifier at all. Carries the
    /// kind of value that was found (e.g. `"array"`).
    Malformed(String),
}

impl fmt::Debug for ActionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionRef::Direct(_) => write!(f, "Direct(<handler>)"),
            ActionRef::Symbolic(id) => f.debug_tuple("Symbolic").field(id).finish(),
            ActionRef::Malformed(kind) => f.debug_tuple("Malformed").field(kind).finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MenuItem {
    pub description: String,
    pub action: Option<ActionRef>,
    pub target_menu: Option<String>,
    pub is_quit: bool,
    pub pause: bool,
    pub preset_args: Bindings,
    pub prompt_specs: Vec<ArgumentSpec>,
}

impl MenuItem {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            action: None,
            target_menu: None,
            is_quit: false,
            pause: true,
            preset_args: Bindings::new(),
            prompt_specs: Vec::new(),
        }
    }

    /// A "back" / "exit" entry.
    pub fn quit(description: impl Into<String>) -> Self {
        Self {
            is_quit: true,
            ..Self::new(description)
        }
    }

    pub fn with_action(mut self, identifier: impl Into<String>) -> Self {
        self.action = Some(ActionRef::Symbolic(identifier.into()));
        self
    }

    pub fn with_handler(mut self, handler: Arc<dyn ActionHandler>) -> Self {
        self.action = Some(ActionRef::Direct(handler));
        self
    }

    pub fn with_target(mut self, menu: impl Into<String>) -> Self {
        self.target_menu = Some(menu.into());
        self
    }

    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.preset_args.insert(name.into(), value.into());
        self
    }

    /// Adds a prompted argument. A spec reusing an existing name replaces
    /// it in place, so names stay unique and display order is kept.
    pub fn with_prompt(mut self, spec: ArgumentSpec) -> Self {
        match self.prompt_specs.iter_mut().find(|s| s.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.prompt_specs.push(spec),
        }
        self
    }

    /// Skip the confirmation cue after this item's action.
    pub fn without_pause(mut self) -> Self {
        self.pause = false;
        self
    }
}

/// Renders an argument value the way it is shown to users and substituted
/// into command templates: strings verbatim, null as empty, everything else
/// in its JSON form.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Human name of a JSON value's kind, used in error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
