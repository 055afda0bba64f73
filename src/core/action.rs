//! # Action Identifiers
//!
//! Symbolic actions are two-part strings, `type::value`:
//!
//! ```text
//! internal::greet              → registered handler "greet"
//! command::mkdir {dir_name}    → shell command line, templated
//! script::./deploy.sh          → script path, interpreter picked by extension
//! ```
//!
//! The type is case-insensitive. Anything else is rejected here, at
//! resolution time, never when the menu is authored.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::core::binder::BindError;
use crate::core::item::{Bindings, value_text};

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Invalid action format '{0}'. Expected 'type::value'.")]
    Malformed(String),
    #[error("Invalid action format. Expected a string, got {0}.")]
    NotAnIdentifier(String),
    #[error("Unknown action type '{0}'.")]
    UnknownType(String),
    #[error("Internal action '{0}' is not registered.")]
    UnknownInternal(String),
    #[error(transparent)]
    Bind(#[from] BindError),
    #[error("{0}")]
    Handler(String),
    #[error("Action panicked: {0}")]
    Panicked(String),
    #[error("Failed to start process: {0}")]
    Spawn(#[source] std::io::Error),
}

impl ActionError {
    pub fn handler(message: impl Into<String>) -> Self {
        ActionError::Handler(message.into())
    }

    /// True when the action never started. Such selections do not navigate.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            ActionError::Malformed(_)
                | ActionError::NotAnIdentifier(_)
                | ActionError::UnknownType(_)
                | ActionError::UnknownInternal(_)
                | ActionError::Bind(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Internal,
    Command,
    Script,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Internal => "internal",
            ActionKind::Command => "command",
            ActionKind::Script => "script",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed `type::value` identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionId {
    pub kind: ActionKind,
    pub value: String,
}

impl FromStr for ActionId {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, value) = s
            .split_once("::")
            .ok_or_else(|| ActionError::Malformed(s.to_string()))?;
        let kind = match kind.trim().to_lowercase().as_str() {
            "internal" => ActionKind::Internal,
            "command" => ActionKind::Command,
            "script" => ActionKind::Script,
            other => return Err(ActionError::UnknownType(other.to_string())),
        };
        Ok(ActionId {
            kind,
            value: value.trim().to_string(),
        })
    }
}

/// Replaces `{name}` placeholders from `args`. `{{` and `}}` are literal braces.
pub fn render_template(template: &str, args: &Bindings) -> Result<String, BindError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') | None => {
                            return Err(BindError::UnbalancedBrace(template.to_string()));
                        }
                        Some(ch) => name.push(ch),
                    }
                }
                let value = args
                    .get(&name)
                    .ok_or_else(|| BindError::UnresolvedPlaceholder(name.clone()))?;
                out.push_str(&value_text(value));
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => return Err(BindError::UnbalancedBrace(template.to_string())),
            other => out.push(other),
        }
    }
    Ok(out)
}

/// Builds the command line that runs the script at `path`, choosing an
/// interpreter from the file extension. Unknown extensions run the file
/// directly.
pub fn script_command(path: &str) -> String {
    let quoted = quote_arg(path);
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("sh") => format!("sh {quoted}"),
        Some("bash") => format!("bash {quoted}"),
        Some("zsh") => format!("zsh {quoted}"),
        Some("fish") => format!("fish {quoted}"),
        Some("rs") => format!("rust-script {quoted}"),
        Some("py") => format!("python3 {quoted}"),
        Some("ps1") => format!("powershell -NoProfile -ExecutionPolicy Bypass -File {quoted}"),
        Some("bat") | Some("cmd") => format!("cmd /C {quoted}"),
        Some("vbs") | Some("js") | Some("wsf") => format!("cscript //nologo {quoted}"),
        _ => quoted,
    }
}

/// Quotes a single shell word when it contains anything beyond a safe set.
pub fn quote_arg(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./:~+=,@%\\".contains(c));
    if safe {
        return arg.to_string();
    }
    if cfg!(windows) {
        format!("\"{}\"", arg.replace('"', "\"\""))
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(pairs: &[(&str, serde_json::Value)]) -> Bindings {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_parse_is_case_insensitive_and_trims() {
        let id: ActionId = " Command :: echo hi ".parse().unwrap();
        assert_eq!(id.kind, ActionKind::Command);
        assert_eq!(id.value, "echo hi");

        let id: ActionId = "INTERNAL::greet".parse().unwrap();
        assert_eq!(id.kind, ActionKind::Internal);
    }

    #[test]
    fn test_parse_keeps_later_separators_in_value() {
        let id: ActionId = "command::echo a::b".parse().unwrap();
        assert_eq!(id.value, "echo a::b");
    }

    #[test]
    fn test_parse_rejects_missing_separator() {
        let err = "echo hello".parse::<ActionId>().unwrap_err();
        assert!(matches!(err, ActionError::Malformed(ref s) if s == "echo hello"));
        assert!(err.is_resolution());
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        let err = "python::print(1)".parse::<ActionId>().unwrap_err();
        assert!(matches!(err, ActionError::UnknownType(ref t) if t == "python"));
        assert_eq!(err.to_string(), "Unknown action type 'python'.");
    }

    #[test]
    fn test_render_template_substitutes() {
        let rendered =
            render_template("mkdir {dir_name}", &args(&[("dir_name", json!("MyNewFolder"))]))
                .unwrap();
        assert_eq!(rendered, "mkdir MyNewFolder");
    }

    #[test]
    fn test_render_template_non_string_values_and_escapes() {
        let rendered = render_template(
            "echo {{literal}} {count} {flag}",
            &args(&[("count", json!(3)), ("flag", json!(false))]),
        )
        .unwrap();
        assert_eq!(rendered, "echo {literal} 3 false");
    }

    #[test]
    fn test_render_template_unresolved_placeholder() {
        let err = render_template("echo {missing}", &Bindings::new()).unwrap_err();
        assert!(matches!(err, BindError::UnresolvedPlaceholder(ref n) if n == "missing"));
    }

    #[test]
    fn test_render_template_unbalanced() {
        assert!(matches!(
            render_template("echo {oops", &Bindings::new()),
            Err(BindError::UnbalancedBrace(_))
        ));
        assert!(matches!(
            render_template("echo oops}", &Bindings::new()),
            Err(BindError::UnbalancedBrace(_))
        ));
    }

    #[test]
    fn test_script_command_by_extension() {
        assert_eq!(script_command("./deploy.sh"), "sh ./deploy.sh");
        assert_eq!(script_command("tools/report.PY"), "python3 tools/report.PY");
        assert_eq!(script_command("build.rs"), "rust-script build.rs");
        assert_eq!(script_command("run.bat"), "cmd /C run.bat");
        assert_eq!(script_command("./bin/tool"), "./bin/tool");
    }

    #[cfg(unix)]
    #[test]
    fn test_script_command_quotes_paths_with_spaces() {
        assert_eq!(script_command("my scripts/go.sh"), "sh 'my scripts/go.sh'");
        assert_eq!(quote_arg("it's"), r"'it'\''s'");
    }
}
