//! Internal actions every configured app gets.
//!
//! | Name        | Args                                   | Effect                          |
//! |-------------|----------------------------------------|---------------------------------|
//! | `echo`      | `message`                              | prints the message              |
//! | `sleep`     | `seconds` (default 1)                  | waits without blocking          |
//! | `save_args` | `dir`, `project_name` / `name`, any    | writes the binding as JSON      |

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use log::info;
use serde_json::Value;

use crate::core::action::ActionError;
use crate::core::item::{Bindings, value_text};
use crate::core::registry::{ActionContext, ActionHandler, Component, async_handler, sync_handler};

pub struct Builtins;

impl Component for Builtins {
    fn actions(&self) -> Vec<(String, Arc<dyn ActionHandler>)> {
        vec![
            ("echo".to_string(), sync_handler(echo)),
            ("sleep".to_string(), async_handler(sleep)),
            ("save_args".to_string(), sync_handler(save_args)),
        ]
    }
}

fn echo(ctx: &ActionContext, args: &Bindings) -> Result<(), ActionError> {
    let message = args.get("message").map(value_text).unwrap_or_default();
    ctx.println(message);
    Ok(())
}

async fn sleep(ctx: ActionContext, args: Bindings) -> Result<(), ActionError> {
    let seconds = match args.get("seconds") {
        None => 1.0,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(1.0),
        Some(other) => value_text(other)
            .trim()
            .parse::<f64>()
            .map_err(|_| ActionError::handler(format!("Invalid seconds: {other}")))?,
    };
    let duration = Duration::try_from_secs_f64(seconds)
        .map_err(|_| ActionError::handler(format!("Invalid seconds: {seconds}")))?;
    tokio::time::sleep(duration).await;
    ctx.println(format!("Slept for {seconds}s"));
    Ok(())
}

fn save_args(ctx: &ActionContext, args: &Bindings) -> Result<(), ActionError> {
    let stem = ["project_name", "name"]
        .iter()
        .filter_map(|key| args.get(*key).map(value_text))
        .find(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "args".to_string());
    let dir = args
        .get("dir")
        .map(value_text)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| ".".to_string());
    let path = PathBuf::from(dir).join(format!("{stem}.json"));

    ctx.println(format!("Creating project file: {}", path.display()));
    let json = serde_json::to_string_pretty(args)
        .map_err(|e| ActionError::handler(format!("Error creating file: {e}")))?;
    std::fs::write(&path, json)
        .map_err(|e| ActionError::handler(format!("Error creating file: {e}")))?;
    info!("Saved {} arguments to {}", args.len(), path.display());
    ctx.println(format!("Successfully created '{}'!", path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_context;
    use serde_json::json;

    fn bindings(value: Value) -> Bindings {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_echo_prints_message() {
        let (ctx, console) = test_context();
        echo(&ctx, &bindings(json!({"message": "hi there"}))).unwrap();
        assert_eq!(console.lines(), vec!["hi there"]);
    }

    #[tokio::test]
    async fn test_sleep_accepts_prompted_text() {
        let (ctx, console) = test_context();
        sleep(ctx, bindings(json!({"seconds": "0.01"}))).await.unwrap();
        assert_eq!(console.lines(), vec!["Slept for 0.01s"]);
    }

    #[tokio::test]
    async fn test_sleep_rejects_garbage() {
        let (ctx, _) = test_context();
        let err = sleep(ctx, bindings(json!({"seconds": "soon"}))).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid seconds: \"soon\"");
    }

    #[tokio::test]
    async fn test_sleep_rejects_out_of_range_durations() {
        for seconds in [json!("1e20"), json!(-1), json!("NaN")] {
            let (ctx, console) = test_context();
            let err = sleep(ctx, bindings(json!({ "seconds": seconds }))).await.unwrap_err();
            assert!(matches!(err, ActionError::Handler(_)), "{seconds}: {err}");
            assert!(err.to_string().starts_with("Invalid seconds: "));
            assert!(console.lines().is_empty());
        }
    }

    #[test]
    fn test_save_args_writes_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let args = bindings(json!({
            "dir": dir.path().to_string_lossy(),
            "project_name": "demo",
            "version": "0.1.0",
        }));
        let (ctx, console) = test_context();
        save_args(&ctx, &args).unwrap();

        let written = std::fs::read_to_string(dir.path().join("demo.json")).unwrap();
        let parsed: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["version"], json!("0.1.0"));
        assert!(written.contains("\n  "));
        assert!(console.lines().last().unwrap().starts_with("Successfully created"));
    }

    #[test]
    fn test_save_args_reports_unwritable_dir() {
        let dir = tempfile::tempdir().unwrap();
        let args = bindings(json!({"dir": dir.path().join("nope").to_string_lossy()}));
        let (ctx, _) = test_context();
        let err = save_args(&ctx, &args).unwrap_err();
        assert!(err.to_string().starts_with("Error creating file: "));
    }

    #[test]
    fn test_component_exposes_all_builtins() {
        let names: Vec<String> = Builtins.actions().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["echo", "sleep", "save_args"]);
        assert!(Builtins.menus().is_empty());
    }
}
