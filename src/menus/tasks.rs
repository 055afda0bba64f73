//! A task runner menu read from a JSON file on every refresh.
//!
//! ```json
//! {"tasks": [
//!   {"name": "build", "description": "Build it", "action": "command::make"},
//!   {"name": "report", "description": "Report", "action": "internal::echo",
//!    "prompt_args": [{"name": "message", "prompt": "Report name"}]}
//! ]}
//! ```

use std::fs;
use std::path::PathBuf;

use log::warn;
use serde::Deserialize;
use serde_json::Value;

use crate::core::item::{ArgumentSpec, Bindings, MenuItem};
use crate::core::menu::MenuSource;
use crate::menus::loader::apply_action;

pub const EXIT_DESCRIPTION: &str = "[Exit Task Runner]";

#[derive(Debug, Default, Deserialize)]
struct TaskFile {
    #[serde(default)]
    tasks: Vec<Task>,
}

#[derive(Debug, Deserialize)]
struct Task {
    name: Option<String>,
    description: Option<String>,
    action: Option<Value>,
    #[serde(default)]
    args: Bindings,
    #[serde(default)]
    prompt_args: Vec<ArgumentSpec>,
}

#[derive(Debug, Clone)]
pub struct TaskFileMenu {
    title: String,
    path: PathBuf,
}

impl TaskFileMenu {
    pub fn new(title: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
        }
    }

    fn task_items(&self) -> Vec<(String, MenuItem)> {
        let file = self.path.display();
        if !self.path.exists() {
            return vec![error_item(format!("ERROR: {file} not found."))];
        }

        let parsed = fs::read_to_string(&self.path)
            .map_err(|e| e.to_string())
            .and_then(|raw| serde_json::from_str::<TaskFile>(&raw).map_err(|e| e.to_string()));
        let tasks = match parsed {
            Ok(task_file) => task_file.tasks,
            Err(e) => {
                warn!("Could not parse {}: {}", file, e);
                return vec![error_item(format!("ERROR: Could not parse {file}: {e}"))];
            }
        };

        tasks
            .into_iter()
            .enumerate()
            .map(|(i, task)| {
                let key = format!("task_{i}_{}", task.name.as_deref().unwrap_or("unnamed"));
                let mut item = MenuItem::new(
                    task.description
                        .unwrap_or_else(|| "No description".to_string()),
                );
                item.preset_args = task.args;
                for spec in task.prompt_args {
                    item = item.with_prompt(spec);
                }
                if let Some(action) = &task.action {
                    item = apply_action(item, action);
                }
                (key, item)
            })
            .collect()
    }
}

impl MenuSource for TaskFileMenu {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn items(&self) -> Vec<(String, MenuItem)> {
        let mut items = self.task_items();
        items.push(("quit".to_string(), MenuItem::quit(EXIT_DESCRIPTION)));
        items
    }
}

fn error_item(description: String) -> (String, MenuItem) {
    ("error".to_string(), MenuItem::new(description))
}
