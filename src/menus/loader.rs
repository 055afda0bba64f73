//! Builds menus and a ready-to-run [`App`] from resolved configuration.

use std::path::PathBuf;
use std::sync::Arc;

use log::{info, warn};
use serde_json::Value;

use crate::core::config::{ConfigError, ItemConfig, MenuConfig, MenuKind, ResolvedConfig};
use crate::core::exec::ShellRunner;
use crate::core::item::{ActionRef, ArgumentSpec, MenuItem, value_kind, value_text};
use crate::core::menu::{MenuSource, StaticMenu};
use crate::core::registry::{MAIN_MENU, MenuFactory, menu_factory};
use crate::core::state::{App, Settings};
use crate::menus::builtin::Builtins;
use crate::menus::directory::DirectoryMenu;
use crate::menus::tasks::TaskFileMenu;

pub const DEFAULT_TASKS_FILE: &str = "tasks.json";

/// Attaches an authored action to `item`.
///
/// A string is an identifier. A table `{type, value, args, prompt_args}`
/// becomes `type::value` with its args and prompts merged into the item.
/// Anything else is kept as a malformed action and rejected on selection.
pub fn apply_action(mut item: MenuItem, action: &Value) -> MenuItem {
    match action {
        Value::String(identifier) => {
            item.action = Some(ActionRef::Symbolic(identifier.clone()));
        }
        Value::Object(table) if table.contains_key("type") => {
            let kind = table.get("type").map(value_text).unwrap_or_default();
            let value = table.get("value").map(value_text).unwrap_or_default();
            item.action = Some(ActionRef::Symbolic(format!("{kind}::{value}")));

            if let Some(Value::Object(args)) = table.get("args") {
                for (name, arg) in args {
                    item.preset_args.insert(name.clone(), arg.clone());
                }
            }
            if let Some(prompts) = table.get("prompt_args") {
                match serde_json::from_value::<Vec<ArgumentSpec>>(prompts.clone()) {
                    Ok(specs) => {
                        for spec in specs {
                            item = item.with_prompt(spec);
                        }
                    }
                    Err(e) => warn!("Ignoring malformed prompt_args on '{}': {}", item.description, e),
                }
            }
        }
        other => {
            item.action = Some(ActionRef::Malformed(value_kind(other).to_string()));
        }
    }
    item
}

pub fn item_from_config(config: &ItemConfig) -> MenuItem {
    let mut item = MenuItem::new(&config.description);
    item.is_quit = config.is_quit;
    item.target_menu = config.target_menu.clone();
    item.pause = config.pause.unwrap_or(true);
    item.preset_args = config.args.clone();
    for spec in &config.prompt_args {
        item = item.with_prompt(spec.clone());
    }
    if let Some(action) = &config.action {
        item = apply_action(item, action);
    }
    if item.is_quit && (item.action.is_some() || item.target_menu.is_some()) {
        warn!(
            "Item '{}' is a quit item; its action and target are ignored",
            config.key
        );
    }
    item
}

pub fn static_menu(name: &str, config: &MenuConfig) -> StaticMenu {
    let title = config.doc.clone().unwrap_or_else(|| name.to_string());
    config
        .items
        .iter()
        .fold(StaticMenu::new(title), |menu, item| {
            menu.item(&item.key, item_from_config(item))
        })
}

/// The factory for one `[menus.<name>]` entry.
pub fn menu_factory_for(name: &str, config: &MenuConfig) -> MenuFactory {
    let title = config.doc.clone().unwrap_or_else(|| name.to_string());
    match config.kind {
        MenuKind::Static => menu_factory(static_menu(name, config)),
        MenuKind::Directory => {
            let root = PathBuf::from(config.path.as_deref().unwrap_or("."));
            Arc::new(move || Box::new(DirectoryMenu::new(&title, &root)) as Box<dyn MenuSource>)
        }
        MenuKind::Tasks => {
            let path = PathBuf::from(config.path.as_deref().unwrap_or(DEFAULT_TASKS_FILE));
            menu_factory(TaskFileMenu::new(title, path))
        }
    }
}

/// Builds the app described by `config`, with the built-in actions
/// registered and every configured menu available by name.
pub fn build_app(config: &ResolvedConfig) -> Result<App, ConfigError> {
    let main = config
        .menus
        .get(MAIN_MENU)
        .ok_or_else(|| ConfigError::Invalid(format!("no [menus.{MAIN_MENU}] defined")))?;

    let mut app = App::new(menu_factory_for(MAIN_MENU, main))
        .with_settings(Settings {
            title: config.title.clone(),
            page_size: config.page_size,
            pause_message: config.pause_message.clone(),
        })
        .with_runner(Arc::new(ShellRunner::new(&config.shell)));

    app.register_component(&Builtins)
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;

    for (name, menu) in config.menus.iter().filter(|(name, _)| name.as_str() != MAIN_MENU) {
        app.register_menu(name, menu_factory_for(name, menu))
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
    }

    for (name, menu) in &config.menus {
        for item in &menu.items {
            if let Some(target) = &item.target_menu
                && !config.menus.contains_key(target)
            {
                warn!(
                    "Menu '{}' item '{}' targets unknown menu '{}'",
                    name, item.key, target
                );
            }
        }
    }

    info!("Built app '{}' with {} menus", config.title, config.menus.len());
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{parse_config, resolve_with};
    use crate::core::menu::MenuModel;
    use serde_json::json;

    fn item_config(action: Option<Value>) -> ItemConfig {
        ItemConfig {
            key: "k".into(),
            description: "Item".into(),
            action,
            target_menu: None,
            is_quit: false,
            pause: None,
            args: Default::default(),
            prompt_args: Vec::new(),
        }
    }

    fn symbolic(item: &MenuItem) -> Option<&str> {
        match &item.action {
            Some(ActionRef::Symbolic(id)) => Some(id),
            _ => None,
        }
    }

    #[test]
    fn test_string_action_is_symbolic() {
        let item = item_from_config(&item_config(Some(json!("command::ls -l"))));
        assert_eq!(symbolic(&item), Some("command::ls -l"));
        assert!(item.pause);
    }

    #[test]
    fn test_structured_action_merges_into_item() {
        let mut config = item_config(Some(json!({
            "type": "internal",
            "value": "save_args",
            "args": {"dir": "out"},
            "prompt_args": [{"name": "project_name", "prompt": "Enter project name"}]
        })));
        config.args.insert("license".into(), json!("MIT"));

        let item = item_from_config(&config);
        assert_eq!(symbolic(&item), Some("internal::save_args"));
        assert_eq!(item.preset_args["dir"], json!("out"));
        assert_eq!(item.preset_args["license"], json!("MIT"));
        assert_eq!(item.prompt_specs[0].name, "project_name");
    }

    #[test]
    fn test_non_string_action_is_malformed() {
        let item = item_from_config(&item_config(Some(json!(["a", "b"]))));
        assert!(matches!(item.action, Some(ActionRef::Malformed(ref k)) if k == "array"));

        let item = item_from_config(&item_config(Some(json!({"value": "no type"}))));
        assert!(matches!(item.action, Some(ActionRef::Malformed(ref k)) if k == "object"));
    }

    #[test]
    fn test_static_menu_keeps_authored_order() {
        let config = parse_config(
            r#"
[menus.main]
doc = "Main"
items = [
  { key = "b", description = "Second letter" },
  { key = "a", description = "First letter", target_menu = "sub" },
  { key = "q", description = "Exit", is_quit = true },
]
"#,
        )
        .unwrap();
        let model = MenuModel::new("main", Box::new(static_menu("main", &config.menus["main"])), 10);
        let keys: Vec<&str> = model.items().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["b", "a", "q"]);
        assert_eq!(model.title(), "Main");
        assert_eq!(model.items()[1].1.target_menu.as_deref(), Some("sub"));
        assert!(model.items()[2].1.is_quit);
    }

    #[test]
    fn test_build_app_registers_menus_and_builtins() {
        let config = parse_config(
            r#"
[general]
title = "Demo"
page_size = 4

[menus.main]
items = [{ key = "sub", description = "Sub", target_menu = "sub" }]

[menus.sub]
doc = "Sub Menu"

[menus.tasks]
kind = "tasks"
path = "does-not-exist.json"
"#,
        )
        .unwrap();
        let resolved = resolve_with(&config, None, |_| None).unwrap();
        let app = build_app(&resolved).unwrap();

        assert_eq!(app.settings().title, "Demo");
        assert_eq!(app.active_menu().unwrap().page_size(), 4);
        assert!(app.has_menu("sub"));
        assert!(app.has_menu("tasks"));
        for builtin in ["echo", "sleep", "save_args"] {
            assert!(app.has_action(builtin), "{builtin}");
        }
    }
}
