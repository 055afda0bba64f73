mod common;

use common::{FakeTerminal, press, transcript};
use termenu::core::config::{ConfigError, load_config, resolve_with};
use termenu::core::suspension::Foreground;
use termenu::menus::build_app;
use termenu::NavKey;

const CONFIG: &str = r#"
[general]
title = "Ops"
page_size = 5
pause_message = "Hit Enter"

[style]
selected = "reverse"

[menus.main]
doc = "Ops Menu"

[[menus.main.items]]
key = "say"
description = "Say something"
action = { type = "internal", value = "echo", args = { message = "from config" } }

[[menus.main.items]]
key = "tasks"
description = "Tasks"
target_menu = "tasks"

[[menus.main.items]]
key = "bad"
description = "Bad action"
action = 42

[[menus.main.items]]
key = "quit"
description = "Exit"
is_quit = true

[menus.tasks]
doc = "Task Runner"
kind = "tasks"
"#;

fn write_config(dir: &std::path::Path, tasks_path: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    let contents = format!(
        "{CONFIG}path = {:?}\n",
        tasks_path.to_string_lossy()
    );
    std::fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn test_config_file_drives_the_app() {
    let dir = tempfile::tempdir().unwrap();
    let tasks = dir.path().join("tasks.json");
    std::fs::write(
        &tasks,
        r#"{"tasks": [{"name": "hi", "description": "Say hi", "action": "internal::echo"}]}"#,
    )
    .unwrap();
    let path = write_config(dir.path(), &tasks);

    let config = load_config(Some(&path)).unwrap();
    let resolved = resolve_with(&config, None, |_| None).unwrap();
    assert_eq!(resolved.page_size, 5);
    assert_eq!(resolved.style["selected"], "reverse");
    assert_eq!(resolved.style["title"], "bold underline");

    let console = transcript();
    let mut app = build_app(&resolved).unwrap().with_console(console.clone());
    let mut fg = Foreground::new(FakeTerminal::new());
    assert_eq!(app.active_menu().unwrap().title(), "Ops Menu");

    // structured action with preset args
    press(&mut app, &mut fg, &[NavKey::Select]).await;
    assert_eq!(console.lines(), vec!["from config"]);
    assert_eq!(fg.host().log, vec!["leave", "pause Hit Enter", "enter"]);

    // non-string action is rejected when selected
    press(&mut app, &mut fg, &[NavKey::Down, NavKey::Down, NavKey::Select]).await;
    assert_eq!(
        console.lines().last().unwrap(),
        "Error: Invalid action format. Expected a string, got number."
    );

    // the task file menu
    press(&mut app, &mut fg, &[NavKey::Up, NavKey::Select]).await;
    assert_eq!(app.stack_names(), vec!["main", "tasks"]);
    let items = app.active_menu().unwrap().items();
    assert_eq!(items[0].1.description, "Say hi");
    assert_eq!(items.last().unwrap().1.description, "[Exit Task Runner]");
}

#[test]
fn test_config_without_main_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[menus.other]\ndoc = \"Other\"\n").unwrap();

    let config = load_config(Some(&path)).unwrap();
    let err = resolve_with(&config, None, |_| None).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_malformed_toml_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[general\ntitle = ").unwrap();
    assert!(matches!(load_config(Some(&path)), Err(ConfigError::Parse(_))));
}
