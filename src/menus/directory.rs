//! A filesystem explorer whose items are recomputed from the current
//! directory on every refresh.
//!
//! ```text
//! [.. Go Up]
//! [D] docs
//! [D] src
//! [F] Cargo.toml
//! [F] README.md
//! ```
//!
//! Directories sort before files, each group case-insensitively. Selecting
//! a directory enters it; selecting a file prints its details.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Local};
use log::debug;

use crate::core::action::ActionError;
use crate::core::item::MenuItem;
use crate::core::menu::MenuSource;
use crate::core::registry::{ActionContext, no_args, sync_handler};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    name: String,
    is_dir: bool,
}

pub struct DirectoryMenu {
    title: String,
    current: Arc<Mutex<PathBuf>>,
}

impl DirectoryMenu {
    pub fn new(title: impl Into<String>, root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let root = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
        Self {
            title: title.into(),
            current: Arc::new(Mutex::new(root)),
        }
    }

    pub fn current_path(&self) -> PathBuf {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn go_up_item(&self) -> MenuItem {
        let current = self.current.clone();
        MenuItem::new("[.. Go Up]")
            .with_handler(no_args(move || {
                let mut path = current.lock().unwrap_or_else(PoisonError::into_inner);
                if let Some(parent) = path.parent() {
                    *path = parent.to_path_buf();
                }
            }))
            .without_pause()
    }

    fn entry_item(&self, dir: &Path, entry: &Entry) -> MenuItem {
        let full = dir.join(&entry.name);
        if entry.is_dir {
            let current = self.current.clone();
            MenuItem::new(format!("[D] {}", entry.name))
                .with_handler(no_args(move || {
                    *current.lock().unwrap_or_else(PoisonError::into_inner) = full.clone();
                }))
                .without_pause()
        } else {
            let name = entry.name.clone();
            MenuItem::new(format!("[F] {}", entry.name)).with_handler(sync_handler(
                move |ctx, _args| print_details(ctx, &name, &full),
            ))
        }
    }
}

impl MenuSource for DirectoryMenu {
    fn title(&self) -> String {
        format!("{} ({})", self.title, self.current_path().display())
    }

    fn items(&self) -> Vec<(String, MenuItem)> {
        let dir = self.current_path();
        let mut items = vec![("go_up".to_string(), self.go_up_item())];

        match list_entries(&dir) {
            Ok(entries) => {
                debug!("Listed {} entries in {}", entries.len(), dir.display());
                for entry in &entries {
                    let key = if entry.is_dir { "dir" } else { "file" };
                    items.push((format!("{key}:{}", entry.name), self.entry_item(&dir, entry)));
                }
            }
            Err(e) => {
                items.push((
                    "error".to_string(),
                    MenuItem::new(format!("Error reading directory: {e}")),
                ));
            }
        }
        items
    }
}

fn list_entries(dir: &Path) -> io::Result<Vec<Entry>> {
    let mut entries: Vec<Entry> = fs::read_dir(dir)?
        .flatten()
        .map(|entry| Entry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: entry.file_type().is_ok_and(|ft| ft.is_dir()),
        })
        .collect();
    entries.sort_by_key(|e| (!e.is_dir, e.name.to_lowercase()));
    Ok(entries)
}

fn print_details(ctx: &ActionContext, name: &str, path: &Path) -> Result<(), ActionError> {
    let meta = fs::metadata(path)
        .map_err(|e| ActionError::handler(format!("Cannot read {}: {e}", path.display())))?;

    ctx.println(format!("Details for: {name}"));
    ctx.println(format!("Full Path: {}", path.display()));
    ctx.println(format!("Size: {} bytes", meta.len()));
    if let Ok(modified) = meta.modified() {
        let modified: DateTime<Local> = modified.into();
        ctx.println(format!("Modified: {}", modified.format("%Y-%m-%d %H:%M:%S")));
    }
    Ok(())
}
