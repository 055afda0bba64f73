//! # Menu Model
//!
//! One screen's worth of state: the items, the cursor and the scroll window.
//! No I/O happens here. Items come from a [`MenuSource`], which is either a
//! fixed list ([`StaticMenu`]) or something recomputed on every refresh
//! (a directory listing, a task file).
//!
//! Invariants kept by every mutation:
//!
//! ```text
//! items non-empty  →  0 <= selected_index < len(items)
//! items empty      →  selected_index == 0
//! scroll_offset <= selected_index < scroll_offset + page_size
//! ```

use std::collections::HashSet;

use log::warn;

use crate::core::item::MenuItem;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Supplies a menu's title and its ordered `(key, item)` list.
pub trait MenuSource: Send {
    fn title(&self) -> String;

    /// Re-derives the items. Called on creation and on every refresh.
    fn items(&self) -> Vec<(String, MenuItem)>;
}

/// A menu whose items never change.
#[derive(Debug, Clone)]
pub struct StaticMenu {
    title: String,
    items: Vec<(String, MenuItem)>,
}

impl StaticMenu {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
        }
    }

    pub fn item(mut self, key: impl Into<String>, item: MenuItem) -> Self {
        self.items.push((key.into(), item));
        self
    }
}

impl MenuSource for StaticMenu {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn items(&self) -> Vec<(String, MenuItem)> {
        self.items.clone()
    }
}

/// Named style classes the renderer maps to display attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleClass {
    Title,
    Selected,
    MenuItem,
}

impl StyleClass {
    pub fn as_str(self) -> &'static str {
        match self {
            StyleClass::Title => "title",
            StyleClass::Selected => "selected",
            StyleClass::MenuItem => "menu-item",
        }
    }
}

/// One styled line of menu output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub class: StyleClass,
    pub text: String,
}

impl Fragment {
    fn new(class: StyleClass, text: impl Into<String>) -> Self {
        Self {
            class,
            text: text.into(),
        }
    }
}

pub struct MenuModel {
    name: String,
    source: Box<dyn MenuSource>,
    items: Vec<(String, MenuItem)>,
    selected_index: usize,
    scroll_offset: usize,
    page_size: usize,
}

impl MenuModel {
    pub fn new(name: impl Into<String>, source: Box<dyn MenuSource>, page_size: usize) -> Self {
        let name = name.into();
        let items = unique_items(&name, source.items());
        Self {
            name,
            source,
            items,
            selected_index: 0,
            scroll_offset: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> String {
        self.source.title()
    }

    pub fn items(&self) -> &[(String, MenuItem)] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.clamp_scroll();
    }

    /// Moves the cursor by `delta`, wrapping around both ends.
    pub fn move_selection(&mut self, delta: isize) {
        if self.items.is_empty() {
            return;
        }
        let len = self.items.len() as isize;
        self.selected_index = (self.selected_index as isize + delta).rem_euclid(len) as usize;
        self.clamp_scroll();
    }

    pub fn move_up(&mut self) {
        self.move_selection(-1);
    }

    pub fn move_down(&mut self) {
        self.move_selection(1);
    }

    /// Jumps straight to `index` (ignored when out of range).
    pub fn select(&mut self, index: usize) {
        if index < self.items.len() {
            self.selected_index = index;
            self.clamp_scroll();
        }
    }

    pub fn current_item(&self) -> Option<&MenuItem> {
        self.items.get(self.selected_index).map(|(_, item)| item)
    }

    pub fn current_entry(&self) -> Option<&(String, MenuItem)> {
        self.items.get(self.selected_index)
    }

    /// Title, then one fragment per visible item, then a "showing" footer
    /// when the list is longer than one page.
    pub fn visible_fragments(&self) -> Vec<Fragment> {
        let mut fragments = vec![Fragment::new(
            StyleClass::Title,
            format!("--- {} ---", self.title()),
        )];

        let end = (self.scroll_offset + self.page_size).min(self.items.len());
        let visible = &self.items[self.scroll_offset.min(end)..end];

        for (offset, (_, item)) in visible.iter().enumerate() {
            let index = self.scroll_offset + offset;
            let fragment = if index == self.selected_index {
                Fragment::new(StyleClass::Selected, format!("> {}", item.description))
            } else {
                Fragment::new(StyleClass::MenuItem, format!("  {}", item.description))
            };
            fragments.push(fragment);
        }

        if self.items.len() > self.page_size {
            fragments.push(Fragment::new(
                StyleClass::Title,
                format!("(Showing {} of {} items)", visible.len(), self.items.len()),
            ));
        }
        fragments
    }

    /// Re-derives the items from the source and pulls the cursor back into
    /// range if the list shrank.
    pub fn refresh(&mut self) {
        self.items = unique_items(&self.name, self.source.items());
        if self.selected_index >= self.items.len() {
            self.selected_index = self.items.len().saturating_sub(1);
        }
        self.clamp_scroll();
    }

    /// Minimal scroll so the selection sits inside the window.
    fn clamp_scroll(&mut self) {
        if self.selected_index >= self.scroll_offset + self.page_size {
            self.scroll_offset = self.selected_index + 1 - self.page_size;
        } else if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        }
    }
}

/// Drops entries whose key was already seen; keys must be unique per menu.
fn unique_items(menu: &str, items: Vec<(String, MenuItem)>) -> Vec<(String, MenuItem)> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|(key, _)| {
            let fresh = seen.insert(key.clone());
            if !fresh {
                warn!("Menu '{}': duplicate item key '{}' ignored", menu, key);
            }
            fresh
        })
        .collect()
}
