//! # Registries
//!
//! Name → handler and name → menu-factory tables owned by one [`App`]
//! instance. Both are add-only: registering a name twice is an error and
//! the first registration stays in place.
//!
//! Handlers come in three shapes (synchronous, asynchronous, and
//! parameterless) and all of them are adapted to [`ActionHandler`], so the
//! resolver always awaits a single interface.
//!
//! [`App`]: crate::core::state::App

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use thiserror::Error;

use crate::core::action::ActionError;
use crate::core::console::Console;
use crate::core::item::Bindings;
use crate::core::menu::MenuSource;

/// Name of the initial menu. Always present, never re-registrable.
pub const MAIN_MENU: &str = "main";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Action with name '{0}' is already registered.")]
    DuplicateAction(String),
    #[error("Menu with name '{0}' is already registered.")]
    DuplicateMenu(String),
    #[error("Menu name 'main' is reserved for the initial menu.")]
    ReservedMenuName,
}

/// What the active menu looked like when the item was selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuSnapshot {
    /// Registered name.
    pub name: String,
    pub title: String,
    /// `(key, description)` in display order.
    pub items: Vec<(String, String)>,
    pub selected: usize,
}

impl MenuSnapshot {
    pub fn selected_key(&self) -> Option<&str> {
        self.items.get(self.selected).map(|(key, _)| key.as_str())
    }
}

/// Navigation an action asks for. Applied in order once the action has
/// returned and the terminal is back in full-screen mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavRequest {
    Push(String),
    Pop,
    Refresh,
}

/// What every resolved action receives besides its arguments.
#[derive(Clone)]
pub struct ActionContext {
    /// Title of the owning application.
    pub app_name: String,
    pub menu: MenuSnapshot,
    /// Key of the item that was selected.
    pub item_key: String,
    /// Menu names on the navigation stack, root first.
    pub stack: Vec<String>,
    pub console: Arc<dyn Console>,
    requests: Arc<Mutex<Vec<NavRequest>>>,
}

impl ActionContext {
    pub fn new(
        app_name: impl Into<String>,
        menu: MenuSnapshot,
        item_key: impl Into<String>,
        stack: Vec<String>,
        console: Arc<dyn Console>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            menu,
            item_key: item_key.into(),
            stack,
            console,
            requests: Arc::default(),
        }
    }

    pub fn println(&self, line: impl AsRef<str>) {
        self.console.write_line(line.as_ref());
    }

    /// Queues a navigation change for the owning app.
    pub fn request(&self, request: NavRequest) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
    }

    /// Drains the queued requests. Clones share one queue.
    pub fn take_requests(&self) -> Vec<NavRequest> {
        std::mem::take(&mut *self.requests.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn call(&self, ctx: ActionContext, args: Bindings) -> Result<(), ActionError>;
}

/// Runs to completion before returning.
pub struct SyncHandler<F>(F);

#[async_trait]
impl<F> ActionHandler for SyncHandler<F>
where
    F: Fn(&ActionContext, &Bindings) -> Result<(), ActionError> + Send + Sync,
{
    async fn call(&self, ctx: ActionContext, args: Bindings) -> Result<(), ActionError> {
        (self.0)(&ctx, &args)
    }
}

/// Suspends the caller until the returned future completes.
pub struct AsyncHandler<F>(F);

#[async_trait]
impl<F, Fut> ActionHandler for AsyncHandler<F>
where
    F: Fn(ActionContext, Bindings) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), ActionError>> + Send + 'static,
{
    async fn call(&self, ctx: ActionContext, args: Bindings) -> Result<(), ActionError> {
        (self.0)(ctx, args).await
    }
}

/// Ignores both context and arguments.
pub struct NoArgsHandler<F>(F);

#[async_trait]
impl<F> ActionHandler for NoArgsHandler<F>
where
    F: Fn() + Send + Sync,
{
    async fn call(&self, _ctx: ActionContext, _args: Bindings) -> Result<(), ActionError> {
        (self.0)();
        Ok(())
    }
}

pub fn sync_handler<F>(f: F) -> Arc<dyn ActionHandler>
where
    F: Fn(&ActionContext, &Bindings) -> Result<(), ActionError> + Send + Sync + 'static,
{
    Arc::new(SyncHandler(f))
}

pub fn async_handler<F, Fut>(f: F) -> Arc<dyn ActionHandler>
where
    F: Fn(ActionContext, Bindings) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ActionError>> + Send + 'static,
{
    Arc::new(AsyncHandler(f))
}

pub fn no_args<F>(f: F) -> Arc<dyn ActionHandler>
where
    F: Fn() + Send + Sync + 'static,
{
    Arc::new(NoArgsHandler(f))
}

#[derive(Default)]
pub struct ActionRegistry {
    handlers: HashMap<String, Arc<dyn ActionHandler>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: Arc<dyn ActionHandler>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.handlers.contains_key(&name) {
            return Err(RegistryError::DuplicateAction(name));
        }
        self.handlers.insert(name, handler);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ActionHandler>> {
        self.handlers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }
}

/// Builds a fresh menu source each time the menu is pushed.
pub type MenuFactory = Arc<dyn Fn() -> Box<dyn MenuSource> + Send + Sync>;

/// Factory that hands out clones of one source.
pub fn menu_factory<S>(source: S) -> MenuFactory
where
    S: MenuSource + Clone + Sync + 'static,
{
    Arc::new(move || Box::new(source.clone()) as Box<dyn MenuSource>)
}

pub struct MenuRegistry {
    factories: HashMap<String, MenuFactory>,
}

impl MenuRegistry {
    pub fn new(main: MenuFactory) -> Self {
        let mut factories = HashMap::new();
        factories.insert(MAIN_MENU.to_string(), main);
        Self { factories }
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: MenuFactory,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if name == MAIN_MENU {
            return Err(RegistryError::ReservedMenuName);
        }
        if self.factories.contains_key(&name) {
            return Err(RegistryError::DuplicateMenu(name));
        }
        self.factories.insert(name, factory);
        Ok(())
    }

    pub fn build(&self, name: &str) -> Option<Box<dyn MenuSource>> {
        self.factories.get(name).map(|factory| factory())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}

/// A self-contained bundle of menus and actions that registers into an app.
pub trait Component {
    fn menus(&self) -> Vec<(String, MenuFactory)> {
        Vec::new()
    }

    fn actions(&self) -> Vec<(String, Arc<dyn ActionHandler>)> {
        Vec::new()
    }
}
