//! # Application State
//!
//! The navigation controller. Owns the stack of live menus, both
//! registries and the collaborators actions run against. One `App` is one
//! isolated application; nothing here is process-global.
//!
//! ```text
//! App
//! ├── settings: Settings              // title, page size, pause text
//! ├── actions: ActionRegistry         // name → handler
//! ├── menus: MenuRegistry             // name → menu factory ("main" reserved)
//! ├── stack: Vec<MenuModel>           // root at 0, top is active
//! ├── state: AppState                 // Running | Suspended | Terminated
//! ├── runner: Arc<dyn CommandRunner>  // command:: and script:: execution
//! ├── console: Arc<dyn Console>       // plain-mode output
//! ├── status_message: Option<String>  // shown under the menu
//! └── interrupt_pending: bool         // Ctrl+C seen while suspended
//! ```
//!
//! Key handling:
//!
//! ```text
//! Up / Down   move the cursor on the active menu
//! Select      quit item   → pop (Terminated when the root pops)
//!             action      → Suspended: bind, resolve, run, pause cue
//!                           → Running, then push target_menu if any
//!             target only → push
//!             neither     → no-op
//! Cancel      same as selecting a quit item
//! Interrupt   Terminated from any depth
//! ```
//!
//! Ctrl+C during an action reaches us as a signal rather than a key. It is
//! queued and applied as `Interrupt` once the action returns, after any
//! [`NavRequest`]s the action made.

use std::io;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::core::action::ActionError;
use crate::core::binder::{Prompter, bind};
use crate::core::console::{Console, StdoutConsole};
use crate::core::exec::{CommandRunner, ShellRunner};
use crate::core::interrupt::InterruptWatch;
use crate::core::item::{ActionRef, MenuItem};
use crate::core::menu::{DEFAULT_PAGE_SIZE, MenuModel};
use crate::core::registry::{
    ActionContext, ActionHandler, ActionRegistry, Component, MAIN_MENU, MenuFactory,
    MenuRegistry, MenuSnapshot, NavRequest, RegistryError,
};
use crate::core::resolver::ActionResolver;
use crate::core::suspension::{Foreground, ScreenMode};

pub const DEFAULT_PAUSE_MESSAGE: &str = "Press Enter to continue...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Stack non-empty, the top menu is on screen.
    Running,
    /// An action owns the terminal.
    Suspended,
    /// Stack empty.
    Terminated,
}

/// The logical keys, independent of physical bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Select,
    Cancel,
    Interrupt,
}

/// What the renderer has to do after a key was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    None,
    /// Only the status line changed.
    Status,
    /// The visible menu changed.
    Menu,
    /// The terminal was handed to an action; repaint everything.
    Full,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub title: String,
    pub page_size: usize,
    pub pause_message: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "termenu".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            pause_message: DEFAULT_PAUSE_MESSAGE.to_string(),
        }
    }
}

pub struct App {
    settings: Settings,
    actions: ActionRegistry,
    menus: MenuRegistry,
    stack: Vec<MenuModel>,
    state: AppState,
    runner: Arc<dyn CommandRunner>,
    console: Arc<dyn Console>,
    pub status_message: Option<String>,
    interrupt_pending: bool,
}

/// How one action run went, as far as navigation cares.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// False when the action never started.
    pub proceed: bool,
    pub requests: Vec<NavRequest>,
    pub interrupted: bool,
}

impl App {
    /// Creates the app with `main` already on the stack.
    pub fn new(main: MenuFactory) -> Self {
        let settings = Settings::default();
        let menus = MenuRegistry::new(main);
        let mut app = Self {
            settings,
            actions: ActionRegistry::new(),
            menus,
            stack: Vec::new(),
            state: AppState::Running,
            runner: Arc::new(ShellRunner::default()),
            console: Arc::new(StdoutConsole),
            status_message: None,
            interrupt_pending: false,
        };
        if let Some(source) = app.menus.build(MAIN_MENU) {
            app.stack
                .push(MenuModel::new(MAIN_MENU, source, app.settings.page_size));
        }
        app
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        for menu in &mut self.stack {
            menu.set_page_size(settings.page_size);
        }
        self.settings = settings;
        self
    }

    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_console(mut self, console: Arc<dyn Console>) -> Self {
        self.console = console;
        self
    }

    pub fn register_menu(
        &mut self,
        name: impl Into<String>,
        factory: MenuFactory,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        debug!("Registering menu '{}'", name);
        self.menus.register(name, factory)
    }

    pub fn register_action(
        &mut self,
        name: impl Into<String>,
        handler: Arc<dyn ActionHandler>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        debug!("Registering action '{}'", name);
        self.actions.register(name, handler)
    }

    pub fn register_component(&mut self, component: &dyn Component) -> Result<(), RegistryError> {
        for (name, factory) in component.menus() {
            self.register_menu(name, factory)?;
        }
        for (name, handler) in component.actions() {
            self.register_action(name, handler)?;
        }
        Ok(())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn is_terminated(&self) -> bool {
        self.state == AppState::Terminated
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn active_menu(&self) -> Option<&MenuModel> {
        self.stack.last()
    }

    pub fn active_menu_mut(&mut self) -> Option<&mut MenuModel> {
        self.stack.last_mut()
    }

    /// Menu names on the stack, root first.
    pub fn stack_names(&self) -> Vec<String> {
        self.stack.iter().map(|m| m.name().to_string()).collect()
    }

    pub fn has_action(&self, name: &str) -> bool {
        self.actions.contains(name)
    }

    pub fn has_menu(&self, name: &str) -> bool {
        self.menus.contains(name)
    }

    /// Handles one key. Nothing else touches the stack while this runs,
    /// so keys that arrive during an action wait for it to return.
    pub async fn handle_key<H>(&mut self, key: NavKey, fg: &mut Foreground<H>) -> Redraw
    where
        H: ScreenMode + Prompter,
    {
        if self.state == AppState::Terminated {
            return Redraw::None;
        }
        if std::mem::take(&mut self.interrupt_pending) {
            return self.interrupt();
        }
        debug!("Handling key {:?}", key);

        let had_status = self.status_message.take().is_some();
        let redraw = match key {
            NavKey::Up | NavKey::Down => match self.stack.last_mut() {
                Some(menu) if !menu.is_empty() => {
                    if key == NavKey::Up {
                        menu.move_up();
                    } else {
                        menu.move_down();
                    }
                    Redraw::Menu
                }
                _ => Redraw::None,
            },
            NavKey::Select => self.select(fg).await,
            NavKey::Cancel => self.pop(),
            NavKey::Interrupt => self.interrupt(),
        };

        if std::mem::take(&mut self.interrupt_pending) {
            return self.interrupt();
        }

        if redraw == Redraw::None && (had_status || self.status_message.is_some()) {
            return Redraw::Status;
        }
        redraw
    }

    /// Runs the selected item on the active menu.
    pub async fn select<H>(&mut self, fg: &mut Foreground<H>) -> Redraw
    where
        H: ScreenMode + Prompter,
    {
        let Some((key, item)) = self.stack.last().and_then(|m| m.current_entry()).cloned() else {
            return Redraw::None;
        };

        if item.is_quit {
            return self.pop();
        }

        match (&item.action, &item.target_menu) {
            (Some(_), target) => {
                let dispatch = self.run_action(&key, &item, fg).await;
                if let Some(menu) = self.stack.last_mut() {
                    menu.refresh();
                }
                for request in dispatch.requests {
                    self.apply(request);
                }
                if dispatch.proceed
                    && self.state != AppState::Terminated
                    && let Some(target) = target
                {
                    self.push(target);
                }
                self.interrupt_pending |= dispatch.interrupted;
                Redraw::Full
            }
            (None, Some(target)) => self.push(target),
            (None, None) => Redraw::None,
        }
    }

    /// Builds `name` from its factory and makes it the active menu. An
    /// unknown name leaves the current menu active.
    pub fn push(&mut self, name: &str) -> Redraw {
        match self.menus.build(name) {
            Some(source) => {
                info!("Pushing menu '{}'", name);
                self.stack
                    .push(MenuModel::new(name, source, self.settings.page_size));
                Redraw::Menu
            }
            None => {
                warn!("Menu '{}' not found, staying on current menu", name);
                self.status_message = Some(format!("Menu '{name}' not found."));
                Redraw::None
            }
        }
    }

    fn apply(&mut self, request: NavRequest) {
        debug!("Applying {:?}", request);
        match request {
            NavRequest::Push(name) if self.state != AppState::Terminated => {
                self.push(&name);
            }
            NavRequest::Push(name) => warn!("Ignoring push of '{}' after termination", name),
            NavRequest::Pop => {
                self.pop();
            }
            NavRequest::Refresh => {
                if let Some(menu) = self.stack.last_mut() {
                    menu.refresh();
                }
            }
        }
    }

    fn interrupt(&mut self) -> Redraw {
        info!("Interrupted at depth {}", self.stack.len());
        self.stack.clear();
        self.state = AppState::Terminated;
        Redraw::None
    }

    /// Drops the active menu. Popping the root terminates the app.
    pub fn pop(&mut self) -> Redraw {
        let Some(popped) = self.stack.pop() else {
            self.state = AppState::Terminated;
            return Redraw::None;
        };
        info!("Popped menu '{}'", popped.name());

        match self.stack.last_mut() {
            Some(parent) => {
                parent.refresh();
                Redraw::Menu
            }
            None => {
                info!("Navigation stack empty, terminating");
                self.state = AppState::Terminated;
                Redraw::None
            }
        }
    }

    /// Runs `item`'s action with the terminal suspended. Nothing is applied
    /// to the stack here; the caller acts on the returned [`Dispatch`].
    pub async fn run_action<H>(&mut self, key: &str, item: &MenuItem, fg: &mut Foreground<H>) -> Dispatch
    where
        H: ScreenMode + Prompter,
    {
        let Some(action) = item.action.as_ref() else {
            return Dispatch {
                proceed: true,
                ..Dispatch::default()
            };
        };
        let ctx = self.context(key);
        let requests = ctx.clone();

        self.state = AppState::Suspended;
        let watch = InterruptWatch::start();
        let proceed = {
            let mut screen = fg.suspend();
            self.invoke(action, item, ctx, screen.host_mut(), &watch).await
        };
        let interrupted = watch.finish().await;
        self.state = AppState::Running;

        Dispatch {
            proceed,
            requests: requests.take_requests(),
            interrupted,
        }
    }

    async fn invoke<H>(
        &self,
        action: &ActionRef,
        item: &MenuItem,
        ctx: ActionContext,
        host: &mut H,
        watch: &InterruptWatch,
    ) -> bool
    where
        H: Prompter,
    {
        info!("Dispatching {:?} from '{}'", action, ctx.menu.name);

        let (result, prompted) = match bind(&item.preset_args, &item.prompt_specs, host).await {
            Ok(binding) => {
                let resolver =
                    ActionResolver::new(&self.actions, self.runner.as_ref(), self.console.as_ref());
                let result = resolver.execute(action, ctx, binding.args).await;
                (result, binding.prompted)
            }
            Err(e) => (Err(ActionError::from(e)), true),
        };

        let (proceed, failed) = match result {
            Ok(_) => (true, false),
            Err(e) => {
                warn!("Action failed: {}", e);
                self.console.write_line(&format!("Error: {e}"));
                (!e.is_resolution(), true)
            }
        };

        // Prompting already gave the user a pause point, unless the error
        // that followed would otherwise vanish with the repaint.
        if item.pause && (!prompted || failed) && !watch.interrupted() {
            match host.pause(&self.settings.pause_message).await {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => watch.record(),
                Err(e) => warn!("Pause cue failed: {}", e),
            }
        }
        proceed
    }

    fn context(&self, item_key: &str) -> ActionContext {
        let menu = self
            .stack
            .last()
            .map(|m| MenuSnapshot {
                name: m.name().to_string(),
                title: m.title(),
                items: m
                    .items()
                    .iter()
                    .map(|(key, item)| (key.clone(), item.description.clone()))
                    .collect(),
                selected: m.selected_index(),
            })
            .unwrap_or_default();
        ActionContext::new(
            self.settings.title.clone(),
            menu,
            item_key,
            self.stack_names(),
            self.console.clone(),
        )
    }
}
