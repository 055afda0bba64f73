//! # Action Resolver
//!
//! Two steps, kept apart so their failures can be told apart:
//!
//! 1. [`ActionResolver::resolve`] turns an [`ActionRef`] plus the final
//!    binding into something runnable: a handler, or a fully templated
//!    command line. Every failure here is a resolution error and the
//!    selection becomes a no-op.
//! 2. [`ActionResolver::run`] executes it. Failures here (non-zero exits,
//!    handler errors, panics) are execution errors: surfaced as text, never
//!    fatal to the navigation loop.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use log::{info, warn};

use crate::core::action::{ActionError, ActionId, ActionKind, render_template, script_command};
use crate::core::console::Console;
use crate::core::exec::{CommandRunner, ProcessOutput};
use crate::core::item::{ActionRef, Bindings};
use crate::core::registry::{ActionContext, ActionHandler, ActionRegistry};

/// A runnable action.
pub enum Resolved {
    Handler {
        label: String,
        handler: Arc<dyn ActionHandler>,
    },
    Process {
        kind: ActionKind,
        command: String,
    },
}

impl Resolved {
    /// The command line for process actions.
    pub fn command(&self) -> Option<&str> {
        match self {
            Resolved::Process { command, .. } => Some(command),
            Resolved::Handler { .. } => None,
        }
    }
}

/// What a completed action produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Process(ProcessOutput),
}

pub struct ActionResolver<'a> {
    registry: &'a ActionRegistry,
    runner: &'a dyn CommandRunner,
    console: &'a dyn Console,
}

impl<'a> ActionResolver<'a> {
    pub fn new(
        registry: &'a ActionRegistry,
        runner: &'a dyn CommandRunner,
        console: &'a dyn Console,
    ) -> Self {
        Self {
            registry,
            runner,
            console,
        }
    }

    /// Locates the implementation and applies template substitution. Runs
    /// after binding, so placeholders see prompted values.
    pub fn resolve(&self, action: &ActionRef, args: &Bindings) -> Result<Resolved, ActionError> {
        let identifier = match action {
            ActionRef::Direct(handler) => {
                return Ok(Resolved::Handler {
                    label: "direct handler".to_string(),
                    handler: handler.clone(),
                });
            }
            ActionRef::Malformed(kind) => return Err(ActionError::NotAnIdentifier(kind.clone())),
            ActionRef::Symbolic(identifier) => identifier,
        };

        let id: ActionId = identifier.parse()?;
        match id.kind {
            ActionKind::Internal => {
                let handler = self
                    .registry
                    .get(&id.value)
                    .ok_or_else(|| ActionError::UnknownInternal(id.value.clone()))?;
                Ok(Resolved::Handler {
                    label: id.value,
                    handler,
                })
            }
            ActionKind::Command => Ok(Resolved::Process {
                kind: id.kind,
                command: render_template(&id.value, args)?,
            }),
            ActionKind::Script => {
                let path = render_template(&id.value, args)?;
                Ok(Resolved::Process {
                    kind: id.kind,
                    command: script_command(&path),
                })
            }
        }
    }

    pub async fn run(
        &self,
        resolved: Resolved,
        ctx: ActionContext,
        args: Bindings,
    ) -> Result<Outcome, ActionError> {
        match resolved {
            Resolved::Handler { label, handler } => {
                info!("Invoking handler '{}'", label);
                match AssertUnwindSafe(handler.call(ctx, args)).catch_unwind().await {
                    Ok(result) => result.map(|()| Outcome::Completed),
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        warn!("Handler '{}' panicked: {}", label, message);
                        Err(ActionError::Panicked(message))
                    }
                }
            }
            Resolved::Process { kind, command } => {
                self.console.write_line("");
                self.console.write_line(&format!("Executing {kind}: {command}"));
                let output = self
                    .runner
                    .run(&command)
                    .await
                    .map_err(ActionError::Spawn)?;
                self.report(&output);
                Ok(Outcome::Process(output))
            }
        }
    }

    /// Resolve and run in one go.
    pub async fn execute(
        &self,
        action: &ActionRef,
        ctx: ActionContext,
        args: Bindings,
    ) -> Result<Outcome, ActionError> {
        let resolved = self.resolve(action, &args)?;
        self.run(resolved, ctx, args).await
    }

    fn report(&self, output: &ProcessOutput) {
        let rule = "-".repeat(20);
        self.console.write_line(&rule);
        if !output.stdout.is_empty() {
            self.console
                .write_line(&format!("Output:\n{}", output.stdout.trim_end()));
        }
        if !output.stderr.is_empty() {
            self.console
                .write_line(&format!("Errors:\n{}", output.stderr.trim_end()));
        }
        let code = output
            .code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        self.console
            .write_line(&format!("Process finished with exit code: {code}"));
        self.console.write_line(&rule);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
