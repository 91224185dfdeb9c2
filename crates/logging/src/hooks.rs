//! crates/logging/src/hooks.rs
//! Hook dispatch consulted before a record is emitted.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::record::Context;

/// Hook domain the logger triggers.
pub const HOOK_DOMAIN: &str = "debug";
/// Hook event the logger triggers.
pub const HOOK_EVENT: &str = "log";

/// Parameters passed to the `debug:log` hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct HookParams<'a> {
    /// Upper-case level label, e.g. `"WARNING"`.
    pub level: &'static str,
    /// Message as passed to the logger.
    pub msg: &'a Value,
    /// Caller context.
    pub context: &'a Context,
}

/// Application hook dispatcher.
///
/// The logger triggers `debug:log` with a default of `true`; returning
/// `false` vetoes emission. The `debug:log` hook point is deprecated but still
/// honoured.
pub trait HookDispatcher: Send + Sync {
    /// Runs the handlers registered for `domain:event` and returns the final value.
    fn trigger(&self, domain: &str, event: &str, params: &HookParams<'_>, default: bool) -> bool;
}

/// Dispatcher with no handlers; always returns the default.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHooks;

impl HookDispatcher for NoHooks {
    fn trigger(
        &self,
        _domain: &str,
        _event: &str,
        _params: &HookParams<'_>,
        default: bool,
    ) -> bool {
        default
    }
}

type Handler = Box<dyn Fn(&HookParams<'_>, bool) -> bool + Send + Sync>;

/// In-process hook registry.
///
/// Handlers run in registration order. Each receives the value returned by
/// the previous handler (or the default) and returns the value passed on.
#[derive(Default)]
pub struct HookRegistry {
    handlers: HashMap<(String, String), Vec<Handler>>,
}

impl HookRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `domain:event`.
    pub fn register<F>(&mut self, domain: &str, event: &str, handler: F)
    where
        F: Fn(&HookParams<'_>, bool) -> bool + Send + Sync + 'static,
    {
        self.handlers
            .entry((domain.to_owned(), event.to_owned()))
            .or_default()
            .push(Box::new(handler));
    }

    /// Reports whether any handler is registered for `domain:event`.
    pub fn has_handlers(&self, domain: &str, event: &str) -> bool {
        self.handlers
            .get(&(domain.to_owned(), event.to_owned()))
            .is_some_and(|handlers| !handlers.is_empty())
    }
}

impl HookDispatcher for HookRegistry {
    fn trigger(&self, domain: &str, event: &str, params: &HookParams<'_>, default: bool) -> bool {
        let Some(handlers) = self.handlers.get(&(domain.to_owned(), event.to_owned())) else {
            return default;
        };

        if domain == HOOK_DOMAIN && event == HOOK_EVENT {
            tracing::debug!(
                target: crate::INTERNAL_TARGET,
                handlers = handlers.len(),
                "the deprecated debug:log hook has handlers"
            );
        }

        handlers
            .iter()
            .fold(default, |value, handler| handler(params, value))
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut points: Vec<String> = self
            .handlers
            .keys()
            .map(|(domain, event)| format!("{domain}:{event}"))
            .collect();
        points.sort();
        f.debug_struct("HookRegistry").field("points", &points).finish()
    }
}
