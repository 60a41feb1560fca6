//! Deduplicating module registry
//!
//! Sits in front of a [`ModuleLoader`]. Each page context owns one registry;
//! injected bundles call [`ModuleRegistry::define`], possibly more than once
//! for the same bundle. Every accepted definition re-arms a single debounced
//! resolution pass so one injection burst resolves together.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::time::Duration;

use serde_json::{Map, Value};

use crate::config::RuntimeConfig;

use super::loader::{ModuleLoader, ModuleValue, ResolutionReport};
use super::timer::{DebounceTimer, TimerId, TimerQueue, VirtualClock};

/// Lifecycle of a module name within one page context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    Unregistered,
    /// Defined, waiting, no pass pending
    Registered,
    /// Defined, waiting, a pass is pending
    Scheduled,
    Resolved,
}

/// Result of a `define` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Definition {
    Registered,
    /// Name already defined in this context; the call was ignored
    Duplicate,
}

/// Shared scope object handed to factories that need page globals
#[derive(Debug, Clone, Default)]
pub struct PublicScope(Rc<RefCell<Map<String, Value>>>);

impl PublicScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.borrow().get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.borrow_mut().insert(key.into(), value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.borrow().contains_key(key)
    }

    pub fn snapshot(&self) -> Value {
        Value::Object(self.0.borrow().clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegistryOptions {
    pub resolve_delay: Duration,
}

impl From<&RuntimeConfig> for RegistryOptions {
    fn from(config: &RuntimeConfig) -> Self {
        Self {
            resolve_delay: config.resolve_delay(),
        }
    }
}

/// Per-context module registry
pub struct ModuleRegistry<L, T> {
    loader: L,
    timers: T,
    defined: HashSet<String>,
    debounce: DebounceTimer,
    scope: PublicScope,
    passes: usize,
}

impl<L, T> ModuleRegistry<L, T>
where
    L: ModuleLoader,
    T: TimerQueue,
{
    /// Page-load bootstrap: a fresh registry with its own public scope
    pub fn bootstrap(loader: L, timers: T, options: RegistryOptions) -> Self {
        Self {
            loader,
            timers,
            defined: HashSet::new(),
            debounce: DebounceTimer::new(options.resolve_delay),
            scope: PublicScope::new(),
            passes: 0,
        }
    }

    /// Handle on the shared scope, for factories to capture
    pub fn public_scope(&self) -> PublicScope {
        self.scope.clone()
    }

    /// Define a module once per context.
    ///
    /// A factory returning `None` produces an empty module object.
    pub fn define<F>(&mut self, name: &str, dependencies: &[&str], factory: F) -> Definition
    where
        F: FnOnce(&[ModuleValue]) -> Option<ModuleValue> + 'static,
    {
        if !self.defined.insert(name.to_string()) {
            tracing::debug!(module = name, "ignoring repeated definition");
            return Definition::Duplicate;
        }

        self.loader.register(
            name,
            dependencies.iter().map(|d| d.to_string()).collect(),
            Box::new(move |deps: &[ModuleValue]| {
                factory(deps).unwrap_or_else(|| Value::Object(Map::new()))
            }),
        );
        self.debounce.trigger(&mut self.timers);
        Definition::Registered
    }

    /// Handle a fired timer.
    ///
    /// Runs a resolution pass over the modules waiting right now; later
    /// definitions wait for the next pass. Stale handles return `None`.
    pub fn on_timer(&mut self, id: TimerId) -> Option<ResolutionReport> {
        if !self.debounce.fire(id) {
            return None;
        }

        let waiting = self.loader.waiting();
        self.passes += 1;
        tracing::debug!(pass = self.passes, modules = waiting.len(), "resolving modules");
        Some(self.loader.resolve(&waiting))
    }

    pub fn state(&self, name: &str) -> ModuleState {
        if self.loader.is_resolved(name) {
            ModuleState::Resolved
        } else if !self.defined.contains(name) {
            ModuleState::Unregistered
        } else if self.debounce.is_pending() {
            ModuleState::Scheduled
        } else {
            ModuleState::Registered
        }
    }

    pub fn module(&self, name: &str) -> Option<&ModuleValue> {
        self.loader.module(name)
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.defined.contains(name)
    }

    /// Resolution passes run so far
    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }
}

impl<L: ModuleLoader> ModuleRegistry<L, VirtualClock> {
    /// Advance the clock and run whatever passes came due
    pub fn advance(&mut self, by: Duration) -> Vec<ResolutionReport> {
        let fired = self.timers.advance(by);
        fired.into_iter().filter_map(|id| self.on_timer(id)).collect()
    }
}
