//! Module loader primitive
//!
//! `AmdLoader` is the plain registration and resolution primitive: it keeps
//! modules waiting until every dependency is ready, then runs their
//! factories. It does not deduplicate; defining a name twice runs the new
//! factory again on the next resolution.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

/// Module exports
pub type ModuleValue = Value;

/// Factory as seen by the loader: always produces exports
pub type Factory = Box<dyn FnOnce(&[ModuleValue]) -> ModuleValue>;

/// A module left waiting after a resolution pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedModule {
    pub name: String,
    /// Dependencies that were not ready
    pub missing: Vec<String>,
}

/// Outcome of one resolution pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionReport {
    /// Modules resolved by this pass, in execution order
    pub resolved: Vec<String>,
    pub unresolved: Vec<UnresolvedModule>,
}

impl ResolutionReport {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Registration primitive behind the module registry
pub trait ModuleLoader {
    fn register(&mut self, name: &str, dependencies: Vec<String>, factory: Factory);

    /// Names waiting for resolution, in definition order
    fn waiting(&self) -> Vec<String>;

    /// Resolve as many of `names` as possible.
    ///
    /// Modules that cannot be resolved stay waiting and are reported, never
    /// treated as errors.
    fn resolve(&mut self, names: &[String]) -> ResolutionReport;

    fn module(&self, name: &str) -> Option<&ModuleValue>;

    fn is_resolved(&self, name: &str) -> bool {
        self.module(name).is_some()
    }
}

struct Waiting {
    name: String,
    dependencies: Vec<String>,
    factory: Factory,
}

/// Minimal AMD loader
#[derive(Default)]
pub struct AmdLoader {
    waiting: Vec<Waiting>,
    ready: HashMap<String, ModuleValue>,
}

impl AmdLoader {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.waiting.iter().position(|w| w.name == name)
    }

    fn deps_ready(&self, idx: usize) -> bool {
        self.waiting[idx]
            .dependencies
            .iter()
            .all(|d| self.ready.contains_key(d))
    }

    fn run(&mut self, idx: usize) -> String {
        let module = self.waiting.remove(idx);
        let args: Vec<ModuleValue> = module
            .dependencies
            .iter()
            .map(|d| self.ready.get(d).cloned().unwrap_or(Value::Null))
            .collect();
        let exports = (module.factory)(&args);
        self.ready.insert(module.name.clone(), exports);
        module.name
    }
}

impl std::fmt::Debug for AmdLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmdLoader")
            .field("waiting", &self.waiting())
            .field("ready", &self.ready.len())
            .finish()
    }
}

impl ModuleLoader for AmdLoader {
    fn register(&mut self, name: &str, dependencies: Vec<String>, factory: Factory) {
        let entry = Waiting {
            name: name.to_string(),
            dependencies,
            factory,
        };
        match self.position(name) {
            Some(idx) => self.waiting[idx] = entry,
            None => self.waiting.push(entry),
        }
    }

    fn waiting(&self) -> Vec<String> {
        self.waiting.iter().map(|w| w.name.clone()).collect()
    }

    fn resolve(&mut self, names: &[String]) -> ResolutionReport {
        let mut report = ResolutionReport::default();

        loop {
            let mut progressed = false;
            for name in names {
                let Some(idx) = self.position(name) else {
                    continue;
                };
                if self.deps_ready(idx) {
                    report.resolved.push(self.run(idx));
                    progressed = true;
                }
            }
            if !progressed {
                break;
            }
        }

        for name in names {
            let Some(idx) = self.position(name) else {
                continue;
            };
            let missing: Vec<String> = self.waiting[idx]
                .dependencies
                .iter()
                .filter(|d| !self.ready.contains_key(*d))
                .cloned()
                .collect();
            tracing::warn!(
                module = name.as_str(),
                missing = ?missing,
                "module not loaded: dependencies never arrived"
            );
            report.unresolved.push(UnresolvedModule {
                name: name.clone(),
                missing,
            });
        }

        report
    }

    fn module(&self, name: &str) -> Option<&ModuleValue> {
        self.ready.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn constant(value: ModuleValue) -> Factory {
        Box::new(move |_: &[ModuleValue]| value)
    }

    #[test]
    fn resolves_in_dependency_order_regardless_of_definition_order() {
        let mut loader = AmdLoader::new();
        loader.register(
            "entry",
            names(&["chunks/shared-AbCd1234"]),
            Box::new(|deps: &[ModuleValue]| {
                json!({ "sum": deps[0]["value"].as_i64().unwrap_or(0) + 1 })
            }),
        );
        loader.register(
            "chunks/shared-AbCd1234",
            Vec::new(),
            constant(json!({ "value": 41 })),
        );

        let report = loader.resolve(&loader.waiting());

        assert_eq!(report.resolved, names(&["chunks/shared-AbCd1234", "entry"]));
        assert!(report.is_complete());
        assert_eq!(loader.module("entry"), Some(&json!({ "sum": 42 })));
        assert!(loader.waiting().is_empty());
    }

    #[test]
    fn missing_dependency_leaves_only_that_module_waiting() {
        let mut loader = AmdLoader::new();
        loader.register("broken", names(&["never"]), constant(json!({})));
        loader.register("fine", Vec::new(), constant(json!({})));

        let report = loader.resolve(&loader.waiting());

        assert_eq!(report.resolved, names(&["fine"]));
        assert_eq!(
            report.unresolved,
            vec![UnresolvedModule {
                name: "broken".to_string(),
                missing: names(&["never"]),
            }]
        );
        assert_eq!(loader.waiting(), names(&["broken"]));
    }

    #[test]
    fn resolve_only_touches_requested_names() {
        let mut loader = AmdLoader::new();
        loader.register("a", Vec::new(), constant(json!(1)));
        loader.register("b", Vec::new(), constant(json!(2)));

        let report = loader.resolve(&names(&["a"]));

        assert_eq!(report.resolved, names(&["a"]));
        assert!(!loader.is_resolved("b"));
    }
}
