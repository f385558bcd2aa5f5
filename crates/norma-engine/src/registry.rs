//! # Handler Registries
//!
//! Name → handler maps for the three handler kinds. Lookup is a hash probe;
//! registration order does not matter. Re-registering a name replaces the
//! previous handler and logs a warning; it is never an error.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::handler::{CheckHandler, TransformHandler, TypeHandler};

/// One registry of handlers of a single kind.
pub struct Registry<H: ?Sized> {
    kind: &'static str,
    entries: HashMap<String, Arc<H>>,
}

impl<H: ?Sized> Registry<H> {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: HashMap::new(),
        }
    }

    /// Register `handler` under `name`, replacing any previous entry.
    pub fn add(&mut self, name: &str, handler: Arc<H>) {
        if self.entries.insert(name.to_string(), handler).is_some() {
            tracing::warn!(kind = self.kind, name, "overwriting registered handler");
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<H>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names, sorted alphabetically.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<H: ?Sized> fmt::Debug for Registry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &self.kind)
            .field("names", &self.names())
            .finish()
    }
}

/// The type, check and transform registries of one engine.
#[derive(Debug)]
pub struct Registries {
    pub types: Registry<dyn TypeHandler>,
    pub checks: Registry<dyn CheckHandler>,
    pub transforms: Registry<dyn TransformHandler>,
}

impl Registries {
    /// Registries with nothing registered.
    pub fn empty() -> Self {
        Self {
            types: Registry::new("type"),
            checks: Registry::new("check"),
            transforms: Registry::new("transform"),
        }
    }

    /// Registries populated with the built-in handlers.
    pub fn with_builtins() -> Self {
        let mut registries = Self::empty();
        crate::builtin::install(&mut registries);
        registries
    }
}

impl Default for Registries {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::FnTransform;

    #[test]
    fn test_overwrite_replaces_handler() {
        let mut registry: Registry<dyn TransformHandler> = Registry::new("transform");
        registry.add("twice", Arc::new(FnTransform::new(|v| v)));
        registry.add("twice", Arc::new(FnTransform::new(|v| v)));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("twice"));
    }

    #[test]
    fn test_builtin_names() {
        let registries = Registries::with_builtins();
        assert_eq!(
            registries.types.names(),
            vec!["array", "boolean", "date", "function", "integer", "number", "object", "string"]
        );
        assert_eq!(
            registries.checks.names(),
            vec!["max", "max_length", "min", "min_length", "set", "unique"]
        );
        assert_eq!(
            registries.transforms.names(),
            vec!["ceil", "floor", "iso_datetime", "lowercase", "round", "trim", "uppercase"]
        );
    }

    #[test]
    fn test_empty_registries() {
        let registries = Registries::empty();
        assert!(registries.types.is_empty());
        assert!(registries.checks.get("min").is_none());
    }
}
