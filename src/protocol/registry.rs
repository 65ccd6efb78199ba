//! Selector-token lookup of driver implementations.

use std::collections::HashMap;
use std::fmt;

use crate::protocol::traits::Driver;

type DriverFactory = Box<dyn Fn() -> Box<dyn Driver> + Send + Sync>;

/// Named driver factories.
///
/// Owned by the caller; there is no process-wide registry.
#[derive(Default)]
pub struct DriverRegistry {
    factories: HashMap<String, DriverFactory>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Driver> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.factories.insert(name.clone(), Box::new(factory)).is_some() {
            tracing::debug!(driver = %name, "Replaced registered driver");
        }
    }

    /// Instantiate the driver registered under `name`.
    pub fn get(&self, name: &str) -> Option<Box<dyn Driver>> {
        self.factories.get(name).map(|factory| factory())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("drivers", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Connection, DriverError, DriverResult};

    struct NullDriver;

    impl Driver for NullDriver {
        fn open(&self, _dsn: &str) -> DriverResult<Box<dyn Connection>> {
            Err(DriverError::message("null driver"))
        }
    }

    #[test]
    fn lookup_by_name() {
        let mut registry = DriverRegistry::new();
        registry.register("null", || Box::new(NullDriver));
        registry.register("alt", || Box::new(NullDriver));

        assert!(registry.contains("null"));
        assert!(registry.get("null").is_some());
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.names(), vec!["alt".to_string(), "null".to_string()]);
    }
}
