//! Runtime selection of filter implementations by type identifier.
//!
//! # Example
//!
//! ```
//! use vfilter::{FilterRegistry, VFilter, VFilterParams};
//!
//! let registry = FilterRegistry::with_builtin();
//! let filter = registry.create("custom", &VFilterParams::default()).unwrap();
//! assert_eq!(filter.name(), "custom");
//! ```

use std::collections::BTreeMap;

use tracing::debug;

use super::{CustomVFilter, VFilter};
use crate::protocol::VFilterParams;

/// Constructor for a filter, called with the parameters to initialize it with.
pub type FilterFactory = Box<dyn Fn(&VFilterParams) -> Box<dyn VFilter> + Send + Sync>;

/// Registry mapping filter type identifiers to factories.
pub struct FilterRegistry {
    /// Factories by identifier.
    factories: BTreeMap<String, FilterFactory>,
}

impl FilterRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Create a registry holding the filters shipped with this crate.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(CustomVFilter::NAME, |params| {
            Box::new(CustomVFilter::with_params(params))
        });
        registry
    }

    /// Register a factory, replacing any previous one with the same name.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&VFilterParams) -> Box<dyn VFilter> + Send + Sync + 'static,
    {
        if self
            .factories
            .insert(name.to_string(), Box::new(factory))
            .is_some()
        {
            debug!(filter = name, "filter factory replaced");
        }
    }

    /// Create and initialize a filter by identifier.
    #[must_use]
    pub fn create(&self, name: &str, params: &VFilterParams) -> Option<Box<dyn VFilter>> {
        let filter = self.factories.get(name).map(|factory| factory(params));
        if filter.is_none() {
            debug!(filter = name, "no factory registered");
        }
        filter
    }

    /// Check if an identifier is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered identifiers, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("filters", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::FilterParam;

    #[test]
    fn test_builtin_registered() {
        let registry = FilterRegistry::with_builtin();
        assert!(registry.contains("custom"));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["custom"]);
    }

    #[test]
    fn test_create_initializes() {
        let registry = FilterRegistry::with_builtin();
        let params = VFilterParams {
            level: 25,
            ..VFilterParams::default()
        };
        let filter = registry.create("custom", &params).unwrap();
        assert_eq!(filter.get_param(FilterParam::Level), 25.0);
    }

    #[test]
    fn test_unknown_filter() {
        let registry = FilterRegistry::new();
        assert!(registry.create("sharpen", &VFilterParams::default()).is_none());
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = FilterRegistry::with_builtin();
        registry.register("custom", |_| Box::new(CustomVFilter::new()));
        let filter = registry
            .create(
                "custom",
                &VFilterParams {
                    level: 25,
                    ..VFilterParams::default()
                },
            )
            .unwrap();
        assert_eq!(filter.get_param(FilterParam::Level), 0.0);
    }
}
