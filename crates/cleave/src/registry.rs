//! Algorithm registry.
//!
//! Maps algorithm names to factories producing fresh instances. The built-in
//! algorithms are registered once, in an explicit list, into a process-wide
//! default registry; custom registries can be assembled for callers that
//! want to expose only a subset or add their own algorithms.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::algorithms::{BoundaryAlgorithm, FastCdc, FastCdcStadia, Jc, UltraCdc};
use crate::error::ChunkerError;

/// Factory producing a fresh algorithm instance.
pub type AlgorithmFactory = fn() -> Box<dyn BoundaryAlgorithm>;

/// The process-wide registry holding the built-in algorithms.
pub static DEFAULT_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::with_builtins);

/// Name-to-factory mapping for boundary algorithms.
pub struct Registry {
    entries: HashMap<String, AlgorithmFactory>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Creates a registry with every built-in algorithm registered.
    pub fn with_builtins() -> Self {
        let builtins: [(&str, AlgorithmFactory); 7] = [
            ("fastcdc", || Box::new(FastCdc::legacy())),
            ("fastcdc-v1.0.0", || Box::new(FastCdc::v1())),
            ("fastcdc4stadia", || Box::new(FastCdcStadia::new())),
            ("kfastcdc", || Box::new(FastCdc::keyed())),
            ("jc", || Box::new(Jc::legacy())),
            ("jc-v1.0.0", || Box::new(Jc::v1())),
            ("ultracdc", || Box::new(UltraCdc::new())),
        ];

        let mut registry = Self::new();
        for (name, factory) in builtins {
            registry.entries.insert(name.to_string(), factory);
        }
        registry
    }

    /// Registers an algorithm factory under `name`.
    ///
    /// Fails if the name is already taken.
    pub fn register(&mut self, name: &str, factory: AlgorithmFactory) -> Result<(), ChunkerError> {
        if self.entries.contains_key(name) {
            return Err(ChunkerError::AlreadyRegistered(name.to_string()));
        }
        self.entries.insert(name.to_string(), factory);
        Ok(())
    }

    /// Instantiates the algorithm registered under `name`.
    pub fn instantiate(&self, name: &str) -> Result<Box<dyn BoundaryAlgorithm>, ChunkerError> {
        self.entries
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| ChunkerError::UnknownAlgorithm(name.to_string()))
    }

    /// Returns the registered algorithm names in unspecified order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::UltraCdc;

    #[test]
    fn test_builtin_names_present() {
        let registry = Registry::with_builtins();
        for name in [
            "fastcdc",
            "fastcdc-v1.0.0",
            "fastcdc4stadia",
            "kfastcdc",
            "jc",
            "jc-v1.0.0",
            "ultracdc",
        ] {
            assert!(registry.instantiate(name).is_ok(), "missing {name}");
        }
        assert_eq!(registry.names().len(), 7);
    }

    #[test]
    fn test_unknown_algorithm() {
        let registry = Registry::with_builtins();
        assert!(matches!(
            registry.instantiate("rabin"),
            Err(ChunkerError::UnknownAlgorithm(name)) if name == "rabin"
        ));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = Registry::with_builtins();
        let result = registry.register("ultracdc", || Box::new(UltraCdc::new()));
        assert!(matches!(
            result,
            Err(ChunkerError::AlreadyRegistered(name)) if name == "ultracdc"
        ));
    }

    #[test]
    fn test_custom_registration() {
        let mut registry = Registry::new();
        registry
            .register("mine", || Box::new(UltraCdc::new()))
            .unwrap();
        assert!(registry.instantiate("mine").is_ok());
    }
}
