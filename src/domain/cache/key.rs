//! Deterministic cache key generation
//!
//! Semantically identical requests must collapse onto the same key, so
//! parameters are kept sorted and rendered in a fixed format.

use std::collections::BTreeMap;

/// Parameters for cache key generation
#[derive(Debug, Clone, Default)]
pub struct CacheKeyParams {
    /// Primary identity (handle, joined repository list, image path)
    pub primary: String,
    /// Secondary components (sorted for consistency)
    pub components: BTreeMap<String, String>,
}

impl CacheKeyParams {
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            components: BTreeMap::new(),
        }
    }

    pub fn with_component(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.components.insert(key.into(), value.into());
        self
    }

    /// Renders `primary:k1=v1:k2=v2`
    pub fn generate(&self) -> String {
        let mut parts = vec![self.primary.clone()];

        for (k, v) in &self.components {
            parts.push(format!("{}={}", k, v));
        }

        parts.join(":")
    }

    /// Renders the key under a namespace prefix
    pub fn generate_with_namespace(&self, namespace: &str) -> String {
        format!("{}:{}", namespace, self.generate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_params_new() {
        let params = CacheKeyParams::new("octocat");
        assert_eq!(params.primary, "octocat");
        assert!(params.components.is_empty());
        assert_eq!(params.generate(), "octocat");
    }

    #[test]
    fn test_generate_with_namespace() {
        let params = CacheKeyParams::new("octocat");

        let key = params.generate_with_namespace("github:profile");
        assert_eq!(key, "github:profile:octocat");
    }

    #[test]
    fn test_components_are_sorted() {
        let params = CacheKeyParams::new("octocat")
            .with_component("range", "last_7_days")
            .with_component("provider", "wakapi");

        assert_eq!(params.generate(), "octocat:provider=wakapi:range=last_7_days");
    }

    #[test]
    fn test_same_parameters_same_key() {
        let a = CacheKeyParams::new("x")
            .with_component("b", "2")
            .with_component("a", "1");
        let b = CacheKeyParams::new("x")
            .with_component("a", "1")
            .with_component("b", "2");

        assert_eq!(a.generate_with_namespace("ns"), b.generate_with_namespace("ns"));
    }
}
