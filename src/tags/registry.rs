//! Registry of named tag functions.

use std::sync::Arc;

use dashmap::DashMap;

use super::builtins;
use super::store::Store;
use super::value::TagFn;

/// Named tag functions available to every parser sharing this registry.
///
/// Built-ins are seeded at construction. Entries added or removed here are
/// visible to all parsers holding the same `Arc<TagRegistry>`, so mutation
/// is a deliberate cross-parse side effect.
pub struct TagRegistry {
    tags: DashMap<String, TagFn>,
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TagRegistry {
    /// Create a registry seeded with the built-in tags
    pub fn new() -> Self {
        let registry = Self::empty();
        builtins::register(&registry);
        registry
    }

    /// Create a registry with no tags at all
    pub fn empty() -> Self {
        Self {
            tags: DashMap::new(),
        }
    }

    /// Register a tag function, replacing any existing tag with that name.
    pub fn add_tag<F>(&self, name: impl Into<String>, f: F)
    where
        F: Fn(&str, &mut Store) -> String + Send + Sync + 'static,
    {
        self.insert(name, Arc::new(f));
    }

    /// Register an already shared tag function.
    pub fn insert(&self, name: impl Into<String>, f: TagFn) {
        let name = name.into();
        if self.tags.insert(name.clone(), f).is_some() {
            tracing::debug!(tag = %name, "Tag function replaced");
        } else {
            tracing::debug!(tag = %name, "Tag function registered");
        }
    }

    /// Remove a tag. Returns true if it existed.
    pub fn remove_tag(&self, name: &str) -> bool {
        let removed = self.tags.remove(name).is_some();
        if removed {
            tracing::debug!(tag = %name, "Tag function removed");
        }
        removed
    }

    pub fn get(&self, name: &str) -> Option<TagFn> {
        self.tags.get(name).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    /// Snapshot of the registered tag names, sorted.
    pub fn available_tags(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tags.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Create an Arc-wrapped registry seeded with the built-ins
pub fn create_tag_registry() -> Arc<TagRegistry> {
    Arc::new(TagRegistry::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_seeded() {
        let registry = TagRegistry::new();
        for name in builtins::BUILTIN_TAGS {
            assert!(registry.contains(name), "missing built-in {name}");
        }
        assert_eq!(registry.len(), builtins::BUILTIN_TAGS.len());
    }

    #[test]
    fn test_empty_registry() {
        let registry = TagRegistry::empty();
        assert!(registry.is_empty());
        assert!(registry.get("upper").is_none());
    }

    #[test]
    fn test_add_and_remove() {
        let registry = TagRegistry::new();
        registry.add_tag("double", |payload, _| payload.repeat(2));

        let f = registry.get("double").unwrap();
        assert_eq!(f("ab", &mut Store::new()), "abab");

        assert!(registry.remove_tag("double"));
        assert!(!registry.remove_tag("double"));
        assert!(registry.get("double").is_none());
    }

    #[test]
    fn test_add_overwrites_builtin() {
        let registry = TagRegistry::new();
        registry.add_tag("upper", |_, _| "shadowed".to_string());

        let f = registry.get("upper").unwrap();
        assert_eq!(f("abc", &mut Store::new()), "shadowed");
    }

    #[test]
    fn test_available_tags_sorted_snapshot() {
        let registry = TagRegistry::empty();
        registry.add_tag("zeta", |_, _| String::new());
        registry.add_tag("alpha", |_, _| String::new());

        let names = registry.available_tags();
        registry.remove_tag("zeta");

        assert_eq!(names, vec!["alpha", "zeta"]);
        assert_eq!(registry.available_tags(), vec!["alpha"]);
    }
}
