//! Runtime type lookup by class name.
//!
//! The predicate core never inspects the hosting platform's reflection
//! machinery directly. The bridge registers the class hierarchy it reports
//! into a [`TypeRegistry`]; resolving a name yields a self-contained
//! [`TypeHandle`] that answers is-kind-of questions for matcher closures.
//! Tests supply small hand-built registries.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Resolves a class name to a type handle, or `None` if the name is unknown.
pub trait TypeResolver {
    /// Look up `class_name` in the known type hierarchy
    fn resolve(&self, class_name: &str) -> Option<TypeHandle>;
}

impl<R: TypeResolver + ?Sized> TypeResolver for &R {
    fn resolve(&self, class_name: &str) -> Option<TypeHandle> {
        (**self).resolve(class_name)
    }
}

/// A resolved type, detached from the registry that produced it.
///
/// The set of matching type names (the class itself and every registered
/// subclass) is computed at resolve time, so the handle is immutable and
/// cheap to clone into compiled matchers.
#[derive(Debug, Clone)]
pub struct TypeHandle {
    class_name: String,
    matching: Arc<HashSet<String>>,
}

impl TypeHandle {
    /// The class name this handle was resolved from
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Whether `type_name` is this class or a registered subclass of it
    #[must_use]
    pub fn matches(&self, type_name: &str) -> bool {
        self.matching.contains(type_name)
    }
}

/// Class-hierarchy table: each registered class maps to its optional
/// superclass.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    superclasses: HashMap<String, Option<String>>,
}

impl TypeRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a root class (no superclass).
    ///
    /// Re-registering a class that already has a superclass keeps it.
    pub fn register(&mut self, class_name: impl Into<String>) {
        self.superclasses.entry(class_name.into()).or_insert(None);
    }

    /// Register a class as a subclass of `superclass`
    pub fn register_subclass(
        &mut self,
        class_name: impl Into<String>,
        superclass: impl Into<String>,
    ) {
        let superclass = superclass.into();
        self.superclasses
            .insert(class_name.into(), Some(superclass.clone()));
        self.superclasses.entry(superclass).or_insert(None);
    }

    fn is_kind_of(&self, name: &str, target: &str) -> bool {
        let mut current = Some(name);
        // hop count bounds malformed (cyclic) superclass chains
        let mut hops = 0;
        while let Some(class) = current {
            if class == target {
                return true;
            }
            current = self.superclasses.get(class).and_then(Option::as_deref);
            hops += 1;
            if hops > self.superclasses.len() {
                return false;
            }
        }
        false
    }
}

impl TypeResolver for TypeRegistry {
    fn resolve(&self, class_name: &str) -> Option<TypeHandle> {
        if !self.superclasses.contains_key(class_name) {
            return None;
        }
        let matching: HashSet<String> = self
            .superclasses
            .keys()
            .filter(|name| self.is_kind_of(name, class_name))
            .cloned()
            .collect();
        Some(TypeHandle {
            class_name: class_name.to_string(),
            matching: Arc::new(matching),
        })
    }
}
