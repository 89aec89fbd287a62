//! # Metadata Resolution
//!
//! Key to metadata lookup, memoized per binding.
//!
//! There is no ambient global binding: a [`MetadataContext`] is created by
//! the host and passed to whatever needs metadata. It holds at most one
//! resolver at a time. Binding a new schema replaces the resolver, and its
//! cache goes with it.

use crate::metadata::Metadata;
use crate::schema::KeySchema;
use keystone_core::Key;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Source of metadata for one key universe.
pub trait MetadataResolver: Send + Sync {
    /// Name of the bound schema.
    fn schema_name(&self) -> &str;

    /// Metadata for `key`, or `None` if the key is not declared.
    fn resolve(&self, key: Key) -> Option<Arc<Metadata>>;

    /// Member names in declaration order.
    fn names(&self) -> Vec<&str>;

    /// Key values in declaration order.
    fn values(&self) -> Vec<Key>;

    /// The schema behind this resolver, if it is backed by one.
    fn schema(&self) -> Option<&KeySchema> {
        None
    }
}

/// Resolver over a [`KeySchema`], building each record once.
pub struct SchemaResolver {
    schema: KeySchema,
    cache: RwLock<HashMap<Key, Option<Arc<Metadata>>>>,
}

impl SchemaResolver {
    /// Wraps a schema with an empty cache.
    #[must_use]
    pub fn new(schema: KeySchema) -> Self {
        Self {
            schema,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The underlying schema.
    #[must_use]
    pub fn schema(&self) -> &KeySchema {
        &self.schema
    }

    /// Number of keys resolved so far, misses included.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.read().len()
    }
}

impl MetadataResolver for SchemaResolver {
    fn schema_name(&self) -> &str {
        self.schema.name()
    }

    fn resolve(&self, key: Key) -> Option<Arc<Metadata>> {
        if let Some(hit) = self.cache.read().get(&key) {
            return hit.clone();
        }

        let resolved = self.schema.metadata(key).map(Arc::new);
        tracing::trace!(
            key,
            schema = self.schema.name(),
            found = resolved.is_some(),
            "metadata cache fill"
        );
        self.cache.write().entry(key).or_insert(resolved).clone()
    }

    fn names(&self) -> Vec<&str> {
        self.schema.names().collect()
    }

    fn values(&self) -> Vec<Key> {
        self.schema.values().collect()
    }

    fn schema(&self) -> Option<&KeySchema> {
        Some(&self.schema)
    }
}

impl fmt::Debug for SchemaResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaResolver")
            .field("schema", &self.schema.name())
            .field("keys", &self.schema.len())
            .field("cached", &self.cached_len())
            .finish()
    }
}

/// The single active metadata binding.
///
/// Every lookup through an unbound context is `None`.
#[derive(Clone, Default)]
pub struct MetadataContext {
    resolver: Option<Arc<dyn MetadataResolver>>,
    generation: u64,
}

impl MetadataContext {
    /// Creates an unbound context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context bound to `schema`.
    #[must_use]
    pub fn with_schema(schema: KeySchema) -> Self {
        let mut context = Self::new();
        context.bind(schema);
        context
    }

    /// Binds `schema`, replacing any previous binding and its cache.
    pub fn bind(&mut self, schema: KeySchema) {
        self.bind_resolver(Arc::new(SchemaResolver::new(schema)));
    }

    /// Binds a custom resolver, replacing any previous binding.
    pub fn bind_resolver(&mut self, resolver: Arc<dyn MetadataResolver>) {
        self.generation += 1;
        match &self.resolver {
            Some(previous) => tracing::info!(
                from = previous.schema_name(),
                to = resolver.schema_name(),
                generation = self.generation,
                "rebound key schema"
            ),
            None => tracing::info!(
                schema = resolver.schema_name(),
                generation = self.generation,
                "bound key schema"
            ),
        }
        self.resolver = Some(resolver);
    }

    /// Binds `schema` unless an identical schema is already bound.
    ///
    /// A schema that kept its name but changed any key is rebound.
    ///
    /// # Returns
    ///
    /// `true` if a new binding was made.
    pub fn ensure_bound(&mut self, schema: KeySchema) -> bool {
        let bound = self.resolver.as_ref().and_then(|resolver| resolver.schema());
        if bound == Some(&schema) {
            return false;
        }
        self.bind(schema);
        true
    }

    /// Drops the current binding.
    ///
    /// # Returns
    ///
    /// `true` if something was bound.
    pub fn unbind(&mut self) -> bool {
        match self.resolver.take() {
            Some(previous) => {
                self.generation += 1;
                tracing::info!(schema = previous.schema_name(), "unbound key schema");
                true
            }
            None => false,
        }
    }

    /// Returns `true` if a resolver is bound.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.resolver.is_some()
    }

    /// Name of the bound schema.
    #[must_use]
    pub fn schema_name(&self) -> Option<&str> {
        self.resolver.as_ref().map(|resolver| resolver.schema_name())
    }

    /// Incremented on every bind and unbind.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// The bound resolver.
    #[must_use]
    pub fn resolver(&self) -> Option<&Arc<dyn MetadataResolver>> {
        self.resolver.as_ref()
    }

    /// Metadata for `key` from the bound resolver.
    #[must_use]
    pub fn resolve(&self, key: impl Into<Key>) -> Option<Arc<Metadata>> {
        let key = key.into();
        self.resolver.as_ref().and_then(|resolver| resolver.resolve(key))
    }

    /// Member names of the bound schema; empty when unbound.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.resolver.as_ref().map_or_else(Vec::new, |resolver| resolver.names())
    }

    /// Key values of the bound schema; empty when unbound.
    #[must_use]
    pub fn values(&self) -> Vec<Key> {
        self.resolver.as_ref().map_or_else(Vec::new, |resolver| resolver.values())
    }
}

impl fmt::Debug for MetadataContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataContext")
            .field("schema", &self.schema_name())
            .field("generation", &self.generation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::ValueKind;
    use crate::schema::KeyDescriptor;

    fn schema(name: &str, kind: ValueKind) -> KeySchema {
        KeySchema::new(name)
            .with_key(KeyDescriptor::new(1, "Health").kind(kind))
            .unwrap()
    }

    #[test]
    fn test_resolver_memoizes() {
        let resolver = SchemaResolver::new(schema("Keys", ValueKind::Int));
        let first = resolver.resolve(1).unwrap();
        let second = resolver.resolve(1).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(resolver.resolve(42).is_none());
        assert_eq!(resolver.cached_len(), 2);
    }

    #[test]
    fn test_unbound_context_resolves_nothing() {
        let context = MetadataContext::new();
        assert!(!context.is_bound());
        assert!(context.resolve(1).is_none());
        assert!(context.names().is_empty());
        assert!(context.values().is_empty());
    }

    #[test]
    fn test_rebind_discards_cache() {
        let mut context = MetadataContext::with_schema(schema("Old", ValueKind::Int));
        let old = context.resolve(1).unwrap();
        assert_eq!(old.kind, ValueKind::Int);
        assert_eq!(context.generation(), 1);

        context.bind(schema("New", ValueKind::Float));
        let new = context.resolve(1).unwrap();
        assert_eq!(new.kind, ValueKind::Float);
        assert!(!Arc::ptr_eq(&old, &new));
        assert_eq!(context.generation(), 2);
        assert_eq!(context.schema_name(), Some("New"));
    }

    #[test]
    fn test_ensure_bound_and_unbind() {
        let mut context = MetadataContext::new();
        assert!(context.ensure_bound(schema("Keys", ValueKind::Int)));
        assert!(!context.ensure_bound(schema("Keys", ValueKind::Int)));
        assert_eq!(context.generation(), 1);

        // same name, edited key
        assert!(context.ensure_bound(schema("Keys", ValueKind::Bool)));
        assert_eq!(context.resolve(1).unwrap().kind, ValueKind::Bool);
        assert_eq!(context.generation(), 2);

        assert!(context.unbind());
        assert!(!context.unbind());
        assert!(context.resolve(1).is_none());
    }

    #[test]
    fn test_enumerates_key_universe() {
        let context = MetadataContext::with_schema(
            schema("Keys", ValueKind::Int)
                .with_key(KeyDescriptor::new(2, "Armor"))
                .unwrap(),
        );
        assert_eq!(context.names(), vec!["Health", "Armor"]);
        assert_eq!(context.values(), vec![1, 2]);
    }
}
