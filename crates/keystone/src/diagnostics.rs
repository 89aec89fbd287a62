//! Read-only health checks of a property set.
//!
//! Duplicates inside a store and keys present in both stores are tolerated
//! by storage. They are reported here and never repaired.

use keystone_core::{Key, PropertySet};
use keystone_meta::MetadataContext;
use std::collections::BTreeSet;

/// Findings for one property set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Keys repeated in the 32-bit store, with occurrence counts.
    pub duplicates32: Vec<(Key, usize)>,
    /// Keys repeated in the 64-bit store, with occurrence counts.
    pub duplicates64: Vec<(Key, usize)>,
    /// Keys present in both stores.
    pub cross_store: BTreeSet<Key>,
}

impl Diagnostics {
    /// Inspects `set`.
    #[must_use]
    pub fn inspect(set: &PropertySet) -> Self {
        Self {
            duplicates32: set.store32().duplicates(),
            duplicates64: set.store64().duplicates(),
            cross_store: set.cross_store_duplicates(),
        }
    }

    /// Returns `true` if nothing was found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.duplicates32.is_empty() && self.duplicates64.is_empty() && self.cross_store.is_empty()
    }

    /// One message per finding, keys labelled through `context` when bound.
    #[must_use]
    pub fn messages(&self, context: &MetadataContext) -> Vec<String> {
        let label = |key: Key| {
            context
                .resolve(key)
                .map_or_else(|| format!("ID {key}"), |meta| meta.label().to_string())
        };

        let mut messages = Vec::new();
        for (bits, duplicates) in [(32, &self.duplicates32), (64, &self.duplicates64)] {
            for (key, count) in duplicates {
                messages.push(format!(
                    "duplicate key `{}` appears {count} times in the {bits}-bit store",
                    label(*key)
                ));
            }
        }
        for key in &self.cross_store {
            messages.push(format!(
                "key `{}` is present in both the 32-bit and 64-bit stores",
                label(*key)
            ));
        }
        messages
    }

    /// Emits every finding as a `warn!`.
    pub fn log(&self, context: &MetadataContext) {
        for message in self.messages(context) {
            tracing::warn!("{message}");
        }
    }
}
