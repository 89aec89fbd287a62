//! A single stored property.

use crate::value::{Slot, SlotValue};
use crate::Key;
use serde::{Deserialize, Serialize};

/// One `(key, raw)` pair in a property store.
///
/// The persisted shape of an entry is exactly these two fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyEntry<S> {
    /// Property identifier.
    pub key: Key,
    /// Untyped slot bits.
    pub raw: S,
}

impl<S> PropertyEntry<S> {
    /// Creates an entry.
    #[inline]
    #[must_use]
    pub const fn new(key: Key, raw: S) -> Self {
        Self { key, raw }
    }
}

impl<S: Slot> PropertyEntry<S> {
    /// Reads the slot as `T`.
    #[inline]
    #[must_use]
    pub fn get<T: SlotValue<S>>(&self) -> T {
        T::decode(self.raw)
    }

    /// Overwrites the slot with `value`.
    #[inline]
    pub fn set<T: SlotValue<S>>(&mut self, value: T) {
        self.raw = value.encode();
    }
}
