//! # Property Set
//!
//! The per-entity pair of stores: one of 32-bit slots, one of 64-bit slots.
//!
//! The two stores are independent. Nothing stops a key from being present
//! in both; [`PropertySet::cross_store_duplicates`] reports it, and typed
//! access always goes to the store the value type routes to.

use crate::store::{Store32, Store64};
use crate::value::{DateTimeTicks, PropertyEnum, SlotWidth, TimeSpanTicks};
use crate::Key;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Both property stores of one entity.
///
/// Persists as `{ "items32": [...], "items64": [...] }`, each a list of
/// `{ key, raw }` entries in stored order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySet {
    #[serde(rename = "items32", default)]
    store32: Store32,
    #[serde(rename = "items64", default)]
    store64: Store64,
}

/// A value type with a fixed home store.
///
/// `i32`, `f32` and `bool` live in the 32-bit store. `i64`, `f64`,
/// [`DateTimeTicks`] and [`TimeSpanTicks`] live in the 64-bit store.
pub trait RoutedValue: Sized {
    /// Store this type is read from and written to.
    const WIDTH: SlotWidth;

    /// Reads `key` from the home store.
    fn read(set: &PropertySet, key: Key) -> Option<Self>;

    /// Writes `key` into the home store.
    fn write(self, set: &mut PropertySet, key: Key);
}

macro_rules! impl_routed_value {
    ($store:ident, $width:expr; $($ty:ty),*) => {
        $(
            impl RoutedValue for $ty {
                const WIDTH: SlotWidth = $width;

                #[inline]
                fn read(set: &PropertySet, key: Key) -> Option<Self> {
                    set.$store.try_get(key)
                }

                #[inline]
                fn write(self, set: &mut PropertySet, key: Key) {
                    set.$store.set(key, self);
                }
            }
        )*
    };
}

impl_routed_value!(store32, SlotWidth::Bit32; i32, f32, bool);
impl_routed_value!(store64, SlotWidth::Bit64; i64, f64, DateTimeTicks, TimeSpanTicks);

impl PropertySet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from two existing stores.
    #[must_use]
    pub fn from_stores(store32: Store32, store64: Store64) -> Self {
        Self { store32, store64 }
    }

    /// The 32-bit store.
    #[inline]
    #[must_use]
    pub fn store32(&self) -> &Store32 {
        &self.store32
    }

    /// The 32-bit store, mutably.
    #[inline]
    pub fn store32_mut(&mut self) -> &mut Store32 {
        &mut self.store32
    }

    /// The 64-bit store.
    #[inline]
    #[must_use]
    pub fn store64(&self) -> &Store64 {
        &self.store64
    }

    /// The 64-bit store, mutably.
    #[inline]
    pub fn store64_mut(&mut self) -> &mut Store64 {
        &mut self.store64
    }

    /// Reads `key` from the store `T` routes to.
    #[must_use]
    pub fn get<T: RoutedValue>(&self, key: impl Into<Key>) -> Option<T> {
        T::read(self, key.into())
    }

    /// Writes `key` into the store `T` routes to.
    pub fn set<T: RoutedValue>(&mut self, key: impl Into<Key>, value: T) {
        value.write(self, key.into());
    }

    /// Reads an enum from the 32-bit store.
    #[must_use]
    pub fn get_enum<E: PropertyEnum>(&self, key: impl Into<Key>) -> Option<E> {
        self.store32.get_enum(key)
    }

    /// Writes an enum into the 32-bit store.
    pub fn set_enum<E: PropertyEnum>(&mut self, key: impl Into<Key>, value: E) {
        self.store32.set_enum(key, value);
    }

    /// Returns `true` if `key` is in the 32-bit store.
    #[must_use]
    pub fn contains32(&self, key: impl Into<Key>) -> bool {
        self.store32.contains(key)
    }

    /// Returns `true` if `key` is in the 64-bit store.
    #[must_use]
    pub fn contains64(&self, key: impl Into<Key>) -> bool {
        self.store64.contains(key)
    }

    /// Returns `true` if `key` is in the store of the given width.
    #[must_use]
    pub fn contains_in(&self, width: SlotWidth, key: impl Into<Key>) -> bool {
        match width {
            SlotWidth::Bit32 => self.contains32(key),
            SlotWidth::Bit64 => self.contains64(key),
        }
    }

    /// Returns `true` if `key` is in either store.
    #[must_use]
    pub fn contains_any(&self, key: impl Into<Key>) -> bool {
        let key = key.into();
        self.contains32(key) || self.contains64(key)
    }

    /// Removes the first occurrence of `key` from each store.
    ///
    /// # Returns
    ///
    /// `true` if either store had the key.
    pub fn remove_everywhere(&mut self, key: impl Into<Key>) -> bool {
        let key = key.into();
        let removed32 = self.store32.remove(key);
        let removed64 = self.store64.remove(key);
        removed32 || removed64
    }

    /// Keys present in both stores, ascending.
    #[must_use]
    pub fn cross_store_duplicates(&self) -> BTreeSet<Key> {
        self.store32
            .keys()
            .filter(|key| self.store64.contains(*key))
            .collect()
    }

    /// Returns `true` if any key is present in both stores.
    #[must_use]
    pub fn has_cross_store_duplicates(&self) -> bool {
        self.store32.keys().any(|key| self.store64.contains(key))
    }

    /// Rebuilds both key indexes.
    pub fn rebuild_index(&mut self) {
        self.store32.rebuild_index();
        self.store64.rebuild_index();
    }

    /// Removes every entry from both stores.
    pub fn clear(&mut self) {
        self.store32.clear();
        self.store64.clear();
    }

    /// Total entry count across both stores.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store32.len() + self.store64.len()
    }

    /// Returns `true` if both stores are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store32.is_empty() && self.store64.is_empty()
    }
}
