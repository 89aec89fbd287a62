//! # Property Store
//!
//! An ordered log of `(key, raw)` entries with a lazily built key index.
//!
//! ## Memory Layout
//!
//! ```text
//! entries: [(Health, 100)] [(IsBoss, 1)] [(Health, 7)] ...
//!            ^ index[Health] = 0           ^ shadowed duplicate
//! ```
//!
//! - Entries keep insertion order; that order is the persisted order
//! - The index maps each key to its FIRST occurrence
//! - Removing an entry shifts positions, so it drops the index; the next
//!   read rebuilds it

mod entry;

pub use self::entry::PropertyEntry;

use crate::value::{add_flag, has_flag, remove_flag, PropertyEnum, Slot, SlotValue};
use crate::Key;
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::collections::{HashMap, HashSet};

/// Store of 32-bit slots.
pub type Store32 = PropertyStore<i32>;

/// Store of 64-bit slots.
pub type Store64 = PropertyStore<i64>;

/// Ordered, keyed log of raw slots of one width.
///
/// Serializes as the bare entry list; the index is never persisted.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyStore<S> {
    entries: Vec<PropertyEntry<S>>,
    #[serde(skip)]
    index: OnceCell<HashMap<Key, usize>>,
}

fn build_index<S>(entries: &[PropertyEntry<S>]) -> HashMap<Key, usize> {
    let mut index = HashMap::with_capacity(entries.len());
    for (position, entry) in entries.iter().enumerate() {
        index.entry(entry.key).or_insert(position);
    }
    index
}

impl<S: Slot> PropertyStore<S> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: OnceCell::new(),
        }
    }

    /// Creates an empty store with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: OnceCell::new(),
        }
    }

    /// Wraps an existing entry list, duplicates included.
    ///
    /// The index is built on first lookup.
    #[must_use]
    pub fn from_entries(entries: Vec<PropertyEntry<S>>) -> Self {
        Self {
            entries,
            index: OnceCell::new(),
        }
    }

    fn index(&self) -> &HashMap<Key, usize> {
        self.index.get_or_init(|| build_index(&self.entries))
    }

    /// Returns `true` if the key index is currently valid.
    #[inline]
    #[must_use]
    pub fn is_indexed(&self) -> bool {
        self.index.get().is_some()
    }

    /// Rebuilds the key index from the entry list. First occurrence wins.
    pub fn rebuild_index(&mut self) {
        self.index = OnceCell::from(build_index(&self.entries));
    }

    /// Position of the first entry with `key`.
    #[must_use]
    pub fn position(&self, key: impl Into<Key>) -> Option<usize> {
        self.index().get(&key.into()).copied()
    }

    /// Returns `true` if an entry with `key` exists.
    #[must_use]
    pub fn contains(&self, key: impl Into<Key>) -> bool {
        self.index().contains_key(&key.into())
    }

    /// Raw slot of the first entry with `key`.
    #[must_use]
    pub fn get_raw(&self, key: impl Into<Key>) -> Option<S> {
        self.position(key).map(|position| self.entries[position].raw)
    }

    /// Reads the first entry with `key` as `T`.
    ///
    /// # Returns
    ///
    /// `None` if the key is absent. A present slot always decodes.
    #[must_use]
    pub fn try_get<T: SlotValue<S>>(&self, key: impl Into<Key>) -> Option<T> {
        self.get_raw(key).map(T::decode)
    }

    /// Writes `value` under `key`.
    ///
    /// Overwrites the first existing entry in place, or appends a new one.
    pub fn set<T: SlotValue<S>>(&mut self, key: impl Into<Key>, value: T) {
        self.set_raw(key, value.encode());
    }

    /// Writes a raw slot under `key`. Same placement rules as [`Self::set`].
    pub fn set_raw(&mut self, key: impl Into<Key>, raw: S) {
        let key = key.into();
        let mut index = self.index.take().unwrap_or_else(|| build_index(&self.entries));
        match index.get(&key) {
            Some(&position) => self.entries[position].raw = raw,
            None => {
                index.insert(key, self.entries.len());
                self.entries.push(PropertyEntry::new(key, raw));
            }
        }
        self.index = OnceCell::from(index);
    }

    /// Overwrites every entry with `key`, duplicates included. Never appends.
    ///
    /// # Returns
    ///
    /// Number of entries written.
    pub fn fill_raw(&mut self, key: impl Into<Key>, raw: S) -> usize {
        let key = key.into();
        let mut written = 0;
        for entry in self.entries.iter_mut().filter(|entry| entry.key == key) {
            entry.raw = raw;
            written += 1;
        }
        written
    }

    /// Appends an entry without looking for an existing one.
    ///
    /// This is how duplicates enter a store (bulk loads, merges). An
    /// existing key keeps resolving to its first occurrence.
    ///
    /// # Returns
    ///
    /// Position of the new entry.
    pub fn push(&mut self, key: impl Into<Key>, raw: S) -> usize {
        let key = key.into();
        let position = self.entries.len();
        self.entries.push(PropertyEntry::new(key, raw));
        if let Some(index) = self.index.get_mut() {
            index.entry(key).or_insert(position);
        }
        position
    }

    /// Removes the first entry with `key`.
    ///
    /// A later duplicate of the same key, if any, becomes visible.
    ///
    /// # Returns
    ///
    /// `true` if an entry was removed.
    pub fn remove(&mut self, key: impl Into<Key>) -> bool {
        match self.position(key) {
            Some(position) => {
                self.entries.remove(position);
                self.index = OnceCell::new();
                true
            }
            None => false,
        }
    }

    /// Removes every entry with `key`.
    ///
    /// # Returns
    ///
    /// Number of entries removed.
    pub fn remove_all(&mut self, key: impl Into<Key>) -> usize {
        let key = key.into();
        let before = self.entries.len();
        self.entries.retain(|entry| entry.key != key);
        let removed = before - self.entries.len();
        if removed > 0 {
            self.index = OnceCell::new();
        }
        removed
    }

    /// Removes every entry shadowed by an earlier entry with the same key.
    ///
    /// Keyed reads return the same values before and after.
    ///
    /// # Returns
    ///
    /// Number of entries removed.
    pub fn remove_duplicates(&mut self) -> usize {
        let before = self.entries.len();
        let mut seen = HashSet::with_capacity(before);
        self.entries.retain(|entry| seen.insert(entry.key));
        let removed = before - self.entries.len();
        if removed > 0 {
            self.index = OnceCell::new();
        }
        removed
    }

    /// Removes every entry. The store stays indexed (empty).
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = OnceCell::from(HashMap::new());
    }

    /// Entries in stored order.
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[PropertyEntry<S>] {
        &self.entries
    }

    /// Iterates entries in stored order, duplicates included.
    pub fn iter(&self) -> std::slice::Iter<'_, PropertyEntry<S>> {
        self.entries.iter()
    }

    /// Iterates keys in stored order, duplicates included.
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.entries.iter().map(|entry| entry.key)
    }

    /// Number of entries, duplicates included.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store has no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if some key occurs more than once.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.index().len() != self.entries.len()
    }

    /// Keys occurring more than once, with their occurrence counts, in order
    /// of first appearance.
    #[must_use]
    pub fn duplicates(&self) -> Vec<(Key, usize)> {
        let mut counts: HashMap<Key, usize> = HashMap::with_capacity(self.entries.len());
        let mut order = Vec::new();
        for entry in &self.entries {
            let count = counts.entry(entry.key).or_insert(0);
            if *count == 0 {
                order.push(entry.key);
            }
            *count += 1;
        }
        order
            .into_iter()
            .filter_map(|key| {
                let count = counts.get(&key).copied().unwrap_or(0);
                (count > 1).then_some((key, count))
            })
            .collect()
    }

    /// Reads the first entry with `key` as enum `E`.
    ///
    /// # Returns
    ///
    /// `None` if the key is absent or its value is not a member of `E`.
    #[must_use]
    pub fn get_enum<E: PropertyEnum>(&self, key: impl Into<Key>) -> Option<E> {
        self.try_get::<i32>(key).and_then(E::from_raw)
    }

    /// Writes an enum member under `key`.
    pub fn set_enum<E: PropertyEnum>(&mut self, key: impl Into<Key>, value: E) {
        self.set(key, value.to_raw());
    }

    /// Returns `true` if the mask under `key` has any bit of `flag`.
    /// An absent key has no flags.
    #[must_use]
    pub fn has_flag<E: PropertyEnum>(&self, key: impl Into<Key>, flag: E) -> bool {
        self.try_get::<i32>(key)
            .is_some_and(|raw| has_flag(raw, flag.to_raw()))
    }

    /// Sets the bits of `flag` in the mask under `key`, creating it if absent.
    pub fn add_flag<E: PropertyEnum>(&mut self, key: impl Into<Key>, flag: E) {
        let key = key.into();
        let raw = self.try_get::<i32>(key).unwrap_or(0);
        self.set(key, add_flag(raw, flag.to_raw()));
    }

    /// Clears the bits of `flag` in the mask under `key`. Absent keys stay absent.
    pub fn remove_flag<E: PropertyEnum>(&mut self, key: impl Into<Key>, flag: E) {
        let key = key.into();
        if let Some(raw) = self.try_get::<i32>(key) {
            self.set(key, remove_flag(raw, flag.to_raw()));
        }
    }

    /// Clears every bit of the mask under `key`. Absent keys stay absent.
    pub fn clear_flags(&mut self, key: impl Into<Key>) {
        let key = key.into();
        if self.contains(key) {
            self.set(key, 0_i32);
        }
    }
}

impl<S: Slot> PartialEq for PropertyStore<S> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<S: Slot> FromIterator<(Key, S)> for PropertyStore<S> {
    /// Collects raw pairs as-is, duplicates included.
    fn from_iter<I: IntoIterator<Item = (Key, S)>>(iter: I) -> Self {
        Self::from_entries(
            iter.into_iter()
                .map(|(key, raw)| PropertyEntry::new(key, raw))
                .collect(),
        )
    }
}

impl<'a, S: Slot> IntoIterator for &'a PropertyStore<S> {
    type Item = &'a PropertyEntry<S>;
    type IntoIter = std::slice::Iter<'a, PropertyEntry<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::property_enum! {
        flags TagType {
            Tag1 = 1,
            Tag2 = 2,
            Tag3 = 4,
        }
    }

    crate::property_enum! {
        enum WeaponType {
            Sword = 0,
            Bow = 1,
        }
    }

    const HEALTH: Key = 1;
    const SPEED: Key = 2;
    const TAGS: Key = 3;

    #[test]
    fn test_set_then_get() {
        let mut store = Store32::new();
        store.set(HEALTH, 100_i32);
        store.set(SPEED, 2.5_f32);

        assert_eq!(store.try_get::<i32>(HEALTH), Some(100));
        assert_eq!(store.try_get::<f32>(SPEED), Some(2.5));
        assert_eq!(store.try_get::<i32>(99), None);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_set_overwrites_in_place() {
        let mut store = Store32::new();
        store.set(HEALTH, 1_i32);
        store.set(SPEED, 2_i32);
        store.set(HEALTH, 3_i32);

        assert_eq!(store.len(), 2);
        assert_eq!(store.keys().collect::<Vec<_>>(), vec![HEALTH, SPEED]);
        assert_eq!(store.try_get::<i32>(HEALTH), Some(3));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let mut store: Store32 = [(HEALTH, 5), (HEALTH, 7)].into_iter().collect();
        assert!(!store.is_indexed());

        assert_eq!(store.try_get::<i32>(HEALTH), Some(5));
        assert!(store.is_indexed());
        assert!(store.has_duplicates());
        assert_eq!(store.duplicates(), vec![(HEALTH, 2)]);

        // set touches the first entry only
        store.set(HEALTH, 9_i32);
        assert_eq!(store.entries()[0].raw, 9);
        assert_eq!(store.entries()[1].raw, 7);

        // removing the first exposes the second
        assert!(store.remove(HEALTH));
        assert!(!store.is_indexed());
        assert_eq!(store.try_get::<i32>(HEALTH), Some(7));
    }

    #[test]
    fn test_push_keeps_first_occurrence_indexed() {
        let mut store = Store32::new();
        store.set(HEALTH, 1_i32);
        let position = store.push(HEALTH, 2);

        assert_eq!(position, 1);
        assert_eq!(store.try_get::<i32>(HEALTH), Some(1));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_fill_raw_writes_every_occurrence() {
        let mut store: Store32 = [(HEALTH, 1), (SPEED, 2), (HEALTH, 3)].into_iter().collect();

        assert_eq!(store.fill_raw(HEALTH, 9), 2);
        let raws: Vec<i32> = store.iter().map(|entry| entry.raw).collect();
        assert_eq!(raws, vec![9, 2, 9]);

        assert_eq!(store.fill_raw(99, 1), 0);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut store = Store32::new();
        store.set(HEALTH, 1_i32);
        assert!(store.try_get::<i32>(HEALTH).is_some());

        assert!(!store.remove(SPEED));
        assert!(store.is_indexed());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_all_and_duplicates() {
        let mut store: Store32 = [(HEALTH, 1), (SPEED, 2), (HEALTH, 3), (SPEED, 4), (HEALTH, 5)]
            .into_iter()
            .collect();

        assert_eq!(store.remove_duplicates(), 3);
        assert!(!store.has_duplicates());
        assert_eq!(store.try_get::<i32>(SPEED), Some(2));

        store.push(HEALTH, 8);
        assert_eq!(store.remove_all(HEALTH), 2);
        assert!(!store.contains(HEALTH));
        assert_eq!(store.remove_all(HEALTH), 0);
    }

    #[test]
    fn test_rebuild_index_is_idempotent() {
        let mut store: Store32 = [(HEALTH, 1), (SPEED, 2), (HEALTH, 3)].into_iter().collect();
        store.rebuild_index();
        let once = store.clone();
        store.rebuild_index();

        assert_eq!(store, once);
        assert_eq!(store.position(HEALTH), Some(0));
        assert_eq!(store.position(SPEED), Some(1));
    }

    #[test]
    fn test_clear_leaves_indexed_empty() {
        let mut store = Store64::new();
        store.set(HEALTH, 5_i64);
        store.clear();

        assert!(store.is_empty());
        assert!(store.is_indexed());
        assert!(!store.contains(HEALTH));
    }

    #[test]
    fn test_wide_store_holds_narrow_values() {
        let mut store = Store64::new();
        store.set(HEALTH, -1_i32);
        store.set(SPEED, 1.0_f64);

        assert_eq!(store.get_raw(HEALTH), Some(0xffff_ffff));
        assert_eq!(store.try_get::<i32>(HEALTH), Some(-1));
        assert_eq!(store.try_get::<f64>(SPEED), Some(1.0));
    }

    #[test]
    fn test_enum_and_flags() {
        let mut store = Store32::new();
        store.set_enum(HEALTH, WeaponType::Bow);
        assert_eq!(store.get_enum::<WeaponType>(HEALTH), Some(WeaponType::Bow));

        store.set(SPEED, 42_i32);
        assert_eq!(store.get_enum::<WeaponType>(SPEED), None);

        assert!(!store.has_flag(TAGS, TagType::Tag1));
        store.add_flag(TAGS, TagType::Tag1);
        store.add_flag(TAGS, TagType::Tag3);
        assert_eq!(store.try_get::<i32>(TAGS), Some(5));
        assert!(store.has_flag(TAGS, TagType::Tag3));

        store.remove_flag(TAGS, TagType::Tag1);
        assert_eq!(store.try_get::<i32>(TAGS), Some(4));

        store.clear_flags(TAGS);
        assert_eq!(store.try_get::<i32>(TAGS), Some(0));
        assert!(store.contains(TAGS));
    }

    #[test]
    fn test_enum_in_wide_store() {
        let mut store = Store64::new();
        store.add_flag(TAGS, TagType::Tag2);
        assert_eq!(store.get_raw(TAGS), Some(2));
        assert!(store.has_flag(TAGS, TagType::Tag2));
    }

    #[test]
    fn test_serializes_as_entry_list() {
        let mut store = Store32::new();
        store.set(HEALTH, 100_i32);
        store.push(HEALTH, 7);

        let json = serde_json::to_string(&store).unwrap();
        assert_eq!(json, r#"[{"key":1,"raw":100},{"key":1,"raw":7}]"#);

        let back: Store32 = serde_json::from_str(&json).unwrap();
        assert!(!back.is_indexed());
        assert_eq!(back, store);
        assert_eq!(back.try_get::<i32>(HEALTH), Some(100));
    }
}
