//! # Add Menu
//!
//! Which keys can still be added to a property set, shaped the way an
//! editor menu presents them.
//!
//! A key is offered when the bound schema declares it, it is not hidden,
//! it is not [`NO_KEY`], and neither store holds it yet. Grouped float keys
//! are offered together as one group entry; everything else is a single
//! entry tagged with the store it will go to.

use crate::error::{PropertyError, PropertyResult};
use crate::grouping::axis_score;
use crate::typed::{add_key, require_metadata};
use keystone_core::{Key, PropertySet, SlotWidth, NO_KEY};
use keystone_meta::{GroupKind, MetadataContext};
use std::collections::HashMap;

/// A group of keys added together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuGroup {
    /// Group name as first declared.
    pub name: String,
    /// Composite kind of the group.
    pub kind: GroupKind,
    /// Member keys in composite order.
    pub keys: Vec<Key>,
}

impl MenuGroup {
    /// Menu text, with the composite kind in parentheses when known.
    #[must_use]
    pub fn label(&self) -> String {
        match self.kind {
            GroupKind::None => self.name.clone(),
            kind => format!("{} ({})", self.name, kind.label()),
        }
    }
}

/// A single key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuItem {
    /// The key.
    pub key: Key,
    /// Display label.
    pub label: String,
    /// Store the key will be added to.
    pub width: SlotWidth,
}

/// Everything that can still be added.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AddMenu {
    /// Group entries, sorted by name case-insensitively.
    pub groups: Vec<MenuGroup>,
    /// Single entries, sorted by label case-insensitively.
    pub singles: Vec<MenuItem>,
}

impl AddMenu {
    /// Builds the menu for `set`. Empty when the context is unbound.
    #[must_use]
    pub fn build(set: &PropertySet, context: &MetadataContext) -> Self {
        let mut menu = Self::default();
        let mut group_slots: HashMap<String, usize> = HashMap::new();
        let mut scores: Vec<Vec<u8>> = Vec::new();

        for key in context.values() {
            if key == NO_KEY || set.contains_any(key) {
                continue;
            }
            let Some(meta) = context.resolve(key) else {
                continue;
            };
            if meta.hidden {
                continue;
            }

            match meta.group.as_deref().filter(|_| meta.is_grouped()) {
                Some(name) => {
                    let slot = *group_slots.entry(name.to_lowercase()).or_insert_with(|| {
                        menu.groups.push(MenuGroup {
                            name: name.to_string(),
                            kind: meta.group_kind,
                            keys: Vec::new(),
                        });
                        scores.push(Vec::new());
                        menu.groups.len() - 1
                    });
                    menu.groups[slot].keys.push(key);
                    scores[slot].push(axis_score(meta.label(), menu.groups[slot].kind));
                }
                None => menu.singles.push(MenuItem {
                    key,
                    label: meta.label().to_string(),
                    width: meta.storage_width(),
                }),
            }
        }

        for (group, scores) in menu.groups.iter_mut().zip(scores) {
            let mut ordered: Vec<(u8, Key)> = scores.into_iter().zip(group.keys.iter().copied()).collect();
            ordered.sort_by_key(|(score, _)| *score);
            group.keys = ordered.into_iter().map(|(_, key)| key).collect();
        }
        menu.groups.sort_by_cached_key(|group| group.name.to_lowercase());
        menu.singles
            .sort_by_cached_key(|item| (item.label.to_lowercase(), item.key));
        menu
    }

    /// Single entries bound for the `width` store.
    pub fn singles_for(&self, width: SlotWidth) -> impl Iterator<Item = &MenuItem> + '_ {
        self.singles.iter().filter(move |item| item.width == width)
    }

    /// Returns `true` if nothing can be added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.singles.is_empty()
    }
}

/// Adds every member of `group` that is not yet present, with defaults.
///
/// # Returns
///
/// Number of keys added.
///
/// # Errors
///
/// [`PropertyError::Unbound`] or [`PropertyError::UnknownKey`].
pub fn add_group(
    set: &mut PropertySet,
    context: &MetadataContext,
    group: &MenuGroup,
) -> PropertyResult<usize> {
    let mut added = 0;
    for &key in &group.keys {
        if set.contains_any(key) {
            continue;
        }
        add_key(set, context, key)?;
        added += 1;
    }
    Ok(added)
}

/// Adds the key of `item` to the store the menu chose, with its default.
///
/// # Errors
///
/// [`PropertyError::WidthMismatch`] if the item's store cannot hold the
/// key's kind, plus the errors of [`add_key`].
pub fn add_single(
    set: &mut PropertySet,
    context: &MetadataContext,
    item: &MenuItem,
) -> PropertyResult<()> {
    let meta = require_metadata(context, item.key)?;
    if meta.storage_width() != item.width {
        return Err(PropertyError::WidthMismatch {
            name: meta.name.clone(),
            kind: meta.kind,
            width: item.width,
        });
    }
    add_key(set, context, item.key)?;
    Ok(())
}
