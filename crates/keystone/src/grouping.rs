//! # Composite Grouping
//!
//! Scalar float keys that share a group name are presented and edited as
//! one vector or color.
//!
//! ## Rules
//!
//! - Only 32-bit float keys with a group name take part
//! - Group names compare case-insensitively; the first spelling seen wins
//! - The group kind comes from the first member's metadata
//! - Members are ordered by axis suffix (`x y z w`, or `r g b a` for colors);
//!   unmatched labels sort last, ties keep their incoming order
//! - A group needs at least 2 members to be a composite, and only its first
//!   4 members are part of the composite value
//!
//! Grouping never creates or removes entries. Write-back touches only the
//! entries that already exist.

use keystone_core::{Key, PropertySet, SlotWidth, Store32};
use keystone_meta::{GroupKind, MetadataContext};
use keystone_shared::{Color, Vec2, Vec3, Vec4};
use std::collections::{HashMap, HashSet};

/// Score of a label that ends in no recognised axis.
pub const UNMATCHED_AXIS: u8 = u8::MAX;

/// Most members a composite value can have.
pub const MAX_COMPONENTS: usize = 4;

/// Axis position of a member label.
///
/// The label is trimmed and lowercased; a trailing `x`/`y`/`z`/`w` scores
/// `0..=3`, or `r`/`g`/`b`/`a` for [`GroupKind::Color`].
#[must_use]
pub fn axis_score(label: &str, kind: GroupKind) -> u8 {
    let axes: [char; 4] = match kind {
        GroupKind::Color => ['r', 'g', 'b', 'a'],
        _ => ['x', 'y', 'z', 'w'],
    };
    let label = label.trim().to_lowercase();
    let Some(last) = label.chars().last() else {
        return UNMATCHED_AXIS;
    };
    (0_u8..)
        .zip(axes)
        .find_map(|(score, axis)| (axis == last).then_some(score))
        .unwrap_or(UNMATCHED_AXIS)
}

/// A member of a group, with its ordering score.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupMember {
    /// The member key.
    pub key: Key,
    /// Display label the score was computed from.
    pub label: String,
    /// Axis score, [`UNMATCHED_AXIS`] if none.
    pub score: u8,
}

/// Keys sharing a group name, in composite order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    /// Group name as first seen.
    pub name: String,
    /// Composite kind, from the first member.
    pub kind: GroupKind,
    /// Members, ordered.
    pub members: Vec<GroupMember>,
}

impl Group {
    /// Returns `true` if the group is shown as one composite value.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.members.len() >= 2
    }

    /// Members that make up the composite value.
    #[must_use]
    pub fn visible(&self) -> &[GroupMember] {
        &self.members[..self.members.len().min(MAX_COMPONENTS)]
    }

    /// Members past the composite clamp, still individually stored.
    #[must_use]
    pub fn overflow(&self) -> &[GroupMember] {
        &self.members[self.members.len().min(MAX_COMPONENTS)..]
    }

    /// Component count of the composite value.
    ///
    /// Colors always have 4. Vectors have as many as the kind declares,
    /// capped by the visible members; a group of kind `None` takes the
    /// visible member count.
    #[must_use]
    pub fn arity(&self) -> usize {
        let visible = self.visible().len();
        match self.kind {
            GroupKind::Color => MAX_COMPONENTS,
            GroupKind::None => visible,
            kind => kind.arity().map_or(visible, |arity| arity.min(visible)),
        }
    }

    /// Member keys in composite order.
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.members.iter().map(|member| member.key)
    }
}

/// Partitions `keys` into groups.
///
/// Keys without metadata, non-float keys, wide keys and keys without a
/// group name are ignored. Repeated keys count once.
#[must_use]
pub fn group_members(keys: impl IntoIterator<Item = Key>, context: &MetadataContext) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();
    let mut seen = HashSet::new();

    for key in keys {
        if !seen.insert(key) {
            continue;
        }
        let Some(meta) = context.resolve(key) else {
            continue;
        };
        if !meta.is_grouped() {
            continue;
        }
        let Some(name) = meta.group.as_deref() else {
            continue;
        };

        let slot = *by_name.entry(name.to_lowercase()).or_insert_with(|| {
            groups.push(Group {
                name: name.to_string(),
                kind: meta.group_kind,
                members: Vec::new(),
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.members.push(GroupMember {
            key,
            label: meta.label().to_string(),
            score: axis_score(meta.label(), group.kind),
        });
    }

    for group in &mut groups {
        group.members.sort_by_key(|member| member.score);
    }
    groups
}

/// A reconstructed composite value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Composite {
    /// Two components.
    Vector2(Vec2),
    /// Three components.
    Vector3(Vec3),
    /// Four components.
    Vector4(Vec4),
    /// RGBA color.
    Color(Color),
}

impl Composite {
    /// Components in member order and how many are meaningful.
    #[must_use]
    pub const fn components(&self) -> ([f32; 4], usize) {
        match *self {
            Self::Vector2(v) => ([v.x, v.y, 0.0, 0.0], 2),
            Self::Vector3(v) => ([v.x, v.y, v.z, 0.0], 3),
            Self::Vector4(v) => (v.to_array(), 4),
            Self::Color(c) => (c.to_array(), 4),
        }
    }
}

/// Builds the composite value of `group` from `store`.
///
/// # Returns
///
/// `None` if the group has fewer than 2 members. Color channels without a
/// member are `1.0`; absent entries read as `0.0`.
#[must_use]
pub fn read_composite(store: &Store32, group: &Group) -> Option<Composite> {
    if !group.is_composite() {
        return None;
    }

    let fill = if group.kind == GroupKind::Color { 1.0 } else { 0.0 };
    let mut components = [fill; 4];
    for (component, member) in components.iter_mut().zip(group.visible()) {
        *component = store.try_get::<f32>(member.key).unwrap_or(0.0);
    }

    Some(match (group.kind, group.arity()) {
        (GroupKind::Color, _) => Composite::Color(Color::from_array(components)),
        (_, 2) => Composite::Vector2(Vec2::new(components[0], components[1])),
        (_, 3) => Composite::Vector3(Vec3::new(components[0], components[1], components[2])),
        _ => Composite::Vector4(Vec4::from_array(components)),
    })
}

/// Writes `value` back over the group's member entries, in member order.
///
/// Members without an entry in `store` are skipped, and so are components
/// beyond the group's arity.
///
/// # Returns
///
/// Number of entries written.
pub fn write_composite(store: &mut Store32, group: &Group, value: Composite) -> usize {
    let (components, len) = value.components();
    let len = len.min(group.arity());
    let mut written = 0;
    for (member, component) in group.visible().iter().zip(components).take(len) {
        if store.contains(member.key) {
            store.set(member.key, component);
            written += 1;
        }
    }
    written
}

/// One row of the inspector model.
#[derive(Clone, Debug, PartialEq)]
pub enum Row {
    /// A composite group of the 32-bit store.
    Composite {
        /// The group.
        group: Group,
        /// Some member key occurs more than once, or in both stores.
        flagged: bool,
    },
    /// A single entry.
    Scalar {
        /// Store holding the entry.
        width: SlotWidth,
        /// Position in that store.
        position: usize,
        /// The entry key.
        key: Key,
        /// The key occurs more than once in this store.
        duplicate: bool,
        /// The key is in both stores.
        cross_store: bool,
    },
}

/// Builds the inspector rows of `set`.
///
/// Composite groups come first, then every 32-bit entry not shown inside a
/// composite, then every 64-bit entry, each in stored order. Duplicated
/// entries all get their own row.
#[must_use]
pub fn composite_rows(set: &PropertySet, context: &MetadataContext) -> Vec<Row> {
    let cross = set.cross_store_duplicates();
    let duplicated = |width: SlotWidth| -> HashSet<Key> {
        let duplicates = match width {
            SlotWidth::Bit32 => set.store32().duplicates(),
            SlotWidth::Bit64 => set.store64().duplicates(),
        };
        duplicates.into_iter().map(|(key, _)| key).collect()
    };
    let duplicates32 = duplicated(SlotWidth::Bit32);
    let duplicates64 = duplicated(SlotWidth::Bit64);

    let mut rows = Vec::new();
    let mut in_composite = HashSet::new();
    for group in group_members(set.store32().keys(), context) {
        if !group.is_composite() {
            continue;
        }
        let flagged = group
            .visible()
            .iter()
            .any(|member| duplicates32.contains(&member.key) || cross.contains(&member.key));
        in_composite.extend(group.visible().iter().map(|member| member.key));
        rows.push(Row::Composite { group, flagged });
    }

    for (position, entry) in set.store32().iter().enumerate() {
        // Later duplicates of a composite member still get a row
        let first = set.store32().position(entry.key) == Some(position);
        if first && in_composite.contains(&entry.key) {
            continue;
        }
        rows.push(Row::Scalar {
            width: SlotWidth::Bit32,
            position,
            key: entry.key,
            duplicate: duplicates32.contains(&entry.key),
            cross_store: cross.contains(&entry.key),
        });
    }

    for (position, entry) in set.store64().iter().enumerate() {
        rows.push(Row::Scalar {
            width: SlotWidth::Bit64,
            position,
            key: entry.key,
            duplicate: duplicates64.contains(&entry.key),
            cross_store: cross.contains(&entry.key),
        });
    }

    rows
}
