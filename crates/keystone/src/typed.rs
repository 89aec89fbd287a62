//! # Typed Access
//!
//! Reads and writes that consult the key's metadata to pick the store and
//! the decoding, instead of trusting the caller's type parameter.
//!
//! Raw [`PropertySet`] access stays available and never validates; this
//! layer is where kind checks and defaults live.

use crate::error::{PropertyError, PropertyResult};
use keystone_core::{
    DateTimeTicks, Key, PropertySet, SlotWidth, TimeSpanTicks, ValueUnion32, ValueUnion64,
};
use keystone_meta::{DefaultValue, Metadata, MetadataContext, ValueKind};
use std::sync::Arc;

/// A decoded value of any declared kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    /// 32-bit integer.
    Int(i32),
    /// 32-bit float.
    Float(f32),
    /// Boolean.
    Bool(bool),
    /// Enum member or flag mask.
    Enum(i32),
    /// 64-bit integer.
    Long(i64),
    /// 64-bit float.
    Double(f64),
    /// Point in time.
    DateTime(DateTimeTicks),
    /// Duration.
    TimeSpan(TimeSpanTicks),
}

impl Value {
    /// Kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Bool(_) => ValueKind::Bool,
            Self::Enum(_) => ValueKind::Enum,
            Self::Long(_) => ValueKind::Long,
            Self::Double(_) => ValueKind::Double,
            Self::DateTime(_) => ValueKind::DateTime,
            Self::TimeSpan(_) => ValueKind::TimeSpan,
        }
    }

    /// The all-zero value of `kind`.
    #[must_use]
    pub fn zero(kind: ValueKind) -> Self {
        Self::decode64(kind, 0)
    }

    /// Encodes into a 32-bit slot. `None` for wide kinds.
    #[must_use]
    pub fn encode32(self) -> Option<i32> {
        let union = match self {
            Self::Int(v) | Self::Enum(v) => ValueUnion32::from_int(v),
            Self::Float(v) => ValueUnion32::from_float(v),
            Self::Bool(v) => ValueUnion32::from_bool(v),
            Self::Long(_) | Self::Double(_) | Self::DateTime(_) | Self::TimeSpan(_) => return None,
        };
        Some(union.raw)
    }

    /// Encodes into a 64-bit slot.
    #[must_use]
    pub fn encode64(self) -> i64 {
        let union = match self {
            Self::Int(v) | Self::Enum(v) => ValueUnion64::from_int(v),
            Self::Float(v) => ValueUnion64::from_float(v),
            Self::Bool(v) => ValueUnion64::from_bool(v),
            Self::Long(v) => ValueUnion64::from_long(v),
            Self::Double(v) => ValueUnion64::from_double(v),
            Self::DateTime(v) => ValueUnion64::from_long(v.ticks()),
            Self::TimeSpan(v) => ValueUnion64::from_long(v.ticks()),
        };
        union.raw
    }

    /// Encodes into a slot of `width`. `None` if the kind does not fit.
    #[must_use]
    pub fn encode(self, width: SlotWidth) -> Option<i64> {
        match width {
            SlotWidth::Bit32 => self.encode32().map(i64::from),
            SlotWidth::Bit64 => Some(self.encode64()),
        }
    }

    /// Decodes a 32-bit slot as `kind`. `None` for wide kinds.
    #[must_use]
    pub fn decode32(kind: ValueKind, raw: i32) -> Option<Self> {
        let union = ValueUnion32::from_raw(raw);
        Some(match kind {
            ValueKind::Int => Self::Int(union.as_int()),
            ValueKind::Enum => Self::Enum(union.as_int()),
            ValueKind::Float => Self::Float(union.as_float()),
            ValueKind::Bool => Self::Bool(union.as_bool()),
            ValueKind::Long | ValueKind::Double | ValueKind::DateTime | ValueKind::TimeSpan => {
                return None
            }
        })
    }

    /// Decodes a 64-bit slot as `kind`.
    #[must_use]
    pub fn decode64(kind: ValueKind, raw: i64) -> Self {
        let union = ValueUnion64::from_raw(raw);
        match kind {
            ValueKind::Int => Self::Int(union.as_int()),
            ValueKind::Enum => Self::Enum(union.as_int()),
            ValueKind::Float => Self::Float(union.as_float()),
            ValueKind::Bool => Self::Bool(union.as_bool()),
            ValueKind::Long => Self::Long(union.as_long()),
            ValueKind::Double => Self::Double(union.as_double()),
            ValueKind::DateTime => Self::DateTime(DateTimeTicks(union.as_long())),
            ValueKind::TimeSpan => Self::TimeSpan(TimeSpanTicks(union.as_long())),
        }
    }
}

impl From<DefaultValue> for Value {
    fn from(value: DefaultValue) -> Self {
        match value {
            DefaultValue::Int(v) => Self::Int(v),
            DefaultValue::Float(v) => Self::Float(v),
            DefaultValue::Bool(v) => Self::Bool(v),
            DefaultValue::Enum(v) => Self::Enum(v),
            DefaultValue::Long(v) => Self::Long(v),
            DefaultValue::Double(v) => Self::Double(v),
            DefaultValue::DateTime(v) => Self::DateTime(v),
            DefaultValue::TimeSpan(v) => Self::TimeSpan(v),
        }
    }
}

/// Resolves `key`, distinguishing an unbound context from an unknown key.
///
/// # Errors
///
/// [`PropertyError::Unbound`] or [`PropertyError::UnknownKey`].
pub fn require_metadata(context: &MetadataContext, key: Key) -> PropertyResult<Arc<Metadata>> {
    if !context.is_bound() {
        return Err(PropertyError::Unbound);
    }
    context.resolve(key).ok_or(PropertyError::UnknownKey(key))
}

fn other(width: SlotWidth) -> SlotWidth {
    match width {
        SlotWidth::Bit32 => SlotWidth::Bit64,
        SlotWidth::Bit64 => SlotWidth::Bit32,
    }
}

/// Store that currently holds `key` for this metadata: the home store if
/// it has the key, otherwise the other store if it has the key and the
/// kind fits there.
fn holding_store(set: &PropertySet, meta: &Metadata) -> Option<SlotWidth> {
    let home = meta.storage_width();
    if set.contains_in(home, meta.key) {
        return Some(home);
    }
    let fallback = other(home);
    (meta.kind.fits(fallback) && set.contains_in(fallback, meta.key)).then_some(fallback)
}

fn read_raw(set: &PropertySet, width: SlotWidth, kind: ValueKind, key: Key) -> Option<Value> {
    match width {
        SlotWidth::Bit32 => set
            .store32()
            .get_raw(key)
            .and_then(|raw| Value::decode32(kind, raw)),
        SlotWidth::Bit64 => set.store64().get_raw(key).map(|raw| Value::decode64(kind, raw)),
    }
}

/// Writes `value` over the first entry of `key` in the `width` store,
/// appending one if absent.
fn write_raw(set: &mut PropertySet, width: SlotWidth, key: Key, value: Value) -> bool {
    match width {
        SlotWidth::Bit32 => match value.encode32() {
            Some(raw) => {
                set.store32_mut().set_raw(key, raw);
                true
            }
            None => false,
        },
        SlotWidth::Bit64 => {
            set.store64_mut().set_raw(key, value.encode64());
            true
        }
    }
}

/// Reads `key` decoded as its declared kind.
///
/// # Returns
///
/// `Ok(None)` if no store holds the key.
///
/// # Errors
///
/// [`PropertyError::Unbound`] or [`PropertyError::UnknownKey`].
pub fn get_value(
    set: &PropertySet,
    context: &MetadataContext,
    key: impl Into<Key>,
) -> PropertyResult<Option<Value>> {
    let meta = require_metadata(context, key.into())?;
    Ok(holding_store(set, &meta).and_then(|width| read_raw(set, width, meta.kind, meta.key)))
}

/// Writes `key`, checking `value` against the declared kind.
///
/// Updates the store already holding the key, otherwise inserts into the
/// key's home store.
///
/// # Errors
///
/// [`PropertyError::KindMismatch`] if `value` is not of the declared kind,
/// plus the errors of [`require_metadata`].
pub fn set_value(
    set: &mut PropertySet,
    context: &MetadataContext,
    key: impl Into<Key>,
    value: Value,
) -> PropertyResult<()> {
    let meta = require_metadata(context, key.into())?;
    if value.kind() != meta.kind {
        return Err(PropertyError::KindMismatch {
            name: meta.name.clone(),
            expected: meta.kind,
            actual: value.kind(),
        });
    }

    let width = holding_store(set, &meta).unwrap_or_else(|| meta.storage_width());
    if write_raw(set, width, meta.key, value) {
        Ok(())
    } else {
        Err(PropertyError::WidthMismatch {
            name: meta.name.clone(),
            kind: meta.kind,
            width,
        })
    }
}

/// Appends a new entry for `key` to its home store, initialised to the
/// declared default (zero when none is declared or it does not fit).
///
/// This is the "add" path: it does not look for an existing entry, and an
/// existing entry keeps its value.
///
/// # Returns
///
/// The store the entry went to.
///
/// # Errors
///
/// The errors of [`require_metadata`].
pub fn add_key(
    set: &mut PropertySet,
    context: &MetadataContext,
    key: impl Into<Key>,
) -> PropertyResult<SlotWidth> {
    let meta = require_metadata(context, key.into())?;
    let width = meta.storage_width();
    let default = meta.default.map(Value::from);
    match width {
        SlotWidth::Bit32 => {
            let raw = default.and_then(Value::encode32).unwrap_or(0);
            set.store32_mut().push(meta.key, raw);
        }
        SlotWidth::Bit64 => {
            let raw = default.map_or(0, Value::encode64);
            set.store64_mut().push(meta.key, raw);
        }
    }
    Ok(width)
}

/// Writes the declared default of `meta` into every entry of its key in the
/// `width` store, duplicates included.
///
/// # Returns
///
/// `true` if a default was written. A key without a default, without an
/// entry, or whose default does not fit the store is left alone.
pub fn apply_default(set: &mut PropertySet, width: SlotWidth, meta: &Metadata) -> bool {
    let Some(default) = meta.default else {
        return false;
    };
    let value = Value::from(default);
    let written = match width {
        SlotWidth::Bit32 => match value.encode32() {
            Some(raw) => set.store32_mut().fill_raw(meta.key, raw),
            None => {
                if set.contains32(meta.key) {
                    tracing::warn!(
                        key = meta.key,
                        name = %meta.name,
                        default = ?default,
                        "default does not fit the 32-bit store, skipped"
                    );
                }
                0
            }
        },
        SlotWidth::Bit64 => set.store64_mut().fill_raw(meta.key, value.encode64()),
    };
    written > 0
}

/// Rewrites every entry whose key declares a default.
///
/// # Returns
///
/// Number of defaults applied.
///
/// # Errors
///
/// [`PropertyError::Unbound`]. Keys unknown to the schema are skipped.
pub fn apply_defaults(set: &mut PropertySet, context: &MetadataContext) -> PropertyResult<usize> {
    if !context.is_bound() {
        return Err(PropertyError::Unbound);
    }

    let mut applied = 0;
    for width in [SlotWidth::Bit32, SlotWidth::Bit64] {
        let keys: Vec<Key> = match width {
            SlotWidth::Bit32 => set.store32().keys().collect(),
            SlotWidth::Bit64 => set.store64().keys().collect(),
        };
        let mut seen = std::collections::HashSet::with_capacity(keys.len());
        for key in keys.into_iter().filter(|key| seen.insert(*key)) {
            if let Some(meta) = context.resolve(key) {
                if apply_default(set, width, &meta) {
                    applied += 1;
                }
            }
        }
    }
    Ok(applied)
}
