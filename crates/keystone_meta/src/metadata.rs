//! # Metadata Records
//!
//! What a key means: its kind, bounds, step, enum decoding, composite group
//! and default. Built by the resolver from a registered descriptor and
//! shared as `Arc<Metadata>` for the lifetime of a binding.

use crate::kind::{GroupKind, StorageWidth, ValueKind};
use keystone_core::{DateTimeTicks, Key, PropertyEnum, SlotWidth, TimeSpanTicks};
use std::fmt::Write as _;
use std::sync::Arc;

/// Type-erased default value of a key.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DefaultValue {
    /// Integer default.
    Int(i32),
    /// Float default.
    Float(f32),
    /// Boolean default.
    Bool(bool),
    /// Enum default, as the member's underlying value.
    Enum(i32),
    /// 64-bit integer default.
    Long(i64),
    /// 64-bit float default.
    Double(f64),
    /// Point-in-time default.
    DateTime(DateTimeTicks),
    /// Duration default.
    TimeSpan(TimeSpanTicks),
}

impl DefaultValue {
    /// Enum default from a typed member.
    #[must_use]
    pub fn from_enum<E: PropertyEnum>(member: E) -> Self {
        Self::Enum(member.to_raw())
    }

    /// Kind this default was written as.
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
}

macro_rules! impl_default_from {
    ($($ty:ty => $variant:ident),*) => {
        $(
            impl From<$ty> for DefaultValue {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_default_from!(
    i32 => Int,
    f32 => Float,
    bool => Bool,
    i64 => Long,
    f64 => Double,
    DateTimeTicks => DateTime,
    TimeSpanTicks => TimeSpan
);

/// Owned description of an enum type backing `Enum` keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumInfo {
    /// Type name.
    pub name: String,
    /// Members in declaration order.
    pub members: Vec<(String, i32)>,
    /// Whether members combine as bit flags.
    pub flags: bool,
}

impl EnumInfo {
    /// Creates enum info from explicit parts.
    #[must_use]
    pub fn new(name: impl Into<String>, members: Vec<(String, i32)>, flags: bool) -> Self {
        Self {
            name: name.into(),
            members,
            flags,
        }
    }

    /// Captures the members of a [`PropertyEnum`].
    #[must_use]
    pub fn of<E: PropertyEnum>() -> Self {
        Self::new(
            E::NAME,
            E::MEMBERS
                .iter()
                .map(|(name, value)| ((*name).to_string(), *value))
                .collect(),
            E::FLAGS,
        )
    }

    /// Name of the member with value `raw`.
    #[must_use]
    pub fn member_name(&self, raw: i32) -> Option<&str> {
        self.members
            .iter()
            .find(|(_, value)| *value == raw)
            .map(|(name, _)| name.as_str())
    }

    /// Value of the member called `name`.
    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<i32> {
        self.members
            .iter()
            .find(|(member, _)| member == name)
            .map(|(_, value)| *value)
    }

    /// Human readable form of `raw`.
    ///
    /// An exact member prints its name. A flags mask that decomposes fully
    /// into nonzero members prints them as `A, B`. Anything else prints the
    /// number.
    #[must_use]
    pub fn label(&self, raw: i32) -> String {
        if let Some(name) = self.member_name(raw) {
            return name.to_string();
        }
        if self.flags && raw != 0 {
            let mut remaining = raw;
            let mut label = String::new();
            for (name, value) in &self.members {
                if *value != 0 && raw & value == *value {
                    if !label.is_empty() {
                        label.push_str(", ");
                    }
                    label.push_str(name);
                    remaining &= !value;
                }
            }
            if remaining == 0 {
                return label;
            }
        }
        raw.to_string()
    }
}

/// Resolved metadata of one key.
#[derive(Clone, Debug, PartialEq)]
pub struct Metadata {
    /// The key.
    pub key: Key,
    /// Member name of the key.
    pub name: String,
    /// Optional display name.
    pub display_name: Option<String>,
    /// Declared kind.
    pub kind: ValueKind,
    /// Storage hint.
    pub width: StorageWidth,
    /// Lower bound.
    pub min: Option<f64>,
    /// Upper bound.
    pub max: Option<f64>,
    /// Edit step.
    pub step: Option<f64>,
    /// Backing enum, for `Enum` keys.
    pub enum_info: Option<Arc<EnumInfo>>,
    /// Composite group name.
    pub group: Option<String>,
    /// Composite group kind, explicit or derived from the group name.
    pub group_kind: GroupKind,
    /// Declared default.
    pub default: Option<DefaultValue>,
    /// Excluded from add menus.
    pub hidden: bool,
}

impl Metadata {
    /// Minimal record: a key of `kind` with nothing else declared.
    #[must_use]
    pub fn new(key: Key, name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            key,
            name: name.into(),
            display_name: None,
            kind,
            width: StorageWidth::Both,
            min: None,
            max: None,
            step: None,
            enum_info: None,
            group: None,
            group_kind: GroupKind::None,
            default: None,
            hidden: false,
        }
    }

    /// Display name, falling back to the member name.
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// Store the key belongs in.
    ///
    /// Wide kinds always go to the 64-bit store. Narrow kinds go to the
    /// 32-bit store unless the hint asks for 64.
    #[must_use]
    pub const fn storage_width(&self) -> SlotWidth {
        match (self.kind.natural_width(), self.width) {
            (SlotWidth::Bit32, StorageWidth::Bit64) | (SlotWidth::Bit64, _) => SlotWidth::Bit64,
            (SlotWidth::Bit32, _) => SlotWidth::Bit32,
        }
    }

    /// Returns `true` if this key takes part in composite grouping: a
    /// 32-bit float with a group name.
    #[must_use]
    pub fn is_grouped(&self) -> bool {
        self.group.is_some()
            && self.kind == ValueKind::Float
            && matches!(self.storage_width(), SlotWidth::Bit32)
    }

    /// Clamps `value` into the declared bounds.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        let value = self.min.map_or(value, |min| value.max(min));
        self.max.map_or(value, |max| value.min(max))
    }

    /// Quantizes `value` to the declared step, measured from `min` (or 0),
    /// then clamps it.
    #[must_use]
    pub fn snap(&self, value: f64) -> f64 {
        let snapped = match self.step {
            Some(step) if step > 0.0 => {
                let origin = self.min.unwrap_or(0.0);
                origin + ((value - origin) / step).round() * step
            }
            _ => value,
        };
        self.clamp(snapped)
    }

    /// One-line summary used by reports and logs.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut text = format!("{} ({:?}", self.label(), self.kind);
        if let Some(info) = &self.enum_info {
            let _ = write!(text, " {}", info.name);
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            let _ = write!(text, " {min}..{max}");
        }
        if let Some(group) = &self.group {
            let _ = write!(text, " in {group}");
        }
        text.push(')');
        text
    }
}
