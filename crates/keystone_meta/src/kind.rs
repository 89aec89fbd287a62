//! Declared kinds, storage width hints and composite group kinds.

use keystone_core::{SlotKind, SlotWidth};
use serde::{Deserialize, Serialize};

/// The declared interpretation of a key's value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// 32-bit integer.
    Int,
    /// 32-bit float.
    Float,
    /// Boolean.
    Bool,
    /// Member (or flag mask) of an enum, stored as its `i32` value.
    Enum,
    /// 64-bit integer.
    Long,
    /// 64-bit float.
    Double,
    /// Point in time, stored as ticks.
    DateTime,
    /// Duration, stored as ticks.
    TimeSpan,
}

impl ValueKind {
    /// Narrowest slot that can hold this kind.
    #[must_use]
    pub const fn natural_width(self) -> SlotWidth {
        match self {
            Self::Int | Self::Float | Self::Bool | Self::Enum => SlotWidth::Bit32,
            Self::Long | Self::Double | Self::DateTime | Self::TimeSpan => SlotWidth::Bit64,
        }
    }

    /// Primitive decode used for this kind.
    #[must_use]
    pub const fn slot_kind(self) -> SlotKind {
        match self {
            Self::Int | Self::Enum => SlotKind::Int,
            Self::Float => SlotKind::Float,
            Self::Bool => SlotKind::Bool,
            Self::Long | Self::DateTime | Self::TimeSpan => SlotKind::Long,
            Self::Double => SlotKind::Double,
        }
    }

    /// Returns `true` if a slot of `width` can hold this kind.
    #[must_use]
    pub const fn fits(self, width: SlotWidth) -> bool {
        matches!(width, SlotWidth::Bit64) || matches!(self.natural_width(), SlotWidth::Bit32)
    }
}

/// Which store(s) a key may be added to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageWidth {
    /// 32-bit store only.
    #[serde(rename = "32")]
    Bit32,
    /// 64-bit store only.
    #[serde(rename = "64")]
    Bit64,
    /// Either store; the kind decides.
    #[default]
    #[serde(rename = "both")]
    Both,
}

impl StorageWidth {
    /// Returns `true` if this hint permits a slot of `width`.
    #[must_use]
    pub const fn allows(self, width: SlotWidth) -> bool {
        match self {
            Self::Both => true,
            Self::Bit32 => matches!(width, SlotWidth::Bit32),
            Self::Bit64 => matches!(width, SlotWidth::Bit64),
        }
    }
}

/// Shape of a composite group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    /// Not a recognised composite; arity follows the member count.
    #[default]
    None,
    /// Two components, x y.
    Vector2,
    /// Three components, x y z.
    Vector3,
    /// Four components, x y z w.
    Vector4,
    /// RGBA color.
    Color,
}

impl GroupKind {
    /// Derives the kind from a group name, case-insensitively.
    ///
    /// `color`, `vector2`/`vec2`, `vector3`/`vec3` and `vector4`/`vec4` are
    /// recognised; anything else is [`GroupKind::None`].
    #[must_use]
    pub fn from_group_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "color" => Self::Color,
            "vector2" | "vec2" => Self::Vector2,
            "vector3" | "vec3" => Self::Vector3,
            "vector4" | "vec4" => Self::Vector4,
            _ => Self::None,
        }
    }

    /// Fixed component count, if the kind has one.
    #[must_use]
    pub const fn arity(self) -> Option<usize> {
        match self {
            Self::None => None,
            Self::Vector2 => Some(2),
            Self::Vector3 => Some(3),
            Self::Vector4 | Self::Color => Some(4),
        }
    }

    /// Display name of the kind.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Vector2 => "Vector2",
            Self::Vector3 => "Vector3",
            Self::Vector4 => "Vector4",
            Self::Color => "Color",
        }
    }
}
