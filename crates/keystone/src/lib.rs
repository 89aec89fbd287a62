//! # KEYSTONE
//!
//! Typed property bags for game entities.
//!
//! An entity carries a [`PropertySet`]: two flat stores of `(key, raw)`
//! entries, one 32 bits wide and one 64 bits wide. What a key means (its
//! kind, range, group and default) lives in a [`KeySchema`] bound to a
//! [`MetadataContext`], never in the set itself.
//!
//! ## Crate Structure
//!
//! - [`keystone_core`]: slots, stores and the routed set. Never validates.
//! - [`keystone_meta`]: schemas, metadata and the resolver context.
//! - this crate: typed access, grouping, the add menu, diagnostics,
//!   reports and settings.
//!
//! ## Example
//!
//! ```rust,ignore
//! use keystone::prelude::*;
//!
//! let mut context = MetadataContext::new();
//! Settings::load("data/keystone.toml")?.bind(&mut context)?;
//!
//! let mut set = PropertySet::new();
//! add_key(&mut set, &context, CharacterKeys::Health)?;
//! assert_eq!(get_value(&set, &context, CharacterKeys::Health)?, Some(Value::Int(100)));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod catalog;
pub mod diagnostics;
pub mod error;
pub mod grouping;
pub mod report;
pub mod settings;
pub mod typed;

pub use catalog::{add_group, add_single, AddMenu, MenuGroup, MenuItem};
pub use diagnostics::Diagnostics;
pub use error::{PropertyError, PropertyResult};
pub use grouping::{
    axis_score, composite_rows, group_members, read_composite, write_composite, Composite, Group,
    GroupMember, Row,
};
pub use report::PropertyReport;
pub use settings::Settings;
pub use typed::{
    add_key, apply_default, apply_defaults, get_value, require_metadata, set_value, Value,
};

pub use keystone_core::{
    property_enum, DateTimeTicks, Key, PropertyEntry, PropertyEnum, PropertySet, PropertyStore,
    RoutedValue, Scalar, SlotKind, SlotWidth, Store32, Store64, TimeSpanTicks, ValueUnion32,
    ValueUnion64, NO_KEY,
};
pub use keystone_meta::{
    property_keys, DefaultValue, EnumInfo, GroupKind, KeyDescriptor, KeySchema, MetaError,
    Metadata, MetadataContext, MetadataResolver, SchemaResolver, StorageWidth, ValueKind,
};
pub use keystone_shared::{Color, Vec2, Vec3, Vec4};

/// Everything a host usually needs.
pub mod prelude {
    pub use crate::catalog::{add_group, add_single, AddMenu};
    pub use crate::error::{PropertyError, PropertyResult};
    pub use crate::grouping::{composite_rows, read_composite, write_composite, Composite, Row};
    pub use crate::settings::Settings;
    pub use crate::typed::{add_key, apply_defaults, get_value, set_value, Value};
    pub use keystone_core::{
        property_enum, DateTimeTicks, Key, PropertyEnum, PropertySet, TimeSpanTicks,
    };
    pub use keystone_meta::{property_keys, KeyDescriptor, KeySchema, MetadataContext};
}
