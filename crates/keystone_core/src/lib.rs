//! # KEYSTONE Core
//!
//! Tagless, fixed-width property storage for designer-defined attributes.
//!
//! An entity carries a [`PropertySet`]: two ordered logs of `(key, raw)`
//! entries, one with 32-bit slots and one with 64-bit slots. A slot has no
//! type tag. Whether its bits are an `i32`, an `f32` or a `bool` is decided
//! by whoever reads it, usually with the help of the metadata table in
//! `keystone_meta`.
//!
//! ## Architecture Rules
//!
//! 1. **Storage never validates** - reading a slot as the "wrong" type is a
//!    bit reinterpretation, not an error
//! 2. **Absence is normal** - lookups return `Option`/`bool`, never panic
//! 3. **Duplicates are tolerated** - the first occurrence of a key wins for
//!    keyed lookups, later ones stay in the log until someone removes them
//!
//! ## Example
//!
//! ```rust,ignore
//! use keystone_core::PropertySet;
//!
//! let mut set = PropertySet::new();
//! set.set(HEALTH, 100_i32);
//! set.set(SPAWN_TIME, DateTimeTicks::UNIX_EPOCH); // routed to the 64-bit store
//! assert_eq!(set.get::<i32>(HEALTH), Some(100));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod set;
pub mod store;
pub mod value;

pub use set::{PropertySet, RoutedValue};
pub use store::{PropertyEntry, PropertyStore, Store32, Store64};
pub use value::{
    add_flag, has_flag, remove_flag, DateTimeTicks, PropertyEnum, Scalar, Slot, SlotKind,
    SlotValue, SlotWidth, TimeSpanTicks, ValueUnion32, ValueUnion64,
};

/// Identifier of a property, the underlying value of a key enum member.
pub type Key = i32;

/// The key value that conventionally means "no key selected".
///
/// Storage does not special-case it; presentation layers skip it.
pub const NO_KEY: Key = 0;
