//! # Slot Values
//!
//! Everything a raw slot can be read as.
//!
//! ## Design Philosophy
//!
//! - A slot is a bare `i32` or `i64` with no discriminant
//! - Every bit pattern is a valid input to every decode
//! - Narrow values (int, float, bool, enum) live in the low 32 bits of a
//!   64-bit slot, with the upper half zeroed on write

mod enums;
mod time;
mod union;

pub use self::enums::{add_flag, has_flag, remove_flag, PropertyEnum};
pub use self::time::{DateTimeTicks, TimeSpanTicks, TICKS_PER_SECOND};
pub use self::union::{Scalar, Slot, SlotKind, SlotValue, SlotWidth, ValueUnion32, ValueUnion64};
