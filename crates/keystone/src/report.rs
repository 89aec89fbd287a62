//! Plain-text dump of a property set, for logs and debugging.
//!
//! ```text
//!   [32]
//!     - Health: 100 (raw 100)
//!     - Weapon: Bow (raw 1)
//!   [64]
//!     - Time for Spawn: 2024-03-01 12:30:45 UTC (ticks 638448930450000000)
//! ```

use crate::diagnostics::Diagnostics;
use crate::typed::Value;
use keystone_core::{PropertySet, SlotWidth};
use keystone_meta::{Metadata, MetadataContext};
use std::fmt;

/// Displayable report of a property set.
#[derive(Clone, Copy, Debug)]
pub struct PropertyReport<'a> {
    set: &'a PropertySet,
    context: &'a MetadataContext,
}

impl<'a> PropertyReport<'a> {
    /// Creates a report of `set`, labelled through `context`.
    #[must_use]
    pub const fn new(set: &'a PropertySet, context: &'a MetadataContext) -> Self {
        Self { set, context }
    }
}

/// Formats one entry's value as its declared kind.
fn format_value(meta: &Metadata, width: SlotWidth, raw: i64) -> String {
    #[allow(clippy::cast_possible_truncation)]
    let value = match width {
        SlotWidth::Bit32 => Value::decode32(meta.kind, raw as i32),
        SlotWidth::Bit64 => Some(Value::decode64(meta.kind, raw)),
    };
    match value {
        Some(Value::Int(v)) => format!("{v} (raw {raw})"),
        Some(Value::Float(v)) => format!("{v} (raw {raw})"),
        Some(Value::Double(v)) => format!("{v} (raw {raw})"),
        Some(Value::Bool(v)) => format!("{v} (raw {raw})"),
        Some(Value::Enum(v)) => {
            let text = meta
                .enum_info
                .as_ref()
                .map_or_else(|| v.to_string(), |info| info.label(v));
            format!("{text} (raw {raw})")
        }
        Some(Value::Long(v)) => format!("{v} (raw {raw})"),
        Some(Value::DateTime(v)) => format!("{v} (ticks {raw})"),
        Some(Value::TimeSpan(v)) => format!("{v} (ticks {raw})"),
        None => format!("(raw {raw})"),
    }
}

impl fmt::Display for PropertyReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sections: [(SlotWidth, &str, Vec<(i32, i64)>); 2] = [
            (
                SlotWidth::Bit32,
                "[32]",
                self.set.store32().iter().map(|e| (e.key, i64::from(e.raw))).collect(),
            ),
            (
                SlotWidth::Bit64,
                "[64]",
                self.set.store64().iter().map(|e| (e.key, e.raw)).collect(),
            ),
        ];

        for (width, title, entries) in sections {
            if entries.is_empty() {
                writeln!(f, "  {title} (none)")?;
                continue;
            }
            writeln!(f, "  {title}")?;
            for (key, raw) in entries {
                match self.context.resolve(key) {
                    Some(meta) => {
                        writeln!(f, "    - {}: {}", meta.label(), format_value(&meta, width, raw))?;
                    }
                    None => writeln!(f, "    - ID {key}: (raw {raw})")?,
                }
            }
        }

        for message in Diagnostics::inspect(self.set).messages(self.context) {
            writeln!(f, "  ! {message}")?;
        }
        Ok(())
    }
}
