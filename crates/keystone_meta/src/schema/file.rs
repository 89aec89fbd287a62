//! TOML schema files.
//!
//! ```toml
//! name = "CharacterKeys"
//!
//! [[enums]]
//! name = "WeaponType"
//! members = [{ name = "Sword", value = 0 }, { name = "Bow", value = 1 }]
//!
//! [[keys]]
//! id = 3
//! name = "Weapon"
//! kind = "enum"
//! enum = "WeaponType"
//! default = "Bow"
//! ```
//!
//! Defaults are written in the key's own kind: integers for `int`/`long`,
//! numbers for `float`/`double`, booleans, a member name (or value) for
//! `enum`, a TOML date-time for `date_time` and whole seconds for
//! `time_span`.

use super::{KeyDescriptor, KeySchema};
use crate::error::{MetaError, MetaResult};
use crate::kind::{GroupKind, StorageWidth, ValueKind};
use crate::metadata::{DefaultValue, EnumInfo};
use keystone_core::{DateTimeTicks, Key, TimeSpanTicks};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use time::{Month, PrimitiveDateTime, UtcOffset};
use toml::value::{Datetime, Offset};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaFile {
    name: String,
    #[serde(default)]
    enums: Vec<EnumDecl>,
    #[serde(default)]
    keys: Vec<KeyDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EnumDecl {
    name: String,
    #[serde(default)]
    flags: bool,
    members: Vec<MemberDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MemberDecl {
    name: String,
    value: i32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KeyDecl {
    id: Key,
    name: String,
    kind: Option<ValueKind>,
    display: Option<String>,
    min: Option<f64>,
    max: Option<f64>,
    step: Option<f64>,
    #[serde(rename = "enum")]
    enum_name: Option<String>,
    group: Option<String>,
    composite: Option<GroupKind>,
    default: Option<toml::Value>,
    #[serde(default)]
    storage: StorageWidth,
    #[serde(default)]
    hidden: bool,
}

impl KeyDecl {
    fn into_descriptor(self, enums: &HashMap<String, Arc<EnumInfo>>) -> MetaResult<KeyDescriptor> {
        let mut descriptor = KeyDescriptor::new(self.id, self.name.as_str()).storage(self.storage);

        if let Some(kind) = self.kind {
            descriptor = descriptor.kind(kind);
        }
        if let Some(enum_name) = self.enum_name {
            let info = enums.get(&enum_name).cloned().ok_or_else(|| MetaError::UnknownEnum {
                name: self.name.clone(),
                enum_name,
            })?;
            descriptor = descriptor.enum_info(info);
        }
        if let Some(composite) = self.composite {
            descriptor = descriptor.composite(composite);
        }
        if let Some(display) = self.display {
            descriptor = descriptor.display(display);
        }
        if let Some(min) = self.min {
            descriptor = descriptor.min(min);
        }
        if let Some(max) = self.max {
            descriptor = descriptor.max(max);
        }
        if let Some(step) = self.step {
            descriptor = descriptor.step(step);
        }
        if let Some(group) = self.group {
            descriptor = descriptor.group(group);
        }
        if self.hidden {
            descriptor = descriptor.hidden();
        }
        if let Some(value) = self.default {
            let default = parse_default(
                &self.name,
                descriptor.declared_kind(),
                descriptor.enum_info.as_deref(),
                value,
            )?;
            descriptor = descriptor.default_value(default);
        }

        Ok(descriptor)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn parse_default(
    name: &str,
    kind: ValueKind,
    enum_info: Option<&EnumInfo>,
    value: toml::Value,
) -> MetaResult<DefaultValue> {
    let invalid = |reason: String| MetaError::InvalidDefault {
        name: name.to_string(),
        reason,
    };

    match (kind, value) {
        (ValueKind::Int, toml::Value::Integer(v)) => i32::try_from(v)
            .map(DefaultValue::Int)
            .map_err(|_| invalid(format!("{v} does not fit an int"))),
        (ValueKind::Float, toml::Value::Float(v)) => Ok(DefaultValue::Float(v as f32)),
        (ValueKind::Float, toml::Value::Integer(v)) => Ok(DefaultValue::Float(v as f32)),
        (ValueKind::Bool, toml::Value::Boolean(v)) => Ok(DefaultValue::Bool(v)),
        (ValueKind::Enum, toml::Value::String(member)) => enum_info
            .and_then(|info| info.value_of(&member))
            .map(DefaultValue::Enum)
            .ok_or_else(|| invalid(format!("`{member}` is not a member of the key's enum"))),
        (ValueKind::Enum, toml::Value::Integer(v)) => i32::try_from(v)
            .map(DefaultValue::Enum)
            .map_err(|_| invalid(format!("{v} does not fit an enum value"))),
        (ValueKind::Long, toml::Value::Integer(v)) => Ok(DefaultValue::Long(v)),
        (ValueKind::Double, toml::Value::Float(v)) => Ok(DefaultValue::Double(v)),
        (ValueKind::Double, toml::Value::Integer(v)) => Ok(DefaultValue::Double(v as f64)),
        (ValueKind::DateTime, toml::Value::Datetime(v)) => datetime_ticks(&v)
            .map(DefaultValue::DateTime)
            .ok_or_else(|| invalid(format!("{v} is not a complete date-time"))),
        (ValueKind::TimeSpan, toml::Value::Integer(secs)) => {
            Ok(DefaultValue::TimeSpan(TimeSpanTicks::from_seconds(secs)))
        }
        (kind, other) => Err(invalid(format!(
            "{} cannot be read as {kind:?}",
            other.type_str()
        ))),
    }
}

/// Converts a TOML date-time into ticks. A missing time is midnight and a
/// missing offset is UTC.
fn datetime_ticks(value: &Datetime) -> Option<DateTimeTicks> {
    let date = value.date?;
    let date = time::Date::from_calendar_date(
        i32::from(date.year),
        Month::try_from(date.month).ok()?,
        date.day,
    )
    .ok()?;
    let clock = match value.time {
        Some(t) => time::Time::from_hms_nano(t.hour, t.minute, t.second, t.nanosecond).ok()?,
        None => time::Time::MIDNIGHT,
    };
    let offset = match value.offset {
        None | Some(Offset::Z) => UtcOffset::UTC,
        Some(Offset::Custom { minutes }) => UtcOffset::from_whole_seconds(i32::from(minutes) * 60).ok()?,
    };
    let moment = PrimitiveDateTime::new(date, clock).assume_offset(offset);
    Some(DateTimeTicks::from_offset_date_time(moment))
}

impl KeySchema {
    /// Parses a schema from TOML text.
    ///
    /// # Errors
    ///
    /// [`MetaError::Parse`] for malformed TOML, [`MetaError::UnknownEnum`] and
    /// [`MetaError::InvalidDefault`] for bad references, and every error of
    /// [`KeySchema::register`].
    pub fn from_toml_str(text: &str) -> MetaResult<Self> {
        let file: SchemaFile = toml::from_str(text).map_err(|e| MetaError::Parse(e.to_string()))?;

        let enums: HashMap<String, Arc<EnumInfo>> = file
            .enums
            .into_iter()
            .map(|decl| {
                let members = decl.members.into_iter().map(|m| (m.name, m.value)).collect();
                (decl.name.clone(), Arc::new(EnumInfo::new(decl.name, members, decl.flags)))
            })
            .collect();

        let mut schema = Self::new(file.name);
        for decl in file.keys {
            schema.register(decl.into_descriptor(&enums)?)?;
        }
        Ok(schema)
    }

    /// Loads a schema file.
    ///
    /// # Errors
    ///
    /// [`MetaError::Io`] if the file cannot be read, otherwise as
    /// [`KeySchema::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> MetaResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| MetaError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let schema = Self::from_toml_str(&text)?;
        tracing::debug!(
            path = %path.display(),
            schema = schema.name(),
            keys = schema.len(),
            "loaded key schema"
        );
        Ok(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"
        name = "CharacterKeys"

        [[enums]]
        name = "WeaponType"
        members = [{ name = "Sword", value = 0 }, { name = "Bow", value = 1 }]

        [[enums]]
        name = "TagType"
        flags = true
        members = [{ name = "Tag1", value = 1 }, { name = "Tag2", value = 2 }]

        [[keys]]
        id = 1
        name = "Health"
        kind = "int"
        min = 0
        max = 1000
        default = 100

        [[keys]]
        id = 3
        name = "Weapon"
        enum = "WeaponType"
        default = "Bow"

        [[keys]]
        id = 4
        name = "SpawnTime"
        kind = "date_time"
        display = "Time for Spawn"
        default = 2024-03-01T12:30:45Z

        [[keys]]
        id = 5
        name = "RespawnDelay"
        kind = "time_span"
        storage = "64"
        default = 60

        [[keys]]
        id = 6
        name = "PosX"
        group = "Spawn Position"
        composite = "vector3"

        [[keys]]
        id = 7
        name = "Tag"
        enum = "TagType"
        hidden = true
    "#;

    #[test]
    fn test_loads_schema() {
        let schema = KeySchema::from_toml_str(SCHEMA).unwrap();
        assert_eq!(schema.name(), "CharacterKeys");
        assert_eq!(schema.values().collect::<Vec<_>>(), vec![1, 3, 4, 5, 6, 7]);

        let health = schema.metadata(1).unwrap();
        assert_eq!(health.min, Some(0.0));
        assert_eq!(health.default, Some(DefaultValue::Int(100)));

        let weapon = schema.metadata(3).unwrap();
        assert_eq!(weapon.kind, ValueKind::Enum);
        assert_eq!(weapon.default, Some(DefaultValue::Enum(1)));

        let spawn = schema.metadata(4).unwrap();
        assert_eq!(spawn.label(), "Time for Spawn");
        assert_eq!(
            spawn.default,
            Some(DefaultValue::DateTime(DateTimeTicks::from_unix_seconds(1_709_296_245)))
        );

        let delay = schema.metadata(5).unwrap();
        assert_eq!(delay.width, StorageWidth::Bit64);
        assert_eq!(delay.default, Some(DefaultValue::TimeSpan(TimeSpanTicks::from_seconds(60))));

        let pos = schema.metadata(6).unwrap();
        assert_eq!(pos.kind, ValueKind::Float);
        assert_eq!(pos.group_kind, GroupKind::Vector3);

        let tag = schema.metadata(7).unwrap();
        assert!(tag.hidden);
        assert!(tag.enum_info.unwrap().flags);
    }

    #[test]
    fn test_rejects_wrong_default_type() {
        let text = r#"
            name = "Keys"
            [[keys]]
            id = 1
            name = "IsBoss"
            kind = "bool"
            default = 1
        "#;
        let err = KeySchema::from_toml_str(text).unwrap_err();
        assert!(matches!(err, MetaError::InvalidDefault { .. }), "{err}");
    }

    #[test]
    fn test_rejects_unknown_enum() {
        let text = r#"
            name = "Keys"
            [[keys]]
            id = 1
            name = "Weapon"
            enum = "Missing"
        "#;
        assert!(matches!(
            KeySchema::from_toml_str(text),
            Err(MetaError::UnknownEnum { .. })
        ));
    }

    #[test]
    fn test_rejects_unknown_field() {
        let text = r#"
            name = "Keys"
            [[keys]]
            id = 1
            name = "Health"
            colour = "red"
        "#;
        assert!(matches!(KeySchema::from_toml_str(text), Err(MetaError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = KeySchema::load("/nonexistent/keys.toml").unwrap_err();
        assert!(matches!(err, MetaError::Io { .. }));
    }
}
