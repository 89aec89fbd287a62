//! Shared fixtures: the character key set, declared in code and on disk.

#![allow(dead_code)]

use keystone::{property_enum, property_keys, GroupKind, KeySchema, MetadataContext};
use std::path::PathBuf;

property_enum! {
    /// Weapon a character spawns with.
    pub enum WeaponType {
        Sword = 0,
        Bow = 1,
        Staff = 2,
    }
}

property_enum! {
    /// Free-form character tags.
    pub flags TagType {
        None = 0,
        Tag1 = 1,
        Tag2 = 2,
        Tag3 = 4,
    }
}

property_keys! {
    /// Designer-facing character attributes.
    pub enum CharacterKeys {
        None = 0 => |d| d.hidden(),
        Health = 1 => |d| d.int().range(0.0, 1000.0).default_value(100),
        IsBoss = 2 => |d| d.bool().default_value(true),
        Weapon = 3 => |d| d.enumeration::<WeaponType>().default_enum(WeaponType::Bow),
        SpawnTime = 4 => |d| d.date_time().display("Time for Spawn"),
        RespawnDelay = 5 => |d| d.time_span().step(60.0),
        PosX = 10 => |d| d.group("Spawn Position").composite(GroupKind::Vector3),
        PosY = 11 => |d| d.group("Spawn Position").composite(GroupKind::Vector3),
        PosZ = 12 => |d| d.group("Spawn Position").composite(GroupKind::Vector3),
        ColorR = 20 => |d| d.group("Shadow Color").composite(GroupKind::Color),
        ColorG = 21 => |d| d.group("Shadow Color").composite(GroupKind::Color),
        ColorB = 22 => |d| d.group("Shadow Color").composite(GroupKind::Color),
        ColorA = 23 => |d| d.group("Shadow Color").composite(GroupKind::Color),
        Tag = 30 => |d| d.enumeration::<TagType>(),
    }
}

/// Directory holding the sample data files.
pub fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

/// Context bound to the code-declared schema.
pub fn context() -> MetadataContext {
    MetadataContext::with_schema(CharacterKeys::schema().unwrap())
}

/// Schema loaded from the sample TOML file.
pub fn file_schema() -> KeySchema {
    KeySchema::load(data_dir().join("schemas/character_keys.toml")).unwrap()
}
