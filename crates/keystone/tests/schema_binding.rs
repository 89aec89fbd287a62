//! # Schema Binding
//!
//! The character key set declared in code and in `data/`, bound through
//! settings, and driving typed access, the add menu and reports.
//!
//! Run with: cargo test -p keystone --test schema_binding

mod common;

use common::{context, data_dir, file_schema, CharacterKeys, TagType, WeaponType};
use keystone::{
    add_group, add_key, add_single, apply_defaults, get_value, set_value, AddMenu,
    DateTimeTicks, Diagnostics, MetadataContext, PropertyError, PropertyReport, PropertySet,
    Settings, SlotWidth, TimeSpanTicks, Value, ValueKind,
};

// ============================================================================
// DECLARATION
// ============================================================================

#[test]
fn code_and_file_declarations_agree() {
    let declared = CharacterKeys::schema().unwrap();
    let loaded = file_schema();

    assert_eq!(declared.name(), loaded.name());
    assert_eq!(
        declared.values().collect::<Vec<_>>(),
        loaded.values().collect::<Vec<_>>()
    );
    for &key in CharacterKeys::ALL {
        assert_eq!(
            declared.metadata(key),
            loaded.metadata(key),
            "{} differs",
            key.name()
        );
    }
}

#[test]
fn generated_key_enum() {
    assert_eq!(CharacterKeys::from_key(11), Some(CharacterKeys::PosY));
    assert_eq!(CharacterKeys::from_key(6), None);
    assert_eq!(CharacterKeys::SpawnTime.name(), "SpawnTime");

    let context = context();
    let spawn = context.resolve(CharacterKeys::SpawnTime).unwrap();
    assert_eq!(spawn.label(), "Time for Spawn");
    assert_eq!(spawn.storage_width(), SlotWidth::Bit64);

    let health = context.resolve(CharacterKeys::Health).unwrap();
    assert_eq!(health.clamp(5000.0), 1000.0);
    assert!(context.resolve(99).is_none());
}

// ============================================================================
// SETTINGS
// ============================================================================

#[test]
fn settings_bind_the_sample_schema() {
    let settings = Settings::load(data_dir().join("keystone.toml")).unwrap();
    assert!(settings.log_diagnostics);

    let mut context = MetadataContext::new();
    assert!(settings.bind(&mut context).unwrap());
    assert_eq!(context.schema_name(), Some("CharacterKeys"));
    let generation = context.generation();

    // Unchanged schema again is a no-op
    assert!(!settings.bind(&mut context).unwrap());
    assert_eq!(context.generation(), generation);

    let mut set = PropertySet::new();
    set.set(CharacterKeys::Health, 1_i32);
    set.set(CharacterKeys::Health, 1_i64);
    let findings = settings.check(&set, &context);
    assert_eq!(findings.cross_store.len(), 1);
}

fn temp_dir(label: &str) -> std::path::PathBuf {
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("keystone_{label}_{id}"));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn settings_rebind_an_edited_schema_file() {
    let dir = temp_dir("rebind");
    let keys = dir.join("keys.toml");
    std::fs::write(&keys, "name = \"Keys\"\n[[keys]]\nid = 1\nname = \"Health\"\nkind = \"int\"\n")
        .unwrap();
    std::fs::write(dir.join("keystone.toml"), "schema = \"keys.toml\"\n").unwrap();

    let settings = Settings::load(dir.join("keystone.toml")).unwrap();
    let mut context = MetadataContext::new();
    assert!(settings.bind(&mut context).unwrap());
    assert_eq!(context.resolve(1).unwrap().kind, ValueKind::Int);

    std::fs::write(&keys, "name = \"Keys\"\n[[keys]]\nid = 1\nname = \"Health\"\nkind = \"float\"\n")
        .unwrap();
    assert!(settings.bind(&mut context).unwrap());
    assert_eq!(context.resolve(1).unwrap().kind, ValueKind::Float);
    assert!(!settings.bind(&mut context).unwrap());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn settings_with_missing_schema_fail() {
    let settings = Settings::from_toml_str("schema = \"/nonexistent/keys.toml\"").unwrap();
    let mut context = MetadataContext::new();
    assert!(matches!(
        settings.bind(&mut context),
        Err(PropertyError::Meta(keystone::MetaError::Io { .. }))
    ));
    assert!(!context.is_bound());
}

// ============================================================================
// TYPED ACCESS
// ============================================================================

#[test]
fn typed_access_follows_declared_kinds() {
    let context = context();
    let mut set = PropertySet::new();

    set_value(&mut set, &context, CharacterKeys::Health, Value::Int(320)).unwrap();
    set_value(
        &mut set,
        &context,
        CharacterKeys::SpawnTime,
        Value::DateTime(DateTimeTicks::from_unix_seconds(1_709_296_245)),
    )
    .unwrap();
    set_value(
        &mut set,
        &context,
        CharacterKeys::RespawnDelay,
        Value::TimeSpan(TimeSpanTicks::from_seconds(90)),
    )
    .unwrap();

    assert!(set.contains32(CharacterKeys::Health));
    assert!(set.contains64(CharacterKeys::SpawnTime));
    assert_eq!(
        get_value(&set, &context, CharacterKeys::RespawnDelay).unwrap(),
        Some(Value::TimeSpan(TimeSpanTicks::from_seconds(90)))
    );

    let err = set_value(&mut set, &context, CharacterKeys::IsBoss, Value::Int(1)).unwrap_err();
    assert!(matches!(
        err,
        PropertyError::KindMismatch {
            expected: ValueKind::Bool,
            actual: ValueKind::Int,
            ..
        }
    ));
}

#[test]
fn enums_and_flags() {
    let mut set = PropertySet::new();
    set.set_enum(CharacterKeys::Weapon, WeaponType::Staff);
    assert_eq!(set.get_enum::<WeaponType>(CharacterKeys::Weapon), Some(WeaponType::Staff));

    let tags = set.store32_mut();
    tags.add_flag(CharacterKeys::Tag, TagType::Tag1);
    tags.add_flag(CharacterKeys::Tag, TagType::Tag3);
    assert!(tags.has_flag(CharacterKeys::Tag, TagType::Tag3));
    assert!(!tags.has_flag(CharacterKeys::Tag, TagType::Tag2));
    tags.remove_flag(CharacterKeys::Tag, TagType::Tag1);
    assert_eq!(tags.try_get::<i32>(CharacterKeys::Tag), Some(4));
}

#[test]
fn unbound_context_degrades_to_raw_storage() {
    let unbound = MetadataContext::new();
    let mut set = PropertySet::new();
    set.set(CharacterKeys::Health, 5_i32);

    assert_eq!(set.get::<i32>(CharacterKeys::Health), Some(5));
    assert_eq!(
        get_value(&set, &unbound, CharacterKeys::Health),
        Err(PropertyError::Unbound)
    );
    assert!(AddMenu::build(&set, &unbound).is_empty());
    assert!(PropertyReport::new(&set, &unbound)
        .to_string()
        .contains("    - ID 1: (raw 5)"));
}

// ============================================================================
// DEFAULTS AND THE ADD MENU
// ============================================================================

#[test]
fn add_menu_offers_missing_keys() {
    let context = context();
    let mut set = PropertySet::new();
    set.set(CharacterKeys::Health, 10_i32);

    let menu = AddMenu::build(&set, &context);
    let groups: Vec<String> = menu.groups.iter().map(|group| group.label()).collect();
    assert_eq!(groups, vec!["Shadow Color (Color)", "Spawn Position (Vector3)"]);

    let labels: Vec<&str> = menu.singles.iter().map(|item| item.label.as_str()).collect();
    assert_eq!(labels, vec!["IsBoss", "RespawnDelay", "Tag", "Time for Spawn", "Weapon"]);

    let position = &menu.groups[1];
    assert_eq!(add_group(&mut set, &context, position).unwrap(), 3);
    for item in &menu.singles {
        add_single(&mut set, &context, item).unwrap();
    }

    assert_eq!(set.get::<bool>(CharacterKeys::IsBoss), Some(true));
    assert_eq!(set.get_enum::<WeaponType>(CharacterKeys::Weapon), Some(WeaponType::Bow));
    assert_eq!(set.get::<DateTimeTicks>(CharacterKeys::SpawnTime), Some(DateTimeTicks(0)));
    assert_eq!(set.get::<f32>(CharacterKeys::PosZ), Some(0.0));
    assert_eq!(set.get::<i32>(CharacterKeys::Health), Some(10));

    let rebuilt = AddMenu::build(&set, &context);
    assert!(rebuilt.singles.is_empty());
    assert_eq!(rebuilt.groups.len(), 1);
}

#[test]
fn defaults_reset_existing_entries() {
    let context = context();
    let mut set = PropertySet::new();
    add_key(&mut set, &context, CharacterKeys::Health).unwrap();
    set.set(CharacterKeys::Health, 1_i32);
    set.set(CharacterKeys::IsBoss, false);
    set.set(CharacterKeys::PosX, 3.0_f32);

    assert_eq!(apply_defaults(&mut set, &context).unwrap(), 2);
    assert_eq!(set.get::<i32>(CharacterKeys::Health), Some(100));
    assert_eq!(set.get::<bool>(CharacterKeys::IsBoss), Some(true));
    assert_eq!(set.get::<f32>(CharacterKeys::PosX), Some(3.0));
}

#[test]
fn adding_a_present_key_keeps_its_value() {
    let context = context();
    let mut set = PropertySet::new();
    set.set(CharacterKeys::Health, 5_i32);

    add_key(&mut set, &context, CharacterKeys::Health).unwrap();
    let raws: Vec<i32> = set.store32().iter().map(|entry| entry.raw).collect();
    assert_eq!(raws, vec![5, 100]);
    assert_eq!(set.get::<i32>(CharacterKeys::Health), Some(5));

    // a reset reaches every occurrence
    set.store32_mut().push(CharacterKeys::Health, 7);
    assert_eq!(apply_defaults(&mut set, &context).unwrap(), 1);
    let raws: Vec<i32> = set.store32().iter().map(|entry| entry.raw).collect();
    assert_eq!(raws, vec![100, 100, 100]);
}

// ============================================================================
// PERSISTENCE AND REPORTS
// ============================================================================

#[test]
fn persisted_layout_round_trips() {
    let mut set = PropertySet::new();
    set.set(CharacterKeys::Health, 100_i32);
    set.store32_mut().push(CharacterKeys::Health, 7);
    set.set(CharacterKeys::SpawnTime, DateTimeTicks::from_unix_seconds(1_709_296_245));

    let json = serde_json::to_string(&set).unwrap();
    assert_eq!(
        json,
        r#"{"items32":[{"key":1,"raw":100},{"key":1,"raw":7}],"items64":[{"key":4,"raw":638448930450000000}]}"#
    );

    let loaded: PropertySet = serde_json::from_str(&json).unwrap();
    assert_eq!(loaded, set);
    assert_eq!(loaded.get::<i32>(CharacterKeys::Health), Some(100));
    assert_eq!(loaded.store32().len(), 2);

    let partial: PropertySet = serde_json::from_str(r#"{"items64":[]}"#).unwrap();
    assert!(partial.is_empty());
}

#[test]
fn report_names_values_and_findings() {
    let context = context();
    let mut set = PropertySet::new();
    set.set_enum(CharacterKeys::Weapon, WeaponType::Bow);
    set.set(CharacterKeys::Tag, 3_i32);
    set.set(CharacterKeys::RespawnDelay, TimeSpanTicks::from_seconds(90_061));
    set.store32_mut().push(CharacterKeys::Weapon, 0);

    let text = PropertyReport::new(&set, &context).to_string();
    assert!(text.contains("    - Weapon: Bow (raw 1)\n"), "{text}");
    assert!(text.contains("    - Tag: Tag1, Tag2 (raw 3)\n"), "{text}");
    assert!(text.contains("    - RespawnDelay: 1.01:01:01 (ticks 900610000000)\n"), "{text}");
    assert!(text.ends_with("  ! duplicate key `Weapon` appears 2 times in the 32-bit store\n"));

    let findings = Diagnostics::inspect(&set);
    assert_eq!(findings.duplicates32, vec![(CharacterKeys::Weapon.key(), 2)]);
}
