//! # Key Schemas
//!
//! Declarative registration of what each key means.
//!
//! A [`KeySchema`] is an ordered table of [`KeyDescriptor`]s for one key
//! enum. It can be built in code, with the [`property_keys!`](crate::property_keys)
//! macro, or from a TOML schema file. Every descriptor is validated when it
//! is registered, so a schema that loads is internally consistent.
//!
//! ## Example
//!
//! ```rust,ignore
//! let schema = KeySchema::new("CharacterKeys")
//!     .with_key(KeyDescriptor::new(1, "Health").int().range(0.0, 1000.0).default_value(100))?
//!     .with_key(KeyDescriptor::new(2, "IsBoss").bool().default_value(true))?;
//! ```

mod file;
mod macros;

use crate::error::{MetaError, MetaResult};
use crate::kind::{GroupKind, StorageWidth, ValueKind};
use crate::metadata::{DefaultValue, EnumInfo, Metadata};
use keystone_core::{Key, PropertyEnum};
use std::collections::HashMap;
use std::sync::Arc;

/// Declaration of one key, built fluently.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyDescriptor {
    key: Key,
    name: String,
    display: Option<String>,
    kind: Option<ValueKind>,
    width: StorageWidth,
    min: Option<f64>,
    max: Option<f64>,
    step: Option<f64>,
    enum_info: Option<Arc<EnumInfo>>,
    group: Option<String>,
    composite: Option<GroupKind>,
    default: Option<DefaultValue>,
    hidden: bool,
}

impl KeyDescriptor {
    /// Starts a descriptor for `key`, named after its enum member.
    #[must_use]
    pub fn new(key: impl Into<Key>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            display: None,
            kind: None,
            width: StorageWidth::Both,
            min: None,
            max: None,
            step: None,
            enum_info: None,
            group: None,
            composite: None,
            default: None,
            hidden: false,
        }
    }

    /// Applies a builder function. Used by [`property_keys!`](crate::property_keys).
    #[must_use]
    pub fn configure(self, build: impl FnOnce(Self) -> Self) -> Self {
        build(self)
    }

    /// The key value.
    #[must_use]
    pub const fn key(&self) -> Key {
        self.key
    }

    /// The member name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind this descriptor resolves to.
    ///
    /// A composite member without an explicit kind is a `Float`; anything
    /// else without one is an `Int`.
    #[must_use]
    pub fn declared_kind(&self) -> ValueKind {
        self.kind.unwrap_or(match self.composite {
            Some(_) => ValueKind::Float,
            None => ValueKind::Int,
        })
    }

    /// Sets the kind.
    #[must_use]
    pub fn kind(mut self, kind: ValueKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Declares an `Int` key.
    #[must_use]
    pub fn int(self) -> Self {
        self.kind(ValueKind::Int)
    }

    /// Declares a `Float` key.
    #[must_use]
    pub fn float(self) -> Self {
        self.kind(ValueKind::Float)
    }

    /// Declares a `Bool` key.
    #[must_use]
    pub fn bool(self) -> Self {
        self.kind(ValueKind::Bool)
    }

    /// Declares a `Long` key.
    #[must_use]
    pub fn long(self) -> Self {
        self.kind(ValueKind::Long)
    }

    /// Declares a `Double` key.
    #[must_use]
    pub fn double(self) -> Self {
        self.kind(ValueKind::Double)
    }

    /// Declares a `DateTime` key.
    #[must_use]
    pub fn date_time(self) -> Self {
        self.kind(ValueKind::DateTime)
    }

    /// Declares a `TimeSpan` key.
    #[must_use]
    pub fn time_span(self) -> Self {
        self.kind(ValueKind::TimeSpan)
    }

    /// Declares an `Enum` key backed by `E`.
    #[must_use]
    pub fn enumeration<E: PropertyEnum>(self) -> Self {
        self.enum_info(Arc::new(EnumInfo::of::<E>()))
    }

    /// Declares an `Enum` key backed by explicit enum info.
    #[must_use]
    pub fn enum_info(mut self, info: Arc<EnumInfo>) -> Self {
        self.enum_info = Some(info);
        self.kind(ValueKind::Enum)
    }

    /// Sets the display name.
    #[must_use]
    pub fn display(mut self, name: impl Into<String>) -> Self {
        self.display = Some(name.into());
        self
    }

    /// Sets both bounds.
    #[must_use]
    pub fn range(self, min: f64, max: f64) -> Self {
        self.min(min).max(max)
    }

    /// Sets the lower bound.
    #[must_use]
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Sets the upper bound.
    #[must_use]
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Sets the edit step.
    #[must_use]
    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// Puts the key in a composite group. The group kind is derived from the
    /// name unless [`Self::composite`] sets it.
    #[must_use]
    pub fn group(mut self, name: impl Into<String>) -> Self {
        self.group = Some(name.into());
        self
    }

    /// Sets the composite kind explicitly.
    #[must_use]
    pub fn composite(mut self, kind: GroupKind) -> Self {
        self.composite = Some(kind);
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<DefaultValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets an enum member as the default value.
    #[must_use]
    pub fn default_enum<E: PropertyEnum>(mut self, member: E) -> Self {
        self.default = Some(DefaultValue::from_enum(member));
        self
    }

    /// Sets the storage hint.
    #[must_use]
    pub fn storage(mut self, width: StorageWidth) -> Self {
        self.width = width;
        self
    }

    /// Hides the key from add menus.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Checks the descriptor for internal consistency.
    ///
    /// # Errors
    ///
    /// See [`KeySchema::register`].
    pub fn validate(&self) -> MetaResult<()> {
        let kind = self.declared_kind();

        if kind == ValueKind::Enum && self.enum_info.is_none() {
            return Err(MetaError::MissingEnumType(self.name.clone()));
        }

        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(MetaError::InvalidRange {
                    name: self.name.clone(),
                    min,
                    max,
                });
            }
        }

        if let Some(step) = self.step {
            if step.is_nan() || step.is_infinite() || step <= 0.0 {
                return Err(MetaError::InvalidStep {
                    name: self.name.clone(),
                    step,
                });
            }
        }

        let composite = self.composite.is_some_and(|composite| composite != GroupKind::None);
        if composite && kind != ValueKind::Float {
            return Err(MetaError::CompositeNotFloat {
                name: self.name.clone(),
                kind,
            });
        }

        if let Some(default) = &self.default {
            if default.kind() != kind {
                return Err(MetaError::DefaultKindMismatch {
                    name: self.name.clone(),
                    declared: kind,
                    default: default.kind(),
                });
            }
        }

        Ok(())
    }

    /// Builds the metadata record this descriptor declares.
    #[must_use]
    pub fn to_metadata(&self) -> Metadata {
        let group_kind = self.composite.unwrap_or_else(|| {
            self.group
                .as_deref()
                .map_or(GroupKind::None, GroupKind::from_group_name)
        });

        Metadata {
            key: self.key,
            name: self.name.clone(),
            display_name: self.display.clone(),
            kind: self.declared_kind(),
            width: self.width,
            min: self.min,
            max: self.max,
            step: self.step,
            enum_info: self.enum_info.clone(),
            group: self.group.clone(),
            group_kind,
            default: self.default,
            hidden: self.hidden,
        }
    }
}

/// Ordered table of key descriptors for one key enum.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeySchema {
    name: String,
    descriptors: Vec<KeyDescriptor>,
    positions: HashMap<Key, usize>,
}

impl KeySchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descriptors: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Schema name, usually the key enum's type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validates and appends a descriptor.
    ///
    /// # Errors
    ///
    /// - [`MetaError::DuplicateKey`] if the key value is already registered
    /// - [`MetaError::DefaultKindMismatch`] if the default's kind differs
    ///   from the declared kind
    /// - [`MetaError::MissingEnumType`] for an `Enum` key without enum info
    /// - [`MetaError::InvalidRange`] if `min > max`
    /// - [`MetaError::InvalidStep`] for a step that is not positive
    /// - [`MetaError::CompositeNotFloat`] for a non-float composite member
    pub fn register(&mut self, descriptor: KeyDescriptor) -> MetaResult<()> {
        if let Some(&position) = self.positions.get(&descriptor.key) {
            return Err(MetaError::DuplicateKey {
                key: descriptor.key,
                existing: self.descriptors[position].name.clone(),
                name: descriptor.name,
            });
        }
        descriptor.validate()?;

        self.positions.insert(descriptor.key, self.descriptors.len());
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Builder form of [`Self::register`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::register`].
    pub fn with_key(mut self, descriptor: KeyDescriptor) -> MetaResult<Self> {
        self.register(descriptor)?;
        Ok(self)
    }

    /// Descriptor registered for `key`.
    #[must_use]
    pub fn descriptor(&self, key: impl Into<Key>) -> Option<&KeyDescriptor> {
        self.positions
            .get(&key.into())
            .map(|&position| &self.descriptors[position])
    }

    /// Builds fresh metadata for `key`.
    #[must_use]
    pub fn metadata(&self, key: impl Into<Key>) -> Option<Metadata> {
        self.descriptor(key).map(KeyDescriptor::to_metadata)
    }

    /// Returns `true` if `key` is registered.
    #[must_use]
    pub fn contains(&self, key: impl Into<Key>) -> bool {
        self.positions.contains_key(&key.into())
    }

    /// Descriptors in declaration order.
    #[must_use]
    pub fn descriptors(&self) -> &[KeyDescriptor] {
        &self.descriptors
    }

    /// Member names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.descriptors.iter().map(KeyDescriptor::name)
    }

    /// Key values in declaration order.
    pub fn values(&self) -> impl Iterator<Item = Key> + '_ {
        self.descriptors.iter().map(KeyDescriptor::key)
    }

    /// Number of registered keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` if no key is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
