//! # Metadata Error Types
//!
//! Everything that can go wrong while declaring or loading a key schema.
//! Resolution itself never fails; an unknown key is simply `None`.

use crate::kind::ValueKind;
use keystone_core::Key;
use thiserror::Error;

/// Errors raised while registering keys or loading schema files.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetaError {
    /// Two descriptors share a key value.
    #[error("key {key} declared twice: `{existing}` and `{name}`")]
    DuplicateKey {
        /// The duplicated key value.
        key: Key,
        /// Name of the first declaration.
        existing: String,
        /// Name of the rejected declaration.
        name: String,
    },

    /// A default value whose kind disagrees with the declared kind.
    #[error("default for `{name}` is {default:?} but the key is declared {declared:?}")]
    DefaultKindMismatch {
        /// Key name.
        name: String,
        /// Declared kind.
        declared: ValueKind,
        /// Kind of the supplied default.
        default: ValueKind,
    },

    /// A default in a schema file that cannot be read as the declared kind.
    #[error("invalid default for `{name}`: {reason}")]
    InvalidDefault {
        /// Key name.
        name: String,
        /// What was wrong with it.
        reason: String,
    },

    /// An `Enum` key without an enum type.
    #[error("`{0}` is declared as an enum but names no enum type")]
    MissingEnumType(String),

    /// A schema file references an enum it does not define.
    #[error("`{name}` references unknown enum `{enum_name}`")]
    UnknownEnum {
        /// Key name.
        name: String,
        /// The enum name that was not found.
        enum_name: String,
    },

    /// `min` greater than `max`.
    #[error("`{name}` has min {min} greater than max {max}")]
    InvalidRange {
        /// Key name.
        name: String,
        /// Declared minimum.
        min: f64,
        /// Declared maximum.
        max: f64,
    },

    /// Step that is zero, negative or not finite.
    #[error("`{name}` has non-positive step {step}")]
    InvalidStep {
        /// Key name.
        name: String,
        /// Declared step.
        step: f64,
    },

    /// Composite membership on a key that is not a float.
    #[error("`{name}` is part of a composite but declared {kind:?}")]
    CompositeNotFloat {
        /// Key name.
        name: String,
        /// Declared kind.
        kind: ValueKind,
    },

    /// Schema or settings file could not be read.
    #[error("cannot read {path}: {message}")]
    Io {
        /// File path.
        path: String,
        /// OS error text.
        message: String,
    },

    /// Schema or settings file is not valid TOML for its format.
    #[error("invalid schema file: {0}")]
    Parse(String),
}

/// Result type for metadata operations.
pub type MetaResult<T> = Result<T, MetaError>;
