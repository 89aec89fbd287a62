//! # Property Error Types
//!
//! Failures of the metadata-aware layer. Raw storage never fails.

use keystone_core::{Key, SlotWidth};
use keystone_meta::{MetaError, ValueKind};
use thiserror::Error;

/// Errors from typed access, defaults, menus and settings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropertyError {
    /// No key schema is bound to the context.
    #[error("no key schema is bound")]
    Unbound,

    /// The bound schema does not declare this key.
    #[error("key {0} is not declared in the bound schema")]
    UnknownKey(Key),

    /// The value's kind differs from the key's declared kind.
    #[error("`{name}` is declared {expected:?}, got a {actual:?} value")]
    KindMismatch {
        /// Key name.
        name: String,
        /// Declared kind.
        expected: ValueKind,
        /// Kind of the supplied value.
        actual: ValueKind,
    },

    /// The key's kind does not fit the store it was routed to.
    #[error("`{name}` is {kind:?} and does not fit the {width:?} store")]
    WidthMismatch {
        /// Key name.
        name: String,
        /// Declared kind.
        kind: ValueKind,
        /// Store width.
        width: SlotWidth,
    },

    /// Settings file could not be written.
    #[error("cannot save settings: {0}")]
    Settings(String),

    /// Schema or settings failure.
    #[error(transparent)]
    Meta(#[from] MetaError),
}

/// Result type for property operations.
pub type PropertyResult<T> = Result<T, PropertyError>;
