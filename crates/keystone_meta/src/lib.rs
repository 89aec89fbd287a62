//! # KEYSTONE Meta
//!
//! What each property key means, kept apart from where its value is stored.
//!
//! ## Architecture
//!
//! ```text
//! property_keys! / TOML file
//!        |
//!        v
//!   KeySchema  --(register: validate)-->  KeyDescriptor table
//!        |
//!        v
//!   SchemaResolver (memoizes Arc<Metadata> per key)
//!        |
//!        v
//!   MetadataContext (one binding at a time, injected by the host)
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut context = MetadataContext::new();
//! context.bind(CharacterKeys::schema()?);
//!
//! let meta = context.resolve(CharacterKeys::Health).unwrap();
//! assert_eq!(meta.kind, ValueKind::Int);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod kind;
pub mod metadata;
pub mod resolver;
pub mod schema;

pub use error::{MetaError, MetaResult};
pub use keystone_core::Key;
pub use kind::{GroupKind, StorageWidth, ValueKind};
pub use metadata::{DefaultValue, EnumInfo, Metadata};
pub use resolver::{MetadataContext, MetadataResolver, SchemaResolver};
pub use schema::{KeyDescriptor, KeySchema};
