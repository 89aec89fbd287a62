//! # KEYSTONE Shared
//!
//! Composite value types that grouped scalar properties are presented as.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - `keystone_core`
//! - `keystone_meta`
//! - Anything that knows what a property key is
//!
//! A `Vec3` is three floats. Where those floats live is someone else's problem.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod math;

pub use math::{Color, Vec2, Vec3, Vec4};
