//! # Project Settings
//!
//! Which schema file a host binds at startup, stored as a small TOML file:
//!
//! ```toml
//! schema = "schemas/character_keys.toml"
//! log_diagnostics = true
//! ```
//!
//! A relative schema path is resolved against the settings file's directory.
//! No schema means "unbound".

use crate::diagnostics::Diagnostics;
use crate::error::{PropertyError, PropertyResult};
use keystone_core::PropertySet;
use keystone_meta::{KeySchema, MetaError, MetadataContext};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Host settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Schema file to bind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<PathBuf>,
    /// Log diagnostics findings when sets are checked.
    #[serde(default)]
    pub log_diagnostics: bool,
}

impl Settings {
    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// [`MetaError::Parse`] for malformed TOML or unknown fields.
    pub fn from_toml_str(text: &str) -> PropertyResult<Self> {
        toml::from_str(text).map_err(|e| PropertyError::Meta(MetaError::Parse(e.to_string())))
    }

    /// Loads a settings file, resolving a relative schema path against it.
    ///
    /// # Errors
    ///
    /// [`MetaError::Io`] if the file cannot be read, otherwise as
    /// [`Settings::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> PropertyResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| MetaError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let mut settings = Self::from_toml_str(&text)?;
        if let (Some(schema), Some(dir)) = (&settings.schema, path.parent()) {
            if schema.is_relative() {
                settings.schema = Some(dir.join(schema));
            }
        }
        Ok(settings)
    }

    /// Serializes to TOML text.
    ///
    /// # Errors
    ///
    /// [`PropertyError::Settings`] if the path cannot be represented.
    pub fn to_toml_string(&self) -> PropertyResult<String> {
        toml::to_string(self).map_err(|e| PropertyError::Settings(e.to_string()))
    }

    /// Writes the settings file.
    ///
    /// # Errors
    ///
    /// [`PropertyError::Settings`] if serialization or the write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> PropertyResult<()> {
        let text = self.to_toml_string()?;
        std::fs::write(path.as_ref(), text).map_err(|e| PropertyError::Settings(e.to_string()))
    }

    /// Binds the configured schema into `context`, or unbinds it when no
    /// schema is configured.
    ///
    /// # Returns
    ///
    /// `true` if the binding changed.
    ///
    /// # Errors
    ///
    /// Any error of [`KeySchema::load`].
    pub fn bind(&self, context: &mut MetadataContext) -> PropertyResult<bool> {
        match &self.schema {
            Some(path) => {
                let schema = KeySchema::load(path)?;
                Ok(context.ensure_bound(schema))
            }
            None => Ok(context.unbind()),
        }
    }

    /// Inspects `set`, logging the findings if `log_diagnostics` is on.
    pub fn check(&self, set: &PropertySet, context: &MetadataContext) -> Diagnostics {
        let diagnostics = Diagnostics::inspect(set);
        if self.log_diagnostics {
            diagnostics.log(context);
        }
        diagnostics
    }
}
