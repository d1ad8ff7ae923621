//! Reserved-attribute configuration file
//!
//! ```toml
//! [templates]
//! reserved = ["job_manager_task", "task_factory"]
//! ```
//!
//! A file without a `[templates]` table, or without `reserved`, keeps the
//! built-in set.

use batch_models::FieldSpec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::OnceLock;

use super::defaults::ATTRS_RESERVED_FOR_TEMPLATES;
use crate::models::ExtendedJobParameter;

/// Field that switches a model into template mode. It can never be reserved.
const TEMPLATE_FIELD: &str = "application_template_info";

/// Error types for config operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Unknown field '{0}' in reserved set")]
    UnknownField(String),

    #[error("Field '{0}' cannot be reserved for templates")]
    NotReservable(String),
}

/// `[templates]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplatesConfig {
    /// Reserved field names; `None` keeps the built-in set
    #[serde(default)]
    pub reserved: Option<Vec<String>>,
}

/// Top-level extensions config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtensionsConfig {
    #[serde(default)]
    pub templates: TemplatesConfig,
}

/// The set of field names a template-mode model must leave unset.
///
/// Order of configuration does not matter: conflicts are always reported in
/// the model's declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedAttributes {
    names: Vec<String>,
}

impl ReservedAttributes {
    /// The built-in set from [`ATTRS_RESERVED_FOR_TEMPLATES`].
    pub fn builtin() -> &'static ReservedAttributes {
        static BUILTIN: OnceLock<ReservedAttributes> = OnceLock::new();
        BUILTIN.get_or_init(|| Self::from_names(ATTRS_RESERVED_FOR_TEMPLATES.iter().copied()))
    }

    /// Build a set from names, dropping duplicates. Names are not checked;
    /// use [`ReservedAttributes::check_known`] for that.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for name in names.into_iter().map(Into::into) {
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        Self { names: unique }
    }

    /// Load from a TOML file and check names against the job field map.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let reserved = Self::from_toml_str(&contents)?;
        tracing::debug!(
            path = %path.display(),
            count = reserved.len(),
            "loaded reserved-for-templates set"
        );
        Ok(reserved)
    }

    /// Parse from a TOML string and check names against the job field map.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: ExtensionsConfig = toml::from_str(s)?;
        let reserved = match config.templates.reserved {
            Some(names) => Self::from_names(names),
            None => Self::builtin().clone(),
        };
        reserved.check_known(ExtendedJobParameter::attribute_map())?;
        Ok(reserved)
    }

    /// Check every name is an optional, non-template field of `fields`.
    pub fn check_known(&self, fields: &[FieldSpec]) -> Result<(), ConfigError> {
        for name in &self.names {
            let spec = fields
                .iter()
                .find(|spec| spec.name == name.as_str())
                .ok_or_else(|| ConfigError::UnknownField(name.clone()))?;
            if spec.required || spec.name == TEMPLATE_FIELD {
                return Err(ConfigError::NotReservable(name.clone()));
            }
        }
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for ReservedAttributes {
    fn default() -> Self {
        Self::builtin().clone()
    }
}
