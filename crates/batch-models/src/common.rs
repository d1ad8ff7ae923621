//! Name/value pairs and shared field checks.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::{MAX_DISPLAY_NAME_LENGTH, MAX_ID_LENGTH};

/// An environment variable to be set on a task process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentSetting {
    /// Variable name
    pub name: String,
    /// Variable value; absent means empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl EnvironmentSetting {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }
}

/// A name/value pair attached to a job as opaque metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataItem {
    pub name: String,
    pub value: String,
}

impl MetadataItem {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Check an account-scoped identifier: non-empty, at most 64 characters,
/// alphanumerics, hyphens and underscores only.
pub fn validate_id(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::MissingRequired(field.to_string()));
    }
    let len = value.chars().count();
    if len > MAX_ID_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            len,
            max: MAX_ID_LENGTH,
        });
    }
    if !value.chars().all(is_id_char) {
        return Err(ValidationError::InvalidCharacters {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Check a display name: at most 1024 Unicode characters.
pub fn validate_display_name(field: &str, value: &str) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len > MAX_DISPLAY_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            len,
            max: MAX_DISPLAY_NAME_LENGTH,
        });
    }
    Ok(())
}

/// Check that a required string field is present and non-empty.
pub fn validate_non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingRequired(field.to_string()));
    }
    Ok(())
}

/// Check every environment setting has a name.
pub fn validate_environment(
    field: &str,
    settings: Option<&[EnvironmentSetting]>,
) -> Result<(), ValidationError> {
    for setting in settings.unwrap_or_default() {
        validate_non_empty(&format!("{}.name", field), &setting.name)?;
    }
    Ok(())
}
