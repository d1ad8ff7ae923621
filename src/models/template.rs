//! Application template references and the reserved-field rule
//!
//! A model that accepts an application template implements
//! [`TemplateReserved`] by listing its template-overridable fields in
//! declaration order. The rule itself is shared.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::ReservedAttributes;
use crate::error::ExtensionError;

/// Reference to an application template file to be expanded into the job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationTemplateInfo {
    /// Path of the template document
    pub file_path: String,
    /// Values for the template's declared parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
}

impl ApplicationTemplateInfo {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            parameters: None,
        }
    }

    /// Add one template parameter value.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters
            .get_or_insert_with(Map::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn validate(&self) -> Result<(), ExtensionError> {
        if self.file_path.trim().is_empty() {
            return Err(ExtensionError::Template("file_path must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Models that can be populated by an application template.
pub trait TemplateReserved {
    /// Every field a template could populate, in declaration order, paired
    /// with whether it is set on this value.
    fn template_fields(&self) -> Vec<(&'static str, bool)>;

    /// Whether this value references an application template.
    fn uses_template(&self) -> bool;

    /// Names of reserved fields that are set, in declaration order.
    /// Empty when no template is referenced.
    fn reserved_conflicts(&self, reserved: &ReservedAttributes) -> Vec<String> {
        if !self.uses_template() {
            return Vec::new();
        }
        self.template_fields()
            .into_iter()
            .filter(|(name, set)| *set && reserved.contains(name))
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// Fail with [`ExtensionError::ReservedFieldConflict`] if any reserved
    /// field is set while a template is referenced.
    fn check_reserved(&self, reserved: &ReservedAttributes) -> Result<(), ExtensionError> {
        let fields = self.reserved_conflicts(reserved);
        if fields.is_empty() {
            Ok(())
        } else {
            Err(ExtensionError::ReservedFieldConflict { fields })
        }
    }
}
