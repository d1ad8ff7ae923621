//! Extension error type

use batch_models::ValidationError;

use crate::models::TaskFactoryError;

/// Error raised while building or decoding an extended model.
#[derive(Debug, thiserror::Error)]
pub enum ExtensionError {
    /// Template mode combined with explicitly set reserved fields.
    /// `fields` are in declaration order.
    #[error("Jobs using application templates may not use these properties: {}", .fields.join(", "))]
    ReservedFieldConflict { fields: Vec<String> },

    #[error("Invalid task factory: {0}")]
    TaskFactory(#[from] TaskFactoryError),

    #[error("Invalid application template reference: {0}")]
    Template(String),

    /// Field-level rule owned by the base model.
    #[error(transparent)]
    Base(#[from] ValidationError),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Canonicalization failed: {0}")]
    Canonicalization(String),
}

impl ExtensionError {
    pub fn is_reserved_conflict(&self) -> bool {
        matches!(self, ExtensionError::ReservedFieldConflict { .. })
    }

    /// Offending reserved fields, if this is a reserved-field conflict.
    pub fn reserved_fields(&self) -> Option<&[String]> {
        match self {
            ExtensionError::ReservedFieldConflict { fields } => Some(fields),
            _ => None,
        }
    }
}
