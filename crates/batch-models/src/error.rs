//! Validation errors for base models.

/// Error raised when a base model violates a field-level rule.
///
/// Field names are the snake_case model names, not wire keys.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingRequired(String),

    #[error("Field '{field}' exceeds maximum length: {len} > {max}")]
    TooLong { field: String, len: usize, max: usize },

    #[error("Field '{field}' value {value} is outside the allowed range [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("Field '{field}' contains invalid characters: {value:?}")]
    InvalidCharacters { field: String, value: String },

    #[error("Invalid combination of fields: {0}")]
    Conflict(String),

    #[error("Unknown key '{key}' for {model}")]
    UnknownKey { model: String, key: String },

    #[error("Malformed JSON: {0}")]
    Json(String),
}

impl ValidationError {
    /// The model field this error is about, when there is exactly one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::MissingRequired(field) => Some(field),
            ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidCharacters { field, .. } => Some(field),
            ValidationError::UnknownKey { key, .. } => Some(key),
            ValidationError::Conflict(_) | ValidationError::Json(_) => None,
        }
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        ValidationError::Json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = ValidationError::OutOfRange {
            field: "priority".to_string(),
            value: 2000,
            min: -1000,
            max: 1000,
        };
        assert_eq!(
            err.to_string(),
            "Field 'priority' value 2000 is outside the allowed range [-1000, 1000]"
        );
        assert_eq!(err.field(), Some("priority"));
    }

    #[test]
    fn test_conflict_has_no_field() {
        let err = ValidationError::Conflict("poolId and autoPoolSpecification".to_string());
        assert!(err.field().is_none());
    }
}
