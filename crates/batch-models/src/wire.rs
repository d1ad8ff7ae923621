//! Field-map driven JSON wire codec.
//!
//! Serde does the member-level encoding; this module checks the resulting
//! object against the model's [`FieldSpec`] table so that required members
//! are present and no undeclared member reaches or leaves the wire.

use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::field::{FieldSpec, WireModel};

/// Check a JSON object against a field map.
///
/// Required members must be present and non-null. Members not in the map
/// are rejected.
pub fn check_object(
    model: &str,
    fields: &[FieldSpec],
    object: &Map<String, Value>,
) -> Result<(), ValidationError> {
    for spec in fields.iter().filter(|spec| spec.required) {
        match object.get(spec.key) {
            Some(Value::Null) | None => {
                return Err(ValidationError::MissingRequired(spec.name.to_string()))
            }
            Some(_) => {}
        }
    }

    if let Some(key) = object.keys().find(|key| !fields.iter().any(|spec| spec.key == key.as_str())) {
        return Err(ValidationError::UnknownKey {
            model: model.to_string(),
            key: key.clone(),
        });
    }

    Ok(())
}

fn as_object<'a>(model: &str, value: &'a Value) -> Result<&'a Map<String, Value>, ValidationError> {
    value
        .as_object()
        .ok_or_else(|| ValidationError::Json(format!("{} must be a JSON object", model)))
}

/// Encode a model to its wire form.
pub fn to_wire<M: WireModel>(model: &M) -> Result<Value, ValidationError> {
    let value = serde_json::to_value(model)?;
    check_object(M::MODEL_NAME, M::field_map(), as_object(M::MODEL_NAME, &value)?)?;
    Ok(value)
}

/// Decode a model from its wire form.
pub fn from_wire<M: WireModel>(value: Value) -> Result<M, ValidationError> {
    check_object(M::MODEL_NAME, M::field_map(), as_object(M::MODEL_NAME, &value)?)?;
    Ok(serde_json::from_value(value)?)
}

/// Decode a model from a JSON string.
pub fn from_str<M: WireModel>(s: &str) -> Result<M, ValidationError> {
    let value: Value = serde_json::from_str(s)?;
    from_wire(value)
}
