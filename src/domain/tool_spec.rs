//! Tool specifications
//!
//! A `ToolSpec` is the caller-supplied description of a backend tool:
//! its name, documentation, JSON-Schema input contract, and a handler code
//! fragment. Specs are validated once at the registration boundary and then
//! consumed by the code synthesizer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{FactoryError, FactoryResult};

const VALID_PROPERTY_TYPES: &[&str] = &[
    "string", "number", "integer", "boolean", "array", "object", "null",
];

/// Specification for a function-backed tool
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolSpec {
    /// Tool name (identifier style)
    pub name: String,
    /// Human-readable description exposed to the calling agent
    pub description: String,
    /// JSON Schema for the tool's input
    pub input_schema: Value,
    /// Handler source fragment: either a complete handler definition or a
    /// bare logic body operating on a `parameters` mapping
    pub handler_code: String,
}

impl ToolSpec {
    /// Validate the spec before any packaging or control-plane work.
    pub fn validate(&self) -> FactoryResult<()> {
        if !is_identifier(&self.name) {
            return Err(FactoryError::Validation(format!(
                "Tool name must be a valid identifier: {:?}",
                self.name
            )));
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(FactoryError::Validation(
                "Tool description cannot be empty".into(),
            ));
        }
        if description.len() < 10 {
            return Err(FactoryError::Validation(format!(
                "Tool description too short (minimum 10 characters): {}",
                description.len()
            )));
        }
        validate_tool_schema(&self.input_schema)?;
        if self.handler_code.trim().is_empty() {
            return Err(FactoryError::Validation(
                "Tool handler_code cannot be empty".into(),
            ));
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validate a tool input schema: a JSON-Schema-like object with a non-empty
/// `properties` map and a `required` list drawn from those properties.
pub fn validate_tool_schema(schema: &Value) -> FactoryResult<()> {
    let obj = schema
        .as_object()
        .ok_or_else(|| FactoryError::Validation("Tool schema must be an object".into()))?;

    match obj.get("type").and_then(Value::as_str) {
        Some("object") => {}
        Some(other) => {
            return Err(FactoryError::Validation(format!(
                "Tool schema type must be 'object', got: {}",
                other
            )))
        }
        None => {
            return Err(FactoryError::Validation(
                "Tool schema must have 'type' field".into(),
            ))
        }
    }

    let properties = obj
        .get("properties")
        .ok_or_else(|| FactoryError::Validation("Tool schema must have 'properties' field".into()))?
        .as_object()
        .ok_or_else(|| FactoryError::Validation("Tool schema 'properties' must be an object".into()))?;

    if properties.is_empty() {
        return Err(FactoryError::Validation(
            "Tool schema 'properties' cannot be empty".into(),
        ));
    }

    for (prop_name, prop_schema) in properties {
        let prop_obj = prop_schema.as_object().ok_or_else(|| {
            FactoryError::Validation(format!("Property '{}' schema must be an object", prop_name))
        })?;
        match prop_obj.get("type").and_then(Value::as_str) {
            Some(t) if VALID_PROPERTY_TYPES.contains(&t) => {}
            Some(t) => {
                return Err(FactoryError::Validation(format!(
                    "Property '{}' has invalid type: {}. Valid types: {}",
                    prop_name,
                    t,
                    VALID_PROPERTY_TYPES.join(", ")
                )))
            }
            None => {
                return Err(FactoryError::Validation(format!(
                    "Property '{}' must have 'type' field",
                    prop_name
                )))
            }
        }
        if prop_obj.get("description").is_none() {
            tracing::warn!(property = %prop_name, "tool schema property missing description");
        }
    }

    if let Some(required) = obj.get("required") {
        let required = required.as_array().ok_or_else(|| {
            FactoryError::Validation("Tool schema 'required' must be a list".into())
        })?;
        for entry in required {
            let entry = entry.as_str().ok_or_else(|| {
                FactoryError::Validation("Tool schema 'required' entries must be strings".into())
            })?;
            if !properties.contains_key(entry) {
                return Err(FactoryError::Validation(format!(
                    "Required property '{}' not found in properties",
                    entry
                )));
            }
        }
    }

    Ok(())
}
