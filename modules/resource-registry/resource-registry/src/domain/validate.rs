//! Schema-driven validation of resource bodies.
//!
//! Two fixed base schemas are compiled once at construction: the structural
//! shape every resource must satisfy, and the additional shape required of
//! type-descriptor documents. Version-specific schemas are dynamic (they
//! arrive with descriptor registrations) and are compiled per validation.

use jsonschema::Validator;
use resource_registry_sdk::VersionSchema;
use serde_json::{Value, json};

use super::error::DomainError;

/// Default base schema: required top-level fields of every resource.
#[must_use]
pub fn default_base_schema() -> Value {
    json!({
        "type": "object",
        "required": ["apiVersion", "kind", "metadata", "spec"],
        "properties": {
            "apiVersion": {"type": "string", "pattern": "^[^/]+/[^/]+$"},
            "kind": {"type": "string", "minLength": 1},
            "metadata": {
                "type": "object",
                "required": ["name"],
                "properties": {
                    "name": {"type": "string", "minLength": 1}
                }
            },
            "spec": {"type": "object"}
        }
    })
}

/// Default descriptor schema: the extra shape of type-descriptor documents.
#[must_use]
pub fn default_descriptor_schema() -> Value {
    json!({
        "type": "object",
        "required": ["spec"],
        "properties": {
            "spec": {
                "type": "object",
                "required": ["group", "names", "versions"],
                "properties": {
                    "group": {"type": "string", "minLength": 1},
                    "names": {
                        "type": "object",
                        "required": ["plural", "singular", "kind"],
                        "properties": {
                            "plural": {"type": "string", "minLength": 1},
                            "singular": {"type": "string", "minLength": 1},
                            "kind": {"type": "string", "minLength": 1}
                        }
                    },
                    "versions": {
                        "type": "array",
                        "minItems": 1,
                        "items": {
                            "type": "object",
                            "required": ["name", "schemaVersion", "schema"],
                            "properties": {
                                "name": {"type": "string", "minLength": 1},
                                "schemaVersion": {"type": "string"},
                                "schema": {"type": "object"}
                            }
                        }
                    }
                }
            }
        }
    })
}

/// Validates resource bodies against the fixed base schemas and against
/// dynamically registered version schemas.
pub struct SchemaValidator {
    base: Validator,
    descriptor_base: Validator,
    schema_format: String,
}

impl SchemaValidator {
    /// Compiles the two base schema documents.
    ///
    /// # Errors
    ///
    /// `Internal` if either document is not a valid JSON Schema.
    pub fn new(
        base_schema: &Value,
        descriptor_schema: &Value,
        schema_format: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let base = jsonschema::validator_for(base_schema)
            .map_err(|e| DomainError::Internal(anyhow::anyhow!("base schema invalid: {e}")))?;
        let descriptor_base = jsonschema::validator_for(descriptor_schema).map_err(|e| {
            DomainError::Internal(anyhow::anyhow!("descriptor base schema invalid: {e}"))
        })?;
        Ok(Self {
            base,
            descriptor_base,
            schema_format: schema_format.into(),
        })
    }

    /// Compiles the built-in base schema documents.
    ///
    /// # Errors
    ///
    /// `Internal` if the built-in documents fail to compile.
    pub fn with_defaults(schema_format: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(
            &default_base_schema(),
            &default_descriptor_schema(),
            schema_format,
        )
    }

    fn first_violation(validator: &Validator, instance: &Value) -> Result<(), DomainError> {
        if let Some(error) = validator.iter_errors(instance).next() {
            let path = error.instance_path().to_string();
            let path = if path.is_empty() { "/".to_owned() } else { path };
            return Err(DomainError::validation(path, error.to_string()));
        }
        Ok(())
    }

    /// Checks the fixed base shape every resource must satisfy, regardless
    /// of type.
    pub fn validate_structure(&self, resource: &Value) -> Result<(), DomainError> {
        Self::first_violation(&self.base, resource)
    }

    /// Additional structural check applied only to type-descriptor
    /// documents, including the schema format tag of every version entry.
    pub fn validate_type_descriptor(&self, resource: &Value) -> Result<(), DomainError> {
        Self::first_violation(&self.descriptor_base, resource)?;

        let versions = resource
            .pointer("/spec/versions")
            .and_then(|v| v.as_array())
            .ok_or_else(|| DomainError::validation("/spec/versions", "expected an array"))?;
        for (index, version) in versions.iter().enumerate() {
            let tag = version.get("schemaVersion").and_then(|v| v.as_str());
            if tag != Some(self.schema_format.as_str()) {
                return Err(DomainError::validation(
                    format!("/spec/versions/{index}/schemaVersion"),
                    format!(
                        "unrecognized schema format {:?}, expected '{}'",
                        tag.unwrap_or("<missing>"),
                        self.schema_format
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Validates `{"spec": ...}` against the version-specific schema.
    pub fn validate_against_schema(
        &self,
        resource: &Value,
        version: &VersionSchema,
    ) -> Result<(), DomainError> {
        let validator = jsonschema::validator_for(&version.schema).map_err(|e| {
            DomainError::validation(
                "/spec/versions",
                format!("schema for version '{}' is not compilable: {e}", version.name),
            )
        })?;
        let spec = resource.get("spec").cloned().unwrap_or(Value::Null);
        Self::first_violation(&validator, &json!({ "spec": spec }))
    }
}
