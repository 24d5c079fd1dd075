//! Instance validation against profile tables.
//!
//! [`FhirInstanceValidator`] is the entry point: it resolves the root type from
//! the instance's `resourceType`, walks the instance with the property
//! definitions of that type, and returns the collected [`ValidationResponse`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use octofhir_instance_validator::{
//!     FhirInstanceValidator, ProfileTables, PropertyDefinition, TypeDefinition,
//!     TypeDefinitions, ValidationOptions, ValueSets,
//! };
//! use serde_json::json;
//!
//! let types = TypeDefinitions::new().with_type(TypeDefinition::new(
//!     "Patient",
//!     vec![PropertyDefinition::data_type("name", "HumanName").repeatable().required()],
//! ));
//! let validator = FhirInstanceValidator::new(Arc::new(ProfileTables::new(types, ValueSets::new())));
//!
//! let response = validator.validate(&json!({ "resourceType": "Patient" }), &ValidationOptions::default());
//! assert!(!response.valid);
//! assert_eq!(response.messages[0].location, "Patient.name");
//! ```

pub mod collector;
pub mod format;
pub mod instance;
pub mod location;

pub use collector::{DiagnosticCollector, Severity, ValidationMessage, ValidationResponse};
pub use format::{FormatRule, FormatViolation, check_format, rule_for};
pub use instance::{
    INVALID_RESOURCE_TYPE, MAX_DEPTH_EXCEEDED, MISSING_PROPERTY, NOT_AN_ARRAY, NOT_AN_OBJECT,
    RESOURCE_TYPE_KEY, UNEXPECTED_PROPERTY,
};
pub use location::LocationFormatter;

use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::core::{SourceFormat, ValidationOptions};
use crate::error::Result;
use crate::types::ProfileTables;
use instance::InstanceWalker;

/// Resource id used for a root instance without an `id`.
pub const INITIAL_RESOURCE_ID: &str = "#initial";

/// Validates resource instances against shared, read-only profile tables.
///
/// Cheap to clone; clones share the same tables.
#[derive(Debug, Clone)]
pub struct FhirInstanceValidator {
    tables: Arc<ProfileTables>,
    source_format: SourceFormat,
}

impl FhirInstanceValidator {
    pub fn new(tables: Arc<ProfileTables>) -> Self {
        Self {
            tables,
            source_format: SourceFormat::Json,
        }
    }

    /// Render locations for instances decoded from `format`.
    #[must_use]
    pub fn with_source_format(mut self, format: SourceFormat) -> Self {
        self.source_format = format;
        self
    }

    pub fn tables(&self) -> &ProfileTables {
        &self.tables
    }

    /// Validate one instance.
    ///
    /// Never fails: problems with the instance, including an unknown or
    /// missing `resourceType`, are reported as messages.
    pub fn validate(&self, instance: &JsonValue, options: &ValidationOptions) -> ValidationResponse {
        let obj = instance.as_object();
        let resource_id = obj
            .and_then(|obj| obj.get("id"))
            .and_then(JsonValue::as_str)
            .unwrap_or(INITIAL_RESOURCE_ID);
        let mut collector = DiagnosticCollector::new(resource_id);

        let resolved = obj.and_then(|obj| {
            let resource_type = obj.get(RESOURCE_TYPE_KEY)?.as_str()?;
            let definition = self.tables.types.get(resource_type)?;
            Some((obj, resource_type, definition))
        });

        let Some((obj, resource_type, definition)) = resolved else {
            tracing::debug!(resource_id, "Instance has no resolvable resource type");
            collector.add_fatal("", INVALID_RESOURCE_TYPE);
            return collector.into_response();
        };

        tracing::debug!(resource_type, resource_id, "Validating instance");

        let walker = InstanceWalker::new(
            &self.tables,
            options,
            LocationFormatter::new(self.source_format),
        );
        let root = vec![resource_type.to_string()];
        walker.validate_properties(&mut collector, obj, &definition.properties, &root, 1);

        let response = collector.into_response();
        tracing::debug!(
            resource_type,
            valid = response.valid,
            messages = response.messages.len(),
            "Validation finished"
        );
        response
    }

    /// Parse `json` and validate it.
    pub fn validate_str(&self, json: &str, options: &ValidationOptions) -> Result<ValidationResponse> {
        let instance: JsonValue = serde_json::from_str(json)?;
        Ok(self.validate(&instance, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InstanceValidatorError;
    use crate::types::{PrimitiveKind, PropertyDefinition, TypeDefinition, TypeDefinitions, ValueSets};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn validator() -> FhirInstanceValidator {
        let types = TypeDefinitions::new()
            .with_type(TypeDefinition::new(
                "Patient",
                vec![
                    PropertyDefinition::primitive("id", PrimitiveKind::Id),
                    PropertyDefinition::primitive("active", PrimitiveKind::Boolean),
                    PropertyDefinition::data_type("name", "HumanName").repeatable(),
                ],
            ))
            .with_type(TypeDefinition::new(
                "HumanName",
                vec![PropertyDefinition::primitive("given", PrimitiveKind::String).repeatable()],
            ));
        FhirInstanceValidator::new(Arc::new(ProfileTables::new(types, ValueSets::new())))
    }

    #[test]
    fn test_unknown_resource_type_is_fatal() {
        let response = validator().validate(
            &json!({ "resourceType": "Spaceship", "id": "x1" }),
            &ValidationOptions::default(),
        );
        assert_eq!(
            response,
            ValidationResponse {
                valid: false,
                messages: vec![ValidationMessage {
                    location: String::new(),
                    severity: Severity::Fatal,
                    message: INVALID_RESOURCE_TYPE.to_string(),
                    resource_id: "x1".to_string(),
                }],
            }
        );
    }

    #[test]
    fn test_non_object_and_missing_resource_type() {
        let validator = validator();
        for instance in [json!(null), json!("Patient"), json!({ "id": "a" })] {
            let response = validator.validate(&instance, &ValidationOptions::default());
            assert!(!response.valid);
            assert_eq!(response.messages.len(), 1);
            assert!(response.has_fatal());
        }
    }

    #[test]
    fn test_resource_id_defaults_to_initial() {
        let response = validator().validate(
            &json!({ "resourceType": "Patient", "active": "maybe" }),
            &ValidationOptions::default(),
        );
        assert_eq!(response.messages.len(), 1);
        assert_eq!(response.messages[0].resource_id, INITIAL_RESOURCE_ID);
        assert_eq!(response.messages[0].location, "Patient.active");
    }

    #[test]
    fn test_xml_locations() {
        let validator = validator().with_source_format(SourceFormat::Xml);
        let response = validator.validate(
            &json!({
                "resourceType": "Patient",
                "name": [ { "given": ["Ann"] }, { "given": "Bo" } ]
            }),
            &ValidationOptions::default(),
        );
        assert_eq!(response.messages.len(), 1);
        assert_eq!(response.messages[0].location, "Patient/name[2]/given");
        assert_eq!(response.messages[0].message, NOT_AN_ARRAY);
    }

    #[test]
    fn test_validate_str() {
        let validator = validator();
        let response = validator
            .validate_str(
                r#"{"resourceType": "Patient", "id": "p1", "active": true}"#,
                &ValidationOptions::default(),
            )
            .unwrap();
        assert!(response.valid);
        assert!(response.messages.is_empty());

        let err = validator
            .validate_str("not json", &ValidationOptions::default())
            .unwrap_err();
        assert!(matches!(err, InstanceValidatorError::SerializationError(_)));
    }
}
