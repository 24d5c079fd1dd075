//! Recursive, profile-driven instance walker.
//!
//! Two mutually recursive steps do the work: [`InstanceWalker::validate_properties`]
//! checks presence, cardinality and unexpected keys of one object against a
//! property list, and `validate_next` dispatches a single value on its
//! binding and declared type. Composite data types share the enclosing
//! collector; embedded resources get a collector of their own that is merged
//! back when they finish.

use std::collections::HashSet;

use serde_json::{Map, Value as JsonValue};

use super::collector::DiagnosticCollector;
use super::format::{check_format, raw_text};
use super::location::{LocationFormatter, descend};
use crate::core::ValidationOptions;
use crate::terminology::{is_member, resolve_value_set};
use crate::types::{ProfileTables, PropertyDefinition, TypeTag, ValueSet, ValueSetBinding};

pub const RESOURCE_TYPE_KEY: &str = "resourceType";

pub const MISSING_PROPERTY: &str = "Missing property";
pub const NOT_AN_ARRAY: &str = "Property is not an array";
pub const NOT_AN_OBJECT: &str = "Property is not an object";
pub const UNEXPECTED_PROPERTY: &str = "Unexpected property";
/// Reported at the root location `""` for the top-level resource, and at the
/// referencing property's path for an embedded one.
pub const INVALID_RESOURCE_TYPE: &str =
    "Resource does not have resourceType property, or value is not a valid resource type.";
pub const MAX_DEPTH_EXCEEDED: &str = "Maximum validation depth exceeded";

pub(crate) struct InstanceWalker<'a> {
    tables: &'a ProfileTables,
    options: &'a ValidationOptions,
    locations: LocationFormatter,
}

impl<'a> InstanceWalker<'a> {
    pub(crate) fn new(
        tables: &'a ProfileTables,
        options: &'a ValidationOptions,
        locations: LocationFormatter,
    ) -> Self {
        Self {
            tables,
            options,
            locations,
        }
    }

    /// Validate `obj` against `properties`. `depth` counts enclosing objects,
    /// starting at 1 for the root resource.
    pub(crate) fn validate_properties(
        &self,
        collector: &mut DiagnosticCollector,
        obj: &Map<String, JsonValue>,
        properties: &[PropertyDefinition],
        tree: &[String],
        depth: usize,
    ) {
        if depth > self.options.max_depth {
            tracing::warn!(
                location = %self.locations.display(tree),
                max_depth = self.options.max_depth,
                "Validation depth limit reached"
            );
            collector.add_fatal(self.locations.display(tree), MAX_DEPTH_EXCEEDED);
            return;
        }

        let mut reported_groups = HashSet::new();

        for property in properties {
            let value = obj.get(&property.name).filter(|value| !value.is_null());

            let Some(value) = value else {
                if property.required && !self.choice_satisfied(obj, property, properties) {
                    let label = property.missing_label();
                    let first_report = match &property.choice_group {
                        Some(group) => reported_groups.insert(group.as_str()),
                        None => true,
                    };
                    if first_report {
                        collector.add_error(
                            self.locations.display_with_leaf(tree, Some(label)),
                            MISSING_PROPERTY,
                        );
                    }
                }
                continue;
            };

            tracing::trace!(
                property = %property.name,
                location = %self.locations.display(tree),
                "Validating property"
            );

            if property.repeatable {
                let Some(items) = value.as_array() else {
                    collector.add_error(
                        self.locations.display_with_leaf(tree, Some(&property.name)),
                        NOT_AN_ARRAY,
                    );
                    continue;
                };

                if property.required && items.is_empty() {
                    collector.add_error(
                        self.locations.display_with_leaf(tree, Some(&property.name)),
                        format!("A {} entry is required", property.name),
                    );
                }

                for (index, item) in items.iter().enumerate() {
                    let item_tree = descend(tree, self.locations.array_item(&property.name, index));
                    self.validate_next(collector, item, property, &item_tree, depth);
                }
            } else {
                let value_tree = descend(tree, property.name.as_str());
                self.validate_next(collector, value, property, &value_tree, depth);
            }
        }

        for key in obj.keys() {
            if key == RESOURCE_TYPE_KEY || properties.iter().any(|p| &p.name == key) {
                continue;
            }

            let location = self.locations.display_with_leaf(tree, Some(key));
            if self.options.error_on_unexpected {
                collector.add_error(location, UNEXPECTED_PROPERTY);
            } else {
                collector.add_warning(location, UNEXPECTED_PROPERTY);
            }
        }
    }

    /// Whether a sibling in `property`'s choice group carries a value.
    fn choice_satisfied(
        &self,
        obj: &Map<String, JsonValue>,
        property: &PropertyDefinition,
        siblings: &[PropertyDefinition],
    ) -> bool {
        let Some(group) = &property.choice_group else {
            return false;
        };

        siblings
            .iter()
            .filter(|sibling| sibling.choice_group.as_ref() == Some(group))
            .any(|sibling| obj.get(&sibling.name).is_some_and(is_populated))
    }

    fn validate_next(
        &self,
        collector: &mut DiagnosticCollector,
        value: &JsonValue,
        property: &PropertyDefinition,
        tree: &[String],
        depth: usize,
    ) {
        if let Some(binding) = &property.binding {
            self.check_binding(collector, value, property, binding, tree);
        }

        match &property.type_tag {
            TypeTag::Primitive(kind) => {
                if let Err(violation) = check_format(*kind, value) {
                    collector.add_error(self.locations.display(tree), violation.message());
                }
            }
            TypeTag::Resource => {
                let nested = self.validate_resource(value, tree, depth + 1);
                collector.merge(nested.into_response());
            }
            TypeTag::DataType(type_name) => match self.tables.types.get(type_name) {
                Some(definition) => {
                    self.validate_structure(collector, value, &definition.properties, tree, depth)
                }
                None => {
                    tracing::warn!(
                        type_name = %type_name,
                        location = %self.locations.display(tree),
                        "Data type is not defined, skipping structural validation"
                    );
                }
            },
            TypeTag::Nested(properties) => {
                self.validate_structure(collector, value, properties, tree, depth)
            }
            TypeTag::Opaque(type_name) => {
                tracing::trace!(type_name = %type_name, "No structural rules for type");
            }
        }
    }

    fn validate_structure(
        &self,
        collector: &mut DiagnosticCollector,
        value: &JsonValue,
        properties: &[PropertyDefinition],
        tree: &[String],
        depth: usize,
    ) {
        match value.as_object() {
            Some(obj) => self.validate_properties(collector, obj, properties, tree, depth + 1),
            None => collector.add_error(self.locations.display(tree), NOT_AN_OBJECT),
        }
    }

    /// Validate an embedded resource under its own identity.
    fn validate_resource(
        &self,
        value: &JsonValue,
        tree: &[String],
        depth: usize,
    ) -> DiagnosticCollector {
        let location = self.locations.display(tree);
        let resource_id = value
            .get("id")
            .and_then(JsonValue::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| location.clone());
        let mut collector = DiagnosticCollector::new(resource_id);

        let resolved = value.as_object().and_then(|obj| {
            let resource_type = obj.get(RESOURCE_TYPE_KEY)?.as_str()?;
            let definition = self.tables.types.get(resource_type)?;
            Some((obj, resource_type, definition))
        });

        match resolved {
            Some((obj, resource_type, definition)) => {
                tracing::trace!(
                    resource_type,
                    resource_id = collector.resource_id(),
                    "Validating embedded resource"
                );
                let root = vec![resource_type.to_string()];
                self.validate_properties(&mut collector, obj, &definition.properties, &root, depth);
            }
            None => collector.add_fatal(location, INVALID_RESOURCE_TYPE),
        }

        collector
    }

    fn check_binding(
        &self,
        collector: &mut DiagnosticCollector,
        value: &JsonValue,
        property: &PropertyDefinition,
        binding: &ValueSetBinding,
        tree: &[String],
    ) {
        let location = self.locations.display(tree);
        let value_set = match resolve_value_set(&self.tables.value_sets, &binding.value_set) {
            Ok(value_set) => value_set,
            Err(err) => {
                collector.add_info(location, err.to_string());
                return;
            }
        };

        let severity = binding.strength.failure_severity();
        let coded: Vec<(CodeText<'_>, Option<&str>)> = match property.type_tag.type_name() {
            Some("CodeableConcept") => value
                .get("coding")
                .and_then(JsonValue::as_array)
                .into_iter()
                .flatten()
                .map(coding_parts)
                .collect(),
            Some("Coding") => vec![coding_parts(value)],
            Some("code") => vec![(CodeText::of(Some(value)), None)],
            _ => Vec::new(),
        };

        for (code, system) in coded {
            let member = match &code {
                CodeText::Text(code) => is_member(value_set, code, system),
                CodeText::Malformed(_) => false,
            };
            if !member {
                collector.add(
                    location.clone(),
                    severity,
                    not_in_value_set(value_set, code.as_str(), system),
                );
            }
        }
    }
}

/// A coded value as found in the instance. Anything other than a string is
/// malformed and never a member of a value set.
enum CodeText<'v> {
    Text(&'v str),
    Malformed(String),
}

impl<'v> CodeText<'v> {
    fn of(value: Option<&'v JsonValue>) -> Self {
        match value {
            Some(JsonValue::String(text)) => CodeText::Text(text),
            Some(other) => CodeText::Malformed(raw_text(other)),
            None => CodeText::Malformed(String::new()),
        }
    }

    fn as_str(&self) -> &str {
        match self {
            CodeText::Text(text) => text,
            CodeText::Malformed(text) => text,
        }
    }
}

/// `code` and `system` of a Coding-shaped value. An empty `system` counts as absent.
fn coding_parts(coding: &JsonValue) -> (CodeText<'_>, Option<&str>) {
    let code = CodeText::of(coding.get("code"));
    let system = coding
        .get("system")
        .and_then(JsonValue::as_str)
        .filter(|system| !system.is_empty());
    (code, system)
}

fn not_in_value_set(value_set: &ValueSet, code: &str, system: Option<&str>) -> String {
    match system {
        Some(system) => format!(
            "Code \"{code}\" ({system}) not found in value set \"{}\"",
            value_set.id
        ),
        None => format!("Code \"{code}\" not found in value set \"{}\"", value_set.id),
    }
}

/// Present and carrying content. `false` and `0` count as content.
fn is_populated(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::String(text) => !text.is_empty(),
        JsonValue::Array(items) => !items.is_empty(),
        JsonValue::Object(fields) => !fields.is_empty(),
        JsonValue::Bool(_) | JsonValue::Number(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SourceFormat;
    use crate::types::{PrimitiveKind, TypeDefinition, TypeDefinitions, ValueSets};
    use serde_json::json;

    fn walk(
        properties: &[PropertyDefinition],
        instance: JsonValue,
        options: &ValidationOptions,
    ) -> crate::validation::ValidationResponse {
        let tables = ProfileTables::new(
            TypeDefinitions::new().with_type(TypeDefinition::new(
                "Quantity",
                vec![
                    PropertyDefinition::primitive("value", PrimitiveKind::Decimal),
                    PropertyDefinition::primitive("unit", PrimitiveKind::String),
                ],
            )),
            ValueSets::new(),
        );
        let walker = InstanceWalker::new(&tables, options, LocationFormatter::new(SourceFormat::Json));
        let mut collector = DiagnosticCollector::new("#initial");
        let obj = instance.as_object().unwrap();
        walker.validate_properties(&mut collector, obj, properties, &["Test".to_string()], 1);
        collector.into_response()
    }

    #[test]
    fn test_is_populated() {
        assert!(!is_populated(&json!(null)));
        assert!(!is_populated(&json!("")));
        assert!(!is_populated(&json!([])));
        assert!(!is_populated(&json!({})));
        assert!(is_populated(&json!(false)));
        assert!(is_populated(&json!(0)));
        assert!(is_populated(&json!("x")));
    }

    #[test]
    fn test_choice_group_reported_once() {
        let properties = vec![
            PropertyDefinition::primitive("valueString", PrimitiveKind::String)
                .required()
                .in_choice_group("value[x]"),
            PropertyDefinition::primitive("valueBoolean", PrimitiveKind::Boolean)
                .required()
                .in_choice_group("value[x]"),
        ];
        let response = walk(&properties, json!({}), &ValidationOptions::default());
        assert_eq!(response.messages.len(), 1);
        assert_eq!(response.messages[0].location, "Test.value[x]");
        assert_eq!(response.messages[0].message, MISSING_PROPERTY);

        let response = walk(
            &properties,
            json!({ "valueBoolean": false }),
            &ValidationOptions::default(),
        );
        assert!(response.valid);
        assert!(response.messages.is_empty());
    }

    #[test]
    fn test_empty_choice_sibling_does_not_satisfy() {
        let properties = vec![
            PropertyDefinition::primitive("valueString", PrimitiveKind::String)
                .required()
                .in_choice_group("value[x]"),
            PropertyDefinition::primitive("valueCode", PrimitiveKind::String)
                .in_choice_group("value[x]"),
        ];
        let response = walk(
            &properties,
            json!({ "valueCode": "" }),
            &ValidationOptions::default(),
        );
        assert!(!response.valid);
        assert_eq!(response.errors().count(), 1);
    }

    #[test]
    fn test_null_counts_as_absent() {
        let properties = vec![PropertyDefinition::primitive("status", PrimitiveKind::Code).required()];
        let response = walk(
            &properties,
            json!({ "status": null }),
            &ValidationOptions::default(),
        );
        assert_eq!(response.messages.len(), 1);
        assert_eq!(response.messages[0].message, MISSING_PROPERTY);
    }

    #[test]
    fn test_composite_requires_object() {
        let properties = vec![PropertyDefinition::data_type("valueQuantity", "Quantity")];
        let response = walk(
            &properties,
            json!({ "valueQuantity": "12 mg" }),
            &ValidationOptions::default(),
        );
        assert_eq!(response.messages.len(), 1);
        assert_eq!(response.messages[0].location, "Test.valueQuantity");
        assert_eq!(response.messages[0].message, NOT_AN_OBJECT);
    }

    #[test]
    fn test_composite_shares_identity_and_path() {
        let properties = vec![PropertyDefinition::data_type("valueQuantity", "Quantity")];
        let response = walk(
            &properties,
            json!({ "valueQuantity": { "value": "1.5.2", "extra": 1 } }),
            &ValidationOptions::default(),
        );
        assert!(!response.valid);
        assert_eq!(response.messages.len(), 2);
        assert_eq!(response.messages[0].location, "Test.valueQuantity.value");
        assert_eq!(response.messages[1].location, "Test.valueQuantity.extra");
        assert!(response.messages.iter().all(|m| m.resource_id == "#initial"));
    }

    #[test]
    fn test_depth_limit() {
        let properties = vec![PropertyDefinition::nested(
            "inner",
            vec![PropertyDefinition::nested(
                "inner",
                vec![PropertyDefinition::primitive("leaf", PrimitiveKind::String)],
            )],
        )];
        let options = ValidationOptions::default().with_max_depth(2);
        let response = walk(
            &properties,
            json!({ "inner": { "inner": { "leaf": "x" } } }),
            &options,
        );
        assert!(!response.valid);
        assert_eq!(response.messages.len(), 1);
        assert_eq!(response.messages[0].location, "Test.inner.inner");
        assert_eq!(response.messages[0].message, MAX_DEPTH_EXCEEDED);
    }
}
