//! Type definitions and the profile-table loader.

use std::collections::{HashMap, HashSet};
use std::io::Read;

use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::property::{
    PrimitiveKind, PropertyDefinition, RESOURCE_TYPE_TAG, TypeTag, ValueSetBinding,
};
use crate::error::{InstanceValidatorError, Result};
use crate::terminology::BindingStrength;

/// A named resource type or composite data type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    pub name: String,
    /// Declared fields in profile order
    pub properties: Vec<PropertyDefinition>,
}

impl TypeDefinition {
    pub fn new(name: impl Into<String>, properties: Vec<PropertyDefinition>) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Immutable lookup of type name to definition.
#[derive(Debug, Clone, Default)]
pub struct TypeDefinitions {
    types: HashMap<String, TypeDefinition>,
}

impl TypeDefinitions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_type(mut self, definition: TypeDefinition) -> Self {
        self.types.insert(definition.name.clone(), definition);
        self
    }

    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Load definitions from the profile table format:
    ///
    /// ```json
    /// { "Patient": { "_properties": [ { "_name": "gender", "_type": "code" } ] } }
    /// ```
    ///
    /// Type tags are resolved against the loaded table itself, so a property
    /// typed `HumanName` becomes a [`TypeTag::DataType`] only when `HumanName`
    /// is defined in the same document.
    pub fn from_json_value(value: JsonValue) -> Result<Self> {
        let raw: HashMap<String, RawTypeDefinition> = serde_json::from_value(value)?;
        let known: HashSet<&str> = raw.keys().map(String::as_str).collect();

        let mut types = HashMap::with_capacity(raw.len());
        for (name, definition) in &raw {
            let properties = resolve_properties(name, &definition.properties, &known)?;
            types.insert(name.clone(), TypeDefinition::new(name.clone(), properties));
        }

        tracing::info!(types = types.len(), "Loaded type definitions");
        Ok(Self { types })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_json_value(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_json_value(serde_json::from_reader(reader)?)
    }
}

#[derive(Debug, Deserialize)]
struct RawTypeDefinition {
    #[serde(rename = "_properties", default)]
    properties: Vec<RawPropertyDefinition>,
}

#[derive(Debug, Deserialize)]
struct RawPropertyDefinition {
    #[serde(rename = "_name")]
    name: Option<String>,
    #[serde(rename = "_type")]
    type_name: Option<String>,
    #[serde(rename = "_required", default)]
    required: bool,
    #[serde(rename = "_multiple", default)]
    multiple: bool,
    #[serde(rename = "_choice")]
    choice: Option<String>,
    #[serde(rename = "_valueSet")]
    value_set: Option<String>,
    #[serde(rename = "_valueSetStrength")]
    value_set_strength: Option<String>,
    #[serde(rename = "_properties")]
    properties: Option<Vec<RawPropertyDefinition>>,
}

fn resolve_properties(
    owner: &str,
    raw: &[RawPropertyDefinition],
    known: &HashSet<&str>,
) -> Result<Vec<PropertyDefinition>> {
    let mut seen = HashSet::with_capacity(raw.len());
    let mut properties = Vec::with_capacity(raw.len());

    for raw_property in raw {
        let property = resolve_property(owner, raw_property, known)?;
        if !seen.insert(property.name.clone()) {
            return Err(InstanceValidatorError::duplicate_property(
                owner.to_string(),
                property.name,
            ));
        }
        properties.push(property);
    }

    Ok(properties)
}

fn resolve_property(
    owner: &str,
    raw: &RawPropertyDefinition,
    known: &HashSet<&str>,
) -> Result<PropertyDefinition> {
    let name = match raw.name.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => {
            return Err(InstanceValidatorError::invalid_property_definition(
                owner,
                "<unnamed>",
                "property has no _name",
            ));
        }
    };

    let primitive = raw
        .type_name
        .as_deref()
        .and_then(PrimitiveKind::from_type_name);

    let type_tag = match (primitive, raw.type_name.as_deref(), raw.properties.as_deref()) {
        (Some(kind), _, _) => TypeTag::Primitive(kind),
        (None, Some(RESOURCE_TYPE_TAG), _) => TypeTag::Resource,
        (None, _, Some(nested)) => {
            let path = format!("{owner}.{name}");
            TypeTag::Nested(resolve_properties(&path, nested, known)?)
        }
        (None, Some(type_name), None) if known.contains(type_name) => {
            TypeTag::DataType(type_name.to_string())
        }
        (None, Some(type_name), None) => {
            tracing::warn!(
                owner,
                property = name,
                type_name,
                "Property type is not defined in the profile tables"
            );
            TypeTag::Opaque(type_name.to_string())
        }
        (None, None, None) => {
            return Err(InstanceValidatorError::invalid_property_definition(
                owner,
                name,
                "property declares neither _type nor _properties",
            ));
        }
    };

    let binding = raw.value_set.as_ref().map(|value_set| ValueSetBinding {
        value_set: value_set.clone(),
        strength: raw
            .value_set_strength
            .as_deref()
            .and_then(BindingStrength::parse_str)
            .unwrap_or(BindingStrength::Extensible),
    });

    Ok(PropertyDefinition {
        name: name.to_string(),
        type_tag,
        required: raw.required,
        repeatable: raw.multiple,
        choice_group: raw.choice.clone(),
        binding,
    })
}
