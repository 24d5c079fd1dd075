//! Property definitions and resolved type tags.
//!
//! A profile declares each field of a type as a [`PropertyDefinition`]. The
//! declared type is resolved once, when the profile is loaded, into a
//! [`TypeTag`] so the validator can match on it exhaustively instead of
//! comparing type-name strings on every call.

use std::fmt;

use crate::terminology::BindingStrength;

/// Name of the polymorphic embedded-resource type tag.
pub const RESOURCE_TYPE_TAG: &str = "Resource";

/// FHIR primitive types understood by the format rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Instant,
    Time,
    Date,
    DateTime,
    Decimal,
    Boolean,
    Integer,
    Base64Binary,
    String,
    Uri,
    UnsignedInt,
    PositiveInt,
    Code,
    Id,
    Oid,
    Markdown,
    /// Carrier for extensions on primitives, no lexical form
    Element,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 17] = [
        PrimitiveKind::Instant,
        PrimitiveKind::Time,
        PrimitiveKind::Date,
        PrimitiveKind::DateTime,
        PrimitiveKind::Decimal,
        PrimitiveKind::Boolean,
        PrimitiveKind::Integer,
        PrimitiveKind::Base64Binary,
        PrimitiveKind::String,
        PrimitiveKind::Uri,
        PrimitiveKind::UnsignedInt,
        PrimitiveKind::PositiveInt,
        PrimitiveKind::Code,
        PrimitiveKind::Id,
        PrimitiveKind::Oid,
        PrimitiveKind::Markdown,
        PrimitiveKind::Element,
    ];

    /// Parse a profile type name. Matching is case-sensitive, as in FHIR.
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_name() == name)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            PrimitiveKind::Instant => "instant",
            PrimitiveKind::Time => "time",
            PrimitiveKind::Date => "date",
            PrimitiveKind::DateTime => "dateTime",
            PrimitiveKind::Decimal => "decimal",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Base64Binary => "base64Binary",
            PrimitiveKind::String => "string",
            PrimitiveKind::Uri => "uri",
            PrimitiveKind::UnsignedInt => "unsignedInt",
            PrimitiveKind::PositiveInt => "positiveInt",
            PrimitiveKind::Code => "code",
            PrimitiveKind::Id => "id",
            PrimitiveKind::Oid => "oid",
            PrimitiveKind::Markdown => "markdown",
            PrimitiveKind::Element => "Element",
        }
    }

    /// Numeric kinds are only format-checked when the raw value is textual.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            PrimitiveKind::Integer
                | PrimitiveKind::Decimal
                | PrimitiveKind::UnsignedInt
                | PrimitiveKind::PositiveInt
        )
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Resolved declared type of a property.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeTag {
    Primitive(PrimitiveKind),
    /// Named composite data type, looked up in the type definitions
    DataType(String),
    /// Polymorphic embedded resource, typed by its own `resourceType`
    Resource,
    /// Inline anonymous structure
    Nested(Vec<PropertyDefinition>),
    /// Type name the profile tables know nothing about
    Opaque(String),
}

impl TypeTag {
    /// Declared type name, if the tag carries one.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            TypeTag::Primitive(kind) => Some(kind.type_name()),
            TypeTag::DataType(name) | TypeTag::Opaque(name) => Some(name),
            TypeTag::Resource => Some(RESOURCE_TYPE_TAG),
            TypeTag::Nested(_) => None,
        }
    }
}

/// Value-set binding attached to a coded property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSetBinding {
    pub value_set: String,
    pub strength: BindingStrength,
}

/// One declared field of a type.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDefinition {
    pub name: String,
    pub type_tag: TypeTag,
    pub required: bool,
    /// Field holds an ordered sequence rather than a single value
    pub repeatable: bool,
    /// Siblings sharing a group jointly satisfy `required`
    pub choice_group: Option<String>,
    pub binding: Option<ValueSetBinding>,
}

impl PropertyDefinition {
    pub fn new(name: impl Into<String>, type_tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            type_tag,
            required: false,
            repeatable: false,
            choice_group: None,
            binding: None,
        }
    }

    pub fn primitive(name: impl Into<String>, kind: PrimitiveKind) -> Self {
        Self::new(name, TypeTag::Primitive(kind))
    }

    pub fn data_type(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(name, TypeTag::DataType(type_name.into()))
    }

    pub fn resource(name: impl Into<String>) -> Self {
        Self::new(name, TypeTag::Resource)
    }

    pub fn nested(name: impl Into<String>, properties: Vec<PropertyDefinition>) -> Self {
        Self::new(name, TypeTag::Nested(properties))
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    #[must_use]
    pub fn in_choice_group(mut self, group: impl Into<String>) -> Self {
        self.choice_group = Some(group.into());
        self
    }

    #[must_use]
    pub fn bound_to(mut self, value_set: impl Into<String>, strength: BindingStrength) -> Self {
        self.binding = Some(ValueSetBinding {
            value_set: value_set.into(),
            strength,
        });
        self
    }

    /// Segment used when reporting this property as missing.
    pub fn missing_label(&self) -> &str {
        self.choice_group.as_deref().unwrap_or(&self.name)
    }
}
