use thiserror::Error;

#[derive(Error, Debug)]
pub enum InstanceValidatorError {
    #[error("Invalid property definition {type_name}.{property}: {message}")]
    InvalidPropertyDefinition {
        type_name: String,
        property: String,
        message: String,
    },

    #[error("Duplicate property {type_name}.{property}")]
    DuplicateProperty { type_name: String, property: String },

    #[error("Invalid value set {id}: {message}")]
    InvalidValueSet { id: String, message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InstanceValidatorError>;

impl InstanceValidatorError {
    pub fn invalid_property_definition<S: Into<String>>(
        type_name: S,
        property: S,
        message: S,
    ) -> Self {
        Self::InvalidPropertyDefinition {
            type_name: type_name.into(),
            property: property.into(),
            message: message.into(),
        }
    }

    pub fn duplicate_property<S: Into<String>>(type_name: S, property: S) -> Self {
        Self::DuplicateProperty {
            type_name: type_name.into(),
            property: property.into(),
        }
    }

    pub fn invalid_value_set<S: Into<String>>(id: S, message: S) -> Self {
        Self::InvalidValueSet {
            id: id.into(),
            message: message.into(),
        }
    }
}
