//! Profile tables: the immutable schema the validator interprets.
//!
//! - [`TypeDefinitions`] - type name to ordered property definitions
//! - [`ValueSets`] - value-set id to code systems and their codes
//! - [`ProfileTables`] - both tables bundled for sharing across validations

pub mod definitions;
pub mod property;
pub mod value_set;

pub use definitions::{TypeDefinition, TypeDefinitions};
pub use property::{
    PrimitiveKind, PropertyDefinition, RESOURCE_TYPE_TAG, TypeTag, ValueSetBinding,
};
pub use value_set::{CodeSystem, ValueSet, ValueSets};

use std::io::Read;

use crate::error::Result;

/// Profile data loaded once and read by every validation run.
///
/// Nothing mutates the tables after construction, so they can be shared
/// between threads behind a plain `Arc` without locking.
#[derive(Debug, Clone, Default)]
pub struct ProfileTables {
    pub types: TypeDefinitions,
    pub value_sets: ValueSets,
}

impl ProfileTables {
    pub fn new(types: TypeDefinitions, value_sets: ValueSets) -> Self {
        Self { types, value_sets }
    }

    /// Parse both tables from their JSON documents.
    pub fn from_json_str(types: &str, value_sets: &str) -> Result<Self> {
        Ok(Self::new(
            TypeDefinitions::from_json_str(types)?,
            ValueSets::from_json_str(value_sets)?,
        ))
    }

    pub fn from_readers<T: Read, V: Read>(types: T, value_sets: V) -> Result<Self> {
        Ok(Self::new(
            TypeDefinitions::from_reader(types)?,
            ValueSets::from_reader(value_sets)?,
        ))
    }
}
