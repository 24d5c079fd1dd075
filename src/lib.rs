//! # OctoFHIR Instance Validator
//!
//! Structural validation of FHIR resource instances against profile tables:
//! type definitions (ordered property lists per resource and data type) and
//! value sets.
//!
//! ## Features
//!
//! - **Presence and cardinality**: required properties, choice groups, repeating fields
//! - **Type dispatch**: primitives, composite data types, inline structures, embedded resources
//! - **Primitive formats**: FHIR lexical rules for numbers, dates, times, codes, ids and oids
//! - **Terminology**: code membership in bound value sets, severity by binding strength
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use octofhir_instance_validator::*;
//!
//! # fn example(types_json: &str, value_sets_json: &str) -> Result<()> {
//! let tables = ProfileTables::from_json_str(types_json, value_sets_json)?;
//! let validator = FhirInstanceValidator::new(Arc::new(tables));
//!
//! let response = validator.validate_str(
//!     r#"{"resourceType": "Patient", "gender": "male"}"#,
//!     &ValidationOptions::default(),
//! )?;
//! for message in &response.messages {
//!     println!("{message}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`types`] - Profile tables and property definitions
//! - [`terminology`] - Value-set membership and binding strength
//! - [`validation`] - The instance walker, format rules and diagnostics
//! - [`core`] - Per-call options

pub mod core;
pub mod error;
pub mod terminology;
pub mod types;
pub mod validation;

pub use crate::core::{SourceFormat, ValidationOptions};
pub use error::{InstanceValidatorError, Result};
pub use terminology::{BindingStrength, TerminologyError, TerminologyResult, is_member};
pub use types::{
    CodeSystem, PrimitiveKind, ProfileTables, PropertyDefinition, TypeDefinition,
    TypeDefinitions, TypeTag, ValueSet, ValueSetBinding, ValueSets,
};
pub use validation::{
    DiagnosticCollector, FhirInstanceValidator, Severity, ValidationMessage, ValidationResponse,
};
