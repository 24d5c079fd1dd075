//! Value-set membership checks for coded properties.
//!
//! Membership is answered purely from the loaded [`ValueSets`] table; there is
//! no terminology server round-trip during validation.

use thiserror::Error;

use crate::types::{ValueSet, ValueSets};
use crate::validation::Severity;

/// Errors that can occur during a value-set lookup
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TerminologyError {
    /// Value set id is not present in the profile tables
    #[error("Value set \"{id}\" could not be found.")]
    ValueSetNotFound { id: String },
}

pub type TerminologyResult<T> = Result<T, TerminologyError>;

/// FHIR binding strength levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingStrength {
    /// Code MUST be from the value set
    Required,
    /// Code SHOULD be from the value set, but others allowed with text
    Extensible,
    /// Code SHOULD be from the value set for interoperability
    Preferred,
    /// Value set is just an example
    Example,
}

impl BindingStrength {
    /// Parse binding strength from string
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "required" => Some(BindingStrength::Required),
            "extensible" => Some(BindingStrength::Extensible),
            "preferred" => Some(BindingStrength::Preferred),
            "example" => Some(BindingStrength::Example),
            _ => None,
        }
    }

    /// Whether validation failure at this strength is an error
    pub fn is_error_on_failure(&self) -> bool {
        matches!(self, BindingStrength::Required)
    }

    /// Severity reported for a code that is not in the bound value set
    pub fn failure_severity(&self) -> Severity {
        if self.is_error_on_failure() {
            Severity::Error
        } else {
            Severity::Warning
        }
    }
}

/// Membership of `code` in `value_set`.
///
/// With a system, the code must be defined under that exact system URI.
/// Without one, any system of the value set may define it.
pub fn is_member(value_set: &ValueSet, code: &str, system: Option<&str>) -> bool {
    match system {
        Some(uri) => value_set
            .system(uri)
            .is_some_and(|code_system| code_system.contains(code)),
        None => value_set
            .systems
            .iter()
            .any(|code_system| code_system.contains(code)),
    }
}

/// Look up a value set by id.
pub fn resolve_value_set<'a>(
    value_sets: &'a ValueSets,
    value_set_id: &str,
) -> TerminologyResult<&'a ValueSet> {
    value_sets
        .get(value_set_id)
        .ok_or_else(|| TerminologyError::ValueSetNotFound {
            id: value_set_id.to_string(),
        })
}
