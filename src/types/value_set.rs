//! Value sets and the code systems they draw from.

use std::collections::{HashMap, HashSet};
use std::io::Read;

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::{InstanceValidatorError, Result};

/// Codes defined under one system URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSystem {
    pub uri: String,
    codes: HashSet<String>,
}

impl CodeSystem {
    pub fn new<I, S>(uri: impl Into<String>, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            uri: uri.into(),
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSet {
    pub id: String,
    pub systems: Vec<CodeSystem>,
}

impl ValueSet {
    pub fn new(id: impl Into<String>, systems: Vec<CodeSystem>) -> Self {
        Self {
            id: id.into(),
            systems,
        }
    }

    pub fn system(&self, uri: &str) -> Option<&CodeSystem> {
        self.systems.iter().find(|system| system.uri == uri)
    }
}

/// Immutable lookup of value-set id to value set.
#[derive(Debug, Clone, Default)]
pub struct ValueSets {
    sets: HashMap<String, ValueSet>,
}

impl ValueSets {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_value_set(mut self, value_set: ValueSet) -> Self {
        self.sets.insert(value_set.id.clone(), value_set);
        self
    }

    pub fn get(&self, id: &str) -> Option<&ValueSet> {
        self.sets.get(id)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Load value sets from the profile table format:
    ///
    /// ```json
    /// { "AdministrativeGender": { "systems": [
    ///     { "uri": "http://hl7.org/fhir/administrative-gender",
    ///       "codes": [ { "code": "male" }, { "code": "female" } ] }
    /// ] } }
    /// ```
    ///
    /// Codes may also be given as plain strings.
    pub fn from_json_value(value: JsonValue) -> Result<Self> {
        let raw: HashMap<String, RawValueSet> = serde_json::from_value(value)?;

        let mut sets = HashMap::with_capacity(raw.len());
        for (id, raw_set) in raw {
            let mut systems = Vec::with_capacity(raw_set.systems.len());
            for raw_system in raw_set.systems {
                let uri = raw_system.uri.filter(|uri| !uri.is_empty()).ok_or_else(|| {
                    InstanceValidatorError::invalid_value_set(id.as_str(), "code system has no uri")
                })?;
                let codes = raw_system.codes.into_iter().map(RawCode::into_code);
                systems.push(CodeSystem::new(uri, codes));
            }
            sets.insert(id.clone(), ValueSet::new(id, systems));
        }

        tracing::info!(value_sets = sets.len(), "Loaded value sets");
        Ok(Self { sets })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_json_value(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_json_value(serde_json::from_reader(reader)?)
    }
}

#[derive(Debug, Deserialize)]
struct RawValueSet {
    #[serde(default)]
    systems: Vec<RawCodeSystem>,
}

#[derive(Debug, Deserialize)]
struct RawCodeSystem {
    uri: Option<String>,
    #[serde(default)]
    codes: Vec<RawCode>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCode {
    Plain(String),
    Entry { code: String },
}

impl RawCode {
    fn into_code(self) -> String {
        match self {
            RawCode::Plain(code) | RawCode::Entry { code } => code,
        }
    }
}
