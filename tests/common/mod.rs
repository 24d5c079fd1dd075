use std::sync::Arc;

use octofhir_instance_validator::*;
use serde_json::{Value, json};

pub const GENDER_SYSTEM: &str = "http://hl7.org/fhir/administrative-gender";
pub const MARITAL_SYSTEM: &str = "http://terminology.hl7.org/CodeSystem/v3-MaritalStatus";

#[allow(dead_code)]
pub fn profile_types() -> Value {
    json!({
        "Patient": { "_properties": [
            { "_name": "id", "_type": "id" },
            { "_name": "active", "_type": "boolean" },
            { "_name": "name", "_type": "HumanName", "_multiple": true, "_required": true },
            { "_name": "gender", "_type": "code",
              "_valueSet": "AdministrativeGender", "_valueSetStrength": "required" },
            { "_name": "birthDate", "_type": "date" },
            { "_name": "deceasedBoolean", "_type": "boolean", "_choice": "deceased[x]" },
            { "_name": "deceasedDateTime", "_type": "dateTime", "_choice": "deceased[x]" },
            { "_name": "maritalStatus", "_type": "CodeableConcept",
              "_valueSet": "MaritalStatus", "_valueSetStrength": "extensible" },
            { "_name": "multipleBirthInteger", "_type": "integer" },
            { "_name": "contact", "_multiple": true, "_properties": [
                { "_name": "name", "_type": "HumanName" },
                { "_name": "gender", "_type": "code", "_valueSet": "AdministrativeGender" }
            ] },
            { "_name": "contained", "_type": "Resource", "_multiple": true }
        ] },
        "Observation": { "_properties": [
            { "_name": "id", "_type": "id" },
            { "_name": "status", "_type": "code", "_required": true,
              "_valueSet": "ObservationStatus", "_valueSetStrength": "required" },
            { "_name": "code", "_type": "CodeableConcept", "_required": true },
            { "_name": "category", "_type": "Coding",
              "_valueSet": "ObservationCategory", "_valueSetStrength": "preferred" },
            { "_name": "valueQuantity", "_type": "Quantity", "_required": true, "_choice": "value[x]" },
            { "_name": "valueString", "_type": "string", "_required": true, "_choice": "value[x]" },
            { "_name": "issued", "_type": "instant" },
            { "_name": "performer", "_type": "Reference", "_multiple": true }
        ] },
        "Bundle": { "_properties": [
            { "_name": "id", "_type": "id" },
            { "_name": "type", "_type": "code", "_required": true },
            { "_name": "total", "_type": "unsignedInt" },
            { "_name": "entry", "_multiple": true, "_properties": [
                { "_name": "fullUrl", "_type": "uri" },
                { "_name": "resource", "_type": "Resource" }
            ] }
        ] },
        "HumanName": { "_properties": [
            { "_name": "use", "_type": "code" },
            { "_name": "family", "_type": "string" },
            { "_name": "given", "_type": "string", "_multiple": true }
        ] },
        "CodeableConcept": { "_properties": [
            { "_name": "coding", "_type": "Coding", "_multiple": true },
            { "_name": "text", "_type": "string" }
        ] },
        "Coding": { "_properties": [
            { "_name": "system", "_type": "uri" },
            { "_name": "code", "_type": "code" },
            { "_name": "display", "_type": "string" }
        ] },
        "Quantity": { "_properties": [
            { "_name": "value", "_type": "decimal" },
            { "_name": "unit", "_type": "string" },
            { "_name": "system", "_type": "uri" },
            { "_name": "code", "_type": "code" }
        ] }
    })
}

#[allow(dead_code)]
pub fn profile_value_sets() -> Value {
    json!({
        "AdministrativeGender": { "systems": [
            { "uri": GENDER_SYSTEM, "codes": [
                { "code": "male" }, { "code": "female" }, { "code": "other" }, { "code": "unknown" }
            ] }
        ] },
        "MaritalStatus": { "systems": [
            { "uri": MARITAL_SYSTEM, "codes": ["M", "S", "D", "W"] },
            { "uri": "http://terminology.hl7.org/CodeSystem/v3-NullFlavor", "codes": ["UNK"] }
        ] },
        "ObservationCategory": { "systems": [
            { "uri": "http://terminology.hl7.org/CodeSystem/observation-category",
              "codes": ["vital-signs", "laboratory"] }
        ] }
    })
}

#[allow(dead_code)]
pub fn profile_tables() -> ProfileTables {
    ProfileTables::new(
        TypeDefinitions::from_json_value(profile_types()).expect("fixture types load"),
        ValueSets::from_json_value(profile_value_sets()).expect("fixture value sets load"),
    )
}

#[allow(dead_code)]
pub fn create_validator() -> FhirInstanceValidator {
    FhirInstanceValidator::new(Arc::new(profile_tables()))
}

#[allow(dead_code)]
pub fn valid_patient() -> Value {
    json!({
        "resourceType": "Patient",
        "id": "example",
        "active": true,
        "name": [ { "family": "Chalmers", "given": ["Peter", "James"] } ],
        "gender": "male",
        "birthDate": "1974-12-25"
    })
}

/// (location, severity, message) of every message, in order.
#[allow(dead_code)]
pub fn summarize(response: &ValidationResponse) -> Vec<(String, Severity, String)> {
    response
        .messages
        .iter()
        .map(|m| (m.location.clone(), m.severity, m.message.clone()))
        .collect()
}
