//! Diagnostic messages and their per-resource accumulator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Message severity, least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Advisory only
    Info,
    Warning,
    /// Schema violation
    Error,
    /// The subtree could not be validated at all
    Fatal,
}

impl Severity {
    /// Whether a message of this severity makes the response invalid.
    pub fn is_failure(&self) -> bool {
        matches!(self, Severity::Error | Severity::Fatal)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationMessage {
    pub location: String,
    pub severity: Severity,
    pub message: String,
    /// Identity of the resource the message belongs to
    pub resource_id: String,
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({}): {}",
            self.severity, self.location, self.resource_id, self.message
        )
    }
}

/// Outcome of a validation run.
///
/// `valid` is false once any `error` or `fatal` message has been recorded and
/// never turns true again, including when child responses are merged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub messages: Vec<ValidationMessage>,
}

impl Default for ValidationResponse {
    fn default() -> Self {
        Self {
            valid: true,
            messages: Vec::new(),
        }
    }
}

impl ValidationResponse {
    /// Parent followed by child; valid only if both were.
    pub fn merge(mut self, child: ValidationResponse) -> Self {
        self.valid = self.valid && child.valid;
        self.messages.extend(child.messages);
        self
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationMessage> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationMessage> {
        self.with_severity(Severity::Warning)
    }

    pub fn has_fatal(&self) -> bool {
        self.with_severity(Severity::Fatal).next().is_some()
    }

    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &ValidationMessage> {
        self.messages
            .iter()
            .filter(move |message| message.severity == severity)
    }
}

/// Accumulates messages for one resource identity.
#[derive(Debug, Clone)]
pub struct DiagnosticCollector {
    resource_id: String,
    response: ValidationResponse,
}

impl DiagnosticCollector {
    pub fn new(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            response: ValidationResponse::default(),
        }
    }

    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    pub fn is_valid(&self) -> bool {
        self.response.valid
    }

    pub fn add(&mut self, location: impl Into<String>, severity: Severity, message: impl Into<String>) {
        if severity.is_failure() {
            self.response.valid = false;
        }
        self.response.messages.push(ValidationMessage {
            location: location.into(),
            severity,
            message: message.into(),
            resource_id: self.resource_id.clone(),
        });
    }

    pub fn add_fatal(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.add(location, Severity::Fatal, message);
    }

    pub fn add_error(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.add(location, Severity::Error, message);
    }

    pub fn add_warning(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.add(location, Severity::Warning, message);
    }

    pub fn add_info(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.add(location, Severity::Info, message);
    }

    /// Append a finished child's messages, keeping their own resource ids.
    pub fn merge(&mut self, child: ValidationResponse) {
        let response = std::mem::take(&mut self.response);
        self.response = response.merge(child);
    }

    pub fn into_response(self) -> ValidationResponse {
        self.response
    }
}
