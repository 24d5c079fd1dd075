//! Lexical format rules for primitive values.
//!
//! Each primitive kind maps to at most one rule. Kinds without a rule
//! (`string`, `uri`, `markdown`, `instant`, `base64Binary`, `Element`) are
//! unconstrained.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as JsonValue;

use crate::types::PrimitiveKind;

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("format rule patterns are valid")
}

static INTEGER: Lazy<Regex> = Lazy::new(|| pattern(r"^(0|[-+]?[1-9][0-9]*)$"));
static DECIMAL: Lazy<Regex> = Lazy::new(|| pattern(r"^-?(0|[1-9][0-9]*)(\.[0-9]+)?$"));
static UNSIGNED_INT: Lazy<Regex> = Lazy::new(|| pattern(r"^(0|[1-9][0-9]*)$"));
// Leading zeros are tolerated, an all-zero value is not.
static POSITIVE_INT: Lazy<Regex> = Lazy::new(|| pattern(r"^0*[1-9][0-9]*$"));
static DATE: Lazy<Regex> = Lazy::new(|| {
    pattern(
        r"^([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)(-(0[1-9]|1[0-2])(-(0[1-9]|[1-2][0-9]|3[0-1]))?)?$",
    )
});
static DATE_TIME: Lazy<Regex> = Lazy::new(|| {
    pattern(
        r"^([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)(-(0[1-9]|1[0-2])(-(0[1-9]|[1-2][0-9]|3[0-1])(T([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]+)?(Z|(\+|-)((0[0-9]|1[0-3]):[0-5][0-9]|14:00)))?)?)?$",
    )
});
static TIME: Lazy<Regex> =
    Lazy::new(|| pattern(r"^([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]+)?$"));
static CODE: Lazy<Regex> = Lazy::new(|| pattern(r"^[^\s]+(\s[^\s]+)*$"));
static OID: Lazy<Regex> = Lazy::new(|| pattern(r"^urn:oid:[0-2](\.(0|[1-9][0-9]*))+$"));
static ID: Lazy<Regex> = Lazy::new(|| pattern(r"^[A-Za-z0-9\-\.]{1,64}$"));

/// The check applied to one primitive kind.
#[derive(Debug, Clone, Copy)]
pub enum FormatRule {
    /// Case-insensitive `true` / `false`
    Boolean,
    /// Anchored pattern; numeric kinds apply it to textual values only
    Pattern {
        label: &'static str,
        regex: &'static Lazy<Regex>,
    },
}

/// Rule for `kind`, if the kind is constrained at all.
pub fn rule_for(kind: PrimitiveKind) -> Option<FormatRule> {
    let rule = match kind {
        PrimitiveKind::Boolean => FormatRule::Boolean,
        PrimitiveKind::Integer => FormatRule::Pattern {
            label: "integer",
            regex: &INTEGER,
        },
        PrimitiveKind::Decimal => FormatRule::Pattern {
            label: "decimal",
            regex: &DECIMAL,
        },
        PrimitiveKind::UnsignedInt => FormatRule::Pattern {
            label: "unsigned integer",
            regex: &UNSIGNED_INT,
        },
        PrimitiveKind::PositiveInt => FormatRule::Pattern {
            label: "positive integer",
            regex: &POSITIVE_INT,
        },
        PrimitiveKind::Date => FormatRule::Pattern {
            label: "date",
            regex: &DATE,
        },
        PrimitiveKind::DateTime => FormatRule::Pattern {
            label: "dateTime",
            regex: &DATE_TIME,
        },
        PrimitiveKind::Time => FormatRule::Pattern {
            label: "time",
            regex: &TIME,
        },
        PrimitiveKind::Code => FormatRule::Pattern {
            label: "code",
            regex: &CODE,
        },
        PrimitiveKind::Oid => FormatRule::Pattern {
            label: "oid",
            regex: &OID,
        },
        PrimitiveKind::Id => FormatRule::Pattern {
            label: "id",
            regex: &ID,
        },
        PrimitiveKind::Instant
        | PrimitiveKind::Base64Binary
        | PrimitiveKind::String
        | PrimitiveKind::Uri
        | PrimitiveKind::Markdown
        | PrimitiveKind::Element => return None,
    };
    Some(rule)
}

/// A primitive value that failed its format rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatViolation {
    pub kind: PrimitiveKind,
    pub raw: String,
    label: &'static str,
}

impl FormatViolation {
    pub fn message(&self) -> String {
        match self.kind {
            PrimitiveKind::Boolean => format!("Invalid format for boolean value \"{}\"", self.raw),
            _ => format!("Invalid {} format for value \"{}\"", self.label, self.raw),
        }
    }
}

/// Text the rules are matched against.
pub fn raw_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Check `value` against the rule for `kind`.
pub fn check_format(kind: PrimitiveKind, value: &JsonValue) -> Result<(), FormatViolation> {
    let Some(rule) = rule_for(kind) else {
        return Ok(());
    };

    let (passed, label) = match rule {
        FormatRule::Boolean => {
            let text = raw_text(value).to_lowercase();
            (text == "true" || text == "false", "boolean")
        }
        FormatRule::Pattern { label, regex } => match value {
            JsonValue::String(text) => (regex.is_match(text), label),
            _ if kind.is_numeric() => (true, label),
            other => (regex.is_match(&other.to_string()), label),
        },
    };

    if passed {
        Ok(())
    } else {
        Err(FormatViolation {
            kind,
            raw: raw_text(value),
            label,
        })
    }
}
