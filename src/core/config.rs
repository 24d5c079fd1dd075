use serde::{Deserialize, Serialize};

/// Default nesting limit for the instance walker.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Per-call validation options.
///
/// Unrecognized keys are ignored when deserializing, so option objects shared
/// with other tools can be passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationOptions {
    /// Report properties that the profile does not declare as errors instead of warnings
    pub error_on_unexpected: bool,
    /// Maximum nesting of objects before the walker gives up on a subtree
    pub max_depth: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            error_on_unexpected: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ValidationOptions {
    pub fn strict() -> Self {
        Self {
            error_on_unexpected: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Wire format the instance was decoded from.
///
/// Only affects how locations are rendered: `Json` joins segments with `.`
/// and counts array items from 0, `Xml` joins with `/` and counts from 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    #[default]
    Json,
    Xml,
}
