//! Rendering of diagnostic locations.

use crate::core::SourceFormat;

/// Joins path segments into a location string.
///
/// JSON-sourced instances render as `Patient.name[0].given`, XML-sourced
/// instances as `Patient/name[1]/given`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocationFormatter {
    format: SourceFormat,
}

impl LocationFormatter {
    pub fn new(format: SourceFormat) -> Self {
        Self { format }
    }

    fn separator(&self) -> char {
        match self.format {
            SourceFormat::Json => '.',
            SourceFormat::Xml => '/',
        }
    }

    /// Segment for the `index`th (0-based) item of a repeating property.
    pub fn array_item(&self, name: &str, index: usize) -> String {
        let shown = match self.format {
            SourceFormat::Json => index,
            SourceFormat::Xml => index + 1,
        };
        format!("{name}[{shown}]")
    }

    pub fn display(&self, tree: &[String]) -> String {
        self.display_with_leaf(tree, None)
    }

    pub fn display_with_leaf(&self, tree: &[String], leaf: Option<&str>) -> String {
        let separator = self.separator();
        let mut display = String::new();

        for segment in tree.iter().map(String::as_str).chain(leaf) {
            if !display.is_empty() {
                display.push(separator);
            }
            display.push_str(segment);
        }

        display
    }
}

/// `tree` extended by one segment.
pub(crate) fn descend(tree: &[String], segment: impl Into<String>) -> Vec<String> {
    let mut next = Vec::with_capacity(tree.len() + 1);
    next.extend_from_slice(tree);
    next.push(segment.into());
    next
}
