//! Builder API for diagnostic messages.
//!
//! The builder encodes tidyverse-style guidelines: a short title, one
//! problem statement, a handful of details, and optional hints.

use crate::diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage, MessageContent};

/// Tidyverse guidance: more than this many details overwhelms the reader.
const MAX_RECOMMENDED_DETAILS: usize = 5;

/// Builder for [`DiagnosticMessage`].
///
/// # Example
///
/// ```
/// use schemata_error_reporting::DiagnosticMessageBuilder;
///
/// let msg = DiagnosticMessageBuilder::error("Incompatible types")
///     .with_code("S-1-1")
///     .problem("Cannot use text where a number is expected")
///     .add_detail("`price` has type `string`")
///     .add_hint("Use a coercing schema?")
///     .build();
///
/// assert_eq!(msg.code.as_deref(), Some("S-1-1"));
/// assert_eq!(msg.details.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DiagnosticMessageBuilder {
    message: DiagnosticMessage,
}

impl DiagnosticMessageBuilder {
    fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            message: DiagnosticMessage::new(kind, title),
        }
    }

    /// Start building an error diagnostic.
    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    /// Start building a warning diagnostic.
    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, title)
    }

    /// Start building an info diagnostic.
    pub fn info(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Info, title)
    }

    /// Attach an error code from the catalog.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.message.code = Some(code.into());
        self
    }

    /// Set the problem statement.
    pub fn problem(mut self, problem: impl Into<MessageContent>) -> Self {
        self.message.problem = Some(problem.into());
        self
    }

    /// Set where the whole diagnostic applies.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.message.location = Some(location.into());
        self
    }

    fn push_detail(
        mut self,
        kind: DetailKind,
        content: impl Into<MessageContent>,
        location: Option<String>,
    ) -> Self {
        self.message.details.push(DetailItem {
            kind,
            content: content.into(),
            location,
        });
        self
    }

    /// Add an error detail (✖).
    pub fn add_detail(self, detail: impl Into<MessageContent>) -> Self {
        self.push_detail(DetailKind::Error, detail, None)
    }

    /// Add an error detail (✖) that applies to a specific location.
    pub fn add_located_detail(
        self,
        location: impl Into<String>,
        detail: impl Into<MessageContent>,
    ) -> Self {
        self.push_detail(DetailKind::Error, detail, Some(location.into()))
    }

    /// Add an info detail (ℹ).
    pub fn add_info(self, info: impl Into<MessageContent>) -> Self {
        self.push_detail(DetailKind::Info, info, None)
    }

    /// Add a note detail (•).
    pub fn add_note(self, note: impl Into<MessageContent>) -> Self {
        self.push_detail(DetailKind::Note, note, None)
    }

    /// Add a hint (?).
    pub fn add_hint(mut self, hint: impl Into<MessageContent>) -> Self {
        self.message.hints.push(hint.into());
        self
    }

    /// Finish building.
    pub fn build(self) -> DiagnosticMessage {
        self.message
    }

    /// Finish building and report deviations from the tidyverse guidelines.
    ///
    /// The message is always returned; the warnings are advisory.
    pub fn build_with_validation(self) -> (DiagnosticMessage, Vec<String>) {
        let mut warnings = Vec::new();

        if self.message.title.trim().is_empty() {
            warnings.push("Diagnostic title is empty".to_string());
        }

        if self.message.details.len() > MAX_RECOMMENDED_DETAILS {
            warnings.push(format!(
                "Diagnostic has {} details; at most {} are recommended",
                self.message.details.len(),
                MAX_RECOMMENDED_DETAILS
            ));
        }

        for hint in &self.message.hints {
            if !hint.as_str().trim_end().ends_with('?') {
                warnings.push(format!("Hint should end with '?': {}", hint.as_str()));
            }
        }

        (self.message, warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_parts_in_order() {
        let msg = DiagnosticMessageBuilder::warning("Heads up")
            .add_detail("first")
            .add_info("second")
            .add_note("third")
            .build();

        assert_eq!(msg.kind, DiagnosticKind::Warning);
        let kinds: Vec<_> = msg.details.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![DetailKind::Error, DetailKind::Info, DetailKind::Note]
        );
    }

    #[test]
    fn test_build_with_validation_clean() {
        let (_, warnings) = DiagnosticMessageBuilder::error("Fine")
            .add_detail("one")
            .add_hint("Try again?")
            .build_with_validation();
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_build_with_validation_too_many_details() {
        let mut builder = DiagnosticMessageBuilder::error("Noisy");
        for i in 0..6 {
            builder = builder.add_detail(format!("Detail {}", i));
        }
        let (msg, warnings) = builder.build_with_validation();
        assert_eq!(msg.details.len(), 6);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("6 details"));
    }

    #[test]
    fn test_build_with_validation_hint_style() {
        let (_, warnings) = DiagnosticMessageBuilder::error("")
            .add_hint("Do this instead")
            .build_with_validation();
        assert_eq!(warnings.len(), 2);
    }
}
