//! Parse options
//!
//! Options apply to one top-level parse. Schemas that declare their own
//! policy (for example `ObjectSchema::strict`) take precedence over them.

use schemata_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder, catalog};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What an object does with keys its schema does not declare
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownKeys {
    /// Ignore them and leave them out of the output
    #[default]
    Strip,
    /// Copy them into the output unvalidated
    Passthrough,
    /// Report them as an `unrecognized_keys` issue
    Strict,
}

/// What a set does with elements equal to an earlier element
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Keep the first occurrence, silently drop the rest
    #[default]
    Collapse,
    /// Raise a `duplicate_element` issue for every repeat
    Report,
}

/// Options for one parse call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ParseOptions {
    pub unknown_keys: UnknownKeys,
    pub set_duplicates: DuplicatePolicy,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unknown_keys(mut self, policy: UnknownKeys) -> Self {
        self.unknown_keys = policy;
        self
    }

    pub fn with_set_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.set_duplicates = policy;
        self
    }

    /// Load options from a JSON document such as `{"unknown-keys": "strict"}`.
    ///
    /// Missing fields keep their defaults; unknown fields are rejected.
    pub fn from_json_str(text: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Errors from loading parse options
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("Invalid parse options: {0}")]
    Json(#[from] serde_json::Error),
}

impl OptionsError {
    /// Catalog code in `schemata-error-reporting`
    pub fn error_code(&self) -> &'static str {
        "S-2-1"
    }

    /// Render as a diagnostic pointing at the offending spot in the JSON
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        let OptionsError::Json(source) = self;
        let title = catalog::title_or(self.error_code(), "Invalid parse options");
        let location = format!("line {}, column {}", source.line(), source.column());
        DiagnosticMessageBuilder::error(title)
            .with_code(self.error_code())
            .with_location(location)
            .problem(source.to_string())
            .add_hint("Only `unknown-keys` and `set-duplicates` are recognized?")
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_lenient() {
        let options = ParseOptions::default();
        assert_eq!(options.unknown_keys, UnknownKeys::Strip);
        assert_eq!(options.set_duplicates, DuplicatePolicy::Collapse);
    }

    #[test]
    fn test_from_json_partial() {
        let options = ParseOptions::from_json_str(r#"{"unknown-keys": "strict"}"#).unwrap();
        assert_eq!(options.unknown_keys, UnknownKeys::Strict);
        assert_eq!(options.set_duplicates, DuplicatePolicy::Collapse);

        let options = ParseOptions::from_json_str("{}").unwrap();
        assert_eq!(options, ParseOptions::default());
    }

    #[test]
    fn test_from_json_full() {
        let options = ParseOptions::from_json_str(
            r#"{"unknown-keys": "passthrough", "set-duplicates": "report"}"#,
        )
        .unwrap();
        assert_eq!(
            options,
            ParseOptions::new()
                .with_unknown_keys(UnknownKeys::Passthrough)
                .with_set_duplicates(DuplicatePolicy::Report)
        );
    }

    #[test]
    fn test_from_json_rejects_unknown_fields_and_values() {
        let err = ParseOptions::from_json_str(r#"{"abort-early": true}"#).unwrap_err();
        assert_eq!(err.error_code(), "S-2-1");
        assert!(err.to_string().starts_with("Invalid parse options"));

        let loose = ParseOptions::from_json_str(r#"{"unknown-keys": "loose"}"#);
        assert!(loose.is_err());
        assert!(ParseOptions::from_json_str("not json").is_err());
    }

    #[test]
    fn test_error_renders_with_catalog_code() {
        let err = ParseOptions::from_json_str("{\n  \"abort-early\": true\n}").unwrap_err();
        let diagnostic = err.to_diagnostic();

        assert_eq!(diagnostic.code.as_deref(), Some("S-2-1"));
        assert_eq!(diagnostic.title, "Invalid Parse Options");
        let location = diagnostic.location.as_deref().unwrap();
        assert!(location.starts_with("line 2, column"));

        let problem = diagnostic.problem.as_ref().unwrap().as_str();
        assert!(problem.contains("unknown field `abort-early`"));
        let header = "Error [S-2-1]: Invalid Parse Options\nat line 2";
        assert!(diagnostic.to_text().starts_with(header));
    }
}
