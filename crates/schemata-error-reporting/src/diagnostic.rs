//! Diagnostic model.
//!
//! A [`DiagnosticMessage`] is what a validation report looks like once it
//! leaves `schemata`: a titled message with an optional catalog code, the
//! path it applies to, a problem statement, bulleted details and hints.
//! It renders as terminal text or, through its `Serialize` impl, as JSON.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    Error,
    Warning,
    Info,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiagnosticKind::Error => "Error",
            DiagnosticKind::Warning => "Warning",
            DiagnosticKind::Info => "Info",
        })
    }
}

/// Bullet style of a detail line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailKind {
    /// `✖`, one per failed check
    Error,
    /// `ℹ`
    Info,
    /// `•`
    Note,
}

impl DetailKind {
    fn bullet(self) -> char {
        match self {
            DetailKind::Error => '✖',
            DetailKind::Info => 'ℹ',
            DetailKind::Note => '•',
        }
    }
}

/// Text of a problem, detail or hint.
///
/// Serialized as `{"type": "plain" | "markdown", "content": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum MessageContent {
    Plain(String),
    Markdown(String),
}

impl MessageContent {
    pub fn as_str(&self) -> &str {
        match self {
            MessageContent::Plain(text) | MessageContent::Markdown(text) => text,
        }
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Plain(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Plain(text.to_string())
    }
}

/// One bulleted line of a diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailItem {
    pub kind: DetailKind,
    pub content: MessageContent,
    /// Instance path the line refers to, e.g. `profile.birthdate`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl fmt::Display for DetailItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.kind.bullet())?;
        if let Some(location) = &self.location {
            write!(f, "{}: ", location)?;
        }
        f.write_str(self.content.as_str())
    }
}

/// A rendered validation report.
///
/// Build one with [`DiagnosticMessageBuilder`](crate::DiagnosticMessageBuilder);
/// `schemata` produces them from `Issue::to_diagnostic` and
/// `ParseError::to_diagnostic`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    pub kind: DiagnosticKind,
    /// Catalog code such as `S-1-3`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem: Option<MessageContent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<DetailItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<MessageContent>,
}

impl DiagnosticMessage {
    pub fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            code: None,
            title: title.into(),
            location: None,
            problem: None,
            details: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, title)
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Info, title)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Render as terminal text, one line per part:
    ///
    /// ```text
    /// Error [S-1-3]: Value Too Small
    /// at password
    /// String must contain at least 8 character(s)
    /// ✖ password: String must contain at least 8 character(s)
    /// ? Use a longer password?
    /// ```
    ///
    /// ```
    /// use schemata_error_reporting::DiagnosticMessageBuilder;
    ///
    /// let report = DiagnosticMessageBuilder::error("Validation failed")
    ///     .problem("1 issue(s) found")
    ///     .add_located_detail("age", "Expected number, received string")
    ///     .build();
    /// assert_eq!(
    ///     report.to_text(),
    ///     "Error: Validation failed\n1 issue(s) found\n✖ age: Expected number, received string"
    /// );
    /// ```
    pub fn to_text(&self) -> String {
        let mut lines = vec![match &self.code {
            Some(code) => format!("{} [{}]: {}", self.kind, code, self.title),
            None => format!("{}: {}", self.kind, self.title),
        }];
        if let Some(location) = &self.location {
            lines.push(format!("at {}", location));
        }
        if let Some(problem) = &self.problem {
            lines.push(problem.as_str().to_string());
        }
        lines.extend(self.details.iter().map(DetailItem::to_string));
        lines.extend(self.hints.iter().map(|hint| format!("? {}", hint.as_str())));
        lines.join("\n")
    }

    /// The serde representation as a JSON value
    pub fn to_json(&self) -> serde_json::Value {
        // Only strings, enums and vectors of them: conversion cannot fail
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DiagnosticMessageBuilder;

    fn password_report() -> DiagnosticMessage {
        DiagnosticMessageBuilder::error("Value Too Small")
            .with_code("S-1-3")
            .with_location("password")
            .problem("String must contain at least 8 character(s)")
            .add_located_detail(
                "password",
                "String must contain at least 8 character(s)",
            )
            .add_info("Passwords are checked before hashing")
            .add_hint("Use a longer password?")
            .build()
    }

    #[test]
    fn test_plain_text_is_the_default_content() {
        let content: MessageContent = "Required".into();
        assert_eq!(content, MessageContent::Plain("Required".to_string()));
        assert_eq!(content.as_str(), "Required");
    }

    #[test]
    fn test_to_text_header() {
        let msg = DiagnosticMessage::warning("Unknown keys were ignored");
        assert_eq!(msg.to_text(), "Warning: Unknown keys were ignored");
        assert_eq!(
            msg.with_code("S-1-7").to_text(),
            "Warning [S-1-7]: Unknown keys were ignored"
        );
    }

    #[test]
    fn test_to_text_full_message() {
        insta::assert_snapshot!(password_report().to_text(), @r"
        Error [S-1-3]: Value Too Small
        at password
        String must contain at least 8 character(s)
        ✖ password: String must contain at least 8 character(s)
        ℹ Passwords are checked before hashing
        ? Use a longer password?
        ");
    }

    #[test]
    fn test_json_follows_serde_shape() {
        let json = password_report().to_json();
        assert_eq!(json["kind"], "error");
        assert_eq!(json["code"], "S-1-3");
        assert_eq!(json["location"], "password");
        assert_eq!(json["problem"]["type"], "plain");
        assert_eq!(json["details"][0]["kind"], "error");
        assert_eq!(json["details"][0]["location"], "password");
        assert!(json["details"][1].get("location").is_none());
        assert_eq!(json["hints"][0]["content"], "Use a longer password?");
    }

    #[test]
    fn test_json_skips_empty_parts() {
        let json = DiagnosticMessage::info("Nothing to report").to_json();
        assert_eq!(
            json,
            serde_json::json!({"kind": "info", "title": "Nothing to report"})
        );
    }

    #[test]
    fn test_json_reads_back() {
        let report = password_report();
        let parsed: DiagnosticMessage = serde_json::from_value(report.to_json()).unwrap();
        assert_eq!(parsed, report);
    }
}
