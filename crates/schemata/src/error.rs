// Issue types and the aggregate parse error

use crate::value::{DATE_FORMAT, Value, ValueKind, format_number};
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use schemata_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder, catalog};
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Machine-readable issue code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    InvalidType,
    Required,
    TooSmall,
    TooBig,
    InvalidFormat,
    NotMultipleOf,
    UnrecognizedKeys,
    DuplicateElement,
    Custom,
}

impl IssueCode {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueCode::InvalidType => "invalid_type",
            IssueCode::Required => "required",
            IssueCode::TooSmall => "too_small",
            IssueCode::TooBig => "too_big",
            IssueCode::InvalidFormat => "invalid_format",
            IssueCode::NotMultipleOf => "not_multiple_of",
            IssueCode::UnrecognizedKeys => "unrecognized_keys",
            IssueCode::DuplicateElement => "duplicate_element",
            IssueCode::Custom => "custom",
        }
    }

    /// Catalog code in `schemata-error-reporting`
    pub fn error_code(self) -> &'static str {
        match self {
            IssueCode::InvalidType => "S-1-1",
            IssueCode::Required => "S-1-2",
            IssueCode::TooSmall => "S-1-3",
            IssueCode::TooBig => "S-1-4",
            IssueCode::InvalidFormat => "S-1-5",
            IssueCode::NotMultipleOf => "S-1-6",
            IssueCode::UnrecognizedKeys => "S-1-7",
            IssueCode::DuplicateElement => "S-1-8",
            IssueCode::Custom => "S-1-9",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The limit a size or range constraint was checked against
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "origin", content = "limit", rename_all = "snake_case")]
pub enum Bound {
    /// String length in characters
    String(usize),
    Number(f64),
    Date(NaiveDateTime),
    Array(usize),
    Set(usize),
    Map(usize),
}

/// String formats checked by `invalid_format` issues
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "format", content = "expected", rename_all = "snake_case")]
pub enum StringFormat {
    Email,
    Url,
    Uuid,
    Regex(String),
    StartsWith(String),
    EndsWith(String),
    Includes(String),
}

/// Structured issue kinds
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum IssueKind {
    /// Input (after coercion, if enabled) has the wrong kind
    InvalidType {
        expected: ValueKind,
        received: ValueKind,
    },

    /// A required value is absent
    Required,

    TooSmall {
        bound: Bound,
        inclusive: bool,
        exact: bool,
    },

    TooBig {
        bound: Bound,
        inclusive: bool,
        exact: bool,
    },

    InvalidFormat {
        format: StringFormat,
    },

    NotMultipleOf { multiple_of: f64 },

    /// Keys rejected by a strict object, in input order
    UnrecognizedKeys {
        keys: Vec<String>,
    },

    /// A set element equal to an earlier one, under the `report` policy
    DuplicateElement,

    /// Raised by `refine` and `transform_with` callbacks
    Custom,
}

impl IssueKind {
    pub fn code(&self) -> IssueCode {
        match self {
            IssueKind::InvalidType { .. } => IssueCode::InvalidType,
            IssueKind::Required => IssueCode::Required,
            IssueKind::TooSmall { .. } => IssueCode::TooSmall,
            IssueKind::TooBig { .. } => IssueCode::TooBig,
            IssueKind::InvalidFormat { .. } => IssueCode::InvalidFormat,
            IssueKind::NotMultipleOf { .. } => IssueCode::NotMultipleOf,
            IssueKind::UnrecognizedKeys { .. } => IssueCode::UnrecognizedKeys,
            IssueKind::DuplicateElement => IssueCode::DuplicateElement,
            IssueKind::Custom => IssueCode::Custom,
        }
    }

    pub fn error_code(&self) -> &'static str {
        self.code().error_code()
    }

    /// Templated message used when the constraint declares none
    pub fn default_message(&self) -> String {
        match self {
            IssueKind::InvalidType { expected, received } => {
                format!("Expected {}, received {}", expected, received)
            }
            IssueKind::Required => "Required".to_string(),
            IssueKind::TooSmall {
                bound,
                inclusive,
                exact,
            } => size_message(bound, *inclusive, *exact, Direction::Below),
            IssueKind::TooBig {
                bound,
                inclusive,
                exact,
            } => size_message(bound, *inclusive, *exact, Direction::Above),
            IssueKind::InvalidFormat { format } => match format {
                StringFormat::Email => "Invalid email".to_string(),
                StringFormat::Url => "Invalid url".to_string(),
                StringFormat::Uuid => "Invalid uuid".to_string(),
                StringFormat::Regex(_) => "Invalid".to_string(),
                StringFormat::StartsWith(prefix) => {
                    format!("Invalid input: must start with \"{}\"", prefix)
                }
                StringFormat::EndsWith(suffix) => {
                    format!("Invalid input: must end with \"{}\"", suffix)
                }
                StringFormat::Includes(needle) => {
                    format!("Invalid input: must include \"{}\"", needle)
                }
            },
            IssueKind::NotMultipleOf { multiple_of } => {
                format!(
                    "Number must be a multiple of {}",
                    format_number(*multiple_of)
                )
            }
            IssueKind::UnrecognizedKeys { keys } => {
                let quoted: Vec<_> = keys.iter().map(|k| format!("'{}'", k)).collect();
                format!("Unrecognized key(s) in object: {}", quoted.join(", "))
            }
            IssueKind::DuplicateElement => "Duplicate set element".to_string(),
            IssueKind::Custom => "Invalid input".to_string(),
        }
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Below,
    Above,
}

fn size_message(bound: &Bound, inclusive: bool, exact: bool, direction: Direction) -> String {
    let count = |subject: &str, n: usize, unit: &str| {
        let qualifier = match (exact, inclusive, direction) {
            (true, _, _) => "exactly",
            (false, true, Direction::Below) => "at least",
            (false, false, Direction::Below) => "more than",
            (false, true, Direction::Above) => "at most",
            (false, false, Direction::Above) => "fewer than",
        };
        format!("{} must contain {} {} {}", subject, qualifier, n, unit)
    };
    let compare = |subject: &str, limit: String| {
        let relation = match (inclusive, direction) {
            (true, Direction::Below) => "greater than or equal to",
            (false, Direction::Below) => "greater than",
            (true, Direction::Above) => "less than or equal to",
            (false, Direction::Above) => "less than",
        };
        format!("{} must be {} {}", subject, relation, limit)
    };

    match bound {
        Bound::String(n) => count("String", *n, "character(s)"),
        Bound::Array(n) => count("Array", *n, "element(s)"),
        Bound::Set(n) => count("Set", *n, "element(s)"),
        Bound::Map(n) => count("Map", *n, "entry(s)"),
        Bound::Number(n) => compare("Number", format_number(*n)),
        Bound::Date(d) => compare("Date", d.format(DATE_FORMAT).to_string()),
    }
}

/// A segment in an instance path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object field name or map key representation
    Key(String),
    /// Array or set index
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{}", key),
            PathSegment::Index(index) => write!(f, "[{}]", index),
        }
    }
}

impl Serialize for PathSegment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PathSegment::Key(key) => serializer.serialize_str(key),
            PathSegment::Index(index) => serializer.serialize_u64(*index as u64),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Instance path (e.g., ["profile", "birthdate"])
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    pub fn push(&mut self, segment: impl Into<PathSegment>) {
        self.segments.push(segment.into());
    }

    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// A copy of this path with one more segment
    pub fn child(&self, segment: impl Into<PathSegment>) -> Path {
        let mut path = self.clone();
        path.push(segment);
        path
    }

    /// A copy of this path followed by all segments of `suffix`
    pub fn join(&self, suffix: &Path) -> Path {
        let mut path = self.clone();
        path.segments.extend(suffix.segments.iter().cloned());
        path
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "(root)")
        } else {
            for (i, segment) in self.segments.iter().enumerate() {
                if i > 0 {
                    write!(f, ".")?;
                }
                write!(f, "{}", segment)?;
            }
            Ok(())
        }
    }
}

/// One recorded validation failure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    #[serde(flatten)]
    pub kind: IssueKind,
    pub path: Path,
    pub message: String,
}

impl Issue {
    /// Create an issue with the kind's default message
    pub fn new(kind: IssueKind, path: Path) -> Self {
        let message = kind.default_message();
        Self {
            kind,
            path,
            message,
        }
    }

    /// Replace the message when a custom one was declared
    pub fn with_message(mut self, message: Option<&str>) -> Self {
        if let Some(message) = message {
            self.message = message.to_string();
        }
        self
    }

    pub fn code(&self) -> IssueCode {
        self.kind.code()
    }

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    /// Render this issue as a diagnostic, titled from the error catalog
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        let title = catalog::title_or(self.error_code(), &self.code().to_string());
        DiagnosticMessageBuilder::error(title)
            .with_code(self.error_code())
            .with_location(self.path.to_string())
            .problem(self.message.clone())
            .build()
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Aggregate error carrying every issue found by one parse, in pre-order
#[derive(Debug, Clone, PartialEq, Error)]
pub struct ParseError {
    issues: Vec<Issue>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation issue(s)", self.issues.len())?;
        for issue in &self.issues {
            write!(f, "\n  - {}", issue)?;
        }
        Ok(())
    }
}

impl ParseError {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// The issue list as pretty-printed JSON
    pub fn message(&self) -> String {
        serde_json::to_string_pretty(&self.issues).unwrap_or_default()
    }

    /// Group messages by top-level field; issues at the root go to `form_errors`
    pub fn flatten(&self) -> FlattenedErrors {
        let mut flattened = FlattenedErrors::default();
        for issue in &self.issues {
            match issue.path.segments().first() {
                Some(segment) => flattened
                    .field_errors
                    .entry(segment.to_string())
                    .or_default()
                    .push(issue.message.clone()),
                None => flattened.form_errors.push(issue.message.clone()),
            }
        }
        flattened
    }

    /// Render all issues as one diagnostic with a located detail per issue
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        let mut builder = DiagnosticMessageBuilder::error("Validation failed")
            .problem(format!("{} issue(s) found", self.issues.len()));
        if let [issue] = self.issues.as_slice() {
            builder = builder.with_code(issue.error_code());
        }
        for issue in &self.issues {
            builder = builder.add_located_detail(issue.path.to_string(), issue.message.clone());
        }
        builder.build()
    }
}

/// Issue messages grouped the way forms usually display them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlattenedErrors {
    pub form_errors: Vec<String>,
    pub field_errors: IndexMap<String, Vec<String>>,
}

/// Outcome of a non-throwing parse
#[derive(Debug, Clone, PartialEq)]
pub enum SafeParseResult {
    Success(Value),
    Failure(ParseError),
}

impl SafeParseResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SafeParseResult::Success(_))
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            SafeParseResult::Success(value) => Some(value),
            SafeParseResult::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ParseError> {
        match self {
            SafeParseResult::Success(_) => None,
            SafeParseResult::Failure(error) => Some(error),
        }
    }

    pub fn into_result(self) -> Result<Value, ParseError> {
        self.into()
    }
}

impl From<Result<Value, ParseError>> for SafeParseResult {
    fn from(result: Result<Value, ParseError>) -> Self {
        match result {
            Ok(value) => SafeParseResult::Success(value),
            Err(error) => SafeParseResult::Failure(error),
        }
    }
}

impl From<SafeParseResult> for Result<Value, ParseError> {
    fn from(result: SafeParseResult) -> Self {
        match result {
            SafeParseResult::Success(value) => Ok(value),
            SafeParseResult::Failure(error) => Err(error),
        }
    }
}
