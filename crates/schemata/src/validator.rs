// Schema validation engine

use crate::coerce;
use crate::error::{Bound, Issue, IssueKind, ParseError, Path, PathSegment, StringFormat};
use crate::formats;
use crate::options::{DuplicatePolicy, ParseOptions, UnknownKeys};
use crate::schema::{
    ArraySchema, BooleanSchema, Check, DateCheck, DateSchema, Effect, MapSchema, NumberCheck,
    NumberSchema, ObjectSchema, Schema, SchemaKind, SetSchema, SizeCheck, StringCheck,
    StringSchema,
};
use crate::value::{Value, ValueKind};
use indexmap::IndexMap;
use tracing::{debug, trace};

/// Validates a value against a schema, returning the parsed output
pub fn validate(
    schema: &Schema,
    value: &Value,
    options: &ParseOptions,
) -> Result<Value, ParseError> {
    let mut context = ValidationContext::new(options);
    let parsed = validate_node(schema, Some(value), &mut context);
    debug!(issue_count = context.issue_count(), "parse finished");

    match parsed {
        Parsed::Valid(output) if !context.has_issues() => Ok(output),
        _ => Err(ParseError::new(context.into_issues())),
    }
}

/// Validation context tracks state during one top-level parse
pub struct ValidationContext<'a> {
    options: &'a ParseOptions,
    /// Current instance path (e.g., ["profile", "birthdate"])
    path: Path,
    /// Collected issues, in pre-order
    issues: Vec<Issue>,
}

impl<'a> ValidationContext<'a> {
    pub fn new(options: &'a ParseOptions) -> Self {
        Self {
            options,
            path: Path::new(),
            issues: Vec::new(),
        }
    }

    /// Record an issue at the current path
    pub fn add_issue(&mut self, kind: IssueKind, message: Option<&str>) {
        let issue = Issue::new(kind, self.path.clone()).with_message(message);
        self.issues.push(issue);
    }

    /// Record an issue at a path relative to the current one
    pub fn add_issue_at(&mut self, relative: &Path, kind: IssueKind, message: Option<&str>) {
        let issue = Issue::new(kind, self.path.join(relative))
            .with_message(message);
        self.issues.push(issue);
    }

    /// Execute a function with a new path segment
    pub fn with_path<F, R>(&mut self, segment: impl Into<PathSegment>, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.path.push(segment);
        let result = f(self);
        self.path.pop();
        result
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &ParseOptions {
        self.options
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}

/// Outcome of validating one node
enum Parsed {
    Valid(Value),
    /// Absent and optional: left out of the parent's output
    Absent,
    Invalid,
}

fn validate_node(
    schema: &Schema,
    value: Option<&Value>,
    context: &mut ValidationContext,
) -> Parsed {
    let value = match value {
        None if schema.optional => return Parsed::Absent,
        None => {
            context.add_issue(IssueKind::Required, schema.kind.type_message());
            return Parsed::Invalid;
        }
        Some(Value::Null) if schema.nullable => return Parsed::Valid(Value::Null),
        Some(value) => value,
    };

    let issues_before = context.issue_count();
    let output = match &schema.kind {
        SchemaKind::String(s) => validate_string(s, value, context),
        SchemaKind::Number(s) => validate_number(s, value, context),
        SchemaKind::Boolean(s) => validate_boolean(s, value, context),
        SchemaKind::Date(s) => validate_date(s, value, context),
        SchemaKind::Object(s) => validate_object(s, value, context),
        SchemaKind::Array(s) => validate_array(s, value, context),
        SchemaKind::Set(s) => validate_set(s, value, context),
        SchemaKind::Map(s) => validate_map(s, value, context),
    };

    match output {
        Some(output) if context.issue_count() == issues_before => {
            apply_effects(&schema.effects, output, context)
        }
        _ => Parsed::Invalid,
    }
}

fn invalid_type(
    expected: ValueKind,
    value: &Value,
    message: Option<&str>,
    context: &mut ValidationContext,
) {
    let received = value.kind();
    trace!(path = %context.path, %expected, %received, "type mismatch");
    context.add_issue(IssueKind::InvalidType { expected, received }, message);
}

/// Run effects in order; the first failing one stops the chain
fn apply_effects(effects: &[Effect], mut value: Value, context: &mut ValidationContext) -> Parsed {
    for effect in effects {
        match effect {
            Effect::Transform(transform) => {
                trace!(path = %context.path, "running transform");
                value = transform(value);
            }
            Effect::Refine { check, message } => {
                if !check(&value) {
                    context.add_issue(IssueKind::Custom, Some(message.as_str()));
                    return Parsed::Invalid;
                }
            }
            Effect::Refinement(refine) => {
                trace!(path = %context.path, "running refinement");
                let refinement = refine(value, &context.path);
                for issue in &refinement.issues {
                    let message = Some(issue.message.as_str());
                    context.add_issue_at(&issue.path, IssueKind::Custom, message);
                }
                match refinement.value {
                    Some(next) if refinement.issues.is_empty() => value = next,
                    _ => {
                        if refinement.issues.is_empty() {
                            context.add_issue(IssueKind::Custom, None);
                        }
                        return Parsed::Invalid;
                    }
                }
            }
        }
    }
    Parsed::Valid(value)
}

fn validate_string(
    schema: &StringSchema,
    value: &Value,
    context: &mut ValidationContext,
) -> Option<Value> {
    let text = if schema.coerce {
        coerce::to_string(value)
    } else {
        value.as_str().map(str::to_string)
    };
    let Some(mut text) = text else {
        invalid_type(
            ValueKind::String,
            value,
            schema.type_message.as_deref(),
            context,
        );
        return None;
    };

    for Check { kind, message } in &schema.checks {
        let message = message.as_deref();
        let length = text.chars().count();
        let failure = match kind {
            StringCheck::MinLength(min) if length < *min => Some(IssueKind::TooSmall {
                bound: Bound::String(*min),
                inclusive: true,
                exact: false,
            }),
            StringCheck::MaxLength(max) if length > *max => Some(IssueKind::TooBig {
                bound: Bound::String(*max),
                inclusive: true,
                exact: false,
            }),
            StringCheck::Length(exact) if length < *exact => Some(IssueKind::TooSmall {
                bound: Bound::String(*exact),
                inclusive: true,
                exact: true,
            }),
            StringCheck::Length(exact) if length > *exact => Some(IssueKind::TooBig {
                bound: Bound::String(*exact),
                inclusive: true,
                exact: true,
            }),
            StringCheck::Email if !formats::is_email(&text) => Some(IssueKind::InvalidFormat {
                format: StringFormat::Email,
            }),
            StringCheck::Url if !formats::is_url(&text) => Some(IssueKind::InvalidFormat {
                format: StringFormat::Url,
            }),
            StringCheck::Uuid if !formats::is_uuid(&text) => Some(IssueKind::InvalidFormat {
                format: StringFormat::Uuid,
            }),
            StringCheck::Regex(pattern) if !pattern.is_match(&text) => {
                Some(IssueKind::InvalidFormat {
                    format: StringFormat::Regex(pattern.as_str().to_string()),
                })
            }
            StringCheck::StartsWith(prefix) if !text.starts_with(prefix.as_str()) => {
                Some(IssueKind::InvalidFormat {
                    format: StringFormat::StartsWith(prefix.clone()),
                })
            }
            StringCheck::EndsWith(suffix) if !text.ends_with(suffix.as_str()) => {
                Some(IssueKind::InvalidFormat {
                    format: StringFormat::EndsWith(suffix.clone()),
                })
            }
            StringCheck::Includes(needle) if !text.contains(needle.as_str()) => {
                Some(IssueKind::InvalidFormat {
                    format: StringFormat::Includes(needle.clone()),
                })
            }
            StringCheck::Trim => {
                text = text.trim().to_string();
                None
            }
            StringCheck::ToLowerCase => {
                text = text.to_lowercase();
                None
            }
            StringCheck::ToUpperCase => {
                text = text.to_uppercase();
                None
            }
            _ => None,
        };
        if let Some(kind) = failure {
            context.add_issue(kind, message);
        }
    }

    Some(Value::String(text))
}

fn validate_number(
    schema: &NumberSchema,
    value: &Value,
    context: &mut ValidationContext,
) -> Option<Value> {
    let number = if schema.coerce {
        coerce::to_number(value)
    } else {
        value.as_f64().filter(|n| !n.is_nan())
    };
    let Some(number) = number else {
        invalid_type(
            ValueKind::Number,
            value,
            schema.type_message.as_deref(),
            context,
        );
        return None;
    };

    for Check { kind, message } in &schema.checks {
        let message = message.as_deref();
        let failure = match kind {
            NumberCheck::Min { value, inclusive } => {
                let below = if *inclusive {
                    number < *value
                } else {
                    number <= *value
                };
                below.then(|| IssueKind::TooSmall {
                    bound: Bound::Number(*value),
                    inclusive: *inclusive,
                    exact: false,
                })
            }
            NumberCheck::Max { value, inclusive } => {
                let above = if *inclusive {
                    number > *value
                } else {
                    number >= *value
                };
                above.then(|| IssueKind::TooBig {
                    bound: Bound::Number(*value),
                    inclusive: *inclusive,
                    exact: false,
                })
            }
            // Reported as a type mismatch, but only a constraint: later checks still run
            NumberCheck::Int => (!is_integer(number)).then_some(IssueKind::InvalidType {
                expected: ValueKind::Integer,
                received: ValueKind::Float,
            }),
            NumberCheck::MultipleOf(step) => {
                (!is_multiple_of(number, *step)).then(|| IssueKind::NotMultipleOf {
                    multiple_of: *step,
                })
            }
        };
        if let Some(kind) = failure {
            context.add_issue(kind, message);
        }
    }

    Some(Value::Number(number))
}

fn is_integer(number: f64) -> bool {
    number.is_finite() && number.trunc() == number
}

/// Remainder test that tolerates binary rounding (0.3 is a multiple of 0.1)
fn is_multiple_of(number: f64, step: f64) -> bool {
    if step == 0.0 || !step.is_finite() {
        return false;
    }
    let quotient = number / step;
    (quotient - quotient.round()).abs() <= 1e-9 * quotient.abs().max(1.0)
}

fn validate_boolean(
    schema: &BooleanSchema,
    value: &Value,
    context: &mut ValidationContext,
) -> Option<Value> {
    let flag = if schema.coerce {
        coerce::to_boolean(value)
    } else {
        value.as_bool()
    };
    match flag {
        Some(flag) => Some(Value::Bool(flag)),
        None => {
            invalid_type(
                ValueKind::Boolean,
                value,
                schema.type_message.as_deref(),
                context,
            );
            None
        }
    }
}

fn validate_date(
    schema: &DateSchema,
    value: &Value,
    context: &mut ValidationContext,
) -> Option<Value> {
    let date = if schema.coerce {
        coerce::to_date(value)
    } else {
        value.as_date()
    };
    let Some(date) = date else {
        invalid_type(
            ValueKind::Date,
            value,
            schema.type_message.as_deref(),
            context,
        );
        return None;
    };

    for Check { kind, message } in &schema.checks {
        let failure = match kind {
            DateCheck::Min(earliest) if date < *earliest => Some(IssueKind::TooSmall {
                bound: Bound::Date(*earliest),
                inclusive: true,
                exact: false,
            }),
            DateCheck::Max(latest) if date > *latest => Some(IssueKind::TooBig {
                bound: Bound::Date(*latest),
                inclusive: true,
                exact: false,
            }),
            _ => None,
        };
        if let Some(kind) = failure {
            context.add_issue(kind, message.as_deref());
        }
    }

    Some(Value::Date(date))
}

/// Size constraints for arrays, sets and maps
fn check_size(
    checks: &[Check<SizeCheck>],
    size: usize,
    bound: fn(usize) -> Bound,
    context: &mut ValidationContext,
) {
    for Check { kind, message } in checks {
        let failure = match *kind {
            SizeCheck::Min(min) if size < min => Some(IssueKind::TooSmall {
                bound: bound(min),
                inclusive: true,
                exact: false,
            }),
            SizeCheck::Max(max) if size > max => Some(IssueKind::TooBig {
                bound: bound(max),
                inclusive: true,
                exact: false,
            }),
            SizeCheck::Exact(exact) if size < exact => Some(IssueKind::TooSmall {
                bound: bound(exact),
                inclusive: true,
                exact: true,
            }),
            SizeCheck::Exact(exact) if size > exact => Some(IssueKind::TooBig {
                bound: bound(exact),
                inclusive: true,
                exact: true,
            }),
            _ => None,
        };
        if let Some(kind) = failure {
            context.add_issue(kind, message.as_deref());
        }
    }
}

fn validate_object(
    schema: &ObjectSchema,
    value: &Value,
    context: &mut ValidationContext,
) -> Option<Value> {
    let Value::Object(entries) = value else {
        invalid_type(
            ValueKind::Object,
            value,
            schema.type_message.as_deref(),
            context,
        );
        return None;
    };

    let policy = schema.unknown_keys.unwrap_or(context.options.unknown_keys);
    let unknown: Vec<(&String, &Value)> = entries
        .iter()
        .filter(|(key, _)| !schema.fields.contains_key(key.as_str()))
        .collect();

    if policy == UnknownKeys::Strict && !unknown.is_empty() {
        let keys = unknown.iter().map(|(key, _)| (*key).clone()).collect();
        context.add_issue(IssueKind::UnrecognizedKeys { keys }, None);
    }

    let mut output = IndexMap::new();
    for (name, field) in &schema.fields {
        let parsed = context.with_path(name.as_str(), |context| {
            validate_node(field, entries.get(name.as_str()), context)
        });
        if let Parsed::Valid(field_value) = parsed {
            output.insert(name.clone(), field_value);
        }
    }

    if policy == UnknownKeys::Passthrough {
        for (key, extra) in unknown {
            output.insert(key.clone(), extra.clone());
        }
    }

    Some(Value::Object(output))
}

fn validate_array(
    schema: &ArraySchema,
    value: &Value,
    context: &mut ValidationContext,
) -> Option<Value> {
    let Value::Array(items) = value else {
        invalid_type(
            ValueKind::Array,
            value,
            schema.type_message.as_deref(),
            context,
        );
        return None;
    };

    check_size(&schema.checks, items.len(), Bound::Array, context);

    let mut output = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let parsed = context.with_path(index, |context| {
            validate_node(&schema.element, Some(item), context)
        });
        if let Parsed::Valid(element) = parsed {
            output.push(element);
        }
    }

    Some(Value::Array(output))
}

fn validate_set(
    schema: &SetSchema,
    value: &Value,
    context: &mut ValidationContext,
) -> Option<Value> {
    let Value::Set(items) = value else {
        invalid_type(
            ValueKind::Set,
            value,
            schema.type_message.as_deref(),
            context,
        );
        return None;
    };

    let policy = schema.duplicates.unwrap_or(context.options.set_duplicates);
    let is_repeat = |index: usize| items[..index].contains(&items[index]);
    let distinct = (0..items.len()).filter(|&index| !is_repeat(index)).count();

    check_size(&schema.checks, distinct, Bound::Set, context);

    let mut output: Vec<Value> = Vec::with_capacity(distinct);
    for (index, item) in items.iter().enumerate() {
        if is_repeat(index) {
            if policy == DuplicatePolicy::Report {
                context.with_path(index, |context| {
                    context.add_issue(IssueKind::DuplicateElement, None)
                });
            }
            continue;
        }
        let parsed = context.with_path(index, |context| {
            validate_node(&schema.element, Some(item), context)
        });
        // Transforms can make distinct inputs equal
        if let Parsed::Valid(element) = parsed
            && !output.contains(&element)
        {
            output.push(element);
        }
    }

    Some(Value::Set(output))
}

fn validate_map(
    schema: &MapSchema,
    value: &Value,
    context: &mut ValidationContext,
) -> Option<Value> {
    let Value::Map(entries) = value else {
        invalid_type(
            ValueKind::Map,
            value,
            schema.type_message.as_deref(),
            context,
        );
        return None;
    };

    let is_repeat = |index: usize| {
        let key = &entries[index].0;
        entries[..index].iter().any(|(earlier, _)| earlier == key)
    };
    let distinct = (0..entries.len()).filter(|&index| !is_repeat(index)).count();

    check_size(&schema.checks, distinct, Bound::Map, context);

    let mut output: Vec<(Value, Value)> = Vec::with_capacity(distinct);
    for (key, entry) in entries {
        let (parsed_key, parsed_value) = context.with_path(key.key_repr(), |context| {
            (
                validate_node(&schema.key, Some(key), context),
                validate_node(&schema.value, Some(entry), context),
            )
        });
        let (Parsed::Valid(key), Parsed::Valid(entry)) = (parsed_key, parsed_value) else {
            continue;
        };
        // A repeated key keeps its first position and takes the latest value
        match output.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = entry,
            None => output.push((key, entry)),
        }
    }

    Some(Value::Map(output))
}
