//! Leaf schema definitions
//!
//! Each leaf schema holds its constraints in declaration order, a coercion
//! flag, and an optional message for type mismatches. Builder methods take
//! `&self` and return a new schema, so a base schema can be shared and
//! extended into several variants.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

/// A constraint plus the message that replaces its default one
#[derive(Debug, Clone)]
pub struct Check<K> {
    pub kind: K,
    pub message: Option<String>,
}

impl<K> Check<K> {
    fn new(kind: K) -> Self {
        Self {
            kind,
            message: None,
        }
    }
}

/// Attach `message` to the most recent check, or to the type mismatch when
/// nothing has been declared yet.
fn attach_message<K>(checks: &mut [Check<K>], type_message: &mut Option<String>, message: String) {
    match checks.last_mut() {
        Some(check) => check.message = Some(message),
        None => *type_message = Some(message),
    }
}

/// String constraints and normalizers
#[derive(Debug, Clone)]
pub enum StringCheck {
    MinLength(usize),
    MaxLength(usize),
    Length(usize),
    Email,
    Url,
    Uuid,
    Regex(Regex),
    StartsWith(String),
    EndsWith(String),
    Includes(String),
    /// Normalizers rewrite the value for the checks that follow
    Trim,
    ToLowerCase,
    ToUpperCase,
}

/// String type schema
#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    pub checks: Vec<Check<StringCheck>>,
    pub coerce: bool,
    pub type_message: Option<String>,
}

impl StringSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn coerced() -> Self {
        Self {
            coerce: true,
            ..Self::default()
        }
    }

    fn with_check(&self, kind: StringCheck) -> Self {
        let mut next = self.clone();
        next.checks.push(Check::new(kind));
        next
    }

    /// Minimum length in characters
    pub fn min(&self, length: usize) -> Self {
        self.with_check(StringCheck::MinLength(length))
    }

    /// Maximum length in characters
    pub fn max(&self, length: usize) -> Self {
        self.with_check(StringCheck::MaxLength(length))
    }

    pub fn length(&self, length: usize) -> Self {
        self.with_check(StringCheck::Length(length))
    }

    pub fn email(&self) -> Self {
        self.with_check(StringCheck::Email)
    }

    pub fn url(&self) -> Self {
        self.with_check(StringCheck::Url)
    }

    pub fn uuid(&self) -> Self {
        self.with_check(StringCheck::Uuid)
    }

    pub fn regex(&self, pattern: Regex) -> Self {
        self.with_check(StringCheck::Regex(pattern))
    }

    pub fn starts_with(&self, prefix: impl Into<String>) -> Self {
        self.with_check(StringCheck::StartsWith(prefix.into()))
    }

    pub fn ends_with(&self, suffix: impl Into<String>) -> Self {
        self.with_check(StringCheck::EndsWith(suffix.into()))
    }

    pub fn includes(&self, needle: impl Into<String>) -> Self {
        self.with_check(StringCheck::Includes(needle.into()))
    }

    pub fn trim(&self) -> Self {
        self.with_check(StringCheck::Trim)
    }

    pub fn to_lowercase(&self) -> Self {
        self.with_check(StringCheck::ToLowerCase)
    }

    pub fn to_uppercase(&self) -> Self {
        self.with_check(StringCheck::ToUpperCase)
    }

    /// Message for the most recent constraint (or for a type mismatch)
    pub fn message(&self, message: impl Into<String>) -> Self {
        let mut next = self.clone();
        attach_message(&mut next.checks, &mut next.type_message, message.into());
        next
    }
}

/// Number constraints
#[derive(Debug, Clone, PartialEq)]
pub enum NumberCheck {
    Min { value: f64, inclusive: bool },
    Max { value: f64, inclusive: bool },
    Int,
    MultipleOf(f64),
}

/// Number type schema
#[derive(Debug, Clone, Default)]
pub struct NumberSchema {
    pub checks: Vec<Check<NumberCheck>>,
    pub coerce: bool,
    pub type_message: Option<String>,
}

impl NumberSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn coerced() -> Self {
        Self {
            coerce: true,
            ..Self::default()
        }
    }

    fn with_check(&self, kind: NumberCheck) -> Self {
        let mut next = self.clone();
        next.checks.push(Check::new(kind));
        next
    }

    /// Inclusive lower bound
    pub fn min(&self, value: f64) -> Self {
        self.gte(value)
    }

    /// Inclusive upper bound
    pub fn max(&self, value: f64) -> Self {
        self.lte(value)
    }

    pub fn gte(&self, value: f64) -> Self {
        self.with_check(NumberCheck::Min {
            value,
            inclusive: true,
        })
    }

    pub fn gt(&self, value: f64) -> Self {
        self.with_check(NumberCheck::Min {
            value,
            inclusive: false,
        })
    }

    pub fn lte(&self, value: f64) -> Self {
        self.with_check(NumberCheck::Max {
            value,
            inclusive: true,
        })
    }

    pub fn lt(&self, value: f64) -> Self {
        self.with_check(NumberCheck::Max {
            value,
            inclusive: false,
        })
    }

    pub fn int(&self) -> Self {
        self.with_check(NumberCheck::Int)
    }

    pub fn positive(&self) -> Self {
        self.gt(0.0)
    }

    pub fn negative(&self) -> Self {
        self.lt(0.0)
    }

    pub fn nonnegative(&self) -> Self {
        self.gte(0.0)
    }

    pub fn nonpositive(&self) -> Self {
        self.lte(0.0)
    }

    pub fn multiple_of(&self, step: f64) -> Self {
        self.with_check(NumberCheck::MultipleOf(step))
    }

    /// Message for the most recent constraint (or for a type mismatch)
    pub fn message(&self, message: impl Into<String>) -> Self {
        let mut next = self.clone();
        attach_message(&mut next.checks, &mut next.type_message, message.into());
        next
    }
}

/// Boolean type schema
#[derive(Debug, Clone, Default)]
pub struct BooleanSchema {
    pub coerce: bool,
    pub type_message: Option<String>,
}

impl BooleanSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn coerced() -> Self {
        Self {
            coerce: true,
            type_message: None,
        }
    }

    /// Message for a type mismatch
    pub fn message(&self, message: impl Into<String>) -> Self {
        Self {
            coerce: self.coerce,
            type_message: Some(message.into()),
        }
    }
}

/// Anything usable as a date bound
pub trait IntoDateTime {
    fn into_date_time(self) -> NaiveDateTime;
}

impl IntoDateTime for NaiveDateTime {
    fn into_date_time(self) -> NaiveDateTime {
        self
    }
}

impl IntoDateTime for NaiveDate {
    fn into_date_time(self) -> NaiveDateTime {
        self.and_time(NaiveTime::MIN)
    }
}

/// Date constraints (both bounds inclusive)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateCheck {
    Min(NaiveDateTime),
    Max(NaiveDateTime),
}

/// Date type schema
#[derive(Debug, Clone, Default)]
pub struct DateSchema {
    pub checks: Vec<Check<DateCheck>>,
    pub coerce: bool,
    pub type_message: Option<String>,
}

impl DateSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn coerced() -> Self {
        Self {
            coerce: true,
            ..Self::default()
        }
    }

    fn with_check(&self, kind: DateCheck) -> Self {
        let mut next = self.clone();
        next.checks.push(Check::new(kind));
        next
    }

    pub fn min(&self, earliest: impl IntoDateTime) -> Self {
        self.with_check(DateCheck::Min(earliest.into_date_time()))
    }

    pub fn max(&self, latest: impl IntoDateTime) -> Self {
        self.with_check(DateCheck::Max(latest.into_date_time()))
    }

    /// Message for the most recent constraint (or for a type mismatch)
    pub fn message(&self, message: impl Into<String>) -> Self {
        let mut next = self.clone();
        attach_message(&mut next.checks, &mut next.type_message, message.into());
        next
    }
}

/// Size constraints shared by arrays, sets and maps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeCheck {
    Min(usize),
    Max(usize),
    Exact(usize),
}

pub(crate) fn push_size_check(
    checks: &[Check<SizeCheck>],
    kind: SizeCheck,
) -> Vec<Check<SizeCheck>> {
    let mut next = checks.to_vec();
    next.push(Check::new(kind));
    next
}

pub(crate) fn with_size_message(
    checks: &[Check<SizeCheck>],
    type_message: &Option<String>,
    message: String,
) -> (Vec<Check<SizeCheck>>, Option<String>) {
    let mut checks = checks.to_vec();
    let mut type_message = type_message.clone();
    attach_message(&mut checks, &mut type_message, message);
    (checks, type_message)
}
