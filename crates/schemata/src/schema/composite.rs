//! Composite schema definitions
//!
//! Objects, arrays, sets and maps hold child `Schema` nodes and recurse into
//! them during validation.

use indexmap::IndexMap;

use super::Schema;
use super::types::{Check, SizeCheck, push_size_check, with_size_message};
use crate::options::{DuplicatePolicy, UnknownKeys};

/// Object type schema
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    /// Declared fields, in declaration order
    pub fields: IndexMap<String, Schema>,
    /// Own unknown-key policy; `None` defers to the parse options
    pub unknown_keys: Option<UnknownKeys>,
    pub type_message: Option<String>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields<K, S, I>(fields: I) -> Self
    where
        K: Into<String>,
        S: Into<Schema>,
        I: IntoIterator<Item = (K, S)>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(name, schema)| (name.into(), schema.into()))
                .collect(),
            ..Self::default()
        }
    }

    /// Add a field, replacing any field with the same name in place
    pub fn field(&self, name: impl Into<String>, schema: impl Into<Schema>) -> Self {
        let mut next = self.clone();
        next.fields.insert(name.into(), schema.into());
        next
    }

    pub fn shape(&self) -> &IndexMap<String, Schema> {
        &self.fields
    }

    pub fn field_schema(&self, name: &str) -> Option<&Schema> {
        self.fields.get(name)
    }

    fn with_policy(&self, policy: UnknownKeys) -> Self {
        Self {
            unknown_keys: Some(policy),
            ..self.clone()
        }
    }

    /// Reject undeclared keys
    pub fn strict(&self) -> Self {
        self.with_policy(UnknownKeys::Strict)
    }

    /// Keep undeclared keys in the output
    pub fn passthrough(&self) -> Self {
        self.with_policy(UnknownKeys::Passthrough)
    }

    /// Drop undeclared keys from the output
    pub fn strip(&self) -> Self {
        self.with_policy(UnknownKeys::Strip)
    }

    /// Fields of `other` are appended; same-named fields are replaced.
    /// The policy of `other` wins when it declares one.
    pub fn extend(&self, other: &ObjectSchema) -> Self {
        let mut next = self.clone();
        for (name, schema) in &other.fields {
            next.fields.insert(name.clone(), schema.clone());
        }
        if other.unknown_keys.is_some() {
            next.unknown_keys = other.unknown_keys;
        }
        next
    }

    /// Keep only the named fields, in their declared order
    pub fn pick(&self, names: &[&str]) -> Self {
        Self {
            fields: self
                .fields
                .iter()
                .filter(|(name, _)| names.contains(&name.as_str()))
                .map(|(name, schema)| (name.clone(), schema.clone()))
                .collect(),
            ..self.clone()
        }
    }

    pub fn omit(&self, names: &[&str]) -> Self {
        Self {
            fields: self
                .fields
                .iter()
                .filter(|(name, _)| !names.contains(&name.as_str()))
                .map(|(name, schema)| (name.clone(), schema.clone()))
                .collect(),
            ..self.clone()
        }
    }

    /// Make every field optional
    pub fn partial(&self) -> Self {
        let mut next = self.clone();
        for schema in next.fields.values_mut() {
            schema.optional = true;
        }
        next
    }

    /// Message for a non-object input
    pub fn message(&self, message: impl Into<String>) -> Self {
        Self {
            type_message: Some(message.into()),
            ..self.clone()
        }
    }
}

/// Array type schema
#[derive(Debug, Clone)]
pub struct ArraySchema {
    pub element: Box<Schema>,
    pub checks: Vec<Check<SizeCheck>>,
    pub type_message: Option<String>,
}

impl ArraySchema {
    pub fn new(element: impl Into<Schema>) -> Self {
        Self {
            element: Box::new(element.into()),
            checks: Vec::new(),
            type_message: None,
        }
    }

    fn with_check(&self, kind: SizeCheck) -> Self {
        Self {
            checks: push_size_check(&self.checks, kind),
            ..self.clone()
        }
    }

    pub fn min(&self, count: usize) -> Self {
        self.with_check(SizeCheck::Min(count))
    }

    pub fn max(&self, count: usize) -> Self {
        self.with_check(SizeCheck::Max(count))
    }

    pub fn length(&self, count: usize) -> Self {
        self.with_check(SizeCheck::Exact(count))
    }

    pub fn nonempty(&self) -> Self {
        self.min(1)
    }

    pub fn message(&self, message: impl Into<String>) -> Self {
        let (checks, type_message) =
            with_size_message(&self.checks, &self.type_message, message.into());
        Self {
            element: self.element.clone(),
            checks,
            type_message,
        }
    }
}

/// Set type schema
#[derive(Debug, Clone)]
pub struct SetSchema {
    pub element: Box<Schema>,
    pub checks: Vec<Check<SizeCheck>>,
    /// Own duplicate policy; `None` defers to the parse options
    pub duplicates: Option<DuplicatePolicy>,
    pub type_message: Option<String>,
}

impl SetSchema {
    pub fn new(element: impl Into<Schema>) -> Self {
        Self {
            element: Box::new(element.into()),
            checks: Vec::new(),
            duplicates: None,
            type_message: None,
        }
    }

    fn with_check(&self, kind: SizeCheck) -> Self {
        Self {
            checks: push_size_check(&self.checks, kind),
            ..self.clone()
        }
    }

    /// Minimum number of distinct elements
    pub fn min(&self, count: usize) -> Self {
        self.with_check(SizeCheck::Min(count))
    }

    pub fn max(&self, count: usize) -> Self {
        self.with_check(SizeCheck::Max(count))
    }

    pub fn size(&self, count: usize) -> Self {
        self.with_check(SizeCheck::Exact(count))
    }

    pub fn nonempty(&self) -> Self {
        self.min(1)
    }

    pub fn report_duplicates(&self) -> Self {
        Self {
            duplicates: Some(DuplicatePolicy::Report),
            ..self.clone()
        }
    }

    pub fn collapse_duplicates(&self) -> Self {
        Self {
            duplicates: Some(DuplicatePolicy::Collapse),
            ..self.clone()
        }
    }

    pub fn message(&self, message: impl Into<String>) -> Self {
        let (checks, type_message) =
            with_size_message(&self.checks, &self.type_message, message.into());
        Self {
            checks,
            type_message,
            ..self.clone()
        }
    }
}

/// Map type schema
#[derive(Debug, Clone)]
pub struct MapSchema {
    pub key: Box<Schema>,
    pub value: Box<Schema>,
    pub checks: Vec<Check<SizeCheck>>,
    pub type_message: Option<String>,
}

impl MapSchema {
    pub fn new(key: impl Into<Schema>, value: impl Into<Schema>) -> Self {
        Self {
            key: Box::new(key.into()),
            value: Box::new(value.into()),
            checks: Vec::new(),
            type_message: None,
        }
    }

    fn with_check(&self, kind: SizeCheck) -> Self {
        Self {
            checks: push_size_check(&self.checks, kind),
            ..self.clone()
        }
    }

    pub fn min(&self, count: usize) -> Self {
        self.with_check(SizeCheck::Min(count))
    }

    pub fn max(&self, count: usize) -> Self {
        self.with_check(SizeCheck::Max(count))
    }

    pub fn message(&self, message: impl Into<String>) -> Self {
        let (checks, type_message) =
            with_size_message(&self.checks, &self.type_message, message.into());
        Self {
            checks,
            type_message,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SchemaExt, number, string};

    fn user() -> ObjectSchema {
        ObjectSchema::new()
            .field("username", string().min(4))
            .field("password", string().min(8))
            .field("age", number())
    }

    #[test]
    fn test_fields_keep_declaration_order() {
        let keys: Vec<_> = user().shape().keys().cloned().collect();
        assert_eq!(keys, ["username", "password", "age"]);
    }

    #[test]
    fn test_extend_replaces_in_place_and_appends() {
        let extra = ObjectSchema::new()
            .field("password", string().min(12))
            .field("email", string().email())
            .strict();
        let extended = user().extend(&extra);

        let keys: Vec<_> = extended.shape().keys().cloned().collect();
        assert_eq!(keys, ["username", "password", "age", "email"]);
        assert_eq!(extended.unknown_keys, Some(UnknownKeys::Strict));
        assert!(user().unknown_keys.is_none());
    }

    #[test]
    fn test_pick_and_omit() {
        let picked = user().pick(&["age", "username"]);
        let keys: Vec<_> = picked.shape().keys().cloned().collect();
        assert_eq!(keys, ["username", "age"]);

        let omitted = user().omit(&["password"]);
        assert!(omitted.field_schema("password").is_none());
        assert_eq!(omitted.shape().len(), 2);
    }

    #[test]
    fn test_partial_marks_every_field_optional() {
        let partial = user().partial();
        assert!(partial.shape().values().all(|schema| schema.optional));
        assert!(user().shape().values().all(|schema| !schema.optional));
    }

    #[test]
    fn test_from_fields_matches_builder() {
        let schema = ObjectSchema::from_fields([
            ("a", Schema::from(string())),
            ("b", string().optional()),
        ]);
        assert!(!schema.field_schema("a").unwrap().optional);
        assert!(schema.field_schema("b").unwrap().optional);
    }

    #[test]
    fn test_size_message_targets_latest_check() {
        let tags = ArraySchema::new(string()).min(1).message("need a tag");
        assert_eq!(tags.checks[0].message.as_deref(), Some("need a tag"));

        let ids = SetSchema::new(number()).message("ids must be a set");
        assert_eq!(ids.type_message.as_deref(), Some("ids must be a set"));
        assert!(ids.checks.is_empty());
    }
}
