//! Schema nodes and builders
//!
//! A [`Schema`] is one node of a validation tree: a [`SchemaKind`] holding
//! the typed schema, plus the modifiers every kind shares (optional,
//! nullable, effects, description).
//!
//! Typed schemas are built with the functions in this module and refined
//! with their own constraint methods. The [`SchemaExt`] trait adds the
//! shared modifiers and the parse entry points to every typed schema and
//! to `Schema` itself.
//!
//! ```
//! use schemata::prelude::*;
//!
//! let username = string().min(4).max(25);
//! assert_eq!(username.parse("Gilang").unwrap(), Value::from("Gilang"));
//! assert!(username.safe_parse("abc").error().is_some());
//! ```

pub mod composite;
pub mod effects;
pub mod types;

use std::borrow::Cow;
use std::sync::Arc;

pub use composite::{ArraySchema, MapSchema, ObjectSchema, SetSchema};
pub use effects::{Effect, Refinement, RefinementIssue};
pub use types::{
    BooleanSchema, Check, DateCheck, DateSchema, IntoDateTime, NumberCheck, NumberSchema,
    SizeCheck, StringCheck, StringSchema,
};

use crate::error::{ParseError, Path, SafeParseResult};
use crate::options::ParseOptions;
use crate::validator;
use crate::value::{Value, ValueKind};

/// The typed part of a schema node
#[derive(Debug, Clone)]
pub enum SchemaKind {
    String(StringSchema),
    Number(NumberSchema),
    Boolean(BooleanSchema),
    Date(DateSchema),
    Object(ObjectSchema),
    Array(ArraySchema),
    Set(SetSchema),
    Map(MapSchema),
}

impl SchemaKind {
    /// The value kind this schema accepts
    pub fn expected(&self) -> ValueKind {
        match self {
            SchemaKind::String(_) => ValueKind::String,
            SchemaKind::Number(_) => ValueKind::Number,
            SchemaKind::Boolean(_) => ValueKind::Boolean,
            SchemaKind::Date(_) => ValueKind::Date,
            SchemaKind::Object(_) => ValueKind::Object,
            SchemaKind::Array(_) => ValueKind::Array,
            SchemaKind::Set(_) => ValueKind::Set,
            SchemaKind::Map(_) => ValueKind::Map,
        }
    }

    /// Custom message for invalid-type and required issues
    pub fn type_message(&self) -> Option<&str> {
        let message = match self {
            SchemaKind::String(s) => &s.type_message,
            SchemaKind::Number(s) => &s.type_message,
            SchemaKind::Boolean(s) => &s.type_message,
            SchemaKind::Date(s) => &s.type_message,
            SchemaKind::Object(s) => &s.type_message,
            SchemaKind::Array(s) => &s.type_message,
            SchemaKind::Set(s) => &s.type_message,
            SchemaKind::Map(s) => &s.type_message,
        };
        message.as_deref()
    }
}

/// One node of a validation tree
#[derive(Debug, Clone)]
pub struct Schema {
    pub kind: SchemaKind,
    /// Absence is accepted and leaves the field out of the output
    pub optional: bool,
    /// Null is accepted as-is
    pub nullable: bool,
    /// Run in declaration order after the node validates cleanly
    pub effects: Vec<Effect>,
    pub description: Option<String>,
}

impl Schema {
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            optional: false,
            nullable: false,
            effects: Vec::new(),
            description: None,
        }
    }

    fn with_effect(&self, effect: Effect) -> Self {
        let mut next = self.clone();
        next.effects.push(effect);
        next
    }
}

macro_rules! impl_schema_from {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for SchemaKind {
                fn from(schema: $ty) -> Self {
                    SchemaKind::$variant(schema)
                }
            }

            impl From<$ty> for Schema {
                fn from(schema: $ty) -> Self {
                    Schema::new(SchemaKind::$variant(schema))
                }
            }

            impl SchemaExt for $ty {
                fn as_schema(&self) -> Cow<'_, Schema> {
                    Cow::Owned(Schema::new(SchemaKind::$variant(self.clone())))
                }
            }
        )*
    };
}

impl_schema_from! {
    String => StringSchema,
    Number => NumberSchema,
    Boolean => BooleanSchema,
    Date => DateSchema,
    Object => ObjectSchema,
    Array => ArraySchema,
    Set => SetSchema,
    Map => MapSchema,
}

/// Modifiers and parse entry points shared by every schema
pub trait SchemaExt {
    /// View this schema as a node
    fn as_schema(&self) -> Cow<'_, Schema>;

    fn optional(&self) -> Schema {
        let mut schema = self.as_schema().into_owned();
        schema.optional = true;
        schema
    }

    fn nullable(&self) -> Schema {
        let mut schema = self.as_schema().into_owned();
        schema.nullable = true;
        schema
    }

    fn describe(&self, description: impl Into<String>) -> Schema {
        let mut schema = self.as_schema().into_owned();
        schema.description = Some(description.into());
        schema
    }

    /// Replace the validated value with `f(value)`
    fn transform<F>(&self, f: F) -> Schema
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.as_schema().with_effect(Effect::Transform(Arc::new(f)))
    }

    /// Raise a `custom` issue with `message` when `check` returns false
    fn refine<F>(&self, check: F, message: impl Into<String>) -> Schema
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.as_schema().with_effect(Effect::Refine {
            check: Arc::new(check),
            message: message.into(),
        })
    }

    /// Run `f` with the validated value and its path
    ///
    /// The callback reports issues through the returned [`Refinement`] and
    /// either supplies the replacement value or the never-valid marker.
    fn transform_with<F>(&self, f: F) -> Schema
    where
        F: Fn(Value, &Path) -> Refinement + Send + Sync + 'static,
    {
        self.as_schema()
            .with_effect(Effect::Refinement(Arc::new(f)))
    }

    /// Parse with default options, failing with every issue found
    fn parse(&self, value: impl Into<Value>) -> Result<Value, ParseError> {
        self.parse_with(value, &ParseOptions::default())
    }

    fn parse_with(
        &self,
        value: impl Into<Value>,
        options: &ParseOptions,
    ) -> Result<Value, ParseError> {
        validator::validate(&self.as_schema(), &value.into(), options)
    }

    /// Parse with default options without returning `Err`
    fn safe_parse(&self, value: impl Into<Value>) -> SafeParseResult {
        self.safe_parse_with(value, &ParseOptions::default())
    }

    fn safe_parse_with(&self, value: impl Into<Value>, options: &ParseOptions) -> SafeParseResult {
        self.parse_with(value, options).into()
    }
}

impl SchemaExt for Schema {
    fn as_schema(&self) -> Cow<'_, Schema> {
        Cow::Borrowed(self)
    }
}

pub fn string() -> StringSchema {
    StringSchema::new()
}

pub fn number() -> NumberSchema {
    NumberSchema::new()
}

pub fn boolean() -> BooleanSchema {
    BooleanSchema::new()
}

pub fn date() -> DateSchema {
    DateSchema::new()
}

/// An object with no fields yet; add them with [`ObjectSchema::field`]
pub fn object() -> ObjectSchema {
    ObjectSchema::new()
}

pub fn array(element: impl Into<Schema>) -> ArraySchema {
    ArraySchema::new(element)
}

pub fn set(element: impl Into<Schema>) -> SetSchema {
    SetSchema::new(element)
}

pub fn map(key: impl Into<Schema>, value: impl Into<Schema>) -> MapSchema {
    MapSchema::new(key, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_return_new_nodes() {
        let base = string().min(4);
        let optional = base.optional();
        let nullable = optional.nullable();

        assert!(optional.optional && !optional.nullable);
        assert!(nullable.optional && nullable.nullable);
        assert!(!base.as_schema().optional);
    }

    #[test]
    fn test_effects_accumulate_in_order() {
        let schema = string()
            .transform(|v| v)
            .refine(|_| true, "never raised")
            .transform_with(|v, _| Refinement::valid(v));

        assert_eq!(schema.effects.len(), 3);
        assert!(matches!(schema.effects[0], Effect::Transform(_)));
        assert!(matches!(schema.effects[1], Effect::Refine { .. }));
        assert!(matches!(schema.effects[2], Effect::Refinement(_)));
    }

    #[test]
    fn test_expected_kind_and_type_message() {
        let schema: Schema = number().message("price must be a number").into();
        assert_eq!(schema.kind.expected(), ValueKind::Number);
        assert_eq!(schema.kind.type_message(), Some("price must be a number"));

        let schema: Schema = map(string(), number()).into();
        assert_eq!(schema.kind.expected(), ValueKind::Map);
        assert_eq!(schema.kind.type_message(), None);
    }

    #[test]
    fn test_describe() {
        let schema = date().describe("Date of birth");
        assert_eq!(schema.description.as_deref(), Some("Date of birth"));
    }

    #[test]
    fn test_schemas_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Schema>();
        assert_send_sync::<ObjectSchema>();
    }
}
