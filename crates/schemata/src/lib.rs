//! Schema validation for dynamic values
//!
//! Build a schema from the typed builders, then parse a [`Value`] against
//! it. Parsing coerces leaf inputs when the schema asks for it, checks
//! every declared constraint, walks objects, arrays, sets and maps, and
//! runs transforms and refinements. The result is either the parsed value
//! or a [`ParseError`] carrying every issue found.
//!
//! ```
//! use schemata::prelude::*;
//!
//! let user = object()
//!     .field("username", string().min(4).max(25))
//!     .field("password", string().min(8))
//!     .field("email", coerce::string().email().optional());
//!
//! let error = user
//!     .parse(Value::object([("username", "Gilang"), ("password", "1234")]))
//!     .unwrap_err();
//! assert_eq!(error.issues()[0].path.to_string(), "password");
//! assert_eq!(error.issues()[0].code(), IssueCode::TooSmall);
//! ```

pub mod coerce;
pub mod error;
mod formats;
pub mod options;
pub mod schema;
pub mod validator;
pub mod value;

pub use error::{
    Bound, FlattenedErrors, Issue, IssueCode, IssueKind, ParseError, Path, PathSegment,
    SafeParseResult, StringFormat,
};
pub use options::{DuplicatePolicy, OptionsError, ParseOptions, UnknownKeys};
pub use schema::{
    ArraySchema, BooleanSchema, DateSchema, Effect, MapSchema, NumberSchema, ObjectSchema,
    Refinement, RefinementIssue, Schema, SchemaExt, SchemaKind, SetSchema, StringSchema, array,
    boolean, date, map, number, object, set, string,
};
pub use value::{Value, ValueKind};

/// Everything needed to build and parse schemas
pub mod prelude {
    pub use crate::coerce;
    pub use crate::error::{IssueCode, ParseError, Path, SafeParseResult};
    pub use crate::options::{DuplicatePolicy, ParseOptions, UnknownKeys};
    pub use crate::schema::{
        Refinement, Schema, SchemaExt, array, boolean, date, map, number, object, set, string,
    };
    pub use crate::value::Value;
}
