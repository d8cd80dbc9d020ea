//! Post-validation effects
//!
//! Effects attach to a `Schema` node and run in declaration order once the
//! node has validated cleanly.

use std::fmt;
use std::sync::Arc;

use crate::error::Path;
use crate::value::Value;

pub type TransformFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;
pub type RefineFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
pub type RefinementFn = Arc<dyn Fn(Value, &Path) -> Refinement + Send + Sync>;

/// A step run on a node's validated value
#[derive(Clone)]
pub enum Effect {
    /// Replace the value
    Transform(TransformFn),
    /// Raise a `custom` issue when the predicate is false
    Refine {
        check: RefineFn,
        message: String,
    },
    /// Report issues and either replace the value or mark it never-valid
    Refinement(RefinementFn),
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Transform(_) => f.write_str("Transform"),
            Effect::Refine { message, .. } => {
                f.debug_struct("Refine").field("message", message).finish()
            }
            Effect::Refinement(_) => f.write_str("Refinement"),
        }
    }
}

/// An issue raised from inside a refinement callback
#[derive(Debug, Clone, PartialEq)]
pub struct RefinementIssue {
    /// Relative to the refined node
    pub path: Path,
    pub message: String,
}

/// Result of a `transform_with` callback
///
/// `value: None` is the never-valid marker: the node fails even when no
/// issue was reported.
#[derive(Debug, Clone, PartialEq)]
pub struct Refinement {
    pub issues: Vec<RefinementIssue>,
    pub value: Option<Value>,
}

impl Refinement {
    /// Accept, replacing the node's value with `value`
    pub fn valid(value: impl Into<Value>) -> Self {
        Self {
            issues: Vec::new(),
            value: Some(value.into()),
        }
    }

    /// The never-valid marker
    pub fn never() -> Self {
        Self {
            issues: Vec::new(),
            value: None,
        }
    }

    pub fn with_issue(self, message: impl Into<String>) -> Self {
        self.with_issue_at(Path::new(), message)
    }

    pub fn with_issue_at(mut self, path: Path, message: impl Into<String>) -> Self {
        self.issues.push(RefinementIssue {
            path,
            message: message.into(),
        });
        self
    }

    pub fn is_never(&self) -> bool {
        self.value.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_marker() {
        let refinement = Refinement::never().with_issue("Username must be in uppercase");
        assert!(refinement.is_never());
        assert_eq!(refinement.issues.len(), 1);
        assert!(refinement.issues[0].path.is_empty());
    }

    #[test]
    fn test_valid_carries_replacement() {
        let refinement = Refinement::valid("GILANG");
        assert!(!refinement.is_never());
        assert_eq!(refinement.value, Some(Value::from("GILANG")));
    }

    #[test]
    fn test_issue_at_nested_path() {
        let path: Path = ["confirm"].into_iter().collect();
        let refinement = Refinement::never().with_issue_at(path.clone(), "Passwords differ");
        assert_eq!(refinement.issues[0].path, path);
    }

    #[test]
    fn test_debug_hides_closures() {
        let effect = Effect::Refine {
            check: Arc::new(|_: &Value| true),
            message: "nope".to_string(),
        };
        assert_eq!(format!("{:?}", effect), r#"Refine { message: "nope" }"#);
    }
}
