//! Error code catalog.
//!
//! Codes read `S-<subsystem>-<number>`: subsystem 1 covers validation
//! issues, one code per issue kind, and subsystem 2 covers parse options.
//! The table lives in `error_catalog.json` and is embedded at compile time.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Catalog entry for one code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorCodeInfo {
    /// `validation` or `options`
    pub subsystem: String,
    /// Diagnostic title used when rendering the code
    pub title: String,
    /// Shape of the default message, with `{placeholders}`
    pub message_template: String,
}

/// Every known code, parsed on first use.
///
/// # Panics
///
/// Panics if the embedded JSON is malformed; `test_catalog_loads` catches
/// that before release.
pub static ERROR_CATALOG: Lazy<HashMap<String, ErrorCodeInfo>> = Lazy::new(|| {
    serde_json::from_str(include_str!("../error_catalog.json"))
        .expect("error_catalog.json is valid")
});

/// ```
/// use schemata_error_reporting::catalog::get_error_info;
///
/// assert_eq!(get_error_info("S-1-1").unwrap().title, "Invalid Type");
/// assert!(get_error_info("S-9-9").is_none());
/// ```
pub fn get_error_info(code: &str) -> Option<&'static ErrorCodeInfo> {
    ERROR_CATALOG.get(code)
}

/// Catalog title for `code`, or `fallback` for an unknown code
pub fn title_or(code: &str, fallback: &str) -> String {
    get_error_info(code)
        .map_or_else(|| fallback.to_string(), |info| info.title.clone())
}

/// ```
/// use schemata_error_reporting::catalog::get_subsystem;
///
/// assert_eq!(get_subsystem("S-2-1"), Some("options"));
/// ```
pub fn get_subsystem(code: &str) -> Option<&'static str> {
    get_error_info(code).map(|info| info.subsystem.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads() {
        assert_eq!(ERROR_CATALOG.len(), 10);
    }

    #[test]
    fn test_every_issue_kind_has_a_validation_code() {
        for n in 1..=9 {
            let code = format!("S-1-{}", n);
            assert_eq!(get_subsystem(&code), Some("validation"), "{}", code);
        }
    }

    #[test]
    fn test_options_code() {
        let info = get_error_info("S-2-1").unwrap();
        assert_eq!(info.subsystem, "options");
        assert_eq!(info.title, "Invalid Parse Options");
    }

    #[test]
    fn test_unknown_code() {
        assert!(get_error_info("S-0-1").is_none());
        assert_eq!(get_subsystem("S-999-999"), None);
        assert_eq!(title_or("S-999-999", "custom"), "custom");
        assert_eq!(title_or("S-1-2", "required"), "Missing Required Value");
    }
}
