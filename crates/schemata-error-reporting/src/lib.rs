//! Error reporting and diagnostic messages for schemata.
//!
//! Validation failures are collected as structured issues by the `schemata`
//! crate. This crate turns them into human-facing diagnostics following
//! tidyverse-style guidelines:
//!
//! - [`DiagnosticMessage`]: title, problem statement, detail bullets, hints
//! - [`DiagnosticMessageBuilder`]: builder API encoding those guidelines
//! - [`catalog`]: the embedded error-code catalog (`S-<subsystem>-<number>`)
//!
//! # Example
//!
//! ```
//! use schemata_error_reporting::DiagnosticMessageBuilder;
//!
//! let error = DiagnosticMessageBuilder::error("Value too small")
//!     .with_code("S-1-3")
//!     .problem("Password is shorter than allowed")
//!     .add_detail("String must contain at least 8 character(s)")
//!     .with_location("password")
//!     .build();
//!
//! assert!(error.to_text().starts_with("Error [S-1-3]: Value too small"));
//! ```

pub mod builder;
pub mod catalog;
pub mod diagnostic;

pub use builder::DiagnosticMessageBuilder;
pub use catalog::{ERROR_CATALOG, ErrorCodeInfo, get_error_info, get_subsystem, title_or};
pub use diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage, MessageContent};
