//! Builder API example.
//!
//! Shows the tidyverse structure used for validation reports: title,
//! problem, located details, and hints.

use schemata_error_reporting::{DiagnosticMessageBuilder, catalog};

fn main() {
    let report = DiagnosticMessageBuilder::error("Validation failed")
        .problem("Input does not match the login schema")
        .add_located_detail("username", "Invalid email")
        .add_located_detail("password", "String must contain at least 8 character(s)")
        .add_info("Unknown keys were ignored")
        .add_hint("Check the form before submitting?")
        .build();

    println!("{}", report.to_text());
    println!();

    let (msg, warnings) = DiagnosticMessageBuilder::error("Too much detail")
        .add_detail("Detail 1")
        .add_detail("Detail 2")
        .add_detail("Detail 3")
        .add_detail("Detail 4")
        .add_detail("Detail 5")
        .add_detail("Detail 6")
        .build_with_validation();

    println!("{}", msg.to_text());
    for warning in warnings {
        println!("  ! {}", warning);
    }
    println!();

    let mut codes: Vec<_> = catalog::ERROR_CATALOG.keys().collect();
    codes.sort();
    for code in codes {
        if let Some(info) = catalog::get_error_info(code) {
            println!("{} - {}", code, info.title);
        }
    }
}
