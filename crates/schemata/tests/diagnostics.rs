use schemata::prelude::*;
use schemata_error_reporting::get_subsystem;

fn register() -> schemata::ObjectSchema {
    object()
        .field("username", string().email())
        .field("password", string().min(8))
        .field("age", coerce::number().int().optional())
}

#[test]
fn test_single_issue_diagnostic_carries_code() {
    let error = register()
        .parse(Value::object([
            ("username", "gilang@example.com"),
            ("password", "1234"),
        ]))
        .unwrap_err();

    insta::assert_snapshot!(error.to_diagnostic().to_text(), @r"
    Error [S-1-3]: Validation failed
    1 issue(s) found
    ✖ password: String must contain at least 8 character(s)
    ");
}

#[test]
fn test_multi_issue_diagnostic_lists_every_path() {
    let error = register()
        .parse(Value::object([
            ("username", Value::from("gilang")),
            ("age", Value::from("12.5")),
        ]))
        .unwrap_err();

    insta::assert_snapshot!(error.to_diagnostic().to_text(), @r"
    Error: Validation failed
    3 issue(s) found
    ✖ username: Invalid email
    ✖ password: Required
    ✖ age: Expected integer, received float
    ");
}

#[test]
fn test_issue_diagnostic_uses_catalog() {
    let error = string().email().parse("tehe").unwrap_err();
    let issue = &error.issues()[0];
    let diagnostic = issue.to_diagnostic();

    assert_eq!(issue.error_code(), "S-1-5");
    assert_eq!(get_subsystem("S-1-5"), Some("validation"));
    insta::assert_snapshot!(diagnostic.to_text(), @r"
    Error [S-1-5]: Invalid Format
    at (root)
    Invalid email
    ");
}

#[test]
fn test_diagnostic_json() {
    let error = number().min(1000.0).parse(10).unwrap_err();
    let json = error.to_diagnostic().to_json();

    assert_eq!(json["kind"], "error");
    assert_eq!(json["code"], "S-1-3");
    assert_eq!(json["title"], "Validation failed");
}

#[test]
fn test_flattened_errors() {
    let error = register()
        .strict()
        .parse(Value::object([
            ("username", "gilang"),
            ("password", "1234"),
            ("role", "admin"),
        ]))
        .unwrap_err();

    let flattened = error.flatten();
    assert_eq!(
        flattened.form_errors,
        vec!["Unrecognized key(s) in object: 'role'"]
    );
    let fields: Vec<_> = flattened.field_errors.keys().cloned().collect();
    assert_eq!(fields, ["username", "password"]);

    let json = serde_json::to_string(&flattened).unwrap();
    assert_eq!(
        json,
        concat!(
            r#"{"form_errors":["Unrecognized key(s) in object: 'role'"],"#,
            r#""field_errors":{"username":["Invalid email"],"#,
            r#""password":["String must contain at least 8 character(s)"]}}"#
        )
    );
}

#[test]
fn test_options_error_diagnostic() {
    let error = ParseOptions::from_json_str(r#"{"unknown-keys": 1}"#).unwrap_err();
    assert_eq!(get_subsystem(error.error_code()), Some("options"));

    let text = error.to_diagnostic().to_text();
    let header: Vec<&str> = text.lines().take(2).collect();
    assert_eq!(header[0], "Error [S-2-1]: Invalid Parse Options");
    assert!(header[1].starts_with("at line 1, column"));
    let hint = "? Only `unknown-keys` and `set-duplicates` are recognized?";
    assert!(text.ends_with(hint));
}
