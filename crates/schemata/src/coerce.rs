//! Coercing leaf schemas
//!
//! `coerce::string()` and friends build the same leaf schemas as the
//! crate-level builders, but convert the raw input to the leaf's kind
//! before any constraint runs. A failed conversion yields exactly one
//! `invalid_type` issue.

use crate::schema::{BooleanSchema, DateSchema, NumberSchema, StringSchema};
use crate::value::{DATE_FORMAT, Value, format_number};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// String schema that renders numbers, booleans and dates as text
pub fn string() -> StringSchema {
    StringSchema::coerced()
}

/// Number schema that parses numeric text and converts booleans and dates
pub fn number() -> NumberSchema {
    NumberSchema::coerced()
}

/// Boolean schema that accepts literal words and numbers
pub fn boolean() -> BooleanSchema {
    BooleanSchema::coerced()
}

/// Date schema that parses calendar text and epoch milliseconds
pub fn date() -> DateSchema {
    DateSchema::coerced()
}

pub(crate) fn to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(format_number(*n)),
        Value::Bool(b) => Some(b.to_string()),
        Value::Date(d) => Some(d.format(DATE_FORMAT).to_string()),
        _ => None,
    }
}

pub(crate) fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) if !n.is_nan() => Some(*n),
        Value::String(s) => {
            let text = s.trim();
            if text.is_empty() {
                return None;
            }
            text.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Date(d) => Some(d.and_utc().timestamp_millis() as f64),
        _ => None,
    }
}

pub(crate) fn to_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" | "" => Some(false),
            _ => None,
        },
        Value::Number(n) if n.is_finite() => Some(*n != 0.0),
        _ => None,
    }
}

pub(crate) fn to_date(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Date(d) => Some(*d),
        Value::String(s) => parse_date(s),
        Value::Number(n) if n.is_finite() => {
            DateTime::<Utc>::from_timestamp_millis(*n as i64).map(|d| d.naive_utc())
        }
        _ => None,
    }
}

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Calendar parse: RFC 3339 (normalized to UTC), local date-times, plain dates
fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::<FixedOffset>::parse_from_rfc3339(text) {
        return Some(parsed.naive_utc());
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::MIN)
    }

    #[test]
    fn test_to_string() {
        assert_eq!(to_string(&Value::from(5000)), Some("5000".to_string()));
        assert_eq!(to_string(&Value::from(0.5)), Some("0.5".to_string()));
        assert_eq!(to_string(&Value::from(false)), Some("false".to_string()));
        assert_eq!(
            to_string(&Value::from(ymd(1995, 5, 20))),
            Some("1995-05-20T00:00:00.000".to_string())
        );
        assert_eq!(to_string(&Value::Null), None);
        assert_eq!(to_string(&Value::array([1])), None);
    }

    #[test]
    fn test_to_number() {
        assert_eq!(to_number(&Value::from(" 42.5 ")), Some(42.5));
        assert_eq!(to_number(&Value::from("")), None);
        assert_eq!(to_number(&Value::from("abc")), None);
        assert_eq!(to_number(&Value::from("inf")), None);
        assert_eq!(to_number(&Value::from(true)), Some(1.0));
        assert_eq!(to_number(&Value::Number(f64::NAN)), None);
        assert_eq!(to_number(&Value::from(ymd(1970, 1, 2))), Some(86_400_000.0));
    }

    #[test]
    fn test_to_boolean() {
        assert_eq!(to_boolean(&Value::from(false)), Some(false));
        assert_eq!(to_boolean(&Value::from("TRUE")), Some(true));
        assert_eq!(to_boolean(&Value::from("off")), Some(false));
        assert_eq!(to_boolean(&Value::from("")), Some(false));
        assert_eq!(to_boolean(&Value::from("maybe")), None);
        assert_eq!(to_boolean(&Value::from(0)), Some(false));
        assert_eq!(to_boolean(&Value::from(-3)), Some(true));
        assert_eq!(to_boolean(&Value::Null), None);
    }

    #[test]
    fn test_to_date() {
        assert_eq!(to_date(&Value::from("1995-05-20")), Some(ymd(1995, 5, 20)));
        assert_eq!(
            to_date(&Value::from("1995-05-20T10:30:00")),
            Some(ymd(1995, 5, 20).date().and_hms_opt(10, 30, 0).unwrap())
        );
        assert_eq!(
            to_date(&Value::from("1995-05-20T10:30:00+02:00")),
            Some(ymd(1995, 5, 20).date().and_hms_opt(8, 30, 0).unwrap())
        );
        assert_eq!(to_date(&Value::from(86_400_000)), Some(ymd(1970, 1, 2)));
        assert_eq!(to_date(&Value::from("20 May 1995")), None);
        assert_eq!(to_date(&Value::from(true)), None);
    }

    #[test]
    fn test_coercion_is_idempotent() {
        let date = Value::from(ymd(1998, 11, 30));
        assert_eq!(to_date(&date).map(Value::from), Some(date));

        let text = Value::from("gilang@example.com");
        assert_eq!(to_string(&text).map(Value::from), Some(text));

        assert_eq!(to_number(&Value::from(5000)), Some(5000.0));
        assert_eq!(to_boolean(&Value::from(true)), Some(true));
    }
}
