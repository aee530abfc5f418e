//! Input parsing and field validators.
//!
//! Tool inputs derive [`validator::Validate`]; [`parse_input`] deserializes
//! the raw JSON and runs those checks, reducing any failure to a single
//! [`ValidationError`] that names the offending field and the violated
//! constraint. Nothing here touches the network.
//!
//! The `check_*` functions are plugged into `#[validate(custom(function = ...))]`
//! and `#[validate(schema(function = ...))]` attributes on the inputs.

use std::borrow::Cow;

use gads_types::ids::is_numeric_id;
use gads_types::CustomerId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("Invalid parameter `{field}`: {constraint}")]
pub struct ValidationError {
    pub field: String,
    pub constraint: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            constraint: constraint.into(),
        }
    }
}

/// Build a `validator` error whose code is the field it concerns.
///
/// Schema-level checks report under `__all__`; the code carries the field name.
pub fn fail(field: &'static str, message: impl Into<Cow<'static, str>>) -> validator::ValidationError {
    let mut err = validator::ValidationError::new(field);
    err.message = Some(message.into());
    err
}

fn describe(err: &validator::ValidationError) -> String {
    let value = err.params.get("value");
    let min = err.params.get("min");
    let max = err.params.get("max");
    let base = match (&err.message, &*err.code) {
        (Some(message), _) => message.to_string(),
        (None, "range") => match (min, max) {
            (Some(min), Some(max)) => format!("must be between {} and {}", min, max),
            (Some(min), None) => format!("must be at least {}", min),
            (None, Some(max)) => format!("must be at most {}", max),
            (None, None) => "is out of range".to_string(),
        },
        (None, "length") => match (min, max) {
            (Some(min), Some(max)) => format!("length must be between {} and {}", min, max),
            (Some(min), None) => format!("length must be at least {}", min),
            (None, Some(max)) => format!("length must be at most {}", max),
            (None, None) => "has an invalid length".to_string(),
        },
        (None, code) => format!("failed check `{}`", code),
    };
    match value {
        Some(v @ Value::Number(_)) => format!("{} (got {})", base, v),
        Some(Value::Array(items)) => format!("{} (got {} items)", base, items.len()),
        Some(Value::String(s)) if &*err.code == "length" => {
            format!("{} (got {} characters)", base, s.chars().count())
        }
        _ => base,
    }
}

impl From<ValidationErrors> for ValidationError {
    fn from(errors: ValidationErrors) -> Self {
        let mut entries: Vec<(String, &ValidationErrorsKind)> = errors
            .errors()
            .iter()
            .map(|(field, kind)| (field.to_string(), kind))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        for (field, kind) in entries {
            if let ValidationErrorsKind::Field(list) = kind {
                if let Some(first) = list.first() {
                    let field = if field == "__all__" {
                        first.code.to_string()
                    } else {
                        field
                    };
                    return ValidationError::new(field, describe(first));
                }
            }
        }
        ValidationError::new("input", errors.to_string())
    }
}

/// Best guess at the field a serde error is about.
fn field_of_serde_error(message: &str, input: &Value) -> String {
    for marker in ["missing field `", "unknown field `"] {
        if let Some(rest) = message.split(marker).nth(1) {
            if let Some(name) = rest.split('`').next() {
                return name.to_string();
            }
        }
    }
    if let Value::Object(map) = input {
        for (key, value) in map {
            let needle = match value {
                Value::String(s) => format!("`{}`", s),
                Value::Number(n) => format!("`{}`", n),
                Value::Bool(b) => format!("`{}`", b),
                _ => continue,
            };
            if message.contains(&needle) || message.contains(&format!("\"{}\"", needle.trim_matches('`'))) {
                return key.clone();
            }
        }
    }
    "input".to_string()
}

/// Deserialize a tool input and run its validation rules.
pub fn parse_input<T: DeserializeOwned + Validate>(input: Value) -> Result<T, ValidationError> {
    let parsed: T = serde_json::from_value(input.clone()).map_err(|e| {
        let message = e.to_string();
        ValidationError::new(field_of_serde_error(&message, &input), message)
    })?;
    parsed.validate()?;
    Ok(parsed)
}

/// Parse a customer id that already passed [`check_customer_id`].
pub fn customer_id(raw: &str) -> Result<CustomerId, ValidationError> {
    CustomerId::parse(raw).map_err(|e| ValidationError::new("customer_id", e.to_string()))
}

pub fn check_customer_id(value: &str) -> Result<(), validator::ValidationError> {
    CustomerId::parse(value)
        .map(|_| ())
        .map_err(|e| fail("customer_id", e.to_string()))
}

/// Digits only. Surrounding whitespace is rejected rather than trimmed,
/// since handlers put the value into resource names as given.
pub fn check_numeric_id(value: &str) -> Result<(), validator::ValidationError> {
    if is_numeric_id(value) {
        Ok(())
    } else {
        Err(fail("id", format!("must be a numeric ID (got '{}')", value)))
    }
}

pub fn check_numeric_ids(values: &[String]) -> Result<(), validator::ValidationError> {
    match values.iter().find(|v| !is_numeric_id(v)) {
        Some(bad) => Err(fail("ids", format!("every entry must be a numeric ID (got '{}')", bad))),
        None => Ok(()),
    }
}

/// `YYYYMMDD` and a real calendar date.
pub fn check_date(value: &str) -> Result<(), validator::ValidationError> {
    chrono::NaiveDate::parse_from_str(value, "%Y%m%d")
        .map(|_| ())
        .map_err(|_| fail("date", format!("must be a date in YYYYMMDD format (got '{}')", value)))
}

pub fn check_http_urls(values: &[String]) -> Result<(), validator::ValidationError> {
    match values
        .iter()
        .find(|u| !(u.starts_with("http://") || u.starts_with("https://")))
    {
        Some(bad) => Err(fail("urls", format!("every URL must start with http:// or https:// (got '{}')", bad))),
        None => Ok(()),
    }
}

/// Every entry non-empty and at most `max` characters.
pub fn check_each_len(
    values: &[String],
    max: usize,
    what: &'static str,
) -> Result<(), validator::ValidationError> {
    for (i, v) in values.iter().enumerate() {
        let len = v.trim().chars().count();
        if len == 0 {
            return Err(fail(what, format!("entry {} must not be empty", i + 1)));
        }
        if len > max {
            return Err(fail(
                what,
                format!("entry {} must be at most {} characters (got {})", i + 1, max, len),
            ));
        }
    }
    Ok(())
}

/// Count check for list fields, reported the same way as `#[validate(length)]`.
pub fn check_count(
    field: &'static str,
    len: usize,
    min: usize,
    max: usize,
) -> Result<(), validator::ValidationError> {
    if len < min || len > max {
        return Err(fail(
            field,
            format!("must contain between {} and {} items (got {})", min, max, len),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn check_titles(values: &[String]) -> Result<(), validator::ValidationError> {
        check_each_len(values, 30, "titles")
    }

    fn check_window(input: &Sample) -> Result<(), validator::ValidationError> {
        if input.end < input.start {
            return Err(fail("end", "must not be before `start`"));
        }
        Ok(())
    }

    #[derive(Debug, Deserialize, Validate)]
    #[validate(schema(function = "check_window"))]
    struct Sample {
        #[validate(custom(function = "check_customer_id"))]
        customer_id: String,
        #[serde(default = "default_limit")]
        #[validate(range(min = 1, max = 100))]
        limit: i64,
        #[serde(default)]
        #[validate(custom(function = "check_titles"))]
        titles: Vec<String>,
        #[serde(default)]
        start: i64,
        #[serde(default)]
        end: i64,
    }

    fn default_limit() -> i64 {
        20
    }

    #[test]
    fn test_limit_zero_names_field() {
        let err = parse_input::<Sample>(json!({"customer_id": "1234567890", "limit": 0})).unwrap_err();
        assert_eq!(err.field, "limit");
        assert_eq!(err.constraint, "must be between 1 and 100 (got 0)");
        assert_eq!(
            err.to_string(),
            "Invalid parameter `limit`: must be between 1 and 100 (got 0)"
        );
    }

    #[test]
    fn test_limit_above_max() {
        let err = parse_input::<Sample>(json!({"customer_id": "1234567890", "limit": 101})).unwrap_err();
        assert_eq!(err.field, "limit");
        assert!(err.constraint.contains("got 101"));
    }

    #[test]
    fn test_nine_digit_customer_id() {
        let err = parse_input::<Sample>(json!({"customer_id": "123456789"})).unwrap_err();
        assert_eq!(err.field, "customer_id");
        assert!(err.constraint.contains("10 digits"));
    }

    #[test]
    fn test_missing_field_is_named() {
        let err = parse_input::<Sample>(json!({"limit": 5})).unwrap_err();
        assert_eq!(err.field, "customer_id");
    }

    #[test]
    fn test_type_error_is_attributed() {
        let err = parse_input::<Sample>(json!({"customer_id": "1234567890", "limit": "ten"})).unwrap_err();
        assert_eq!(err.field, "limit");
    }

    #[test]
    fn test_each_len_and_schema() {
        let err = parse_input::<Sample>(json!({
            "customer_id": "1234567890",
            "titles": ["ok", "x".repeat(31)]
        }))
        .unwrap_err();
        assert_eq!(err.field, "titles");
        assert!(err.constraint.contains("entry 2"));

        let err = parse_input::<Sample>(json!({
            "customer_id": "1234567890", "start": 5, "end": 1
        }))
        .unwrap_err();
        assert_eq!(err.field, "end");
    }

    #[test]
    fn test_valid_input_parses() {
        let sample = parse_input::<Sample>(json!({"customer_id": "123-456-7890"})).unwrap();
        assert_eq!(sample.limit, 20);
        assert_eq!(customer_id(&sample.customer_id).unwrap().as_str(), "1234567890");
    }

    #[test]
    fn test_numeric_ids_reject_padding() {
        assert!(check_numeric_id("42").is_ok());
        assert!(check_numeric_id(" 42 ").is_err());
        assert!(check_numeric_id("42\n").is_err());
        assert!(check_numeric_ids(&["1".into(), "2".into()]).is_ok());
        assert!(check_numeric_ids(&["1".into(), " 2".into()]).is_err());
    }

    #[test]
    fn test_check_date() {
        assert!(check_date("20260131").is_ok());
        assert!(check_date("20260231").is_err());
        assert!(check_date("2026-01-31").is_err());
    }
}
