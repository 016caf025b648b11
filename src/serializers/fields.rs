//! Field readers shared by the serializers.
//!
//! A [`Payload`] walks a JSON object field by field, collecting every problem
//! into one [`ValidationErrors`] so a client sees all of them at once.

use std::num::IntErrorKind;

use serde_json::{Map, Value};

use crate::error::{CinemaError, CinemaResult, ValidationErrors};

pub const MAX_CHAR_LENGTH: usize = 255;

const REQUIRED: &str = "This field is required.";
const NOT_NULL: &str = "This field may not be null.";
const NOT_BLANK: &str = "This field may not be blank.";
const NOT_A_STRING: &str = "Not a valid string.";
const NOT_AN_INTEGER: &str = "A valid integer is required.";

/// How a JSON value is named in error messages.
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Integers arrive as JSON numbers or numeric strings; `"120"`, `120` and
/// `120.0` all read as 120. Values past the `i64` range saturate so the range
/// checks report them.
fn parse_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0)
                .map(|f| f.clamp(i64::MIN as f64, i64::MAX as f64) as i64)
        }),
        Value::String(s) => {
            let s = s.trim();
            let s = match s.split_once('.') {
                Some((whole, zeros)) if !zeros.is_empty() && zeros.bytes().all(|b| b == b'0') => {
                    whole
                }
                _ => s,
            };
            match s.parse::<i64>() {
                Ok(number) => Some(number),
                Err(e) => match e.kind() {
                    IntErrorKind::PosOverflow => Some(i64::MAX),
                    IntErrorKind::NegOverflow => Some(i64::MIN),
                    _ => None,
                },
            }
        }
        _ => None,
    }
}

pub struct Payload<'a> {
    data: &'a Map<String, Value>,
    partial: bool,
    errors: ValidationErrors,
}

impl<'a> Payload<'a> {
    /// `partial` relaxes required-field checks (PATCH).
    pub fn new(data: &'a Value, partial: bool) -> CinemaResult<Self> {
        match data {
            Value::Object(data) => Ok(Self {
                data,
                partial,
                errors: ValidationErrors::new(),
            }),
            other => {
                let mut errors = ValidationErrors::new();
                errors.add(
                    "non_field_errors",
                    format!(
                        "Invalid data. Expected a dictionary, but got {}.",
                        type_name(other)
                    ),
                );
                Err(CinemaError::Validation(errors))
            }
        }
    }

    /// Look a field up, reporting it as required or null when it is.
    fn present(&mut self, name: &str, required: bool) -> Option<&'a Value> {
        match self.data.get(name) {
            None => {
                if required && !self.partial {
                    self.errors.add(name, REQUIRED);
                }
                None
            }
            Some(Value::Null) => {
                self.errors.add(name, NOT_NULL);
                None
            }
            Some(value) => Some(value),
        }
    }

    /// A required, non-blank string, trimmed, at most `max_length` chars.
    pub fn char_field(&mut self, name: &str, max_length: Option<usize>) -> Option<String> {
        let value = self.present(name, true)?;
        let text = match value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => {
                self.errors.add(name, NOT_A_STRING);
                return None;
            }
        };

        if text.is_empty() {
            self.errors.add(name, NOT_BLANK);
            return None;
        }
        if let Some(max) = max_length
            && text.chars().count() > max
        {
            self.errors.add(
                name,
                format!("Ensure this field has no more than {max} characters."),
            );
            return None;
        }
        Some(text)
    }

    /// A required integer in `0..=i32::MAX`.
    pub fn non_negative_integer_field(&mut self, name: &str) -> Option<i32> {
        let value = self.present(name, true)?;
        let Some(number) = parse_integer(value) else {
            self.errors.add(name, NOT_AN_INTEGER);
            return None;
        };

        if number < 0 {
            self.errors
                .add(name, "Ensure this value is greater than or equal to 0.");
            return None;
        }
        match i32::try_from(number) {
            Ok(number) => Some(number),
            Err(_) => {
                self.errors.add(
                    name,
                    format!("Ensure this value is less than or equal to {}.", i32::MAX),
                );
                None
            }
        }
    }

    /// An optional list of primary keys. `None` means the key was absent.
    pub fn pk_list_field(&mut self, name: &str) -> Option<Vec<i64>> {
        let value = self.present(name, false)?;
        let Value::Array(items) = value else {
            self.errors.add(
                name,
                format!(
                    "Expected a list of items but got type \"{}\".",
                    type_name(value)
                ),
            );
            return None;
        };

        let mut ids = Vec::with_capacity(items.len());
        let mut valid = true;
        for item in items {
            match item {
                Value::Number(_) | Value::String(_) => match parse_integer(item) {
                    Some(id) => ids.push(id),
                    None => {
                        self.errors.add(
                            name,
                            format!(
                                "Incorrect type. Expected pk value, received {}.",
                                type_name(item)
                            ),
                        );
                        valid = false;
                    }
                },
                other => {
                    self.errors.add(
                        name,
                        format!(
                            "Incorrect type. Expected pk value, received {}.",
                            type_name(other)
                        ),
                    );
                    valid = false;
                }
            }
        }
        valid.then_some(ids)
    }

    pub fn finish(self) -> CinemaResult<()> {
        self.errors.into_result()
    }
}

/// Unwrap a field a full (non-partial) read has already vouched for.
pub fn required<T>(value: Option<T>, name: &str) -> CinemaResult<T> {
    value.ok_or_else(|| {
        let mut errors = ValidationErrors::new();
        errors.add(name, REQUIRED);
        CinemaError::Validation(errors)
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn errors_of(result: CinemaResult<()>) -> ValidationErrors {
        match result {
            Err(CinemaError::Validation(errors)) => errors,
            other => panic!("expected validation errors, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_required_field() {
        let data = json!({});
        let mut payload = Payload::new(&data, false).unwrap();
        assert_eq!(payload.char_field("name", Some(MAX_CHAR_LENGTH)), None);

        let errors = errors_of(payload.finish());
        assert_eq!(errors.field("name").unwrap(), [REQUIRED.to_string()]);
    }

    #[test]
    fn test_partial_payload_skips_required() {
        let data = json!({});
        let mut payload = Payload::new(&data, true).unwrap();
        assert_eq!(payload.char_field("name", Some(MAX_CHAR_LENGTH)), None);
        assert_eq!(payload.non_negative_integer_field("rows"), None);
        assert!(payload.finish().is_ok());
    }

    #[test]
    fn test_char_field_rules() {
        let long = "x".repeat(MAX_CHAR_LENGTH + 1);
        let data = json!({
            "trimmed": "  Drama ",
            "blank": "   ",
            "long": long,
            "list": ["a"],
            "null": null,
            "number": 42,
        });
        let mut payload = Payload::new(&data, false).unwrap();

        assert_eq!(
            payload.char_field("trimmed", Some(MAX_CHAR_LENGTH)),
            Some("Drama".to_string())
        );
        assert_eq!(payload.char_field("number", None), Some("42".to_string()));
        assert_eq!(payload.char_field("blank", None), None);
        assert_eq!(payload.char_field("long", Some(MAX_CHAR_LENGTH)), None);
        assert_eq!(payload.char_field("list", None), None);
        assert_eq!(payload.char_field("null", None), None);

        let errors = errors_of(payload.finish());
        assert_eq!(errors.field("blank").unwrap(), [NOT_BLANK.to_string()]);
        assert_eq!(
            errors.field("long").unwrap(),
            ["Ensure this field has no more than 255 characters.".to_string()]
        );
        assert_eq!(errors.field("list").unwrap(), [NOT_A_STRING.to_string()]);
        assert_eq!(errors.field("null").unwrap(), [NOT_NULL.to_string()]);
        assert!(errors.field("trimmed").is_none());
    }

    #[test]
    fn test_max_length_counts_characters() {
        let data = json!({ "title": "é".repeat(MAX_CHAR_LENGTH) });
        let mut payload = Payload::new(&data, false).unwrap();
        assert!(payload.char_field("title", Some(MAX_CHAR_LENGTH)).is_some());
        assert!(payload.finish().is_ok());
    }

    #[test]
    fn test_integer_field_rules() {
        let data = json!({
            "plain": 120,
            "string": " 95 ",
            "float": 90.0,
            "decimal_string": "100.00",
            "fraction": 1.5,
            "word": "long",
            "negative": -1,
            "huge": 3_000_000_000_i64,
            "flag": true,
        });
        let mut payload = Payload::new(&data, false).unwrap();

        assert_eq!(payload.non_negative_integer_field("plain"), Some(120));
        assert_eq!(payload.non_negative_integer_field("string"), Some(95));
        assert_eq!(payload.non_negative_integer_field("float"), Some(90));
        assert_eq!(payload.non_negative_integer_field("decimal_string"), Some(100));
        assert_eq!(payload.non_negative_integer_field("fraction"), None);
        assert_eq!(payload.non_negative_integer_field("word"), None);
        assert_eq!(payload.non_negative_integer_field("negative"), None);
        assert_eq!(payload.non_negative_integer_field("huge"), None);
        assert_eq!(payload.non_negative_integer_field("flag"), None);

        let errors = errors_of(payload.finish());
        assert_eq!(errors.field("word").unwrap(), [NOT_AN_INTEGER.to_string()]);
        assert_eq!(errors.field("flag").unwrap(), [NOT_AN_INTEGER.to_string()]);
        assert_eq!(
            errors.field("negative").unwrap(),
            ["Ensure this value is greater than or equal to 0.".to_string()]
        );
        assert_eq!(
            errors.field("huge").unwrap(),
            ["Ensure this value is less than or equal to 2147483647.".to_string()]
        );
    }

    #[test]
    fn test_integer_beyond_i64_reports_range() {
        let data = json!({
            "float": 1e20,
            "digits": "99999999999999999999",
            "negative": -1e20,
        });
        let mut payload = Payload::new(&data, false).unwrap();

        assert_eq!(payload.non_negative_integer_field("float"), None);
        assert_eq!(payload.non_negative_integer_field("digits"), None);
        assert_eq!(payload.non_negative_integer_field("negative"), None);

        let errors = errors_of(payload.finish());
        let too_big = ["Ensure this value is less than or equal to 2147483647.".to_string()];
        assert_eq!(errors.field("float").unwrap(), too_big);
        assert_eq!(errors.field("digits").unwrap(), too_big);
        assert_eq!(
            errors.field("negative").unwrap(),
            ["Ensure this value is greater than or equal to 0.".to_string()]
        );
    }

    #[test]
    fn test_pk_list_field() {
        let data = json!({
            "actors": [1, "2", 3],
            "genres": [],
            "bad_items": [1, "x", {"id": 2}],
            "not_list": 4,
        });
        let mut payload = Payload::new(&data, false).unwrap();

        assert_eq!(payload.pk_list_field("actors"), Some(vec![1, 2, 3]));
        assert_eq!(payload.pk_list_field("genres"), Some(vec![]));
        assert_eq!(payload.pk_list_field("absent"), None);
        assert_eq!(payload.pk_list_field("bad_items"), None);
        assert_eq!(payload.pk_list_field("not_list"), None);

        let errors = errors_of(payload.finish());
        assert!(errors.field("absent").is_none());
        assert_eq!(
            errors.field("bad_items").unwrap(),
            [
                "Incorrect type. Expected pk value, received string.".to_string(),
                "Incorrect type. Expected pk value, received object.".to_string(),
            ]
        );
        assert_eq!(
            errors.field("not_list").unwrap(),
            ["Expected a list of items but got type \"number\".".to_string()]
        );
    }

    #[test]
    fn test_non_object_payload() {
        let data = json!([1, 2]);
        let Err(CinemaError::Validation(errors)) = Payload::new(&data, false) else {
            panic!("expected a validation error");
        };
        assert_eq!(
            errors.field("non_field_errors").unwrap(),
            ["Invalid data. Expected a dictionary, but got array.".to_string()]
        );
    }

    #[test]
    fn test_required_helper() {
        assert_eq!(required(Some(3), "rows").unwrap(), 3);
        assert!(matches!(
            required::<i32>(None, "rows"),
            Err(CinemaError::Validation(_))
        ));
    }
}
