//! Field reader that collects issues instead of stopping at the first one.

use serde_json::{Map, Value};
use uuid::Uuid;

use super::{Issue, ValidationError};
use crate::types::{AmountError, ClosedEnum, Nullable, PositiveAmount};

/// Outcome of a single field rule: the value, or the message to report.
pub(super) type Rule<T> = Result<T, String>;

/// Reads fields out of a JSON object and records one issue per failed field.
pub(super) struct Fields<'a> {
    map: &'a Map<String, Value>,
    issues: Vec<Issue>,
}

impl<'a> Fields<'a> {
    /// Start reading `input`, which must be a JSON object.
    pub(super) fn of(input: &'a Value) -> Result<Self, ValidationError> {
        match input {
            Value::Object(map) => Ok(Self {
                map,
                issues: Vec::new(),
            }),
            other => Err(ValidationError::new(vec![Issue::new(
                "",
                format!("Expected object, received {}", kind(other)),
            )])),
        }
    }

    /// Run `rule` against `key`, recording its message on failure.
    pub(super) fn check<T>(
        &mut self,
        key: &'static str,
        rule: impl FnOnce(Slot<'a>) -> Rule<T>,
    ) -> Option<T> {
        let slot = match self.map.get(key) {
            None => Slot::Absent,
            Some(Value::Null) => Slot::Null,
            Some(value) => Slot::Value(value),
        };

        match rule(slot) {
            Ok(value) => Some(value),
            Err(message) => {
                self.issues.push(Issue::new(key, message));
                None
            }
        }
    }

    /// Hand back `value` if every checked field passed.
    pub(super) fn finish<T>(self, value: T) -> Result<T, ValidationError> {
        if self.issues.is_empty() {
            Ok(value)
        } else {
            Err(self.into_error())
        }
    }

    pub(super) fn into_error(self) -> ValidationError {
        ValidationError::new(self.issues)
    }
}

/// Raw state of one key in the input object.
#[derive(Debug, Clone, Copy)]
pub(super) enum Slot<'a> {
    Absent,
    Null,
    Value(&'a Value),
}

impl<'a> Slot<'a> {
    /// Run `rule` only when the key is present; absent yields `None`.
    pub(super) fn if_present<T>(self, rule: impl FnOnce(Self) -> Rule<T>) -> Rule<Option<T>> {
        match self {
            Self::Absent => Ok(None),
            present => rule(present).map(Some),
        }
    }

    /// Keep the absent/null distinction and run `rule` on a real value.
    pub(super) fn nullable<T>(self, rule: impl FnOnce(Self) -> Rule<T>) -> Rule<Nullable<T>> {
        match self {
            Self::Absent => Ok(Nullable::Absent),
            Self::Null => Ok(Nullable::Null),
            present @ Self::Value(_) => rule(present).map(Nullable::Value),
        }
    }

    pub(super) fn required_str(self) -> Rule<&'a str> {
        match self {
            Self::Absent => Err(REQUIRED.to_owned()),
            Self::Null => Err(expected("string", &Value::Null)),
            Self::Value(Value::String(s)) => Ok(s.as_str()),
            Self::Value(other) => Err(expected("string", other)),
        }
    }

    pub(super) fn optional_str(self) -> Rule<Option<&'a str>> {
        self.if_present(Self::required_str)
    }

    /// A string with at least `min` characters.
    pub(super) fn min_chars(self, min: usize, message: &str) -> Rule<String> {
        let s = self.required_str()?;
        if s.chars().count() < min {
            return Err(message.to_owned());
        }
        Ok(s.to_owned())
    }

    /// A canonical hyphenated UUID; `message` replaces format failures.
    pub(super) fn uuid(self, message: &str) -> Rule<Uuid> {
        let s = self.required_str()?;
        parse_uuid(s).ok_or_else(|| message.to_owned())
    }

    pub(super) fn required_enum<E: ClosedEnum>(self) -> Rule<E> {
        let s = match self {
            Self::Absent => return Err(REQUIRED.to_owned()),
            Self::Value(Value::String(s)) => s,
            Self::Null => return Err(expected(&enum_choices::<E>(), &Value::Null)),
            Self::Value(other) => return Err(expected(&enum_choices::<E>(), other)),
        };

        E::from_code(s).ok_or_else(|| {
            format!(
                "Invalid enum value. Expected {}, received '{s}'",
                enum_choices::<E>()
            )
        })
    }

    pub(super) fn enum_or<E: ClosedEnum>(self, default: E) -> Rule<E> {
        Ok(self.if_present(Self::required_enum)?.unwrap_or(default))
    }

    pub(super) fn required_bool(self) -> Rule<bool> {
        match self {
            Self::Absent => Err(REQUIRED.to_owned()),
            Self::Value(Value::Bool(b)) => Ok(*b),
            Self::Null => Err(expected("boolean", &Value::Null)),
            Self::Value(other) => Err(expected("boolean", other)),
        }
    }

    pub(super) fn bool_or(self, default: bool) -> Rule<bool> {
        Ok(self.if_present(Self::required_bool)?.unwrap_or(default))
    }

    /// Coerce a number or numeric string into a positive amount.
    ///
    /// Positive values a decimal cannot hold report `out_of_range`; every
    /// other failure, including absence, reports `message`.
    pub(super) fn positive_amount(
        self,
        message: &str,
        out_of_range: &str,
    ) -> Rule<PositiveAmount> {
        let coerced = match self {
            Self::Value(Value::Number(n)) => PositiveAmount::coerce_number(n),
            Self::Value(Value::String(s)) => PositiveAmount::coerce_str(s),
            Self::Absent | Self::Null | Self::Value(_) => return Err(message.to_owned()),
        };
        coerced.map_err(|e| match e {
            AmountError::OutOfRange(_) => out_of_range.to_owned(),
            AmountError::NotANumber(_) | AmountError::NotPositive => message.to_owned(),
        })
    }
}

const REQUIRED: &str = "Required";

fn expected(what: &str, received: &Value) -> String {
    format!("Expected {what}, received {}", kind(received))
}

fn enum_choices<E: ClosedEnum>() -> String {
    E::ALL
        .iter()
        .map(|v| format!("'{}'", v.as_str()))
        .collect::<Vec<_>>()
        .join(" | ")
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Accept only the 36-character 8-4-4-4-12 form, any hex case.
fn parse_uuid(s: &str) -> Option<Uuid> {
    if s.len() != 36 {
        return None;
    }
    Uuid::try_parse(s).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::LocationType;

    #[test]
    fn test_non_object_input() {
        let err = Fields::of(&json!([1, 2])).err().unwrap();
        assert_eq!(err.issues(), &[Issue::new("", "Expected object, received array")]);
    }

    #[test]
    fn test_check_records_issue_per_field() {
        let input = json!({ "a": 1, "b": "ok" });
        let mut fields = Fields::of(&input).unwrap();
        assert!(fields.check("a", Slot::required_str).is_none());
        assert_eq!(fields.check("b", Slot::required_str), Some("ok"));
        assert!(fields.check("c", Slot::required_str).is_none());

        let err = fields.into_error();
        assert_eq!(
            err.issues(),
            &[
                Issue::new("a", "Expected string, received number"),
                Issue::new("c", "Required"),
            ]
        );
    }

    #[test]
    fn test_enum_messages() {
        let value = json!("TOWN");
        let err = Slot::Value(&value).required_enum::<LocationType>().unwrap_err();
        assert_eq!(
            err,
            "Invalid enum value. Expected 'REGION' | 'CITY' | 'AREA', received 'TOWN'"
        );

        let err = Slot::Null.required_enum::<LocationType>().unwrap_err();
        assert_eq!(err, "Expected 'REGION' | 'CITY' | 'AREA', received null");
    }

    #[test]
    fn test_enum_or_default_only_when_absent() {
        assert_eq!(Slot::Absent.enum_or(LocationType::Area), Ok(LocationType::Area));
        assert!(Slot::Null.enum_or(LocationType::Area).is_err());
    }

    #[test]
    fn test_parse_uuid_forms() {
        assert!(parse_uuid("67e55044-10b1-426f-9247-bb680e5fe0c8").is_some());
        assert!(parse_uuid("67E55044-10B1-426F-9247-BB680E5FE0C8").is_some());
        assert!(parse_uuid("67e5504410b1426f9247bb680e5fe0c8").is_none());
        assert!(parse_uuid("{67e55044-10b1-426f-9247-bb680e5fe0c8}").is_none());
        assert!(parse_uuid("67e55044-10b1-426f-9247-bb680e5fe0cz").is_none());
    }

    #[test]
    fn test_nullable_slot() {
        let value = json!("x");
        assert_eq!(Slot::Absent.nullable(Slot::required_str), Ok(Nullable::Absent));
        assert_eq!(Slot::Null.nullable(Slot::required_str), Ok(Nullable::Null));
        assert_eq!(
            Slot::Value(&value).nullable(Slot::required_str),
            Ok(Nullable::Value("x"))
        );
    }

    #[test]
    fn test_positive_amount_rejects_bool() {
        let value = json!(true);
        assert_eq!(
            Slot::Value(&value).positive_amount("bad", "huge").unwrap_err(),
            "bad"
        );
    }

    #[test]
    fn test_positive_amount_out_of_range_message() {
        let value = json!("1e30");
        assert_eq!(
            Slot::Value(&value).positive_amount("bad", "huge").unwrap_err(),
            "huge"
        );
    }
}
