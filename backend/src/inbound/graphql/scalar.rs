//! `DateTime` custom scalar.
//!
//! Parses RFC 3339 strings into an internal instant; literals and variable
//! values funnel through the same parse path, so both shapes are validated
//! identically. Serializes as canonical ISO-8601 with millisecond precision
//! and a `Z` suffix.

use async_graphql::{InputValueError, InputValueResult, Scalar, ScalarType, Value};
use chrono::{DateTime, SecondsFormat, Utc};

/// A valid date time value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeScalar(pub DateTime<Utc>);

#[Scalar(name = "DateTime")]
impl ScalarType for DateTimeScalar {
    fn parse(value: Value) -> InputValueResult<Self> {
        match &value {
            Value::String(raw) => DateTime::parse_from_rfc3339(raw)
                .map(|instant| Self(instant.with_timezone(&Utc)))
                .map_err(|error| {
                    InputValueError::custom(format!("invalid DateTime \"{raw}\": {error}"))
                }),
            _ => Err(InputValueError::expected_type(value)),
        }
    }

    fn to_value(&self) -> Value {
        Value::String(self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}
