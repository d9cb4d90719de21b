use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime};
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

/// Path used for violations that concern the whole input rather than a field.
pub const ROOT_PATH: &str = "$root";

/// Why a single field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViolationKind {
    #[error("is required")]
    Missing,

    #[error("must be {expected}, found {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("must not be empty")]
    Empty,

    #[error("must be an integer")]
    NotInteger,

    #[error("does not fit in a 32-bit integer")]
    OutOfRange,

    #[error("must be at least {min}")]
    TooSmall { min: i64 },

    #[error("must be at most {max}")]
    TooLarge { max: i64 },

    #[error("must be one of {}", .allowed.join(", "))]
    NotOneOf { allowed: &'static [&'static str] },

    #[error("must be an ISO-8601 date-time")]
    InvalidTimestamp,

    #[error("is malformed: {0}")]
    Malformed(String),
}

impl ViolationKind {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::Missing => "missing",
            ViolationKind::WrongType { .. } => "wrong_type",
            ViolationKind::Empty => "empty",
            ViolationKind::NotInteger => "not_integer",
            ViolationKind::OutOfRange => "out_of_range",
            ViolationKind::TooSmall { .. } => "too_small",
            ViolationKind::TooLarge { .. } => "too_large",
            ViolationKind::NotOneOf { .. } => "not_one_of",
            ViolationKind::InvalidTimestamp => "invalid_timestamp",
            ViolationKind::Malformed(_) => "malformed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{path} {kind}")]
pub struct FieldViolation {
    pub path: String,
    pub kind: ViolationKind,
}

impl FieldViolation {
    pub fn new(path: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

impl Serialize for FieldViolation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("FieldViolation", 3)?;
        state.serialize_field("path", &self.path)?;
        state.serialize_field("code", self.kind.code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Every field-level violation found in one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(transparent)]
#[error("validation failed: {}", join_violations(.violations))]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    pub fn single(path: impl Into<String>, kind: ViolationKind) -> Self {
        Self::new(vec![FieldViolation::new(path, kind)])
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// First violation reported for `path`.
    pub fn field(&self, path: &str) -> Option<&FieldViolation> {
        self.violations.iter().find(|v| v.path == path)
    }

    pub fn contains_field(&self, path: &str) -> bool {
        self.field(path).is_some()
    }
}

/// A shape that can be built from untrusted JSON.
pub trait Validate: Sized {
    /// Entity name used in log events.
    const ENTITY: &'static str;

    /// Pure check without logging.
    fn check(input: &Value) -> Result<Self, ValidationErrors>;

    fn validate(input: &Value) -> Result<Self, ValidationErrors> {
        Self::check(input).inspect_err(|errors| {
            debug!(
                entity = Self::ENTITY,
                violations = errors.len(),
                "rejected input: {}",
                errors
            );
        })
    }

    fn validate_json(input: &str) -> Result<Self, ValidationErrors> {
        let value: Value = serde_json::from_str(input).map_err(|e| {
            debug!(entity = Self::ENTITY, "rejected unparseable input: {}", e);
            ValidationErrors::single(ROOT_PATH, ViolationKind::Malformed(e.to_string()))
        })?;
        Self::validate(&value)
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub(crate) fn expect_string(value: &Value) -> Result<&str, ViolationKind> {
    value.as_str().ok_or(ViolationKind::WrongType {
        expected: "a string",
        found: json_kind(value),
    })
}

pub(crate) fn expect_bool(value: &Value) -> Result<bool, ViolationKind> {
    value.as_bool().ok_or(ViolationKind::WrongType {
        expected: "a boolean",
        found: json_kind(value),
    })
}

pub(crate) fn expect_integer(value: &Value) -> Result<i64, ViolationKind> {
    match value {
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Ok(i),
            (None, _) if n.is_u64() => Err(ViolationKind::OutOfRange),
            // JSON has one number type, so `2.0` and `1e2` are integers too.
            (None, Some(f)) if f.fract() == 0.0 => {
                if f >= i64::MIN as f64 && f < i64::MAX as f64 {
                    Ok(f as i64)
                } else {
                    Err(ViolationKind::OutOfRange)
                }
            }
            (None, _) => Err(ViolationKind::NotInteger),
        },
        other => Err(ViolationKind::WrongType {
            expected: "an integer",
            found: json_kind(other),
        }),
    }
}

pub(crate) fn expect_i32(value: &Value) -> Result<i32, ViolationKind> {
    let i = expect_integer(value)?;
    i32::try_from(i).map_err(|_| ViolationKind::OutOfRange)
}

pub(crate) fn expect_timestamp(value: &Value) -> Result<NaiveDateTime, ViolationKind> {
    let s = expect_string(value)?;
    parse_timestamp(s).ok_or(ViolationKind::InvalidTimestamp)
}

/// Parses an RFC 3339 date-time (converted to UTC) or a naive ISO-8601
/// date-time with a `T` or space separator.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_utc())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").ok())
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").ok())
}

/// Reads fields out of a JSON object one at a time, recording a violation
/// for each field that fails and returning `None` for it.
pub(crate) struct FieldReader<'a> {
    fields: &'a Map<String, Value>,
    violations: Vec<FieldViolation>,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn object(input: &'a Value) -> Result<Self, ValidationErrors> {
        match input {
            Value::Object(fields) => Ok(Self {
                fields,
                violations: Vec::new(),
            }),
            other => Err(ValidationErrors::single(
                ROOT_PATH,
                ViolationKind::WrongType {
                    expected: "an object",
                    found: json_kind(other),
                },
            )),
        }
    }

    fn reject(&mut self, field: &str, kind: ViolationKind) {
        self.violations.push(FieldViolation::new(field, kind));
    }

    fn lookup(&self, field: &str) -> Option<&'a Value> {
        let fields: &'a Map<String, Value> = self.fields;
        fields.get(field)
    }

    fn required(&mut self, field: &str) -> Option<&'a Value> {
        let value = self.lookup(field);
        if value.is_none() {
            self.reject(field, ViolationKind::Missing);
        }
        value
    }

    pub(crate) fn non_empty_string(&mut self, field: &str) -> Option<String> {
        let value = self.required(field)?;
        match expect_string(value) {
            Ok("") => {
                self.reject(field, ViolationKind::Empty);
                None
            }
            Ok(s) => Some(s.to_string()),
            Err(kind) => {
                self.reject(field, kind);
                None
            }
        }
    }

    /// `Ok(None)` when absent; a present value must be a string.
    pub(crate) fn optional_string(&mut self, field: &str) -> Result<Option<String>, ()> {
        let Some(value) = self.lookup(field) else {
            return Ok(None);
        };
        match expect_string(value) {
            Ok(s) => Ok(Some(s.to_string())),
            Err(kind) => {
                self.reject(field, kind);
                Err(())
            }
        }
    }

    pub(crate) fn integer_between(&mut self, field: &str, min: i64, max: i64) -> Option<i64> {
        let value = self.required(field)?;
        match expect_integer(value) {
            Ok(i) if i < min => {
                self.reject(field, ViolationKind::TooSmall { min });
                None
            }
            Ok(i) if i > max => {
                self.reject(field, ViolationKind::TooLarge { max });
                None
            }
            Ok(i) => Some(i),
            // Integers beyond i64 are still a range problem for a bounded field.
            Err(ViolationKind::OutOfRange) => {
                let negative = value.as_f64().is_some_and(|f| f < 0.0);
                let kind = if negative {
                    ViolationKind::TooSmall { min }
                } else {
                    ViolationKind::TooLarge { max }
                };
                self.reject(field, kind);
                None
            }
            Err(kind) => {
                self.reject(field, kind);
                None
            }
        }
    }

    pub(crate) fn one_of<T>(&mut self, field: &str) -> Option<T>
    where
        T: FromStr<Err = ViolationKind>,
    {
        let value = self.required(field)?;
        match expect_string(value).and_then(T::from_str) {
            Ok(parsed) => Some(parsed),
            Err(kind) => {
                self.reject(field, kind);
                None
            }
        }
    }

    pub(crate) fn into_errors(self) -> ValidationErrors {
        ValidationErrors::new(self.violations)
    }
}
