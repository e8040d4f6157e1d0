//! Declarative request validation.
//!
//! A [`Schema`] is a list of [`FieldRule`]s. [`validate`] walks the rules in
//! declaration order against a JSON object, coerces integer fields, and
//! returns the sanitized object or the first violation it meets.
//!
//! Validation semantics:
//! - every required field is present
//! - no undeclared field is present
//! - text fields are strings, integer fields are integral numbers
//!   (decimal strings are accepted and converted)
//! - every constraint attached to a field holds
//!
//! The sanitized object contains only declared fields, with integer fields
//! carried as JSON integers. [`validate_as`] decodes it into a typed request.

pub mod schemas;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// The first constraint violation found in a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Offending field, `None` when the whole input is rejected.
    pub field: Option<String>,
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }

    fn for_field(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.to_string()),
            message: message.into(),
        }
    }

    fn required(field: &str) -> Self {
        Self::for_field(field, format!("\"{}\" is required", field))
    }

    fn not_allowed(field: &str) -> Self {
        Self::for_field(field, format!("\"{}\" is not allowed", field))
    }
}

/// Result type for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Value type a field must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// UTF-8 string
    Text,
    /// 64-bit signed integer
    Integer,
}

/// A single check applied after the kind check.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Text must match the whole pattern.
    Pattern(Regex),
    /// Text must not be empty.
    NonEmpty,
    /// Integer must be greater than zero.
    Positive,
    /// Integer must be less than or equal to the bound.
    Max(i64),
}

/// Declaration of one field in a schema.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub constraints: Vec<Constraint>,
}

impl FieldRule {
    /// An optional text field.
    pub fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            required: false,
            constraints: Vec::new(),
        }
    }

    /// An optional integer field.
    pub fn integer(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Integer,
            required: false,
            constraints: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn non_empty(self) -> Self {
        self.with(Constraint::NonEmpty)
    }

    pub fn pattern(self, regex: &Regex) -> Self {
        self.with(Constraint::Pattern(regex.clone()))
    }

    pub fn positive(self) -> Self {
        self.with(Constraint::Positive)
    }

    pub fn max(self, bound: i64) -> Self {
        self.with(Constraint::Max(bound))
    }

    fn with(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Check a present value and return its sanitized form.
    fn check(&self, value: &Value) -> ValidationResult<Value> {
        match self.kind {
            FieldKind::Text => {
                let text = value.as_str().ok_or_else(|| {
                    ValidationError::for_field(self.name, format!("\"{}\" must be a string", self.name))
                })?;
                for constraint in &self.constraints {
                    self.check_text(constraint, text)?;
                }
                Ok(Value::String(text.to_string()))
            }
            FieldKind::Integer => {
                let number = coerce_integer(self.name, value)?;
                for constraint in &self.constraints {
                    self.check_integer(constraint, number)?;
                }
                Ok(Value::from(number))
            }
        }
    }

    fn check_text(&self, constraint: &Constraint, text: &str) -> ValidationResult<()> {
        match constraint {
            Constraint::NonEmpty if text.is_empty() => Err(ValidationError::for_field(
                self.name,
                format!("\"{}\" is not allowed to be empty", self.name),
            )),
            Constraint::Pattern(regex) if !regex.is_match(text) => Err(ValidationError::for_field(
                self.name,
                format!(
                    "\"{}\" with value \"{}\" fails to match the required pattern: /{}/",
                    self.name,
                    text,
                    regex.as_str()
                ),
            )),
            _ => Ok(()),
        }
    }

    fn check_integer(&self, constraint: &Constraint, number: i64) -> ValidationResult<()> {
        match constraint {
            Constraint::Positive if number <= 0 => Err(ValidationError::for_field(
                self.name,
                format!("\"{}\" must be a positive number", self.name),
            )),
            Constraint::Max(bound) if number > *bound => Err(ValidationError::for_field(
                self.name,
                format!("\"{}\" must be less than or equal to {}", self.name, bound),
            )),
            _ => Ok(()),
        }
    }
}

/// Largest integer every JSON client can represent exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

/// Integers are accepted as JSON integers, integral floats, or decimal text,
/// and must lie within `±MAX_SAFE_INTEGER`.
fn coerce_integer(name: &str, value: &Value) -> ValidationResult<i64> {
    let not_a_number = || ValidationError::for_field(name, format!("\"{}\" must be a number", name));
    let not_an_integer =
        || ValidationError::for_field(name, format!("\"{}\" must be an integer", name));
    let not_safe =
        || ValidationError::for_field(name, format!("\"{}\" must be a safe number", name));

    let float = match value {
        Value::Number(number) => match number.as_i64() {
            Some(integer) => return check_safe(integer).ok_or_else(not_safe),
            None => number.as_f64().ok_or_else(not_a_number)?,
        },
        Value::String(text) => {
            let text = text.trim();
            if let Ok(integer) = text.parse::<i64>() {
                return check_safe(integer).ok_or_else(not_safe);
            }
            text.parse::<f64>().map_err(|_| not_a_number())?
        }
        _ => return Err(not_a_number()),
    };

    if !float.is_finite() {
        return Err(not_a_number());
    }
    if float.fract() != 0.0 {
        return Err(not_an_integer());
    }
    // Beyond 2^53 the float no longer holds the value the client sent.
    if float.abs() > MAX_SAFE_INTEGER as f64 {
        return Err(not_safe());
    }
    Ok(float as i64)
}

fn check_safe(integer: i64) -> Option<i64> {
    (integer.checked_abs()? <= MAX_SAFE_INTEGER).then_some(integer)
}

/// A named, ordered set of field rules.
#[derive(Debug, Clone)]
pub struct Schema {
    pub name: &'static str,
    fields: Vec<FieldRule>,
}

impl Schema {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, rule: FieldRule) -> Self {
        self.fields.push(rule);
        self
    }

    pub fn fields(&self) -> &[FieldRule] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|rule| rule.name == name)
    }
}

/// Validate `input` against `schema`, returning the sanitized object.
pub fn validate(schema: &Schema, input: &Value) -> ValidationResult<Map<String, Value>> {
    let object = input
        .as_object()
        .ok_or_else(|| ValidationError::new("\"value\" must be of type object"))?;

    let mut sanitized = Map::new();
    for rule in schema.fields() {
        match object.get(rule.name) {
            Some(value) => {
                sanitized.insert(rule.name.to_string(), rule.check(value)?);
            }
            None if rule.required => return Err(ValidationError::required(rule.name)),
            None => {}
        }
    }

    if let Some(unknown) = object.keys().find(|key| schema.get(key).is_none()) {
        return Err(ValidationError::not_allowed(unknown));
    }

    Ok(sanitized)
}

/// Validate `input` and decode the sanitized object into `T`.
pub fn validate_as<T: DeserializeOwned>(schema: &Schema, input: &Value) -> ValidationResult<T> {
    let sanitized = validate(schema, input)?;
    serde_json::from_value(Value::Object(sanitized)).map_err(|e| {
        ValidationError::new(format!("{} does not fit its request type: {}", schema.name, e))
    })
}
