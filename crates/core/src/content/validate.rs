//! Field-level validation for catalog input.
//!
//! Admin forms submit loosely-typed JSON (numbers as strings, empty strings for
//! blank inputs). [`FieldReader`] turns such an object into typed values and
//! reports the offending field on failure.

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
    #[error("{field} must be a string")]
    NotAString { field: &'static str },
    #[error("{field} must be a boolean")]
    NotABoolean { field: &'static str },
    #[error("{field} must be a number")]
    NotANumber { field: &'static str },
    #[error("{field} must be an integer")]
    NotAnInteger { field: &'static str },
    #[error("{field} cannot be negative")]
    Negative { field: &'static str },
    #[error("unknown content type: {value}")]
    InvalidType { value: String },
    #[error("content type cannot change from {from} to {to}")]
    ImmutableType { from: String, to: String },
    #[error("unknown service category: {value}")]
    InvalidCategory { value: String },
}

impl ValidationError {
    /// Name of the input field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Missing { field }
            | ValidationError::Empty { field }
            | ValidationError::NotAString { field }
            | ValidationError::NotABoolean { field }
            | ValidationError::NotANumber { field }
            | ValidationError::NotAnInteger { field }
            | ValidationError::Negative { field } => field,
            ValidationError::InvalidType { .. } | ValidationError::ImmutableType { .. } => "type",
            ValidationError::InvalidCategory { .. } => "category",
        }
    }
}

/// Reject empty or whitespace-only required text.
pub fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

/// Reject negative, NaN and infinite amounts.
pub fn require_amount(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotANumber { field });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field });
    }
    Ok(())
}

/// Typed access to a JSON object submitted by a form.
///
/// Optional accessors return `None` when the key is absent and `Some(None)`
/// when the key is present but blank (`null` or `""`), so patches can tell
/// "leave unchanged" apart from "clear".
pub struct FieldReader<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> FieldReader<'a> {
    pub fn new(fields: &'a Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Present, non-blank value, or `None` when absent or blank.
    fn present(&self, field: &str) -> Option<Option<&'a Value>> {
        let value = self.fields.get(field)?;
        match value {
            Value::Null => Some(None),
            Value::String(s) if s.trim().is_empty() => Some(None),
            other => Some(Some(other)),
        }
    }

    pub fn required_text(&self, field: &'static str) -> Result<String, ValidationError> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Err(ValidationError::Missing { field }),
            Some(Value::String(s)) => {
                require_text(field, s)?;
                Ok(s.trim().to_string())
            }
            Some(_) => Err(ValidationError::NotAString { field }),
        }
    }

    pub fn optional_text(
        &self,
        field: &'static str,
    ) -> Result<Option<Option<String>>, ValidationError> {
        match self.present(field) {
            None => Ok(None),
            Some(None) => Ok(Some(None)),
            Some(Some(Value::String(s))) => Ok(Some(Some(s.trim().to_string()))),
            Some(Some(_)) => Err(ValidationError::NotAString { field }),
        }
    }

    pub fn optional_amount(
        &self,
        field: &'static str,
    ) -> Result<Option<Option<f64>>, ValidationError> {
        let value = match self.present(field) {
            None => return Ok(None),
            Some(None) => return Ok(Some(None)),
            Some(Some(value)) => value,
        };
        let amount = match value {
            Value::Number(n) => n.as_f64().ok_or(ValidationError::NotANumber { field })?,
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| ValidationError::NotANumber { field })?,
            _ => return Err(ValidationError::NotANumber { field }),
        };
        require_amount(field, amount)?;
        Ok(Some(Some(amount)))
    }

    pub fn optional_integer(&self, field: &'static str) -> Result<Option<i32>, ValidationError> {
        let value = match self.present(field) {
            None | Some(None) => return Ok(None),
            Some(Some(value)) => value,
        };
        let wide = match value {
            Value::Number(n) => n.as_i64().ok_or(ValidationError::NotAnInteger { field })?,
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| ValidationError::NotAnInteger { field })?,
            _ => return Err(ValidationError::NotAnInteger { field }),
        };
        i32::try_from(wide)
            .map(Some)
            .map_err(|_| ValidationError::NotAnInteger { field })
    }

    pub fn optional_bool(&self, field: &'static str) -> Result<Option<bool>, ValidationError> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(ValidationError::NotABoolean { field }),
        }
    }
}
