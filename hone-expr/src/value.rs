use std::fmt;

use crate::EvalError;

/// A value an expression consumes or produces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Number(f64),
    Bool(bool),
}

impl Value {
    /// Returns `"number"` or `"bool"`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
        }
    }

    /// Returns the number, or a type mismatch for a bool.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::TypeMismatch`] if the value is a bool.
    pub fn as_number(&self) -> Result<f64, EvalError> {
        match *self {
            Value::Number(value) => Ok(value),
            Value::Bool(_) => Err(self.mismatch("number")),
        }
    }

    /// Returns the bool, or a type mismatch for a number.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::TypeMismatch`] if the value is a number.
    pub fn as_bool(&self) -> Result<bool, EvalError> {
        match *self {
            Value::Bool(value) => Ok(value),
            Value::Number(_) => Err(self.mismatch("bool")),
        }
    }

    fn mismatch(&self, expected: &'static str) -> EvalError {
        EvalError::TypeMismatch {
            expected,
            found: self.kind(),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(value) => write!(f, "{value}"),
            Value::Bool(value) => write!(f, "{value}"),
        }
    }
}
