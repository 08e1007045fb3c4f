//! Error types for the interpreter
//!
//! Script-visible faults (`Thrown`, `TypeError`, `ReferenceError`, `RangeError`,
//! `SyntaxError`) can be caught by `try/catch`. Everything else terminates the
//! evaluation and is only ever seen by the host.

use thiserror::Error;

use crate::value::JsValue;

/// Source location information for error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Main error type for the interpreter
#[derive(Debug, Error)]
pub enum JsError {
    #[error("SyntaxError: {message} at {location}")]
    SyntaxError {
        message: String,
        location: SourceLocation,
    },

    #[error("TypeError: {message}")]
    TypeError { message: String },

    #[error("ReferenceError: {name} is not defined")]
    ReferenceError { name: String },

    #[error("RangeError: {message}")]
    RangeError { message: String },

    /// A script value raised by `throw` (or by a native on the script's behalf)
    #[error("Uncaught {0:?}")]
    Thrown(JsValue),

    #[error("cannot modify read-only environment (key `{key}`)")]
    ReadOnly { key: String },

    #[error("`{kind}` escaped its enclosing construct")]
    IllegalControlFlow { kind: &'static str },

    #[error("right-hand side of instanceof is not callable")]
    InvalidInstanceofTarget,

    #[error("maximum call depth of {depth} exceeded")]
    StackOverflow { depth: usize },

    #[error("step limit of {limit} exceeded")]
    StepLimitExceeded { limit: u64 },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl JsError {
    pub fn syntax_error(message: impl Into<String>, line: u32, column: u32) -> Self {
        JsError::SyntaxError {
            message: message.into(),
            location: SourceLocation { line, column },
        }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        JsError::TypeError {
            message: message.into(),
        }
    }

    pub fn reference_error(name: impl Into<String>) -> Self {
        JsError::ReferenceError { name: name.into() }
    }

    pub fn range_error(message: impl Into<String>) -> Self {
        JsError::RangeError {
            message: message.into(),
        }
    }

    pub fn read_only(key: impl std::fmt::Display) -> Self {
        JsError::ReadOnly {
            key: key.to_string(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        JsError::Internal(message.into())
    }

    pub fn thrown(value: JsValue) -> Self {
        JsError::Thrown(value)
    }

    /// Whether a script `catch` clause may observe this error.
    pub fn is_catchable(&self) -> bool {
        matches!(
            self,
            JsError::Thrown(_)
                | JsError::TypeError { .. }
                | JsError::ReferenceError { .. }
                | JsError::RangeError { .. }
                | JsError::SyntaxError { .. }
        )
    }

    /// Name of the native error constructor a catchable fault is reported as.
    pub fn error_name(&self) -> Option<&'static str> {
        match self {
            JsError::TypeError { .. } => Some("TypeError"),
            JsError::ReferenceError { .. } => Some("ReferenceError"),
            JsError::RangeError { .. } => Some("RangeError"),
            JsError::SyntaxError { .. } => Some("SyntaxError"),
            _ => None,
        }
    }

    /// The `message` property a converted error object carries.
    pub fn script_message(&self) -> String {
        match self {
            JsError::SyntaxError { message, .. }
            | JsError::TypeError { message }
            | JsError::RangeError { message } => message.clone(),
            JsError::ReferenceError { name } => format!("{name} is not defined"),
            other => other.to_string(),
        }
    }
}
