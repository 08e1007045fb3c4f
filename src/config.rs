//! Interpreter configuration
//!
//! Limits that keep a hostile or runaway script from taking the host down.

use serde::{Deserialize, Serialize};

use crate::error::JsError;

/// Default JS call depth limit.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 512;

/// Tunables for one [`Interpreter`](crate::Interpreter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Maximum number of nested JS calls (native calls included).
    pub max_call_depth: usize,
    /// Statements one top-level evaluation may execute; `None` is unlimited.
    pub step_limit: Option<u64>,
    /// Whether `print` forwards to the console provider.
    pub echo_print: bool,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            step_limit: None,
            echo_print: true,
        }
    }
}

impl InterpreterConfig {
    /// Load a configuration from JSON; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, JsError> {
        serde_json::from_str(text)
            .map_err(|e| JsError::internal_error(format!("invalid interpreter config: {e}")))
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn with_step_limit(mut self, limit: u64) -> Self {
        self.step_limit = Some(limit);
        self
    }

    pub fn with_echo_print(mut self, echo: bool) -> Self {
        self.echo_print = echo;
        self
    }
}
