//! Integration tests for the interpreter, organized by feature
//!
//! These tests exercise the interpreter through the public API.

mod api;
mod array;
mod basics;
mod control_flow;
mod date;
mod error;
mod eval;
mod function;
mod global;
mod json;
mod limits;
mod math;
mod number;
mod object;
mod regexp;
mod scenarios;
mod scope;
mod string;

use jswalk::{Interpreter, JsError, JsValue};

/// Evaluate in a fresh interpreter and return the completion value.
pub fn eval(source: &str) -> JsValue {
    match Interpreter::new().eval_source(source) {
        Ok(value) => value,
        Err(err) => panic!("evaluation of {source:?} failed: {err}"),
    }
}

/// Evaluate in a fresh interpreter, keeping the error.
pub fn eval_result(source: &str) -> Result<JsValue, JsError> {
    Interpreter::new().eval_source(source)
}

/// Assert that evaluation fails and that the error's display contains `expected`.
pub fn throws_error(source: &str, expected: &str) {
    match eval_result(source) {
        Ok(value) => panic!("expected {source:?} to fail with {expected:?}, got {value:?}"),
        Err(err) => {
            let message = err.to_string();
            assert!(
                message.contains(expected),
                "error {message:?} does not contain {expected:?}"
            );
        }
    }
}
