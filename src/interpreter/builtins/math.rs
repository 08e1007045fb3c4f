//! Math built-in methods

use crate::env::{Env, PropertyKey};
use crate::error::JsError;
use crate::function::NativeFn;
use crate::interpreter::Interpreter;
use crate::value::JsValue;

/// Create Math object with all math methods and constants
pub fn create_math_object(interp: &mut Interpreter) -> Env {
    let math = interp.create_object();

    let constants = [
        ("E", std::f64::consts::E),
        ("LN10", std::f64::consts::LN_10),
        ("LN2", std::f64::consts::LN_2),
        ("LOG2E", std::f64::consts::LOG2_E),
        ("LOG10E", std::f64::consts::LOG10_E),
        ("PI", std::f64::consts::PI),
        ("SQRT1_2", std::f64::consts::FRAC_1_SQRT_2),
        ("SQRT2", std::f64::consts::SQRT_2),
    ];
    for (name, value) in constants {
        math.define(PropertyKey::from(name), JsValue::Number(value));
    }

    let methods: [(&str, NativeFn, usize); 18] = [
        ("abs", math_abs, 1),
        ("acos", math_acos, 1),
        ("asin", math_asin, 1),
        ("atan", math_atan, 1),
        ("atan2", math_atan2, 2),
        ("ceil", math_ceil, 1),
        ("cos", math_cos, 1),
        ("exp", math_exp, 1),
        ("floor", math_floor, 1),
        ("log", math_log, 1),
        ("max", math_max, 2),
        ("min", math_min, 2),
        ("pow", math_pow, 2),
        ("random", math_random, 0),
        ("round", math_round, 1),
        ("sin", math_sin, 1),
        ("sqrt", math_sqrt, 1),
        ("tan", math_tan, 1),
    ];
    for (name, func, arity) in methods {
        interp.register_method(&math, name, func, arity);
    }

    math
}

/// ToNumber of the argument at `index`, NaN when missing.
fn number_arg(interp: &mut Interpreter, args: &[JsValue], index: usize) -> Result<f64, JsError> {
    match args.get(index) {
        Some(value) => interp.to_number(value),
        None => Ok(f64::NAN),
    }
}

/// Apply a one-argument float function to the first argument.
fn unary(
    interp: &mut Interpreter,
    args: &[JsValue],
    f: fn(f64) -> f64,
) -> Result<JsValue, JsError> {
    Ok(JsValue::Number(f(number_arg(interp, args, 0)?)))
}

pub fn math_abs(interp: &mut Interpreter, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    unary(interp, args, f64::abs)
}

pub fn math_acos(interp: &mut Interpreter, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    unary(interp, args, f64::acos)
}

pub fn math_asin(interp: &mut Interpreter, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    unary(interp, args, f64::asin)
}

pub fn math_atan(interp: &mut Interpreter, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    unary(interp, args, f64::atan)
}

pub fn math_atan2(interp: &mut Interpreter, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    let y = number_arg(interp, args, 0)?;
    let x = number_arg(interp, args, 1)?;
    Ok(JsValue::Number(y.atan2(x)))
}

pub fn math_ceil(interp: &mut Interpreter, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    unary(interp, args, f64::ceil)
}

pub fn math_cos(interp: &mut Interpreter, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    unary(interp, args, f64::cos)
}

pub fn math_exp(interp: &mut Interpreter, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    unary(interp, args, f64::exp)
}

pub fn math_floor(interp: &mut Interpreter, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    unary(interp, args, f64::floor)
}

pub fn math_log(interp: &mut Interpreter, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    unary(interp, args, f64::ln)
}

pub fn math_sin(interp: &mut Interpreter, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    unary(interp, args, f64::sin)
}

pub fn math_sqrt(interp: &mut Interpreter, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    unary(interp, args, f64::sqrt)
}

pub fn math_tan(interp: &mut Interpreter, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    unary(interp, args, f64::tan)
}

/// Math.max(...values) - NaN if any argument is NaN, -Infinity with no arguments
pub fn math_max(interp: &mut Interpreter, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    let mut result = f64::NEG_INFINITY;
    for arg in args {
        let n = interp.to_number(arg)?;
        if n.is_nan() {
            result = f64::NAN;
        } else if !result.is_nan() && (n > result || (n == 0.0 && result == 0.0 && n.is_sign_positive())) {
            result = n;
        }
    }
    Ok(JsValue::Number(result))
}

/// Math.min(...values) - NaN if any argument is NaN, Infinity with no arguments
pub fn math_min(interp: &mut Interpreter, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    let mut result = f64::INFINITY;
    for arg in args {
        let n = interp.to_number(arg)?;
        if n.is_nan() {
            result = f64::NAN;
        } else if !result.is_nan() && (n < result || (n == 0.0 && result == 0.0 && n.is_sign_negative())) {
            result = n;
        }
    }
    Ok(JsValue::Number(result))
}

pub fn math_pow(interp: &mut Interpreter, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    let base = number_arg(interp, args, 0)?;
    let exponent = number_arg(interp, args, 1)?;
    // 1 ** NaN and (+-1) ** +-Infinity are NaN in JS, unlike powf
    if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
        return Ok(JsValue::Number(f64::NAN));
    }
    Ok(JsValue::Number(base.powf(exponent)))
}

pub fn math_random(interp: &mut Interpreter, _this: JsValue, _args: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(JsValue::Number(interp.next_random()))
}

/// Math.round - halves round towards +Infinity
pub fn math_round(interp: &mut Interpreter, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    let n = number_arg(interp, args, 0)?;
    if !n.is_finite() || n == 0.0 {
        return Ok(JsValue::Number(n));
    }
    let rounded = (n + 0.5).floor();
    // Keep the sign of values in [-0.5, 0)
    if rounded == 0.0 && n < 0.0 {
        return Ok(JsValue::Number(-0.0));
    }
    Ok(JsValue::Number(rounded))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn eval(source: &str) -> JsValue {
        Interpreter::new().eval_source(source).unwrap()
    }

    #[test]
    fn test_constants() {
        assert_eq!(eval("Math.PI"), JsValue::Number(std::f64::consts::PI));
        assert_eq!(eval("Math.SQRT2 * Math.SQRT1_2 > 0.99"), JsValue::Boolean(true));
    }

    #[test]
    fn test_round() {
        assert_eq!(eval("Math.round(2.5)"), JsValue::Number(3.0));
        assert_eq!(eval("Math.round(-2.5)"), JsValue::Number(-2.0));
        assert_eq!(eval("Math.round(-2.6)"), JsValue::Number(-3.0));
        assert_eq!(eval("1 / Math.round(-0.2)"), JsValue::Number(f64::NEG_INFINITY));
    }

    #[test]
    fn test_max_min() {
        assert_eq!(eval("Math.max(1, '7', 3)"), JsValue::Number(7.0));
        assert_eq!(eval("Math.min(4, -2)"), JsValue::Number(-2.0));
        assert_eq!(eval("Math.max()"), JsValue::Number(f64::NEG_INFINITY));
        assert_eq!(eval("isNaN(Math.min(1, NaN, 0))"), JsValue::Boolean(true));
    }

    #[test]
    fn test_pow_and_friends() {
        assert_eq!(eval("Math.pow(2, 10)"), JsValue::Number(1024.0));
        assert_eq!(eval("isNaN(Math.pow(1, Infinity))"), JsValue::Boolean(true));
        assert_eq!(eval("Math.floor(-1.5) + Math.ceil(1.2)"), JsValue::Number(0.0));
        assert_eq!(eval("Math.abs(-3)"), JsValue::Number(3.0));
        assert_eq!(eval("isNaN(Math.sqrt())"), JsValue::Boolean(true));
    }

    #[test]
    fn test_random_range() {
        assert_eq!(
            eval("var ok = true; for (var i = 0; i < 50; i++) { var r = Math.random(); if (r < 0 || r >= 1) ok = false; } ok"),
            JsValue::Boolean(true)
        );
    }
}
