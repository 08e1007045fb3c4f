//! Math tests

use super::eval;
use jswalk::platform::StdRandomProvider;
use jswalk::{Interpreter, JsValue};

#[test]
fn test_math_is_a_plain_object() {
    assert_eq!(eval("typeof Math"), JsValue::from("object"));
    assert_eq!(eval("String(Math)"), JsValue::from("[object Object]"));
}

#[test]
fn test_rounding_family() {
    assert_eq!(
        eval("[Math.floor(2.7), Math.ceil(2.1), Math.round(2.5), Math.round(-2.5)].join()"),
        JsValue::from("2,3,3,-2")
    );
    assert_eq!(eval("Math.abs('-4')"), JsValue::Number(4.0));
}

#[test]
fn test_trigonometry_and_logs() {
    assert_eq!(eval("Math.sin(0) + Math.cos(0)"), JsValue::Number(1.0));
    assert_eq!(eval("Math.atan2(1, 1) * 4 === Math.PI"), JsValue::Boolean(true));
    assert_eq!(eval("Math.log(Math.E)"), JsValue::Number(1.0));
    assert_eq!(eval("Math.exp(0)"), JsValue::Number(1.0));
    assert_eq!(eval("Math.log(0)"), JsValue::Number(f64::NEG_INFINITY));
    assert_eq!(eval("isNaN(Math.acos(2))"), JsValue::Boolean(true));
}

#[test]
fn test_pow_edge_cases() {
    assert_eq!(eval("Math.pow(2, -1)"), JsValue::Number(0.5));
    assert_eq!(eval("Math.pow(NaN, 0)"), JsValue::Number(1.0));
    assert_eq!(eval("isNaN(Math.pow(-1, Infinity))"), JsValue::Boolean(true));
    assert_eq!(eval("Math.sqrt(16)"), JsValue::Number(4.0));
}

#[test]
fn test_min_max_signed_zero() {
    assert_eq!(eval("1 / Math.max(-0, 0)"), JsValue::Number(f64::INFINITY));
    assert_eq!(eval("1 / Math.min(0, -0)"), JsValue::Number(f64::NEG_INFINITY));
    assert_eq!(eval("Math.min()"), JsValue::Number(f64::INFINITY));
}

#[test]
fn test_seeded_random_sequence_repeats() {
    let run = || {
        let mut interp = Interpreter::new();
        interp.set_random(StdRandomProvider::with_seed(99));
        interp
            .eval_source("var out = []; for (var i = 0; i < 5; i++) out.push(Math.floor(Math.random() * 100)); out.join()")
            .unwrap()
    };
    assert_eq!(run(), run());
}
