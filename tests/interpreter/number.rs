//! Number tests: formatting, conversion and the Number/Boolean wrappers

use super::{eval, throws_error};
use jswalk::JsValue;

#[test]
fn test_number_to_string_formatting() {
    assert_eq!(eval("String(0.1 + 0.2)"), JsValue::from("0.30000000000000004"));
    assert_eq!(eval("String(1e21)"), JsValue::from("1e+21"));
    assert_eq!(eval("String(1e20)"), JsValue::from("100000000000000000000"));
    assert_eq!(eval("String(123e-20)"), JsValue::from("1.23e-18"));
    assert_eq!(eval("String(0.000001)"), JsValue::from("0.000001"));
    assert_eq!(eval("String(1e-7)"), JsValue::from("1e-7"));
    assert_eq!(eval("String(-0)"), JsValue::from("0"));
    assert_eq!(eval("String(-1 / 0)"), JsValue::from("-Infinity"));
    assert_eq!(eval("'' + 255"), JsValue::from("255"));
}

#[test]
fn test_string_to_number() {
    assert_eq!(eval("+'  42  '"), JsValue::Number(42.0));
    assert_eq!(eval("+''"), JsValue::Number(0.0));
    assert_eq!(eval("+'0x1A'"), JsValue::Number(26.0));
    assert_eq!(eval("+'1e3'"), JsValue::Number(1000.0));
    assert_eq!(eval("+'-Infinity'"), JsValue::Number(f64::NEG_INFINITY));
    assert_eq!(eval("isNaN(+'12px')"), JsValue::Boolean(true));
    assert_eq!(eval("+true + +null"), JsValue::Number(1.0));
    assert_eq!(eval("isNaN(+undefined)"), JsValue::Boolean(true));
}

#[test]
fn test_number_statics() {
    assert_eq!(eval("Number.MIN_VALUE > 0"), JsValue::Boolean(true));
    assert_eq!(eval("isNaN(Number.NaN)"), JsValue::Boolean(true));
    assert_eq!(eval("Number.POSITIVE_INFINITY === Infinity"), JsValue::Boolean(true));
    assert_eq!(eval("Number.NEGATIVE_INFINITY === -Infinity"), JsValue::Boolean(true));
    assert_eq!(eval("Number()"), JsValue::Number(0.0));
}

#[test]
fn test_number_methods() {
    assert_eq!(eval("(3.14159).toFixed(2)"), JsValue::from("3.14"));
    assert_eq!(eval("(255).toString(2)"), JsValue::from("11111111"));
    assert_eq!(eval("(1234.5678).toPrecision(6)"), JsValue::from("1234.57"));
    assert_eq!(eval("(5).toExponential(1)"), JsValue::from("5.0e+0"));
    assert_eq!(eval("new Number(4).valueOf() * 2"), JsValue::Number(8.0));
    throws_error("(1).toFixed(101)", "RangeError");
    throws_error("(10).toString(1)", "RangeError");
    throws_error("Number.prototype.valueOf.call('1')", "TypeError");
}

#[test]
fn test_boolean_wrapper() {
    assert_eq!(eval("Boolean('')"), JsValue::Boolean(false));
    assert_eq!(eval("Boolean('false')"), JsValue::Boolean(true));
    assert_eq!(eval("Boolean({})"), JsValue::Boolean(true));
    assert_eq!(eval("typeof new Boolean(false)"), JsValue::from("object"));
    // Wrapper objects are always truthy
    assert_eq!(eval("new Boolean(false) ? 'yes' : 'no'"), JsValue::from("yes"));
    assert_eq!(eval("new Boolean(false).valueOf()"), JsValue::Boolean(false));
    assert_eq!(eval("true.toString()"), JsValue::from("true"));
    throws_error("Boolean.prototype.toString.call(1)", "TypeError");
}
