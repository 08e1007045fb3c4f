//! Function tests

use super::{eval, throws_error};
use jswalk::JsValue;

#[test]
fn test_function_length_and_typeof() {
    assert_eq!(eval("(function (a, b, c) {}).length"), JsValue::Number(3.0));
    assert_eq!(eval("typeof function () {}"), JsValue::from("function"));
    assert_eq!(eval("Math.max.length"), JsValue::Number(2.0));
}

#[test]
fn test_call_and_apply() {
    assert_eq!(
        eval("function who(greeting) { return greeting + ' ' + this.name; } who.call({name: 'Ann'}, 'hi')"),
        JsValue::from("hi Ann")
    );
    assert_eq!(
        eval("Math.max.apply(null, [3, 9, 4])"),
        JsValue::Number(9.0)
    );
    assert_eq!(
        eval("function sum() { var t = 0; for (var i = 0; i < arguments.length; i++) t += arguments[i]; return t; }
              function forward() { return sum.apply(this, arguments); }
              forward(1, 2, 3)"),
        JsValue::Number(6.0)
    );
    throws_error("Math.max.apply(null, 5)", "TypeError");
}

#[test]
fn test_call_with_null_receiver_uses_global() {
    assert_eq!(
        eval("var tag = 'global'; function f() { return this.tag; } f.call(null)"),
        JsValue::from("global")
    );
}

#[test]
fn test_function_constructor() {
    assert_eq!(eval("new Function('a', 'b', 'return a + b')(2, 3)"), JsValue::Number(5.0));
    assert_eq!(eval("Function('return 7')()"), JsValue::Number(7.0));
    assert_eq!(eval("new Function('a, b', 'return a * b')(3, 4)"), JsValue::Number(12.0));
    // Runs in the global scope, not the caller's
    assert_eq!(
        eval("var v = 'global'; function f() { var v = 'local'; return Function('return v')(); } f()"),
        JsValue::from("global")
    );
    throws_error("new Function('return (')", "SyntaxError");
}

#[test]
fn test_function_to_string() {
    assert_eq!(
        eval("function add(a, b) { return a + b; } String(add).indexOf('function add(a, b)')"),
        JsValue::Number(0.0)
    );
    assert_eq!(
        eval("String(Math.max).indexOf('[native code]') > 0"),
        JsValue::Boolean(true)
    );
}

#[test]
fn test_functions_are_objects() {
    assert_eq!(
        eval("function counter() { counter.calls = (counter.calls || 0) + 1; } counter(); counter(); counter.calls"),
        JsValue::Number(2.0)
    );
    assert_eq!(eval("(function () {}) instanceof Function"), JsValue::Boolean(true));
    assert_eq!(eval("Function.prototype.isPrototypeOf(Object)"), JsValue::Boolean(true));
}

#[test]
fn test_recursion_and_mutual_recursion() {
    assert_eq!(
        eval("function even(n) { return n == 0 ? true : odd(n - 1); } function odd(n) { return n == 0 ? false : even(n - 1); } even(10)"),
        JsValue::Boolean(true)
    );
}

#[test]
fn test_constructor_returning_object_replaces_instance() {
    assert_eq!(
        eval("function F() { this.a = 1; return {b: 2}; } var o = new F(); o.a + ':' + o.b"),
        JsValue::from("undefined:2")
    );
}
