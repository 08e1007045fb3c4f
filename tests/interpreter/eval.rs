//! Tests for the global `eval` function

use super::{eval, throws_error};
use jswalk::JsValue;

#[test]
fn test_eval_returns_completion_value() {
    assert_eq!(eval("eval('1 + 2; 3 * 4')"), JsValue::Number(12.0));
    assert_eq!(eval("eval('')"), JsValue::Undefined);
    assert_eq!(eval("eval('if (true) { \"branch\"; }')"), JsValue::from("branch"));
}

#[test]
fn test_eval_declares_in_calling_function() {
    assert_eq!(
        eval("function f() { eval('var inner = 5'); return inner; } f()"),
        JsValue::Number(5.0)
    );
    assert_eq!(
        eval("function f() { eval('var inner = 5'); } f(); typeof inner"),
        JsValue::from("undefined")
    );
    assert_eq!(
        eval("function f() { eval('function g() { return 9; }'); return g(); } f()"),
        JsValue::Number(9.0)
    );
}

#[test]
fn test_eval_updates_enclosing_variables() {
    assert_eq!(
        eval("var count = 1; function bump() { eval('count += 10'); } bump(); count"),
        JsValue::Number(11.0)
    );
}

#[test]
fn test_eval_sees_this_of_caller() {
    assert_eq!(
        eval("var o = {v: 3, read: function () { return eval('this.v'); }}; o.read()"),
        JsValue::Number(3.0)
    );
}

#[test]
fn test_eval_errors() {
    throws_error("eval('1 +')", "SyntaxError");
    throws_error("eval('return 1')", "return");
    assert_eq!(
        eval("try { eval('throw \"inner\"'); } catch (e) { e; }"),
        JsValue::from("inner")
    );
}

#[test]
fn test_eval_of_non_string_is_identity() {
    assert_eq!(eval("var o = {}; eval(o) === o"), JsValue::Boolean(true));
    assert_eq!(eval("eval()"), JsValue::Undefined);
}
