//! Scoping: hoisting, closures, activations, `this`, `arguments`

use super::{eval, throws_error};
use jswalk::JsValue;

#[test]
fn test_var_hoisting() {
    assert_eq!(eval("var r = typeof x; var x = 1; r"), JsValue::from("undefined"));
    assert_eq!(
        eval("function f() { var r = v; var v = 2; return r; } f()"),
        JsValue::Undefined
    );
    assert_eq!(eval("f(); function f() { return 'hoisted'; } f()"), JsValue::from("hoisted"));
}

#[test]
fn test_function_scope_not_block_scope() {
    assert_eq!(
        eval("function f() { if (true) { var inner = 'seen'; } return inner; } f()"),
        JsValue::from("seen")
    );
    assert_eq!(
        eval("for (var i = 0; i < 3; i++) {} i"),
        JsValue::Number(3.0)
    );
}

#[test]
fn test_closures_capture_defining_scope() {
    assert_eq!(
        eval(
            "var x = 'global';
             function make() { var x = 'captured'; return function () { return x; }; }
             function call(g) { var x = 'caller'; return g(); }
             call(make())"
        ),
        JsValue::from("captured")
    );
}

#[test]
fn test_closures_share_variable() {
    assert_eq!(
        eval(
            "var fns = [];
             for (var i = 0; i < 3; i++) fns.push(function () { return i; });
             fns[0]() + fns[2]()"
        ),
        JsValue::Number(6.0)
    );
}

#[test]
fn test_undeclared_assignment_creates_global() {
    assert_eq!(
        eval("function f() { leaked = 7; } f(); leaked"),
        JsValue::Number(7.0)
    );
}

#[test]
fn test_unresolved_read_is_reference_error() {
    throws_error("nothingHere + 1", "nothingHere is not defined");
    throws_error("missing += 1", "missing is not defined");
    throws_error("missing++", "missing is not defined");
}

#[test]
fn test_this_binding() {
    assert_eq!(
        eval("var o = { v: 1, get: function () { return this.v; } }; o.get()"),
        JsValue::Number(1.0)
    );
    assert_eq!(
        eval("var v = 'g'; var o = { v: 1, get: function () { return this.v; } }; var f = o.get; f()"),
        JsValue::from("g")
    );
    assert_eq!(eval("this.Math === Math"), JsValue::Boolean(true));
}

#[test]
fn test_arguments_object() {
    assert_eq!(
        eval("function f() { return arguments.length + ':' + arguments[1]; } f('a', 'b', 'c')"),
        JsValue::from("3:b")
    );
    assert_eq!(
        eval("function f(a, b) { return b; } f(1)"),
        JsValue::Undefined
    );
    assert_eq!(
        eval("function f() { return arguments.callee === f; } f()"),
        JsValue::Boolean(true)
    );
    assert_eq!(
        eval("function inner() { return arguments.caller === outer; } function outer() { return inner(); } outer()"),
        JsValue::Boolean(true)
    );
}

#[test]
fn test_named_function_expression_binds_own_name() {
    assert_eq!(
        eval("var fact = function f(n) { return n <= 1 ? 1 : n * f(n - 1); }; fact(5)"),
        JsValue::Number(120.0)
    );
    assert_eq!(eval("var g = function h() {}; typeof h"), JsValue::from("undefined"));
}

#[test]
fn test_constructor_prototype_wiring() {
    assert_eq!(
        eval("function F() {} F.prototype.constructor === F"),
        JsValue::Boolean(true)
    );
    assert_eq!(
        eval("function F() { this.a = 1; return 5; } new F().a"),
        JsValue::Number(1.0)
    );
    assert_eq!(
        eval("function F() {} F.prototype = 3; Object.prototype.isPrototypeOf(new F())"),
        JsValue::Boolean(true)
    );
}

#[test]
fn test_calling_non_function_is_type_error() {
    throws_error("var o = {}; o.nope()", "TypeError");
    throws_error("var n = 1; n()", "TypeError");
    throws_error("null.x", "Cannot read property 'x' of null");
    throws_error("new 5", "TypeError");
}
