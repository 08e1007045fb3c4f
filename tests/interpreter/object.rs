//! Object tests

use super::{eval, throws_error};
use jswalk::JsValue;

#[test]
fn test_object_literal_and_member_access() {
    assert_eq!(eval("var o = {a: 1, 'b c': 2, 3: 'three'}; o.a + o['b c']"), JsValue::Number(3.0));
    assert_eq!(eval("var o = {3: 'three'}; o[3] + o['3']"), JsValue::from("threethree"));
    assert_eq!(eval("({}).missing"), JsValue::Undefined);
    assert_eq!(eval("var o = {}; o[1.5] = 'x'; o['1.5']"), JsValue::from("x"));
}

#[test]
fn test_keys_keep_insertion_order() {
    assert_eq!(
        eval("var o = {z: 1, a: 2}; o.m = 3; Object.keys(o).join()"),
        JsValue::from("z,a,m")
    );
    assert_eq!(
        eval("var o = {a: 1, b: 2}; delete o.a; o.a = 3; Object.keys(o).join()"),
        JsValue::from("b,a")
    );
    throws_error("Object.keys(1)", "TypeError");
}

#[test]
fn test_prototype_chain_lookup_and_shadowing() {
    assert_eq!(
        eval(
            "function Base() {} Base.prototype.greet = function () { return 'base'; };
             var o = new Base(); var before = o.greet();
             o.greet = function () { return 'own'; };
             var during = o.greet(); delete o.greet;
             before + during + o.greet()"
        ),
        JsValue::from("baseownbase")
    );
}

#[test]
fn test_prototype_changes_are_visible_to_instances() {
    assert_eq!(
        eval("function F() {} var f = new F(); F.prototype.late = 42; f.late"),
        JsValue::Number(42.0)
    );
}

#[test]
fn test_has_own_property_and_enumerability() {
    assert_eq!(
        eval("function F() { this.own = 1; } F.prototype.shared = 2; var f = new F(); f.hasOwnProperty('own') + ',' + f.hasOwnProperty('shared')"),
        JsValue::from("true,false")
    );
    assert_eq!(eval("({a: 1}).propertyIsEnumerable('a')"), JsValue::Boolean(true));
    assert_eq!(eval("[].propertyIsEnumerable('length')"), JsValue::Boolean(false));
    assert_eq!(eval("var n = 0; for (var k in {}) n++; n"), JsValue::Number(0.0));
}

#[test]
fn test_object_to_string_class() {
    assert_eq!(eval("Object.prototype.toString.call([])"), JsValue::from("[object Array]"));
    assert_eq!(eval("Object.prototype.toString.call(new Date(0))"), JsValue::from("[object Date]"));
    assert_eq!(eval("Object.prototype.toString.call(/x/)"), JsValue::from("[object RegExp]"));
    assert_eq!(eval("String({})"), JsValue::from("[object Object]"));
    assert_eq!(
        eval("(function () { return Object.prototype.toString.call(arguments); })()"),
        JsValue::from("[object Arguments]")
    );
}

#[test]
fn test_object_constructor() {
    assert_eq!(eval("typeof Object(1)"), JsValue::from("object"));
    assert_eq!(eval("Object(1) + 1"), JsValue::Number(2.0));
    assert_eq!(eval("var o = {}; Object(o) === o"), JsValue::Boolean(true));
    assert_eq!(eval("typeof new Object()"), JsValue::from("object"));
    assert_eq!(eval("Object(null).constructor === Object"), JsValue::Boolean(true));
}

#[test]
fn test_is_prototype_of() {
    assert_eq!(
        eval("function A() {} var a = new A(); A.prototype.isPrototypeOf(a)"),
        JsValue::Boolean(true)
    );
    assert_eq!(eval("Array.prototype.isPrototypeOf({})"), JsValue::Boolean(false));
}

#[test]
fn test_value_of_hooks_drive_arithmetic() {
    assert_eq!(
        eval("var money = {valueOf: function () { return 5; }}; money * 2 + money"),
        JsValue::Number(15.0)
    );
    assert_eq!(
        eval("var label = {toString: function () { return 'L'; }}; 'x' + label"),
        JsValue::from("xL")
    );
    throws_error(
        "var bad = {valueOf: function () { return {}; }, toString: function () { return {}; }}; bad + 1",
        "TypeError",
    );
}
