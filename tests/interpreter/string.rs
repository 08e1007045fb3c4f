//! String tests

use super::{eval, throws_error};
use jswalk::JsValue;

#[test]
fn test_string_primitive_members() {
    assert_eq!(eval("'hello'.length"), JsValue::Number(5.0));
    assert_eq!(eval("'hello'[1]"), JsValue::from("e"));
    assert_eq!(eval("'hi'.length = 5; 'hi'.length"), JsValue::Number(2.0));
    assert_eq!(eval("var s = 'ab'; s.foo = 1; s.foo"), JsValue::Undefined);
}

#[test]
fn test_string_wrapper_objects() {
    assert_eq!(eval("var s = new String('ab'); s.extra = 1; s.extra"), JsValue::Number(1.0));
    assert_eq!(eval("new String('ab') == 'ab'"), JsValue::Boolean(true));
    assert_eq!(eval("new String('ab') === 'ab'"), JsValue::Boolean(false));
    assert_eq!(eval("var n = 0; for (var k in new String('xyz')) n++; n"), JsValue::Number(3.0));
}

#[test]
fn test_string_prototype_is_extensible() {
    assert_eq!(
        eval("String.prototype.shout = function () { return this.toUpperCase() + '!'; }; 'hey'.shout()"),
        JsValue::from("HEY!")
    );
}

#[test]
fn test_case_and_trim() {
    assert_eq!(eval("'MiXeD'.toLowerCase()"), JsValue::from("mixed"));
    assert_eq!(eval("'\\t pad \\n'.trim()"), JsValue::from("pad"));
}

#[test]
fn test_split_and_join_round_trip() {
    assert_eq!(
        eval("'2024-01-15'.split('-').reverse().join('/')"),
        JsValue::from("15/01/2024")
    );
    assert_eq!(eval("''.split(',').length"), JsValue::Number(1.0));
    assert_eq!(eval("'a, b,c'.split(/\\s*,\\s*/).join('|')"), JsValue::from("a|b|c"));
}

#[test]
fn test_replace_with_function() {
    assert_eq!(
        eval("'a-b-c'.replace(/-(\\w)/g, function (m, c) { return c.toUpperCase(); })"),
        JsValue::from("aBC")
    );
    assert_eq!(
        eval("'John Smith'.replace(/(\\w+)\\s(\\w+)/, '$2, $1')"),
        JsValue::from("Smith, John")
    );
}

#[test]
fn test_char_codes() {
    assert_eq!(eval("'A'.charCodeAt(0) + 1"), JsValue::Number(66.0));
    assert_eq!(eval("isNaN('A'.charCodeAt(3))"), JsValue::Boolean(true));
    assert_eq!(eval("String.fromCharCode(0x41, 0x42, 0x43)"), JsValue::from("ABC"));
}

#[test]
fn test_locale_compare_orders() {
    assert_eq!(eval("'a'.localeCompare('b') < 0"), JsValue::Boolean(true));
    assert_eq!(eval("'b'.localeCompare('a') > 0"), JsValue::Boolean(true));
    assert_eq!(eval("'a'.localeCompare('a')"), JsValue::Number(0.0));
}

#[test]
fn test_string_methods_reject_other_receivers() {
    throws_error("String.prototype.toString.call(5)", "TypeError");
    throws_error("String.prototype.valueOf.call({})", "TypeError");
}
