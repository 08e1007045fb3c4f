//! Basic language feature tests: arithmetic, coercion, comparison, variables, operators

use super::eval;
use jswalk::JsValue;

#[test]
fn test_arithmetic() {
    assert_eq!(eval("1 + 2"), JsValue::Number(3.0));
    assert_eq!(eval("10 - 4"), JsValue::Number(6.0));
    assert_eq!(eval("3 * 4"), JsValue::Number(12.0));
    assert_eq!(eval("15 / 3"), JsValue::Number(5.0));
    assert_eq!(eval("-7 % 3"), JsValue::Number(-1.0));
    assert_eq!(eval("1 / 0"), JsValue::Number(f64::INFINITY));
}

#[test]
fn test_precedence() {
    assert_eq!(eval("1 + 2 * 3"), JsValue::Number(7.0));
    assert_eq!(eval("(1 + 2) * 3"), JsValue::Number(9.0));
    assert_eq!(eval("2 * 3 % 4"), JsValue::Number(2.0));
    assert_eq!(eval("1 < 2 == true"), JsValue::Boolean(true));
}

#[test]
fn test_string_concatenation() {
    assert_eq!(eval("'a' + 1 + 2"), JsValue::from("a12"));
    assert_eq!(eval("1 + 2 + 'a'"), JsValue::from("3a"));
    assert_eq!(eval("'3' * '4'"), JsValue::Number(12.0));
    assert_eq!(eval("[1, 2] + ''"), JsValue::from("1,2"));
    assert_eq!(eval("({}) + ''"), JsValue::from("[object Object]"));
}

#[test]
fn test_to_primitive_calls_script_methods() {
    assert_eq!(
        eval("var o = { valueOf: function () { return 41; } }; o + 1"),
        JsValue::Number(42.0)
    );
    assert_eq!(
        eval("var o = { toString: function () { return 'str'; } }; '' + o"),
        JsValue::from("str")
    );
}

#[test]
fn test_comparison() {
    assert_eq!(eval("1 < 2"), JsValue::Boolean(true));
    assert_eq!(eval("'10' > '9'"), JsValue::Boolean(true));
    assert_eq!(eval("NaN < 1"), JsValue::Boolean(false));
    assert_eq!(eval("NaN >= 1"), JsValue::Boolean(false));
    assert_eq!(eval("null >= 0"), JsValue::Boolean(true));
}

#[test]
fn test_equality() {
    assert_eq!(eval("1 === 1"), JsValue::Boolean(true));
    assert_eq!(eval("({}) === ({})"), JsValue::Boolean(false));
    assert_eq!(eval("var o = {}; o === o"), JsValue::Boolean(true));
    assert_eq!(eval("NaN === NaN"), JsValue::Boolean(false));
    assert_eq!(eval("null == undefined"), JsValue::Boolean(true));
    assert_eq!(eval("null == 0"), JsValue::Boolean(false));
    assert_eq!(eval("'1' == 1"), JsValue::Boolean(true));
    assert_eq!(eval("true == 1"), JsValue::Boolean(true));
    assert_eq!(eval("new String('a') == 'a'"), JsValue::Boolean(true));
    assert_eq!(eval("'1' !== 1"), JsValue::Boolean(true));
}

#[test]
fn test_bitwise_and_shift() {
    assert_eq!(eval("5 & 3"), JsValue::Number(1.0));
    assert_eq!(eval("5 | 3"), JsValue::Number(7.0));
    assert_eq!(eval("5 ^ 3"), JsValue::Number(6.0));
    assert_eq!(eval("~5"), JsValue::Number(-6.0));
    assert_eq!(eval("1 << 31"), JsValue::Number(-2147483648.0));
    assert_eq!(eval("-1 >>> 28"), JsValue::Number(15.0));
    assert_eq!(eval("-16 >> 2"), JsValue::Number(-4.0));
}

#[test]
fn test_logical_operators_short_circuit() {
    assert_eq!(eval("0 || 'x'"), JsValue::from("x"));
    assert_eq!(eval("1 && 'y'"), JsValue::from("y"));
    assert_eq!(eval("var n = 0; false && n++; n"), JsValue::Number(0.0));
    assert_eq!(eval("!''"), JsValue::Boolean(true));
}

#[test]
fn test_typeof() {
    assert_eq!(eval("typeof 1"), JsValue::from("number"));
    assert_eq!(eval("typeof 'a'"), JsValue::from("string"));
    assert_eq!(eval("typeof null"), JsValue::from("object"));
    assert_eq!(eval("typeof undefined"), JsValue::from("undefined"));
    assert_eq!(eval("typeof notDeclared"), JsValue::from("undefined"));
    assert_eq!(eval("typeof function () {}"), JsValue::from("function"));
    assert_eq!(eval("typeof /x/"), JsValue::from("object"));
}

#[test]
fn test_variables_and_update() {
    assert_eq!(eval("var x = 5; x = 10; x"), JsValue::Number(10.0));
    assert_eq!(eval("var x = 5; x--"), JsValue::Number(5.0));
    assert_eq!(eval("var x = 5; x--; x"), JsValue::Number(4.0));
    assert_eq!(eval("var x = 5; --x"), JsValue::Number(4.0));
    assert_eq!(eval("var x = '5'; x++; x"), JsValue::Number(6.0));
    assert_eq!(eval("var o = {n: 1}; o.n += 2; o.n *= 3; o.n"), JsValue::Number(9.0));
}

#[test]
fn test_conditional_comma_void() {
    assert_eq!(eval("true ? 1 : 2"), JsValue::Number(1.0));
    assert_eq!(eval("(1, 2, 3)"), JsValue::Number(3.0));
    assert_eq!(eval("void 0"), JsValue::Undefined);
}

#[test]
fn test_in_and_instanceof() {
    assert_eq!(eval("'a' in {a: 1}"), JsValue::Boolean(true));
    assert_eq!(eval("'toString' in {}"), JsValue::Boolean(true));
    assert_eq!(eval("0 in [5]"), JsValue::Boolean(true));
    assert_eq!(eval("[] instanceof Array"), JsValue::Boolean(true));
    assert_eq!(eval("[] instanceof Object"), JsValue::Boolean(true));
    assert_eq!(eval("1 instanceof Number"), JsValue::Boolean(false));
}

#[test]
fn test_delete() {
    assert_eq!(eval("var o = {a: 1}; delete o.a; o.a"), JsValue::Undefined);
    assert_eq!(eval("var o = {a: 1}; delete o.a; 'a' in o"), JsValue::Boolean(false));
}

#[test]
fn test_literals() {
    assert_eq!(eval("0x1F"), JsValue::Number(31.0));
    assert_eq!(eval("1.5e3"), JsValue::Number(1500.0));
    assert_eq!(eval("'\\x41\\u0042'"), JsValue::from("AB"));
    assert_eq!(eval("[1, 2, 3].length"), JsValue::Number(3.0));
    assert_eq!(eval("({a: 1, 'b': 2, 3: 'c'})[3]"), JsValue::from("c"));
}

#[test]
fn test_automatic_semicolon_insertion() {
    assert_eq!(eval("var a = 1\nvar b = 2\na + b"), JsValue::Number(3.0));
    assert_eq!(
        eval("function f() { return\n 5; } f()"),
        JsValue::Undefined
    );
}
