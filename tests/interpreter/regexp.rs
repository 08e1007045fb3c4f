//! RegExp tests

use super::{eval, throws_error};
use jswalk::JsValue;

#[test]
fn test_literal_and_constructor_agree() {
    assert_eq!(
        eval("var a = /ab+c/i, b = new RegExp('ab+c', 'i'); a.source === b.source && a.ignoreCase === b.ignoreCase"),
        JsValue::Boolean(true)
    );
    assert_eq!(eval("var r = /x/; RegExp(r) === r"), JsValue::Boolean(true));
    assert_eq!(eval("new RegExp(/x/g).global"), JsValue::Boolean(true));
    throws_error("new RegExp(/x/, 'g')", "TypeError");
    throws_error("new RegExp('x', 'q')", "SyntaxError");
}

#[test]
fn test_regexp_literal_after_operators() {
    assert_eq!(eval("var r = 1 ? /a/ : /b/; r.test('a')"), JsValue::Boolean(true));
    assert_eq!(eval("var x = 10, y = 2, z = 5; x / y / z"), JsValue::Number(1.0));
    assert_eq!(eval("[/[/]/.test('/')][0]"), JsValue::Boolean(true));
}

#[test]
fn test_flags_change_matching() {
    assert_eq!(eval("/ABC/i.test('xabcx')"), JsValue::Boolean(true));
    assert_eq!(eval("/^b/.test('a\\nb')"), JsValue::Boolean(false));
    assert_eq!(eval("/^b/m.test('a\\nb')"), JsValue::Boolean(true));
}

#[test]
fn test_global_exec_loop() {
    assert_eq!(
        eval(
            "var re = /(\\w)(\\d)/g, s = 'a1 b2 c3', m, out = [];
             while ((m = re.exec(s)) != null) out.push(m[1] + '@' + m.index);
             out.join()"
        ),
        JsValue::from("a@0,b@3,c@6")
    );
}

#[test]
fn test_last_index_is_writable() {
    assert_eq!(
        eval("var re = /o/g; re.lastIndex = 5; re.exec('foo boo').index"),
        JsValue::Number(5.0)
    );
    assert_eq!(
        eval("var re = /o/g; re.lastIndex = 99; re.test('foo') + ':' + re.lastIndex"),
        JsValue::from("false:0")
    );
}

#[test]
fn test_unmatched_groups_are_undefined() {
    assert_eq!(eval("/(a)|(b)/.exec('b')[1]"), JsValue::Undefined);
    assert_eq!(eval("/(a)?b/.exec('b').length"), JsValue::Number(2.0));
}

#[test]
fn test_backreferences_and_lookahead() {
    assert_eq!(eval("/(\\w)\\1/.exec('abccd')[0]"), JsValue::from("cc"));
    assert_eq!(eval("/\\d+(?=px)/.exec('12em 34px')[0]"), JsValue::from("34"));
}

#[test]
fn test_methods_reject_other_receivers() {
    throws_error("RegExp.prototype.test.call({}, 'x')", "TypeError");
}
