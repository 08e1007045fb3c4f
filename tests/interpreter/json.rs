//! JSON tests

use super::{eval, throws_error};
use jswalk::JsValue;

#[test]
fn test_stringify_primitives() {
    assert_eq!(eval("JSON.stringify('a\"b')"), JsValue::from(r#""a\"b""#));
    assert_eq!(eval("JSON.stringify(null)"), JsValue::from("null"));
    assert_eq!(eval("JSON.stringify(3.25)"), JsValue::from("3.25"));
    assert_eq!(eval("JSON.stringify(-0)"), JsValue::from("0"));
    assert_eq!(eval("JSON.stringify(Infinity)"), JsValue::from("null"));
    assert_eq!(eval("JSON.stringify(function () {})"), JsValue::Undefined);
}

#[test]
fn test_stringify_wrappers_and_nesting() {
    assert_eq!(
        eval("JSON.stringify([new Number(1), new String('s'), new Boolean(true)])"),
        JsValue::from(r#"[1,"s",true]"#)
    );
    assert_eq!(
        eval("JSON.stringify({outer: {inner: [1, {deep: 'x'}]}})"),
        JsValue::from(r#"{"outer":{"inner":[1,{"deep":"x"}]}}"#)
    );
}

#[test]
fn test_stringify_skips_inherited_and_hidden_members() {
    assert_eq!(
        eval("function P() { this.own = 1; } P.prototype.inherited = 2; JSON.stringify(new P())"),
        JsValue::from(r#"{"own":1}"#)
    );
    assert_eq!(eval("JSON.stringify([1, 2])"), JsValue::from("[1,2]"));
}

#[test]
fn test_stringify_cycle_through_array() {
    throws_error("var a = []; a.push({list: a}); JSON.stringify(a)", "circular");
}

#[test]
fn test_parse_builds_plain_values() {
    assert_eq!(
        eval("var v = JSON.parse('{\"list\": [1, 2.5, null, true], \"name\": \"n\"}'); v.list.length + v.list[1] + v.name"),
        JsValue::from("6.5n")
    );
    assert_eq!(eval("JSON.parse('[]') instanceof Array"), JsValue::Boolean(true));
    assert_eq!(eval("JSON.parse(' 12 ')"), JsValue::Number(12.0));
    assert_eq!(
        eval("try { JSON.parse('[1,]'); } catch (e) { e.name; }"),
        JsValue::from("SyntaxError")
    );
}

#[test]
fn test_round_trip_preserves_structure() {
    assert_eq!(
        eval("var src = {b: [1, 'two', {c: false}], a: null}; JSON.stringify(JSON.parse(JSON.stringify(src))) === JSON.stringify(src)"),
        JsValue::Boolean(true)
    );
}
