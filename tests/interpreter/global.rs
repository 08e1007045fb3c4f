//! Global object and global function tests

use super::eval;
use jswalk::{BufferedConsole, Interpreter, JsValue};

#[test]
fn test_global_constants() {
    assert_eq!(eval("typeof undefined"), JsValue::from("undefined"));
    assert_eq!(eval("isNaN(NaN)"), JsValue::Boolean(true));
    assert_eq!(eval("Infinity > 1e308"), JsValue::Boolean(true));
}

#[test]
fn test_global_object_holds_declarations() {
    assert_eq!(eval("var answer = 42; this.answer"), JsValue::Number(42.0));
    assert_eq!(eval("function top() {} typeof this.top"), JsValue::from("function"));
    assert_eq!(eval("this.created = 'yes'; created"), JsValue::from("yes"));
}

#[test]
fn test_builtins_are_not_enumerable() {
    assert_eq!(
        eval("var seen = []; for (var k in this) seen.push(k); seen.join()"),
        JsValue::from("seen,k")
    );
}

#[test]
fn test_parse_int_and_float() {
    assert_eq!(eval("parseInt('08')"), JsValue::Number(8.0));
    assert_eq!(eval("parseInt('0x10')"), JsValue::Number(16.0));
    assert_eq!(eval("parseInt('  -12.9e3')"), JsValue::Number(-12.0));
    assert_eq!(eval("parseInt('z', 36)"), JsValue::Number(35.0));
    assert_eq!(eval("isNaN(parseInt(''))"), JsValue::Boolean(true));
    assert_eq!(eval("parseFloat('.25e1kg')"), JsValue::Number(2.5));
    assert_eq!(eval("parseFloat('Infinity and more')"), JsValue::Number(f64::INFINITY));
}

#[test]
fn test_escape_and_unescape() {
    assert_eq!(eval("escape('100% sure?')"), JsValue::from("100%25%20sure%3F"));
    assert_eq!(eval("unescape('100%25%20sure%3F')"), JsValue::from("100% sure?"));
    assert_eq!(eval("unescape('%')"), JsValue::from("%"));
}

#[test]
fn test_print_output_and_result() {
    let console = BufferedConsole::new();
    let mut interp = Interpreter::new();
    interp.set_console(console.clone());
    let result = interp
        .eval_source("for (var i = 1; i <= 3; i++) print('line', i); print()")
        .unwrap();
    assert_eq!(result, JsValue::Undefined);
    assert_eq!(
        console.lines(),
        vec!["line 1", "line 2", "line 3", ""]
    );
}
