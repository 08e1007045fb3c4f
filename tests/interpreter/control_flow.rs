//! Control flow tests: loops, labels, switch, try/catch/finally

use super::{eval, eval_result, throws_error};
use jswalk::{JsError, JsValue};

#[test]
fn test_if_else() {
    assert_eq!(eval("var r; if (0) r = 'a'; else r = 'b'; r"), JsValue::from("b"));
    assert_eq!(eval("if (1) { 'yes'; }"), JsValue::from("yes"));
}

#[test]
fn test_loops() {
    assert_eq!(
        eval("var s = 0; for (var i = 1; i <= 10; i++) s += i; s"),
        JsValue::Number(55.0)
    );
    assert_eq!(
        eval("var i = 0; while (i < 5) i++; i"),
        JsValue::Number(5.0)
    );
    assert_eq!(
        eval("var i = 10; do { i++; } while (false); i"),
        JsValue::Number(11.0)
    );
}

#[test]
fn test_break_and_continue() {
    assert_eq!(
        eval("var s = 0; for (var i = 0; i < 10; i++) { if (i == 5) break; if (i % 2) continue; s += i; } s"),
        JsValue::Number(6.0)
    );
}

#[test]
fn test_labeled_continue_advances_outer_loop() {
    assert_eq!(
        eval(
            "var log = [];
             outer: for (var i = 0; i < 3; i++) {
                 for (var j = 0; j < 3; j++) {
                     if (j == 1) continue outer;
                     log.push(i + '' + j);
                 }
                 log.push('never');
             }
             log.join(',')"
        ),
        JsValue::from("00,10,20")
    );
}

#[test]
fn test_labeled_break() {
    assert_eq!(
        eval(
            "var n = 0;
             outer: while (true) {
                 while (true) { n++; if (n > 2) break outer; }
             }
             n"
        ),
        JsValue::Number(3.0)
    );
    assert_eq!(
        eval("var r = 'before'; block: { r = 'in'; break block; r = 'after'; } r"),
        JsValue::from("in")
    );
}

#[test]
fn test_switch_break_does_not_leave_loop() {
    assert_eq!(
        eval(
            "var hits = 0;
             for (var i = 0; i < 3; i++) {
                 switch (i) { case 1: break; default: hits++; }
             }
             hits + ':' + i"
        ),
        JsValue::from("2:3")
    );
}

#[test]
fn test_switch_fallthrough_and_default() {
    assert_eq!(
        eval("var r = ''; switch (2) { case 1: r += 'a'; case 2: r += 'b'; case 3: r += 'c'; break; case 4: r += 'd'; } r"),
        JsValue::from("bc")
    );
    assert_eq!(
        eval("var r = ''; switch ('z') { case 'a': r = 'a'; break; default: r = 'dflt'; case 'b': r += '+b'; } r"),
        JsValue::from("dflt+b")
    );
    // Strict comparison of case labels
    assert_eq!(
        eval("var r = 'none'; switch ('1') { case 1: r = 'number'; break; case '1': r = 'string'; } r"),
        JsValue::from("string")
    );
}

#[test]
fn test_for_in_visits_each_key_once() {
    assert_eq!(
        eval(
            "function P() { this.own = 1; }
             P.prototype.shared = 2;
             P.prototype.own = 3;
             var keys = [];
             for (var k in new P()) keys.push(k);
             keys.join(',')"
        ),
        JsValue::from("own,shared")
    );
    assert_eq!(
        eval("var keys = []; for (var k in [7, 8]) keys.push(typeof k + k); keys.join()"),
        JsValue::from("string0,string1")
    );
    assert_eq!(
        eval("var n = 0; for (var k in null) n++; for (var k in undefined) n++; n"),
        JsValue::Number(0.0)
    );
}

#[test]
fn test_for_in_skips_deleted_keys() {
    assert_eq!(
        eval("var o = {a: 1, b: 2}; var seen = []; for (var k in o) { delete o.b; seen.push(k); } seen.join()"),
        JsValue::from("a")
    );
}

#[test]
fn test_for_in_with_member_target() {
    assert_eq!(
        eval("var holder = {}; var keys = []; for (holder.k in {x: 1, y: 2}) keys.push(holder.k); keys.join()"),
        JsValue::from("x,y")
    );
}

#[test]
fn test_try_catch() {
    assert_eq!(eval("try { throw 1; } catch (e) { e; }"), JsValue::Number(1.0));
    assert_eq!(
        eval("var r; try { undefinedFn(); } catch (e) { r = e.name; } r"),
        JsValue::from("ReferenceError")
    );
}

#[test]
fn test_finally_runs_before_throw_propagates() {
    assert_eq!(
        eval(
            "var log = [];
             try {
                 try { throw 'x'; } finally { log.push('finally'); }
             } catch (e) { log.push('caught ' + e); }
             log.join(',')"
        ),
        JsValue::from("finally,caught x")
    );
}

#[test]
fn test_finally_return_overrides() {
    assert_eq!(
        eval("function f() { try { return 1; } finally { return 2; } } f()"),
        JsValue::Number(2.0)
    );
    assert_eq!(
        eval("function f() { try { throw 'lost'; } finally { return 'kept'; } } f()"),
        JsValue::from("kept")
    );
    assert_eq!(
        eval("function f() { for (;;) { try { break; } finally { return 'f'; } } } f()"),
        JsValue::from("f")
    );
}

#[test]
fn test_catch_scope_is_local() {
    assert_eq!(
        eval("var e = 'outer'; try { throw 'inner'; } catch (e) { } e"),
        JsValue::from("outer")
    );
}

#[test]
fn test_rethrow_from_catch() {
    throws_error("try { throw 1; } catch (e) { throw e + 1; }", "Uncaught 2");
}

#[test]
fn test_uncaught_throw_reaches_host() {
    let result = eval_result("throw 'boom';");
    assert!(matches!(result, Err(JsError::Thrown(JsValue::String(ref s))) if s.as_str() == "boom"));
}

#[test]
fn test_with_statement() {
    assert_eq!(
        eval("var o = {a: 1}; var a = 'global'; var r; with (o) { r = a; a = 2; } r + ':' + o.a + ':' + a"),
        JsValue::from("1:2:global")
    );
}

#[test]
fn test_completion_value_of_loops() {
    assert_eq!(
        eval("var o = {}; o.x = 5; for (var k in o) { k; }"),
        JsValue::from("x")
    );
}
