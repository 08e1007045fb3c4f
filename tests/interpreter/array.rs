//! Array tests

use super::{eval, throws_error};
use jswalk::JsValue;

// ═══════════════════════════════════════════════════════════════════════════════
// Construction and length
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_array_constructor_forms() {
    assert_eq!(eval("new Array(3).length"), JsValue::Number(3.0));
    assert_eq!(eval("new Array(1, 2).join()"), JsValue::from("1,2"));
    assert_eq!(eval("Array('3').length"), JsValue::Number(1.0));
    assert_eq!(eval("[].constructor === Array"), JsValue::Boolean(true));
    throws_error("new Array(-1)", "Invalid array length");
    throws_error("new Array(1.5)", "Invalid array length");
}

#[test]
fn test_length_tracks_writes() {
    assert_eq!(eval("var a = []; a[4] = 'x'; a.length"), JsValue::Number(5.0));
    assert_eq!(eval("var a = [1, 2, 3]; a.length = 1; a.join()"), JsValue::from("1"));
    assert_eq!(eval("var a = [1]; a.length = 3; a[2]"), JsValue::Undefined);
    assert_eq!(eval("var a = [1, 2]; delete a[0]; a.length"), JsValue::Number(2.0));
}

#[test]
fn test_oversized_lengths_are_range_errors() {
    throws_error("new Array(4294967295).length", "Invalid array length");
    throws_error(
        "Array.prototype.join.call({length: 4294967295}, '')",
        "Invalid array length",
    );
    throws_error(
        "(function () {}).apply(null, {length: 4294967295})",
        "Invalid array length",
    );
    assert_eq!(
        eval("try { new Array(4294967295); } catch (e) { e instanceof RangeError }"),
        JsValue::Boolean(true)
    );
    assert_eq!(
        eval("Array.prototype.join.call({length: 3, '1': 'b'}, '-')"),
        JsValue::from("-b-")
    );
}

#[test]
fn test_holes_are_not_own_keys() {
    assert_eq!(
        eval("var a = []; a[2] = 1; var c = 0; for (var k in a) c++; c"),
        JsValue::Number(1.0)
    );
    assert_eq!(eval("var a = [1, 2]; delete a[0]; 0 in a"), JsValue::Boolean(false));
    assert_eq!(eval("var a = [1, 2]; delete a[0]; 1 in a"), JsValue::Boolean(true));
    assert_eq!(eval("1 in [1, , 3]"), JsValue::Boolean(false));
    assert_eq!(eval("0 in new Array(2)"), JsValue::Boolean(false));
    assert_eq!(eval("var a = [1]; a.length = 3; 2 in a"), JsValue::Boolean(false));
    assert_eq!(eval("0 in [undefined]"), JsValue::Boolean(true));
}

#[test]
fn test_iteration_skips_holes() {
    assert_eq!(
        eval("var n = 0; [1, , 3].forEach(function () { n++; }); n"),
        JsValue::Number(2.0)
    );
    assert_eq!(
        eval("var m = [1, , 3].map(function (v) { return v * 2; }); m.length + ':' + (1 in m) + ':' + m.join()"),
        JsValue::from("3:false:2,,6")
    );
    assert_eq!(
        eval("[, 'a', , 'b'].filter(function () { return true; }).join()"),
        JsValue::from("a,b")
    );
    assert_eq!(
        eval("var a = []; a[5] = 2; a.reduce(function (x, y) { return x + y; }, 1)"),
        JsValue::Number(3.0)
    );
    assert_eq!(eval("[, 1].indexOf(undefined)"), JsValue::Number(-1.0));
    assert_eq!(
        eval("var a = [3, , undefined, 1]; a.sort(); a.length + ':' + a[0] + a[1] + ':' + (2 in a) + (3 in a)"),
        JsValue::from("4:13:truefalse")
    );
}

#[test]
fn test_elisions_and_trailing_comma() {
    assert_eq!(eval("[1, , 3].length"), JsValue::Number(3.0));
    assert_eq!(eval("[1, 2, ].length"), JsValue::Number(2.0));
    assert_eq!(eval("[, ][0]"), JsValue::Undefined);
}

// ═══════════════════════════════════════════════════════════════════════════════
// Mutators
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_stack_and_queue_methods() {
    assert_eq!(
        eval("var a = [1]; var n = a.push(2, 3); n + ':' + a.join()"),
        JsValue::from("3:1,2,3")
    );
    assert_eq!(eval("var a = [1, 2]; a.pop() + a.length"), JsValue::Number(3.0));
    assert_eq!(eval("[].pop()"), JsValue::Undefined);
    assert_eq!(
        eval("var a = [2, 3]; a.unshift(0, 1); a.shift() + ':' + a.join()"),
        JsValue::from("0:1,2,3")
    );
}

#[test]
fn test_splice() {
    assert_eq!(
        eval("var a = [1, 2, 3, 4, 5]; var r = a.splice(1, 2, 'x'); r.join() + '|' + a.join()"),
        JsValue::from("2,3|1,x,4,5")
    );
    assert_eq!(
        eval("var a = [1, 2, 3]; a.splice(-1, 1); a.join()"),
        JsValue::from("1,2")
    );
    assert_eq!(
        eval("var a = [1, 2]; a.splice(1, 0, 'a', 'b'); a.join()"),
        JsValue::from("1,a,b,2")
    );
}

#[test]
fn test_sort() {
    assert_eq!(eval("[10, 9, 1].sort().join()"), JsValue::from("1,10,9"));
    assert_eq!(
        eval("[10, 9, 1].sort(function (a, b) { return a - b; }).join()"),
        JsValue::from("1,9,10")
    );
    assert_eq!(
        eval("var a = [undefined, 'b', 'a']; a.sort(); a[0] + a[1] + a[2]"),
        JsValue::from("abundefined")
    );
    // Equal keys keep their relative order
    assert_eq!(
        eval(
            "var a = [{k: 1, v: 'a'}, {k: 0, v: 'b'}, {k: 1, v: 'c'}, {k: 0, v: 'd'}];
             a.sort(function (x, y) { return x.k - y.k; });
             a[0].v + a[1].v + a[2].v + a[3].v"
        ),
        JsValue::from("bdac")
    );
}

#[test]
fn test_sort_comparator_exception_propagates() {
    throws_error(
        "[3, 2, 1].sort(function () { throw new Error('cmp'); })",
        "Uncaught",
    );
}

#[test]
fn test_reverse_in_place() {
    assert_eq!(
        eval("var a = [1, 2, 3]; var b = a.reverse(); (a === b) + ':' + a.join()"),
        JsValue::from("true:3,2,1")
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Accessors and iteration
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_slice_concat_join() {
    assert_eq!(eval("[1, 2, 3, 4].slice(1, -1).join()"), JsValue::from("2,3"));
    assert_eq!(eval("[1].concat(2, [3, 4], [[5]]).length"), JsValue::Number(5.0));
    assert_eq!(eval("[1, null, undefined, 2].join('-')"), JsValue::from("1---2"));
    assert_eq!(eval("String([1, [2, 3]])"), JsValue::from("1,2,3"));
}

#[test]
fn test_index_of() {
    assert_eq!(eval("[1, 2, 1].indexOf(1)"), JsValue::Number(0.0));
    assert_eq!(eval("[1, 2, 1].lastIndexOf(1)"), JsValue::Number(2.0));
    assert_eq!(eval("[1, 2, 1].indexOf(1, 1)"), JsValue::Number(2.0));
    assert_eq!(eval("['1'].indexOf(1)"), JsValue::Number(-1.0));
}

#[test]
fn test_higher_order_methods() {
    assert_eq!(
        eval("[1, 2, 3].map(function (x, i) { return x * i; }).join()"),
        JsValue::from("0,2,6")
    );
    assert_eq!(
        eval("[1, 2, 3, 4].filter(function (x) { return x % 2; }).join()"),
        JsValue::from("1,3")
    );
    assert_eq!(
        eval("[1, 2, 3].reduce(function (acc, x) { return acc + x; })"),
        JsValue::Number(6.0)
    );
    assert_eq!(
        eval("[1, 2].reduce(function (acc, x) { return acc + x; }, 10)"),
        JsValue::Number(13.0)
    );
    assert_eq!(
        eval("var s = 0; [1, 2, 3].forEach(function (x) { s += x; }); s"),
        JsValue::Number(6.0)
    );
    assert_eq!(
        eval("var o = {n: 2}; [1].map(function (x) { return x * this.n; }, o)[0]"),
        JsValue::Number(2.0)
    );
    throws_error("[].reduce(function () {})", "TypeError");
    throws_error("[1].map(5)", "TypeError");
}

#[test]
fn test_generic_methods_on_array_likes() {
    assert_eq!(
        eval("var o = {length: 2, 0: 'a', 1: 'b'}; Array.prototype.join.call(o, '+')"),
        JsValue::from("a+b")
    );
    assert_eq!(
        eval("function f() { return Array.prototype.slice.call(arguments, 1).join(); } f(1, 2, 3)"),
        JsValue::from("2,3")
    );
}
