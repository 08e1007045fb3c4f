//! End-to-end scripts mixing several features

use super::eval;
use jswalk::JsValue;

#[test]
fn test_compound_assignment() {
    assert_eq!(eval("var x=1; x+=2; x;"), JsValue::Number(3.0));
}

#[test]
fn test_sort_then_join() {
    assert_eq!(
        eval("var a=[3,1,2]; a.sort(); a.join(\",\");"),
        JsValue::from("1,2,3")
    );
}

#[test]
fn test_addition_with_string_argument() {
    assert_eq!(
        eval("function f(a,b){return a+b;} f(2,\"3\");"),
        JsValue::from("23")
    );
}

#[test]
fn test_catch_value() {
    assert_eq!(eval("try { throw 1; } catch(e) { e; }"), JsValue::Number(1.0));
}

#[test]
fn test_for_in_single_key() {
    assert_eq!(
        eval("var o={}; o.x=5; var n = 0; for (var k in o) { n++; } n + k"),
        JsValue::from("1x")
    );
}

#[test]
fn test_string_slice() {
    assert_eq!(eval("\"abc\".slice(-2);"), JsValue::from("bc"));
}

#[test]
fn test_closure_counter() {
    assert_eq!(
        eval(
            "function counter() {
                 var n = 0;
                 return { next: function () { return ++n; }, reset: function () { n = 0; } };
             }
             var c = counter(); c.next(); c.next();
             var d = counter(); d.next();
             c.next() + d.next()"
        ),
        JsValue::Number(5.0)
    );
}

#[test]
fn test_prototype_inheritance() {
    assert_eq!(
        eval(
            "function Animal(name) { this.name = name; }
             Animal.prototype.speak = function () { return this.name + ' makes a sound'; };
             function Dog(name) { Animal.call(this, name); }
             Dog.prototype = new Animal();
             Dog.prototype.speak = function () { return this.name + ' barks'; };
             var d = new Dog('Rex');
             [d.speak(), d instanceof Animal, d.hasOwnProperty('speak')].join('|')"
        ),
        JsValue::from("Rex barks|true|false")
    );
}

#[test]
fn test_word_frequency() {
    assert_eq!(
        eval(
            "var text = 'the cat and the hat and the bat';
             var counts = {};
             var words = text.split(/\\s+/);
             for (var i = 0; i < words.length; i++) {
                 var w = words[i];
                 counts[w] = (counts[w] || 0) + 1;
             }
             var out = [];
             for (var k in counts) out.push(k + '=' + counts[k]);
             out.sort().join(' ')"
        ),
        JsValue::from("and=2 bat=1 cat=1 hat=1 the=3")
    );
}

#[test]
fn test_recursive_fibonacci() {
    assert_eq!(
        eval("function fib(n) { return n < 2 ? n : fib(n - 1) + fib(n - 2); } fib(15)"),
        JsValue::Number(610.0)
    );
}

#[test]
fn test_json_round_trip_of_built_structure() {
    assert_eq!(
        eval(
            "var rows = [];
             for (var i = 0; i < 3; i++) rows.push({id: i, even: i % 2 == 0});
             var copy = JSON.parse(JSON.stringify({rows: rows}));
             copy.rows[2].id + ':' + copy.rows[1].even"
        ),
        JsValue::from("2:false")
    );
}
