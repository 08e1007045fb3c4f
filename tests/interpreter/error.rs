//! Error object and native fault tests

use super::{eval, eval_result, throws_error};
use jswalk::{JsError, JsValue};

#[test]
fn test_error_construction() {
    assert_eq!(eval("new Error('boom').message"), JsValue::from("boom"));
    assert_eq!(eval("Error('no new').message"), JsValue::from("no new"));
    assert_eq!(eval("new Error().message"), JsValue::from(""));
    assert_eq!(eval("new Error().hasOwnProperty('message')"), JsValue::Boolean(false));
    assert_eq!(eval("String(new TypeError('bad'))"), JsValue::from("TypeError: bad"));
    assert_eq!(eval("String(new Error())"), JsValue::from("Error"));
}

#[test]
fn test_native_error_hierarchy() {
    assert_eq!(eval("new RangeError('r') instanceof Error"), JsValue::Boolean(true));
    assert_eq!(eval("new SyntaxError('s') instanceof TypeError"), JsValue::Boolean(false));
    assert_eq!(eval("new ReferenceError('x').name"), JsValue::from("ReferenceError"));
    assert_eq!(
        eval("Object.prototype.toString.call(new Error('e'))"),
        JsValue::from("[object Error]")
    );
}

#[test]
fn test_native_faults_become_error_objects() {
    assert_eq!(
        eval("try { null.x; } catch (e) { (e instanceof TypeError) + ':' + e.name; }"),
        JsValue::from("true:TypeError")
    );
    assert_eq!(
        eval("try { undefinedName; } catch (e) { e.message; }"),
        JsValue::from("undefinedName is not defined")
    );
    assert_eq!(
        eval("try { new Array(-5); } catch (e) { e instanceof RangeError; }"),
        JsValue::Boolean(true)
    );
    assert_eq!(
        eval("try { eval('var'); } catch (e) { e.name; }"),
        JsValue::from("SyntaxError")
    );
}

#[test]
fn test_custom_error_types() {
    assert_eq!(
        eval(
            "function ValidationError(msg) { this.message = msg; }
             ValidationError.prototype = new Error();
             ValidationError.prototype.name = 'ValidationError';
             try { throw new ValidationError('field required'); }
             catch (e) { (e instanceof Error) + ' ' + String(e); }"
        ),
        JsValue::from("true ValidationError: field required")
    );
}

#[test]
fn test_any_value_can_be_thrown() {
    assert_eq!(eval("try { throw 42; } catch (e) { e + 1; }"), JsValue::Number(43.0));
    assert_eq!(eval("try { throw null; } catch (e) { e; }"), JsValue::Null);
    match eval_result("throw {code: 7}") {
        Err(JsError::Thrown(JsValue::Object(obj))) => {
            assert_eq!(obj.get(&"code".into()), Some(JsValue::Number(7.0)));
        }
        other => panic!("expected a thrown object, got {other:?}"),
    }
}

#[test]
fn test_uncaught_native_fault_keeps_its_kind() {
    assert!(matches!(eval_result("undefined.x"), Err(JsError::TypeError { .. })));
    throws_error("notDeclared", "ReferenceError");
}
