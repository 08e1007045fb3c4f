//! Function.prototype built-in methods (call, apply, toString) and Function constructor

use crate::env::{Env, ObjectKind};
use crate::error::JsError;
use crate::function::JsFunction;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::value::{CheapClone, JsValue};

use super::array_like_elements;

/// Function.prototype itself: callable, ignores its arguments.
pub fn function_prototype_noop(
    _interp: &mut Interpreter,
    _this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::Undefined)
}

/// Initialize Function.prototype with call, apply, toString
pub fn init_function_prototype(interp: &mut Interpreter) {
    let proto = interp.realm.function_prototype.cheap_clone();

    interp.register_method(&proto, "call", function_call, 1);
    interp.register_method(&proto, "apply", function_apply, 2);
    interp.register_method(&proto, "toString", function_to_string, 0);
}

/// Create the global Function constructor
pub fn create_function_constructor(interp: &mut Interpreter) -> Env {
    let proto = interp.realm.function_prototype.cheap_clone();
    interp.create_native_constructor(
        "Function",
        function_constructor_fn,
        function_constructor_fn,
        1,
        &proto,
    )
}

/// The Function constructor: new Function([p1[, p2[, ...pN]],] body)
///
/// The last argument is the body, all preceding arguments are parameter
/// lists ("x" or "x, y"). The function closes over the global scope only.
fn function_constructor_fn(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let mut strings = Vec::with_capacity(args.len());
    for arg in args {
        strings.push(interp.to_js_string(arg)?.to_string());
    }
    let body = strings.pop().unwrap_or_default();
    let source = format!("(function anonymous({}) {{\n{}\n}})", strings.join(","), body);

    let program = Parser::new(&source).parse_program()?;
    let global = interp.global();
    interp.evaluate_in(&program, &global)
}

/// Function.prototype.call(thisArg, ...args)
pub fn function_call(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let this_arg = args.first().cloned().unwrap_or(JsValue::Undefined);
    let call_args = args.get(1..).unwrap_or(&[]);
    interp.call_function(&this, this_arg, call_args)
}

/// Function.prototype.apply(thisArg, argsArray)
///
/// Accepts arrays and array-likes (e.g. `arguments`).
pub fn function_apply(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let this_arg = args.first().cloned().unwrap_or(JsValue::Undefined);
    let call_args = match args.get(1) {
        None | Some(JsValue::Undefined) | Some(JsValue::Null) => Vec::new(),
        Some(JsValue::Object(list)) => unpack_arguments(interp, list)?,
        Some(_) => {
            return Err(JsError::type_error(
                "Function.prototype.apply: argument list has wrong type",
            ));
        }
    };
    interp.call_function(&this, this_arg, &call_args)
}

fn unpack_arguments(interp: &mut Interpreter, list: &Env) -> Result<Vec<JsValue>, JsError> {
    let elements = array_like_elements(interp, list)?;
    Ok(elements.into_iter().map(Option::unwrap_or_default).collect())
}

/// Function.prototype.toString()
pub fn function_to_string(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    let Some(obj) = this.as_object() else {
        return Err(JsError::type_error(
            "Function.prototype.toString requires that 'this' be a Function",
        ));
    };
    let text = match &*obj.kind() {
        ObjectKind::Function(JsFunction::Interpreted(f)) => {
            let params: Vec<&str> = f.code.params.iter().map(|p| p.name.as_str()).collect();
            let name = f.code.id.as_ref().map(|id| id.name.as_str()).unwrap_or("");
            format!("function {}({}) {{ [code] }}", name, params.join(", "))
        }
        ObjectKind::Function(JsFunction::Native(f)) => {
            format!("function {}() {{ [native code] }}", f.name)
        }
        _ => {
            return Err(JsError::type_error(
                "Function.prototype.toString requires that 'this' be a Function",
            ));
        }
    };
    Ok(JsValue::from(text))
}
