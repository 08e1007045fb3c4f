//! Error constructors and Error.prototype

use crate::env::{Env, ObjectKind};
use crate::error::JsError;
use crate::function::NativeFn;
use crate::intern::Token;
use crate::interpreter::Interpreter;
use crate::value::{CheapClone, JsString, JsValue};

/// Native error names, in the order their constructors are installed.
const NATIVE_ERRORS: [&str; 4] = ["TypeError", "ReferenceError", "RangeError", "SyntaxError"];

/// Give Error.prototype its `name`, `message` and `toString`, and name the
/// native error prototypes.
pub fn init_error_prototypes(interp: &mut Interpreter) {
    let proto = interp.realm.error_prototype.cheap_clone();
    proto.define(Token::NAME, JsValue::from("Error"));
    proto.define(Token::MESSAGE, JsValue::from(""));
    interp.register_method(&proto, "toString", error_to_string, 0);

    for name in NATIVE_ERRORS {
        interp
            .realm
            .error_prototype_for(name)
            .define(Token::NAME, JsValue::from(name));
    }
}

/// Create Error and the native error constructors, paired with their global names.
pub fn create_error_constructors(interp: &mut Interpreter) -> Vec<(&'static str, Env)> {
    let constructors: [(&'static str, NativeFn); 5] = [
        ("Error", error_constructor),
        ("TypeError", type_error_constructor),
        ("ReferenceError", reference_error_constructor),
        ("RangeError", range_error_constructor),
        ("SyntaxError", syntax_error_constructor),
    ];
    constructors
        .into_iter()
        .map(|(name, func)| {
            let proto = interp.realm.error_prototype_for(name);
            let ctor = interp.create_native_constructor(name, func, func, 1, &proto);
            (name, ctor)
        })
        .collect()
}

/// Shared body of every error constructor: calling and constructing both
/// produce a fresh error object; `message` is only set when given.
fn construct_error(
    interp: &mut Interpreter,
    name: &str,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let proto = interp.realm.error_prototype_for(name);
    let err = Env::new(ObjectKind::Error, Some(proto));
    match args.first() {
        None | Some(JsValue::Undefined) => {}
        Some(message) => {
            let message = interp.to_js_string(message)?;
            err.define(Token::MESSAGE, JsValue::String(message));
        }
    }
    Ok(JsValue::Object(err))
}

fn error_constructor(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    construct_error(interp, "Error", args)
}

fn type_error_constructor(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    construct_error(interp, "TypeError", args)
}

fn reference_error_constructor(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    construct_error(interp, "ReferenceError", args)
}

fn range_error_constructor(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    construct_error(interp, "RangeError", args)
}

fn syntax_error_constructor(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    construct_error(interp, "SyntaxError", args)
}

/// Error.prototype.toString() - "name: message", or whichever part is non-empty
pub fn error_to_string(
    interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    let Some(obj) = this.as_object() else {
        return Err(JsError::type_error(
            "Error.prototype.toString called on non-object",
        ));
    };
    let name = match obj.get(&Token::NAME.into()) {
        None | Some(JsValue::Undefined) => JsString::from("Error"),
        Some(value) => interp.to_js_string(&value)?,
    };
    let message = match obj.get(&Token::MESSAGE.into()) {
        None | Some(JsValue::Undefined) => JsString::default(),
        Some(value) => interp.to_js_string(&value)?,
    };

    let text = if message.is_empty() {
        name
    } else if name.is_empty() {
        message
    } else {
        JsString::from(format!("{name}: {message}"))
    };
    Ok(JsValue::String(text))
}
