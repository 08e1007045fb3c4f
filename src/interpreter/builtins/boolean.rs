//! Boolean built-in constructor and prototype methods

use crate::env::{Env, ObjectKind};
use crate::error::JsError;
use crate::interpreter::Interpreter;
use crate::value::{CheapClone, JsValue};

/// Initialize Boolean.prototype with toString, valueOf
pub fn init_boolean_prototype(interp: &mut Interpreter) {
    let proto = interp.realm.boolean_prototype.cheap_clone();

    interp.register_method(&proto, "toString", boolean_to_string, 0);
    interp.register_method(&proto, "valueOf", boolean_value_of, 0);
}

/// Create Boolean constructor wired to Boolean.prototype
pub fn create_boolean_constructor(interp: &mut Interpreter) -> Env {
    let proto = interp.realm.boolean_prototype.cheap_clone();
    interp.create_native_constructor("Boolean", boolean_call, boolean_construct, 1, &proto)
}

/// Boolean(value) called as a function converts to a primitive boolean
pub fn boolean_call(
    _interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let value = args.first().cloned().unwrap_or(JsValue::Undefined);
    Ok(JsValue::Boolean(value.to_boolean()))
}

/// new Boolean(value) turns the fresh receiver into a Boolean wrapper
pub fn boolean_construct(
    _interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let value = args.first().cloned().unwrap_or(JsValue::Undefined);
    if let JsValue::Object(obj) = &this {
        *obj.kind_mut()? = ObjectKind::Boolean(value.to_boolean());
    }
    Ok(this)
}

/// Boolean.prototype.toString()
pub fn boolean_to_string(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    let b = this_boolean_value(&this)?;
    Ok(JsValue::from(if b { "true" } else { "false" }))
}

/// Boolean.prototype.valueOf()
pub fn boolean_value_of(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::Boolean(this_boolean_value(&this)?))
}

/// Works for both primitive booleans and Boolean wrapper objects
fn this_boolean_value(this: &JsValue) -> Result<bool, JsError> {
    match this {
        JsValue::Boolean(b) => Ok(*b),
        JsValue::Object(obj) => match &*obj.kind() {
            ObjectKind::Boolean(b) => Ok(*b),
            _ => Err(JsError::type_error(
                "Boolean.prototype method called on incompatible receiver",
            )),
        },
        _ => Err(JsError::type_error(
            "Boolean.prototype method called on incompatible receiver",
        )),
    }
}
