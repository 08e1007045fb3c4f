//! Object built-in methods

use crate::env::Env;
use crate::error::JsError;
use crate::interpreter::Interpreter;
use crate::value::{CheapClone, JsValue};

/// Initialize Object.prototype
pub fn init_object_prototype(interp: &mut Interpreter) {
    let proto = interp.realm.object_prototype.cheap_clone();

    interp.register_method(&proto, "hasOwnProperty", object_has_own_property, 1);
    interp.register_method(&proto, "toString", object_to_string, 0);
    interp.register_method(&proto, "toLocaleString", object_to_string, 0);
    interp.register_method(&proto, "valueOf", object_value_of, 0);
    interp.register_method(&proto, "isPrototypeOf", object_is_prototype_of, 1);
    interp.register_method(
        &proto,
        "propertyIsEnumerable",
        object_property_is_enumerable,
        1,
    );
}

/// Create Object constructor with static methods
pub fn create_object_constructor(interp: &mut Interpreter) -> Env {
    let proto = interp.realm.object_prototype.cheap_clone();
    let constructor =
        interp.create_native_constructor("Object", object_call, object_call, 1, &proto);

    interp.register_method(&constructor, "keys", object_keys, 1);

    constructor
}

/// Object(value): a fresh object for null/undefined, otherwise ToObject.
/// `new Object(value)` behaves the same.
pub fn object_call(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    match args.first() {
        None | Some(JsValue::Undefined) | Some(JsValue::Null) => {
            Ok(JsValue::Object(interp.create_object()))
        }
        Some(value) => Ok(JsValue::Object(interp.to_object(value)?)),
    }
}

/// Object.keys(obj) - own enumerable keys, in insertion order
pub fn object_keys(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let Some(JsValue::Object(obj)) = args.first() else {
        return Err(JsError::type_error("Object.keys called on non-object"));
    };
    let keys = obj
        .own_keys()
        .iter()
        .map(|key| JsValue::String(key.to_js_string()))
        .collect();
    Ok(JsValue::Object(interp.create_array(keys)))
}

pub fn object_has_own_property(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let key = interp.to_property_key(args.first().unwrap_or(&JsValue::Undefined))?;
    let obj = interp.to_object(&this)?;
    Ok(JsValue::Boolean(obj.owns(&key)))
}

/// Object.prototype.toString() - "[object Class]"
pub fn object_to_string(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    let class = match &this {
        JsValue::Undefined => "Undefined",
        JsValue::Null => "Null",
        JsValue::Boolean(_) => "Boolean",
        JsValue::Number(_) => "Number",
        JsValue::String(_) => "String",
        JsValue::Object(obj) => obj.class_name(),
    };
    Ok(JsValue::from(format!("[object {class}]")))
}

pub fn object_value_of(
    interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::Object(interp.to_object(&this)?))
}

/// Object.prototype.isPrototypeOf(value) - walks value's delegation chain
pub fn object_is_prototype_of(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let Some(JsValue::Object(value)) = args.first() else {
        return Ok(JsValue::Boolean(false));
    };
    let proto = interp.to_object(&this)?;
    let mut current = value.parent();
    while let Some(ancestor) = current {
        if ancestor.ptr_eq(&proto) {
            return Ok(JsValue::Boolean(true));
        }
        current = ancestor.parent();
    }
    Ok(JsValue::Boolean(false))
}

pub fn object_property_is_enumerable(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let key = interp.to_property_key(args.first().unwrap_or(&JsValue::Undefined))?;
    let obj = interp.to_object(&this)?;
    Ok(JsValue::Boolean(obj.owns(&key) && obj.is_enumerable(&key)))
}
