//! JSON built-in methods

use rustc_hash::FxHashSet;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::env::{Env, ObjectKind, PropertyKey};
use crate::error::JsError;
use crate::interpreter::Interpreter;
use crate::value::{JsString, JsValue};

/// Create the JSON namespace object
pub fn create_json_object(interp: &mut Interpreter) -> Env {
    let json = interp.create_object();

    interp.register_method(&json, "stringify", json_stringify, 3);
    interp.register_method(&json, "parse", json_parse, 2);

    json
}

/// JSON.stringify(value[, replacer, indent])
///
/// The replacer is ignored. A numeric indent means that many spaces (at most
/// 10), a string indent is used verbatim (first 10 characters).
pub fn json_stringify(
    _interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let value = args.first().cloned().unwrap_or(JsValue::Undefined);
    let mut visited = FxHashSet::default();
    let Some(json) = to_json(&value, &mut visited)? else {
        return Ok(JsValue::Undefined);
    };

    let indent = match args.get(2) {
        Some(JsValue::Number(n)) if *n >= 1.0 => " ".repeat(n.min(10.0) as usize),
        Some(JsValue::String(s)) => s.chars().take(10).collect(),
        _ => String::new(),
    };

    let output = if indent.is_empty() {
        json.to_string()
    } else {
        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
        json.serialize(&mut serializer)
            .map_err(|e| JsError::internal_error(format!("JSON serialization failed: {e}")))?;
        String::from_utf8(buffer)
            .map_err(|e| JsError::internal_error(format!("JSON serialization failed: {e}")))?
    };
    Ok(JsValue::from(output))
}

/// JSON.parse(text) - malformed input raises a SyntaxError
pub fn json_parse(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let text = interp.to_js_string(args.first().unwrap_or(&JsValue::Undefined))?;
    let json: serde_json::Value = serde_json::from_str(text.as_str()).map_err(|e| {
        JsError::syntax_error(
            format!("JSON.parse: {e}"),
            e.line() as u32,
            e.column() as u32,
        )
    })?;
    Ok(from_json(interp, &json))
}

fn number_to_json(n: f64) -> serde_json::Value {
    if !n.is_finite() {
        return serde_json::Value::Null;
    }
    // Integral values print without a fractional part
    if n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15 {
        return serde_json::Value::from(n as i64);
    }
    serde_json::Number::from_f64(n)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

/// Convert a value to JSON; `None` for values JSON has no form for
/// (undefined and functions), which objects omit and arrays write as null.
fn to_json(
    value: &JsValue,
    visited: &mut FxHashSet<usize>,
) -> Result<Option<serde_json::Value>, JsError> {
    let obj = match value {
        JsValue::Undefined => return Ok(None),
        JsValue::Null => return Ok(Some(serde_json::Value::Null)),
        JsValue::Boolean(b) => return Ok(Some(serde_json::Value::Bool(*b))),
        JsValue::Number(n) => return Ok(Some(number_to_json(*n))),
        JsValue::String(s) => return Ok(Some(serde_json::Value::String(s.to_string()))),
        JsValue::Object(obj) => obj,
    };

    if obj.is_callable() {
        return Ok(None);
    }
    if !visited.insert(obj.addr()) {
        return Err(JsError::type_error("Converting circular structure to JSON"));
    }

    let elements = match &*obj.kind() {
        ObjectKind::Array(elements) => Some(elements.clone()),
        ObjectKind::Boolean(b) => {
            visited.remove(&obj.addr());
            return Ok(Some(serde_json::Value::Bool(*b)));
        }
        ObjectKind::Number(n) => {
            visited.remove(&obj.addr());
            return Ok(Some(number_to_json(*n)));
        }
        ObjectKind::String(s) => {
            visited.remove(&obj.addr());
            return Ok(Some(serde_json::Value::String(s.to_string())));
        }
        ObjectKind::Date(t) => {
            visited.remove(&obj.addr());
            let iso = chrono::DateTime::from_timestamp_millis(*t as i64)
                .filter(|_| t.is_finite())
                .map(|dt| serde_json::Value::String(dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()))
                .unwrap_or(serde_json::Value::Null);
            return Ok(Some(iso));
        }
        _ => None,
    };

    let result = match elements {
        Some(elements) => {
            let mut items = Vec::with_capacity(elements.len());
            for element in elements.iter().map(|slot| slot.clone().unwrap_or_default()) {
                items.push(to_json(&element, visited)?.unwrap_or(serde_json::Value::Null));
            }
            serde_json::Value::Array(items)
        }
        None => {
            let mut map = serde_json::Map::new();
            for key in obj.own_keys() {
                let member = obj.get_own(&key).unwrap_or_default();
                if let Some(json) = to_json(&member, visited)? {
                    map.insert(key.to_js_string().to_string(), json);
                }
            }
            serde_json::Value::Object(map)
        }
    };

    visited.remove(&obj.addr());
    Ok(Some(result))
}

fn from_json(interp: &mut Interpreter, json: &serde_json::Value) -> JsValue {
    match json {
        serde_json::Value::Null => JsValue::Null,
        serde_json::Value::Bool(b) => JsValue::Boolean(*b),
        serde_json::Value::Number(n) => JsValue::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => JsValue::String(JsString::from(s.as_str())),
        serde_json::Value::Array(items) => {
            let elements = items.iter().map(|item| from_json(interp, item)).collect();
            JsValue::Object(interp.create_array(elements))
        }
        serde_json::Value::Object(map) => {
            let obj = interp.create_object();
            for (key, value) in map {
                let value = from_json(interp, value);
                obj.init(PropertyKey::from(key.as_str()), value);
            }
            JsValue::Object(obj)
        }
    }
}
