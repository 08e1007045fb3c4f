//! Built-in constructors, prototypes and global services

pub mod array;
pub mod boolean;
pub mod date;
pub mod error;
pub mod function;
pub mod global;
pub mod json;
pub mod math;
pub mod number;
pub mod object;
pub mod regexp;
pub mod string;

use crate::env::{Env, MAX_ARRAY_GAP, ObjectKind, PropertyKey};
use crate::error::JsError;
use crate::intern::Token;
use crate::interpreter::Interpreter;
use crate::ops::to_uint32;
use crate::value::JsValue;

/// Snapshot of an array's slots, or of an array-like's `length` indexed
/// properties (absent ones become holes).
///
/// Lengths beyond [`MAX_ARRAY_GAP`] are refused with a RangeError.
pub(crate) fn array_like_elements(
    interp: &mut Interpreter,
    obj: &Env,
) -> Result<Vec<Option<JsValue>>, JsError> {
    if let ObjectKind::Array(elements) = &*obj.kind() {
        return Ok(elements.clone());
    }
    let length = obj
        .get(&PropertyKey::Name(Token::LENGTH))
        .unwrap_or_default();
    let length = to_uint32(interp.to_number(&length)?) as usize;
    if length > MAX_ARRAY_GAP {
        return Err(JsError::range_error("Invalid array length"));
    }
    Ok((0..length as u32)
        .map(|i| obj.get(&PropertyKey::Index(i)))
        .collect())
}

/// Resolve a possibly negative position against `len` (negative counts from
/// the end), clamped to `0..=len`.
pub(crate) fn relative_index(n: f64, len: usize) -> usize {
    let len_f = len as f64;
    if n < 0.0 {
        (len_f + n).max(0.0) as usize
    } else {
        n.min(len_f) as usize
    }
}
