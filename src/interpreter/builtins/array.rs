//! Array built-in methods
//!
//! Mutating methods require a real array; the read-only ones also accept
//! array-likes (anything with a `length` and indexed properties).

use crate::env::{Env, MAX_ARRAY_GAP, ObjectKind, PropertyKey};
use crate::error::JsError;
use crate::interpreter::Interpreter;
use crate::ops::{to_integer, to_uint32};
use crate::value::{CheapClone, JsString, JsValue};

use super::{array_like_elements, relative_index};

/// Initialize Array.prototype with all array methods
pub fn init_array_prototype(interp: &mut Interpreter) {
    let proto = interp.realm.array_prototype.cheap_clone();

    // Mutators
    interp.register_method(&proto, "push", array_push, 1);
    interp.register_method(&proto, "pop", array_pop, 0);
    interp.register_method(&proto, "shift", array_shift, 0);
    interp.register_method(&proto, "unshift", array_unshift, 1);
    interp.register_method(&proto, "splice", array_splice, 2);
    interp.register_method(&proto, "reverse", array_reverse, 0);
    interp.register_method(&proto, "sort", array_sort, 1);

    // Accessors
    interp.register_method(&proto, "slice", array_slice, 2);
    interp.register_method(&proto, "concat", array_concat, 1);
    interp.register_method(&proto, "join", array_join, 1);
    interp.register_method(&proto, "indexOf", array_index_of, 1);
    interp.register_method(&proto, "lastIndexOf", array_last_index_of, 1);
    interp.register_method(&proto, "toString", array_to_string, 0);

    // Iteration
    interp.register_method(&proto, "forEach", array_for_each, 1);
    interp.register_method(&proto, "map", array_map, 1);
    interp.register_method(&proto, "filter", array_filter, 1);
    interp.register_method(&proto, "reduce", array_reduce, 1);
}

/// Create Array constructor
pub fn create_array_constructor(interp: &mut Interpreter) -> Env {
    let proto = interp.realm.array_prototype.cheap_clone();
    interp.create_native_constructor("Array", array_call, array_construct, 1, &proto)
}

/// Array(n) creates n holes; Array(a, b, ...) lists its elements
pub fn array_call(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let elements = match args {
        [JsValue::Number(n)] => {
            let len = to_uint32(*n);
            if f64::from(len) != *n || len as usize > MAX_ARRAY_GAP {
                return Err(JsError::range_error("Invalid array length"));
            }
            vec![None; len as usize]
        }
        _ => args.iter().cloned().map(Some).collect(),
    };
    Ok(JsValue::Object(interp.create_sparse_array(elements)))
}

/// new Array(...) builds the same array a plain call does
pub fn array_construct(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    array_call(interp, JsValue::Undefined, args)
}

/// Run `f` on the element vector of a real array receiver.
fn with_elements<R>(
    this: &JsValue,
    method: &str,
    f: impl FnOnce(&mut Vec<Option<JsValue>>) -> R,
) -> Result<R, JsError> {
    let JsValue::Object(obj) = this else {
        return Err(JsError::type_error(format!(
            "Array.prototype.{method} called on non-array"
        )));
    };
    let mut kind = obj.kind_mut()?;
    match &mut *kind {
        ObjectKind::Array(elements) => Ok(f(elements)),
        _ => Err(JsError::type_error(format!(
            "Array.prototype.{method} called on non-array"
        ))),
    }
}

/// Snapshot of the receiver's elements; array-likes are read through
/// `length` and their indexed properties.
fn elements_of(
    interp: &mut Interpreter,
    this: &JsValue,
) -> Result<(Env, Vec<Option<JsValue>>), JsError> {
    let obj = interp.to_object(this)?;
    let elements = array_like_elements(interp, &obj)?;
    Ok((obj, elements))
}

fn integer_arg(interp: &mut Interpreter, args: &[JsValue], index: usize) -> Result<Option<f64>, JsError> {
    match args.get(index) {
        None | Some(JsValue::Undefined) => Ok(None),
        Some(value) => Ok(Some(to_integer(interp.to_number(value)?))),
    }
}

/// Array.prototype.push(...items) - returns the new length
pub fn array_push(
    _interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let len = with_elements(&this, "push", |elements| {
        elements.extend(args.iter().cloned().map(Some));
        elements.len()
    })?;
    Ok(JsValue::from(len))
}

/// Array.prototype.pop()
pub fn array_pop(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    let last = with_elements(&this, "pop", Vec::pop)?;
    Ok(last.flatten().unwrap_or_default())
}

/// Array.prototype.shift()
pub fn array_shift(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    let first = with_elements(&this, "shift", |elements| {
        if elements.is_empty() {
            None
        } else {
            elements.remove(0)
        }
    })?;
    Ok(first.unwrap_or_default())
}

/// Array.prototype.unshift(...items) - returns the new length
pub fn array_unshift(
    _interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let len = with_elements(&this, "unshift", |elements| {
        elements.splice(0..0, args.iter().cloned().map(Some));
        elements.len()
    })?;
    Ok(JsValue::from(len))
}

/// Array.prototype.splice(start, deleteCount, ...items) - returns the removed elements
pub fn array_splice(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let len = with_elements(&this, "splice", |elements| elements.len())?;
    let start = relative_index(integer_arg(interp, args, 0)?.unwrap_or(0.0), len);
    let delete_count = match args.get(1) {
        // Without a count everything from `start` goes
        None => len - start,
        Some(value) => {
            let n = to_integer(interp.to_number(value)?);
            n.clamp(0.0, (len - start) as f64) as usize
        }
    };
    let items = args.get(2..).unwrap_or(&[]);

    let removed = with_elements(&this, "splice", |elements| {
        // The receiver may have changed length while arguments were converted
        let start = start.min(elements.len());
        let end = (start + delete_count).min(elements.len());
        elements
            .splice(start..end, items.iter().cloned().map(Some))
            .collect::<Vec<_>>()
    })?;
    Ok(JsValue::Object(interp.create_sparse_array(removed)))
}

/// Array.prototype.reverse() - in place, returns the receiver
pub fn array_reverse(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    with_elements(&this, "reverse", |elements| elements.reverse())?;
    Ok(this)
}

/// Array.prototype.sort(comparator)
///
/// Stable. Without a comparator elements compare by their string forms;
/// undefined elements sort last, followed by the holes.
pub fn array_sort(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let elements = with_elements(&this, "sort", |elements| elements.clone())?;
    let comparator = args.first().cloned().unwrap_or(JsValue::Undefined);
    if !comparator.is_callable() && !matches!(comparator, JsValue::Undefined) {
        return Err(JsError::type_error(
            "The comparison function must be either a function or undefined",
        ));
    }

    let hole_count = elements.iter().filter(|slot| slot.is_none()).count();
    let mut undefined_count = 0;
    let mut defined = Vec::with_capacity(elements.len());
    for value in elements.into_iter().flatten() {
        match value {
            JsValue::Undefined => undefined_count += 1,
            value => defined.push(value),
        }
    }

    let mut sorted = if comparator.is_callable() {
        merge_sort(defined, &mut |a: &JsValue, b: &JsValue| {
            let result = interp.call_function(
                &comparator,
                JsValue::Undefined,
                &[a.clone(), b.clone()],
            )?;
            Ok(interp.to_number(&result)? > 0.0)
        })?
    } else {
        let mut keyed = Vec::with_capacity(defined.len());
        for value in defined {
            let key = interp.to_js_string(&value)?;
            keyed.push((key, value));
        }
        let keyed = merge_sort(keyed, &mut |a: &(JsString, JsValue), b: &(JsString, JsValue)| {
            Ok(a.0 > b.0)
        })?;
        keyed.into_iter().map(|(_, value)| value).collect()
    };
    sorted.extend(std::iter::repeat_n(JsValue::Undefined, undefined_count));
    let mut slots: Vec<Option<JsValue>> = sorted.into_iter().map(Some).collect();
    slots.extend(std::iter::repeat_n(None, hole_count));

    with_elements(&this, "sort", |elements| *elements = slots)?;
    Ok(this)
}

/// Stable merge sort with a fallible "a goes after b" predicate.
fn merge_sort<T>(
    items: Vec<T>,
    after: &mut impl FnMut(&T, &T) -> Result<bool, JsError>,
) -> Result<Vec<T>, JsError> {
    if items.len() <= 1 {
        return Ok(items);
    }
    let mut left = items;
    let right = left.split_off(left.len() / 2);
    let left = merge_sort(left, after)?;
    let right = merge_sort(right, after)?;

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => after(l, r)?,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        let next = if take_right { right.next() } else { left.next() };
        merged.extend(next);
    }
    Ok(merged)
}

/// Array.prototype.slice(start, end) - never mutates the receiver
pub fn array_slice(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let (_, elements) = elements_of(interp, &this)?;
    let len = elements.len();
    let start = relative_index(integer_arg(interp, args, 0)?.unwrap_or(0.0), len);
    let end = match integer_arg(interp, args, 1)? {
        Some(n) => relative_index(n, len),
        None => len,
    };
    let slice = elements.get(start..end.max(start)).unwrap_or(&[]).to_vec();
    Ok(JsValue::Object(interp.create_sparse_array(slice)))
}

/// Array.prototype.concat(...items) - array arguments are flattened one level
pub fn array_concat(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let (_, mut result) = elements_of(interp, &this)?;
    for arg in args {
        let nested = match arg {
            JsValue::Object(obj) => match &*obj.kind() {
                ObjectKind::Array(elements) => Some(elements.clone()),
                _ => None,
            },
            _ => None,
        };
        match nested {
            Some(elements) => result.extend(elements),
            None => result.push(Some(arg.clone())),
        }
    }
    Ok(JsValue::Object(interp.create_sparse_array(result)))
}

fn join_elements(
    interp: &mut Interpreter,
    elements: &[Option<JsValue>],
    separator: &str,
) -> Result<JsString, JsError> {
    let mut out = String::new();
    for (i, element) in elements.iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        if let Some(element) = element.as_ref().filter(|e| !e.is_null_or_undefined()) {
            out.push_str(&interp.to_js_string(element)?);
        }
    }
    Ok(JsString::from(out))
}

/// Array.prototype.join(separator) - null and undefined render as ""
pub fn array_join(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let (_, elements) = elements_of(interp, &this)?;
    let separator = match args.first() {
        None | Some(JsValue::Undefined) => JsString::from(","),
        Some(value) => interp.to_js_string(value)?,
    };
    Ok(JsValue::String(join_elements(interp, &elements, &separator)?))
}

/// Array.prototype.toString()
pub fn array_to_string(
    interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    let (_, elements) = elements_of(interp, &this)?;
    Ok(JsValue::String(join_elements(interp, &elements, ",")?))
}

/// Array.prototype.indexOf(search, fromIndex) - strict equality
pub fn array_index_of(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let (_, elements) = elements_of(interp, &this)?;
    let search = args.first().cloned().unwrap_or(JsValue::Undefined);
    let from = relative_index(integer_arg(interp, args, 1)?.unwrap_or(0.0), elements.len());

    let found = elements
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, element)| element.as_ref().is_some_and(|e| e.strict_equals(&search)))
        .map(|(i, _)| i as f64);
    Ok(JsValue::Number(found.unwrap_or(-1.0)))
}

/// Array.prototype.lastIndexOf(search, fromIndex)
pub fn array_last_index_of(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let (_, elements) = elements_of(interp, &this)?;
    let search = args.first().cloned().unwrap_or(JsValue::Undefined);
    let len = elements.len() as f64;
    let from = match integer_arg(interp, args, 1)? {
        Some(n) if n < 0.0 => len + n,
        Some(n) => n.min(len - 1.0),
        None => len - 1.0,
    };
    if from < 0.0 {
        return Ok(JsValue::Number(-1.0));
    }

    let found = elements
        .iter()
        .enumerate()
        .take(from as usize + 1)
        .rev()
        .find(|(_, element)| element.as_ref().is_some_and(|e| e.strict_equals(&search)))
        .map(|(i, _)| i as f64);
    Ok(JsValue::Number(found.unwrap_or(-1.0)))
}

/// The callback argument of the iteration methods.
fn callback_arg(args: &[JsValue], method: &str) -> Result<JsValue, JsError> {
    let callback = args.first().cloned().unwrap_or(JsValue::Undefined);
    if !callback.is_callable() {
        return Err(JsError::type_error(format!(
            "Array.prototype.{method}: {} is not a function",
            callback.type_of()
        )));
    }
    Ok(callback)
}

/// Visit each index below the starting length that is still present,
/// reading it live so earlier callbacks' writes are observed. Returns the
/// starting length.
fn for_each_present(
    interp: &mut Interpreter,
    this: &JsValue,
    mut visit: impl FnMut(&mut Interpreter, &Env, u32, JsValue) -> Result<(), JsError>,
) -> Result<usize, JsError> {
    let (obj, elements) = elements_of(interp, this)?;
    for i in 0..elements.len() as u32 {
        let key = PropertyKey::Index(i);
        if !obj.has(&key) {
            continue;
        }
        let value = obj.get(&key).unwrap_or_default();
        visit(interp, &obj, i, value)?;
    }
    Ok(elements.len())
}

/// Array.prototype.forEach(callback, thisArg)
pub fn array_for_each(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let callback = callback_arg(args, "forEach")?;
    let this_arg = args.get(1).cloned().unwrap_or(JsValue::Undefined);
    for_each_present(interp, &this, |interp, obj, i, value| {
        let call_args = [value, JsValue::from(i as usize), JsValue::Object(obj.cheap_clone())];
        interp.call_function(&callback, this_arg.clone(), &call_args)?;
        Ok(())
    })?;
    Ok(JsValue::Undefined)
}

/// Array.prototype.map(callback, thisArg)
pub fn array_map(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let callback = callback_arg(args, "map")?;
    let this_arg = args.get(1).cloned().unwrap_or(JsValue::Undefined);
    let mut mapped = Vec::new();
    let len = for_each_present(interp, &this, |interp, obj, i, value| {
        let call_args = [value, JsValue::from(i as usize), JsValue::Object(obj.cheap_clone())];
        let result = interp.call_function(&callback, this_arg.clone(), &call_args)?;
        // Skipped holes stay holes in the result
        mapped.resize(i as usize, None);
        mapped.push(Some(result));
        Ok(())
    })?;
    mapped.resize(len, None);
    Ok(JsValue::Object(interp.create_sparse_array(mapped)))
}

/// Array.prototype.filter(callback, thisArg)
pub fn array_filter(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let callback = callback_arg(args, "filter")?;
    let this_arg = args.get(1).cloned().unwrap_or(JsValue::Undefined);
    let mut kept = Vec::new();
    for_each_present(interp, &this, |interp, obj, i, value| {
        let call_args = [
            value.clone(),
            JsValue::from(i as usize),
            JsValue::Object(obj.cheap_clone()),
        ];
        if interp
            .call_function(&callback, this_arg.clone(), &call_args)?
            .to_boolean()
        {
            kept.push(value);
        }
        Ok(())
    })?;
    Ok(JsValue::Object(interp.create_array(kept)))
}

/// Array.prototype.reduce(callback, initialValue)
pub fn array_reduce(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let callback = callback_arg(args, "reduce")?;
    let mut accumulator = args.get(1).cloned();
    for_each_present(interp, &this, |interp, obj, i, value| {
        accumulator = Some(match accumulator.take() {
            None => value,
            Some(acc) => {
                let call_args = [
                    acc,
                    value,
                    JsValue::from(i as usize),
                    JsValue::Object(obj.cheap_clone()),
                ];
                interp.call_function(&callback, JsValue::Undefined, &call_args)?
            }
        });
        Ok(())
    })?;
    accumulator
        .ok_or_else(|| JsError::type_error("Reduce of empty array with no initial value"))
}
