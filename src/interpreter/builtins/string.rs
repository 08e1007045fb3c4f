//! String built-in methods
//!
//! Positions count Unicode scalar values, so most methods work on the
//! string's characters rather than its UTF-8 bytes.

use crate::env::{Env, ObjectKind, PropertyKey};
use crate::error::JsError;
use crate::intern::Token;
use crate::interpreter::Interpreter;
use crate::ops::{to_integer, to_uint32};
use crate::value::{CheapClone, JsString, JsValue, is_js_whitespace};

use super::regexp::{self, RegExpMatch};
use super::relative_index;

/// Initialize String.prototype with all string methods.
pub fn init_string_prototype(interp: &mut Interpreter) {
    let proto = interp.realm.string_prototype.cheap_clone();

    // Character access
    interp.register_method(&proto, "charAt", string_char_at, 1);
    interp.register_method(&proto, "charCodeAt", string_char_code_at, 1);

    // Search methods
    interp.register_method(&proto, "indexOf", string_index_of, 1);
    interp.register_method(&proto, "lastIndexOf", string_last_index_of, 1);
    interp.register_method(&proto, "search", string_search, 1);
    interp.register_method(&proto, "match", string_match, 1);

    // Extraction methods
    interp.register_method(&proto, "slice", string_slice, 2);
    interp.register_method(&proto, "substring", string_substring, 2);
    interp.register_method(&proto, "substr", string_substr, 2);

    // Case conversion
    interp.register_method(&proto, "toLowerCase", string_to_lower_case, 0);
    interp.register_method(&proto, "toUpperCase", string_to_upper_case, 0);
    interp.register_method(&proto, "toLocaleLowerCase", string_to_lower_case, 0);
    interp.register_method(&proto, "toLocaleUpperCase", string_to_upper_case, 0);

    // Transformation methods
    interp.register_method(&proto, "trim", string_trim, 0);
    interp.register_method(&proto, "split", string_split, 2);
    interp.register_method(&proto, "replace", string_replace, 2);
    interp.register_method(&proto, "concat", string_concat, 1);
    interp.register_method(&proto, "localeCompare", string_locale_compare, 1);

    // Primitive conversion
    interp.register_method(&proto, "valueOf", string_value_of, 0);
    interp.register_method(&proto, "toString", string_to_string, 0);
}

/// Create String constructor with String.fromCharCode
pub fn create_string_constructor(interp: &mut Interpreter) -> Env {
    let proto = interp.realm.string_prototype.cheap_clone();
    let constructor =
        interp.create_native_constructor("String", string_call, string_construct, 1, &proto);
    interp.register_method(&constructor, "fromCharCode", string_from_char_code, 1);
    constructor
}

fn string_argument(interp: &mut Interpreter, args: &[JsValue]) -> Result<JsString, JsError> {
    match args.first() {
        Some(value) => interp.to_js_string(value),
        None => Ok(JsString::default()),
    }
}

/// String(value) called as a function converts to a primitive string
pub fn string_call(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::String(string_argument(interp, args)?))
}

/// new String(value)
pub fn string_construct(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = string_argument(interp, args)?;
    if let JsValue::Object(obj) = &this {
        *obj.kind_mut()? = ObjectKind::String(s);
    }
    Ok(this)
}

/// String.fromCharCode(...codes)
pub fn string_from_char_code(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let mut result = String::with_capacity(args.len());
    for arg in args {
        let code = to_uint32(interp.to_number(arg)?) & 0xFFFF;
        result.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
    }
    Ok(JsValue::from(result))
}

/// String.prototype.valueOf()
pub fn string_value_of(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::String(this_string_value(&this)?))
}

/// String.prototype.toString()
pub fn string_to_string(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::String(this_string_value(&this)?))
}

/// toString/valueOf only accept strings and String wrappers
fn this_string_value(this: &JsValue) -> Result<JsString, JsError> {
    match this {
        JsValue::String(s) => Ok(s.cheap_clone()),
        JsValue::Object(obj) => match &*obj.kind() {
            ObjectKind::String(s) => Ok(s.cheap_clone()),
            _ => Err(JsError::type_error(
                "String.prototype.toString requires that 'this' be a String",
            )),
        },
        _ => Err(JsError::type_error(
            "String.prototype.toString requires that 'this' be a String",
        )),
    }
}

/// The receiver of a generic string method, coerced to a string
fn this_string(interp: &mut Interpreter, this: &JsValue) -> Result<JsString, JsError> {
    if this.is_null_or_undefined() {
        return Err(JsError::type_error(
            "String.prototype method called on null or undefined",
        ));
    }
    interp.to_js_string(this)
}

fn integer_arg(interp: &mut Interpreter, args: &[JsValue], index: usize) -> Result<Option<f64>, JsError> {
    match args.get(index) {
        None | Some(JsValue::Undefined) => Ok(None),
        Some(value) => Ok(Some(to_integer(interp.to_number(value)?))),
    }
}

fn collect_range(chars: &[char], start: usize, end: usize) -> JsValue {
    let piece: String = chars.get(start..end).unwrap_or(&[]).iter().collect();
    JsValue::from(piece)
}

/// Character position of `needle` in `hay` at or after `from`.
fn find_chars(hay: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.len() > hay.len() {
        return None;
    }
    (from..=hay.len() - needle.len()).find(|&i| hay.get(i..i + needle.len()) == Some(needle))
}

/// String.prototype.charAt(pos)
pub fn string_char_at(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = this_string(interp, &this)?;
    let pos = integer_arg(interp, args, 0)?.unwrap_or(0.0);
    if pos < 0.0 {
        return Ok(JsValue::from(""));
    }
    Ok(match s.char_at(pos as usize) {
        Some(c) => JsValue::String(JsString::from(c)),
        None => JsValue::from(""),
    })
}

/// String.prototype.charCodeAt(pos)
pub fn string_char_code_at(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = this_string(interp, &this)?;
    let pos = integer_arg(interp, args, 0)?.unwrap_or(0.0);
    if pos < 0.0 {
        return Ok(JsValue::Number(f64::NAN));
    }
    Ok(match s.char_at(pos as usize) {
        Some(c) => JsValue::Number(f64::from(c as u32)),
        None => JsValue::Number(f64::NAN),
    })
}

/// String.prototype.indexOf(search, position)
pub fn string_index_of(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = this_string(interp, &this)?;
    let search = interp.to_js_string(&args.first().cloned().unwrap_or(JsValue::Undefined))?;
    let hay: Vec<char> = s.chars().collect();
    let needle: Vec<char> = search.chars().collect();
    let from = integer_arg(interp, args, 1)?.unwrap_or(0.0).clamp(0.0, hay.len() as f64) as usize;

    Ok(match find_chars(&hay, &needle, from) {
        Some(i) => JsValue::Number(i as f64),
        None => JsValue::Number(-1.0),
    })
}

/// String.prototype.lastIndexOf(search, position)
pub fn string_last_index_of(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = this_string(interp, &this)?;
    let search = interp.to_js_string(&args.first().cloned().unwrap_or(JsValue::Undefined))?;
    let hay: Vec<char> = s.chars().collect();
    let needle: Vec<char> = search.chars().collect();

    // NaN and absent positions search from the end
    let position = match args.get(1) {
        None | Some(JsValue::Undefined) => f64::INFINITY,
        Some(value) => {
            let n = interp.to_number(value)?;
            if n.is_nan() { f64::INFINITY } else { n.trunc() }
        }
    };
    if needle.len() > hay.len() {
        return Ok(JsValue::Number(-1.0));
    }
    let last_start = hay.len() - needle.len();
    let start = position.clamp(0.0, last_start as f64) as usize;

    let found = (0..=start)
        .rev()
        .find(|&i| hay.get(i..i + needle.len()) == Some(needle.as_slice()));
    Ok(JsValue::Number(found.map(|i| i as f64).unwrap_or(-1.0)))
}

/// String.prototype.slice(start, end) - negative positions count from the end
pub fn string_slice(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = this_string(interp, &this)?;
    let chars: Vec<char> = s.chars().collect();
    let len = chars.len();
    let start = relative_index(integer_arg(interp, args, 0)?.unwrap_or(0.0), len);
    let end = match integer_arg(interp, args, 1)? {
        Some(n) => relative_index(n, len),
        None => len,
    };
    if start >= end {
        return Ok(JsValue::from(""));
    }
    Ok(collect_range(&chars, start, end))
}

/// String.prototype.substring(start, end) - negatives clamp to 0, reversed bounds swap
pub fn string_substring(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = this_string(interp, &this)?;
    let chars: Vec<char> = s.chars().collect();
    let len = chars.len() as f64;
    let start = integer_arg(interp, args, 0)?.unwrap_or(0.0).clamp(0.0, len) as usize;
    let end = integer_arg(interp, args, 1)?.unwrap_or(len).clamp(0.0, len) as usize;
    let (from, to) = if start <= end { (start, end) } else { (end, start) };
    Ok(collect_range(&chars, from, to))
}

/// String.prototype.substr(start, length)
pub fn string_substr(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = this_string(interp, &this)?;
    let chars: Vec<char> = s.chars().collect();
    let len = chars.len();
    let start = relative_index(integer_arg(interp, args, 0)?.unwrap_or(0.0), len);
    let count = integer_arg(interp, args, 1)?.unwrap_or(f64::INFINITY);
    let count = count.clamp(0.0, (len - start) as f64) as usize;
    Ok(collect_range(&chars, start, start + count))
}

/// String.prototype.toLowerCase()
pub fn string_to_lower_case(
    interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = this_string(interp, &this)?;
    Ok(JsValue::from(s.to_lowercase()))
}

/// String.prototype.toUpperCase()
pub fn string_to_upper_case(
    interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = this_string(interp, &this)?;
    Ok(JsValue::from(s.to_uppercase()))
}

/// String.prototype.trim()
pub fn string_trim(
    interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = this_string(interp, &this)?;
    Ok(JsValue::from(s.trim_matches(is_js_whitespace)))
}

/// String.prototype.concat(...strings)
pub fn string_concat(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let mut result = this_string(interp, &this)?.to_string();
    for arg in args {
        result.push_str(&interp.to_js_string(arg)?);
    }
    Ok(JsValue::from(result))
}

/// String.prototype.localeCompare(other) - plain code point order
pub fn string_locale_compare(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = this_string(interp, &this)?;
    let other = interp.to_js_string(&args.first().cloned().unwrap_or(JsValue::Undefined))?;
    let ordering = s.as_str().cmp(other.as_str());
    Ok(JsValue::Number(ordering as i32 as f64))
}

/// A pattern argument as a RegExp object; strings compile as patterns.
fn pattern_regexp(interp: &mut Interpreter, pattern: &JsValue) -> Result<Env, JsError> {
    match pattern {
        JsValue::Object(obj) if regexp::is_regexp(pattern) => Ok(obj.cheap_clone()),
        JsValue::Undefined => regexp::create_regexp(interp, "", ""),
        other => {
            let source = interp.to_js_string(other)?;
            regexp::create_regexp(interp, &source, "")
        }
    }
}

/// Every match of a global pattern from the start; empty matches step one char.
fn all_matches(
    interp: &mut Interpreter,
    re: &Env,
    input: &str,
) -> Result<Vec<RegExpMatch>, JsError> {
    let length = input.chars().count();
    let mut matches = Vec::new();
    let mut position = 0;
    while position <= length {
        let Some(found) = regexp::match_at(interp, re, input, position)? else {
            break;
        };
        position = if found.end == found.start {
            found.end + 1
        } else {
            found.end
        };
        matches.push(found);
    }
    Ok(matches)
}

/// String.prototype.match(regexp)
pub fn string_match(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = this_string(interp, &this)?;
    let re = pattern_regexp(interp, &args.first().cloned().unwrap_or(JsValue::Undefined))?;

    if !regexp::is_global(&re) {
        return match regexp::exec_raw(interp, &re, &s)? {
            Some(found) => Ok(JsValue::Object(regexp::match_to_array(interp, &found, &s))),
            None => Ok(JsValue::Null),
        };
    }

    let matches = all_matches(interp, &re, &s)?;
    re.put(
        PropertyKey::Name(Token::LAST_INDEX),
        JsValue::Number(0.0),
    )?;
    if matches.is_empty() {
        return Ok(JsValue::Null);
    }
    let elements = matches
        .into_iter()
        .map(|m| match m.groups.into_iter().next().flatten() {
            Some(text) => JsValue::String(text),
            None => JsValue::from(""),
        })
        .collect();
    Ok(JsValue::Object(interp.create_array(elements)))
}

/// String.prototype.search(regexp) - ignores global and lastIndex
pub fn string_search(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = this_string(interp, &this)?;
    let re = pattern_regexp(interp, &args.first().cloned().unwrap_or(JsValue::Undefined))?;
    Ok(match regexp::match_at(interp, &re, &s, 0)? {
        Some(found) => JsValue::Number(found.start as f64),
        None => JsValue::Number(-1.0),
    })
}

/// String.prototype.split(separator, limit)
pub fn string_split(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = this_string(interp, &this)?;
    let separator = args.first().cloned().unwrap_or(JsValue::Undefined);
    let limit = match args.get(1) {
        None | Some(JsValue::Undefined) => u32::MAX as usize,
        Some(value) => to_uint32(interp.to_number(value)?) as usize,
    };

    let mut parts: Vec<JsValue> = Vec::new();
    if limit == 0 {
        return Ok(JsValue::Object(interp.create_array(parts)));
    }

    if matches!(separator, JsValue::Undefined) {
        parts.push(JsValue::String(s));
    } else if let (JsValue::Object(re), true) = (&separator, regexp::is_regexp(&separator)) {
        split_by_regexp(interp, re, &s, &mut parts)?;
    } else {
        let sep = interp.to_js_string(&separator)?;
        if sep.is_empty() {
            parts.extend(s.chars().map(|c| JsValue::String(JsString::from(c))));
        } else {
            parts.extend(s.split(sep.as_str()).map(JsValue::from));
        }
    }

    parts.truncate(limit);
    Ok(JsValue::Object(interp.create_array(parts)))
}

fn split_by_regexp(
    interp: &mut Interpreter,
    re: &Env,
    s: &JsString,
    parts: &mut Vec<JsValue>,
) -> Result<(), JsError> {
    let chars: Vec<char> = s.chars().collect();
    let size = chars.len();

    if size == 0 {
        if regexp::match_at(interp, re, s, 0)?.is_none() {
            parts.push(JsValue::String(s.cheap_clone()));
        }
        return Ok(());
    }

    // `p` is the end of the last separator, `q` where the next search starts
    let mut p = 0;
    let mut q = 0;
    while q < size {
        let Some(found) = regexp::match_at(interp, re, s, q)? else {
            break;
        };
        if found.start >= size {
            break;
        }
        if found.end == found.start && found.start == p {
            q = found.start + 1;
            continue;
        }
        parts.push(collect_range(&chars, p, found.start));
        parts.extend(found.groups.iter().skip(1).map(|group| match group {
            Some(text) => JsValue::String(text.cheap_clone()),
            None => JsValue::Undefined,
        }));
        p = found.end;
        q = if found.end == found.start {
            found.end + 1
        } else {
            found.end
        };
    }
    parts.push(collect_range(&chars, p, size));
    Ok(())
}

/// String.prototype.replace(pattern, replacement)
pub fn string_replace(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = this_string(interp, &this)?;
    let pattern = args.first().cloned().unwrap_or(JsValue::Undefined);
    let replacement = args.get(1).cloned().unwrap_or(JsValue::Undefined);
    let chars: Vec<char> = s.chars().collect();

    let matches = match &pattern {
        JsValue::Object(re) if regexp::is_regexp(&pattern) => {
            if regexp::is_global(re) {
                let found = all_matches(interp, re, &s)?;
                re.put(
                    PropertyKey::Name(Token::LAST_INDEX),
                    JsValue::Number(0.0),
                )?;
                found
            } else {
                regexp::match_at(interp, re, &s, 0)?.into_iter().collect()
            }
        }
        other => {
            let search = interp.to_js_string(other)?;
            let needle: Vec<char> = search.chars().collect();
            find_chars(&chars, &needle, 0)
                .map(|start| RegExpMatch {
                    start,
                    end: start + needle.len(),
                    groups: vec![Some(search.cheap_clone())],
                })
                .into_iter()
                .collect()
        }
    };

    // The template is converted once, before any replacement happens
    let template = if replacement.is_callable() {
        None
    } else {
        Some(interp.to_js_string(&replacement)?)
    };

    let mut result = String::with_capacity(s.len());
    let mut last_end = 0;
    for found in &matches {
        result.extend(chars.get(last_end..found.start).unwrap_or(&[]));
        match &template {
            Some(template) => expand_replacement(&mut result, template, found, &chars),
            None => {
                let mut call_args: Vec<JsValue> = found
                    .groups
                    .iter()
                    .map(|group| match group {
                        Some(text) => JsValue::String(text.cheap_clone()),
                        None => JsValue::Undefined,
                    })
                    .collect();
                call_args.push(JsValue::Number(found.start as f64));
                call_args.push(JsValue::String(s.cheap_clone()));
                let value = interp.call_function(&replacement, JsValue::Undefined, &call_args)?;
                result.push_str(&interp.to_js_string(&value)?);
            }
        }
        last_end = found.end;
    }
    result.extend(chars.get(last_end..).unwrap_or(&[]));
    Ok(JsValue::from(result))
}

/// Expand `$$`, `$&`, `` $` ``, `$'` and `$1`..`$99` in a replacement template
fn expand_replacement(out: &mut String, template: &str, found: &RegExpMatch, input: &[char]) {
    let group_count = found.groups.len().saturating_sub(1);
    let template: Vec<char> = template.chars().collect();
    let mut i = 0;

    while let Some(&c) = template.get(i) {
        if c != '$' {
            out.push(c);
            i += 1;
            continue;
        }
        match template.get(i + 1).copied() {
            Some('$') => {
                out.push('$');
                i += 2;
            }
            Some('&') => {
                if let Some(Some(text)) = found.groups.first() {
                    out.push_str(text);
                }
                i += 2;
            }
            Some('`') => {
                out.extend(input.get(..found.start).unwrap_or(&[]));
                i += 2;
            }
            Some('\'') => {
                out.extend(input.get(found.end..).unwrap_or(&[]));
                i += 2;
            }
            Some(d) if d.is_ascii_digit() => {
                let one = d.to_digit(10).unwrap_or(0) as usize;
                let two = template
                    .get(i + 2)
                    .and_then(|c| c.to_digit(10))
                    .map(|d2| one * 10 + d2 as usize);
                // Prefer the two-digit group when it exists
                let (group, width) = match two {
                    Some(n) if (1..=group_count).contains(&n) => (n, 3),
                    _ if (1..=group_count).contains(&one) => (one, 2),
                    _ => (0, 0),
                };
                if width == 0 {
                    out.push('$');
                    i += 1;
                } else {
                    if let Some(Some(text)) = found.groups.get(group) {
                        out.push_str(text);
                    }
                    i += width;
                }
            }
            _ => {
                out.push('$');
                i += 1;
            }
        }
    }
}
