//! RegExp built-in methods
//!
//! Patterns compile lazily through the interpreter's regex provider and the
//! compiled form is cached on the object. Match positions handed to scripts
//! count characters; the provider works in byte offsets.

use std::rc::Rc;

use crate::env::{Env, ObjectKind, PropertyKey};
use crate::error::JsError;
use crate::intern::Token;
use crate::interpreter::Interpreter;
use crate::platform::CompiledRegex;
use crate::value::{CheapClone, JsString, JsValue};

/// Internal state of a RegExp object.
pub struct RegExpData {
    pub source: JsString,
    pub global: bool,
    pub ignore_case: bool,
    pub multiline: bool,
    compiled: Option<Rc<dyn CompiledRegex>>,
}

impl RegExpData {
    pub fn new(source: &str, flags: &str) -> Result<Self, JsError> {
        let mut data = RegExpData {
            source: JsString::from(source),
            global: false,
            ignore_case: false,
            multiline: false,
            compiled: None,
        };
        for flag in flags.chars() {
            let seen = match flag {
                'g' => std::mem::replace(&mut data.global, true),
                'i' => std::mem::replace(&mut data.ignore_case, true),
                'm' => std::mem::replace(&mut data.multiline, true),
                _ => true,
            };
            if seen {
                return Err(JsError::syntax_error(
                    format!("Invalid regular expression flags '{flags}'"),
                    0,
                    0,
                ));
            }
        }
        Ok(data)
    }

    pub fn flags(&self) -> String {
        let mut flags = String::new();
        if self.global {
            flags.push('g');
        }
        if self.ignore_case {
            flags.push('i');
        }
        if self.multiline {
            flags.push('m');
        }
        flags
    }
}

/// One successful match, positions in characters.
pub struct RegExpMatch {
    pub start: usize,
    pub end: usize,
    /// Group 0 is the whole match; unmatched groups are `None`.
    pub groups: Vec<Option<JsString>>,
}

/// Initialize RegExp.prototype with exec, test, toString
pub fn init_regexp_prototype(interp: &mut Interpreter) {
    let proto = interp.realm.regexp_prototype.cheap_clone();

    interp.register_method(&proto, "exec", regexp_exec, 1);
    interp.register_method(&proto, "test", regexp_test, 1);
    interp.register_method(&proto, "toString", regexp_to_string, 0);
}

/// Create RegExp constructor
pub fn create_regexp_constructor(interp: &mut Interpreter) -> Env {
    let proto = interp.realm.regexp_prototype.cheap_clone();
    interp.create_native_constructor("RegExp", regexp_call, regexp_construct, 2, &proto)
}

/// Build a RegExp object for a literal or a constructor call.
pub fn create_regexp(interp: &mut Interpreter, source: &str, flags: &str) -> Result<Env, JsError> {
    let data = RegExpData::new(source, flags)?;
    let obj = Env::new(
        ObjectKind::RegExp(Box::new(data)),
        Some(interp.realm.regexp_prototype.cheap_clone()),
    );
    define_regexp_properties(&obj);
    Ok(obj)
}

fn define_regexp_properties(obj: &Env) {
    let (source, global, ignore_case, multiline) = match &*obj.kind() {
        ObjectKind::RegExp(data) => (
            data.source.cheap_clone(),
            data.global,
            data.ignore_case,
            data.multiline,
        ),
        _ => return,
    };
    obj.define(Token::SOURCE, JsValue::String(source));
    obj.define(Token::GLOBAL, JsValue::Boolean(global));
    obj.define(Token::IGNORE_CASE, JsValue::Boolean(ignore_case));
    obj.define(Token::MULTILINE, JsValue::Boolean(multiline));
    obj.define(Token::LAST_INDEX, JsValue::Number(0.0));
}

/// Source and flags of the pattern arguments of `RegExp(pattern, flags)`.
fn pattern_arguments(
    interp: &mut Interpreter,
    args: &[JsValue],
) -> Result<(String, String), JsError> {
    let pattern = args.first().cloned().unwrap_or(JsValue::Undefined);
    let flags = args.get(1).cloned().unwrap_or(JsValue::Undefined);

    if let JsValue::Object(obj) = &pattern {
        let existing = match &*obj.kind() {
            ObjectKind::RegExp(data) => Some((data.source.to_string(), data.flags())),
            _ => None,
        };
        if let Some((source, own_flags)) = existing {
            if !flags.is_null_or_undefined() {
                return Err(JsError::type_error(
                    "Cannot supply flags when constructing one RegExp from another",
                ));
            }
            return Ok((source, own_flags));
        }
    }

    let source = match pattern {
        JsValue::Undefined => String::new(),
        other => interp.to_js_string(&other)?.to_string(),
    };
    let flags = match flags {
        JsValue::Undefined => String::new(),
        other => interp.to_js_string(&other)?.to_string(),
    };
    Ok((source, flags))
}

/// RegExp(pattern, flags): an existing RegExp without flags is returned as is
pub fn regexp_call(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    if let (Some(JsValue::Object(obj)), None | Some(JsValue::Undefined)) =
        (args.first(), args.get(1))
    {
        if matches!(&*obj.kind(), ObjectKind::RegExp(_)) {
            return Ok(JsValue::Object(obj.cheap_clone()));
        }
    }
    let (source, flags) = pattern_arguments(interp, args)?;
    Ok(JsValue::Object(create_regexp(interp, &source, &flags)?))
}

/// new RegExp(pattern, flags)
pub fn regexp_construct(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let (source, flags) = pattern_arguments(interp, args)?;
    let data = RegExpData::new(&source, &flags)?;
    if let JsValue::Object(obj) = &this {
        *obj.kind_mut()? = ObjectKind::RegExp(Box::new(data));
        define_regexp_properties(obj);
    }
    Ok(this)
}

fn this_regexp(this: &JsValue) -> Result<Env, JsError> {
    match this {
        JsValue::Object(obj) if matches!(&*obj.kind(), ObjectKind::RegExp(_)) => {
            Ok(obj.cheap_clone())
        }
        _ => Err(JsError::type_error(
            "RegExp.prototype method called on incompatible receiver",
        )),
    }
}

/// Whether `value` is a RegExp object.
pub fn is_regexp(value: &JsValue) -> bool {
    matches!(value, JsValue::Object(obj) if matches!(&*obj.kind(), ObjectKind::RegExp(_)))
}

pub fn is_global(re: &Env) -> bool {
    matches!(&*re.kind(), ObjectKind::RegExp(data) if data.global)
}

/// The compiled pattern, compiling and caching it on first use.
fn compiled_pattern(interp: &mut Interpreter, re: &Env) -> Result<Rc<dyn CompiledRegex>, JsError> {
    let (source, flags) = match &*re.kind() {
        ObjectKind::RegExp(data) => {
            if let Some(compiled) = &data.compiled {
                return Ok(Rc::clone(compiled));
            }
            (data.source.cheap_clone(), data.flags())
        }
        _ => return Err(JsError::type_error("not a RegExp")),
    };

    let compiled = interp.compile_regexp(&source, &flags)?;
    // A frozen RegExp simply recompiles next time
    if let Ok(mut kind) = re.kind_mut() {
        if let ObjectKind::RegExp(data) = &mut *kind {
            data.compiled = Some(Rc::clone(&compiled));
        }
    }
    Ok(compiled)
}

fn byte_offset(input: &str, char_index: usize) -> usize {
    input
        .char_indices()
        .nth(char_index)
        .map(|(offset, _)| offset)
        .unwrap_or(input.len())
}

fn char_offset(input: &str, byte_index: usize) -> usize {
    input
        .char_indices()
        .take_while(|(offset, _)| *offset < byte_index)
        .count()
}

/// Search `input` from character position `start`.
pub fn match_at(
    interp: &mut Interpreter,
    re: &Env,
    input: &str,
    start: usize,
) -> Result<Option<RegExpMatch>, JsError> {
    let compiled = compiled_pattern(interp, re)?;
    let found = compiled
        .find_at(input, byte_offset(input, start))
        .map_err(JsError::internal_error)?;
    let Some(found) = found else {
        return Ok(None);
    };

    let groups = found
        .captures
        .iter()
        .map(|capture| {
            capture.and_then(|(s, e)| input.get(s..e).map(JsString::from))
        })
        .collect();
    Ok(Some(RegExpMatch {
        start: char_offset(input, found.start),
        end: char_offset(input, found.end),
        groups,
    }))
}

fn last_index(interp: &mut Interpreter, re: &Env) -> Result<f64, JsError> {
    let value = re
        .get(&PropertyKey::Name(Token::LAST_INDEX))
        .unwrap_or_default();
    Ok(crate::ops::to_integer(interp.to_number(&value)?))
}

fn set_last_index(re: &Env, index: usize) -> Result<(), JsError> {
    re.put(
        PropertyKey::Name(Token::LAST_INDEX),
        JsValue::Number(index as f64),
    )
}

/// Run the pattern honouring `lastIndex` for global patterns.
pub fn exec_raw(
    interp: &mut Interpreter,
    re: &Env,
    input: &str,
) -> Result<Option<RegExpMatch>, JsError> {
    let global = is_global(re);
    let start = if global { last_index(interp, re)? } else { 0.0 };

    let length = input.chars().count();
    if start < 0.0 || start > length as f64 {
        if global {
            set_last_index(re, 0)?;
        }
        return Ok(None);
    }

    let found = match_at(interp, re, input, start as usize)?;
    if global {
        match &found {
            Some(m) => set_last_index(re, m.end)?,
            None => set_last_index(re, 0)?,
        }
    }
    Ok(found)
}

/// Array of groups carrying `index` and `input`, as `exec` and `match` return.
pub fn match_to_array(interp: &mut Interpreter, found: &RegExpMatch, input: &JsString) -> Env {
    let elements = found
        .groups
        .iter()
        .map(|group| match group {
            Some(s) => JsValue::String(s.cheap_clone()),
            None => JsValue::Undefined,
        })
        .collect();
    let array = interp.create_array(elements);
    array.init(Token::INDEX, JsValue::Number(found.start as f64));
    array.init(Token::INPUT, JsValue::String(input.cheap_clone()));
    array
}

/// RegExp.prototype.exec(string)
pub fn regexp_exec(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let re = this_regexp(&this)?;
    let input = interp.to_js_string(&args.first().cloned().unwrap_or(JsValue::Undefined))?;
    match exec_raw(interp, &re, &input)? {
        Some(found) => Ok(JsValue::Object(match_to_array(interp, &found, &input))),
        None => Ok(JsValue::Null),
    }
}

/// RegExp.prototype.test(string)
pub fn regexp_test(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let re = this_regexp(&this)?;
    let input = interp.to_js_string(&args.first().cloned().unwrap_or(JsValue::Undefined))?;
    Ok(JsValue::Boolean(exec_raw(interp, &re, &input)?.is_some()))
}

/// RegExp.prototype.toString() renders `/source/flags`
pub fn regexp_to_string(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    let re = this_regexp(&this)?;
    let text = match &*re.kind() {
        ObjectKind::RegExp(data) => format!("/{}/{}", data.source, data.flags()),
        _ => String::new(),
    };
    Ok(JsValue::from(text))
}
