//! Global built-in functions (eval, print, parseInt, parseFloat, escape, etc.)

use tracing::trace;

use crate::error::JsError;
use crate::interpreter::Interpreter;
use crate::ops::to_int32;
use crate::parser::Parser;
use crate::platform::ConsoleLevel;
use crate::value::{CheapClone, JsString, JsValue, is_js_whitespace};

/// Characters `escape` leaves untouched besides ASCII letters and digits
const ESCAPE_UNRESERVED: &str = "@*_+-./";

/// Install the native global services on the global object
pub fn init_global_functions(interp: &mut Interpreter) {
    interp.register_global_function("eval", global_eval, 1);
    interp.register_global_function("print", global_print, 1);
    interp.register_global_function("isNaN", global_is_nan, 1);
    interp.register_global_function("isFinite", global_is_finite, 1);
    interp.register_global_function("parseInt", global_parse_int, 2);
    interp.register_global_function("parseFloat", global_parse_float, 1);
    interp.register_global_function("escape", global_escape, 1);
    interp.register_global_function("unescape", global_unescape, 1);
}

/// eval(source) - runs in the invoking scope; non-strings come back unchanged
pub fn global_eval(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let source = match args.first() {
        Some(JsValue::String(source)) => source.cheap_clone(),
        Some(other) => return Ok(other.clone()),
        None => return Ok(JsValue::Undefined),
    };
    trace!(len = source.len(), "eval");

    let program = Parser::new(&source).parse_program()?;
    let scope = interp.scope.cheap_clone();
    interp.evaluate_in(&program, &scope)
}

/// print(...values) - writes the values, space separated, to the console
pub fn global_print(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let mut parts = Vec::with_capacity(args.len());
    for arg in args {
        parts.push(interp.to_js_string(arg)?.to_string());
    }
    if interp.config().echo_print {
        interp.console_write(ConsoleLevel::Log, &parts.join(" "));
    }
    Ok(JsValue::Undefined)
}

fn string_arg(interp: &mut Interpreter, args: &[JsValue]) -> Result<JsString, JsError> {
    match args.first() {
        Some(value) => interp.to_js_string(value),
        None => Ok(JsString::from("undefined")),
    }
}

fn number_arg(interp: &mut Interpreter, args: &[JsValue]) -> Result<f64, JsError> {
    match args.first() {
        Some(value) => interp.to_number(value),
        None => Ok(f64::NAN),
    }
}

pub fn global_is_nan(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::Boolean(number_arg(interp, args)?.is_nan()))
}

pub fn global_is_finite(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::Boolean(number_arg(interp, args)?.is_finite()))
}

/// parseInt(string, radix) - radix 0 or absent means 10, or 16 after a `0x` prefix
pub fn global_parse_int(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let string = string_arg(interp, args)?;
    let radix = match args.get(1) {
        Some(value) => to_int32(interp.to_number(value)?),
        None => 0,
    };
    Ok(JsValue::Number(parse_int(&string, radix)))
}

fn parse_int(string: &str, radix: i32) -> f64 {
    let s = string.trim_start_matches(is_js_whitespace);

    let (negative, s) = if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest)
    } else {
        (false, s)
    };

    let hex_body = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"));
    let (radix, s) = match (radix, hex_body) {
        (0, Some(body)) | (16, Some(body)) => (16, body),
        (0, None) => (10, s),
        (r, _) if (2..=36).contains(&r) => (r as u32, s),
        _ => return f64::NAN,
    };

    let mut result = 0.0;
    let mut found_digit = false;
    for c in s.chars() {
        let Some(digit) = c.to_digit(radix) else {
            break;
        };
        found_digit = true;
        result = result * f64::from(radix) + f64::from(digit);
    }

    if !found_digit {
        return f64::NAN;
    }
    if negative { -result } else { result }
}

/// parseFloat(string) - longest decimal literal prefix, `Infinity` included
pub fn global_parse_float(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let string = string_arg(interp, args)?;
    Ok(JsValue::Number(parse_float(&string)))
}

fn parse_float(string: &str) -> f64 {
    let s = string.trim_start_matches(is_js_whitespace);

    let (sign, unsigned) = match s.chars().next() {
        Some('-') => (-1.0, s.get(1..).unwrap_or("")),
        Some('+') => (1.0, s.get(1..).unwrap_or("")),
        _ => (1.0, s),
    };
    if unsigned.starts_with("Infinity") {
        return sign * f64::INFINITY;
    }

    let mut num_str = String::new();
    let mut has_dot = false;
    let mut has_exp = false;
    let mut chars = unsigned.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            '0'..='9' => num_str.push(c),
            '.' if !has_dot && !has_exp => {
                has_dot = true;
                num_str.push(c);
            }
            'e' | 'E' if !has_exp && !num_str.is_empty() => {
                // Only an exponent when digits follow (after an optional sign)
                let mut lookahead = chars.clone();
                lookahead.next();
                let exp_sign = lookahead.next_if(|c| matches!(c, '+' | '-'));
                if !lookahead.peek().is_some_and(char::is_ascii_digit) {
                    break;
                }
                has_exp = true;
                num_str.push(c);
                num_str.extend(exp_sign);
                chars = lookahead;
                continue;
            }
            _ => break,
        }
        chars.next();
    }

    // A lone "." or an empty prefix is not a number
    match num_str.trim_end_matches('.').parse::<f64>() {
        Ok(n) if num_str != "." => sign * n,
        _ => f64::NAN,
    }
}

/// escape(string) - `%XX` for code units below 256, `%uXXXX` otherwise
pub fn global_escape(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let string = string_arg(interp, args)?;
    let mut out = String::with_capacity(string.len());
    let mut units = [0u16; 2];
    for c in string.chars() {
        if c.is_ascii_alphanumeric() || ESCAPE_UNRESERVED.contains(c) {
            out.push(c);
            continue;
        }
        for unit in c.encode_utf16(&mut units) {
            if *unit < 256 {
                out.push_str(&format!("%{:02X}", unit));
            } else {
                out.push_str(&format!("%u{:04X}", unit));
            }
        }
    }
    Ok(JsValue::from(out))
}

/// unescape(string) - reverses `escape`; malformed sequences stay literal
pub fn global_unescape(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let string = string_arg(interp, args)?;
    let chars: Vec<char> = string.chars().collect();
    let hex = |digits: &[char]| -> Option<u16> {
        let text: String = digits.iter().collect();
        if digits.iter().all(char::is_ascii_hexdigit) {
            u16::from_str_radix(&text, 16).ok()
        } else {
            None
        }
    };

    let mut units: Vec<u16> = Vec::with_capacity(chars.len());
    let mut i = 0;
    while let Some(&c) = chars.get(i) {
        if c == '%' {
            let long = chars.get(i + 1) == Some(&'u');
            let decoded = if long {
                chars.get(i + 2..i + 6).and_then(hex).map(|u| (u, 6))
            } else {
                chars.get(i + 1..i + 3).and_then(hex).map(|u| (u, 3))
            };
            if let Some((unit, consumed)) = decoded {
                units.push(unit);
                i += consumed;
                continue;
            }
        }
        let mut buf = [0u16; 2];
        units.extend_from_slice(c.encode_utf16(&mut buf));
        i += 1;
    }

    let decoded: String = char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect();
    Ok(JsValue::from(decoded))
}
