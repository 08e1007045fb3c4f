//! Number built-in methods

use crate::env::{Env, ObjectKind, PropertyKey};
use crate::error::JsError;
use crate::interpreter::Interpreter;
use crate::ops::to_integer;
use crate::value::{CheapClone, JsValue, number_to_string};

/// Initialize Number.prototype with toFixed, toString, toPrecision, toExponential, valueOf
pub fn init_number_prototype(interp: &mut Interpreter) {
    let proto = interp.realm.number_prototype.cheap_clone();

    interp.register_method(&proto, "toFixed", number_to_fixed, 1);
    interp.register_method(&proto, "toString", number_to_string_method, 1);
    interp.register_method(&proto, "toLocaleString", number_to_string_method, 0);
    interp.register_method(&proto, "toPrecision", number_to_precision, 1);
    interp.register_method(&proto, "toExponential", number_to_exponential, 1);
    interp.register_method(&proto, "valueOf", number_value_of, 0);
}

/// Create Number constructor with its constants
pub fn create_number_constructor(interp: &mut Interpreter) -> Env {
    let proto = interp.realm.number_prototype.cheap_clone();
    let constructor =
        interp.create_native_constructor("Number", number_call, number_construct, 1, &proto);

    let constants = [
        ("MAX_VALUE", f64::MAX),
        // Smallest positive denormal, as in ES3
        ("MIN_VALUE", 5e-324),
        ("NaN", f64::NAN),
        ("POSITIVE_INFINITY", f64::INFINITY),
        ("NEGATIVE_INFINITY", f64::NEG_INFINITY),
    ];
    for (name, value) in constants {
        constructor.define(PropertyKey::from(name), JsValue::Number(value));
    }

    constructor
}

/// Number(value) called as a function converts to a primitive number
pub fn number_call(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let n = match args.first() {
        Some(value) => interp.to_number(value)?,
        None => 0.0,
    };
    Ok(JsValue::Number(n))
}

/// new Number(value)
pub fn number_construct(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let n = match args.first() {
        Some(value) => interp.to_number(value)?,
        None => 0.0,
    };
    if let JsValue::Object(obj) = &this {
        *obj.kind_mut()? = ObjectKind::Number(n);
    }
    Ok(this)
}

/// Number.prototype.valueOf()
pub fn number_value_of(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::Number(this_number_value(&this)?))
}

/// Works for both primitive numbers and Number wrapper objects
fn this_number_value(this: &JsValue) -> Result<f64, JsError> {
    match this {
        JsValue::Number(n) => Ok(*n),
        JsValue::Object(obj) => match &*obj.kind() {
            ObjectKind::Number(n) => Ok(*n),
            _ => Err(JsError::type_error(
                "Number.prototype method called on incompatible receiver",
            )),
        },
        _ => Err(JsError::type_error(
            "Number.prototype method called on incompatible receiver",
        )),
    }
}

/// Integer digit-count argument, `None` when absent or undefined.
fn digits_argument(interp: &mut Interpreter, args: &[JsValue]) -> Result<Option<f64>, JsError> {
    match args.first() {
        None | Some(JsValue::Undefined) => Ok(None),
        Some(value) => Ok(Some(to_integer(interp.to_number(value)?))),
    }
}

// Number.prototype.toFixed
pub fn number_to_fixed(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let n = this_number_value(&this)?;
    let digits = digits_argument(interp, args)?.unwrap_or(0.0);

    if !(0.0..=100.0).contains(&digits) {
        return Err(JsError::range_error(
            "toFixed() digits argument must be between 0 and 100",
        ));
    }
    if !n.is_finite() || n.abs() >= 1e21 {
        return Ok(JsValue::from(number_to_string(n)));
    }

    let result = format!("{:.prec$}", n, prec = digits as usize);
    Ok(JsValue::from(strip_negative_zero(result)))
}

/// `(-0.0001).toFixed(2)` formats as "-0.00" in Rust but "0.00" in JS.
fn strip_negative_zero(s: String) -> String {
    match s.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => s,
    }
}

// Number.prototype.toString
pub fn number_to_string_method(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let n = this_number_value(&this)?;
    let radix = digits_argument(interp, args)?.unwrap_or(10.0);

    if !(2.0..=36.0).contains(&radix) {
        return Err(JsError::range_error(
            "toString() radix must be between 2 and 36",
        ));
    }
    if radix == 10.0 || !n.is_finite() {
        return Ok(JsValue::from(number_to_string(n)));
    }
    Ok(JsValue::from(to_radix_string(n, radix as u32)))
}

/// Digits of `n` in `radix`, fractional part limited to 20 digits.
fn to_radix_string(n: f64, radix: u32) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let digit = |d: u32| DIGITS.get(d as usize).map(|&b| b as char).unwrap_or('0');
    let base = f64::from(radix);

    let mut int_part = n.abs().trunc();
    let mut frac_part = n.abs() - int_part;

    let mut int_digits = Vec::new();
    if int_part == 0.0 {
        int_digits.push('0');
    }
    while int_part >= 1.0 {
        let d = (int_part % base) as u32;
        int_digits.push(digit(d));
        int_part = (int_part / base).trunc();
    }

    let mut out = String::new();
    if n < 0.0 {
        out.push('-');
    }
    out.extend(int_digits.iter().rev());

    if frac_part > 0.0 {
        out.push('.');
        for _ in 0..20 {
            frac_part *= base;
            let d = frac_part.trunc();
            out.push(digit(d as u32));
            frac_part -= d;
            if frac_part <= 0.0 {
                break;
            }
        }
    }
    out
}

/// Split `{:e}` output into its digit string and decimal exponent.
fn exponential_parts(formatted: &str) -> (String, i32) {
    let (mantissa, exponent) = formatted.split_once('e').unwrap_or((formatted, "0"));
    let digits = mantissa.chars().filter(char::is_ascii_digit).collect();
    (digits, exponent.parse().unwrap_or(0))
}

fn format_exponential(negative: bool, digits: &str, exponent: i32) -> String {
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    let mut chars = digits.chars();
    if let Some(first) = chars.next() {
        out.push(first);
    }
    let rest: String = chars.collect();
    if !rest.is_empty() {
        out.push('.');
        out.push_str(&rest);
    }
    out.push('e');
    out.push(if exponent >= 0 { '+' } else { '-' });
    out.push_str(&exponent.abs().to_string());
    out
}

// Number.prototype.toExponential
pub fn number_to_exponential(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let n = this_number_value(&this)?;
    let digits = digits_argument(interp, args)?;

    if !n.is_finite() {
        return Ok(JsValue::from(number_to_string(n)));
    }
    if let Some(d) = digits {
        if !(0.0..=100.0).contains(&d) {
            return Err(JsError::range_error(
                "toExponential() argument must be between 0 and 100",
            ));
        }
    }

    // Without an argument, as many digits as needed to round-trip
    let formatted = match digits {
        Some(d) => format!("{:.prec$e}", n.abs(), prec = d as usize),
        None => format!("{:e}", n.abs()),
    };
    let (digits, exponent) = exponential_parts(&formatted);
    Ok(JsValue::from(format_exponential(n < 0.0, &digits, exponent)))
}

// Number.prototype.toPrecision
pub fn number_to_precision(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let n = this_number_value(&this)?;
    let Some(precision) = digits_argument(interp, args)? else {
        return Ok(JsValue::from(number_to_string(n)));
    };

    if !n.is_finite() {
        return Ok(JsValue::from(number_to_string(n)));
    }
    if !(1.0..=100.0).contains(&precision) {
        return Err(JsError::range_error(
            "toPrecision() argument must be between 1 and 100",
        ));
    }
    let precision = precision as i32;

    if n == 0.0 {
        let zeros = "0".repeat((precision - 1) as usize);
        return Ok(JsValue::from(if zeros.is_empty() {
            "0".to_string()
        } else {
            format!("0.{zeros}")
        }));
    }

    let formatted = format!("{:.prec$e}", n.abs(), prec = (precision - 1) as usize);
    let (digits, exponent) = exponential_parts(&formatted);

    if exponent < -6 || exponent >= precision {
        return Ok(JsValue::from(format_exponential(n < 0.0, &digits, exponent)));
    }

    let mut out = String::new();
    if n < 0.0 {
        out.push('-');
    }
    if exponent >= 0 {
        let split = (exponent + 1) as usize;
        let (int_part, frac_part) = digits.split_at(split.min(digits.len()));
        out.push_str(int_part);
        if !frac_part.is_empty() {
            out.push('.');
            out.push_str(frac_part);
        }
    } else {
        out.push_str("0.");
        out.push_str(&"0".repeat((-exponent - 1) as usize));
        out.push_str(&digits);
    }
    Ok(JsValue::from(out))
}
