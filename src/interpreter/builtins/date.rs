//! Date built-in methods
//!
//! A date holds milliseconds since the epoch (NaN when invalid). Local time
//! is UTC here, so the `getUTC*`/`setUTC*` methods share the local ones.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::env::{Env, ObjectKind};
use crate::error::JsError;
use crate::function::NativeFn;
use crate::interpreter::Interpreter;
use crate::ops::to_integer;
use crate::value::{CheapClone, JsValue, PreferredType};

const MS_PER_DAY: f64 = 86_400_000.0;
/// Largest time value a date may hold (100 million days either side of the epoch)
const MAX_TIME: f64 = 8.64e15;

/// Calendar fields of a time value, in constructor argument order:
/// year, month (0-based), day of month, hours, minutes, seconds, milliseconds.
type Fields = [f64; 7];

const YEAR: usize = 0;
const MONTH: usize = 1;
const DAY: usize = 2;
const HOURS: usize = 3;
const MINUTES: usize = 4;
const SECONDS: usize = 5;
const MILLIS: usize = 6;

/// Round to whole milliseconds; out-of-range values become NaN.
fn time_clip(t: f64) -> f64 {
    if !t.is_finite() || t.abs() > MAX_TIME {
        f64::NAN
    } else {
        t.trunc() + 0.0
    }
}

fn to_datetime(t: f64) -> Option<NaiveDateTime> {
    if t.is_nan() {
        return None;
    }
    DateTime::from_timestamp_millis(t as i64).map(|dt| dt.naive_utc())
}

fn fields_of(t: f64) -> Option<Fields> {
    let dt = to_datetime(t)?;
    Some([
        f64::from(dt.year()),
        f64::from(dt.month0()),
        f64::from(dt.day()),
        f64::from(dt.hour()),
        f64::from(dt.minute()),
        f64::from(dt.second()),
        f64::from(dt.nanosecond() / 1_000_000),
    ])
}

/// Combine calendar fields into a time value. Months and days overflow into
/// the next larger unit (month 12 is January of the following year, day 0
/// the last day of the previous month).
fn make_time(fields: &Fields) -> f64 {
    if fields.iter().any(|f| !f.is_finite()) {
        return f64::NAN;
    }
    let [year, month, day, hours, minutes, seconds, millis] = fields.map(to_integer);

    let year = year + (month / 12.0).floor();
    let month = month.rem_euclid(12.0);
    if year.abs() > 400_000.0 {
        return f64::NAN;
    }
    let Some(first) = NaiveDate::from_ymd_opt(year as i32, month as u32 + 1, 1) else {
        return f64::NAN;
    };
    let Some(midnight) = first.and_hms_opt(0, 0, 0) else {
        return f64::NAN;
    };
    let month_start = midnight.and_utc().timestamp_millis() as f64;

    let time = hours * 3_600_000.0 + minutes * 60_000.0 + seconds * 1000.0 + millis;
    time_clip(month_start + (day - 1.0) * MS_PER_DAY + time)
}

/// Two-digit years in the constructor and `Date.UTC` mean 19xx.
fn full_year(year: f64) -> f64 {
    let y = to_integer(year);
    if (0.0..=99.0).contains(&y) { 1900.0 + y } else { year }
}

/// Parse the formats this implementation prints plus ISO 8601 variants.
/// Strings without an offset are read as UTC.
fn parse_date(s: &str) -> f64 {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.timestamp_millis() as f64;
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return dt.timestamp_millis() as f64;
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%a %b %d %Y %H:%M:%S GMT%z") {
        return dt.timestamp_millis() as f64;
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return dt.and_utc().timestamp_millis() as f64;
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis() as f64)
            .unwrap_or(f64::NAN);
    }
    f64::NAN
}

/// String form used by `toString` and by string conversion of dates
pub fn date_to_string(t: f64) -> String {
    match to_datetime(t) {
        Some(dt) => dt.format("%a %b %d %Y %H:%M:%S GMT+0000").to_string(),
        None => "Invalid Date".to_string(),
    }
}

/// Initialize Date.prototype
pub fn init_date_prototype(interp: &mut Interpreter) {
    let proto = interp.realm.date_prototype.cheap_clone();

    interp.register_method(&proto, "getTime", date_get_time, 0);
    interp.register_method(&proto, "valueOf", date_get_time, 0);
    interp.register_method(&proto, "getTimezoneOffset", date_get_timezone_offset, 0);

    let getters: [(&str, &str, NativeFn); 8] = [
        ("getFullYear", "getUTCFullYear", date_get_full_year),
        ("getMonth", "getUTCMonth", date_get_month),
        ("getDate", "getUTCDate", date_get_date),
        ("getDay", "getUTCDay", date_get_day),
        ("getHours", "getUTCHours", date_get_hours),
        ("getMinutes", "getUTCMinutes", date_get_minutes),
        ("getSeconds", "getUTCSeconds", date_get_seconds),
        ("getMilliseconds", "getUTCMilliseconds", date_get_milliseconds),
    ];
    for (local, utc, func) in getters {
        interp.register_method(&proto, local, func, 0);
        interp.register_method(&proto, utc, func, 0);
    }

    interp.register_method(&proto, "setTime", date_set_time, 1);
    let setters: [(&str, &str, NativeFn, usize); 7] = [
        ("setFullYear", "setUTCFullYear", date_set_full_year, 3),
        ("setMonth", "setUTCMonth", date_set_month, 2),
        ("setDate", "setUTCDate", date_set_date, 1),
        ("setHours", "setUTCHours", date_set_hours, 4),
        ("setMinutes", "setUTCMinutes", date_set_minutes, 3),
        ("setSeconds", "setUTCSeconds", date_set_seconds, 2),
        ("setMilliseconds", "setUTCMilliseconds", date_set_milliseconds, 1),
    ];
    for (local, utc, func, arity) in setters {
        interp.register_method(&proto, local, func, arity);
        interp.register_method(&proto, utc, func, arity);
    }

    interp.register_method(&proto, "toString", date_proto_to_string, 0);
    interp.register_method(&proto, "toISOString", date_to_iso_string, 0);
    interp.register_method(&proto, "toUTCString", date_to_utc_string, 0);
}

/// Create Date constructor with static methods (now, UTC, parse)
pub fn create_date_constructor(interp: &mut Interpreter) -> Env {
    let proto = interp.realm.date_prototype.cheap_clone();
    let constructor =
        interp.create_native_constructor("Date", date_call, date_construct, 7, &proto);

    interp.register_method(&constructor, "now", date_now, 0);
    interp.register_method(&constructor, "UTC", date_utc, 7);
    interp.register_method(&constructor, "parse", date_parse, 1);

    constructor
}

/// Date() called as a function ignores its arguments and returns the current time as a string
pub fn date_call(
    interp: &mut Interpreter,
    _this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::from(date_to_string(interp.now_millis())))
}

/// new Date(), new Date(ms), new Date(string), new Date(y, m[, d, h, min, s, ms])
pub fn date_construct(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let t = match args {
        [] => interp.now_millis(),
        [single] => match interp.to_primitive(single, PreferredType::Default)? {
            JsValue::String(s) => parse_date(&s),
            other => time_clip(interp.to_number(&other)?),
        },
        _ => time_from_components(interp, args)?,
    };
    if let JsValue::Object(obj) = &this {
        *obj.kind_mut()? = ObjectKind::Date(t);
    }
    Ok(this)
}

/// Fields from constructor-style arguments; missing day defaults to 1,
/// missing time parts to 0.
fn time_from_components(interp: &mut Interpreter, args: &[JsValue]) -> Result<f64, JsError> {
    let mut fields: Fields = [f64::NAN, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0];
    for (slot, arg) in fields.iter_mut().zip(args) {
        *slot = interp.to_number(arg)?;
    }
    fields[YEAR] = full_year(fields[YEAR]);
    Ok(make_time(&fields))
}

pub fn date_now(
    interp: &mut Interpreter,
    _this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::Number(interp.now_millis()))
}

pub fn date_utc(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::Number(time_from_components(interp, args)?))
}

pub fn date_parse(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let text = interp.to_js_string(args.first().unwrap_or(&JsValue::Undefined))?;
    Ok(JsValue::Number(parse_date(&text)))
}

/// Time value of a Date receiver
fn this_time_value(this: &JsValue) -> Result<f64, JsError> {
    match this.as_object().map(|obj| match &*obj.kind() {
        ObjectKind::Date(t) => Some(*t),
        _ => None,
    }) {
        Some(Some(t)) => Ok(t),
        _ => Err(JsError::type_error("this is not a Date object")),
    }
}

fn set_time_value(this: &JsValue, t: f64) -> Result<JsValue, JsError> {
    if let JsValue::Object(obj) = this {
        *obj.kind_mut()? = ObjectKind::Date(t);
    }
    Ok(JsValue::Number(t))
}

/// Read one calendar field of the receiver; NaN for an invalid date.
fn get_field(this: &JsValue, field: usize) -> Result<JsValue, JsError> {
    let t = this_time_value(this)?;
    let value = fields_of(t)
        .and_then(|fields| fields.get(field).copied())
        .unwrap_or(f64::NAN);
    Ok(JsValue::Number(value))
}

pub fn date_get_time(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::Number(this_time_value(&this)?))
}

pub fn date_get_timezone_offset(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    let t = this_time_value(&this)?;
    Ok(JsValue::Number(if t.is_nan() { f64::NAN } else { 0.0 }))
}

pub fn date_get_full_year(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    get_field(&this, YEAR)
}

pub fn date_get_month(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    get_field(&this, MONTH)
}

pub fn date_get_date(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    get_field(&this, DAY)
}

/// Day of the week, 0 = Sunday
pub fn date_get_day(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    let t = this_time_value(&this)?;
    let day = to_datetime(t)
        .map(|dt| f64::from(dt.weekday().num_days_from_sunday()))
        .unwrap_or(f64::NAN);
    Ok(JsValue::Number(day))
}

pub fn date_get_hours(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    get_field(&this, HOURS)
}

pub fn date_get_minutes(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    get_field(&this, MINUTES)
}

pub fn date_get_seconds(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    get_field(&this, SECONDS)
}

pub fn date_get_milliseconds(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    get_field(&this, MILLIS)
}

pub fn date_set_time(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    this_time_value(&this)?;
    let t = interp.to_number(args.first().unwrap_or(&JsValue::Undefined))?;
    set_time_value(&this, time_clip(t))
}

/// Overwrite consecutive calendar fields starting at `first` with the
/// arguments and store the recomputed time.
fn set_fields(
    interp: &mut Interpreter,
    this: &JsValue,
    args: &[JsValue],
    first: usize,
    max_args: usize,
) -> Result<JsValue, JsError> {
    let t = this_time_value(this)?;
    let current = match fields_of(t) {
        Some(fields) => fields,
        // Only setFullYear can revive an invalid date, starting from the epoch
        None if first == YEAR => [1970.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
        None => return set_time_value(this, f64::NAN),
    };

    if args.is_empty() {
        return set_time_value(this, f64::NAN);
    }
    let mut fields = current;
    for (slot, arg) in fields.iter_mut().skip(first).take(max_args).zip(args) {
        *slot = interp.to_number(arg)?;
    }
    set_time_value(this, make_time(&fields))
}

pub fn date_set_full_year(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    set_fields(interp, &this, args, YEAR, 3)
}

pub fn date_set_month(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    set_fields(interp, &this, args, MONTH, 2)
}

pub fn date_set_date(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    set_fields(interp, &this, args, DAY, 1)
}

pub fn date_set_hours(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    set_fields(interp, &this, args, HOURS, 4)
}

pub fn date_set_minutes(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    set_fields(interp, &this, args, MINUTES, 3)
}

pub fn date_set_seconds(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    set_fields(interp, &this, args, SECONDS, 2)
}

pub fn date_set_milliseconds(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    set_fields(interp, &this, args, MILLIS, 1)
}

pub fn date_proto_to_string(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::from(date_to_string(this_time_value(&this)?)))
}

pub fn date_to_iso_string(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    let t = this_time_value(&this)?;
    let Some(dt) = to_datetime(t) else {
        return Err(JsError::range_error("Invalid time value"));
    };
    Ok(JsValue::from(
        dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
    ))
}

pub fn date_to_utc_string(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    let t = this_time_value(&this)?;
    let text = match to_datetime(t) {
        Some(dt) => dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
        None => "Invalid Date".to_string(),
    };
    Ok(JsValue::from(text))
}
