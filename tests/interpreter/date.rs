//! Date tests

use super::{eval, throws_error};
use jswalk::platform::FixedTimeProvider;
use jswalk::{Interpreter, JsValue};

#[test]
fn test_utc_and_components() {
    assert_eq!(eval("Date.UTC(2000, 0, 1)"), JsValue::Number(946_684_800_000.0));
    assert_eq!(
        eval("var d = new Date(2021, 11, 25, 10, 30, 15, 250); [d.getFullYear(), d.getMonth(), d.getDate(), d.getHours(), d.getMinutes(), d.getSeconds(), d.getMilliseconds()].join()"),
        JsValue::from("2021,11,25,10,30,15,250")
    );
    assert_eq!(eval("new Date(0).getDay()"), JsValue::Number(4.0));
    assert_eq!(eval("new Date(0).getTimezoneOffset()"), JsValue::Number(0.0));
}

#[test]
fn test_two_digit_years() {
    assert_eq!(eval("new Date(99, 0).getFullYear()"), JsValue::Number(1999.0));
    assert_eq!(eval("new Date(100, 0).getFullYear()"), JsValue::Number(100.0));
}

#[test]
fn test_setters_overflow_into_larger_units() {
    assert_eq!(
        eval("var d = new Date(2020, 0, 31); d.setMonth(1); d.getMonth() + '/' + d.getDate()"),
        JsValue::from("2/2")
    );
    assert_eq!(
        eval("var d = new Date(2020, 0, 1); d.setDate(0); d.getFullYear() + '-' + d.getMonth() + '-' + d.getDate()"),
        JsValue::from("2019-11-31")
    );
    assert_eq!(
        eval("var d = new Date(2020, 0, 1, 23); d.setHours(25); d.getDate() + ':' + d.getHours()"),
        JsValue::from("2:1")
    );
    assert_eq!(
        eval("var d = new Date(0); d.setTime(1000) === d.getTime()"),
        JsValue::Boolean(true)
    );
}

#[test]
fn test_invalid_dates() {
    assert_eq!(eval("String(new Date(NaN))"), JsValue::from("Invalid Date"));
    assert_eq!(eval("isNaN(new Date('not a date').getTime())"), JsValue::Boolean(true));
    assert_eq!(eval("isNaN(new Date(8.64e15 + 1).getTime())"), JsValue::Boolean(true));
    assert_eq!(
        eval("var d = new Date(NaN); d.setFullYear(2001); d.getFullYear()"),
        JsValue::Number(2001.0)
    );
    throws_error("new Date(NaN).toISOString()", "RangeError");
}

#[test]
fn test_string_forms() {
    assert_eq!(
        eval("new Date(0).toString()"),
        JsValue::from("Thu Jan 01 1970 00:00:00 GMT+0000")
    );
    assert_eq!(
        eval("new Date(Date.UTC(2001, 8, 9, 1, 46, 40)).toISOString()"),
        JsValue::from("2001-09-09T01:46:40.000Z")
    );
    assert_eq!(eval("typeof Date()"), JsValue::from("string"));
}

#[test]
fn test_parse_accepts_own_output() {
    assert_eq!(
        eval("Date.parse('2000-01-01T00:00:00Z')"),
        JsValue::Number(946_684_800_000.0)
    );
    assert_eq!(
        eval("var d = new Date(123456789000); Date.parse(d.toString()) === d.getTime()"),
        JsValue::Boolean(true)
    );
    assert_eq!(
        eval("var d = new Date(123456789000); Date.parse(d.toUTCString()) === d.getTime()"),
        JsValue::Boolean(true)
    );
    assert_eq!(eval("new Date('2000-01-02').getDate()"), JsValue::Number(2.0));
}

#[test]
fn test_date_arithmetic() {
    assert_eq!(eval("new Date(5000) - new Date(2000)"), JsValue::Number(3000.0));
    assert_eq!(eval("new Date(1) < new Date(2)"), JsValue::Boolean(true));
    assert_eq!(eval("new Date(new Date(77000)).getTime()"), JsValue::Number(77000.0));
}

#[test]
fn test_now_uses_clock_provider() {
    let mut interp = Interpreter::new();
    interp.set_clock(FixedTimeProvider(1_600_000_000_000));
    assert_eq!(
        interp.eval_source("Date.now()").unwrap(),
        JsValue::Number(1_600_000_000_000.0)
    );
    assert_eq!(
        interp.eval_source("new Date().getFullYear()").unwrap(),
        JsValue::Number(2020.0)
    );
}
