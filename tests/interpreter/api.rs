//! Host-facing API: environments, references, native registration, providers

use jswalk::platform::{FixedTimeProvider, StdRandomProvider};
use jswalk::{
    BufferedConsole, CheapClone, ConsoleLevel, Env, Interpreter, InterpreterConfig, JsError,
    JsValue, ObjectKind, PropertyKey,
};

fn key(name: &str) -> PropertyKey {
    PropertyKey::from(name)
}

#[test]
fn test_chained_get_falls_back_to_parent() {
    let parent = Env::new(ObjectKind::Ordinary, None);
    let child = Env::new(ObjectKind::Ordinary, Some(parent.cheap_clone()));
    parent.put(key("k"), JsValue::Number(1.0)).unwrap();
    assert_eq!(child.get(&key("k")), parent.get(&key("k")));

    child.put(key("k"), JsValue::Number(2.0)).unwrap();
    assert_eq!(child.get(&key("k")), Some(JsValue::Number(2.0)));
    assert_eq!(parent.get(&key("k")), Some(JsValue::Number(1.0)));
}

#[test]
fn test_update_writes_to_owner_only() {
    let parent = Env::new(ObjectKind::Scope, None);
    let child = Env::new_scope(&parent);
    parent.put(key("x"), JsValue::Number(1.0)).unwrap();

    assert!(child.update(key("x"), JsValue::Number(5.0)).unwrap());
    assert!(!child.owns(&key("x")));
    assert_eq!(parent.get(&key("x")), Some(JsValue::Number(5.0)));

    assert!(!child.update(key("missing"), JsValue::Null).unwrap());
    assert!(!child.has(&key("missing")));
}

#[test]
fn test_read_only_propagates_to_children() {
    let outer = Env::new(ObjectKind::Ordinary, None);
    let inner = Env::new(ObjectKind::Ordinary, None);
    outer.put(key("inner"), JsValue::Object(inner.cheap_clone())).unwrap();

    outer.set_read_only(true);
    assert!(matches!(
        outer.put(key("a"), JsValue::Null),
        Err(JsError::ReadOnly { .. })
    ));
    assert!(matches!(
        inner.put(key("a"), JsValue::Null),
        Err(JsError::ReadOnly { .. })
    ));
    assert!(matches!(outer.hide(&key("inner")), Err(JsError::ReadOnly { .. })));

    outer.set_read_only(false);
    assert!(inner.put(key("a"), JsValue::Null).is_ok());
    assert!(outer.update(key("inner"), JsValue::Null).unwrap());
}

#[test]
fn test_read_only_fault_is_not_catchable() {
    let mut interp = Interpreter::new();
    let frozen = interp.create_object();
    frozen.set_read_only(true);
    interp
        .global()
        .put(key("frozen"), JsValue::Object(frozen))
        .unwrap();

    let result = interp.eval_source("try { frozen.x = 1; } catch (e) { 'caught'; }");
    assert!(matches!(result, Err(JsError::ReadOnly { .. })));
}

#[test]
fn test_reference_reads_live_value() {
    let env = Env::new(ObjectKind::Scope, None);
    let r = env.reference(key("k"));
    env.put(key("k"), JsValue::Number(1.0)).unwrap();
    assert_eq!(r.get_value(), JsValue::Number(1.0));
    r.assign(JsValue::Number(2.0)).unwrap();
    assert_eq!(env.get(&key("k")), Some(JsValue::Number(2.0)));
}

#[test]
fn test_reference_prefix_and_postfix_decrement() {
    let mut interp = Interpreter::new();
    let env = Env::new(ObjectKind::Scope, None);
    env.put(key("x"), JsValue::Number(5.0)).unwrap();
    let x = env.reference(key("x"));

    assert_eq!(x.dec(&mut interp).unwrap(), JsValue::Number(4.0));
    assert_eq!(x.get_value(), JsValue::Number(4.0));

    env.put(key("x"), JsValue::Number(5.0)).unwrap();
    let pending = x.undec();
    assert_eq!(x.get_value(), JsValue::Number(5.0));
    assert_eq!(pending.force(&mut interp).unwrap(), JsValue::Number(5.0));
    assert_eq!(x.get_value(), JsValue::Number(4.0));
}

fn host_sum(interp: &mut Interpreter, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    let mut total = 0.0;
    for arg in args {
        total += interp.to_number(arg)?;
    }
    Ok(JsValue::Number(total))
}

fn host_fail(_interp: &mut Interpreter, _this: JsValue, _args: &[JsValue]) -> Result<JsValue, JsError> {
    Err(JsError::type_error("host refused"))
}

#[test]
fn test_registered_native_functions() {
    let mut interp = Interpreter::new();
    interp.register_global_function("sum", host_sum, 0);
    interp.register_global_function("fail", host_fail, 0);

    assert_eq!(
        interp.eval_source("sum(1, '2', 3)").unwrap(),
        JsValue::Number(6.0)
    );
    assert_eq!(
        interp
            .eval_source("try { fail(); } catch (e) { e.name + ': ' + e.message }")
            .unwrap(),
        JsValue::from("TypeError: host refused")
    );
}

#[test]
fn test_state_persists_between_evaluations() {
    let mut interp = Interpreter::new();
    interp.eval_source("var total = 1; function bump() { total *= 2; }").unwrap();
    interp.eval_source("bump(); bump();").unwrap();
    assert_eq!(interp.eval_source("total").unwrap(), JsValue::Number(4.0));
    assert_eq!(
        interp.global().get(&key("total")),
        Some(JsValue::Number(4.0))
    );
}

#[test]
fn test_call_function_from_host() {
    let mut interp = Interpreter::new();
    let f = interp
        .eval_source("(function (a, b) { return this.base + a * b; })")
        .unwrap();
    let receiver = interp.create_object();
    receiver.put(key("base"), JsValue::Number(100.0)).unwrap();
    let result = interp
        .call_function(
            &f,
            JsValue::Object(receiver),
            &[JsValue::Number(3.0), JsValue::Number(4.0)],
        )
        .unwrap();
    assert_eq!(result, JsValue::Number(112.0));
}

#[test]
fn test_console_provider_captures_print() {
    let console = BufferedConsole::new();
    let mut interp = Interpreter::new();
    interp.set_console(console.clone());
    interp.eval_source("print('hello', [1, 2]); print(undefined)").unwrap();
    assert_eq!(
        console.entries(),
        vec![
            (ConsoleLevel::Log, "hello 1,2".to_string()),
            (ConsoleLevel::Log, "undefined".to_string()),
        ]
    );
}

#[test]
fn test_deterministic_providers() {
    let mut a = Interpreter::new();
    a.set_random(StdRandomProvider::with_seed(7));
    let mut b = Interpreter::new();
    b.set_random(StdRandomProvider::with_seed(7));
    let script = "Math.random() + ',' + Math.random()";
    assert_eq!(a.eval_source(script).unwrap(), b.eval_source(script).unwrap());

    a.set_clock(FixedTimeProvider(1_000));
    assert_eq!(a.eval_source("new Date().getTime()").unwrap(), JsValue::Number(1000.0));
}

#[test]
fn test_config_from_json() {
    let config = InterpreterConfig::from_json(r#"{"step_limit": 50, "echo_print": false}"#).unwrap();
    assert_eq!(config.step_limit, Some(50));
    assert!(!config.echo_print);
    assert_eq!(config.max_call_depth, InterpreterConfig::default().max_call_depth);
    assert!(InterpreterConfig::from_json("{not json").is_err());
}

#[test]
fn test_parse_error_reports_location() {
    let result = Interpreter::new().eval_source("var a = 1;\nvar = 2;");
    match result {
        Err(JsError::SyntaxError { location, .. }) => assert_eq!(location.line, 2),
        other => panic!("expected a syntax error, got {other:?}"),
    }
}
