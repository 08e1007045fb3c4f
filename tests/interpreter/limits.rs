//! Host-enforced limits: step budget and call depth

use jswalk::{Interpreter, InterpreterConfig, JsError, JsValue};

fn limited(config: InterpreterConfig) -> Interpreter {
    Interpreter::with_config(config)
}

#[test]
fn test_step_limit_stops_infinite_loop() {
    let mut interp = limited(InterpreterConfig::default().with_step_limit(1_000));
    let result = interp.eval_source("while (true) {}");
    assert!(matches!(result, Err(JsError::StepLimitExceeded { limit: 1000 })));
}

#[test]
fn test_step_limit_is_not_catchable() {
    let mut interp = limited(InterpreterConfig::default().with_step_limit(500));
    let result = interp.eval_source("var caught = false; try { for (;;) {} } catch (e) { caught = true; } finally { caught = 'finally'; }");
    assert!(matches!(result, Err(JsError::StepLimitExceeded { .. })));
}

#[test]
fn test_step_budget_resets_per_evaluation() {
    let mut interp = limited(InterpreterConfig::default().with_step_limit(100));
    for _ in 0..5 {
        interp
            .eval_source("var i = 0; while (i < 20) { i++; }")
            .unwrap();
    }
    assert_eq!(interp.eval_source("i").unwrap(), JsValue::Number(20.0));
}

#[test]
fn test_call_depth_limit() {
    let mut interp = limited(InterpreterConfig::default().with_max_call_depth(64));
    let result = interp.eval_source("function down() { return down(); } down()");
    assert!(matches!(result, Err(JsError::StackOverflow { depth: 64 })));

    let result = interp.eval_source("function again() { again(); } try { again(); } catch (e) { 'caught'; }");
    assert!(matches!(result, Err(JsError::StackOverflow { .. })));

    // The interpreter stays usable afterwards
    assert_eq!(interp.eval_source("1 + 1").unwrap(), JsValue::Number(2.0));
}

#[test]
fn test_native_calls_count_towards_depth() {
    let mut interp = limited(InterpreterConfig::default().with_max_call_depth(40));
    let result = interp.eval_source("function viaNative() { return [1].map(viaNative); } viaNative()");
    assert!(matches!(result, Err(JsError::StackOverflow { depth: 40 })));
}

#[test]
fn test_deep_recursion_within_default_limit() {
    let mut interp = Interpreter::new();
    assert_eq!(
        interp
            .eval_source("function depth(n) { return n == 0 ? 0 : 1 + depth(n - 1); } depth(400)")
            .unwrap(),
        JsValue::Number(400.0)
    );
}

#[test]
fn test_escaping_jumps_are_reported() {
    let mut interp = Interpreter::new();
    assert!(matches!(
        interp.eval_source("break;"),
        Err(JsError::IllegalControlFlow { kind: "break" })
    ));
    assert!(matches!(
        interp.eval_source("while (true) { break missing; }"),
        Err(JsError::IllegalControlFlow { kind: "break" })
    ));
    assert!(matches!(
        interp.eval_source("return 1"),
        Err(JsError::SyntaxError { .. })
    ));
}
