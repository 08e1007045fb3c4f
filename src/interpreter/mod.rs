//! Tree-walking interpreter
//!
//! Statements evaluate to a [`Completion`]; expressions to a [`JsValue`].
//! Throws travel on the error channel as [`JsError::Thrown`] (or as one of
//! the catchable runtime faults) so `?` carries them through evaluation.

pub mod builtins;
mod expressions;
mod realm;
mod stack;
mod statements;

pub use realm::Realm;

use std::rc::Rc;

use tracing::{debug, warn};

use crate::ast::{Declarations, Program};
use crate::config::InterpreterConfig;
use crate::env::{Env, ObjectKind, PropertyKey};
use crate::error::JsError;
use crate::function::{CallFrame, JsFunction, NativeFn, NativeFunction};
use crate::intern::Token;
use crate::parser::Parser;
use crate::platform::{
    CompiledRegex, ConsoleLevel, ConsoleProvider, FancyRegexProvider, RandomProvider,
    RegExpProvider, StdConsoleProvider, StdRandomProvider, StdTimeProvider, TimeProvider,
};
use crate::value::{CheapClone, JsString, JsValue};

/// Completion record for control flow
#[derive(Debug)]
pub enum Completion {
    /// Normal completion; `None` when the statement produced no value.
    Normal(Option<JsValue>),
    Return(JsValue),
    Break(Option<Token>),
    Continue(Option<Token>),
}

/// The interpreter state
pub struct Interpreter {
    /// Global object and built-in prototypes
    pub realm: Realm,
    /// Scope the running code resolves identifiers in
    pub scope: Env,
    /// Active calls, innermost last
    pub call_stack: Vec<CallFrame>,
    pub(crate) config: InterpreterConfig,
    /// Statements executed in the current top-level evaluation
    steps: u64,
    /// Nesting of `evaluate_in` (eval and host re-entry)
    nesting: usize,
    console: Box<dyn ConsoleProvider>,
    clock: Box<dyn TimeProvider>,
    random: Box<dyn RandomProvider>,
    regexp_provider: Box<dyn RegExpProvider>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_config(InterpreterConfig::default())
    }

    pub fn with_config(config: InterpreterConfig) -> Self {
        let realm = Realm::new();
        let scope = realm.global.cheap_clone();
        let mut interp = Interpreter {
            realm,
            scope,
            call_stack: Vec::new(),
            config,
            steps: 0,
            nesting: 0,
            console: Box::new(StdConsoleProvider),
            clock: Box::new(StdTimeProvider),
            random: Box::new(StdRandomProvider::new()),
            regexp_provider: Box::new(FancyRegexProvider),
        };
        interp.init_globals();
        debug!(
            max_call_depth = interp.config.max_call_depth,
            step_limit = ?interp.config.step_limit,
            "interpreter created"
        );
        interp
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// The global object
    pub fn global(&self) -> Env {
        self.realm.global.cheap_clone()
    }

    // ═══════════════════════════════════════════════════════════════
    // Platform providers
    // ═══════════════════════════════════════════════════════════════

    pub fn set_console(&mut self, console: impl ConsoleProvider + 'static) {
        self.console = Box::new(console);
    }

    pub fn set_clock(&mut self, clock: impl TimeProvider + 'static) {
        self.clock = Box::new(clock);
    }

    pub fn set_random(&mut self, random: impl RandomProvider + 'static) {
        self.random = Box::new(random);
    }

    pub fn set_regexp_provider(&mut self, provider: impl RegExpProvider + 'static) {
        self.regexp_provider = Box::new(provider);
    }

    pub fn console_write(&self, level: ConsoleLevel, message: &str) {
        self.console.write(level, message);
    }

    pub fn now_millis(&self) -> f64 {
        self.clock.now_millis() as f64
    }

    pub fn next_random(&mut self) -> f64 {
        self.random.random()
    }

    /// Compile a pattern; failures surface as a script `SyntaxError`.
    pub fn compile_regexp(
        &self,
        pattern: &str,
        flags: &str,
    ) -> Result<Rc<dyn CompiledRegex>, JsError> {
        self.regexp_provider
            .compile(pattern, flags)
            .map_err(|message| JsError::syntax_error(message, 0, 0))
    }

    // ═══════════════════════════════════════════════════════════════
    // Object creation helpers
    // ═══════════════════════════════════════════════════════════════

    /// Create a plain object delegating to `Object.prototype`
    pub fn create_object(&mut self) -> Env {
        Env::new(
            ObjectKind::Ordinary,
            Some(self.realm.object_prototype.cheap_clone()),
        )
    }

    pub fn create_array(&mut self, elements: Vec<JsValue>) -> Env {
        self.create_sparse_array(elements.into_iter().map(Some).collect())
    }

    /// Create an array whose `None` slots are holes
    pub fn create_sparse_array(&mut self, elements: Vec<Option<JsValue>>) -> Env {
        Env::new(
            ObjectKind::Array(elements),
            Some(self.realm.array_prototype.cheap_clone()),
        )
    }

    pub fn create_native_function(&mut self, name: &str, func: NativeFn, arity: usize) -> Env {
        self.create_function_object(JsFunction::Native(NativeFunction {
            name: JsString::from(name),
            func,
            construct: None,
            arity,
        }))
    }

    /// Create a built-in constructor wired to `prototype` in both directions.
    pub fn create_native_constructor(
        &mut self,
        name: &str,
        func: NativeFn,
        construct: NativeFn,
        arity: usize,
        prototype: &Env,
    ) -> Env {
        let ctor = self.create_function_object(JsFunction::Native(NativeFunction {
            name: JsString::from(name),
            func,
            construct: Some(construct),
            arity,
        }));
        ctor.define(Token::PROTOTYPE, JsValue::Object(prototype.cheap_clone()));
        prototype.define(Token::CONSTRUCTOR, JsValue::Object(ctor.cheap_clone()));
        ctor
    }

    /// Install a non-enumerable native method on `obj`
    pub fn register_method(&mut self, obj: &Env, name: &str, func: NativeFn, arity: usize) {
        let func_obj = self.create_native_function(name, func, arity);
        obj.define(PropertyKey::from(name), JsValue::Object(func_obj));
    }

    /// Expose a host function to scripts as a global.
    pub fn register_global_function(&mut self, name: &str, func: NativeFn, arity: usize) {
        let global = self.global();
        self.register_method(&global, name, func, arity);
    }

    /// Create an error object of the named native error type
    pub fn create_error(&mut self, name: &str, message: &str) -> Env {
        let proto = self.realm.error_prototype_for(name);
        let err = Env::new(ObjectKind::Error, Some(proto));
        err.define(Token::MESSAGE, JsValue::from(message));
        err
    }

    /// The script value a catchable error is observed as.
    ///
    /// Host-fatal errors come back unchanged as `Err`.
    pub fn error_to_value(&mut self, error: JsError) -> Result<JsValue, JsError> {
        match error {
            JsError::Thrown(value) => Ok(value),
            other => match other.error_name() {
                Some(name) => {
                    let message = other.script_message();
                    Ok(JsValue::Object(self.create_error(name, &message)))
                }
                None => Err(other),
            },
        }
    }

    // ═══════════════════════════════════════════════════════════════
    // Entry points
    // ═══════════════════════════════════════════════════════════════

    /// Parse and evaluate `source` in the global scope.
    pub fn eval_source(&mut self, source: &str) -> Result<JsValue, JsError> {
        let program = Parser::new(source).parse_program()?;
        self.evaluate(&program)
    }

    /// Evaluate a program in the global scope.
    pub fn evaluate(&mut self, program: &Program) -> Result<JsValue, JsError> {
        let global = self.global();
        self.evaluate_in(program, &global)
    }

    /// Evaluate a program with `scope` as its variable environment.
    ///
    /// The result is the value of the last statement that produced one.
    pub fn evaluate_in(&mut self, program: &Program, scope: &Env) -> Result<JsValue, JsError> {
        let outermost = self.nesting == 0;
        if outermost {
            self.steps = 0;
            debug!(statements = program.body.len(), "evaluation started");
        }

        self.nesting += 1;
        let saved_scope = std::mem::replace(&mut self.scope, scope.cheap_clone());
        let result = self
            .instantiate_declarations(&program.declarations, scope)
            .and_then(|()| self.execute_statements(&program.body));
        self.scope = saved_scope;
        self.nesting -= 1;

        let result = match result {
            Ok(Completion::Normal(value)) => Ok(value.unwrap_or_default()),
            Ok(Completion::Return(_)) => Err(JsError::IllegalControlFlow { kind: "return" }),
            Ok(Completion::Break(_)) => Err(JsError::IllegalControlFlow { kind: "break" }),
            Ok(Completion::Continue(_)) => Err(JsError::IllegalControlFlow { kind: "continue" }),
            Err(err) => Err(err),
        };

        if outermost {
            match &result {
                Ok(_) => debug!(steps = self.steps, "evaluation finished"),
                Err(err) if err.is_catchable() => debug!(error = %err, "evaluation threw"),
                Err(err) => {
                    self.call_stack.clear();
                    warn!(error = %err, "evaluation aborted");
                }
            }
        }
        result
    }

    /// Bind hoisted declarations in `scope`: functions initialised, vars
    /// undefined unless already bound.
    pub(crate) fn instantiate_declarations(
        &mut self,
        declarations: &Declarations,
        scope: &Env,
    ) -> Result<(), JsError> {
        for func in &declarations.functions {
            if let Some(id) = &func.id {
                let closure = self.create_closure(func, scope);
                scope.put(PropertyKey::Name(id.name), JsValue::Object(closure))?;
            }
        }
        for name in &declarations.vars {
            let key = PropertyKey::Name(*name);
            if !scope.owns(&key) {
                scope.put(key, JsValue::Undefined)?;
            }
        }
        Ok(())
    }

    /// Charge one statement against the step budget.
    fn charge_step(&mut self) -> Result<(), JsError> {
        self.steps += 1;
        match self.config.step_limit {
            Some(limit) if self.steps > limit => Err(JsError::StepLimitExceeded { limit }),
            _ => Ok(()),
        }
    }

    /// `this` of the innermost script frame, else the global object.
    pub fn this_value(&self) -> JsValue {
        self.current_script_frame()
            .map(|frame| frame.this.clone())
            .unwrap_or_else(|| JsValue::Object(self.global()))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
