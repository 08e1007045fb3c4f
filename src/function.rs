//! Callables and activation records
//!
//! A function object is an environment of kind [`ObjectKind::Function`]. Each
//! invocation of an interpreted function gets a fresh [`Activation`]: a scope
//! whose parent is the closure's defining environment, holding parameters,
//! `arguments` and the hoisted declarations of the body.

use std::rc::Rc;

use tracing::trace;

use crate::ast::FunctionLiteral;
use crate::env::{Env, ObjectKind, PropertyKey};
use crate::error::JsError;
use crate::intern::Token;
use crate::interpreter::{Completion, Interpreter};
use crate::value::{CheapClone, JsString, JsValue};

/// Signature shared by every native function and method.
pub type NativeFn = fn(&mut Interpreter, JsValue, &[JsValue]) -> Result<JsValue, JsError>;

#[derive(Clone)]
pub enum JsFunction {
    Interpreted(InterpretedFunction),
    Native(NativeFunction),
}

impl JsFunction {
    pub fn name(&self) -> JsString {
        match self {
            JsFunction::Interpreted(f) => f
                .code
                .id
                .as_ref()
                .map(|id| id.name.as_js_string())
                .unwrap_or_else(|| JsString::from("")),
            JsFunction::Native(f) => f.name.cheap_clone(),
        }
    }

    /// Declared parameter count (the function's `length`).
    pub fn arity(&self) -> usize {
        match self {
            JsFunction::Interpreted(f) => f.code.params.len(),
            JsFunction::Native(f) => f.arity,
        }
    }
}

/// A closure: shared code plus the environment it was defined in.
#[derive(Clone)]
pub struct InterpretedFunction {
    pub code: Rc<FunctionLiteral>,
    pub closure: Env,
}

#[derive(Clone)]
pub struct NativeFunction {
    pub name: JsString,
    pub func: NativeFn,
    /// Called by `new` with a fresh receiver; `None` means not a constructor.
    pub construct: Option<NativeFn>,
    pub arity: usize,
}

/// One entry of the interpreter's call stack.
#[derive(Debug, Clone)]
pub struct CallFrame {
    pub callee: Env,
    pub this: JsValue,
    /// Native frames do not own a `this` visible to script code.
    pub native: bool,
}

/// Per-call state of an interpreted function.
pub struct Activation {
    /// Scope the body runs in; holds the parameters and `arguments`.
    pub scope: Env,
}

impl Activation {
    fn new(
        interp: &mut Interpreter,
        func: &InterpretedFunction,
        callee: &Env,
        args: &[JsValue],
    ) -> Result<Activation, JsError> {
        let scope = Env::new_scope(&func.closure);
        let arguments = interp.create_arguments_object(callee, args);

        for (i, param) in func.code.params.iter().enumerate() {
            let value = args.get(i).cloned().unwrap_or_default();
            scope.put(PropertyKey::from(param.name), value)?;
        }

        let arguments_key = PropertyKey::Name(Token::ARGUMENTS);
        if !scope.owns(&arguments_key) {
            scope.put(arguments_key, JsValue::Object(arguments.cheap_clone()))?;
        }

        interp.instantiate_declarations(&func.code.declarations, &scope)?;

        Ok(Activation { scope })
    }
}

impl Interpreter {
    /// Wrap `func` in a function object delegating to `Function.prototype`.
    pub fn create_function_object(&mut self, func: JsFunction) -> Env {
        let arity = func.arity();
        let is_interpreted = matches!(func, JsFunction::Interpreted(_));
        let obj = Env::new(
            ObjectKind::Function(func),
            Some(self.realm.function_prototype.cheap_clone()),
        );
        obj.define(Token::LENGTH, JsValue::from(arity));

        if is_interpreted {
            let prototype = self.create_object();
            prototype.define(Token::CONSTRUCTOR, JsValue::Object(obj.cheap_clone()));
            obj.define(Token::PROTOTYPE, JsValue::Object(prototype));
        }
        obj
    }

    /// Create a closure for `code` capturing `scope`.
    pub fn create_closure(&mut self, code: &Rc<FunctionLiteral>, scope: &Env) -> Env {
        self.create_function_object(JsFunction::Interpreted(InterpretedFunction {
            code: Rc::clone(code),
            closure: scope.cheap_clone(),
        }))
    }

    fn create_arguments_object(&mut self, callee: &Env, args: &[JsValue]) -> Env {
        let obj = Env::new(
            ObjectKind::Arguments,
            Some(self.realm.object_prototype.cheap_clone()),
        );
        for (i, arg) in args.iter().enumerate() {
            obj.init(PropertyKey::Index(i as u32), arg.clone());
        }
        obj.define(Token::LENGTH, JsValue::from(args.len()));
        obj.define(Token::CALLEE, JsValue::Object(callee.cheap_clone()));
        let caller = self
            .current_script_frame()
            .map(|frame| JsValue::Object(frame.callee.cheap_clone()))
            .unwrap_or(JsValue::Null);
        obj.define(Token::CALLER, caller);
        obj
    }

    /// Innermost frame belonging to an interpreted function.
    pub(crate) fn current_script_frame(&self) -> Option<&CallFrame> {
        self.call_stack.iter().rev().find(|frame| !frame.native)
    }

    /// Call `callee` with an explicit receiver.
    pub fn call_function(
        &mut self,
        callee: &JsValue,
        this: JsValue,
        args: &[JsValue],
    ) -> Result<JsValue, JsError> {
        let Some(func_obj) = callee.as_object() else {
            return Err(JsError::type_error(format!(
                "{} is not a function",
                callee.type_of()
            )));
        };
        let func = match &*func_obj.kind() {
            ObjectKind::Function(f) => f.clone(),
            _ => return Err(JsError::type_error("object is not a function")),
        };

        match func {
            JsFunction::Native(native) => {
                self.push_frame(func_obj, this.clone(), true)?;
                trace!(name = %native.name, argc = args.len(), depth = self.call_stack.len(), "native call");
                let result = (native.func)(self, this, args);
                self.call_stack.pop();
                result
            }
            JsFunction::Interpreted(interpreted) => {
                self.call_interpreted(&interpreted, func_obj, this, args)
            }
        }
    }

    /// `new callee(args)`
    pub fn construct(&mut self, callee: &JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
        let Some(func_obj) = callee.as_object().filter(|obj| obj.is_callable()) else {
            return Err(JsError::type_error(format!(
                "{} is not a constructor",
                callee.type_of()
            )));
        };

        let prototype = match func_obj.get(&PropertyKey::Name(Token::PROTOTYPE)) {
            Some(JsValue::Object(proto)) => proto,
            _ => self.realm.object_prototype.cheap_clone(),
        };
        let receiver = Env::new(ObjectKind::Ordinary, Some(prototype));

        let func = match &*func_obj.kind() {
            ObjectKind::Function(f) => f.clone(),
            _ => return Err(JsError::type_error("object is not a constructor")),
        };

        match func {
            JsFunction::Interpreted(interpreted) => {
                self.call_interpreted(
                    &interpreted,
                    func_obj,
                    JsValue::Object(receiver.cheap_clone()),
                    args,
                )?;
                Ok(JsValue::Object(receiver))
            }
            JsFunction::Native(native) => {
                let Some(construct) = native.construct else {
                    return Err(JsError::type_error(format!(
                        "{} is not a constructor",
                        native.name
                    )));
                };
                self.push_frame(func_obj, JsValue::Undefined, true)?;
                trace!(name = %native.name, argc = args.len(), depth = self.call_stack.len(), "native construct");
                let result = construct(self, JsValue::Object(receiver.cheap_clone()), args);
                self.call_stack.pop();
                match result? {
                    JsValue::Object(obj) => Ok(JsValue::Object(obj)),
                    _ => Ok(JsValue::Object(receiver)),
                }
            }
        }
    }

    fn push_frame(&mut self, callee: &Env, this: JsValue, native: bool) -> Result<(), JsError> {
        let depth = self.config.max_call_depth;
        if self.call_stack.len() >= depth {
            return Err(JsError::StackOverflow { depth });
        }
        self.call_stack.push(CallFrame {
            callee: callee.cheap_clone(),
            this,
            native,
        });
        Ok(())
    }

    fn call_interpreted(
        &mut self,
        func: &InterpretedFunction,
        callee: &Env,
        this: JsValue,
        args: &[JsValue],
    ) -> Result<JsValue, JsError> {
        let activation = Activation::new(self, func, callee, args)?;
        let this = if this.is_null_or_undefined() {
            JsValue::Object(self.global())
        } else {
            this
        };
        self.push_frame(callee, this, false)?;

        let name = func.code.id.as_ref().map(|id| id.name.as_str()).unwrap_or("<anonymous>");
        trace!(name, argc = args.len(), depth = self.call_stack.len(), "call");

        let saved_scope = std::mem::replace(&mut self.scope, activation.scope);
        let result = self.execute_statements(&func.code.body);
        self.scope = saved_scope;
        self.call_stack.pop();

        match result? {
            Completion::Return(value) => Ok(value),
            Completion::Normal(_) => Ok(JsValue::Undefined),
            Completion::Break(_) => {
                trace!(name, "break reached function boundary");
                Err(JsError::IllegalControlFlow { kind: "break" })
            }
            Completion::Continue(_) => {
                trace!(name, "continue reached function boundary");
                Err(JsError::IllegalControlFlow { kind: "continue" })
            }
        }
    }
}
