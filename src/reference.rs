//! References (lvalues)
//!
//! A [`Reference`] names a slot as a (container, key) pair. It never caches:
//! every read goes back to the container, so a reference taken before a
//! write observes that write.

use crate::ast::BinaryOp;
use crate::env::{Env, ObjectKind, PropertyKey};
use crate::error::JsError;
use crate::interpreter::Interpreter;
use crate::value::{CheapClone, JsValue};

#[derive(Debug, Clone)]
pub struct Reference {
    container: Env,
    key: PropertyKey,
}

impl Reference {
    pub fn new(container: Env, key: PropertyKey) -> Self {
        Self { container, key }
    }

    pub fn container(&self) -> &Env {
        &self.container
    }

    pub fn key(&self) -> PropertyKey {
        self.key
    }

    /// Current value, read through the container's delegation chain.
    pub fn get_value(&self) -> JsValue {
        self.container.get(&self.key).unwrap_or_default()
    }

    /// Store `value` in the container and hand it back.
    pub fn assign(&self, value: JsValue) -> Result<JsValue, JsError> {
        self.container.put(self.key, value.clone())?;
        Ok(value)
    }

    /// `++x`: returns the new value.
    pub fn inc(&self, interp: &mut Interpreter) -> Result<JsValue, JsError> {
        self.add_to(interp, 1.0)
    }

    /// `--x`: returns the new value.
    pub fn dec(&self, interp: &mut Interpreter) -> Result<JsValue, JsError> {
        self.add_to(interp, -1.0)
    }

    /// `x++`, deferred until forced.
    pub fn uninc(&self) -> PostfixUpdate {
        PostfixUpdate {
            reference: self.clone(),
            delta: 1.0,
        }
    }

    /// `x--`, deferred until forced.
    pub fn undec(&self) -> PostfixUpdate {
        PostfixUpdate {
            reference: self.clone(),
            delta: -1.0,
        }
    }

    fn add_to(&self, interp: &mut Interpreter, delta: f64) -> Result<JsValue, JsError> {
        let old = interp.to_number(&self.get_value())?;
        self.assign(JsValue::Number(old + delta))
    }

    /// Compound assignment: read, evaluate `rhs`, combine with `op`, write.
    ///
    /// The old value is read before `rhs` runs, so `x += (x = 5)` combines
    /// with the original `x`.
    pub fn compound<F>(
        &self,
        interp: &mut Interpreter,
        op: BinaryOp,
        rhs: F,
    ) -> Result<JsValue, JsError>
    where
        F: FnOnce(&mut Interpreter) -> Result<JsValue, JsError>,
    {
        let old = self.get_value();
        let right = rhs(interp)?;
        let combined = interp.binary_op(op, &old, &right)?;
        self.assign(combined)
    }

    /// Remove the container's own binding; whether one existed.
    pub fn delete(&self) -> Result<bool, JsError> {
        self.container.hide(&self.key)
    }

    /// Call the referenced value as a method of the container.
    ///
    /// Scope containers are not script-visible objects, so functions found in
    /// a scope are called with the global object as receiver.
    pub fn call(&self, interp: &mut Interpreter, args: &[JsValue]) -> Result<JsValue, JsError> {
        let callee = self.get_value();
        if !callee.is_callable() {
            return Err(JsError::type_error(format!("{} is not a function", self.key)));
        }
        let receiver = match &*self.container.kind() {
            ObjectKind::Scope => JsValue::Object(interp.global()),
            _ => JsValue::Object(self.container.cheap_clone()),
        };
        interp.call_function(&callee, receiver, args)
    }
}

/// A postfix `++`/`--` that has not happened yet.
///
/// Forcing consumes it, so the write happens exactly once.
#[must_use = "a postfix update does nothing until forced"]
pub struct PostfixUpdate {
    reference: Reference,
    delta: f64,
}

impl PostfixUpdate {
    /// Perform the write and return the old numeric value.
    pub fn force(self, interp: &mut Interpreter) -> Result<JsValue, JsError> {
        let old = interp.to_number(&self.reference.get_value())?;
        self.reference.assign(JsValue::Number(old + self.delta))?;
        Ok(JsValue::Number(old))
    }
}
