//! Expression evaluation

use crate::ast::{
    AssignmentExpression, AssignmentTarget, CallExpression, Expression, LiteralValue,
    LogicalOp, MemberExpression, MemberProperty, UnaryExpression, UnaryOp, UpdateExpression,
    UpdateOp,
};
use crate::env::{Env, ObjectKind, PropertyKey};
use crate::error::JsError;
use crate::intern::Token;
use crate::ops::to_int32;
use crate::reference::Reference;
use crate::value::{CheapClone, JsValue};

use super::Interpreter;
use super::builtins::regexp;
use super::stack::ensure_sufficient_stack;

impl Interpreter {
    pub fn evaluate_expression(&mut self, expr: &Expression) -> Result<JsValue, JsError> {
        ensure_sufficient_stack(|| self.evaluate_expression_inner(expr))
    }

    fn evaluate_expression_inner(&mut self, expr: &Expression) -> Result<JsValue, JsError> {
        match expr {
            Expression::Literal(lit) => Ok(match &lit.value {
                LiteralValue::Null => JsValue::Null,
                LiteralValue::Boolean(b) => JsValue::Boolean(*b),
                LiteralValue::Number(n) => JsValue::Number(*n),
                LiteralValue::String(s) => JsValue::from(s.as_str()),
            }),

            Expression::Array(arr) => {
                let mut elements = Vec::with_capacity(arr.elements.len());
                for element in &arr.elements {
                    elements.push(match element {
                        Some(expr) => Some(self.evaluate_expression(expr)?),
                        None => None,
                    });
                }
                Ok(JsValue::Object(self.create_sparse_array(elements)))
            }

            Expression::Object(obj) => {
                let result = self.create_object();
                for prop in &obj.properties {
                    let value = self.evaluate_expression(&prop.value)?;
                    result.init(prop.key, value);
                }
                Ok(JsValue::Object(result))
            }

            Expression::Function(func) => {
                let scope = self.scope.cheap_clone();
                match &func.id {
                    // The name is visible inside the body only
                    Some(id) => {
                        let own_scope = Env::new_scope(&scope);
                        let closure = self.create_closure(func, &own_scope);
                        own_scope.put(
                            PropertyKey::Name(id.name),
                            JsValue::Object(closure.cheap_clone()),
                        )?;
                        Ok(JsValue::Object(closure))
                    }
                    None => Ok(JsValue::Object(self.create_closure(func, &scope))),
                }
            }

            Expression::RegExp(re) => {
                let obj = regexp::create_regexp(self, &re.pattern, &re.flags)?;
                Ok(JsValue::Object(obj))
            }

            Expression::Identifier(id) => match self.resolve_identifier(id.name) {
                Some(reference) => Ok(reference.get_value()),
                None => Err(JsError::reference_error(id.name.as_str())),
            },

            Expression::This(_) => Ok(self.this_value()),

            Expression::Unary(unary) => self.evaluate_unary(unary),

            Expression::Binary(binary) => {
                let left = self.evaluate_expression(&binary.left)?;
                let right = self.evaluate_expression(&binary.right)?;
                self.binary_op(binary.operator, &left, &right)
            }

            Expression::Logical(logical) => {
                let left = self.evaluate_expression(&logical.left)?;
                let decided = match logical.operator {
                    LogicalOp::And => !left.to_boolean(),
                    LogicalOp::Or => left.to_boolean(),
                };
                if decided {
                    Ok(left)
                } else {
                    self.evaluate_expression(&logical.right)
                }
            }

            Expression::Conditional(cond) => {
                if self.evaluate_expression(&cond.test)?.to_boolean() {
                    self.evaluate_expression(&cond.consequent)
                } else {
                    self.evaluate_expression(&cond.alternate)
                }
            }

            Expression::Assignment(assign) => self.evaluate_assignment(assign),

            Expression::Update(update) => self.evaluate_update(update),

            Expression::Sequence(seq) => {
                let mut last = JsValue::Undefined;
                for expr in &seq.expressions {
                    last = self.evaluate_expression(expr)?;
                }
                Ok(last)
            }

            Expression::Member(member) => Ok(self.member_reference(member)?.get_value()),

            Expression::Call(call) => self.evaluate_call(call),

            Expression::New(new_expr) => {
                let callee = self.evaluate_expression(&new_expr.callee)?;
                let args = self.evaluate_arguments(&new_expr.arguments)?;
                self.construct(&callee, &args)
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════
    // References
    // ═══════════════════════════════════════════════════════════════

    /// Find the environment an identifier resolves in.
    ///
    /// `with` targets are consulted through their whole delegation chain; so
    /// is the global object. Ordinary scopes must own the binding.
    pub fn resolve_identifier(&self, name: Token) -> Option<Reference> {
        let key = PropertyKey::from(name);
        let mut current = Some(self.scope.cheap_clone());
        while let Some(env) = current {
            let with_target = match &*env.kind() {
                ObjectKind::With(target) => Some(target.cheap_clone()),
                _ => None,
            };
            if let Some(target) = with_target {
                if target.has(&key) {
                    return Some(target.reference(key));
                }
            } else if env.ptr_eq(&self.realm.global) {
                return env.has(&key).then(|| env.reference(key));
            } else if env.owns(&key) {
                return Some(env.reference(key));
            }
            current = env.parent();
        }
        None
    }

    /// Reference for assignment: unresolved names land on the global object.
    fn identifier_reference(&self, name: Token) -> Reference {
        self.resolve_identifier(name)
            .unwrap_or_else(|| self.realm.global.reference(name))
    }

    pub(crate) fn assign_identifier(&mut self, name: Token, value: JsValue) -> Result<(), JsError> {
        self.identifier_reference(name).assign(value)?;
        Ok(())
    }

    /// Reference for a member expression; the base is boxed when primitive.
    fn member_reference(&mut self, member: &MemberExpression) -> Result<Reference, JsError> {
        let base = self.evaluate_expression(&member.object)?;
        let key = match &member.property {
            MemberProperty::Identifier(id) => PropertyKey::from(id.name),
            MemberProperty::Expression(expr) => {
                let value = self.evaluate_expression(expr)?;
                self.to_property_key(&value)?
            }
        };
        if base.is_null_or_undefined() {
            return Err(JsError::type_error(format!(
                "Cannot read property '{}' of {}",
                key,
                base.to_js_string()
            )));
        }
        let container = self.to_object(&base)?;
        Ok(container.reference(key))
    }

    /// Reference for an expression used as an assignment target.
    pub(crate) fn evaluate_reference(&mut self, expr: &Expression) -> Result<Reference, JsError> {
        match expr {
            Expression::Identifier(id) => Ok(self.identifier_reference(id.name)),
            Expression::Member(member) => self.member_reference(member),
            other => {
                let span = other.span();
                Err(JsError::syntax_error(
                    "Invalid left-hand side in assignment",
                    span.line,
                    span.column,
                ))
            }
        }
    }

    /// Reference for a read-modify-write target; the name must exist.
    fn existing_reference(&mut self, expr: &Expression) -> Result<Reference, JsError> {
        match expr {
            Expression::Identifier(id) => self
                .resolve_identifier(id.name)
                .ok_or_else(|| JsError::reference_error(id.name.as_str())),
            other => self.evaluate_reference(other),
        }
    }

    // ═══════════════════════════════════════════════════════════════
    // Operators
    // ═══════════════════════════════════════════════════════════════

    fn evaluate_unary(&mut self, unary: &UnaryExpression) -> Result<JsValue, JsError> {
        match unary.operator {
            UnaryOp::Typeof => {
                if let Expression::Identifier(id) = &*unary.argument {
                    return Ok(match self.resolve_identifier(id.name) {
                        Some(reference) => JsValue::from(reference.get_value().type_of()),
                        None => JsValue::from("undefined"),
                    });
                }
                let value = self.evaluate_expression(&unary.argument)?;
                Ok(JsValue::from(value.type_of()))
            }
            UnaryOp::Delete => {
                match &*unary.argument {
                    Expression::Identifier(id) => {
                        if let Some(reference) = self.resolve_identifier(id.name) {
                            reference.delete()?;
                        }
                    }
                    Expression::Member(member) => {
                        self.member_reference(member)?.delete()?;
                    }
                    other => {
                        self.evaluate_expression(other)?;
                    }
                }
                Ok(JsValue::Boolean(true))
            }
            UnaryOp::Void => {
                self.evaluate_expression(&unary.argument)?;
                Ok(JsValue::Undefined)
            }
            UnaryOp::Not => {
                let value = self.evaluate_expression(&unary.argument)?;
                Ok(JsValue::Boolean(!value.to_boolean()))
            }
            UnaryOp::Minus => {
                let value = self.evaluate_expression(&unary.argument)?;
                Ok(JsValue::Number(-self.to_number(&value)?))
            }
            UnaryOp::Plus => {
                let value = self.evaluate_expression(&unary.argument)?;
                Ok(JsValue::Number(self.to_number(&value)?))
            }
            UnaryOp::BitNot => {
                let value = self.evaluate_expression(&unary.argument)?;
                let n = self.to_number(&value)?;
                Ok(JsValue::Number(f64::from(!to_int32(n))))
            }
        }
    }

    fn evaluate_assignment(&mut self, assign: &AssignmentExpression) -> Result<JsValue, JsError> {
        let reference = match (&assign.left, assign.operator.binary_op()) {
            (AssignmentTarget::Identifier(id), None) => self.identifier_reference(id.name),
            (AssignmentTarget::Identifier(id), Some(_)) => self
                .resolve_identifier(id.name)
                .ok_or_else(|| JsError::reference_error(id.name.as_str()))?,
            (AssignmentTarget::Member(member), _) => self.member_reference(member)?,
        };

        match assign.operator.binary_op() {
            None => {
                let value = self.evaluate_expression(&assign.right)?;
                reference.assign(value)
            }
            Some(op) => {
                reference.compound(self, op, |interp| interp.evaluate_expression(&assign.right))
            }
        }
    }

    fn evaluate_update(&mut self, update: &UpdateExpression) -> Result<JsValue, JsError> {
        let reference = self.existing_reference(&update.argument)?;
        match (update.operator, update.prefix) {
            (UpdateOp::Increment, true) => reference.inc(self),
            (UpdateOp::Decrement, true) => reference.dec(self),
            (UpdateOp::Increment, false) => reference.uninc().force(self),
            (UpdateOp::Decrement, false) => reference.undec().force(self),
        }
    }

    // ═══════════════════════════════════════════════════════════════
    // Calls
    // ═══════════════════════════════════════════════════════════════

    fn evaluate_arguments(&mut self, arguments: &[Expression]) -> Result<Vec<JsValue>, JsError> {
        let mut args = Vec::with_capacity(arguments.len());
        for arg in arguments {
            args.push(self.evaluate_expression(arg)?);
        }
        Ok(args)
    }

    fn evaluate_call(&mut self, call: &CallExpression) -> Result<JsValue, JsError> {
        match &*call.callee {
            Expression::Member(member) => {
                let reference = self.member_reference(member)?;
                let args = self.evaluate_arguments(&call.arguments)?;
                reference.call(self, &args)
            }
            Expression::Identifier(id) => {
                let reference = self
                    .resolve_identifier(id.name)
                    .ok_or_else(|| JsError::reference_error(id.name.as_str()))?;
                let args = self.evaluate_arguments(&call.arguments)?;
                reference.call(self, &args)
            }
            other => {
                let callee = self.evaluate_expression(other)?;
                let args = self.evaluate_arguments(&call.arguments)?;
                self.call_function(&callee, JsValue::Undefined, &args)
            }
        }
    }
}
