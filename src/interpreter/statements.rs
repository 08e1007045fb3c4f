//! Statement execution

use tracing::trace;

use crate::ast::{
    BlockStatement, DoWhileStatement, ForInLeft, ForInStatement, ForInit, ForStatement,
    LabeledStatement, Statement, SwitchStatement, TryStatement, VariableDeclaration,
    WhileStatement, WithStatement,
};
use crate::env::{Env, ObjectKind, PropertyKey};
use crate::error::JsError;
use crate::intern::Token;
use crate::value::{CheapClone, JsValue};

use super::stack::ensure_sufficient_stack;
use super::{Completion, Interpreter};

/// What a loop does once its body has completed.
enum LoopFlow {
    Next,
    Exit,
    Propagate(Completion),
}

fn loop_flow(completion: Completion, labels: &[Token]) -> LoopFlow {
    match completion {
        Completion::Normal(_) | Completion::Continue(None) => LoopFlow::Next,
        Completion::Continue(Some(label)) if labels.contains(&label) => LoopFlow::Next,
        Completion::Break(None) => LoopFlow::Exit,
        Completion::Break(Some(label)) if labels.contains(&label) => LoopFlow::Exit,
        other => LoopFlow::Propagate(other),
    }
}

/// Remember the value of a normal completion.
fn track_value(last: &mut Option<JsValue>, completion: &Completion) {
    if let Completion::Normal(Some(value)) = completion {
        *last = Some(value.clone());
    }
}

impl Interpreter {
    /// Execute a statement list; stops at the first abrupt completion.
    pub(crate) fn execute_statements(
        &mut self,
        statements: &[Statement],
    ) -> Result<Completion, JsError> {
        let mut last = None;
        for stmt in statements {
            match self.execute_statement(stmt)? {
                Completion::Normal(value) => {
                    if value.is_some() {
                        last = value;
                    }
                }
                abrupt => return Ok(abrupt),
            }
        }
        Ok(Completion::Normal(last))
    }

    pub fn execute_statement(&mut self, stmt: &Statement) -> Result<Completion, JsError> {
        self.charge_step()?;
        ensure_sufficient_stack(|| self.execute_statement_inner(stmt))
    }

    fn execute_statement_inner(&mut self, stmt: &Statement) -> Result<Completion, JsError> {
        match stmt {
            Statement::Expression(expr) => {
                let value = self.evaluate_expression(&expr.expression)?;
                Ok(Completion::Normal(Some(value)))
            }

            Statement::VariableDeclaration(decl) => {
                self.execute_variable_declaration(decl)?;
                Ok(Completion::Normal(None))
            }

            // Hoisted when the enclosing body was entered
            Statement::FunctionDeclaration(_) => Ok(Completion::Normal(None)),

            Statement::Block(block) => self.execute_block(block),

            Statement::If(if_stmt) => {
                let test = self.evaluate_expression(&if_stmt.test)?;
                if test.to_boolean() {
                    self.execute_statement(&if_stmt.consequent)
                } else if let Some(alt) = &if_stmt.alternate {
                    self.execute_statement(alt)
                } else {
                    Ok(Completion::Normal(None))
                }
            }

            Statement::For(for_stmt) => self.execute_for(for_stmt, &[]),
            Statement::ForIn(for_in) => self.execute_for_in(for_in, &[]),
            Statement::While(while_stmt) => self.execute_while(while_stmt, &[]),
            Statement::DoWhile(do_while) => self.execute_do_while(do_while, &[]),
            Statement::Labeled(labeled) => self.execute_labeled(labeled),
            Statement::Switch(switch) => self.execute_switch(switch),
            Statement::With(with) => self.execute_with(with),
            Statement::Try(try_stmt) => self.execute_try(try_stmt),

            Statement::Return(ret) => {
                let value = match &ret.argument {
                    Some(arg) => self.evaluate_expression(arg)?,
                    None => JsValue::Undefined,
                };
                Ok(Completion::Return(value))
            }

            Statement::Break(brk) => Ok(Completion::Break(brk.label.as_ref().map(|l| l.name))),

            Statement::Continue(cont) => {
                Ok(Completion::Continue(cont.label.as_ref().map(|l| l.name)))
            }

            Statement::Throw(throw) => {
                let value = self.evaluate_expression(&throw.argument)?;
                Err(JsError::Thrown(value))
            }

            Statement::Empty(_) => Ok(Completion::Normal(None)),

            Statement::Debugger(span) => {
                trace!(line = span.line, column = span.column, "debugger statement");
                Ok(Completion::Normal(None))
            }
        }
    }

    /// Initialisers assign to the hoisted binding, wherever the scope chain
    /// finds it.
    fn execute_variable_declaration(&mut self, decl: &VariableDeclaration) -> Result<(), JsError> {
        for declarator in &decl.declarations {
            if let Some(init) = &declarator.init {
                let value = self.evaluate_expression(init)?;
                self.assign_identifier(declarator.id.name, value)?;
            }
        }
        Ok(())
    }

    /// Run `body` with `scope` as the current scope, restoring the previous
    /// scope on every exit path.
    pub(crate) fn in_scope<T>(
        &mut self,
        scope: Env,
        body: impl FnOnce(&mut Self) -> Result<T, JsError>,
    ) -> Result<T, JsError> {
        let saved = std::mem::replace(&mut self.scope, scope);
        let result = body(self);
        self.scope = saved;
        result
    }

    fn execute_block(&mut self, block: &BlockStatement) -> Result<Completion, JsError> {
        let scope = Env::new_scope(&self.scope);
        self.in_scope(scope, |interp| interp.execute_statements(&block.body))
    }

    fn execute_labeled(&mut self, labeled: &LabeledStatement) -> Result<Completion, JsError> {
        // `a: b: while (...)` attaches both labels to the loop
        let mut labels = vec![labeled.label.name];
        let mut body = &*labeled.body;
        while let Statement::Labeled(inner) = body {
            labels.push(inner.label.name);
            body = &inner.body;
        }

        let completion = match body {
            Statement::For(s) => self.execute_for(s, &labels)?,
            Statement::ForIn(s) => self.execute_for_in(s, &labels)?,
            Statement::While(s) => self.execute_while(s, &labels)?,
            Statement::DoWhile(s) => self.execute_do_while(s, &labels)?,
            other => self.execute_statement(other)?,
        };

        Ok(match completion {
            Completion::Break(Some(label)) if labels.contains(&label) => Completion::Normal(None),
            other => other,
        })
    }

    fn execute_while(
        &mut self,
        while_stmt: &WhileStatement,
        labels: &[Token],
    ) -> Result<Completion, JsError> {
        let mut last = None;
        loop {
            let test = self.evaluate_expression(&while_stmt.test)?;
            if !test.to_boolean() {
                break;
            }

            let completion = self.execute_statement(&while_stmt.body)?;
            track_value(&mut last, &completion);
            match loop_flow(completion, labels) {
                LoopFlow::Next => {}
                LoopFlow::Exit => break,
                LoopFlow::Propagate(completion) => return Ok(completion),
            }
        }
        Ok(Completion::Normal(last))
    }

    fn execute_do_while(
        &mut self,
        do_while: &DoWhileStatement,
        labels: &[Token],
    ) -> Result<Completion, JsError> {
        let mut last = None;
        loop {
            let completion = self.execute_statement(&do_while.body)?;
            track_value(&mut last, &completion);
            match loop_flow(completion, labels) {
                LoopFlow::Next => {}
                LoopFlow::Exit => break,
                LoopFlow::Propagate(completion) => return Ok(completion),
            }

            let test = self.evaluate_expression(&do_while.test)?;
            if !test.to_boolean() {
                break;
            }
        }
        Ok(Completion::Normal(last))
    }

    fn execute_for(
        &mut self,
        for_stmt: &ForStatement,
        labels: &[Token],
    ) -> Result<Completion, JsError> {
        match &for_stmt.init {
            Some(ForInit::Variable(decl)) => self.execute_variable_declaration(decl)?,
            Some(ForInit::Expression(expr)) => {
                self.evaluate_expression(expr)?;
            }
            None => {}
        }

        let mut last = None;
        loop {
            if let Some(test) = &for_stmt.test {
                if !self.evaluate_expression(test)?.to_boolean() {
                    break;
                }
            }

            let completion = self.execute_statement(&for_stmt.body)?;
            track_value(&mut last, &completion);
            match loop_flow(completion, labels) {
                LoopFlow::Next => {}
                LoopFlow::Exit => break,
                LoopFlow::Propagate(completion) => return Ok(completion),
            }

            if let Some(update) = &for_stmt.update {
                self.evaluate_expression(update)?;
            }
        }
        Ok(Completion::Normal(last))
    }

    fn execute_for_in(
        &mut self,
        for_in: &ForInStatement,
        labels: &[Token],
    ) -> Result<Completion, JsError> {
        if let ForInLeft::Variable(declarator) = &for_in.left {
            if let Some(init) = &declarator.init {
                let value = self.evaluate_expression(init)?;
                self.assign_identifier(declarator.id.name, value)?;
            }
        }

        let subject = self.evaluate_expression(&for_in.right)?;
        if subject.is_null_or_undefined() {
            return Ok(Completion::Normal(None));
        }
        let object = self.to_object(&subject)?;

        let mut last = None;
        for key in object.keys() {
            // Keys deleted by an earlier iteration are skipped
            if !object.has(&key) {
                continue;
            }
            let name = JsValue::String(key.to_js_string());
            match &for_in.left {
                ForInLeft::Variable(declarator) => {
                    self.assign_identifier(declarator.id.name, name)?;
                }
                ForInLeft::Expression(target) => {
                    let reference = self.evaluate_reference(target)?;
                    reference.assign(name)?;
                }
            }

            let completion = self.execute_statement(&for_in.body)?;
            track_value(&mut last, &completion);
            match loop_flow(completion, labels) {
                LoopFlow::Next => {}
                LoopFlow::Exit => break,
                LoopFlow::Propagate(completion) => return Ok(completion),
            }
        }
        Ok(Completion::Normal(last))
    }

    fn execute_switch(&mut self, switch: &SwitchStatement) -> Result<Completion, JsError> {
        let discriminant = self.evaluate_expression(&switch.discriminant)?;
        let scope = Env::new_scope(&self.scope);

        self.in_scope(scope, |interp| {
            let mut start = None;
            for (i, case) in switch.cases.iter().enumerate() {
                if let Some(test) = &case.test {
                    let value = interp.evaluate_expression(test)?;
                    if discriminant.strict_equals(&value) {
                        start = Some(i);
                        break;
                    }
                }
            }
            let start = start.or_else(|| switch.cases.iter().position(|c| c.test.is_none()));
            let Some(start) = start else {
                return Ok(Completion::Normal(None));
            };

            let mut last = None;
            for case in switch.cases.iter().skip(start) {
                match interp.execute_statements(&case.consequent)? {
                    Completion::Normal(value) => {
                        if value.is_some() {
                            last = value;
                        }
                    }
                    Completion::Break(None) => return Ok(Completion::Normal(last)),
                    abrupt => return Ok(abrupt),
                }
            }
            Ok(Completion::Normal(last))
        })
    }

    fn execute_with(&mut self, with: &WithStatement) -> Result<Completion, JsError> {
        let value = self.evaluate_expression(&with.object)?;
        let target = self.to_object(&value)?;
        let scope = Env::new(ObjectKind::With(target), Some(self.scope.cheap_clone()));
        self.in_scope(scope, |interp| interp.execute_statement(&with.body))
    }

    fn execute_try(&mut self, try_stmt: &TryStatement) -> Result<Completion, JsError> {
        let mut result = self.execute_block(&try_stmt.block);

        if let Some(handler) = &try_stmt.handler {
            if let Err(err) = result {
                result = if err.is_catchable() {
                    let value = self.error_to_value(err)?;
                    let scope = Env::new_scope(&self.scope);
                    scope.put(PropertyKey::Name(handler.param.name), value)?;
                    self.in_scope(scope, |interp| interp.execute_statements(&handler.body.body))
                } else {
                    Err(err)
                };
            }
        }

        let Some(finalizer) = &try_stmt.finalizer else {
            return result;
        };
        // Host-fatal errors unwind straight to the host
        if matches!(&result, Err(err) if !err.is_catchable()) {
            return result;
        }

        match self.execute_block(finalizer)? {
            Completion::Normal(_) => result,
            abrupt => Ok(abrupt),
        }
    }
}
