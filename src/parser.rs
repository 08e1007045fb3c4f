//! Parser for ES3 source code
//!
//! Uses recursive descent with Pratt parsing for binary expressions.

use std::rc::Rc;

use crate::ast::*;
use crate::env::PropertyKey;
use crate::error::JsError;
use crate::intern::intern;
use crate::lexer::{Lexeme, Lexer, Span, TokenKind, keyword_text};

/// Parser for ES3 source code
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Lexeme,
    previous: Lexeme,
    /// Set while parsing a `for (...;` head, where `in` ends the expression.
    no_in: bool,
    /// Nesting depth of function bodies (`return` is only legal inside one).
    function_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            previous: Lexeme::eof(0, 1, 1),
            no_in: false,
            function_depth: 0,
        }
    }

    /// Parse a complete program
    pub fn parse_program(&mut self) -> Result<Program, JsError> {
        let mut body = Vec::new();

        while !self.is_at_end() {
            body.push(self.parse_statement()?);
        }

        Ok(Program::new(body))
    }

    // ============ STATEMENTS ============

    fn parse_statement(&mut self) -> Result<Statement, JsError> {
        // Labeled statement (identifier followed by colon)
        if self.check_identifier() && self.peek_is(&TokenKind::Colon) {
            return self.parse_labeled_statement();
        }

        match &self.current.kind {
            TokenKind::Var => {
                let decl = self.parse_variable_declaration()?;
                self.expect_semicolon()?;
                Ok(Statement::VariableDeclaration(decl))
            }
            TokenKind::Function => Ok(Statement::FunctionDeclaration(Rc::new(
                self.parse_function(true)?,
            ))),
            TokenKind::If => self.parse_if_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Do => self.parse_do_while_statement(),
            TokenKind::Switch => self.parse_switch_statement(),
            TokenKind::Try => self.parse_try_statement(),
            TokenKind::With => self.parse_with_statement(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Break => self.parse_break_statement(),
            TokenKind::Continue => self.parse_continue_statement(),
            TokenKind::Throw => self.parse_throw_statement(),
            TokenKind::LBrace => Ok(Statement::Block(self.parse_block_statement()?)),
            TokenKind::Semicolon => {
                let span = self.current.span;
                self.advance();
                Ok(Statement::Empty(span))
            }
            TokenKind::Debugger => {
                let start = self.current.span;
                self.advance();
                self.expect_semicolon()?;
                Ok(Statement::Debugger(self.span_from(start)))
            }
            _ => {
                let start = self.current.span;
                let expression = self.parse_expression()?;
                self.expect_semicolon()?;
                let span = self.span_from(start);
                Ok(Statement::Expression(ExpressionStatement { expression, span }))
            }
        }
    }

    /// `var a = 1, b` without the trailing semicolon
    fn parse_variable_declaration(&mut self) -> Result<VariableDeclaration, JsError> {
        let start = self.current.span;
        self.require_token(&TokenKind::Var)?;

        let mut declarations = vec![self.parse_variable_declarator()?];
        while self.match_token(&TokenKind::Comma) {
            declarations.push(self.parse_variable_declarator()?);
        }

        let span = self.span_from(start);
        Ok(VariableDeclaration { declarations, span })
    }

    fn parse_variable_declarator(&mut self) -> Result<VariableDeclarator, JsError> {
        let start = self.current.span;
        let id = self.parse_identifier()?;
        let init = if self.match_token(&TokenKind::Eq) {
            Some(self.parse_assignment_expression()?)
        } else {
            None
        };
        let span = self.span_from(start);
        Ok(VariableDeclarator { id, init, span })
    }

    /// `function name(a, b) { ... }`; the name is required for declarations.
    fn parse_function(&mut self, is_declaration: bool) -> Result<FunctionLiteral, JsError> {
        let start = self.current.span;
        self.require_token(&TokenKind::Function)?;

        let id = if self.check_identifier() {
            Some(self.parse_identifier()?)
        } else if is_declaration {
            return Err(self.unexpected_token("function name"));
        } else {
            None
        };

        self.require_token(&TokenKind::LParen)?;
        let mut params = vec![];
        while !self.check(&TokenKind::RParen) {
            params.push(self.parse_identifier()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.require_token(&TokenKind::RParen)?;

        // A function body resets the for-head `in` restriction
        let saved_no_in = std::mem::replace(&mut self.no_in, false);
        self.function_depth += 1;
        let body = self.parse_block_statement();
        self.function_depth -= 1;
        self.no_in = saved_no_in;
        let body = body?;

        let span = self.span_from(start);
        Ok(FunctionLiteral::new(id, params, body.body, span))
    }

    fn parse_block_statement(&mut self) -> Result<BlockStatement, JsError> {
        let start = self.current.span;
        self.require_token(&TokenKind::LBrace)?;

        let mut body = vec![];

        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            body.push(self.parse_statement()?);
        }

        self.require_token(&TokenKind::RBrace)?;

        let span = self.span_from(start);
        Ok(BlockStatement { body, span })
    }

    fn parse_if_statement(&mut self) -> Result<Statement, JsError> {
        let start = self.current.span;
        self.require_token(&TokenKind::If)?;
        self.require_token(&TokenKind::LParen)?;
        let test = self.parse_expression()?;
        self.require_token(&TokenKind::RParen)?;

        let consequent = Box::new(self.parse_statement()?);

        let alternate = if self.match_token(&TokenKind::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        let span = self.span_from(start);
        Ok(Statement::If(IfStatement {
            test,
            consequent,
            alternate,
            span,
        }))
    }

    fn parse_for_statement(&mut self) -> Result<Statement, JsError> {
        let start = self.current.span;
        self.require_token(&TokenKind::For)?;
        self.require_token(&TokenKind::LParen)?;

        let saved_no_in = std::mem::replace(&mut self.no_in, true);
        let head = self.parse_for_head();
        self.no_in = saved_no_in;

        let init = match head? {
            ForHead::In(left) => {
                let right = self.parse_expression()?;
                self.require_token(&TokenKind::RParen)?;
                let body = Box::new(self.parse_statement()?);
                let span = self.span_from(start);
                return Ok(Statement::ForIn(ForInStatement {
                    left,
                    right,
                    body,
                    span,
                }));
            }
            ForHead::Init(init) => init,
        };

        self.require_token(&TokenKind::Semicolon)?;

        let test = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.require_token(&TokenKind::Semicolon)?;

        let update = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.require_token(&TokenKind::RParen)?;
        let body = Box::new(self.parse_statement()?);

        let span = self.span_from(start);
        Ok(Statement::For(ForStatement {
            init,
            test,
            update,
            body,
            span,
        }))
    }

    /// Everything between `for (` and the first `;` (or the `in` of a for-in).
    fn parse_for_head(&mut self) -> Result<ForHead, JsError> {
        if self.check(&TokenKind::Semicolon) {
            return Ok(ForHead::Init(None));
        }

        if self.check(&TokenKind::Var) {
            let mut decl = self.parse_variable_declaration()?;
            if self.match_token(&TokenKind::In) {
                if decl.declarations.len() != 1 {
                    return Err(self.error("Invalid left-hand side in for-in loop"));
                }
                return match decl.declarations.pop() {
                    Some(declarator) => Ok(ForHead::In(ForInLeft::Variable(declarator))),
                    None => Err(self.error("Invalid left-hand side in for-in loop")),
                };
            }
            return Ok(ForHead::Init(Some(ForInit::Variable(decl))));
        }

        let expr = self.parse_expression()?;
        if self.match_token(&TokenKind::In) {
            if !matches!(expr, Expression::Identifier(_) | Expression::Member(_)) {
                return Err(self.error("Invalid left-hand side in for-in loop"));
            }
            return Ok(ForHead::In(ForInLeft::Expression(expr)));
        }
        Ok(ForHead::Init(Some(ForInit::Expression(expr))))
    }

    fn parse_while_statement(&mut self) -> Result<Statement, JsError> {
        let start = self.current.span;
        self.require_token(&TokenKind::While)?;
        self.require_token(&TokenKind::LParen)?;
        let test = self.parse_expression()?;
        self.require_token(&TokenKind::RParen)?;
        let body = Box::new(self.parse_statement()?);

        let span = self.span_from(start);
        Ok(Statement::While(WhileStatement { test, body, span }))
    }

    fn parse_do_while_statement(&mut self) -> Result<Statement, JsError> {
        let start = self.current.span;
        self.require_token(&TokenKind::Do)?;
        let body = Box::new(self.parse_statement()?);
        self.require_token(&TokenKind::While)?;
        self.require_token(&TokenKind::LParen)?;
        let test = self.parse_expression()?;
        self.require_token(&TokenKind::RParen)?;
        // ES3 inserts a semicolon after do-while even without a newline
        self.match_token(&TokenKind::Semicolon);

        let span = self.span_from(start);
        Ok(Statement::DoWhile(DoWhileStatement { body, test, span }))
    }

    fn parse_with_statement(&mut self) -> Result<Statement, JsError> {
        let start = self.current.span;
        self.require_token(&TokenKind::With)?;
        self.require_token(&TokenKind::LParen)?;
        let object = self.parse_expression()?;
        self.require_token(&TokenKind::RParen)?;
        let body = Box::new(self.parse_statement()?);

        let span = self.span_from(start);
        Ok(Statement::With(WithStatement { object, body, span }))
    }

    fn parse_switch_statement(&mut self) -> Result<Statement, JsError> {
        let start = self.current.span;
        self.require_token(&TokenKind::Switch)?;
        self.require_token(&TokenKind::LParen)?;
        let discriminant = self.parse_expression()?;
        self.require_token(&TokenKind::RParen)?;
        self.require_token(&TokenKind::LBrace)?;

        let mut cases: Vec<SwitchCase> = vec![];

        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            let case_start = self.current.span;
            let test = if self.match_token(&TokenKind::Case) {
                Some(self.parse_expression()?)
            } else {
                self.require_token(&TokenKind::Default)?;
                if cases.iter().any(|c| c.test.is_none()) {
                    return Err(JsError::syntax_error(
                        "More than one default clause in switch statement",
                        case_start.line,
                        case_start.column,
                    ));
                }
                None
            };

            self.require_token(&TokenKind::Colon)?;

            let mut consequent = vec![];
            while !self.check(&TokenKind::Case)
                && !self.check(&TokenKind::Default)
                && !self.check(&TokenKind::RBrace)
                && !self.is_at_end()
            {
                consequent.push(self.parse_statement()?);
            }

            let span = self.span_from(case_start);
            cases.push(SwitchCase {
                test,
                consequent,
                span,
            });
        }

        self.require_token(&TokenKind::RBrace)?;

        let span = self.span_from(start);
        Ok(Statement::Switch(SwitchStatement {
            discriminant,
            cases,
            span,
        }))
    }

    fn parse_try_statement(&mut self) -> Result<Statement, JsError> {
        let start = self.current.span;
        self.require_token(&TokenKind::Try)?;
        let block = self.parse_block_statement()?;

        let handler = if self.match_token(&TokenKind::Catch) {
            let catch_start = self.previous.span;
            self.require_token(&TokenKind::LParen)?;
            let param = self.parse_identifier()?;
            self.require_token(&TokenKind::RParen)?;
            let body = self.parse_block_statement()?;
            let span = self.span_from(catch_start);
            Some(CatchClause { param, body, span })
        } else {
            None
        };

        let finalizer = if self.match_token(&TokenKind::Finally) {
            Some(self.parse_block_statement()?)
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            return Err(self.error("Missing catch or finally after try"));
        }

        let span = self.span_from(start);
        Ok(Statement::Try(TryStatement {
            block,
            handler,
            finalizer,
            span,
        }))
    }

    fn parse_return_statement(&mut self) -> Result<Statement, JsError> {
        let start = self.current.span;
        if self.function_depth == 0 {
            return Err(self.error("Illegal return statement"));
        }
        self.require_token(&TokenKind::Return)?;

        let argument = if self.check(&TokenKind::Semicolon)
            || self.check(&TokenKind::RBrace)
            || self.is_at_end()
            || self.lexer.had_newline_before()
        {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.expect_semicolon()?;

        let span = self.span_from(start);
        Ok(Statement::Return(ReturnStatement { argument, span }))
    }

    fn parse_jump_label(&mut self) -> Result<Option<Identifier>, JsError> {
        if !self.check(&TokenKind::Semicolon)
            && !self.lexer.had_newline_before()
            && self.check_identifier()
        {
            Ok(Some(self.parse_identifier()?))
        } else {
            Ok(None)
        }
    }

    fn parse_break_statement(&mut self) -> Result<Statement, JsError> {
        let start = self.current.span;
        self.require_token(&TokenKind::Break)?;
        let label = self.parse_jump_label()?;
        self.expect_semicolon()?;

        let span = self.span_from(start);
        Ok(Statement::Break(BreakStatement { label, span }))
    }

    fn parse_continue_statement(&mut self) -> Result<Statement, JsError> {
        let start = self.current.span;
        self.require_token(&TokenKind::Continue)?;
        let label = self.parse_jump_label()?;
        self.expect_semicolon()?;

        let span = self.span_from(start);
        Ok(Statement::Continue(ContinueStatement { label, span }))
    }

    fn parse_throw_statement(&mut self) -> Result<Statement, JsError> {
        let start = self.current.span;
        self.require_token(&TokenKind::Throw)?;

        if self.lexer.had_newline_before() {
            return Err(self.error("Illegal newline after throw"));
        }

        let argument = self.parse_expression()?;
        self.expect_semicolon()?;

        let span = self.span_from(start);
        Ok(Statement::Throw(ThrowStatement { argument, span }))
    }

    fn parse_labeled_statement(&mut self) -> Result<Statement, JsError> {
        let start = self.current.span;
        let label = self.parse_identifier()?;
        self.require_token(&TokenKind::Colon)?;
        let body = Box::new(self.parse_statement()?);

        let span = self.span_from(start);
        Ok(Statement::Labeled(LabeledStatement { label, body, span }))
    }

    // ============ EXPRESSIONS ============

    fn parse_expression(&mut self) -> Result<Expression, JsError> {
        let start = self.current.span;
        let mut expr = self.parse_assignment_expression()?;

        if self.check(&TokenKind::Comma) {
            let mut expressions = vec![expr];
            while self.match_token(&TokenKind::Comma) {
                expressions.push(self.parse_assignment_expression()?);
            }
            let span = self.span_from(start);
            expr = Expression::Sequence(SequenceExpression { expressions, span });
        }

        Ok(expr)
    }

    fn parse_assignment_expression(&mut self) -> Result<Expression, JsError> {
        let start = self.current.span;
        let expr = self.parse_conditional_expression()?;

        if let Some(op) = self.current_assignment_op() {
            let left = match expr {
                Expression::Identifier(id) => AssignmentTarget::Identifier(id),
                Expression::Member(member) => AssignmentTarget::Member(member),
                _ => return Err(self.error("Invalid left-hand side in assignment")),
            };
            self.advance();
            let right = Box::new(self.parse_assignment_expression()?);
            let span = self.span_from(start);
            return Ok(Expression::Assignment(AssignmentExpression {
                operator: op,
                left,
                right,
                span,
            }));
        }

        Ok(expr)
    }

    fn parse_conditional_expression(&mut self) -> Result<Expression, JsError> {
        let start = self.current.span;
        let test = self.parse_binary_expression(0)?;

        if self.match_token(&TokenKind::Question) {
            // `in` is allowed again between `?` and `:`
            let saved_no_in = std::mem::replace(&mut self.no_in, false);
            let consequent = self.parse_assignment_expression();
            self.no_in = saved_no_in;
            let consequent = Box::new(consequent?);
            self.require_token(&TokenKind::Colon)?;
            let alternate = Box::new(self.parse_assignment_expression()?);
            let span = self.span_from(start);
            return Ok(Expression::Conditional(ConditionalExpression {
                test: Box::new(test),
                consequent,
                alternate,
                span,
            }));
        }

        Ok(test)
    }

    /// Pratt parser for binary and logical expressions
    fn parse_binary_expression(&mut self, min_prec: u8) -> Result<Expression, JsError> {
        let start = self.current.span;
        let mut left = self.parse_unary_expression()?;

        while let Some((op, prec)) = self.current_binary_op() {
            if prec < min_prec {
                break;
            }
            self.advance();

            // All binary operators here are left-associative
            let right = Box::new(self.parse_binary_expression(prec + 1)?);
            let span = self.span_from(start);
            left = match op {
                InfixOp::Logical(operator) => Expression::Logical(LogicalExpression {
                    operator,
                    left: Box::new(left),
                    right,
                    span,
                }),
                InfixOp::Binary(operator) => Expression::Binary(BinaryExpression {
                    operator,
                    left: Box::new(left),
                    right,
                    span,
                }),
            };
        }

        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> Result<Expression, JsError> {
        let start = self.current.span;

        if let Some(op) = self.current_unary_op() {
            self.advance();
            let argument = Box::new(self.parse_unary_expression()?);
            let span = self.span_from(start);
            return Ok(Expression::Unary(UnaryExpression {
                operator: op,
                argument,
                span,
            }));
        }

        if let Some(op) = self.current_update_op() {
            self.advance();
            let argument = self.parse_unary_expression()?;
            self.check_update_target(&argument)?;
            let span = self.span_from(start);
            return Ok(Expression::Update(UpdateExpression {
                operator: op,
                argument: Box::new(argument),
                prefix: true,
                span,
            }));
        }

        self.parse_postfix_expression()
    }

    fn parse_postfix_expression(&mut self) -> Result<Expression, JsError> {
        let start = self.current.span;
        let mut expr = self.parse_left_hand_side_expression()?;

        // Restricted production: no line terminator before postfix ++/--
        if !self.lexer.had_newline_before() {
            if let Some(op) = self.current_update_op() {
                self.check_update_target(&expr)?;
                self.advance();
                let span = self.span_from(start);
                expr = Expression::Update(UpdateExpression {
                    operator: op,
                    argument: Box::new(expr),
                    prefix: false,
                    span,
                });
            }
        }

        Ok(expr)
    }

    fn check_update_target(&self, expr: &Expression) -> Result<(), JsError> {
        match expr {
            Expression::Identifier(_) | Expression::Member(_) => Ok(()),
            other => Err(JsError::syntax_error(
                "Invalid left-hand side expression in update operation",
                other.span().line,
                other.span().column,
            )),
        }
    }

    fn parse_left_hand_side_expression(&mut self) -> Result<Expression, JsError> {
        let start = self.current.span;
        let mut expr = self.parse_member_expression()?;

        // Call expressions and member access chain
        loop {
            if self.check(&TokenKind::LParen) {
                let arguments = self.parse_call_arguments()?;
                let span = self.span_from(start);
                expr = Expression::Call(CallExpression {
                    callee: Box::new(expr),
                    arguments,
                    span,
                });
            } else if let Some(property) = self.parse_member_suffix()? {
                let span = self.span_from(start);
                expr = Expression::Member(MemberExpression {
                    object: Box::new(expr),
                    property,
                    span,
                });
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// `new` binds to the nearest member expression; its argument list is optional.
    fn parse_member_expression(&mut self) -> Result<Expression, JsError> {
        let start = self.current.span;

        let mut expr = if self.match_token(&TokenKind::New) {
            let callee = Box::new(self.parse_member_expression()?);
            let arguments = if self.check(&TokenKind::LParen) {
                self.parse_call_arguments()?
            } else {
                vec![]
            };
            let span = self.span_from(start);
            Expression::New(NewExpression {
                callee,
                arguments,
                span,
            })
        } else {
            self.parse_primary_expression()?
        };

        while let Some(property) = self.parse_member_suffix()? {
            let span = self.span_from(start);
            expr = Expression::Member(MemberExpression {
                object: Box::new(expr),
                property,
                span,
            });
        }

        Ok(expr)
    }

    /// `.name` or `[expr]`
    fn parse_member_suffix(&mut self) -> Result<Option<MemberProperty>, JsError> {
        if self.match_token(&TokenKind::Dot) {
            // After a dot, any identifier or keyword can be used as a property name
            return Ok(Some(MemberProperty::Identifier(self.parse_identifier_name()?)));
        }
        if self.match_token(&TokenKind::LBracket) {
            let saved_no_in = std::mem::replace(&mut self.no_in, false);
            let property = self.parse_expression();
            self.no_in = saved_no_in;
            let property = property?;
            self.require_token(&TokenKind::RBracket)?;
            return Ok(Some(MemberProperty::Expression(Box::new(property))));
        }
        Ok(None)
    }

    fn parse_primary_expression(&mut self) -> Result<Expression, JsError> {
        let start = self.current.span;

        match &self.current.kind {
            TokenKind::Number(n) => {
                let n = *n;
                self.advance();
                Ok(self.literal(LiteralValue::Number(n), start))
            }
            TokenKind::String(s) => {
                let s = s.to_string();
                self.advance();
                Ok(self.literal(LiteralValue::String(s), start))
            }
            TokenKind::True => {
                self.advance();
                Ok(self.literal(LiteralValue::Boolean(true), start))
            }
            TokenKind::False => {
                self.advance();
                Ok(self.literal(LiteralValue::Boolean(false), start))
            }
            TokenKind::Null => {
                self.advance();
                Ok(self.literal(LiteralValue::Null, start))
            }
            TokenKind::Identifier(_) => Ok(Expression::Identifier(self.parse_identifier()?)),
            TokenKind::This => {
                self.advance();
                Ok(Expression::This(self.span_from(start)))
            }
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_object_literal(),
            TokenKind::LParen => {
                self.advance();
                let saved_no_in = std::mem::replace(&mut self.no_in, false);
                let expr = self.parse_expression();
                self.no_in = saved_no_in;
                let expr = expr?;
                self.require_token(&TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::Function => Ok(Expression::Function(Rc::new(self.parse_function(false)?))),

            // The lexer scanned `/` or `/=`, but a regexp literal is expected here
            TokenKind::Slash | TokenKind::SlashEq => {
                let token = self.lexer.rescan_as_regexp(self.current.span);
                match token.kind {
                    TokenKind::RegExp(pattern, flags) => {
                        self.previous = Lexeme::new(TokenKind::Slash, token.span);
                        self.current = self.lexer.next_token();
                        Ok(Expression::RegExp(RegExpLiteral {
                            pattern,
                            flags,
                            span: self.span_from(start),
                        }))
                    }
                    _ => Err(JsError::syntax_error(
                        "Invalid regular expression: missing /",
                        start.line,
                        start.column,
                    )),
                }
            }

            _ => Err(self.unexpected_token("expression")),
        }
    }

    fn literal(&self, value: LiteralValue, start: Span) -> Expression {
        Expression::Literal(Literal {
            value,
            span: self.span_from(start),
        })
    }

    fn parse_array_literal(&mut self) -> Result<Expression, JsError> {
        let start = self.current.span;
        self.require_token(&TokenKind::LBracket)?;

        let mut elements = vec![];

        while !self.check(&TokenKind::RBracket) && !self.is_at_end() {
            if self.match_token(&TokenKind::Comma) {
                elements.push(None);
                continue;
            }

            elements.push(Some(self.parse_assignment_expression()?));

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        self.require_token(&TokenKind::RBracket)?;

        let span = self.span_from(start);
        Ok(Expression::Array(ArrayExpression { elements, span }))
    }

    fn parse_object_literal(&mut self) -> Result<Expression, JsError> {
        let start = self.current.span;
        self.require_token(&TokenKind::LBrace)?;

        let mut properties = vec![];

        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            let prop_start = self.current.span;
            let key = self.parse_property_name()?;
            self.require_token(&TokenKind::Colon)?;
            let value = self.parse_assignment_expression()?;
            let span = self.span_from(prop_start);
            properties.push(Property { key, value, span });

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        self.require_token(&TokenKind::RBrace)?;

        let span = self.span_from(start);
        Ok(Expression::Object(ObjectExpression { properties, span }))
    }

    fn parse_property_name(&mut self) -> Result<PropertyKey, JsError> {
        let key = match &self.current.kind {
            TokenKind::Identifier(token) => PropertyKey::from(*token),
            TokenKind::String(s) => PropertyKey::from(s.as_str()),
            TokenKind::Number(n) => PropertyKey::from_number(*n),
            other => match keyword_text(other) {
                Some(text) => PropertyKey::from(text),
                None => return Err(self.unexpected_token("property name")),
            },
        };
        self.advance();
        Ok(key)
    }

    fn parse_call_arguments(&mut self) -> Result<Vec<Expression>, JsError> {
        self.require_token(&TokenKind::LParen)?;
        let saved_no_in = std::mem::replace(&mut self.no_in, false);
        let mut arguments = vec![];
        let result = loop {
            if self.check(&TokenKind::RParen) {
                break Ok(());
            }
            match self.parse_assignment_expression() {
                Ok(arg) => arguments.push(arg),
                Err(err) => break Err(err),
            }
            if !self.match_token(&TokenKind::Comma) {
                break Ok(());
            }
        };
        self.no_in = saved_no_in;
        result?;
        self.require_token(&TokenKind::RParen)?;
        Ok(arguments)
    }

    // ============ HELPERS ============

    fn parse_identifier(&mut self) -> Result<Identifier, JsError> {
        match &self.current.kind {
            TokenKind::Identifier(name) => {
                let name = *name;
                let span = self.current.span;
                self.advance();
                Ok(Identifier { name, span })
            }
            _ => Err(self.unexpected_token("identifier")),
        }
    }

    /// Identifier or keyword, as allowed after `.`
    fn parse_identifier_name(&mut self) -> Result<Identifier, JsError> {
        let span = self.current.span;
        let name = match &self.current.kind {
            TokenKind::Identifier(name) => *name,
            other => match keyword_text(other) {
                Some(text) => intern(text),
                None => return Err(self.unexpected_token("property name")),
            },
        };
        self.advance();
        Ok(Identifier { name, span })
    }

    fn advance(&mut self) {
        self.previous = std::mem::replace(&mut self.current, self.lexer.next_token());
    }

    fn require_token(&mut self, kind: &TokenKind) -> Result<(), JsError> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected_token(&format!("{:?}", kind)))
        }
    }

    fn expect_semicolon(&mut self) -> Result<(), JsError> {
        if self.match_token(&TokenKind::Semicolon) {
            return Ok(());
        }

        // ASI: accept if at end, before }, or after newline
        if self.is_at_end() || self.check(&TokenKind::RBrace) || self.lexer.had_newline_before() {
            return Ok(());
        }

        Err(self.unexpected_token("';'"))
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    /// Check if the next token (after current) is of the given kind
    fn peek_is(&mut self, kind: &TokenKind) -> bool {
        let checkpoint = self.lexer.checkpoint();
        let next = self.lexer.next_token();
        self.lexer.restore(checkpoint);
        std::mem::discriminant(&next.kind) == std::mem::discriminant(kind)
    }

    fn check_identifier(&self) -> bool {
        matches!(self.current.kind, TokenKind::Identifier(_))
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn is_at_end(&self) -> bool {
        self.current.kind == TokenKind::Eof
    }

    fn span_from(&self, start: Span) -> Span {
        Span::new(
            start.start,
            self.previous.span.end,
            start.line,
            start.column,
        )
    }

    fn error(&self, message: &str) -> JsError {
        JsError::syntax_error(message, self.current.span.line, self.current.span.column)
    }

    fn unexpected_token(&self, expected: &str) -> JsError {
        let message = match &self.current.kind {
            TokenKind::Eof => "Unexpected end of input".to_string(),
            TokenKind::Unterminated => "Unterminated string literal".to_string(),
            TokenKind::Invalid(c) => format!("Invalid or unexpected token '{c}'"),
            other => format!("Unexpected {:?}, expected {}", other, expected),
        };
        JsError::syntax_error(message, self.current.span.line, self.current.span.column)
    }

    /// (operator, precedence)
    fn current_binary_op(&self) -> Option<(InfixOp, u8)> {
        use InfixOp::{Binary, Logical};
        Some(match &self.current.kind {
            TokenKind::PipePipe => (Logical(LogicalOp::Or), 4),
            TokenKind::AmpAmp => (Logical(LogicalOp::And), 5),
            TokenKind::Pipe => (Binary(BinaryOp::BitOr), 6),
            TokenKind::Caret => (Binary(BinaryOp::BitXor), 7),
            TokenKind::Amp => (Binary(BinaryOp::BitAnd), 8),
            TokenKind::EqEq => (Binary(BinaryOp::Eq), 9),
            TokenKind::BangEq => (Binary(BinaryOp::NotEq), 9),
            TokenKind::EqEqEq => (Binary(BinaryOp::StrictEq), 9),
            TokenKind::BangEqEq => (Binary(BinaryOp::StrictNotEq), 9),
            TokenKind::Lt => (Binary(BinaryOp::Lt), 10),
            TokenKind::LtEq => (Binary(BinaryOp::LtEq), 10),
            TokenKind::Gt => (Binary(BinaryOp::Gt), 10),
            TokenKind::GtEq => (Binary(BinaryOp::GtEq), 10),
            TokenKind::In if !self.no_in => (Binary(BinaryOp::In), 10),
            TokenKind::Instanceof => (Binary(BinaryOp::Instanceof), 10),
            TokenKind::LtLt => (Binary(BinaryOp::LShift), 11),
            TokenKind::GtGt => (Binary(BinaryOp::RShift), 11),
            TokenKind::GtGtGt => (Binary(BinaryOp::URShift), 11),
            TokenKind::Plus => (Binary(BinaryOp::Add), 12),
            TokenKind::Minus => (Binary(BinaryOp::Sub), 12),
            TokenKind::Star => (Binary(BinaryOp::Mul), 13),
            TokenKind::Slash => (Binary(BinaryOp::Div), 13),
            TokenKind::Percent => (Binary(BinaryOp::Mod), 13),
            _ => return None,
        })
    }

    fn current_unary_op(&self) -> Option<UnaryOp> {
        match &self.current.kind {
            TokenKind::Minus => Some(UnaryOp::Minus),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            TokenKind::Typeof => Some(UnaryOp::Typeof),
            TokenKind::Void => Some(UnaryOp::Void),
            TokenKind::Delete => Some(UnaryOp::Delete),
            _ => None,
        }
    }

    fn current_update_op(&self) -> Option<UpdateOp> {
        match &self.current.kind {
            TokenKind::PlusPlus => Some(UpdateOp::Increment),
            TokenKind::MinusMinus => Some(UpdateOp::Decrement),
            _ => None,
        }
    }

    fn current_assignment_op(&self) -> Option<AssignmentOp> {
        match &self.current.kind {
            TokenKind::Eq => Some(AssignmentOp::Assign),
            TokenKind::PlusEq => Some(AssignmentOp::AddAssign),
            TokenKind::MinusEq => Some(AssignmentOp::SubAssign),
            TokenKind::StarEq => Some(AssignmentOp::MulAssign),
            TokenKind::SlashEq => Some(AssignmentOp::DivAssign),
            TokenKind::PercentEq => Some(AssignmentOp::ModAssign),
            TokenKind::AmpEq => Some(AssignmentOp::BitAndAssign),
            TokenKind::PipeEq => Some(AssignmentOp::BitOrAssign),
            TokenKind::CaretEq => Some(AssignmentOp::BitXorAssign),
            TokenKind::LtLtEq => Some(AssignmentOp::LShiftAssign),
            TokenKind::GtGtEq => Some(AssignmentOp::RShiftAssign),
            TokenKind::GtGtGtEq => Some(AssignmentOp::URShiftAssign),
            _ => None,
        }
    }
}

enum ForHead {
    Init(Option<ForInit>),
    In(ForInLeft),
}

enum InfixOp {
    Binary(BinaryOp),
    Logical(LogicalOp),
}

/// Parse `source` as a program.
pub fn parse(source: &str) -> Result<Program, JsError> {
    Parser::new(source).parse_program()
}
