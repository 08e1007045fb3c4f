//! Lexer for ES3 source code
//!
//! Converts source text into a stream of tokens. Identifiers are interned as
//! they are scanned. A `/` is always scanned as division; the parser asks for a
//! rescan when it sits where a regular expression literal may start.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::intern::{Token, intern};
use crate::value::JsString;

/// Source span information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self {
            start: 0,
            end: 0,
            line: 1,
            column: 1,
        }
    }
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Number(f64),
    String(JsString),
    RegExp(String, String), // (pattern, flags)
    True,
    False,
    Null,

    Identifier(Token),

    // Keywords
    Var,
    Function,
    Return,
    If,
    Else,
    For,
    While,
    Do,
    Break,
    Continue,
    Switch,
    Case,
    Default,
    Try,
    Catch,
    Finally,
    Throw,
    New,
    This,
    Typeof,
    Instanceof,
    In,
    Void,
    Delete,
    With,
    Debugger,

    // Operators
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    Percent,    // %
    PlusPlus,   // ++
    MinusMinus, // --
    Eq,         // =
    EqEq,       // ==
    EqEqEq,     // ===
    BangEq,     // !=
    BangEqEq,   // !==
    Lt,         // <
    LtEq,       // <=
    Gt,         // >
    GtEq,       // >=
    LtLt,       // <<
    GtGt,       // >>
    GtGtGt,     // >>>
    Amp,        // &
    AmpAmp,     // &&
    Pipe,       // |
    PipePipe,   // ||
    Caret,      // ^
    Tilde,      // ~
    Bang,       // !
    Question,   // ?

    // Assignment Operators
    PlusEq,     // +=
    MinusEq,    // -=
    StarEq,     // *=
    SlashEq,    // /=
    PercentEq,  // %=
    AmpEq,      // &=
    PipeEq,     // |=
    CaretEq,    // ^=
    LtLtEq,     // <<=
    GtGtEq,     // >>=
    GtGtGtEq,   // >>>=

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Dot,       // .
    Comma,     // ,
    Colon,     // :
    Semicolon, // ;

    // Special
    Eof,
    /// Unterminated string literal
    Unterminated,
    Invalid(char),
}

/// A token with its source location
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    pub kind: TokenKind,
    pub span: Span,
}

impl Lexeme {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn eof(pos: usize, line: u32, column: u32) -> Self {
        Self {
            kind: TokenKind::Eof,
            span: Span::new(pos, pos, line, column),
        }
    }
}

/// Lexer state checkpoint for backtracking
#[derive(Clone)]
pub struct LexerCheckpoint {
    current_pos: usize,
    line: u32,
    column: u32,
    start_pos: usize,
    start_line: u32,
    start_column: u32,
    saw_newline: bool,
}

/// Lexer for tokenizing ES3 source code
pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    /// Base offset added to char_indices positions (the iterator may restart mid-source)
    chars_base_offset: usize,
    current_pos: usize,
    line: u32,
    column: u32,
    start_pos: usize,
    start_line: u32,
    start_column: u32,
    /// Tracks if we just saw a newline (for ASI)
    saw_newline: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            chars_base_offset: 0,
            current_pos: 0,
            line: 1,
            column: 1,
            start_pos: 0,
            start_line: 1,
            start_column: 1,
            saw_newline: false,
        }
    }

    /// Create a checkpoint of the current lexer state for backtracking
    pub fn checkpoint(&self) -> LexerCheckpoint {
        LexerCheckpoint {
            current_pos: self.current_pos,
            line: self.line,
            column: self.column,
            start_pos: self.start_pos,
            start_line: self.start_line,
            start_column: self.start_column,
            saw_newline: self.saw_newline,
        }
    }

    /// Restore the lexer state from a checkpoint
    pub fn restore(&mut self, checkpoint: LexerCheckpoint) {
        self.current_pos = checkpoint.current_pos;
        self.line = checkpoint.line;
        self.column = checkpoint.column;
        self.start_pos = checkpoint.start_pos;
        self.start_line = checkpoint.start_line;
        self.start_column = checkpoint.start_column;
        self.saw_newline = checkpoint.saw_newline;
        self.reset_chars(checkpoint.current_pos);
    }

    fn reset_chars(&mut self, offset: usize) {
        self.chars_base_offset = offset;
        self.chars = self
            .source
            .get(offset..)
            .unwrap_or("")
            .char_indices()
            .peekable();
    }

    /// Reset the lexer to the start of `span` (a `/` or `/=` token) and scan
    /// a regular expression literal from there.
    pub fn rescan_as_regexp(&mut self, span: Span) -> Lexeme {
        self.current_pos = span.start;
        self.line = span.line;
        self.column = span.column;
        self.start_pos = span.start;
        self.start_line = span.line;
        self.start_column = span.column;
        self.reset_chars(span.start);
        self.scan_regexp()
    }

    /// Get the next token from the source
    pub fn next_token(&mut self) -> Lexeme {
        self.skip_whitespace_and_comments();

        self.start_pos = self.current_pos;
        self.start_line = self.line;
        self.start_column = self.column;

        let Some((_pos, ch)) = self.advance() else {
            return Lexeme::eof(self.current_pos, self.line, self.column);
        };

        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '~' => TokenKind::Tilde,
            ':' => TokenKind::Colon,
            '?' => TokenKind::Question,

            '.' => self.scan_dot(),
            '+' => self.scan_plus(),
            '-' => self.scan_minus(),
            '*' => self.scan_simple_assign(TokenKind::Star, TokenKind::StarEq),
            '/' => self.scan_simple_assign(TokenKind::Slash, TokenKind::SlashEq),
            '%' => self.scan_simple_assign(TokenKind::Percent, TokenKind::PercentEq),
            '^' => self.scan_simple_assign(TokenKind::Caret, TokenKind::CaretEq),
            '=' => self.scan_equals(),
            '!' => self.scan_bang(),
            '<' => self.scan_less_than(),
            '>' => self.scan_greater_than(),
            '&' => self.scan_ampersand(),
            '|' => self.scan_pipe(),

            '"' | '\'' => self.scan_string(ch),

            '0'..='9' => self.scan_number(ch),

            c if is_id_start(c) => self.scan_identifier(c),
            '\\' => self.scan_escaped_identifier(),

            c => TokenKind::Invalid(c),
        };

        Lexeme::new(kind, self.make_span())
    }

    /// Check if there was a newline before the current token
    pub fn had_newline_before(&self) -> bool {
        self.saw_newline
    }

    fn advance(&mut self) -> Option<(usize, char)> {
        let result = self.chars.next();
        if let Some((pos, ch)) = result {
            self.current_pos = self.chars_base_offset + pos + ch.len_utf8();
            if is_line_terminator(ch) {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        result
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, ch)| *ch)
    }

    fn peek_next(&self) -> Option<char> {
        let slice = self.source.get(self.current_pos..)?;
        let mut iter = slice.chars();
        iter.next();
        iter.next()
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn make_span(&self) -> Span {
        Span::new(
            self.start_pos,
            self.current_pos,
            self.start_line,
            self.start_column,
        )
    }

    fn skip_whitespace_and_comments(&mut self) {
        self.saw_newline = false;

        loop {
            match self.peek() {
                Some(' ' | '\t' | '\r' | '\u{000B}' | '\u{000C}' | '\u{00A0}' | '\u{FEFF}') => {
                    self.advance();
                }
                Some(c) if is_line_terminator(c) => {
                    self.saw_newline = true;
                    self.advance();
                }
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') => match self.peek_next() {
                    Some('/') => {
                        self.advance();
                        self.advance();
                        while let Some(ch) = self.peek() {
                            if is_line_terminator(ch) {
                                break;
                            }
                            self.advance();
                        }
                    }
                    Some('*') => {
                        self.advance();
                        self.advance();
                        loop {
                            match self.advance() {
                                Some((_, '*')) if self.peek() == Some('/') => {
                                    self.advance();
                                    break;
                                }
                                Some((_, c)) if is_line_terminator(c) => {
                                    self.saw_newline = true;
                                }
                                Some(_) => {}
                                None => break,
                            }
                        }
                    }
                    _ => break,
                },
                _ => break,
            }
        }
    }

    fn scan_dot(&mut self) -> TokenKind {
        if matches!(self.peek(), Some('0'..='9')) {
            self.scan_number('.')
        } else {
            TokenKind::Dot
        }
    }

    fn scan_plus(&mut self) -> TokenKind {
        if self.match_char('+') {
            TokenKind::PlusPlus
        } else if self.match_char('=') {
            TokenKind::PlusEq
        } else {
            TokenKind::Plus
        }
    }

    fn scan_minus(&mut self) -> TokenKind {
        if self.match_char('-') {
            TokenKind::MinusMinus
        } else if self.match_char('=') {
            TokenKind::MinusEq
        } else {
            TokenKind::Minus
        }
    }

    fn scan_simple_assign(&mut self, plain: TokenKind, assign: TokenKind) -> TokenKind {
        if self.match_char('=') { assign } else { plain }
    }

    /// Scan a regular expression literal.
    /// The leading `/` must be the next character (not yet consumed).
    pub fn scan_regexp(&mut self) -> Lexeme {
        let start_pos = self.current_pos;
        let start_line = self.line;
        let start_column = self.column;

        // opening /
        self.advance();

        let mut pattern = String::new();
        let mut in_class = false;
        let mut terminated = false;

        loop {
            match self.advance() {
                Some((_, '/')) if !in_class => {
                    terminated = true;
                    break;
                }
                Some((_, '[')) => {
                    in_class = true;
                    pattern.push('[');
                }
                Some((_, ']')) => {
                    in_class = false;
                    pattern.push(']');
                }
                Some((_, '\\')) => {
                    pattern.push('\\');
                    if let Some((_, c)) = self.advance() {
                        pattern.push(c);
                    }
                }
                Some((_, c)) if is_line_terminator(c) => break,
                Some((_, c)) => pattern.push(c),
                None => break,
            }
        }

        let span = |lexer: &Self| Span::new(start_pos, lexer.current_pos, start_line, start_column);
        if !terminated {
            return Lexeme::new(TokenKind::Unterminated, span(self));
        }

        let mut flags = String::new();
        while let Some(ch) = self.peek() {
            if is_id_continue(ch) {
                flags.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        Lexeme::new(TokenKind::RegExp(pattern, flags), span(self))
    }

    fn scan_equals(&mut self) -> TokenKind {
        if self.match_char('=') {
            if self.match_char('=') {
                TokenKind::EqEqEq
            } else {
                TokenKind::EqEq
            }
        } else {
            TokenKind::Eq
        }
    }

    fn scan_bang(&mut self) -> TokenKind {
        if self.match_char('=') {
            if self.match_char('=') {
                TokenKind::BangEqEq
            } else {
                TokenKind::BangEq
            }
        } else {
            TokenKind::Bang
        }
    }

    fn scan_less_than(&mut self) -> TokenKind {
        if self.match_char('<') {
            if self.match_char('=') {
                TokenKind::LtLtEq
            } else {
                TokenKind::LtLt
            }
        } else if self.match_char('=') {
            TokenKind::LtEq
        } else {
            TokenKind::Lt
        }
    }

    fn scan_greater_than(&mut self) -> TokenKind {
        if self.match_char('>') {
            if self.match_char('>') {
                if self.match_char('=') {
                    TokenKind::GtGtGtEq
                } else {
                    TokenKind::GtGtGt
                }
            } else if self.match_char('=') {
                TokenKind::GtGtEq
            } else {
                TokenKind::GtGt
            }
        } else if self.match_char('=') {
            TokenKind::GtEq
        } else {
            TokenKind::Gt
        }
    }

    fn scan_ampersand(&mut self) -> TokenKind {
        if self.match_char('&') {
            TokenKind::AmpAmp
        } else if self.match_char('=') {
            TokenKind::AmpEq
        } else {
            TokenKind::Amp
        }
    }

    fn scan_pipe(&mut self) -> TokenKind {
        if self.match_char('|') {
            TokenKind::PipePipe
        } else if self.match_char('=') {
            TokenKind::PipeEq
        } else {
            TokenKind::Pipe
        }
    }

    fn scan_string(&mut self, quote: char) -> TokenKind {
        let mut value = String::new();

        loop {
            match self.advance() {
                Some((_, c)) if c == quote => break,
                Some((_, '\\')) => match self.advance() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, 'b')) => value.push('\x08'),
                    Some((_, 'f')) => value.push('\x0C'),
                    Some((_, 'v')) => value.push('\x0B'),
                    Some((_, c @ '0'..='7')) => {
                        // \0 or a legacy octal escape (\7, \77, \377)
                        let mut code = c.to_digit(8).unwrap_or(0);
                        let max_digits = if c <= '3' { 3 } else { 2 };
                        let mut digits = 1;
                        while digits < max_digits {
                            match self.peek().and_then(|ch| ch.to_digit(8)) {
                                Some(d) => {
                                    code = code * 8 + d;
                                    digits += 1;
                                    self.advance();
                                }
                                None => break,
                            }
                        }
                        if let Some(ch) = char::from_u32(code) {
                            value.push(ch);
                        }
                    }
                    Some((_, 'x')) => match self.scan_hex_escape(2).and_then(char::from_u32) {
                        Some(ch) => value.push(ch),
                        None => value.push('x'),
                    },
                    Some((_, 'u')) => match self.scan_hex_escape(4).and_then(char::from_u32) {
                        Some(ch) => value.push(ch),
                        None => value.push('u'),
                    },
                    Some((_, '\r')) => {
                        // line continuation, \r\n counts once
                        self.match_char('\n');
                    }
                    Some((_, c)) if is_line_terminator(c) => {}
                    Some((_, c)) => value.push(c),
                    None => return TokenKind::Unterminated,
                },
                Some((_, c)) if is_line_terminator(c) => return TokenKind::Unterminated,
                Some((_, c)) => value.push(c),
                None => return TokenKind::Unterminated,
            }
        }

        TokenKind::String(JsString::from(value))
    }

    fn scan_hex_escape(&mut self, count: usize) -> Option<u32> {
        let checkpoint = self.checkpoint();
        let mut code = 0u32;
        for _ in 0..count {
            match self.peek().and_then(|ch| ch.to_digit(16)) {
                Some(d) => {
                    code = code * 16 + d;
                    self.advance();
                }
                None => {
                    self.restore(checkpoint);
                    return None;
                }
            }
        }
        Some(code)
    }

    fn scan_number(&mut self, first: char) -> TokenKind {
        let mut num_str = String::new();

        if first == '0' {
            match self.peek() {
                Some('x' | 'X') => {
                    self.advance();
                    let mut value = 0.0f64;
                    let mut any = false;
                    while let Some(d) = self.peek().and_then(|ch| ch.to_digit(16)) {
                        value = value * 16.0 + d as f64;
                        any = true;
                        self.advance();
                    }
                    return if any {
                        TokenKind::Number(value)
                    } else {
                        TokenKind::Invalid('x')
                    };
                }
                Some('0'..='7') => {
                    // Legacy octal literal (0777); a decimal digit makes it decimal
                    let mut digits = String::new();
                    while let Some(ch @ '0'..='9') = self.peek() {
                        digits.push(ch);
                        self.advance();
                    }
                    if digits.chars().all(|c| c.is_digit(8)) {
                        let value = digits
                            .chars()
                            .filter_map(|c| c.to_digit(8))
                            .fold(0.0f64, |acc, d| acc * 8.0 + d as f64);
                        return TokenKind::Number(value);
                    }
                    num_str.push_str(&digits);
                }
                _ => num_str.push(first),
            }
        } else if first != '.' {
            num_str.push(first);
        }

        if first != '.' {
            while let Some(ch @ '0'..='9') = self.peek() {
                num_str.push(ch);
                self.advance();
            }
        }

        // Decimal part
        if first == '.' {
            num_str.push_str("0.");
            while let Some(ch @ '0'..='9') = self.peek() {
                num_str.push(ch);
                self.advance();
            }
        } else if self.peek() == Some('.') {
            self.advance();
            num_str.push('.');
            while let Some(ch @ '0'..='9') = self.peek() {
                num_str.push(ch);
                self.advance();
            }
        }

        // Exponent part
        if matches!(self.peek(), Some('e' | 'E'))
            && matches!(self.peek_next(), Some('0'..='9' | '+' | '-'))
        {
            num_str.push('e');
            self.advance();
            if let Some(sign @ ('+' | '-')) = self.peek() {
                num_str.push(sign);
                self.advance();
            }
            while let Some(ch @ '0'..='9') = self.peek() {
                num_str.push(ch);
                self.advance();
            }
        }

        // A number may not run straight into an identifier (`3in`)
        if self.peek().is_some_and(is_id_start) {
            return TokenKind::Invalid(self.peek().unwrap_or('?'));
        }

        TokenKind::Number(num_str.parse().unwrap_or(f64::NAN))
    }

    fn scan_identifier(&mut self, first: char) -> TokenKind {
        let mut name = String::new();
        name.push(first);

        while let Some(ch) = self.peek() {
            if is_id_continue(ch) {
                name.push(ch);
                self.advance();
            } else if ch == '\\' {
                self.advance();
                match self.scan_identifier_escape() {
                    Some(c) => name.push(c),
                    None => return TokenKind::Invalid('\\'),
                }
            } else {
                break;
            }
        }

        keyword(&name).unwrap_or_else(|| TokenKind::Identifier(intern(&name)))
    }

    /// Identifier starting with a `\uXXXX` escape. Escaped names never form keywords.
    fn scan_escaped_identifier(&mut self) -> TokenKind {
        match self.scan_identifier_escape() {
            Some(c) if is_id_start(c) => match self.scan_identifier(c) {
                TokenKind::Identifier(token) => TokenKind::Identifier(token),
                TokenKind::Invalid(c) => TokenKind::Invalid(c),
                other => TokenKind::Identifier(intern(keyword_text(&other).unwrap_or_default())),
            },
            _ => TokenKind::Invalid('\\'),
        }
    }

    fn scan_identifier_escape(&mut self) -> Option<char> {
        if !self.match_char('u') {
            return None;
        }
        self.scan_hex_escape(4).and_then(char::from_u32)
    }
}

fn keyword(name: &str) -> Option<TokenKind> {
    Some(match name {
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "null" => TokenKind::Null,
        "var" => TokenKind::Var,
        "function" => TokenKind::Function,
        "return" => TokenKind::Return,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "for" => TokenKind::For,
        "while" => TokenKind::While,
        "do" => TokenKind::Do,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "switch" => TokenKind::Switch,
        "case" => TokenKind::Case,
        "default" => TokenKind::Default,
        "try" => TokenKind::Try,
        "catch" => TokenKind::Catch,
        "finally" => TokenKind::Finally,
        "throw" => TokenKind::Throw,
        "new" => TokenKind::New,
        "this" => TokenKind::This,
        "typeof" => TokenKind::Typeof,
        "instanceof" => TokenKind::Instanceof,
        "in" => TokenKind::In,
        "void" => TokenKind::Void,
        "delete" => TokenKind::Delete,
        "with" => TokenKind::With,
        "debugger" => TokenKind::Debugger,
        _ => return None,
    })
}

/// Textual form of a keyword token, for keywords used as property names.
pub fn keyword_text(kind: &TokenKind) -> Option<&'static str> {
    Some(match kind {
        TokenKind::True => "true",
        TokenKind::False => "false",
        TokenKind::Null => "null",
        TokenKind::Var => "var",
        TokenKind::Function => "function",
        TokenKind::Return => "return",
        TokenKind::If => "if",
        TokenKind::Else => "else",
        TokenKind::For => "for",
        TokenKind::While => "while",
        TokenKind::Do => "do",
        TokenKind::Break => "break",
        TokenKind::Continue => "continue",
        TokenKind::Switch => "switch",
        TokenKind::Case => "case",
        TokenKind::Default => "default",
        TokenKind::Try => "try",
        TokenKind::Catch => "catch",
        TokenKind::Finally => "finally",
        TokenKind::Throw => "throw",
        TokenKind::New => "new",
        TokenKind::This => "this",
        TokenKind::Typeof => "typeof",
        TokenKind::Instanceof => "instanceof",
        TokenKind::In => "in",
        TokenKind::Void => "void",
        TokenKind::Delete => "delete",
        TokenKind::With => "with",
        TokenKind::Debugger => "debugger",
        _ => return None,
    })
}

fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\u{2028}' | '\u{2029}')
}

/// Check if a character can start an identifier
fn is_id_start(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_alphabetic()
}

/// Check if a character can continue an identifier
fn is_id_continue(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_alphanumeric()
}
