//! Host platform abstractions.
//!
//! The interpreter never talks to the outside world directly: console output,
//! the wall clock, randomness and the regular-expression engine all go through
//! the traits below so that embedders can substitute their own.

mod std_impl;

use std::rc::Rc;

pub use std_impl::{
    BufferedConsole, FancyRegexProvider, StdConsoleProvider, StdRandomProvider, StdTimeProvider,
};

/// Trait for providing the wall clock.
pub trait TimeProvider {
    /// Get the current time as milliseconds since Unix epoch.
    /// Used for `Date.now()` and `new Date()`.
    fn now_millis(&self) -> i64;
}

/// Trait for providing random number generation.
pub trait RandomProvider {
    /// Generate a random f64 in the range [0, 1).
    /// Used for `Math.random()`.
    fn random(&mut self) -> f64;
}

/// A time provider frozen at a fixed instant.
pub struct FixedTimeProvider(pub i64);

impl TimeProvider for FixedTimeProvider {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

/// Log level for console output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    /// `print()` output
    Log,
    /// Diagnostics emitted on the host's behalf
    Warn,
    Error,
}

/// Trait for handling console output.
pub trait ConsoleProvider {
    /// Write a message at the specified log level.
    fn write(&self, level: ConsoleLevel, message: &str);
}

/// A console provider that discards all output.
pub struct NoOpConsoleProvider;

impl ConsoleProvider for NoOpConsoleProvider {
    fn write(&self, _level: ConsoleLevel, _message: &str) {}
}

/// One successful match. Offsets are byte offsets into the searched input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexMatch {
    pub start: usize,
    pub end: usize,
    /// Group 0 first; `None` for groups that did not participate.
    pub captures: Vec<Option<(usize, usize)>>,
}

/// A pattern compiled by a [`RegExpProvider`].
pub trait CompiledRegex {
    /// Find the first match starting at or after byte offset `start`.
    ///
    /// Anchors and lookbehind see the whole input, not just the suffix.
    fn find_at(&self, input: &str, start: usize) -> Result<Option<RegexMatch>, String>;
}

/// Compiles ECMAScript patterns into an engine the host provides.
pub trait RegExpProvider {
    /// Compile `pattern` with the given flags (any of `g`, `i`, `m`).
    ///
    /// The error string becomes the message of a script `SyntaxError`.
    fn compile(&self, pattern: &str, flags: &str) -> Result<Rc<dyn CompiledRegex>, String>;
}
