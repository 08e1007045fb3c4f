//! Standard library implementations of platform traits.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use super::{
    CompiledRegex, ConsoleLevel, ConsoleProvider, RandomProvider, RegExpProvider, RegexMatch,
    TimeProvider,
};

/// Time provider using `std::time::SystemTime`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdTimeProvider;

impl TimeProvider for StdTimeProvider {
    fn now_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

/// Random provider using a simple xorshift64 PRNG.
///
/// Seeded from the current time on creation.
pub struct StdRandomProvider {
    state: u64,
}

impl StdRandomProvider {
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x12345678_9abcdef0);
        Self::with_seed(seed)
    }

    /// Create with a specific seed (for reproducible runs).
    pub fn with_seed(seed: u64) -> Self {
        // xorshift never leaves the all-zero state
        let seed = if seed == 0 { 0x12345678_9abcdef0 } else { seed };
        Self { state: seed }
    }
}

impl Default for StdRandomProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomProvider for StdRandomProvider {
    fn random(&mut self) -> f64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;

        // Upper 53 bits
        let mantissa = x >> 11;
        (mantissa as f64) / ((1u64 << 53) as f64)
    }
}

/// Console provider writing to stdout (log) and stderr (warnings, errors).
#[derive(Debug, Clone, Copy, Default)]
pub struct StdConsoleProvider;

impl ConsoleProvider for StdConsoleProvider {
    fn write(&self, level: ConsoleLevel, message: &str) {
        match level {
            ConsoleLevel::Log => println!("{message}"),
            ConsoleLevel::Warn | ConsoleLevel::Error => eprintln!("{message}"),
        }
    }
}

/// Console provider that records every line in memory.
///
/// Clones share one buffer, so a host can keep a handle while the
/// interpreter owns another.
#[derive(Debug, Clone, Default)]
pub struct BufferedConsole {
    lines: Rc<RefCell<Vec<(ConsoleLevel, String)>>>,
}

impl BufferedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages written so far, in order.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .map(|(_, line)| line.clone())
            .collect()
    }

    pub fn entries(&self) -> Vec<(ConsoleLevel, String)> {
        self.lines.borrow().clone()
    }

    pub fn clear(&self) {
        self.lines.borrow_mut().clear();
    }
}

impl ConsoleProvider for BufferedConsole {
    fn write(&self, level: ConsoleLevel, message: &str) {
        self.lines.borrow_mut().push((level, message.to_string()));
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// FancyRegexProvider - RegExp implementation using fancy-regex crate
// ═══════════════════════════════════════════════════════════════════════════════

/// RegExp provider using the `fancy-regex` crate.
///
/// Supports backreferences and lookahead, which the ECMAScript grammar has
/// and the plain `regex` crate lacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct FancyRegexProvider;

/// Compiled regex wrapping `fancy_regex::Regex`.
#[derive(Debug)]
struct FancyCompiledRegex {
    regex: fancy_regex::Regex,
}

impl CompiledRegex for FancyCompiledRegex {
    fn find_at(&self, input: &str, start: usize) -> Result<Option<RegexMatch>, String> {
        if start > input.len() {
            return Ok(None);
        }
        match self.regex.captures_from_pos(input, start) {
            Ok(Some(caps)) => {
                let full_match = caps.get(0).ok_or("No match found")?;
                let captures = caps.iter().map(|m| m.map(|c| (c.start(), c.end()))).collect();
                Ok(Some(RegexMatch {
                    start: full_match.start(),
                    end: full_match.end(),
                    captures,
                }))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(e.to_string()),
        }
    }
}

impl RegExpProvider for FancyRegexProvider {
    fn compile(&self, pattern: &str, flags: &str) -> Result<Rc<dyn CompiledRegex>, String> {
        let mut regex_pattern = js_regex_to_rust(pattern);

        let mut prefix = String::new();
        if flags.contains('i') {
            prefix.push('i');
        }
        if flags.contains('m') {
            prefix.push('m');
        }
        if !prefix.is_empty() {
            regex_pattern = format!("(?{prefix}){regex_pattern}");
        }

        let regex = fancy_regex::Regex::new(&regex_pattern)
            .map_err(|e| format!("Invalid regular expression: /{pattern}/: {e}"))?;

        Ok(Rc::new(FancyCompiledRegex { regex }))
    }
}

/// Convert an ECMAScript pattern to the syntax fancy-regex expects.
///
/// - `[` inside a character class is literal in JS but must be escaped here
/// - `\/` is a valid identity escape in JS only
/// - `\cX` control escapes become `\x` escapes
fn js_regex_to_rust(pattern: &str) -> String {
    let mut result = String::with_capacity(pattern.len() + 16);
    let mut chars = pattern.chars().peekable();
    let mut in_char_class = false;
    // True right after `[` or `[^`
    let mut char_class_start = false;

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('/') => result.push('/'),
                Some('c') => match chars.peek().copied() {
                    Some(letter) if letter.is_ascii_alphabetic() => {
                        chars.next();
                        let code = (letter as u32) % 32;
                        result.push_str(&format!("\\x{code:02X}"));
                    }
                    _ => result.push_str("\\\\c"),
                },
                Some(next) => {
                    result.push('\\');
                    result.push(next);
                }
                None => result.push_str("\\\\"),
            }
            char_class_start = false;
            continue;
        }

        if !in_char_class {
            if c == '[' {
                in_char_class = true;
                char_class_start = true;
            }
            result.push(c);
            continue;
        }

        if char_class_start {
            match c {
                // Still at the start: `[^]` is handled by the next character
                '^' => result.push(c),
                ']' => {
                    result.push(c);
                    char_class_start = false;
                }
                '[' => {
                    result.push_str("\\[");
                    char_class_start = false;
                }
                _ => {
                    result.push(c);
                    char_class_start = false;
                }
            }
        } else if c == ']' {
            in_char_class = false;
            result.push(c);
        } else if c == '[' {
            result.push_str("\\[");
        } else {
            result.push(c);
        }
    }

    result
}
