//! Process-wide identifier interner.
//!
//! Every property and variable name is mapped to a [`Token`], a small integer
//! whose equality and hash are the integer's. The table only grows: interned
//! text is leaked into a `'static` arena so a token can hand out `&'static str`
//! without holding the lock. Several interpreters (even on different threads)
//! share one table behind a `parking_lot::RwLock`.

use std::fmt;
use std::sync::LazyLock;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::value::JsString;

/// Interned identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(u32);

/// Names seeded at fixed ids, in the order of the `Token` constants below.
const WELL_KNOWN: [&str; 20] = [
    "length",
    "prototype",
    "constructor",
    "callee",
    "caller",
    "arguments",
    "this",
    "lastIndex",
    "valueOf",
    "toString",
    "message",
    "name",
    "index",
    "input",
    "source",
    "global",
    "ignoreCase",
    "multiline",
    "undefined",
    "eval",
];

impl Token {
    pub const LENGTH: Token = Token(0);
    pub const PROTOTYPE: Token = Token(1);
    pub const CONSTRUCTOR: Token = Token(2);
    pub const CALLEE: Token = Token(3);
    pub const CALLER: Token = Token(4);
    pub const ARGUMENTS: Token = Token(5);
    pub const THIS: Token = Token(6);
    pub const LAST_INDEX: Token = Token(7);
    pub const VALUE_OF: Token = Token(8);
    pub const TO_STRING: Token = Token(9);
    pub const MESSAGE: Token = Token(10);
    pub const NAME: Token = Token(11);
    pub const INDEX: Token = Token(12);
    pub const INPUT: Token = Token(13);
    pub const SOURCE: Token = Token(14);
    pub const GLOBAL: Token = Token(15);
    pub const IGNORE_CASE: Token = Token(16);
    pub const MULTILINE: Token = Token(17);
    pub const UNDEFINED: Token = Token(18);
    pub const EVAL: Token = Token(19);

    /// The integer identity of this token.
    pub fn id(self) -> u32 {
        self.0
    }

    /// Rebuild a token from an id obtained through [`Token::id`].
    ///
    /// Returns `None` for ids that were never handed out.
    pub fn from_id(id: u32) -> Option<Token> {
        let table = INTERNER.read();
        (usize::try_from(id).ok()? < table.names.len()).then_some(Token(id))
    }

    /// The interned text.
    pub fn as_str(self) -> &'static str {
        INTERNER
            .read()
            .names
            .get(self.0 as usize)
            .copied()
            .unwrap_or("")
    }

    pub fn as_js_string(self) -> JsString {
        JsString::from(self.as_str())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({}, {:?})", self.0, self.as_str())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct Interner {
    ids: FxHashMap<&'static str, Token>,
    names: Vec<&'static str>,
}

impl Interner {
    fn with_well_known() -> Self {
        let mut interner = Interner {
            ids: FxHashMap::default(),
            names: Vec::with_capacity(256),
        };
        for name in WELL_KNOWN {
            interner.insert_static(name);
        }
        interner
    }

    fn insert_static(&mut self, name: &'static str) -> Token {
        if let Some(token) = self.ids.get(name) {
            return *token;
        }
        let token = Token(self.names.len() as u32);
        self.names.push(name);
        self.ids.insert(name, token);
        token
    }

    fn insert(&mut self, name: &str) -> Token {
        // Another writer may have won the race between our read and write lock.
        if let Some(token) = self.ids.get(name) {
            return *token;
        }
        let leaked: &'static str = Box::leak(name.to_owned().into_boxed_str());
        self.insert_static(leaked)
    }
}

static INTERNER: LazyLock<RwLock<Interner>> =
    LazyLock::new(|| RwLock::new(Interner::with_well_known()));

/// Intern `name`, returning the existing token when the text was seen before.
pub fn intern(name: &str) -> Token {
    if let Some(token) = INTERNER.read().ids.get(name) {
        return *token;
    }
    INTERNER.write().insert(name)
}

/// Look up `name` without interning it.
pub fn lookup(name: &str) -> Option<Token> {
    INTERNER.read().ids.get(name).copied()
}

/// Reverse lookup of a token.
pub fn resolve(token: Token) -> JsString {
    token.as_js_string()
}

/// Reverse lookup for consumers that only carry the integer id.
pub fn resolve_id(id: u32) -> Option<JsString> {
    let table = INTERNER.read();
    table
        .names
        .get(usize::try_from(id).ok()?)
        .map(|name| JsString::from(*name))
}

/// Number of distinct names interned so far.
pub fn interned_count() -> usize {
    INTERNER.read().names.len()
}
