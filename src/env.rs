//! Chained environments.
//!
//! One structure serves three roles: lexical scopes (parent = enclosing scope),
//! objects (parent = prototype) and for-in enumeration (walk the chain, union
//! the keys). An environment owns an ordered binding table, a parent link that
//! is fixed at creation, a read-only flag and an [`ObjectKind`] that selects
//! the behaviour of boxed values.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};

use crate::error::JsError;
use crate::function::JsFunction;
use crate::intern::{Token, intern};
use crate::interpreter::builtins::regexp::RegExpData;
use crate::reference::Reference;
use crate::value::{CheapClone, JsString, JsValue, number_to_string};

/// Array writes may extend the element vector by at most this many holes.
///
/// Also the largest length a native method will materialize from a script
/// supplied `length`.
pub const MAX_ARRAY_GAP: usize = 1 << 24;

/// Property or variable key.
///
/// Canonical array indices ("0", "17", not "01") are kept out of the interner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    Name(Token),
    Index(u32),
}

impl PropertyKey {
    pub fn name(name: &str) -> Self {
        PropertyKey::from(name)
    }

    pub fn as_index(&self) -> Option<u32> {
        match self {
            PropertyKey::Index(i) => Some(*i),
            PropertyKey::Name(_) => None,
        }
    }

    pub fn to_js_string(&self) -> JsString {
        match self {
            PropertyKey::Name(token) => token.as_js_string(),
            PropertyKey::Index(i) => JsString::from(i.to_string()),
        }
    }

    /// Key for a numeric property access such as `a[1]` or `a[1.5]`.
    pub fn from_number(n: f64) -> Self {
        if n >= 0.0 && n < u32::MAX as f64 && n.fract() == 0.0 {
            PropertyKey::Index(n as u32)
        } else {
            PropertyKey::Name(intern(&number_to_string(n)))
        }
    }
}

fn canonical_index(s: &str) -> Option<u32> {
    let bytes = s.as_bytes();
    match bytes.first() {
        None => return None,
        Some(b'0') if bytes.len() > 1 => return None,
        _ => {}
    }
    if !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    // 2^32 - 1 is not an array index
    s.parse::<u32>().ok().filter(|i| *i != u32::MAX)
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        match canonical_index(s) {
            Some(i) => PropertyKey::Index(i),
            None => PropertyKey::Name(intern(s)),
        }
    }
}

impl From<&JsString> for PropertyKey {
    fn from(s: &JsString) -> Self {
        PropertyKey::from(s.as_str())
    }
}

impl From<Token> for PropertyKey {
    fn from(token: Token) -> Self {
        match canonical_index(token.as_str()) {
            Some(i) => PropertyKey::Index(i),
            None => PropertyKey::Name(token),
        }
    }
}

impl From<u32> for PropertyKey {
    fn from(i: u32) -> Self {
        PropertyKey::Index(i)
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::Name(token) => write!(f, "{token}"),
            PropertyKey::Index(i) => write!(f, "{i}"),
        }
    }
}

/// What an environment is, beyond its bindings.
pub enum ObjectKind {
    /// Plain object.
    Ordinary,
    /// Lexical scope or activation.
    Scope,
    /// Scope introduced by `with`; identifier lookups consult the target first.
    With(Env),
    /// Elements; `None` is a hole (reads as undefined, not an own key).
    Array(Vec<Option<JsValue>>),
    Arguments,
    Function(JsFunction),
    String(JsString),
    Number(f64),
    Boolean(bool),
    /// Milliseconds since the epoch; NaN for an invalid date.
    Date(f64),
    RegExp(Box<RegExpData>),
    Error,
}

impl ObjectKind {
    pub fn class_name(&self) -> &'static str {
        match self {
            ObjectKind::Ordinary | ObjectKind::Scope | ObjectKind::With(_) => "Object",
            ObjectKind::Array(_) => "Array",
            ObjectKind::Arguments => "Arguments",
            ObjectKind::Function(_) => "Function",
            ObjectKind::String(_) => "String",
            ObjectKind::Number(_) => "Number",
            ObjectKind::Boolean(_) => "Boolean",
            ObjectKind::Date(_) => "Date",
            ObjectKind::RegExp(_) => "RegExp",
            ObjectKind::Error => "Error",
        }
    }
}

struct Slot {
    value: JsValue,
    enumerable: bool,
}

/// Binding table plus parent link.
pub struct Environment {
    bindings: IndexMap<PropertyKey, Slot, FxBuildHasher>,
    parent: Option<Env>,
    read_only: bool,
    pub kind: ObjectKind,
}

impl Environment {
    fn virtual_get(&self, key: &PropertyKey) -> Option<JsValue> {
        match (&self.kind, key) {
            (ObjectKind::Array(elements), PropertyKey::Index(i)) => {
                elements.get(*i as usize).cloned().flatten()
            }
            (ObjectKind::Array(elements), PropertyKey::Name(Token::LENGTH)) => {
                Some(JsValue::Number(elements.len() as f64))
            }
            (ObjectKind::String(s), PropertyKey::Index(i)) => {
                s.char_at(*i as usize).map(|c| JsValue::String(JsString::from(c)))
            }
            (ObjectKind::String(s), PropertyKey::Name(Token::LENGTH)) => {
                Some(JsValue::Number(s.char_len() as f64))
            }
            _ => None,
        }
    }

    fn get_local(&self, key: &PropertyKey) -> Option<JsValue> {
        self.virtual_get(key)
            .or_else(|| self.bindings.get(key).map(|slot| slot.value.clone()))
    }

    fn owns(&self, key: &PropertyKey) -> bool {
        self.virtual_get(key).is_some() || self.bindings.contains_key(key)
    }

    fn store(&mut self, key: PropertyKey, value: JsValue) -> Result<(), JsError> {
        match (&mut self.kind, key) {
            (ObjectKind::Array(elements), PropertyKey::Index(i)) => {
                let i = i as usize;
                if i >= elements.len() {
                    if i - elements.len() > MAX_ARRAY_GAP {
                        return Err(JsError::range_error("Array index too large"));
                    }
                    elements.resize(i + 1, None);
                }
                if let Some(slot) = elements.get_mut(i) {
                    *slot = Some(value);
                }
                return Ok(());
            }
            (ObjectKind::Array(elements), PropertyKey::Name(Token::LENGTH)) => {
                let new_len = array_length(&value)?;
                if new_len > elements.len() && new_len - elements.len() > MAX_ARRAY_GAP {
                    return Err(JsError::range_error("Invalid array length"));
                }
                elements.resize(new_len, None);
                return Ok(());
            }
            // Character slots and length of a String are immutable; writes are ignored
            (ObjectKind::String(_), PropertyKey::Index(_))
            | (ObjectKind::String(_), PropertyKey::Name(Token::LENGTH)) => return Ok(()),
            _ => {}
        }
        match self.bindings.get_mut(&key) {
            Some(slot) => slot.value = value,
            None => {
                self.bindings.insert(
                    key,
                    Slot {
                        value,
                        enumerable: true,
                    },
                );
            }
        }
        Ok(())
    }

    fn own_keys_into(&self, all: &mut Vec<(PropertyKey, bool)>) {
        match &self.kind {
            ObjectKind::Array(elements) => {
                all.extend(
                    elements
                        .iter()
                        .enumerate()
                        .filter(|(_, slot)| slot.is_some())
                        .map(|(i, _)| (PropertyKey::Index(i as u32), true)),
                );
            }
            ObjectKind::String(s) => {
                all.extend((0..s.char_len() as u32).map(|i| (PropertyKey::Index(i), true)));
            }
            _ => {}
        }
        all.extend(
            self.bindings
                .iter()
                .map(|(key, slot)| (*key, slot.enumerable)),
        );
    }
}

fn array_length(value: &JsValue) -> Result<usize, JsError> {
    let n = value.to_number();
    if n >= 0.0 && n <= u32::MAX as f64 && n.fract() == 0.0 {
        Ok(n as usize)
    } else {
        Err(JsError::range_error("Invalid array length"))
    }
}

/// Shared handle to an [`Environment`].
#[derive(Clone)]
pub struct Env(Rc<RefCell<Environment>>);

impl CheapClone for Env {}

impl Env {
    pub fn new(kind: ObjectKind, parent: Option<Env>) -> Env {
        Env(Rc::new(RefCell::new(Environment {
            bindings: IndexMap::with_hasher(FxBuildHasher),
            parent,
            read_only: false,
            kind,
        })))
    }

    /// Fresh lexical scope nested in `parent`.
    pub fn new_scope(parent: &Env) -> Env {
        Env::new(ObjectKind::Scope, Some(parent.cheap_clone()))
    }

    pub fn borrow(&self) -> Ref<'_, Environment> {
        self.0.borrow()
    }

    pub fn kind(&self) -> Ref<'_, ObjectKind> {
        Ref::map(self.0.borrow(), |env| &env.kind)
    }

    /// Mutable access to the kind payload, refused when read-only.
    pub fn kind_mut(&self) -> Result<RefMut<'_, ObjectKind>, JsError> {
        let env = self.0.borrow_mut();
        if env.read_only {
            return Err(JsError::read_only(env.kind.class_name()));
        }
        Ok(RefMut::map(env, |env| &mut env.kind))
    }

    pub fn parent(&self) -> Option<Env> {
        self.0.borrow().parent.clone()
    }

    pub fn ptr_eq(&self, other: &Env) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub fn is_callable(&self) -> bool {
        matches!(self.0.borrow().kind, ObjectKind::Function(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.0.borrow().kind, ObjectKind::Array(_))
    }

    pub fn class_name(&self) -> &'static str {
        self.0.borrow().kind.class_name()
    }

    /// The primitive wrapped by a boxed String/Number/Boolean.
    pub fn primitive_value(&self) -> Option<JsValue> {
        self.0.borrow().kind.primitive()
    }

    /// Read `key`, walking to the nearest owning ancestor.
    pub fn get(&self, key: &PropertyKey) -> Option<JsValue> {
        let mut current = self.cheap_clone();
        loop {
            let parent = {
                let env = current.0.borrow();
                if let Some(value) = env.get_local(key) {
                    return Some(value);
                }
                env.parent.clone()
            };
            current = parent?;
        }
    }

    pub fn get_own(&self, key: &PropertyKey) -> Option<JsValue> {
        self.0.borrow().get_local(key)
    }

    /// Write `key` locally, shadowing any ancestor binding.
    pub fn put(&self, key: PropertyKey, value: JsValue) -> Result<(), JsError> {
        let mut env = self.0.borrow_mut();
        if env.read_only {
            return Err(JsError::read_only(key));
        }
        env.store(key, value)
    }

    /// Write `key` in the nearest environment that already owns it.
    ///
    /// Returns `false` (and writes nothing) when no environment in the chain
    /// owns the key.
    pub fn update(&self, key: PropertyKey, value: JsValue) -> Result<bool, JsError> {
        let mut current = self.cheap_clone();
        loop {
            let parent = {
                let env = current.0.borrow();
                if env.owns(&key) {
                    None
                } else {
                    match env.parent.clone() {
                        Some(parent) => Some(parent),
                        None => return Ok(false),
                    }
                }
            };
            match parent {
                Some(parent) => current = parent,
                None => {
                    current.put(key, value)?;
                    return Ok(true);
                }
            }
        }
    }

    /// Remove the local binding for `key`; an ancestor's binding becomes
    /// visible again. Returns whether a local binding existed.
    pub fn hide(&self, key: &PropertyKey) -> Result<bool, JsError> {
        let mut env = self.0.borrow_mut();
        if env.read_only {
            return Err(JsError::read_only(key));
        }
        match (&mut env.kind, key) {
            (ObjectKind::Array(elements), PropertyKey::Index(i)) => {
                return Ok(elements
                    .get_mut(*i as usize)
                    .and_then(Option::take)
                    .is_some());
            }
            (ObjectKind::Array(_) | ObjectKind::String(_), PropertyKey::Name(Token::LENGTH))
            | (ObjectKind::String(_), PropertyKey::Index(_)) => return Ok(false),
            _ => {}
        }
        Ok(env.bindings.shift_remove(key).is_some())
    }

    /// Local, present binding.
    pub fn owns(&self, key: &PropertyKey) -> bool {
        self.0.borrow().owns(key)
    }

    /// Visible anywhere in the chain.
    pub fn has(&self, key: &PropertyKey) -> bool {
        let mut current = self.cheap_clone();
        loop {
            let parent = {
                let env = current.0.borrow();
                if env.owns(key) {
                    return true;
                }
                env.parent.clone()
            };
            match parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn is_enumerable(&self, key: &PropertyKey) -> bool {
        let env = self.0.borrow();
        if env.virtual_get(key).is_some() {
            return !matches!(key, PropertyKey::Name(Token::LENGTH));
        }
        env.bindings.get(key).is_some_and(|slot| slot.enumerable)
    }

    /// Enumerable own keys in insertion order (array slots first).
    pub fn own_keys(&self) -> Vec<PropertyKey> {
        let mut all = Vec::new();
        self.0.borrow().own_keys_into(&mut all);
        all.into_iter()
            .filter_map(|(key, enumerable)| enumerable.then_some(key))
            .collect()
    }

    /// Enumerable keys visible through the chain, own keys first, each once.
    ///
    /// A non-enumerable binding still shadows an enumerable ancestor key.
    pub fn keys(&self) -> Vec<PropertyKey> {
        let mut seen = FxHashSet::default();
        let mut keys = Vec::new();
        let mut level = Vec::new();
        let mut current = Some(self.cheap_clone());
        while let Some(env) = current {
            level.clear();
            env.0.borrow().own_keys_into(&mut level);
            for (key, enumerable) in level.iter().copied() {
                if seen.insert(key) && enumerable {
                    keys.push(key);
                }
            }
            current = env.parent();
        }
        keys
    }

    /// Install a non-enumerable binding on a freshly built object.
    ///
    /// Bypasses the read-only flag and the kind's virtual slots.
    pub fn define(&self, key: impl Into<PropertyKey>, value: JsValue) {
        self.0.borrow_mut().bindings.insert(
            key.into(),
            Slot {
                value,
                enumerable: false,
            },
        );
    }

    /// Install an enumerable binding on a freshly built object.
    pub fn init(&self, key: impl Into<PropertyKey>, value: JsValue) {
        self.0.borrow_mut().bindings.insert(
            key.into(),
            Slot {
                value,
                enumerable: true,
            },
        );
    }

    pub fn is_read_only(&self) -> bool {
        self.0.borrow().read_only
    }

    /// Toggle the read-only flag here and in every environment currently held
    /// as a binding value (array elements and `with` targets included).
    pub fn set_read_only(&self, read_only: bool) {
        let mut visited = FxHashSet::default();
        let mut pending = vec![self.cheap_clone()];
        while let Some(env) = pending.pop() {
            if !visited.insert(env.addr()) {
                continue;
            }
            let mut inner = env.0.borrow_mut();
            inner.read_only = read_only;
            for slot in inner.bindings.values() {
                if let JsValue::Object(child) = &slot.value {
                    pending.push(child.cheap_clone());
                }
            }
            match &inner.kind {
                ObjectKind::Array(elements) => pending.extend(
                    elements
                        .iter()
                        .flatten()
                        .filter_map(|v| v.as_object().map(CheapClone::cheap_clone)),
                ),
                ObjectKind::With(target) => pending.push(target.cheap_clone()),
                _ => {}
            }
        }
    }

    /// A live (container, key) reference into this environment.
    pub fn reference(&self, key: impl Into<PropertyKey>) -> Reference {
        Reference::new(self.cheap_clone(), key.into())
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok(env) = self.0.try_borrow() else {
            return write!(f, "[object]");
        };
        match &env.kind {
            ObjectKind::Array(elements) => write!(f, "[Array({})]", elements.len()),
            ObjectKind::Function(func) => write!(f, "[Function {}]", func.name()),
            ObjectKind::String(s) => write!(f, "[String {s:?}]"),
            ObjectKind::Number(n) => write!(f, "[Number {}]", number_to_string(*n)),
            ObjectKind::Boolean(b) => write!(f, "[Boolean {b}]"),
            other => write!(f, "[object {}]", other.class_name()),
        }
    }
}
