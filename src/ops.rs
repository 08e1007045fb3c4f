//! Operators and coercions
//!
//! Conversions that may run script code (`valueOf`/`toString`) take the
//! interpreter; the pure numeric helpers are free functions.

use crate::ast::BinaryOp;
use crate::env::{Env, ObjectKind, PropertyKey};
use crate::error::JsError;
use crate::intern::Token;
use crate::interpreter::Interpreter;
use crate::interpreter::builtins::date::date_to_string;
use crate::value::{CheapClone, JsString, JsValue, PreferredType};

/// ToInt32: modular truncation to a signed 32-bit integer.
pub fn to_int32(n: f64) -> i32 {
    to_uint32(n) as i32
}

/// ToUint32: modular truncation to an unsigned 32-bit integer.
pub fn to_uint32(n: f64) -> u32 {
    if !n.is_finite() {
        return 0;
    }
    let modulo = n.trunc().rem_euclid(4_294_967_296.0);
    modulo as u32
}

/// ToInteger: NaN becomes 0, everything else truncates toward zero.
pub fn to_integer(n: f64) -> f64 {
    if n.is_nan() { 0.0 } else { n.trunc() }
}

impl Interpreter {
    /// ToPrimitive
    pub fn to_primitive(
        &mut self,
        value: &JsValue,
        hint: PreferredType,
    ) -> Result<JsValue, JsError> {
        let JsValue::Object(obj) = value else {
            return Ok(value.clone());
        };

        let date = match &*obj.kind() {
            ObjectKind::String(_) | ObjectKind::Number(_) | ObjectKind::Boolean(_) => {
                return Ok(obj.primitive_value().unwrap_or_default());
            }
            ObjectKind::Date(t) => Some(*t),
            _ => None,
        };
        if let Some(t) = date {
            return Ok(match hint {
                PreferredType::Number => JsValue::Number(t),
                PreferredType::Default | PreferredType::String => {
                    JsValue::from(date_to_string(t))
                }
            });
        }

        let order = match hint {
            PreferredType::String => [Token::TO_STRING, Token::VALUE_OF],
            PreferredType::Default | PreferredType::Number => [Token::VALUE_OF, Token::TO_STRING],
        };
        for name in order {
            let method = obj.get(&PropertyKey::Name(name)).unwrap_or_default();
            if method.is_callable() {
                let result = self.call_function(&method, value.clone(), &[])?;
                if !result.is_object() {
                    return Ok(result);
                }
            }
        }
        Err(JsError::type_error("Cannot convert object to primitive value"))
    }

    /// ToNumber
    pub fn to_number(&mut self, value: &JsValue) -> Result<f64, JsError> {
        match value {
            JsValue::Object(_) => {
                let prim = self.to_primitive(value, PreferredType::Number)?;
                Ok(prim.to_number())
            }
            _ => Ok(value.to_number()),
        }
    }

    /// ToString
    pub fn to_js_string(&mut self, value: &JsValue) -> Result<JsString, JsError> {
        match value {
            JsValue::Object(_) => {
                let prim = self.to_primitive(value, PreferredType::String)?;
                Ok(prim.to_js_string())
            }
            _ => Ok(value.to_js_string()),
        }
    }

    /// ToObject: wrap primitives in their boxed form.
    pub fn to_object(&mut self, value: &JsValue) -> Result<Env, JsError> {
        let (kind, proto) = match value {
            JsValue::Object(obj) => return Ok(obj.cheap_clone()),
            JsValue::Undefined | JsValue::Null => {
                return Err(JsError::type_error(format!(
                    "Cannot convert {} to object",
                    value.to_js_string()
                )));
            }
            JsValue::Boolean(b) => (ObjectKind::Boolean(*b), &self.realm.boolean_prototype),
            JsValue::Number(n) => (ObjectKind::Number(*n), &self.realm.number_prototype),
            JsValue::String(s) => (
                ObjectKind::String(s.cheap_clone()),
                &self.realm.string_prototype,
            ),
        };
        Ok(Env::new(kind, Some(proto.cheap_clone())))
    }

    /// Convert a computed member name into a property key.
    pub fn to_property_key(&mut self, value: &JsValue) -> Result<PropertyKey, JsError> {
        match value {
            JsValue::Number(n) => Ok(PropertyKey::from_number(*n)),
            JsValue::String(s) => Ok(PropertyKey::from(s)),
            other => {
                let s = self.to_js_string(other)?;
                Ok(PropertyKey::from(&s))
            }
        }
    }

    /// Evaluate a binary operator on two already-evaluated operands.
    pub fn binary_op(
        &mut self,
        op: BinaryOp,
        left: &JsValue,
        right: &JsValue,
    ) -> Result<JsValue, JsError> {
        Ok(match op {
            BinaryOp::Add => self.add(left, right)?,
            BinaryOp::Sub => JsValue::Number(self.to_number(left)? - self.to_number(right)?),
            BinaryOp::Mul => JsValue::Number(self.to_number(left)? * self.to_number(right)?),
            BinaryOp::Div => JsValue::Number(self.to_number(left)? / self.to_number(right)?),
            // Rust's % on f64 is fmod, which matches the JS remainder
            BinaryOp::Mod => JsValue::Number(self.to_number(left)? % self.to_number(right)?),

            BinaryOp::Eq => JsValue::Boolean(self.loose_equals(left, right)?),
            BinaryOp::NotEq => JsValue::Boolean(!self.loose_equals(left, right)?),
            BinaryOp::StrictEq => JsValue::Boolean(left.strict_equals(right)),
            BinaryOp::StrictNotEq => JsValue::Boolean(!left.strict_equals(right)),

            BinaryOp::Lt => self.compare(left, right, |d| d < 0.0)?,
            BinaryOp::LtEq => self.compare(left, right, |d| d <= 0.0)?,
            BinaryOp::Gt => self.compare(left, right, |d| d > 0.0)?,
            BinaryOp::GtEq => self.compare(left, right, |d| d >= 0.0)?,

            BinaryOp::BitAnd => {
                JsValue::Number((self.int32(left)? & self.int32(right)?) as f64)
            }
            BinaryOp::BitOr => JsValue::Number((self.int32(left)? | self.int32(right)?) as f64),
            BinaryOp::BitXor => {
                JsValue::Number((self.int32(left)? ^ self.int32(right)?) as f64)
            }
            BinaryOp::LShift => {
                let value = self.int32(left)?;
                let shift = self.uint32(right)? & 0x1f;
                JsValue::Number(value.wrapping_shl(shift) as f64)
            }
            BinaryOp::RShift => {
                let value = self.int32(left)?;
                let shift = self.uint32(right)? & 0x1f;
                JsValue::Number(value.wrapping_shr(shift) as f64)
            }
            BinaryOp::URShift => {
                let value = self.uint32(left)?;
                let shift = self.uint32(right)? & 0x1f;
                JsValue::Number(value.wrapping_shr(shift) as f64)
            }

            BinaryOp::In => JsValue::Boolean(self.has_property(left, right)?),
            BinaryOp::Instanceof => JsValue::Boolean(self.instance_of(left, right)?),
        })
    }

    /// `+`: string concatenation when either primitive is a string.
    pub fn add(&mut self, left: &JsValue, right: &JsValue) -> Result<JsValue, JsError> {
        if let (JsValue::Number(a), JsValue::Number(b)) = (left, right) {
            return Ok(JsValue::Number(a + b));
        }
        let left = self.to_primitive(left, PreferredType::Default)?;
        let right = self.to_primitive(right, PreferredType::Default)?;
        if matches!(left, JsValue::String(_)) || matches!(right, JsValue::String(_)) {
            let joined = left.to_js_string() + &right.to_js_string();
            return Ok(JsValue::String(joined));
        }
        Ok(JsValue::Number(left.to_number() + right.to_number()))
    }

    /// Relational operators test the sign of `ToNumber(left) - ToNumber(right)`.
    ///
    /// A NaN difference (NaN on either side, or equal infinities) makes every
    /// comparison false.
    fn compare(
        &mut self,
        left: &JsValue,
        right: &JsValue,
        sign: fn(f64) -> bool,
    ) -> Result<JsValue, JsError> {
        let a = self.to_number(left)?;
        let b = self.to_number(right)?;
        Ok(JsValue::Boolean(sign(a - b)))
    }

    fn int32(&mut self, value: &JsValue) -> Result<i32, JsError> {
        Ok(to_int32(self.to_number(value)?))
    }

    fn uint32(&mut self, value: &JsValue) -> Result<u32, JsError> {
        Ok(to_uint32(self.to_number(value)?))
    }

    /// Abstract equality (`==`)
    pub fn loose_equals(&mut self, left: &JsValue, right: &JsValue) -> Result<bool, JsError> {
        Ok(match (left, right) {
            (JsValue::Undefined | JsValue::Null, JsValue::Undefined | JsValue::Null) => true,
            (JsValue::Undefined | JsValue::Null, _) | (_, JsValue::Undefined | JsValue::Null) => {
                false
            }
            (JsValue::Number(a), JsValue::String(_)) => *a == right.to_number(),
            (JsValue::String(_), JsValue::Number(b)) => left.to_number() == *b,
            (JsValue::Boolean(_), _) => {
                return self.loose_equals(&JsValue::Number(left.to_number()), right);
            }
            (_, JsValue::Boolean(_)) => {
                return self.loose_equals(left, &JsValue::Number(right.to_number()));
            }
            (JsValue::Object(a), JsValue::Object(b)) => a.ptr_eq(b),
            (JsValue::Object(_), _) => {
                let prim = self.to_primitive(left, PreferredType::Default)?;
                return self.loose_equals(&prim, right);
            }
            (_, JsValue::Object(_)) => {
                let prim = self.to_primitive(right, PreferredType::Default)?;
                return self.loose_equals(left, &prim);
            }
            _ => left.strict_equals(right),
        })
    }

    /// `value instanceof target`
    ///
    /// A non-callable target is a host fault, not a script exception.
    pub fn instance_of(&mut self, value: &JsValue, target: &JsValue) -> Result<bool, JsError> {
        let Some(ctor) = target.as_object().filter(|obj| obj.is_callable()) else {
            return Err(JsError::InvalidInstanceofTarget);
        };
        let JsValue::Object(obj) = value else {
            return Ok(false);
        };
        let Some(JsValue::Object(proto)) = ctor.get(&PropertyKey::Name(Token::PROTOTYPE)) else {
            return Ok(false);
        };
        let mut current = obj.parent();
        while let Some(env) = current {
            if env.ptr_eq(&proto) {
                return Ok(true);
            }
            current = env.parent();
        }
        Ok(false)
    }

    /// `key in object`
    pub fn has_property(&mut self, key: &JsValue, object: &JsValue) -> Result<bool, JsError> {
        let JsValue::Object(obj) = object else {
            return Err(JsError::type_error(format!(
                "Cannot use 'in' operator to search for '{}' in {}",
                key.to_js_string(),
                object.to_js_string()
            )));
        };
        let key = self.to_property_key(key)?;
        Ok(obj.has(&key))
    }
}
