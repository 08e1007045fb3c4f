//! Global bootstrap
//!
//! Builds the root environment: the global object, the built-in prototypes
//! and the constructors and services installed on the global object.

use crate::env::{Env, ObjectKind, PropertyKey};
use crate::function::{JsFunction, NativeFunction};
use crate::intern::Token;
use crate::value::{CheapClone, JsString, JsValue};

use super::Interpreter;
use super::builtins::{
    array, boolean, date, error, function, global, json, math, number, object, regexp, string,
};

/// The global object and the prototypes built-in values delegate to.
pub struct Realm {
    pub global: Env,
    pub object_prototype: Env,
    pub function_prototype: Env,
    pub array_prototype: Env,
    pub string_prototype: Env,
    pub number_prototype: Env,
    pub boolean_prototype: Env,
    pub date_prototype: Env,
    pub regexp_prototype: Env,
    pub error_prototype: Env,
    pub type_error_prototype: Env,
    pub reference_error_prototype: Env,
    pub range_error_prototype: Env,
    pub syntax_error_prototype: Env,
}

impl Realm {
    /// Bare prototypes wired into their delegation chains, no methods yet.
    pub fn new() -> Self {
        let object_prototype = Env::new(ObjectKind::Ordinary, None);
        let derived = |kind: ObjectKind| Env::new(kind, Some(object_prototype.cheap_clone()));

        // Function.prototype is itself callable and returns undefined
        let function_prototype = derived(ObjectKind::Function(JsFunction::Native(
            NativeFunction {
                name: JsString::from(""),
                func: function::function_prototype_noop,
                construct: None,
                arity: 0,
            },
        )));
        let array_prototype = derived(ObjectKind::Array(Vec::new()));
        let string_prototype = derived(ObjectKind::String(JsString::from("")));
        let number_prototype = derived(ObjectKind::Number(0.0));
        let boolean_prototype = derived(ObjectKind::Boolean(false));
        let date_prototype = derived(ObjectKind::Ordinary);
        let regexp_prototype = derived(ObjectKind::Ordinary);
        let error_prototype = derived(ObjectKind::Ordinary);
        let native_error =
            || Env::new(ObjectKind::Ordinary, Some(error_prototype.cheap_clone()));
        let type_error_prototype = native_error();
        let reference_error_prototype = native_error();
        let range_error_prototype = native_error();
        let syntax_error_prototype = native_error();
        let global = derived(ObjectKind::Ordinary);

        Realm {
            global,
            object_prototype,
            function_prototype,
            array_prototype,
            string_prototype,
            number_prototype,
            boolean_prototype,
            date_prototype,
            regexp_prototype,
            error_prototype,
            type_error_prototype,
            reference_error_prototype,
            range_error_prototype,
            syntax_error_prototype,
        }
    }

    /// Prototype for error objects named `name`; unknown names get `Error`.
    pub fn error_prototype_for(&self, name: &str) -> Env {
        match name {
            "TypeError" => &self.type_error_prototype,
            "ReferenceError" => &self.reference_error_prototype,
            "RangeError" => &self.range_error_prototype,
            "SyntaxError" => &self.syntax_error_prototype,
            _ => &self.error_prototype,
        }
        .cheap_clone()
    }
}

impl Default for Realm {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Populate prototypes and install the global bindings.
    pub(super) fn init_globals(&mut self) {
        object::init_object_prototype(self);
        function::init_function_prototype(self);
        array::init_array_prototype(self);
        string::init_string_prototype(self);
        number::init_number_prototype(self);
        boolean::init_boolean_prototype(self);
        date::init_date_prototype(self);
        regexp::init_regexp_prototype(self);
        error::init_error_prototypes(self);

        let constructors = [
            ("Object", object::create_object_constructor(self)),
            ("Function", function::create_function_constructor(self)),
            ("Array", array::create_array_constructor(self)),
            ("String", string::create_string_constructor(self)),
            ("Number", number::create_number_constructor(self)),
            ("Boolean", boolean::create_boolean_constructor(self)),
            ("Date", date::create_date_constructor(self)),
            ("RegExp", regexp::create_regexp_constructor(self)),
            ("Math", math::create_math_object(self)),
            ("JSON", json::create_json_object(self)),
        ];
        let global = self.global();
        for (name, value) in constructors {
            global.define(PropertyKey::from(name), JsValue::Object(value));
        }
        for (name, ctor) in error::create_error_constructors(self) {
            global.define(PropertyKey::from(name), JsValue::Object(ctor));
        }

        global.define(Token::UNDEFINED, JsValue::Undefined);
        global.define(PropertyKey::from("NaN"), JsValue::Number(f64::NAN));
        global.define(PropertyKey::from("Infinity"), JsValue::Number(f64::INFINITY));
        global::init_global_functions(self);
    }
}
