//! Embeddable tree-walking interpreter for an ES3-era JavaScript dialect
//!
//! Scopes and objects share one structure, [`Env`]: an ordered binding table
//! with a parent link that serves as the enclosing scope for scopes and the
//! prototype for objects.
//!
//! # Example
//!
//! ```
//! use jswalk::{Interpreter, JsValue};
//!
//! let mut interp = Interpreter::new();
//! let result = interp.eval_source("var a = [3, 1, 2]; a.sort().join('-')").unwrap();
//! assert_eq!(result, JsValue::from("1-2-3"));
//! ```
//!
//! Hosts extend the global object with native functions:
//!
//! ```
//! use jswalk::{Interpreter, JsError, JsValue};
//!
//! fn double(interp: &mut Interpreter, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
//!     let n = interp.to_number(args.first().unwrap_or(&JsValue::Undefined))?;
//!     Ok(JsValue::Number(n * 2.0))
//! }
//!
//! let mut interp = Interpreter::new();
//! interp.register_global_function("double", double, 1);
//! assert_eq!(interp.eval_source("double(21)").unwrap(), JsValue::Number(42.0));
//! ```

pub mod ast;
pub mod config;
pub mod env;
pub mod error;
pub mod function;
pub mod intern;
pub mod interpreter;
pub mod lexer;
pub mod ops;
pub mod parser;
pub mod platform;
pub mod reference;
pub mod value;

pub use config::InterpreterConfig;
pub use env::{Env, ObjectKind, PropertyKey};
pub use error::JsError;
pub use function::{JsFunction, NativeFn};
pub use intern::Token;
pub use interpreter::{Completion, Interpreter};
pub use parser::parse;
pub use platform::{BufferedConsole, ConsoleLevel, ConsoleProvider, RandomProvider, TimeProvider};
pub use reference::Reference;
pub use value::{CheapClone, JsString, JsValue};
