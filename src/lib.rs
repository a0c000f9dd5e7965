//! Calltron - Arity-Aware Calling Convention Core
//!
//! This library resolves "call this value with these N arguments" against the
//! callee's declared arity signature: a set of fixed arities plus an optional
//! variadic tail. It sits on the hot path of every call a dynamic-language
//! runtime makes and interoperates with JIT-generated native code through
//! per-arity entry-point slots and a C ABI.
//!
//! # Architecture
//!
//! 1. **Types** (`types` module)
//!    - [`ArityFlags`]: one-byte arity descriptor shared with native code
//!    - [`Object`]: runtime values, including rest lists and lookup collections
//!    - [`Callable`]: per-arity invocation contract with `InvalidArity` defaults
//!    - [`Closure`]: eleven write-once native entry slots plus an owned context
//!
//! 2. **Runtime** (`runtime` module)
//!    - `dynamic_call0`..`dynamic_call10`: fixed-count dispatch with variadic
//!      packing and boundary tie-breaks
//!    - [`dynamic_call_rest`]: ten positional arguments plus a trailing collection
//!    - [`apply_to`] / [`apply_iter`]: calls over sequences of unknown length
//!
//! 3. **Embedding** (`context`, `config`, `ffi` modules)
//!    - [`RuntimeContext`]: var registry and last-error slot
//!    - [`RuntimeConfig`]: TOML/env configuration and tracing setup
//!    - `calltron_*` C functions (feature `ffi`)
//!
//! # Example
//!
//! ```rust
//! use calltron::*;
//!
//! /// `(fn [x & rest] ...)`: the variadic body lives at entry 2
//! #[derive(Debug)]
//! struct CountRest;
//!
//! impl Callable for CountRest {
//!     fn describe(&self) -> String {
//!         "count-rest".into()
//!     }
//!
//!     fn arity_flags(&self) -> ArityFlags {
//!         ArityFlags::variadic(1, false)
//!     }
//!
//!     fn call2(&self, _x: &Object, rest: &Object) -> CallResult<Object> {
//!         let n = rest.as_list().map_or(0, |l| l.len());
//!         Ok(Object::Integer(n as i64))
//!     }
//! }
//!
//! let f = Object::native(CountRest);
//! let n = dynamic_call4(&f, Object::Nil, Object::Nil, Object::Nil, Object::Nil).unwrap();
//! assert_eq!(n, Object::Integer(3));
//!
//! // An exact call at the boundary gets an explicit nil rest.
//! assert_eq!(dynamic_call1(&f, Object::Nil).unwrap(), Object::Integer(0));
//!
//! // Too few arguments for any entry.
//! assert!(dynamic_call0(&f).unwrap_err().is_arity_error());
//! ```

pub mod config;
pub mod context;
#[cfg(feature = "ffi")]
pub mod ffi;
pub mod runtime;
pub mod types;

pub use config::{init_tracing, ConfigError, RuntimeConfig};
pub use context::RuntimeContext;
pub use runtime::{
    apply_iter, apply_to, dynamic_call, dynamic_call0, dynamic_call1, dynamic_call10,
    dynamic_call2, dynamic_call3, dynamic_call4, dynamic_call5, dynamic_call6, dynamic_call7,
    dynamic_call8, dynamic_call9, dynamic_call_rest,
};
pub use types::{
    ArityFlags, CallError, CallResult, Callable, Closure, ClosureContext, Keyword, List, Map,
    NativeEntry, Object, Set, Var, Vector,
};
