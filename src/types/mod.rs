//! Calling-Convention Type Definitions
//!
//! This module defines the core types shared by the dispatcher, produced
//! native code and the C ABI:
//! - [`ArityFlags`]: One-byte arity descriptor
//! - [`Object`]: Runtime value representation
//! - [`List`], [`Vector`], [`Map`], [`Set`], [`Keyword`]: Argument containers
//!   and lookup invocables
//! - [`Var`]: Reference cells
//! - [`Callable`]: Per-arity invocation contract
//! - [`Closure`] and [`NativeEntry`]: Native entry-point storage
//! - [`CallResult`] and [`CallError`]: Result types for call operations

mod arity;
mod callable;
mod closure;
mod collections;
mod constants;
mod error;
mod object;
mod var;


// Re-export constants
pub use constants::{
    // Descriptor layout
    AMBIGUOUS_BIT,
    // Call limits
    APPLY_LOOKAHEAD,
    ARITY_FLAGS_INVALID,
    ENTRY_SLOTS,
    FIXED_ARITY_MASK,
    MAX_PARAMS,
    NO_VARIADIC_MASK,
    VARIADIC_BIT,
};

// Re-export arity descriptor
pub use arity::ArityFlags;

// Re-export callable contract
pub use callable::Callable;

// Re-export closure types
pub use closure::{
    Arity0, Arity1, Arity10, Arity2, Arity3, Arity4, Arity5, Arity6, Arity7, Arity8, Arity9,
    Closure, ClosureContext, ContextRelease, NativeEntry, RawEntry,
};

// Re-export collections
pub use collections::{Keyword, List, Map, Seq, Set, Vector};

// Re-export error types
pub use error::{CallError, CallResult};

// Re-export object model
pub use object::Object;

// Re-export reference cells
pub use var::Var;
