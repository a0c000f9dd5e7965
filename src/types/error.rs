//! Call error types.
//!
//! This module defines [`CallError`] and [`CallResult`], the typed failures
//! surfaced by the dispatcher, closures and the C ABI.

use thiserror::Error;

// =============================================================================
// CallResult and CallError
// =============================================================================

/// Errors produced while resolving or performing a call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    /// The callee has no implementation for exactly this many fixed
    /// arguments and no applicable variadic path.
    #[error("invalid call with {0} args to: {1}")]
    InvalidArity(usize, String),

    /// Raised by the 10-fixed-plus-rest overload when no variadic boundary
    /// applies to the total argument count.
    #[error("unsupported arity: {0} for {1}")]
    UnsupportedArity(usize, String),

    /// A native entry point returned a null object pointer.
    #[error("native entry for arity {0} of {1} returned no value")]
    NativeFailure(usize, String),

    /// A var was dereferenced before a root was bound.
    #[error("unbound var: {0}")]
    UnboundVar(String),

    /// `apply` was given something that cannot be iterated.
    #[error("{0} is not seqable")]
    NotSeqable(String),

    /// A var operation was given some other object.
    #[error("{0} is not a var")]
    NotAVar(String),

    /// A descriptor advertised a fixed arity with no dispatcher overload.
    #[error("highest fixed arity {0} exceeds the maximum of 10")]
    ArityOutOfRange(u8),

    /// A descriptor set the ambiguity flag without the variadic flag.
    #[error("variadic ambiguity flag set on a non-variadic descriptor")]
    AmbiguousWithoutVariadic,

    /// A producer tried to install a second entry point into a slot.
    #[error("entry slot for arity {0} is already set")]
    EntryAlreadySet(usize),

    /// A producer named an entry slot outside 0..=10.
    #[error("no entry slot for arity {0}")]
    InvalidEntrySlot(usize),

    /// A required pointer crossed the C boundary as null.
    #[error("null pointer passed for {0}")]
    NullPointer(&'static str),

    /// A C string crossing the boundary was not valid UTF-8.
    #[error("invalid UTF-8 in C string")]
    InvalidUtf8,
}

impl CallError {
    /// Create an invalid arity error for `callee`
    pub fn invalid_arity(arity: usize, callee: impl Into<String>) -> Self {
        CallError::InvalidArity(arity, callee.into())
    }

    /// Create an unsupported arity error for `callee`
    pub fn unsupported_arity(arity: usize, callee: impl Into<String>) -> Self {
        CallError::UnsupportedArity(arity, callee.into())
    }

    /// Whether this error reports an arity mismatch at call time
    pub fn is_arity_error(&self) -> bool {
        matches!(
            self,
            CallError::InvalidArity(..) | CallError::UnsupportedArity(..)
        )
    }
}

/// Result type for call operations
pub type CallResult<T> = Result<T, CallError>;
