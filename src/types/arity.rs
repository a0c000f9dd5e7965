//! Arity descriptor codec.
//!
//! This module defines [`ArityFlags`], the one-byte signature shape every
//! callable reports to the dispatcher. The byte layout is shared with
//! JIT-generated code and the C ABI, see [`super::constants`].

use std::fmt;

use super::constants::{
    AMBIGUOUS_BIT, FIXED_ARITY_MASK, MAX_PARAMS, NO_VARIADIC_MASK, VARIADIC_BIT,
};
use super::error::{CallError, CallResult};

// =============================================================================
// ArityFlags - Arity Descriptor
// =============================================================================

/// Encoded arity descriptor of a callable.
///
/// - Non-variadic: a call with N arguments goes to the fixed-N entry.
/// - Variadic from `k`: calls with more than `k` arguments pack the overflow
///   into a rest list passed to entry `k + 1`.
/// - Ambiguous: a call with exactly `k` arguments prefers the separate fixed-k
///   entry over the variadic one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct ArityFlags(u8);

impl ArityFlags {
    /// Encode a descriptor, rejecting shapes the dispatcher cannot serve.
    ///
    /// Fails when `highest_fixed_arity` is above [`MAX_PARAMS`] or when the
    /// ambiguity flag is set without the variadic flag.
    pub fn new(
        highest_fixed_arity: u8,
        is_variadic: bool,
        is_variadic_ambiguous: bool,
    ) -> CallResult<Self> {
        if usize::from(highest_fixed_arity) > MAX_PARAMS {
            return Err(CallError::ArityOutOfRange(highest_fixed_arity));
        }
        if is_variadic_ambiguous && !is_variadic {
            return Err(CallError::AmbiguousWithoutVariadic);
        }
        Ok(Self::encode(
            highest_fixed_arity,
            is_variadic,
            is_variadic_ambiguous,
        ))
    }

    /// Pack the three fields without validation.
    ///
    /// Fixed arities above 63 are truncated to the 6-bit field.
    #[inline(always)]
    pub const fn encode(
        highest_fixed_arity: u8,
        is_variadic: bool,
        is_variadic_ambiguous: bool,
    ) -> Self {
        let mut bits = highest_fixed_arity & FIXED_ARITY_MASK;
        if is_variadic {
            bits |= VARIADIC_BIT;
        }
        if is_variadic_ambiguous {
            bits |= AMBIGUOUS_BIT;
        }
        ArityFlags(bits)
    }

    /// Descriptor of a callable with fixed arities only
    #[inline(always)]
    pub const fn fixed(highest_fixed_arity: u8) -> Self {
        Self::encode(highest_fixed_arity, false, false)
    }

    /// Descriptor of a callable whose variadic tail starts at `fixed_arity`
    #[inline(always)]
    pub const fn variadic(fixed_arity: u8, is_variadic_ambiguous: bool) -> Self {
        Self::encode(fixed_arity, true, is_variadic_ambiguous)
    }

    /// Adopt an already encoded byte as produced by external code
    #[inline(always)]
    pub const fn from_bits(bits: u8) -> Self {
        ArityFlags(bits)
    }

    /// Raw byte representation
    #[inline(always)]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Highest fixed arity (bits 0-5)
    #[inline(always)]
    pub const fn highest_fixed_arity(self) -> u8 {
        self.0 & FIXED_ARITY_MASK
    }

    /// Whether the callable accepts a trailing rest collection
    #[inline(always)]
    pub const fn is_variadic(self) -> bool {
        self.0 & VARIADIC_BIT != 0
    }

    /// Whether an exact call at the variadic boundary resolves to a separate
    /// fixed implementation
    #[inline(always)]
    pub const fn is_ambiguous(self) -> bool {
        self.0 & AMBIGUOUS_BIT != 0
    }

    /// Single discriminant for the per-arity dispatch.
    ///
    /// The variadic tail's starting arity for variadic callables,
    /// [`NO_VARIADIC_MASK`] otherwise.
    #[inline(always)]
    pub const fn dispatch_mask(self) -> u8 {
        if self.is_variadic() {
            self.highest_fixed_arity()
        } else {
            NO_VARIADIC_MASK
        }
    }
}

impl From<ArityFlags> for u8 {
    fn from(flags: ArityFlags) -> u8 {
        flags.0
    }
}

impl fmt::Debug for ArityFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArityFlags")
            .field("highest_fixed_arity", &self.highest_fixed_arity())
            .field("is_variadic", &self.is_variadic())
            .field("is_ambiguous", &self.is_ambiguous())
            .finish()
    }
}

impl fmt::Display for ArityFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arity = self.highest_fixed_arity();
        match (self.is_variadic(), self.is_ambiguous()) {
            (false, _) => write!(f, "fixed<={}", arity),
            (true, false) => write!(f, "variadic>={}", arity),
            (true, true) => write!(f, "variadic>={} (ambiguous)", arity),
        }
    }
}
