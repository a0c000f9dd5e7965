//! Arity encoding and calling-convention constants.
//!
//! This module defines the bit layout of the arity descriptor byte and the
//! limits shared by the dispatcher, the apply adapter and the C ABI.

// =============================================================================
// Arity Descriptor Layout
// =============================================================================
//
// One byte per callable:
//   [Variadic (1)][Ambiguous (1)][Highest fixed arity (6)]
//
//   bit 7    - callable has a variadic tail
//   bit 6    - a separate fixed implementation exists at the variadic
//              tail's starting arity
//   bits 0-5 - highest fixed arity (0..=63 representable, 0..=10 dispatchable)

/// Variadic tail flag (bit 7)
pub const VARIADIC_BIT: u8 = 0x80;

/// Variadic ambiguity flag (bit 6)
pub const AMBIGUOUS_BIT: u8 = 0x40;

/// Mask for the highest fixed arity field (bits 0-5)
pub const FIXED_ARITY_MASK: u8 = 0x3F;

/// Dispatch mask reported by non-variadic callables.
///
/// Never equal to any call arity the dispatcher can see, so no variadic
/// boundary ever matches.
pub const NO_VARIADIC_MASK: u8 = u8::MAX;

/// Sentinel returned across the C ABI when an arity descriptor is rejected.
///
/// Ambiguous without variadic with a fixed arity of 63: never produced by a
/// valid encode.
pub const ARITY_FLAGS_INVALID: u8 = AMBIGUOUS_BIT | FIXED_ARITY_MASK;

// =============================================================================
// Call Limits
// =============================================================================

/// Maximum number of positional parameters an entry point can take.
///
/// Calls with more arguments go through the 10-fixed-plus-rest overload.
pub const MAX_PARAMS: usize = 10;

/// Number of native entry slots per closure (one per arity 0..=MAX_PARAMS).
pub const ENTRY_SLOTS: usize = MAX_PARAMS + 1;

/// Number of elements the apply adapter realizes eagerly before deciding
/// between the fixed overloads and the rest overload.
pub const APPLY_LOOKAHEAD: usize = MAX_PARAMS + 1;
