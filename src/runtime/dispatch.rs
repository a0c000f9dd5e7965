//! Per-arity dynamic dispatch.
//!
//! These functions turn "call this value with these N arguments" into the
//! one entry point the callee's arity descriptor selects:
//!
//! - A `Var` source is dereferenced exactly once.
//! - Variadic callables whose tail starts below N receive the overflow packed
//!   into a fresh rest [`List`] at entry `k + 1`.
//! - An exact call at a non-ambiguous variadic boundary receives an explicit
//!   `nil` rest.
//! - Everything else goes to the fixed-N entry.
//!
//! Resolution is a handful of comparisons; no loop runs over candidate
//! boundaries. Packing is the only part proportional to the argument count.

use std::borrow::Cow;

use smallvec::{smallvec, SmallVec};
use tracing::trace;

use super::lookup::Lookup;
use crate::types::{CallError, CallResult, Callable, List, Object, ENTRY_SLOTS, MAX_PARAMS};

/// Positional argument buffer; never spills for dispatchable arities
pub type ArgBuf = SmallVec<[Object; ENTRY_SLOTS]>;

// =============================================================================
// Invocable - One-Time Capability Query
// =============================================================================

/// How a resolved callee can be invoked.
#[derive(Debug, Clone, Copy)]
pub enum Invocable<'a> {
    /// Full per-arity protocol
    Callable(&'a dyn Callable),
    /// Fixed 1-/2-argument lookup
    Lookup(Lookup<'a>),
    /// Not invocable
    Other(&'a Object),
}

impl<'a> Invocable<'a> {
    pub fn of(object: &'a Object) -> Self {
        if let Some(callable) = object.as_callable() {
            Invocable::Callable(callable)
        } else if let Some(lookup) = Lookup::of(object) {
            Invocable::Lookup(lookup)
        } else {
            Invocable::Other(object)
        }
    }
}

/// Deref a var source once
#[inline]
fn resolve(source: &Object) -> CallResult<Cow<'_, Object>> {
    match source {
        Object::Var(var) => {
            trace!(target: "calltron::dispatch", var = %var, "dereferencing var source");
            Ok(Cow::Owned(var.deref()?))
        }
        other => Ok(Cow::Borrowed(other)),
    }
}

// =============================================================================
// Core Resolution
// =============================================================================

/// Dispatch at most [`MAX_PARAMS`] positional arguments.
pub(crate) fn dispatch(source: &Object, args: ArgBuf) -> CallResult<Object> {
    let target = resolve(source)?;
    match Invocable::of(&target) {
        Invocable::Callable(callable) => dispatch_callable(callable, args),
        Invocable::Lookup(lookup) => lookup.invoke(&target, &args),
        Invocable::Other(other) => Err(CallError::invalid_arity(args.len(), other.to_string())),
    }
}

fn dispatch_callable(callable: &dyn Callable, mut args: ArgBuf) -> CallResult<Object> {
    let argc = args.len();
    let flags = callable.arity_flags();
    let mask = usize::from(flags.dispatch_mask());

    if mask < argc {
        trace!(target: "calltron::dispatch", argc, fixed = mask, "packing variadic rest");
        let rest: List = args.drain(mask..).collect();
        args.push(Object::List(rest));
    } else if mask == argc && !flags.is_ambiguous() {
        if argc == MAX_PARAMS {
            // No 11-parameter entry: the last argument opens the rest.
            if let Some(last) = args.pop() {
                args.push(Object::List(List::new(vec![last])));
            }
        } else {
            trace!(target: "calltron::dispatch", argc, "variadic boundary with empty rest");
            args.push(Object::Nil);
        }
    }

    invoke_positional(callable, &args)
}

/// Dispatch ten positional arguments followed by a non-empty trailing
/// collection.
pub(crate) fn dispatch_rest(source: &Object, mut fixed: ArgBuf, rest: List) -> CallResult<Object> {
    debug_assert_eq!(fixed.len(), MAX_PARAMS);
    if rest.is_empty() {
        return dispatch(source, fixed);
    }

    let total = fixed.len() + rest.len();
    let target = resolve(source)?;
    let callable = match Invocable::of(&target) {
        Invocable::Callable(callable) => callable,
        _ => return Err(CallError::invalid_arity(total, target.to_string())),
    };

    let flags = callable.arity_flags();
    let mask = usize::from(flags.dispatch_mask());
    let split = if mask < MAX_PARAMS {
        mask
    } else if mask == MAX_PARAMS && !flags.is_ambiguous() {
        MAX_PARAMS - 1
    } else {
        trace!(target: "calltron::dispatch", total, %flags, "no variadic boundary for rest call");
        return Err(CallError::unsupported_arity(total, callable.describe()));
    };

    trace!(target: "calltron::dispatch", total, fixed = split, "packing positional tail and rest");
    let mut packed = Vec::with_capacity((MAX_PARAMS - split) + rest.len());
    packed.extend(fixed.drain(split..));
    packed.extend(rest.iter().cloned());
    fixed.push(Object::List(List::new(packed)));

    invoke_positional(callable, &fixed)
}

/// Call the entry whose parameter count equals `args.len()`.
fn invoke_positional(callable: &dyn Callable, args: &[Object]) -> CallResult<Object> {
    match args {
        [] => callable.call0(),
        [a1] => callable.call1(a1),
        [a1, a2] => callable.call2(a1, a2),
        [a1, a2, a3] => callable.call3(a1, a2, a3),
        [a1, a2, a3, a4] => callable.call4(a1, a2, a3, a4),
        [a1, a2, a3, a4, a5] => callable.call5(a1, a2, a3, a4, a5),
        [a1, a2, a3, a4, a5, a6] => callable.call6(a1, a2, a3, a4, a5, a6),
        [a1, a2, a3, a4, a5, a6, a7] => callable.call7(a1, a2, a3, a4, a5, a6, a7),
        [a1, a2, a3, a4, a5, a6, a7, a8] => callable.call8(a1, a2, a3, a4, a5, a6, a7, a8),
        [a1, a2, a3, a4, a5, a6, a7, a8, a9] => {
            callable.call9(a1, a2, a3, a4, a5, a6, a7, a8, a9)
        }
        [a1, a2, a3, a4, a5, a6, a7, a8, a9, a10] => {
            callable.call10(a1, a2, a3, a4, a5, a6, a7, a8, a9, a10)
        }
        _ => Err(CallError::invalid_arity(args.len(), callable.describe())),
    }
}

// =============================================================================
// Public Entry Points
// =============================================================================

pub fn dynamic_call0(source: &Object) -> CallResult<Object> {
    dispatch(source, smallvec![])
}

pub fn dynamic_call1(source: &Object, a1: Object) -> CallResult<Object> {
    dispatch(source, smallvec![a1])
}

pub fn dynamic_call2(source: &Object, a1: Object, a2: Object) -> CallResult<Object> {
    dispatch(source, smallvec![a1, a2])
}

pub fn dynamic_call3(source: &Object, a1: Object, a2: Object, a3: Object) -> CallResult<Object> {
    dispatch(source, smallvec![a1, a2, a3])
}

pub fn dynamic_call4(
    source: &Object,
    a1: Object,
    a2: Object,
    a3: Object,
    a4: Object,
) -> CallResult<Object> {
    dispatch(source, smallvec![a1, a2, a3, a4])
}

pub fn dynamic_call5(
    source: &Object,
    a1: Object,
    a2: Object,
    a3: Object,
    a4: Object,
    a5: Object,
) -> CallResult<Object> {
    dispatch(source, smallvec![a1, a2, a3, a4, a5])
}

pub fn dynamic_call6(
    source: &Object,
    a1: Object,
    a2: Object,
    a3: Object,
    a4: Object,
    a5: Object,
    a6: Object,
) -> CallResult<Object> {
    dispatch(source, smallvec![a1, a2, a3, a4, a5, a6])
}

#[allow(clippy::too_many_arguments)]
pub fn dynamic_call7(
    source: &Object,
    a1: Object,
    a2: Object,
    a3: Object,
    a4: Object,
    a5: Object,
    a6: Object,
    a7: Object,
) -> CallResult<Object> {
    dispatch(source, smallvec![a1, a2, a3, a4, a5, a6, a7])
}

#[allow(clippy::too_many_arguments)]
pub fn dynamic_call8(
    source: &Object,
    a1: Object,
    a2: Object,
    a3: Object,
    a4: Object,
    a5: Object,
    a6: Object,
    a7: Object,
    a8: Object,
) -> CallResult<Object> {
    dispatch(source, smallvec![a1, a2, a3, a4, a5, a6, a7, a8])
}

#[allow(clippy::too_many_arguments)]
pub fn dynamic_call9(
    source: &Object,
    a1: Object,
    a2: Object,
    a3: Object,
    a4: Object,
    a5: Object,
    a6: Object,
    a7: Object,
    a8: Object,
    a9: Object,
) -> CallResult<Object> {
    dispatch(source, smallvec![a1, a2, a3, a4, a5, a6, a7, a8, a9])
}

#[allow(clippy::too_many_arguments)]
pub fn dynamic_call10(
    source: &Object,
    a1: Object,
    a2: Object,
    a3: Object,
    a4: Object,
    a5: Object,
    a6: Object,
    a7: Object,
    a8: Object,
    a9: Object,
    a10: Object,
) -> CallResult<Object> {
    dispatch(source, smallvec![a1, a2, a3, a4, a5, a6, a7, a8, a9, a10])
}

/// Ten positional arguments plus a trailing collection.
///
/// An empty `rest` behaves exactly like [`dynamic_call10`].
#[allow(clippy::too_many_arguments)]
pub fn dynamic_call_rest(
    source: &Object,
    a1: Object,
    a2: Object,
    a3: Object,
    a4: Object,
    a5: Object,
    a6: Object,
    a7: Object,
    a8: Object,
    a9: Object,
    a10: Object,
    rest: List,
) -> CallResult<Object> {
    dispatch_rest(
        source,
        smallvec![a1, a2, a3, a4, a5, a6, a7, a8, a9, a10],
        rest,
    )
}

/// Dispatch a slice of any length.
///
/// Slices longer than [`MAX_PARAMS`] take the first ten elements as
/// positional arguments and the remainder as the trailing collection.
pub fn dynamic_call(source: &Object, args: &[Object]) -> CallResult<Object> {
    if args.len() <= MAX_PARAMS {
        return dispatch(source, args.iter().cloned().collect());
    }
    let (fixed, rest) = args.split_at(MAX_PARAMS);
    dispatch_rest(source, fixed.iter().cloned().collect(), List::new(rest.to_vec()))
}
