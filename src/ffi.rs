//! C ABI for JIT-generated code and embedders.
//!
//! # Ownership
//!
//! - Every `*mut Object` returned here is owned by the caller and must be
//!   released with [`calltron_object_free`].
//! - Every `*const Object` argument is borrowed for the duration of the call.
//! - Strings returned here are released with [`calltron_free_string`].
//!
//! Call failures return null and record the error in the runtime passed as
//! `rt`; read it with [`calltron_last_error`].

use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use tracing::{debug, warn};

use crate::config::RuntimeConfig;
use crate::context::RuntimeContext;
use crate::runtime::{
    apply_to, dynamic_call0, dynamic_call1, dynamic_call10, dynamic_call2, dynamic_call3,
    dynamic_call4, dynamic_call5, dynamic_call6, dynamic_call7, dynamic_call8, dynamic_call9,
};
use crate::types::{
    ArityFlags, CallError, CallResult, Closure, ClosureContext, ContextRelease, NativeEntry,
    Object, RawEntry, ARITY_FLAGS_INVALID,
};

// =============================================================================
// Helpers
// =============================================================================

#[inline]
unsafe fn borrow<'a>(ptr: *const Object, what: &'static str) -> CallResult<&'a Object> {
    ptr.as_ref().ok_or(CallError::NullPointer(what))
}

unsafe fn c_str<'a>(ptr: *const c_char, what: &'static str) -> CallResult<&'a str> {
    if ptr.is_null() {
        return Err(CallError::NullPointer(what));
    }
    CStr::from_ptr(ptr).to_str().map_err(|_| CallError::InvalidUtf8)
}

/// Hand a call result across the boundary
fn finish(rt: &RuntimeContext, result: CallResult<Object>) -> *mut Object {
    match result {
        Ok(value) => value.into_raw(),
        Err(e) => {
            if matches!(e, CallError::NullPointer(_)) {
                warn!(target: "calltron::ffi", error = %e, "null pointer across C boundary");
            } else {
                debug!(target: "calltron::ffi", error = %e, "call failed");
            }
            rt.record_error(&e);
            ptr::null_mut()
        }
    }
}

// =============================================================================
// Runtime
// =============================================================================

/// Create a runtime context from a TOML configuration (null for defaults).
///
/// Returns null if the configuration cannot be parsed.
///
/// # Safety
/// - `config_toml` must be null or a valid null-terminated C string
/// - The returned pointer must be freed using `calltron_runtime_free`
#[no_mangle]
pub unsafe extern "C" fn calltron_runtime_new(config_toml: *const c_char) -> *mut RuntimeContext {
    let config = if config_toml.is_null() {
        Ok(RuntimeConfig::default())
    } else {
        match CStr::from_ptr(config_toml).to_str() {
            Ok(src) => RuntimeConfig::from_toml_str(src),
            Err(_) => {
                warn!(target: "calltron::ffi", "runtime config is not valid UTF-8");
                return ptr::null_mut();
            }
        }
    };

    match config.and_then(RuntimeContext::new) {
        Ok(ctx) => Box::into_raw(Box::new(ctx)),
        Err(e) => {
            warn!(target: "calltron::ffi", error = %e, "failed to create runtime");
            ptr::null_mut()
        }
    }
}

/// Free a runtime context
///
/// # Safety
/// - `rt` must be null or a pointer returned by `calltron_runtime_new`
/// - `rt` must not be used after calling this function
#[no_mangle]
pub unsafe extern "C" fn calltron_runtime_free(rt: *mut RuntimeContext) {
    if !rt.is_null() {
        drop(Box::from_raw(rt));
    }
}

/// Take the last recorded error message, or null if there is none.
///
/// # Safety
/// - `rt` must be null or a live runtime pointer
/// - A non-null result must be freed using `calltron_free_string`
#[no_mangle]
pub unsafe extern "C" fn calltron_last_error(rt: *const RuntimeContext) -> *mut c_char {
    rt.as_ref()
        .and_then(RuntimeContext::take_last_error)
        .and_then(|msg| CString::new(msg).ok())
        .map_or(ptr::null_mut(), CString::into_raw)
}

/// Free a string returned by this library
///
/// # Safety
/// - `ptr` must be null or a pointer returned by `calltron_last_error`
/// - `ptr` must not be used after calling this function
#[no_mangle]
pub unsafe extern "C" fn calltron_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// =============================================================================
// Producer Surface
// =============================================================================

/// Encode an arity descriptor, or return `ARITY_FLAGS_INVALID` for shapes
/// the dispatcher cannot serve.
#[no_mangle]
pub extern "C" fn calltron_build_arity_flags(
    highest_fixed_arity: u8,
    is_variadic: bool,
    is_variadic_ambiguous: bool,
) -> u8 {
    match ArityFlags::new(highest_fixed_arity, is_variadic, is_variadic_ambiguous) {
        Ok(flags) => flags.bits(),
        Err(e) => {
            warn!(target: "calltron::ffi", error = %e, "rejected arity descriptor");
            ARITY_FLAGS_INVALID
        }
    }
}

fn checked_flags(arity_flags: u8) -> Option<ArityFlags> {
    if arity_flags == ARITY_FLAGS_INVALID {
        warn!(target: "calltron::ffi", "closure created with an invalid arity descriptor");
        return None;
    }
    Some(ArityFlags::from_bits(arity_flags))
}

/// Create a context-free function object with no entries installed.
///
/// Returns null for `ARITY_FLAGS_INVALID`.
#[no_mangle]
pub extern "C" fn calltron_function_create(arity_flags: u8) -> *mut Object {
    match checked_flags(arity_flags) {
        Some(flags) => Object::closure(Closure::new(flags)).into_raw(),
        None => ptr::null_mut(),
    }
}

/// Create a closure object owning `context`.
///
/// `release`, if given, runs exactly once with `context` when the last
/// reference to the closure is dropped. Returns null for
/// `ARITY_FLAGS_INVALID`, in which case `context` stays with the caller.
///
/// # Safety
/// - `context` must stay valid until `release` runs and tolerate concurrent
///   access from every thread calling the closure
#[no_mangle]
pub unsafe extern "C" fn calltron_closure_create(
    arity_flags: u8,
    context: *mut c_void,
    release: Option<ContextRelease>,
) -> *mut Object {
    let Some(flags) = checked_flags(arity_flags) else {
        return ptr::null_mut();
    };
    let context = ClosureContext::from_raw(context, release);
    Object::closure(Closure::with_context(flags, context)).into_raw()
}

/// Install the entry point for `arity` parameters.
///
/// Returns false if `f` is not a closure, `entry` is null, `arity` exceeds
/// 10, or the slot is already set.
///
/// # Safety
/// - `f` must be null or a valid object pointer
/// - `entry` must have the signature of an `arity`-parameter entry
#[no_mangle]
pub unsafe extern "C" fn calltron_closure_set_arity(
    f: *const Object,
    arity: usize,
    entry: Option<RawEntry>,
) -> bool {
    let Some(Object::Closure(closure)) = f.as_ref() else {
        warn!(target: "calltron::ffi", arity, "entry install on a non-closure");
        return false;
    };
    let result = entry
        .ok_or(CallError::NullPointer("entry"))
        .and_then(|entry| NativeEntry::from_raw(arity, entry))
        .and_then(|entry| closure.set_entry(entry));

    match result {
        Ok(()) => true,
        Err(e) => {
            warn!(target: "calltron::ffi", arity, error = %e, "rejected entry install");
            false
        }
    }
}

// =============================================================================
// Caller Surface
// =============================================================================

macro_rules! ffi_call {
    ($(#[$meta:meta])* $name:ident => $dispatch:ident($($arg:ident),*)) => {
        $(#[$meta])*
        ///
        /// # Safety
        /// - `rt` must be a live runtime pointer
        /// - `f` and every argument must be valid object pointers
        #[no_mangle]
        pub unsafe extern "C" fn $name(
            rt: *const RuntimeContext,
            f: *const Object
            $(, $arg: *const Object)*
        ) -> *mut Object {
            let Some(rt) = rt.as_ref() else {
                warn!(target: "calltron::ffi", "null runtime passed to {}", stringify!($name));
                return ptr::null_mut();
            };
            let result = (|| -> CallResult<Object> {
                let f = borrow(f, "callee")?;
                $dispatch(f $(, borrow($arg, stringify!($arg))?.clone())*)
            })();
            finish(rt, result)
        }
    };
}

ffi_call!(
    /// Call `f` with no arguments
    calltron_call0 => dynamic_call0()
);
ffi_call!(
    /// Call `f` with one argument
    calltron_call1 => dynamic_call1(a1)
);
ffi_call!(
    /// Call `f` with two arguments
    calltron_call2 => dynamic_call2(a1, a2)
);
ffi_call!(
    /// Call `f` with three arguments
    calltron_call3 => dynamic_call3(a1, a2, a3)
);
ffi_call!(
    /// Call `f` with four arguments
    calltron_call4 => dynamic_call4(a1, a2, a3, a4)
);
ffi_call!(
    /// Call `f` with five arguments
    calltron_call5 => dynamic_call5(a1, a2, a3, a4, a5)
);
ffi_call!(
    /// Call `f` with six arguments
    calltron_call6 => dynamic_call6(a1, a2, a3, a4, a5, a6)
);
ffi_call!(
    /// Call `f` with seven arguments
    #[allow(clippy::too_many_arguments)]
    calltron_call7 => dynamic_call7(a1, a2, a3, a4, a5, a6, a7)
);
ffi_call!(
    /// Call `f` with eight arguments
    #[allow(clippy::too_many_arguments)]
    calltron_call8 => dynamic_call8(a1, a2, a3, a4, a5, a6, a7, a8)
);
ffi_call!(
    /// Call `f` with nine arguments
    #[allow(clippy::too_many_arguments)]
    calltron_call9 => dynamic_call9(a1, a2, a3, a4, a5, a6, a7, a8, a9)
);
ffi_call!(
    /// Call `f` with ten arguments
    #[allow(clippy::too_many_arguments)]
    calltron_call10 => dynamic_call10(a1, a2, a3, a4, a5, a6, a7, a8, a9, a10)
);

/// Apply `f` to the elements of `coll`
///
/// # Safety
/// - `rt` must be a live runtime pointer
/// - `f` and `coll` must be valid object pointers
#[no_mangle]
pub unsafe extern "C" fn calltron_apply(
    rt: *const RuntimeContext,
    f: *const Object,
    coll: *const Object,
) -> *mut Object {
    let Some(rt) = rt.as_ref() else {
        warn!(target: "calltron::ffi", "null runtime passed to calltron_apply");
        return ptr::null_mut();
    };
    let result =
        (|| -> CallResult<Object> { apply_to(borrow(f, "callee")?, borrow(coll, "collection")?) })();
    finish(rt, result)
}

// =============================================================================
// Values
// =============================================================================

#[no_mangle]
pub extern "C" fn calltron_nil() -> *mut Object {
    Object::Nil.into_raw()
}

#[no_mangle]
pub extern "C" fn calltron_true() -> *mut Object {
    Object::Bool(true).into_raw()
}

#[no_mangle]
pub extern "C" fn calltron_false() -> *mut Object {
    Object::Bool(false).into_raw()
}

#[no_mangle]
pub extern "C" fn calltron_integer_create(value: i64) -> *mut Object {
    Object::Integer(value).into_raw()
}

#[no_mangle]
pub extern "C" fn calltron_real_create(value: f64) -> *mut Object {
    Object::Real(value).into_raw()
}

/// Create a string object; null if `s` is null or not UTF-8
///
/// # Safety
/// - `s` must be null or a valid null-terminated C string
#[no_mangle]
pub unsafe extern "C" fn calltron_string_create(s: *const c_char) -> *mut Object {
    match c_str(s, "string") {
        Ok(s) => Object::from(s).into_raw(),
        Err(e) => {
            warn!(target: "calltron::ffi", error = %e, "invalid string");
            ptr::null_mut()
        }
    }
}

/// Create a new owned reference to `o`
///
/// # Safety
/// - `o` must be null or a valid object pointer
#[no_mangle]
pub unsafe extern "C" fn calltron_object_clone(o: *const Object) -> *mut Object {
    o.as_ref()
        .map_or(ptr::null_mut(), |o| o.clone().into_raw())
}

/// Release an object returned by this library
///
/// # Safety
/// - `o` must be null or an owned pointer returned by this library
/// - `o` must not be used after calling this function
#[no_mangle]
pub unsafe extern "C" fn calltron_object_free(o: *mut Object) {
    if !o.is_null() {
        drop(Object::from_raw(o));
    }
}

/// # Safety
/// - `o` must be null or a valid object pointer
#[no_mangle]
pub unsafe extern "C" fn calltron_truthy(o: *const Object) -> bool {
    o.as_ref().is_some_and(Object::is_truthy)
}

/// # Safety
/// - `a` and `b` must be null or valid object pointers
#[no_mangle]
pub unsafe extern "C" fn calltron_equal(a: *const Object, b: *const Object) -> bool {
    match (a.as_ref(), b.as_ref()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// # Safety
/// - `o` must be null or a valid object pointer
#[no_mangle]
pub unsafe extern "C" fn calltron_to_hash(o: *const Object) -> u64 {
    o.as_ref().map_or(0, Object::hash_value)
}

/// Read an integer object into `out`; false if `o` is not an integer
///
/// # Safety
/// - `o` must be null or a valid object pointer
/// - `out` must be null or valid for writes
#[no_mangle]
pub unsafe extern "C" fn calltron_integer_value(o: *const Object, out: *mut i64) -> bool {
    match (o.as_ref().and_then(Object::as_integer), out.as_mut()) {
        (Some(n), Some(out)) => {
            *out = n;
            true
        }
        _ => false,
    }
}

// =============================================================================
// Vars
// =============================================================================

/// Intern `ns/name` (null `ns` selects the default namespace)
///
/// # Safety
/// - `rt` must be a live runtime pointer
/// - `ns` must be null or a valid C string; `name` must be a valid C string
#[no_mangle]
pub unsafe extern "C" fn calltron_var_intern(
    rt: *const RuntimeContext,
    ns: *const c_char,
    name: *const c_char,
) -> *mut Object {
    let Some(rt) = rt.as_ref() else {
        warn!(target: "calltron::ffi", "null runtime passed to calltron_var_intern");
        return ptr::null_mut();
    };
    let result = (|| -> CallResult<Object> {
        let name = c_str(name, "name")?;
        let var = if ns.is_null() {
            rt.intern_default(name)
        } else {
            rt.intern_var(c_str(ns, "namespace")?, name)
        };
        Ok(Object::Var(var))
    })();
    finish(rt, result)
}

/// Bind the root of a var object; false if `var` is not a var
///
/// # Safety
/// - `var` and `value` must be null or valid object pointers
#[no_mangle]
pub unsafe extern "C" fn calltron_var_bind_root(var: *const Object, value: *const Object) -> bool {
    match (var.as_ref(), value.as_ref()) {
        (Some(Object::Var(var)), Some(value)) => {
            var.bind_root(value.clone());
            true
        }
        _ => {
            warn!(target: "calltron::ffi", "bind_root on a non-var or null value");
            false
        }
    }
}

/// Current root value of a var object
///
/// # Safety
/// - `rt` must be a live runtime pointer
/// - `var` must be a valid object pointer
#[no_mangle]
pub unsafe extern "C" fn calltron_deref(
    rt: *const RuntimeContext,
    var: *const Object,
) -> *mut Object {
    let Some(rt) = rt.as_ref() else {
        warn!(target: "calltron::ffi", "null runtime passed to calltron_deref");
        return ptr::null_mut();
    };
    let result = (|| -> CallResult<Object> {
        match borrow(var, "var")? {
            Object::Var(var) => var.deref(),
            other => Err(CallError::NotAVar(other.to_string())),
        }
    })();
    finish(rt, result)
}
