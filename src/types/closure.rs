//! Native closure representation.
//!
//! This module defines [`Closure`], the concrete [`Callable`] produced by
//! compiled code: an arity descriptor, eleven write-once entry-point slots
//! (one per parameter count 0..=10) and an opaque context pointer handed to
//! every entry as its hidden first argument.
//!
//! # Entry ABI
//!
//! ```text
//! unsafe extern "C" fn(ctx: *mut c_void, a1: *const Object, ..., aK: *const Object) -> *mut Object
//! ```
//!
//! Arguments are borrowed. The result is owned and must come from
//! [`Object::into_raw`]; a null result reports a native failure.

use std::ffi::c_void;
use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::{debug, trace, warn};

use super::arity::ArityFlags;
use super::callable::Callable;
use super::constants::ENTRY_SLOTS;
use super::error::{CallError, CallResult};
use super::object::Object;

// =============================================================================
// Entry Point Signatures
// =============================================================================

pub type Arity0 = unsafe extern "C" fn(*mut c_void) -> *mut Object;
pub type Arity1 = unsafe extern "C" fn(*mut c_void, *const Object) -> *mut Object;
pub type Arity2 = unsafe extern "C" fn(*mut c_void, *const Object, *const Object) -> *mut Object;
pub type Arity3 =
    unsafe extern "C" fn(*mut c_void, *const Object, *const Object, *const Object) -> *mut Object;
pub type Arity4 = unsafe extern "C" fn(
    *mut c_void,
    *const Object,
    *const Object,
    *const Object,
    *const Object,
) -> *mut Object;
pub type Arity5 = unsafe extern "C" fn(
    *mut c_void,
    *const Object,
    *const Object,
    *const Object,
    *const Object,
    *const Object,
) -> *mut Object;
pub type Arity6 = unsafe extern "C" fn(
    *mut c_void,
    *const Object,
    *const Object,
    *const Object,
    *const Object,
    *const Object,
    *const Object,
) -> *mut Object;
pub type Arity7 = unsafe extern "C" fn(
    *mut c_void,
    *const Object,
    *const Object,
    *const Object,
    *const Object,
    *const Object,
    *const Object,
    *const Object,
) -> *mut Object;
pub type Arity8 = unsafe extern "C" fn(
    *mut c_void,
    *const Object,
    *const Object,
    *const Object,
    *const Object,
    *const Object,
    *const Object,
    *const Object,
    *const Object,
) -> *mut Object;
pub type Arity9 = unsafe extern "C" fn(
    *mut c_void,
    *const Object,
    *const Object,
    *const Object,
    *const Object,
    *const Object,
    *const Object,
    *const Object,
    *const Object,
    *const Object,
) -> *mut Object;
pub type Arity10 = unsafe extern "C" fn(
    *mut c_void,
    *const Object,
    *const Object,
    *const Object,
    *const Object,
    *const Object,
    *const Object,
    *const Object,
    *const Object,
    *const Object,
    *const Object,
) -> *mut Object;

/// Untyped function pointer as it crosses the C boundary
pub type RawEntry = unsafe extern "C" fn();

/// Release callback for a closure context
pub type ContextRelease = unsafe extern "C" fn(*mut c_void);

// =============================================================================
// NativeEntry - Typed Entry Point
// =============================================================================

/// An entry point tagged with its parameter count.
#[derive(Clone, Copy)]
pub enum NativeEntry {
    Arity0(Arity0),
    Arity1(Arity1),
    Arity2(Arity2),
    Arity3(Arity3),
    Arity4(Arity4),
    Arity5(Arity5),
    Arity6(Arity6),
    Arity7(Arity7),
    Arity8(Arity8),
    Arity9(Arity9),
    Arity10(Arity10),
}

impl NativeEntry {
    /// Parameter count, excluding the context pointer
    pub const fn arity(&self) -> usize {
        match self {
            NativeEntry::Arity0(_) => 0,
            NativeEntry::Arity1(_) => 1,
            NativeEntry::Arity2(_) => 2,
            NativeEntry::Arity3(_) => 3,
            NativeEntry::Arity4(_) => 4,
            NativeEntry::Arity5(_) => 5,
            NativeEntry::Arity6(_) => 6,
            NativeEntry::Arity7(_) => 7,
            NativeEntry::Arity8(_) => 8,
            NativeEntry::Arity9(_) => 9,
            NativeEntry::Arity10(_) => 10,
        }
    }

    /// Reinterpret an untyped function pointer as the `arity`-parameter entry.
    ///
    /// # Safety
    ///
    /// `entry` must really have the [`Arity0`]..[`Arity10`] signature that
    /// matches `arity`.
    pub unsafe fn from_raw(arity: usize, entry: RawEntry) -> CallResult<Self> {
        use std::mem::transmute;
        Ok(match arity {
            0 => NativeEntry::Arity0(transmute::<RawEntry, Arity0>(entry)),
            1 => NativeEntry::Arity1(transmute::<RawEntry, Arity1>(entry)),
            2 => NativeEntry::Arity2(transmute::<RawEntry, Arity2>(entry)),
            3 => NativeEntry::Arity3(transmute::<RawEntry, Arity3>(entry)),
            4 => NativeEntry::Arity4(transmute::<RawEntry, Arity4>(entry)),
            5 => NativeEntry::Arity5(transmute::<RawEntry, Arity5>(entry)),
            6 => NativeEntry::Arity6(transmute::<RawEntry, Arity6>(entry)),
            7 => NativeEntry::Arity7(transmute::<RawEntry, Arity7>(entry)),
            8 => NativeEntry::Arity8(transmute::<RawEntry, Arity8>(entry)),
            9 => NativeEntry::Arity9(transmute::<RawEntry, Arity9>(entry)),
            10 => NativeEntry::Arity10(transmute::<RawEntry, Arity10>(entry)),
            other => return Err(CallError::InvalidEntrySlot(other)),
        })
    }
}

impl fmt::Debug for NativeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeEntry(arity {})", self.arity())
    }
}

// =============================================================================
// ClosureContext - Owned Opaque Context
// =============================================================================

/// Opaque context pointer exclusively owned by one closure.
///
/// The release callback, if any, runs exactly once when the context drops.
pub struct ClosureContext {
    ptr: *mut c_void,
    release: Option<ContextRelease>,
}

// SAFETY: `boxed` only accepts `Send + Sync` payloads and `from_raw` puts the
// same obligation on its caller.
unsafe impl Send for ClosureContext {}
unsafe impl Sync for ClosureContext {}

unsafe extern "C" fn release_boxed<T>(ptr: *mut c_void) {
    drop(Box::from_raw(ptr as *mut T));
}

impl ClosureContext {
    /// No context; entries receive a null pointer
    pub const fn none() -> Self {
        Self {
            ptr: std::ptr::null_mut(),
            release: None,
        }
    }

    /// Move a Rust value into an owned context.
    ///
    /// Entries can read it back by casting the context pointer to `*const T`.
    pub fn boxed<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            ptr: Box::into_raw(Box::new(value)) as *mut c_void,
            release: Some(release_boxed::<T>),
        }
    }

    /// Adopt a foreign context pointer.
    ///
    /// # Safety
    ///
    /// The pointee must stay valid until `release` runs (or forever when no
    /// release is given) and must tolerate concurrent access from every
    /// thread that calls the owning closure.
    pub unsafe fn from_raw(ptr: *mut c_void, release: Option<ContextRelease>) -> Self {
        Self { ptr, release }
    }

    #[inline]
    pub fn as_ptr(&self) -> *mut c_void {
        self.ptr
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }
}

impl Default for ClosureContext {
    fn default() -> Self {
        Self::none()
    }
}

impl Drop for ClosureContext {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            if !self.ptr.is_null() {
                // SAFETY: ownership of `ptr` was transferred at construction
                // and `take` guarantees a single release.
                unsafe { release(self.ptr) };
            }
        }
    }
}

impl fmt::Debug for ClosureContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClosureContext")
            .field("ptr", &self.ptr)
            .field("has_release", &self.release.is_some())
            .finish()
    }
}

// =============================================================================
// Closure
// =============================================================================

/// A callable backed by native entry points.
pub struct Closure {
    flags: ArityFlags,
    entries: [OnceLock<NativeEntry>; ENTRY_SLOTS],
    context: ClosureContext,
    name: Option<Arc<str>>,
}

impl Closure {
    /// Create a context-free function with every slot unset
    pub fn new(flags: ArityFlags) -> Self {
        Self::with_context(flags, ClosureContext::none())
    }

    /// Create a closure owning `context`
    pub fn with_context(flags: ArityFlags, context: ClosureContext) -> Self {
        debug!(
            target: "calltron::closure",
            flags = %flags,
            has_context = !context.is_null(),
            "closure created"
        );
        Self {
            flags,
            entries: std::array::from_fn(|_| OnceLock::new()),
            context,
            name: None,
        }
    }

    /// Attach a diagnostic name
    pub fn named(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub fn flags(&self) -> ArityFlags {
        self.flags
    }

    #[inline]
    pub fn context_ptr(&self) -> *mut c_void {
        self.context.as_ptr()
    }

    /// Install `entry` in the slot matching its parameter count.
    ///
    /// Slots are write-once; the slot is not checked against the descriptor.
    pub fn set_entry(&self, entry: NativeEntry) -> CallResult<()> {
        let arity = entry.arity();
        if self.entries[arity].set(entry).is_err() {
            warn!(target: "calltron::closure", arity, closure = %self.describe(), "entry slot already set");
            return Err(CallError::EntryAlreadySet(arity));
        }
        debug!(target: "calltron::closure", arity, closure = %self.describe(), "entry installed");
        Ok(())
    }

    /// Builder form of [`Closure::set_entry`]
    pub fn with_entry(self, entry: NativeEntry) -> CallResult<Self> {
        self.set_entry(entry)?;
        Ok(self)
    }

    pub fn has_entry(&self, arity: usize) -> bool {
        self.entry(arity).is_some()
    }

    #[inline]
    fn entry(&self, arity: usize) -> Option<NativeEntry> {
        self.entries.get(arity).and_then(|slot| slot.get().copied())
    }

    fn adopt_result(&self, arity: usize, result: *mut Object) -> CallResult<Object> {
        if result.is_null() {
            trace!(target: "calltron::closure", arity, "native entry returned null");
            return Err(CallError::NativeFailure(arity, self.describe()));
        }
        // SAFETY: the entry ABI requires results to come from `Object::into_raw`.
        Ok(unsafe { Object::from_raw(result) })
    }
}

macro_rules! native_call {
    ($method:ident, $arity:literal, $variant:ident $(, $arg:ident)*) => {
        fn $method(&self $(, $arg: &Object)*) -> CallResult<Object> {
            match self.entry($arity) {
                Some(NativeEntry::$variant(entry)) => {
                    // SAFETY: the producer vouched for the signature when the
                    // entry was built; arguments outlive the call.
                    let result = unsafe { entry(self.context.as_ptr() $(, $arg as *const Object)*) };
                    self.adopt_result($arity, result)
                }
                _ => Err(CallError::invalid_arity($arity, self.describe())),
            }
        }
    };
}

impl Callable for Closure {
    fn describe(&self) -> String {
        match &self.name {
            Some(name) => format!("#<closure {}>", name),
            None => format!("#<closure {:p}>", self),
        }
    }

    fn arity_flags(&self) -> ArityFlags {
        self.flags
    }

    native_call!(call0, 0, Arity0);
    native_call!(call1, 1, Arity1, a1);
    native_call!(call2, 2, Arity2, a1, a2);
    native_call!(call3, 3, Arity3, a1, a2, a3);
    native_call!(call4, 4, Arity4, a1, a2, a3, a4);
    native_call!(call5, 5, Arity5, a1, a2, a3, a4, a5);
    native_call!(call6, 6, Arity6, a1, a2, a3, a4, a5, a6);
    native_call!(call7, 7, Arity7, a1, a2, a3, a4, a5, a6, a7);
    native_call!(call8, 8, Arity8, a1, a2, a3, a4, a5, a6, a7, a8);
    native_call!(call9, 9, Arity9, a1, a2, a3, a4, a5, a6, a7, a8, a9);
    native_call!(call10, 10, Arity10, a1, a2, a3, a4, a5, a6, a7, a8, a9, a10);
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let installed: Vec<usize> = (0..ENTRY_SLOTS).filter(|&a| self.has_entry(a)).collect();
        f.debug_struct("Closure")
            .field("name", &self.name)
            .field("flags", &self.flags)
            .field("entries", &installed)
            .field("context", &self.context)
            .finish()
    }
}

impl fmt::Display for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
