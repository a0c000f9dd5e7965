//! Shared fixtures for integration tests
//!
//! - [`Recorder`]: a Rust callable that reports which entry received a call
//! - `record0`..`record10`: native entries doing the same for closures
//! - [`recording_closure`]: a closure with every slot installed

#![allow(dead_code)]

use std::ffi::c_void;

use calltron::*;

pub fn int(n: i64) -> Object {
    Object::Integer(n)
}

/// `n` consecutive integers starting at 1
pub fn ints(n: usize) -> Vec<Object> {
    (1..=n as i64).map(Object::Integer).collect()
}

/// The value every recording entry returns: `[entry arg...]`
pub fn called(entry: i64, args: Vec<Object>) -> Object {
    Object::vector(std::iter::once(int(entry)).chain(args))
}

/// Call through the fixed-count overload matching `args.len()`, or the
/// ten-plus-rest overload beyond ten.
pub fn call_n(f: &Object, args: &[Object]) -> CallResult<Object> {
    let a = |i: usize| args[i].clone();
    match args.len() {
        0 => dynamic_call0(f),
        1 => dynamic_call1(f, a(0)),
        2 => dynamic_call2(f, a(0), a(1)),
        3 => dynamic_call3(f, a(0), a(1), a(2)),
        4 => dynamic_call4(f, a(0), a(1), a(2), a(3)),
        5 => dynamic_call5(f, a(0), a(1), a(2), a(3), a(4)),
        6 => dynamic_call6(f, a(0), a(1), a(2), a(3), a(4), a(5)),
        7 => dynamic_call7(f, a(0), a(1), a(2), a(3), a(4), a(5), a(6)),
        8 => dynamic_call8(f, a(0), a(1), a(2), a(3), a(4), a(5), a(6), a(7)),
        9 => dynamic_call9(f, a(0), a(1), a(2), a(3), a(4), a(5), a(6), a(7), a(8)),
        10 => dynamic_call10(f, a(0), a(1), a(2), a(3), a(4), a(5), a(6), a(7), a(8), a(9)),
        _ => dynamic_call_rest(
            f,
            a(0),
            a(1),
            a(2),
            a(3),
            a(4),
            a(5),
            a(6),
            a(7),
            a(8),
            a(9),
            List::new(args[10..].to_vec()),
        ),
    }
}

// =============================================================================
// Recorder - Rust Callable
// =============================================================================

/// Callable with a configurable descriptor and set of implemented entries.
#[derive(Debug)]
pub struct Recorder {
    pub flags: ArityFlags,
    pub entries: Vec<usize>,
}

impl Recorder {
    /// Every entry 0..=10 implemented
    pub fn all(flags: ArityFlags) -> Object {
        Object::native(Recorder {
            flags,
            entries: (0..=10).collect(),
        })
    }

    /// Only `entries` implemented
    pub fn only(flags: ArityFlags, entries: &[usize]) -> Object {
        Object::native(Recorder {
            flags,
            entries: entries.to_vec(),
        })
    }

    fn record(&self, entry: usize, args: &[&Object]) -> CallResult<Object> {
        if !self.entries.contains(&entry) {
            return Err(CallError::invalid_arity(entry, self.describe()));
        }
        Ok(called(
            entry as i64,
            args.iter().map(|a| (*a).clone()).collect(),
        ))
    }
}

macro_rules! record_entry {
    ($method:ident, $n:literal $(, $a:ident)*) => {
        fn $method(&self $(, $a: &Object)*) -> CallResult<Object> {
            self.record($n, &[$($a),*])
        }
    };
}

impl Callable for Recorder {
    fn describe(&self) -> String {
        "recorder".into()
    }

    fn arity_flags(&self) -> ArityFlags {
        self.flags
    }

    record_entry!(call0, 0);
    record_entry!(call1, 1, a1);
    record_entry!(call2, 2, a1, a2);
    record_entry!(call3, 3, a1, a2, a3);
    record_entry!(call4, 4, a1, a2, a3, a4);
    record_entry!(call5, 5, a1, a2, a3, a4, a5);
    record_entry!(call6, 6, a1, a2, a3, a4, a5, a6);
    record_entry!(call7, 7, a1, a2, a3, a4, a5, a6, a7);
    record_entry!(call8, 8, a1, a2, a3, a4, a5, a6, a7, a8);
    record_entry!(call9, 9, a1, a2, a3, a4, a5, a6, a7, a8, a9);
    record_entry!(call10, 10, a1, a2, a3, a4, a5, a6, a7, a8, a9, a10);
}

// =============================================================================
// Native Recording Entries
// =============================================================================

macro_rules! native_record {
    ($name:ident, $n:literal $(, $a:ident)*) => {
        /// Native entry returning `[entry arg...]`
        pub unsafe extern "C" fn $name(_ctx: *mut c_void $(, $a: *const Object)*) -> *mut Object {
            called($n, vec![$((*$a).clone()),*]).into_raw()
        }
    };
}

native_record!(record0, 0);
native_record!(record1, 1, a1);
native_record!(record2, 2, a1, a2);
native_record!(record3, 3, a1, a2, a3);
native_record!(record4, 4, a1, a2, a3, a4);
native_record!(record5, 5, a1, a2, a3, a4, a5);
native_record!(record6, 6, a1, a2, a3, a4, a5, a6);
native_record!(record7, 7, a1, a2, a3, a4, a5, a6, a7);
native_record!(record8, 8, a1, a2, a3, a4, a5, a6, a7, a8);
native_record!(record9, 9, a1, a2, a3, a4, a5, a6, a7, a8, a9);
native_record!(record10, 10, a1, a2, a3, a4, a5, a6, a7, a8, a9, a10);

/// A closure with all eleven recording entries installed
pub fn recording_closure(flags: ArityFlags) -> Object {
    let entries = [
        NativeEntry::Arity0(record0),
        NativeEntry::Arity1(record1),
        NativeEntry::Arity2(record2),
        NativeEntry::Arity3(record3),
        NativeEntry::Arity4(record4),
        NativeEntry::Arity5(record5),
        NativeEntry::Arity6(record6),
        NativeEntry::Arity7(record7),
        NativeEntry::Arity8(record8),
        NativeEntry::Arity9(record9),
        NativeEntry::Arity10(record10),
    ];
    let closure = Closure::new(flags).named("recording");
    for entry in entries {
        closure.set_entry(entry).expect("fresh closure slot");
    }
    Object::closure(closure)
}
