//! Resolution properties of the per-arity dispatcher.
//!
//! Every test runs the same descriptor grid against a Rust [`Recorder`] and,
//! where noted, against a native [`recording_closure`] so both callable
//! flavours are held to the same rules.

mod common;

use calltron::*;
use common::*;

/// `[1..=k] ++ [tail]`
fn with_tail(k: usize, tail: Object) -> Vec<Object> {
    let mut args = ints(k);
    args.push(tail);
    args
}

fn range(from: i64, to: i64) -> Object {
    Object::list((from..=to).map(int))
}

// =============================================================================
// Descriptor codec
// =============================================================================

#[test]
fn test_dispatch_mask_recovers_fixed_arity() {
    for h in 0..=10u8 {
        for ambiguous in [false, true] {
            let flags = ArityFlags::new(h, true, ambiguous).unwrap();
            assert_eq!(flags.dispatch_mask(), h);
        }
    }
}

// =============================================================================
// Non-variadic callables
// =============================================================================

#[test]
fn test_fixed_callable_reaches_fixed_entry_or_fails() {
    for h in 0..=10usize {
        let implemented: Vec<usize> = (0..=h).collect();
        let f = Recorder::only(ArityFlags::fixed(h as u8), &implemented);
        for n in 0..=10usize {
            let result = call_n(&f, &ints(n));
            if n <= h {
                assert_eq!(result, Ok(called(n as i64, ints(n))), "h={} n={}", h, n);
            } else {
                assert_eq!(
                    result,
                    Err(CallError::invalid_arity(n, "recorder")),
                    "h={} n={}",
                    h,
                    n
                );
            }
        }
    }
}

#[test]
fn test_fixed_callable_never_packs_rest() {
    for flags in [ArityFlags::fixed(0), ArityFlags::fixed(3), ArityFlags::fixed(10)] {
        for f in [Recorder::all(flags), recording_closure(flags)] {
            for n in 0..=10usize {
                assert_eq!(call_n(&f, &ints(n)), Ok(called(n as i64, ints(n))));
            }
        }
    }
}

#[test]
fn test_fixed_arity_three_called_with_five_args() {
    let f = Recorder::only(ArityFlags::fixed(3), &[0, 1, 2, 3]);
    let err = dynamic_call5(&f, int(1), int(2), int(3), int(4), int(5)).unwrap_err();
    assert_eq!(err, CallError::InvalidArity(5, "recorder".into()));
    assert_eq!(err.to_string(), "invalid call with 5 args to: recorder");
}

// =============================================================================
// Variadic, not ambiguous
// =============================================================================

#[test]
fn test_exact_boundary_passes_nil_rest() {
    for k in 0..=9usize {
        let flags = ArityFlags::variadic(k as u8, false);
        for f in [Recorder::all(flags), recording_closure(flags)] {
            assert_eq!(
                call_n(&f, &ints(k)),
                Ok(called(k as i64 + 1, with_tail(k, Object::Nil))),
                "k={}",
                k
            );
        }
    }
}

#[test]
fn test_three_past_boundary_packs_three() {
    for k in 0..=9usize {
        let flags = ArityFlags::variadic(k as u8, false);
        for f in [Recorder::all(flags), recording_closure(flags)] {
            let expected = called(
                k as i64 + 1,
                with_tail(k, range(k as i64 + 1, k as i64 + 3)),
            );
            assert_eq!(call_n(&f, &ints(k + 3)), Ok(expected), "k={}", k);
        }
    }
}

#[test]
fn test_below_boundary_uses_fixed_entries() {
    let flags = ArityFlags::variadic(4, false);
    let f = Recorder::all(flags);
    for n in 0..4usize {
        assert_eq!(call_n(&f, &ints(n)), Ok(called(n as i64, ints(n))));
    }
}

#[test]
fn test_variadic_from_one_packs_trailing_args() {
    let f = Recorder::only(ArityFlags::variadic(1, false), &[2]);
    let (a1, a2, a3) = (Object::from("a1"), Object::from("a2"), Object::from("a3"));

    let result = dynamic_call3(&f, a1.clone(), a2.clone(), a3.clone()).unwrap();
    assert_eq!(result, called(2, vec![a1, Object::list([a2, a3])]));
}

#[test]
fn test_variadic_from_ten_with_ten_args() {
    let flags = ArityFlags::variadic(10, false);
    for f in [Recorder::all(flags), recording_closure(flags)] {
        assert_eq!(
            call_n(&f, &ints(10)),
            Ok(called(10, with_tail(9, Object::list([int(10)]))))
        );
    }
}

#[test]
fn test_missing_variadic_entry_fails() {
    let f = Recorder::only(ArityFlags::variadic(2, false), &[0, 1, 2]);
    assert_eq!(
        dynamic_call3(&f, int(1), int(2), int(3)),
        Err(CallError::invalid_arity(3, "recorder"))
    );
}

// =============================================================================
// Variadic, ambiguous
// =============================================================================

#[test]
fn test_ambiguous_boundary_prefers_fixed() {
    for k in 0..=9usize {
        let flags = ArityFlags::variadic(k as u8, true);
        for f in [Recorder::all(flags), recording_closure(flags)] {
            assert_eq!(call_n(&f, &ints(k)), Ok(called(k as i64, ints(k))), "k={}", k);
            assert_eq!(
                call_n(&f, &ints(k + 1)),
                Ok(called(k as i64 + 1, with_tail(k, range(k as i64 + 1, k as i64 + 1)))),
                "k={}",
                k
            );
        }
    }
}

#[test]
fn test_ambiguous_two_called_with_two() {
    let f = Recorder::only(ArityFlags::variadic(2, true), &[2, 3]);
    let (a1, a2) = (Object::keyword("a1"), Object::keyword("a2"));
    assert_eq!(
        dynamic_call2(&f, a1.clone(), a2.clone()),
        Ok(called(2, vec![a1, a2]))
    );
}

// =============================================================================
// Ten plus rest
// =============================================================================

#[test]
fn test_rest_overload_with_empty_rest_matches_ten_args() {
    for flags in [
        ArityFlags::fixed(10),
        ArityFlags::variadic(3, false),
        ArityFlags::variadic(10, false),
        ArityFlags::variadic(10, true),
    ] {
        let f = Recorder::all(flags);
        let args = ints(10);
        let a = |i: usize| args[i].clone();
        let via_rest = dynamic_call_rest(
            &f,
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
            List::empty(),
        );
        assert_eq!(via_rest, call_n(&f, &args), "flags={}", flags);
    }
}

#[test]
fn test_rest_overload_packs_positional_tail_then_rest() {
    let f = Recorder::all(ArityFlags::variadic(3, false));
    assert_eq!(
        call_n(&f, &ints(14)),
        Ok(called(4, with_tail(3, range(4, 14))))
    );

    let f = Recorder::all(ArityFlags::variadic(0, false));
    assert_eq!(call_n(&f, &ints(12)), Ok(called(1, vec![range(1, 12)])));
}

#[test]
fn test_rest_overload_at_ten() {
    let f = Recorder::all(ArityFlags::variadic(10, false));
    assert_eq!(
        call_n(&f, &ints(13)),
        Ok(called(10, with_tail(9, range(10, 13))))
    );

    let f = Recorder::all(ArityFlags::variadic(10, true));
    assert_eq!(
        call_n(&f, &ints(13)),
        Err(CallError::unsupported_arity(13, "recorder"))
    );
}

#[test]
fn test_rest_overload_without_variadic_tail() {
    let f = Recorder::all(ArityFlags::fixed(10));
    let err = call_n(&f, &ints(11)).unwrap_err();
    assert_eq!(err, CallError::unsupported_arity(11, "recorder"));
    assert_eq!(err.to_string(), "unsupported arity: 11 for recorder");

    assert_eq!(
        call_n(&int(1), &ints(11)),
        Err(CallError::invalid_arity(11, "1"))
    );
}

#[test]
fn test_slice_form_matches_overloads() {
    let flags = ArityFlags::variadic(2, false);
    let f = recording_closure(flags);
    for n in 0..=15usize {
        assert_eq!(dynamic_call(&f, &ints(n)), call_n(&f, &ints(n)), "n={}", n);
    }
}

// =============================================================================
// Sources
// =============================================================================

#[test]
fn test_var_source_rebinding() {
    let ctx = RuntimeContext::default();
    let var = ctx.intern_var("user", "f");
    let source = Object::Var(var.clone());

    var.bind_root(Recorder::all(ArityFlags::fixed(2)));
    assert_eq!(
        dynamic_call2(&source, int(1), int(2)),
        Ok(called(2, ints(2)))
    );

    var.bind_root(Recorder::all(ArityFlags::variadic(0, false)));
    assert_eq!(
        dynamic_call2(&source, int(1), int(2)),
        Ok(called(1, vec![range(1, 2)]))
    );
}

#[test]
fn test_native_failure_propagates() {
    unsafe extern "C" fn fail(_ctx: *mut std::ffi::c_void) -> *mut Object {
        std::ptr::null_mut()
    }
    let f = Object::closure(
        Closure::new(ArityFlags::fixed(0))
            .named("fails")
            .with_entry(NativeEntry::Arity0(fail))
            .unwrap(),
    );
    assert_eq!(
        dynamic_call0(&f),
        Err(CallError::NativeFailure(0, "#<closure fails>".into()))
    );
}
