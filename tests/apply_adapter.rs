//! Applying callables to runtime sequences.

mod common;

use calltron::*;
use common::*;

const LENGTHS: [usize; 6] = [0, 1, 5, 10, 11, 14];

fn descriptors() -> Vec<ArityFlags> {
    vec![
        ArityFlags::fixed(10),
        ArityFlags::variadic(0, false),
        ArityFlags::variadic(2, false),
        ArityFlags::variadic(5, true),
        ArityFlags::variadic(10, false),
    ]
}

#[test]
fn test_apply_matches_direct_calls() {
    for flags in descriptors() {
        for f in [Recorder::all(flags), recording_closure(flags)] {
            for len in LENGTHS {
                let items = ints(len);
                let direct = call_n(&f, &items);
                assert_eq!(
                    apply_to(&f, &Object::list(items.clone())),
                    direct,
                    "list flags={} len={}",
                    flags,
                    len
                );
                assert_eq!(
                    apply_to(&f, &Object::vector(items.clone())),
                    direct,
                    "vector flags={} len={}",
                    flags,
                    len
                );
                assert_eq!(apply_iter(&f, items), direct, "iter flags={} len={}", flags, len);
            }
        }
    }
}

#[test]
fn test_apply_overflow_keeps_order() {
    let f = Recorder::all(ArityFlags::variadic(0, false));
    let result = apply_to(&f, &Object::vector(ints(14))).unwrap();
    assert_eq!(result, called(1, vec![Object::list(ints(14))]));

    let f = Recorder::all(ArityFlags::variadic(10, false));
    let result = apply_to(&f, &Object::vector(ints(14))).unwrap();
    let mut expected = ints(9);
    expected.push(Object::list((10..=14).map(int)));
    assert_eq!(result, called(10, expected));
}

#[test]
fn test_apply_reports_total_arity() {
    let f = Recorder::all(ArityFlags::fixed(10));
    let source = (1..).map(int).take(1_000);
    let err = apply_iter(&f, source).unwrap_err();
    assert_eq!(err, CallError::unsupported_arity(1_000, "recorder"));
}

#[test]
fn test_apply_empty_sources() {
    let f = Recorder::all(ArityFlags::fixed(0));
    assert_eq!(apply_to(&f, &Object::Nil), Ok(called(0, vec![])));
    assert_eq!(apply_to(&f, &Object::list([])), Ok(called(0, vec![])));
}

#[test]
fn test_apply_map_entries() {
    let f = Recorder::all(ArityFlags::fixed(2));
    let map = Object::map([(Object::keyword("a"), int(1))]);
    assert_eq!(
        apply_to(&f, &map),
        Ok(called(
            1,
            vec![Object::vector([Object::keyword("a"), int(1)])]
        ))
    );
}

#[test]
fn test_apply_lookup_and_errors() {
    let map = Object::map([(Object::keyword("a"), int(1))]);
    assert_eq!(
        apply_to(&map, &Object::vector([Object::keyword("a")])),
        Ok(int(1))
    );

    let f = Recorder::all(ArityFlags::fixed(1));
    assert_eq!(
        apply_to(&f, &Object::from("abc")),
        Err(CallError::NotSeqable("\"abc\"".into()))
    );
}
