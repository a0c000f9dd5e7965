use std::ffi::c_void;

use calltron::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

unsafe extern "C" fn first(_ctx: *mut c_void, a: *const Object) -> *mut Object {
    (*a).clone().into_raw()
}

unsafe extern "C" fn first_of_rest(
    _ctx: *mut c_void,
    a: *const Object,
    _rest: *const Object,
) -> *mut Object {
    (*a).clone().into_raw()
}

/// `(fn ([x] x) ([x & rest] x))` with the given descriptor
fn closure(flags: ArityFlags) -> Object {
    let closure = Closure::new(flags)
        .with_entry(NativeEntry::Arity1(first))
        .and_then(|c| c.with_entry(NativeEntry::Arity2(first_of_rest)))
        .expect("fresh closure");
    Object::closure(closure)
}

/// Fixed entry vs. boundary vs. packing, all through one argument count
fn bench_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("dynamic_call/resolution");

    let fixed = closure(ArityFlags::fixed(1));
    group.bench_function("fixed", |b| {
        b.iter(|| dynamic_call1(black_box(&fixed), black_box(Object::Integer(1))))
    });

    let boundary = closure(ArityFlags::variadic(1, false));
    group.bench_function("variadic_boundary", |b| {
        b.iter(|| dynamic_call1(black_box(&boundary), black_box(Object::Integer(1))))
    });

    let ambiguous = closure(ArityFlags::variadic(1, true));
    group.bench_function("ambiguous_boundary", |b| {
        b.iter(|| dynamic_call1(black_box(&ambiguous), black_box(Object::Integer(1))))
    });

    group.finish();
}

/// Cost of packing as the rest grows
fn bench_packing(c: &mut Criterion) {
    let mut group = c.benchmark_group("dynamic_call/packing");
    let f = closure(ArityFlags::variadic(1, false));

    for n in [2usize, 5, 10, 16, 64] {
        let args: Vec<Object> = (0..n as i64).map(Object::Integer).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &args, |b, args| {
            b.iter(|| dynamic_call(black_box(&f), black_box(args)))
        });
    }

    group.finish();
}

/// Var deref and lookup invocables
fn bench_sources(c: &mut Criterion) {
    let mut group = c.benchmark_group("dynamic_call/sources");

    let var = Object::Var(std::sync::Arc::new(Var::with_root(
        "bench",
        "f",
        closure(ArityFlags::fixed(1)),
    )));
    group.bench_function("var", |b| {
        b.iter(|| dynamic_call1(black_box(&var), black_box(Object::Integer(1))))
    });

    let map = Object::map((0..8).map(|i| (Object::keyword(format!("k{}", i)), Object::Integer(i))));
    let key = Object::keyword("k7");
    group.bench_function("map_lookup", |b| {
        b.iter(|| dynamic_call1(black_box(&map), black_box(key.clone())))
    });

    group.finish();
}

criterion_group!(benches, bench_resolution, bench_packing, bench_sources);
criterion_main!(benches);
