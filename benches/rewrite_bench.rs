//! Benchmark for the per-call overhead of each rewrite layer.
//!
//! Compares a direct call of the target against the same call through the
//! defaults, options and builder layers, alone and composed.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use serde_json::json;
use sig_rewrite::{
    Arguments, Defaults, Function, Value, WrapConfig, arguments, compose, to_builder,
};
use std::hint::black_box;

fn target(arity: usize) -> Function<usize> {
    let names: Vec<String> = (0..arity).map(|index| format!("parameter_{index}")).collect();
    Function::new(names, |arguments: Arguments| {
        arguments.iter().filter(|slot| slot.is_some()).count()
    })
}

// =============================================================================
// Single Layer Benchmarks
// =============================================================================

fn benchmark_layers(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("single_layer");

    let direct = target(3);
    group.bench_function("direct", |bencher| {
        bencher.iter(|| black_box(direct.call(arguments![1, 2, 3])));
    });

    let defaults = compose(
        target(3),
        &WrapConfig::new().defaults(Defaults::new().set(1, 2).set(2, 3)),
    )
    .ok()
    .and_then(|wrapped| wrapped.into_function())
    .expect("defaults config is valid");
    group.bench_function("defaults", |bencher| {
        bencher.iter(|| black_box(defaults.call(arguments![1])));
    });

    let options = compose(target(3), &WrapConfig::new().to_options(true))
        .ok()
        .and_then(|wrapped| wrapped.into_function())
        .expect("options config is valid");
    let object = json!({"parameter_0": 1, "parameter_1": 2, "parameter_2": 3});
    group.bench_function("options", |bencher| {
        bencher.iter(|| black_box(options.call_with(object.clone())));
    });

    let builder = to_builder(target(3), None).expect("default builder shape is valid");
    group.bench_function("builder", |bencher| {
        bencher.iter(|| {
            let result = builder
                .call(Arguments::new())
                .set("with_parameter_0", 1)
                .and_then(|builder| builder.set("with_parameter_2", 3))
                .map(|builder| builder.build());
            black_box(result)
        });
    });

    group.finish();
}

// =============================================================================
// Arity Benchmarks
// =============================================================================

fn benchmark_options_arity(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("options_arity");

    for arity in [1, 4, 16] {
        let options = compose(target(arity), &WrapConfig::new().to_options(true))
            .ok()
            .and_then(|wrapped| wrapped.into_function())
            .expect("options config is valid");
        let object: serde_json::Map<String, Value> = (0..arity)
            .map(|index| (format!("parameter_{index}"), json!(index)))
            .collect();
        let object = Value::Object(object);

        group.bench_with_input(BenchmarkId::new("arity", arity), &object, |bencher, object| {
            bencher.iter(|| black_box(options.call_with(object.clone())));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_layers, benchmark_options_arity);
criterion_main!(benches);
