//! Benchmarks for arithmetic gate synthesis
//!
//! Run with: cargo bench -p qarith-synth

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qarith_ir::BitState;
use qarith_synth::{
    ExponentiatorLayout, Synthesizer, adder_gate, controlled_modular_multiplier_gate,
    modular_exponentiation_gate,
};

/// Benchmark adder construction
fn bench_adder(c: &mut Criterion) {
    let mut group = c.benchmark_group("adder");

    for bits in &[4, 16, 64] {
        group.bench_with_input(BenchmarkId::new("build", bits), bits, |b, &n| {
            b.iter(|| adder_gate(black_box(n)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark multiplier construction
fn bench_multiplier(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiplier");

    for &(a, m, bits) in &[(2u64, 3u64, 2u32), (7, 15, 4), (5, 221, 8)] {
        group.bench_with_input(
            BenchmarkId::new("build", format!("{a}_mod_{m}")),
            &(a, m, bits),
            |b, &(a, m, n)| {
                b.iter(|| controlled_modular_multiplier_gate(black_box(a), black_box(m), n).unwrap());
            },
        );
    }

    group.finish();
}

/// Benchmark exponentiator construction, cold and with a warm cache
fn bench_exponentiator(c: &mut Criterion) {
    let mut group = c.benchmark_group("exponentiator");

    for &(a, m, bits) in &[(7u64, 15u64, 4u32), (5, 221, 8)] {
        group.bench_with_input(
            BenchmarkId::new("cold", format!("{a}_mod_{m}")),
            &(a, m, bits),
            |b, &(a, m, n)| {
                b.iter(|| modular_exponentiation_gate(black_box(a), black_box(m), n, true).unwrap());
            },
        );
    }

    group.bench_function("warm_7_mod_15", |b| {
        let mut synth = Synthesizer::new();
        synth.modular_exponentiation(7, 15, 4, true).unwrap();
        b.iter(|| synth.modular_exponentiation(black_box(7), 15, 4, true).unwrap());
    });

    group.finish();
}

/// Benchmark flattening and basis-state evaluation
fn bench_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluation");
    let gate = modular_exponentiation_gate(7, 15, 4, true).unwrap();
    let layout = ExponentiatorLayout::new(4);

    group.bench_function("flatten_7_mod_15", |b| {
        b.iter(|| black_box(&gate).flatten());
    });

    group.bench_function("num_ops_7_mod_15", |b| {
        b.iter(|| black_box(&gate).num_ops());
    });

    group.bench_function("apply_7_mod_15", |b| {
        b.iter(|| {
            let mut state = BitState::zeros(layout.width());
            state.store(&layout.x, black_box(11)).unwrap();
            state.apply_gate(&gate).unwrap();
            state
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_adder,
    bench_multiplier,
    bench_exponentiator,
    bench_evaluation,
);
criterion_main!(benches);
