//! Benchmarks for the layout pipeline.
//!
//! Run with: cargo bench -p qvis-layout

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use qvis_core::{LayoutConfig, Operation};
use qvis_layout::{
    GatePulses, LayoutEngine, SampleRates, Timeline, WaveformMapping, compress, cut_empty_cycles,
    partition_lanes,
};
use std::hint::black_box;

/// A pseudo-random but deterministic circuit of `n` operations over 16
/// qubits, with idle stretches every few cycles.
fn make_circuit(n: usize) -> Vec<Operation> {
    let mut state = 0x2545_f491_u64;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    (0..n)
        .map(|i| {
            let cycle = (i as i64 / 4) * 3;
            let a = (next() % 16) as usize;
            let b = (next() % 16) as usize;
            let op = if i % 3 == 0 {
                Operation::new("x", cycle, 20).qubits([a])
            } else {
                Operation::new("cz", cycle, 40).qubits([a, b])
            };
            op.codewords([(i % 4) as u32])
        })
        .collect()
}

fn make_mapping() -> WaveformMapping {
    let mut mapping = WaveformMapping::new(SampleRates {
        microwave: 1000,
        flux: 1000,
        readout: 500,
    });
    for codeword in 0..4 {
        for qubit in 0..16 {
            mapping.insert(
                codeword,
                qubit,
                GatePulses {
                    microwave: vec![0.1; 32],
                    flux: vec![-0.2; 16],
                    readout: Vec::new(),
                },
            );
        }
    }
    mapping
}

fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/stages");

    for n in [100, 1_000, 10_000] {
        let timeline = Timeline::build(make_circuit(n), 20).expect("valid circuit");

        group.bench_with_input(BenchmarkId::new("build", n), &n, |b, &n| {
            let ops = make_circuit(n);
            b.iter(|| black_box(Timeline::build(ops.clone(), 20)))
        });
        group.bench_with_input(BenchmarkId::new("compress", n), &timeline, |b, t| {
            b.iter(|| black_box(compress(t)))
        });
        group.bench_with_input(BenchmarkId::new("partition", n), &timeline, |b, t| {
            b.iter(|| {
                let mut t = t.clone();
                black_box(partition_lanes(&mut t))
            })
        });
        group.bench_with_input(BenchmarkId::new("cut", n), &timeline, |b, t| {
            b.iter(|| {
                let mut t = t.clone();
                black_box(cut_empty_cycles(&mut t, 2))
            })
        });
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/pipeline");
    let mut config = LayoutConfig::default();
    config.cycles.compress = true;
    let engine = LayoutEngine::new(config);

    for n in [100, 1_000, 10_000] {
        let ops = make_circuit(n);
        group.bench_with_input(BenchmarkId::new("layout", n), &ops, |b, ops| {
            b.iter(|| black_box(engine.layout(ops)))
        });
    }

    group.finish();
}

fn bench_pulse_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/pulse");
    let engine = LayoutEngine::default();
    let mapping = make_mapping();

    for n in [100, 1_000] {
        let ops = make_circuit(n);
        group.bench_with_input(BenchmarkId::new("stitch", n), &ops, |b, ops| {
            b.iter(|| black_box(engine.pulse_layout(ops, &mapping)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_stages, bench_pipeline, bench_pulse_layout);
criterion_main!(benches);
