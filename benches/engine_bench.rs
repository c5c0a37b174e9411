//! Benchmarks for circuit compilation and full-window runs
//!
//! Run with: cargo bench --bench engine_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tickwire::engine::{CompiledCircuit, DEFAULT_WINDOW_TICKS};
use tickwire::graph::{CircuitGraph, PortRef};
use tickwire::registry::NodeRegistry;
use tickwire::stimulus::{Stimuli, Waveform};

/// Chain of `stages` sections, each add → delay(3) → mix back into the add
fn build_chain(registry: &NodeRegistry, stages: usize) -> (CircuitGraph, Stimuli) {
    let mut graph = CircuitGraph::new();
    let input = graph.add_node(registry, "input").unwrap();
    let mut previous = input;

    for _ in 0..stages {
        let add = graph.add_node_with(registry, "add", &[("amount", 3.0)]).unwrap();
        let delay = graph
            .add_node_with(registry, "delay", &[("subdivisions", 3.0)])
            .unwrap();
        let mix = graph.add_node_with(registry, "mix", &[("mode", 2.0)]).unwrap();
        graph.connect(PortRef::new(previous, 0), PortRef::new(mix, 0));
        graph.connect(PortRef::new(delay, 0), PortRef::new(mix, 1));
        graph.connect(PortRef::new(mix, 0), PortRef::new(add, 0));
        graph.connect(PortRef::new(add, 0), PortRef::new(delay, 0));
        previous = add;
    }

    let mut stimuli = Stimuli::new();
    stimuli.insert(
        input,
        Waveform::Samples((0..32).map(|v| (v * 13 % 201) as f32 - 100.0).collect()),
    );
    (graph, stimuli)
}

fn bench_compile(c: &mut Criterion) {
    let registry = NodeRegistry::builtin();
    let mut group = c.benchmark_group("compile");

    for stages in [4, 32, 128] {
        let (graph, _) = build_chain(&registry, stages);
        group.bench_with_input(BenchmarkId::from_parameter(stages), &graph, |b, graph| {
            b.iter(|| CompiledCircuit::compile(black_box(graph), &registry).unwrap())
        });
    }

    group.finish();
}

fn bench_full_window(c: &mut Criterion) {
    let registry = NodeRegistry::builtin();
    let mut group = c.benchmark_group("run_256_ticks");

    for stages in [4, 32, 128] {
        let (graph, stimuli) = build_chain(&registry, stages);
        let circuit = CompiledCircuit::compile(&graph, &registry).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(stages), &stimuli, |b, stimuli| {
            b.iter(|| circuit.run(black_box(stimuli), DEFAULT_WINDOW_TICKS).unwrap())
        });
    }

    group.finish();
}

fn bench_digest(c: &mut Criterion) {
    let registry = NodeRegistry::builtin();
    let (graph, stimuli) = build_chain(&registry, 32);
    let circuit = CompiledCircuit::compile(&graph, &registry).unwrap();
    let results = circuit.run(&stimuli, DEFAULT_WINDOW_TICKS).unwrap();

    c.bench_function("digest_32_stages", |b| b.iter(|| black_box(&results).digest()));
}

criterion_group!(benches, bench_compile, bench_full_window, bench_digest);
criterion_main!(benches);
