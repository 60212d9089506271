//! Benchmarks for statevector execution and shot sampling
//!
//! Run with: cargo bench -p qsub-sim

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qsub_ir::{Circuit, CircuitBuilder, ClbitId, QubitId};
use qsub_sim::{Sampler, Simulator};

/// A Toffoli/CNOT ladder touching every qubit, measured in full.
fn ladder(num_qubits: u32) -> Circuit {
    let mut builder = CircuitBuilder::with_size("ladder", num_qubits, num_qubits);
    builder.x(QubitId(0)).unwrap().x(QubitId(1)).unwrap();
    for i in 2..num_qubits {
        builder
            .ccx(QubitId(i - 2), QubitId(i - 1), QubitId(i))
            .unwrap()
            .cx(QubitId(i), QubitId(i - 1))
            .unwrap()
            .cz(QubitId(i - 2), QubitId(i))
            .unwrap();
    }
    for i in 0..num_qubits {
        builder.measure(QubitId(i), ClbitId(i)).unwrap();
    }
    builder.build()
}

fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulator_run");
    let sim = Simulator::new();

    for num_qubits in &[4, 8, 12, 16] {
        let circuit = ladder(*num_qubits);
        group.bench_with_input(
            BenchmarkId::new("ladder", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| sim.run(black_box(circuit)).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampler");
    let dist = Simulator::new().run(&ladder(10)).unwrap();
    let sampler = Sampler::new().with_seed(1);

    for shots in &[1_024_u64, 16_384, 262_144] {
        group.bench_with_input(BenchmarkId::new("shots", shots), shots, |b, &shots| {
            b.iter(|| sampler.sample(black_box(&dist), black_box(shots)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_run, bench_sample);
criterion_main!(benches);
