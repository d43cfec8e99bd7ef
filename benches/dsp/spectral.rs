//! Benchmarks for noise block synthesis.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use eyelight::dsp::SpectralGenerator;
use rand::{rngs::SmallRng, SeedableRng};

pub fn bench_spectral(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/spectral");
    group.sample_size(20);

    for &len in &[1 << 10, 1 << 13, 1 << 16] {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut generator = SpectralGenerator::new(len).expect("generator");

        group.bench_with_input(BenchmarkId::new("generate", len), &len, |b, _| {
            b.iter(|| black_box(generator.generate(&mut rng).expect("block")))
        });
    }

    group.finish();
}
