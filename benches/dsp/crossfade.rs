//! Benchmarks for the dual-cursor crossfade mixer.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use eyelight::dsp::CrossfadeMixer;
use eyelight::pool::BlockPool;
use eyelight::{BLOCK_COUNT, BLOCK_LEN};
use rand::{rngs::SmallRng, SeedableRng};

use crate::BLOCK_SIZES;

pub fn bench_crossfade(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/crossfade");
    let pool = BlockPool::generate(BLOCK_COUNT, BLOCK_LEN, &mut SmallRng::seed_from_u64(1))
        .expect("block pool");

    for &size in BLOCK_SIZES {
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        // Production-sized pool: reselection after nearly every period
        let mut mixer = CrossfadeMixer::new(pool.clone(), SmallRng::seed_from_u64(2));
        group.bench_with_input(BenchmarkId::new("fill", size), &size, |b, _| {
            b.iter(|| {
                mixer.fill(black_box(&mut left), black_box(&mut right));
            })
        });

        // Single-sample periods: one batch and one weight pair per sample
        let mut mixer = CrossfadeMixer::new(pool.clone(), SmallRng::seed_from_u64(3));
        group.bench_with_input(BenchmarkId::new("fill_per_sample", size), &size, |b, _| {
            b.iter(|| {
                for (l, r) in left.chunks_mut(1).zip(right.chunks_mut(1)) {
                    mixer.fill(black_box(l), black_box(r));
                }
            })
        });
    }

    group.finish();
}
