//! Benchmarks for crossfade laws.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tapeloop_dsp::dsp::mix::{cheap_equal_power_crossfade, linear_crossfade};

use crate::BLOCK_SIZES;

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/mix");

    for &size in BLOCK_SIZES {
        let a: Vec<f32> = (0..size).map(|i| (i as f32 * 0.01).sin()).collect();
        let b: Vec<f32> = (0..size).map(|i| (i as f32 * 0.013).cos()).collect();
        let mut out = vec![0.0f32; size];

        group.bench_with_input(BenchmarkId::new("linear", size), &size, |bench, _| {
            bench.iter(|| {
                for i in 0..size {
                    let position = i as f32 / size as f32;
                    out[i] = linear_crossfade(a[i], b[i], black_box(position));
                }
                black_box(&out);
            })
        });

        group.bench_with_input(BenchmarkId::new("equal_power", size), &size, |bench, _| {
            bench.iter(|| {
                for i in 0..size {
                    let position = i as f32 / size as f32;
                    out[i] = cheap_equal_power_crossfade(a[i], b[i], black_box(position));
                }
                black_box(&out);
            })
        });
    }

    group.finish();
}
