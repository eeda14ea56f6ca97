//! Benchmarks for the state-variable and DJ filters.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tapeloop_dsp::dsp::{dj_filter::DjFilter, filter::SVFilter};

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Sawtooth-like ramp
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        let mut filter = SVFilter::lowpass(1000.0, 48_000.0);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("svf_lowpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer));
            })
        });

        // DJ filter on each side of the bypass zone
        for (name, value) in [("dj_lowpass", 0.2), ("dj_highpass", 0.8)] {
            let mut dj = DjFilter::new(48_000.0);
            dj.set(value);
            let mut left = input.clone();
            let mut right = input.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for (l, r) in left.iter_mut().zip(right.iter_mut()) {
                        let (fl, fr) = dj.process(*l, *r);
                        *l = black_box(fl);
                        *r = black_box(fr);
                    }
                })
            });
        }
    }

    group.finish();
}
