//! Benchmarks for sample store access.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tapeloop_dsp::looper::{Direction, SampleStore, WriteHead};

use crate::BLOCK_SIZES;

const CAPACITY: usize = 262_144;

pub fn bench_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/store");
    let mut store = SampleStore::with_noise(CAPACITY, 0.001, 1);

    for &size in BLOCK_SIZES {
        // Varispeed read that crosses the wrap point
        group.bench_with_input(BenchmarkId::new("read_1.37x", size), &size, |b, _| {
            let mut position = CAPACITY as f32 - 100.0;
            b.iter(|| {
                for _ in 0..size {
                    black_box(store.read(position, Direction::Forward));
                    position += 1.37;
                }
                position = CAPACITY as f32 - 100.0;
            })
        });

        group.bench_with_input(BenchmarkId::new("read_backward", size), &size, |b, _| {
            b.iter(|| {
                for i in 0..size {
                    black_box(store.read(1_000.5 - i as f32 * 0.5, Direction::Backward));
                }
            })
        });

        let mut head = WriteHead::new(480);
        head.start();
        group.bench_with_input(BenchmarkId::new("head_write", size), &size, |b, _| {
            b.iter(|| {
                for i in 0..size as i64 {
                    head.write(&mut store, 0, black_box(i), 0.5);
                }
            })
        });
    }

    group.finish();
}
