//! Benchmarks for complete looper blocks.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tapeloop_dsp::{Looper, LooperConfig, LooperInputs};

use crate::BLOCK_SIZES;

fn new_looper() -> Looper {
    match Looper::new(LooperConfig::default()) {
        Ok(looper) => looper,
        Err(err) => panic!("default config rejected: {}", err),
    }
}

pub fn bench_looper(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/looper");

    let scenarios = [
        // Plain playback of the whole buffer
        ("play", LooperInputs::default()),
        // Recording through the filter with feedback
        (
            "record_sos",
            LooperInputs {
                recording: true,
                filter: 0.3,
                sound_on_sound: 0.7,
                ..LooperInputs::default()
            },
        ),
        // Short loop at odd speed: boundary crossfades most of the time
        (
            "short_varispeed",
            LooperInputs {
                speed: -1.37,
                length: 0.05,
                start: 0.4,
                ..LooperInputs::default()
            },
        ),
    ];

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin() * 0.5).collect();
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        for (name, inputs) in scenarios.iter() {
            let mut looper = new_looper();
            group.bench_with_input(BenchmarkId::new(*name, size), &size, |b, _| {
                b.iter(|| {
                    looper.process(
                        black_box(inputs),
                        &input,
                        &input,
                        &mut left,
                        &mut right,
                    );
                })
            });
        }

        // A clock tick every block: trigger fades on top of playback
        let mut looper = new_looper();
        let mut tick = false;
        group.bench_with_input(BenchmarkId::new("clocked", size), &size, |b, _| {
            b.iter(|| {
                tick = !tick;
                let inputs = LooperInputs {
                    clock: if tick { 1.0 } else { 0.0 },
                    ..LooperInputs::default()
                };
                looper.process(&inputs, &input, &input, &mut left, &mut right);
            })
        });
    }

    group.finish();
}
