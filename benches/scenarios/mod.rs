//! Whole-looper benchmarks.
//!
//! These drive `Looper::process` the way a host would, one block at a time
//! with the controls held steady.

mod looper;

pub use looper::bench_looper;
