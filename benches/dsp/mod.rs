//! Benchmarks for low-level primitives.

mod filter;
mod mix;
mod store;

pub use filter::bench_filter;
pub use mix::bench_mix;
pub use store::bench_store;
