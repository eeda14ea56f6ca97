//! Low-level DSP primitives used by the looper.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside the looper struct. They intentionally stay focused on
//! the signal-processing math so the looper can layer on orchestration.

/// Control curves: range maps and quantized lookup tables.
pub mod curve;
/// Low/high-pass morph filter for the record path.
pub mod dj_filter;
/// State-variable filter implementation with multiple responses.
pub mod filter;
/// One-pole envelope follower.
pub mod follower;
/// Linear and equal-power crossfades.
pub mod mix;
/// Block-rate parameter interpolation.
pub mod smooth;
/// Schmitt trigger for gate and clock inputs.
pub mod trigger;

pub use mix::{cheap_equal_power_crossfade, linear_crossfade};
