//! Construction-time errors.
//!
//! Nothing on the audio path returns an error: positions wrap, parameters
//! clamp and overlapping edits are deferred. The only things that can go wrong
//! are configurations that cannot produce a working looper at all.

use thiserror::Error;

/// Error type for looper construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LooperError {
    #[error("Invalid sample rate: {0}. Must be finite and positive")]
    InvalidSampleRate(f32),

    #[error("Invalid duration for {name}: {value}s. Must be finite and positive")]
    InvalidDuration { name: &'static str, value: f32 },

    #[error("Invalid noise level: {0}. Must be between 0.0 and 1.0")]
    InvalidNoiseLevel(f32),

    #[error("Interpolation needs at least one block")]
    ZeroInterpolationBlocks,

    #[error("Buffer of {capacity} frames cannot hold {required} frames (minimum loop plus two fades)")]
    BufferTooShort { capacity: usize, required: usize },
}

/// Result alias for looper construction.
pub type Result<T> = std::result::Result<T, LooperError>;
