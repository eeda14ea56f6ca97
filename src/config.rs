//! Looper configuration.
//!
//! Everything here is fixed for the lifetime of a [`Looper`](crate::Looper):
//! the store is allocated from these values and the fade windows are derived
//! from them once. Per-block controls live in
//! [`LooperInputs`](crate::LooperInputs) instead.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{LooperError, Result},
    MIN_TIME,
};

/// Seconds of audio per channel. 262144 frames at 48 kHz.
pub const DEFAULT_BUFFER_SECONDS: f32 = 5.46;
/// Record on/off and loop edit crossfade length (10 ms).
pub const DEFAULT_FADE_SECONDS: f32 = 0.01;
/// Fade-out and fade-in length around a clock re-trigger (5 ms each).
pub const DEFAULT_TRIGGER_FADE_SECONDS: f32 = 0.005;
/// Shortest loop: one period of C3 (130.813 Hz).
pub const DEFAULT_MIN_LOOP_SECONDS: f32 = 1.0 / 130.813;
/// Peak amplitude of the noise the store is seeded with (-60 dBFS).
pub const DEFAULT_NOISE_LEVEL: f32 = 0.001;
/// Blocks without a clock tick before the looper falls back to free running.
pub const DEFAULT_CLOCK_TIMEOUT_SECONDS: f32 = 2.0;
/// Number of slices an incremental clear is spread over.
pub const CLEAR_BLOCKS: usize = 128;

/// How [`Looper`](crate::Looper) zeroes its buffer on a clear request.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClearMode {
    /// Zero the whole store in the block the request arrives.
    Immediate,
    /// Zero one of [`CLEAR_BLOCKS`] slices per block, output muted until done.
    #[default]
    Incremental,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LooperConfig {
    pub sample_rate: f32,
    pub buffer_seconds: f32,
    pub fade_seconds: f32,
    pub trigger_fade_seconds: f32,
    pub min_loop_seconds: f32,
    pub noise_level: f32,
    pub noise_seed: u64,
    pub clear_mode: ClearMode,
    /// Blocks over which speed/start/length glide to a new control value.
    /// 1 follows the control layer directly.
    pub interpolation_blocks: u32,
    pub retrigger_on_clock: bool,
    pub clock_timeout_seconds: f32,
}

impl Default for LooperConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            buffer_seconds: DEFAULT_BUFFER_SECONDS,
            fade_seconds: DEFAULT_FADE_SECONDS,
            trigger_fade_seconds: DEFAULT_TRIGGER_FADE_SECONDS,
            min_loop_seconds: DEFAULT_MIN_LOOP_SECONDS,
            noise_level: DEFAULT_NOISE_LEVEL,
            noise_seed: 0x5eed,
            clear_mode: ClearMode::Incremental,
            interpolation_blocks: 1,
            retrigger_on_clock: true,
            clock_timeout_seconds: DEFAULT_CLOCK_TIMEOUT_SECONDS,
        }
    }
}

impl LooperConfig {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }

    pub fn with_buffer_seconds(mut self, seconds: f32) -> Self {
        self.buffer_seconds = seconds;
        self
    }

    pub fn with_fade_seconds(mut self, seconds: f32) -> Self {
        self.fade_seconds = seconds;
        self
    }

    pub fn with_trigger_fade_seconds(mut self, seconds: f32) -> Self {
        self.trigger_fade_seconds = seconds;
        self
    }

    pub fn with_min_loop_seconds(mut self, seconds: f32) -> Self {
        self.min_loop_seconds = seconds;
        self
    }

    pub fn with_noise(mut self, level: f32, seed: u64) -> Self {
        self.noise_level = level;
        self.noise_seed = seed;
        self
    }

    pub fn with_clear_mode(mut self, mode: ClearMode) -> Self {
        self.clear_mode = mode;
        self
    }

    pub fn with_interpolation_blocks(mut self, blocks: u32) -> Self {
        self.interpolation_blocks = blocks;
        self
    }

    pub fn with_retrigger_on_clock(mut self, enabled: bool) -> Self {
        self.retrigger_on_clock = enabled;
        self
    }

    pub fn with_clock_timeout_seconds(mut self, seconds: f32) -> Self {
        self.clock_timeout_seconds = seconds;
        self
    }

    /// Frames per channel in the sample store.
    pub fn capacity(&self) -> usize {
        self.samples(self.buffer_seconds) as usize
    }

    /// Record and loop-edit crossfade length in samples.
    pub fn fade_samples(&self) -> u32 {
        self.samples(self.fade_seconds) as u32
    }

    pub fn trigger_fade_samples(&self) -> u32 {
        self.samples(self.trigger_fade_seconds) as u32
    }

    pub fn min_loop_samples(&self) -> u32 {
        self.samples(self.min_loop_seconds) as u32
    }

    pub fn clock_timeout_samples(&self) -> usize {
        self.samples(self.clock_timeout_seconds) as usize
    }

    #[inline]
    fn samples(&self, seconds: f32) -> f32 {
        (seconds.max(MIN_TIME) * self.sample_rate).round().max(1.0)
    }

    /// Check that these settings describe a looper that can run.
    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(LooperError::InvalidSampleRate(self.sample_rate));
        }

        let durations = [
            ("buffer", self.buffer_seconds),
            ("fade", self.fade_seconds),
            ("trigger fade", self.trigger_fade_seconds),
            ("minimum loop", self.min_loop_seconds),
            ("clock timeout", self.clock_timeout_seconds),
        ];
        for (name, value) in durations {
            if !value.is_finite() || value <= 0.0 {
                return Err(LooperError::InvalidDuration { name, value });
            }
        }

        if !(0.0..=1.0).contains(&self.noise_level) {
            return Err(LooperError::InvalidNoiseLevel(self.noise_level));
        }

        if self.interpolation_blocks == 0 {
            return Err(LooperError::ZeroInterpolationBlocks);
        }

        let required = self.min_loop_samples() as usize + 2 * self.fade_samples() as usize;
        let capacity = self.capacity();
        if capacity < required {
            return Err(LooperError::BufferTooShort { capacity, required });
        }

        Ok(())
    }
}
