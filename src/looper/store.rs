//! Circular stereo sample store.

/*
Layout
======

The store holds `capacity` frames of stereo audio as one interleaved vector:

    index:   0    1    2    3    4    5   ...  2N-2  2N-1
    sample:  L0   R0   L1   R1   L2   R2  ...  LN-1  RN-1

Every position handed to the store is reduced modulo `capacity` first, so
callers can pass any signed integer or fractional position and never touch
memory outside the vector. The write heads, the playback phase and the clock
re-trigger tail all rely on this.

Reads are fractional. The base frame and its neighbour are chosen in the
playback direction, so a backward read interpolates between a frame and the
one *before* it:

    forward   base = floor(p)   frac = p - base    neighbour = base + 1
    backward  base = ceil(p)    frac = base - p    neighbour = base - 1

Both give the same value at any position; the direction only decides which
side of the interval counts as "here".

A fresh store is seeded with very quiet noise instead of silence so that an
empty loop played back at speed sounds like tape hiss rather than nothing.
*/

use rand::{rngs::SmallRng, Rng, SeedableRng};

use super::speed::Direction;
use crate::config::CLEAR_BLOCKS;
use crate::dsp::mix::cheap_equal_power_crossfade;

pub const LEFT: usize = 0;
pub const RIGHT: usize = 1;
const CHANNELS: usize = 2;

/// One stereo sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Frame {
    pub left: f32,
    pub right: f32,
}

impl Frame {
    pub const SILENT: Frame = Frame {
        left: 0.0,
        right: 0.0,
    };

    pub fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    #[inline]
    pub fn scale(self, gain: f32) -> Self {
        Self {
            left: self.left * gain,
            right: self.right * gain,
        }
    }

    /// Equal-power blend from `self` towards `other`.
    #[inline]
    pub fn blend(self, other: Frame, position: f32) -> Self {
        Self {
            left: cheap_equal_power_crossfade(self.left, other.left, position),
            right: cheap_equal_power_crossfade(self.right, other.right, position),
        }
    }
}

pub struct SampleStore {
    data: Vec<f32>,
    capacity: usize,
    clear_block: usize,
}

impl SampleStore {
    /// A silent store of `capacity` frames. A zero capacity is raised to one
    /// frame so wrapping stays defined.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: vec![0.0; capacity * CHANNELS],
            capacity,
            clear_block: 0,
        }
    }

    /// A store seeded with uniform noise in `[-level, level]`. The same seed
    /// always produces the same content.
    pub fn with_noise(capacity: usize, level: f32, seed: u64) -> Self {
        let mut store = Self::new(capacity);
        store.seed_noise(level, seed);
        store
    }

    pub fn seed_noise(&mut self, level: f32, seed: u64) {
        let mut rng = SmallRng::seed_from_u64(seed);
        for sample in self.data.iter_mut() {
            *sample = (rng.gen::<f32>() * 2.0 - 1.0) * level;
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Reduce any signed position to a frame index in `[0, capacity)`.
    #[inline]
    pub fn wrap(&self, position: i64) -> usize {
        position.rem_euclid(self.capacity as i64) as usize
    }

    #[inline]
    fn offset(&self, channel: usize, position: i64) -> usize {
        self.wrap(position) * CHANNELS + (channel & 1)
    }

    #[inline]
    pub fn sample(&self, channel: usize, position: i64) -> f32 {
        self.data[self.offset(channel, position)]
    }

    #[inline]
    pub fn set_sample(&mut self, channel: usize, position: i64, value: f32) {
        let offset = self.offset(channel, position);
        self.data[offset] = value;
    }

    #[inline]
    pub fn frame(&self, position: i64) -> Frame {
        let offset = self.wrap(position) * CHANNELS;
        Frame {
            left: self.data[offset],
            right: self.data[offset + 1],
        }
    }

    /// Store both channels at `position`. Values are not clamped.
    #[inline]
    pub fn write(&mut self, position: i64, left: f32, right: f32) {
        let offset = self.wrap(position) * CHANNELS;
        self.data[offset] = left;
        self.data[offset + 1] = right;
    }

    /// Linearly interpolated read at a fractional position.
    #[inline]
    pub fn read(&self, position: f32, direction: Direction) -> Frame {
        let (base, frac, step) = match direction {
            Direction::Backward => {
                let base = position.ceil();
                (base, base - position, -1)
            }
            Direction::Forward | Direction::Stalled => {
                let base = position.floor();
                (base, position - base, 1)
            }
        };
        let frac = if frac.is_finite() { frac } else { 0.0 };

        // `as i64` saturates far out, so wrap before taking the neighbour
        let base = self.wrap(base as i64) as i64;
        let a = self.frame(base);
        let b = self.frame(base + step);
        Frame {
            left: a.left + (b.left - a.left) * frac,
            right: a.right + (b.right - a.right) * frac,
        }
    }

    /// Zero the whole store at once.
    pub fn clear(&mut self) {
        self.data.fill(0.0);
        self.clear_block = 0;
    }

    /// Rewind an incremental clear to the first slice.
    pub fn restart_clear(&mut self) {
        self.clear_block = 0;
    }

    /// Zero the next of [`CLEAR_BLOCKS`] slices. Returns true once the last
    /// slice has been cleared.
    pub fn clear_step(&mut self) -> bool {
        let len = self.data.len();
        let begin = len * self.clear_block / CLEAR_BLOCKS;
        let end = len * (self.clear_block + 1) / CLEAR_BLOCKS;
        self.data[begin..end].fill(0.0);

        self.clear_block += 1;
        if self.clear_block >= CLEAR_BLOCKS {
            self.clear_block = 0;
            true
        } else {
            false
        }
    }

    pub fn is_silent(&self) -> bool {
        self.data.iter().all(|&x| x == 0.0)
    }
}
