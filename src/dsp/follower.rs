//! One-pole envelope follower.
//!
//! Tracks the rectified level of a signal with an exponential moving average:
//!
//! ```text
//! y[n] = lambda * y[n-1] + (1 - lambda) * |x[n]|
//! ```
//!
//! In the record path the follower drives a gentle ducking of loud material,
//! which keeps a loop that is fed back into itself (sound on sound) from
//! piling up forever.

pub const DEFAULT_LAMBDA: f32 = 0.995;

#[derive(Debug, Clone, Copy)]
pub struct EnvelopeFollower {
    lambda: f32,
    level: f32,
}

impl EnvelopeFollower {
    pub fn new() -> Self {
        Self::with_lambda(DEFAULT_LAMBDA)
    }

    pub fn with_lambda(lambda: f32) -> Self {
        Self {
            lambda: lambda.clamp(0.0, 1.0),
            level: 0.0,
        }
    }

    /// Feed one sample, returns the current level in 0..1.
    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let rectified = sample.clamp(-1.0, 1.0).abs();
        self.level = self.level * self.lambda + rectified * (1.0 - self.lambda);
        self.level.clamp(0.0, 1.0)
    }
}

impl Default for EnvelopeFollower {
    fn default() -> Self {
        Self::new()
    }
}
