//! Control curves.
//!
//! Knobs and CV arrive as plain 0..1 values. Loop start and length need very
//! different resolution across that travel: a length control that moves
//! linearly from 7ms to 5s would leave all the short, pitched loops crammed
//! into the first percent of the knob. A cubic table spreads them out.

/// Number of steps in a [`Lut`].
pub const LUT_SIZE: usize = 128;

/// Exponent used by [`Lut::expo`].
pub const LUT_EXPO: f32 = 3.0;

/// Map `value` from `[a_min, a_max]` to `[b_min, b_max]`. Supports inverted
/// ranges, does not clamp.
#[inline]
pub fn map(value: f32, a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> f32 {
    b_min + (value - a_min) * (b_max - b_min) / (a_max - a_min)
}

/// Map a knob whose zero point sits at `center` onto `[min, max]`, so that
/// `center` lands exactly on 0.0.
///
/// # Example
/// ```
/// use tapeloop_dsp::dsp::curve::center_map;
/// assert_eq!(center_map(0.5, -2.0, 2.0, 0.5), 0.0);
/// assert_eq!(center_map(1.0, -2.0, 2.0, 0.5), 2.0);
/// assert_eq!(center_map(0.0, -2.0, 2.0, 0.5), -2.0);
/// ```
#[inline]
pub fn center_map(value: f32, min: f32, max: f32, center: f32) -> f32 {
    if value < center {
        map(value, 0.0, center, min, 0.0)
    } else {
        map(value, center, 1.0, 0.0, max)
    }
}

/// A fixed table of `LUT_SIZE` values between `min` and `max`.
///
/// The table is built once; [`Lut::lookup`] is a pure function of the input.
#[derive(Debug, Clone)]
pub struct Lut {
    table: [f32; LUT_SIZE],
}

impl Lut {
    /// Evenly spaced steps.
    pub fn linear(min: f32, max: f32) -> Self {
        Self::build(min, max, |x| x)
    }

    /// Steps following `x^3`: fine at the low end, coarse at the top.
    pub fn expo(min: f32, max: f32) -> Self {
        Self::build(min, max, |x| x.powf(LUT_EXPO))
    }

    fn build(min: f32, max: f32, shape: impl Fn(f32) -> f32) -> Self {
        let step = 1.0 / (LUT_SIZE - 1) as f32;
        let mut table = [0.0; LUT_SIZE];
        for (i, slot) in table.iter_mut().enumerate() {
            // The last entry is pinned so the table always reaches `max`
            let x = if i == LUT_SIZE - 1 { 1.0 } else { step * i as f32 };
            *slot = (min + (max - min) * shape(x)).round();
        }
        Self { table }
    }

    /// Quantize a 0..1 control to one of the table's steps.
    #[inline]
    pub fn lookup(&self, value: f32) -> f32 {
        self.table[Self::index(value)]
    }

    #[inline]
    fn index(value: f32) -> usize {
        let scaled = value.clamp(0.0, 1.0) * LUT_SIZE as f32;
        (scaled as usize).min(LUT_SIZE - 1)
    }
}
