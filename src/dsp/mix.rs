//! Signal crossfading primitives.

/*
Crossfading
===========

Every discontinuity the looper could produce (record on/off, loop wrap, a
moved start point, a shortened loop) is hidden by blending two signals with
complementary weights while one hands over to the other.

Vocabulary
----------

  crossfade     Transitioning between two signals using complementary weights.
                As one fades out, the other fades in.

  position      A control value (0.0 to 1.0) for how far the crossfade has
                progressed.
                  position = 0.0  →  100% `from`, 0% `to`
                  position = 1.0  →  0% `from`, 100% `to`

  correlated    Two signals that are (nearly) the same waveform, e.g. two reads
                of a loop a few milliseconds apart. Their amplitudes add.

  uncorrelated  Two unrelated signals. Their powers add, not their amplitudes.


Linear Crossfade
----------------

    weight_from = 1.0 - position
    weight_to   = position

The weights always sum to 1.0, which is exactly right for correlated signals
and gives a loudness dip of ~3dB in the middle for uncorrelated ones.


Cheap Energy-Preserving Crossfade
---------------------------------

A polynomial approximation of an energy-preserving curve, after Signalsmith's
"cheap energy crossfade". The `p` parameter bends the curve between the two
cases:

    p = 1.0   equal amplitude (correlated signals keep their loudness)
    p = 2.0   equal power (uncorrelated signals keep their loudness)

    x = position, y = 1 - x
    k = -6.0026608 + p * (6.8773512 - 1.5838104 * p)
    a = x * y
    b = a * (1 + k * a)
    weight_to   = (b + x)^2
    weight_from = (b + y)^2

Both weights are monotonic in `position`, exactly 0.0 / 1.0 at the ends, and
with p = 1.0 never sum to more than ~1.004. The looper uses p = 1.0 because
the two streams it blends are usually reads of the same recording.

    Weight
      1.0 ──────╲      ╱──────
                 ╲    ╱
      0.5         ╳        ← both ≈0.5, sum ≈1.0
                 ╱  ╲
      0.0 ──────╱    ╲──────
          0.0     0.5     1.0
                position
*/

/// Curve parameter used throughout the looper (equal amplitude).
pub const EQUAL_CROSSFADE_P: f32 = 1.0;

/// Linear crossfade between two samples.
///
/// output = (from × (1-position)) + (to × position)
#[inline]
pub fn linear_crossfade(from: f32, to: f32, position: f32) -> f32 {
    from + (to - from) * position
}

/// Weights `(from, to)` of the cheap energy-preserving crossfade.
#[inline]
pub fn equal_power_weights(position: f32, p: f32) -> (f32, f32) {
    let inv_position = 1.0 - position;
    let k = -6.002_660_8 + p * (6.877_351_2 - 1.583_810_4 * p);
    let a = position * inv_position;
    let b = a * (1.0 + k * a);
    let c = b + position;
    let d = b + inv_position;

    (d * d, c * c)
}

/// Energy-preserving crossfade between two samples.
#[inline]
pub fn cheap_equal_power_crossfade(from: f32, to: f32, position: f32) -> f32 {
    let (weight_from, weight_to) = equal_power_weights(position, EQUAL_CROSSFADE_P);
    from * weight_from + to * weight_to
}

/// Clamp a sample to the nominal [-1.0, +1.0] range.
#[inline]
pub fn hard_clip(sample: f32) -> f32 {
    sample.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn linear_ends() {
        assert_eq!(linear_crossfade(1.0, 0.5, 0.0), 1.0);
        assert_eq!(linear_crossfade(1.0, 0.5, 1.0), 0.5);
        assert_eq!(linear_crossfade(1.0, 0.0, 0.5), 0.5);
    }

    #[test]
    fn equal_power_ends_are_exact() {
        assert_eq!(cheap_equal_power_crossfade(0.3, -0.7, 0.0), 0.3);
        assert_eq!(cheap_equal_power_crossfade(0.3, -0.7, 1.0), -0.7);
    }

    #[test]
    fn equal_power_weights_are_monotonic() {
        let mut last = equal_power_weights(0.0, EQUAL_CROSSFADE_P);
        for i in 1..=1000 {
            let w = equal_power_weights(i as f32 / 1000.0, EQUAL_CROSSFADE_P);
            assert!(w.0 <= last.0 + 1e-6, "from weight rose at {}", i);
            assert!(w.1 >= last.1 - 1e-6, "to weight fell at {}", i);
            last = w;
        }
    }

    #[test]
    fn equal_amplitude_sum_stays_near_one() {
        for i in 0..=100 {
            let (from, to) = equal_power_weights(i as f32 / 100.0, EQUAL_CROSSFADE_P);
            assert_abs_diff_eq!(from + to, 1.0, epsilon = 0.005);
        }
    }

    #[test]
    fn equal_power_keeps_uncorrelated_energy() {
        // p = 2 is the equal-power end of the curve
        let (from, to) = equal_power_weights(0.5, 2.0);
        assert_abs_diff_eq!(from * from + to * to, 1.0, epsilon = 0.02);
    }

    #[test]
    fn hard_clip_limits() {
        assert_eq!(hard_clip(2.0), 1.0);
        assert_eq!(hard_clip(-3.0), -1.0);
        assert_eq!(hard_clip(0.25), 0.25);
    }
}
