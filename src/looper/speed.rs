//! Speed resolution: deadbands, direction and the low-speed fade.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::curve::{center_map, map};

/// Speeds at or below this magnitude stop playback.
pub const STALL_DEADBAND: f32 = 0.1;
/// Below this magnitude the output fades towards silence.
pub const SLOW_FADE_LIMIT: f32 = 0.2;
/// `1.0 ± UNITY_DEADBAND` snaps to exactly unity speed.
pub const UNITY_DEADBAND: f32 = 0.05;
/// Range of the speed control on either side of zero.
pub const MAX_SPEED: f32 = 2.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
    Stalled,
}

impl Direction {
    pub fn from_speed(speed: f32) -> Self {
        if speed > 0.0 {
            Direction::Forward
        } else if speed < 0.0 {
            Direction::Backward
        } else {
            Direction::Stalled
        }
    }
}

/// Apply the stall and unity deadbands to a raw speed.
///
/// ```
/// use tapeloop_dsp::looper::speed::resolve_speed;
/// assert_eq!(resolve_speed(0.08), 0.0);
/// assert_eq!(resolve_speed(-1.03), -1.0);
/// assert_eq!(resolve_speed(1.5), 1.5);
/// ```
#[inline]
pub fn resolve_speed(speed: f32) -> f32 {
    let magnitude = speed.abs();
    if !magnitude.is_finite() || magnitude <= STALL_DEADBAND {
        0.0
    } else if is_unity(magnitude) {
        speed.signum()
    } else {
        speed.clamp(-MAX_SPEED, MAX_SPEED)
    }
}

/// True while the raw speed sits inside one of the deadbands.
#[inline]
pub fn is_speed_locked(speed: f32) -> bool {
    let magnitude = speed.abs();
    magnitude <= STALL_DEADBAND || is_unity(magnitude)
}

#[inline]
fn is_unity(magnitude: f32) -> bool {
    (1.0 - UNITY_DEADBAND..=1.0 + UNITY_DEADBAND).contains(&magnitude)
}

/// Output gain for a resolved speed: silent when stalled, rising linearly to
/// full level between the stall deadband and [`SLOW_FADE_LIMIT`].
#[inline]
pub fn speed_volume(speed: f32) -> f32 {
    let magnitude = speed.abs();
    if magnitude <= SLOW_FADE_LIMIT {
        map(magnitude, STALL_DEADBAND, SLOW_FADE_LIMIT, 0.0, 1.0).clamp(0.0, 1.0)
    } else {
        1.0
    }
}

/// Map a 0..1 speed knob onto `-MAX_SPEED..MAX_SPEED` with the zero point at
/// `center`.
pub fn speed_from_knob(value: f32, center: f32) -> f32 {
    let center = center.clamp(f32::EPSILON, 1.0 - f32::EPSILON);
    center_map(value.clamp(0.0, 1.0), -MAX_SPEED, MAX_SPEED, center)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_follows_sign() {
        assert_eq!(Direction::from_speed(0.5), Direction::Forward);
        assert_eq!(Direction::from_speed(-0.5), Direction::Backward);
        assert_eq!(Direction::from_speed(0.0), Direction::Stalled);
    }

    #[test]
    fn speed_volume_ramp() {
        assert_eq!(speed_volume(0.0), 0.0);
        assert_eq!(speed_volume(0.1), 0.0);
        assert!((speed_volume(0.15) - 0.5).abs() < 1e-5);
        assert_eq!(speed_volume(-0.2), 1.0);
        assert_eq!(speed_volume(1.0), 1.0);
    }

    #[test]
    fn knob_center_is_zero_speed() {
        assert_eq!(speed_from_knob(0.5, 0.5), 0.0);
        assert_eq!(speed_from_knob(1.0, 0.5), MAX_SPEED);
        assert_eq!(speed_from_knob(0.0, 0.5), -MAX_SPEED);
        assert!(speed_from_knob(0.75, 0.5) > 0.0);
    }

    #[test]
    fn non_finite_speed_stalls() {
        assert_eq!(resolve_speed(f32::NAN), 0.0);
        assert_eq!(resolve_speed(f32::INFINITY), 0.0);
    }

    #[test]
    fn out_of_range_speed_is_clamped() {
        assert_eq!(resolve_speed(3.0), MAX_SPEED);
        assert_eq!(resolve_speed(-3.0), -MAX_SPEED);
    }
}
