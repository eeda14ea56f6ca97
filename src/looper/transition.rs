//! Playback crossfades and the clock re-trigger envelope.

/*
Transitions
===========

The playback engine never jumps its read position. Whenever the position it
reads from has to change (the loop wraps, the start point moves, the loop is
shortened past the current phase) a second read stream is opened at the new
position and the two are blended:

    playing   ━━━━━━━━━━━━━━━━━━━━━━╲
                                       ╲____________
    incoming                ___________╱━━━━━━━━━━━━━━━━
                            ╱
                            |<-- span -->|

  kind       incoming stream                      span
  --------   ----------------------------------   ------------------------------
  Boundary   same content one loop length away    distance to the loop edge
  Start      new start, same phase                fade threshold
  Length     edge of the new (shorter) window     overshoot past the new length

Spans are measured in phase units, so a crossfade covers the same stretch of
the recording at any speed. At most one crossfade is in flight at a time.

Re-trigger
----------

A clock tick jumps the loop back to phase 0. That jump is hidden by a short
linear envelope instead of a crossfade: the old tail fades out over `T`
samples while the head waits at phase 0, then the head fades in over another
`T` samples.

    gain 1 ━━━━╲              ╱━━━━━
                 ╲          ╱
    gain 0        ╲________╱
               |<-- T -->|<-- T -->|
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// Accumulated `1/span` steps land a hair short of 1.0
const PROGRESS_EPSILON: f32 = 1e-5;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeKind {
    Boundary,
    Start,
    Length,
}

/// A second read stream being blended in over `span` phase units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossfade {
    pub kind: FadeKind,
    /// Window and phase of the incoming stream.
    pub start: f32,
    pub length: f32,
    pub phase: f32,
    /// 0 = playing stream only, 1 = incoming stream only.
    pub progress: f32,
    pub span: f32,
}

impl Crossfade {
    pub fn new(kind: FadeKind, start: f32, length: f32, phase: f32, span: f32) -> Self {
        Self {
            kind,
            start,
            length,
            phase,
            progress: 0.0,
            span: span.max(f32::EPSILON),
        }
    }

    #[inline]
    pub fn step(&mut self, speed: f32) {
        self.progress += speed.abs() / self.span;
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0 - PROGRESS_EPSILON
    }

    /// True once the incoming stream carries more of the mix.
    pub fn incoming_dominates(&self) -> bool {
        self.progress >= 0.5
    }

    /// Absolute store position the incoming stream reads from.
    #[inline]
    pub fn position(&self) -> f32 {
        self.start + self.phase
    }
}

/// Sizing rules shared by every crossfade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeWindow {
    /// Shortest span, a tenth of the minimum loop.
    pub min_fade: f32,
    /// Longest span, the configured fade length.
    pub max_fade: f32,
}

impl FadeWindow {
    pub fn new(min_loop: f32, fade_samples: f32) -> Self {
        Self {
            min_fade: min_loop * 0.1,
            max_fade: fade_samples.max(1.0),
        }
    }

    /// Distance from the loop edge at which a boundary crossfade begins.
    #[inline]
    pub fn threshold(&self, length: f32) -> f32 {
        (length * 0.1).min(self.max_fade)
    }

    /// Span of a boundary crossfade starting `distance` from the edge.
    #[inline]
    pub fn boundary_span(&self, distance: f32) -> f32 {
        bounded(distance, self.min_fade, self.max_fade)
    }

    /// Span of a length crossfade that overshoots the new window by `excess`.
    #[inline]
    pub fn length_span(&self, excess: f32, new_length: f32) -> f32 {
        bounded(excess, self.min_fade, self.max_fade.min(new_length * 0.5))
    }
}

/// Clamp where the upper bound wins if the bounds cross.
#[inline]
fn bounded(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerStage {
    #[default]
    Idle,
    FadingOut,
    FadingIn,
}

/// Gain envelope around a clock re-trigger.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TriggerFade {
    #[default]
    Idle,
    /// `tail` is the absolute store position the old stream is still read from.
    FadingOut { index: u32, tail: f32 },
    FadingIn { index: u32 },
}

impl TriggerFade {
    pub fn stage(&self) -> TriggerStage {
        match self {
            TriggerFade::Idle => TriggerStage::Idle,
            TriggerFade::FadingOut { .. } => TriggerStage::FadingOut,
            TriggerFade::FadingIn { .. } => TriggerStage::FadingIn,
        }
    }

    pub fn is_fading_out(&self) -> bool {
        matches!(self, TriggerFade::FadingOut { .. })
    }

    /// Advance a fade-in by one sample of a `samples` long envelope and
    /// return its gain.
    #[inline]
    pub fn fade_in_gain(&mut self, samples: u32) -> f32 {
        match *self {
            TriggerFade::FadingIn { index } => {
                let index = index + 1;
                if index >= samples {
                    *self = TriggerFade::Idle;
                    1.0
                } else {
                    *self = TriggerFade::FadingIn { index };
                    index as f32 / samples as f32
                }
            }
            _ => 1.0,
        }
    }

    /// Advance a fade-out by one sample. Returns the tail position to read
    /// and its gain, or `None` when not fading out.
    #[inline]
    pub fn fade_out_step(&mut self, samples: u32, speed: f32) -> Option<(f32, f32)> {
        match *self {
            TriggerFade::FadingOut { index, tail } => {
                let index = index + 1;
                if index >= samples {
                    *self = TriggerFade::FadingIn { index: 0 };
                    Some((tail, 0.0))
                } else {
                    *self = TriggerFade::FadingOut {
                        index,
                        tail: tail + speed,
                    };
                    Some((tail, 1.0 - index as f32 / samples as f32))
                }
            }
            _ => None,
        }
    }
}
