//! Crossfaded record head.
//!
//! Switching recording on or off at full level would cut a step into the
//! loop. The head instead ramps its level over `fade_samples` writes and
//! blends each new value with what the store already holds at that position:
//!
//! ```text
//! level  1 │        ┌──────────┐
//!          │      ╱              ╲
//!        0 │────╱                  ╲────
//!              start()      stop()
//! ```

use super::store::SampleStore;
use crate::dsp::mix::cheap_equal_power_crossfade;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadState {
    Inactive,
    /// `index` writes of the fade-in have been made.
    FadingIn { index: u32 },
    Active,
    /// `index` writes of the fade-out have been made.
    FadingOut { index: u32 },
}

#[derive(Debug, Clone)]
pub struct WriteHead {
    state: HeadState,
    fade_samples: u32,
}

impl WriteHead {
    pub fn new(fade_samples: u32) -> Self {
        Self {
            state: HeadState::Inactive,
            fade_samples: fade_samples.max(1),
        }
    }

    /// Begin recording. A head that is fading out turns around from its
    /// current level.
    pub fn start(&mut self) {
        self.state = match self.state {
            HeadState::Inactive => HeadState::FadingIn { index: 0 },
            HeadState::FadingOut { index: 0 } => HeadState::Active,
            HeadState::FadingOut { index } => HeadState::FadingIn {
                index: self.fade_samples - index,
            },
            state => state,
        };
    }

    /// Stop recording. A head that is fading in turns around from its
    /// current level.
    pub fn stop(&mut self) {
        self.state = match self.state {
            HeadState::Active => HeadState::FadingOut { index: 0 },
            HeadState::FadingIn { index: 0 } => HeadState::Inactive,
            HeadState::FadingIn { index } => HeadState::FadingOut {
                index: self.fade_samples - index,
            },
            state => state,
        };
    }

    /// Drop straight to inactive without a fade.
    pub fn force_stop(&mut self) {
        self.state = HeadState::Inactive;
    }

    pub fn is_writing(&self) -> bool {
        self.state != HeadState::Inactive
    }

    pub fn state(&self) -> HeadState {
        self.state
    }

    /// Level of the most recent write, 0..1.
    pub fn level(&self) -> f32 {
        let fade = self.fade_samples as f32;
        match self.state {
            HeadState::Inactive => 0.0,
            HeadState::Active => 1.0,
            HeadState::FadingIn { index } => index as f32 / fade,
            HeadState::FadingOut { index } => 1.0 - index as f32 / fade,
        }
    }

    #[inline]
    pub fn write(&mut self, store: &mut SampleStore, channel: usize, position: i64, value: f32) {
        let fade = self.fade_samples;
        let level = match self.state {
            HeadState::Inactive => return,
            HeadState::Active => {
                store.set_sample(channel, position, value);
                return;
            }
            HeadState::FadingIn { index } => {
                let index = index + 1;
                self.state = if index >= fade {
                    HeadState::Active
                } else {
                    HeadState::FadingIn { index }
                };
                index as f32 / fade as f32
            }
            HeadState::FadingOut { index } => {
                let index = index + 1;
                if index >= fade {
                    self.state = HeadState::Inactive;
                    return;
                }
                self.state = HeadState::FadingOut { index };
                1.0 - index as f32 / fade as f32
            }
        };

        let existing = store.sample(channel, position);
        store.set_sample(
            channel,
            position,
            cheap_equal_power_crossfade(existing, value, level),
        );
    }
}
