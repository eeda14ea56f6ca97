//! Varispeed loop playback.
//!
//! `Playback` owns the read side of the looper: a window `[start,
//! start + length)` into the store, a fractional phase inside it and a signed
//! speed. New start and length values are requests; the playing window only
//! changes once the crossfade that hides the change has finished. See
//! [`transition`](super::transition) for the crossfade kinds.

use super::{
    speed::Direction,
    store::{Frame, SampleStore},
    transition::{Crossfade, FadeKind, FadeWindow, TriggerFade, TriggerStage},
};
use crate::config::LooperConfig;

#[derive(Debug, Clone)]
pub struct Playback {
    start: f32,
    length: f32,
    phase: f32,
    speed: f32,
    direction: Direction,

    target_start: f32,
    target_length: f32,

    capacity: f32,
    min_length: f32,
    window: FadeWindow,
    threshold: f32,

    fade: Option<Crossfade>,
    trigger: TriggerFade,
    trigger_samples: u32,
}

impl Playback {
    /// Playback over the whole store at unity speed.
    pub fn new(capacity: usize, min_length: u32, fade_samples: u32, trigger_samples: u32) -> Self {
        let capacity = capacity.max(1) as f32;
        let min_length = (min_length as f32).clamp(1.0, capacity);
        let window = FadeWindow::new(min_length, fade_samples as f32);

        Self {
            start: 0.0,
            length: capacity,
            phase: 0.0,
            speed: 1.0,
            direction: Direction::Forward,
            target_start: 0.0,
            target_length: capacity,
            capacity,
            min_length,
            window,
            threshold: window.threshold(capacity),
            fade: None,
            trigger: TriggerFade::Idle,
            trigger_samples: trigger_samples.max(1),
        }
    }

    pub fn from_config(config: &LooperConfig) -> Self {
        Self::new(
            config.capacity(),
            config.min_loop_samples(),
            config.fade_samples(),
            config.trigger_fade_samples(),
        )
    }

    /// Set an already resolved speed (see [`resolve_speed`](super::speed::resolve_speed)).
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
        self.direction = Direction::from_speed(speed);
    }

    /// Ask for a new loop start in frames. Takes effect through a crossfade.
    pub fn request_start(&mut self, start: f32) {
        self.target_start = start.clamp(0.0, self.capacity - 1.0);
        self.apply_targets();
    }

    /// Ask for a new loop length in frames, clamped to the minimum loop and
    /// the store capacity.
    pub fn request_length(&mut self, length: f32) {
        self.target_length = length.clamp(self.min_length, self.capacity);
        self.apply_targets();
    }

    /// Jump back to phase 0, hiding the jump behind the trigger envelope when
    /// the loop is long enough to hold it.
    pub fn retrigger(&mut self) {
        if self.trigger.is_fading_out() {
            return;
        }

        if let Some(fade) = self.fade.take() {
            if fade.incoming_dominates() {
                self.adopt(fade);
            }
        }

        let tail = self.start + self.phase;
        let long_enough = self.length >= 2.0 * self.trigger_samples as f32;
        self.trigger = match self.trigger {
            _ if !long_enough => TriggerFade::Idle,
            TriggerFade::FadingIn { index } => TriggerFade::FadingOut {
                index: self.trigger_samples.saturating_sub(index),
                tail,
            },
            _ => TriggerFade::FadingOut { index: 0, tail },
        };
        self.phase = 0.0;
    }

    /// Produce the next output frame and advance.
    #[inline]
    pub fn next(&mut self, store: &SampleStore) -> Frame {
        if self.direction == Direction::Stalled {
            self.apply_targets();
            return Frame::SILENT;
        }

        if self.fade.is_none() && !self.trigger.is_fading_out() {
            self.apply_targets();
        }

        // The head waits at phase 0 while the old tail fades away
        if let Some((tail, gain)) = self.trigger.fade_out_step(self.trigger_samples, self.speed) {
            return store.read(tail, self.direction).scale(gain);
        }

        let mut out = store.read(self.start + self.phase, self.direction);

        if let Some(mut fade) = self.fade {
            let incoming = store.read(fade.position(), self.direction);
            if fade.is_complete() {
                out = incoming;
                self.adopt(fade);
                self.fade = None;
            } else {
                out = out.blend(incoming, fade.progress);
                fade.step(self.speed);
                self.fade = Some(fade);
            }
        }

        out = out.scale(self.trigger.fade_in_gain(self.trigger_samples));

        if self.fade.is_none() {
            self.check_boundary();
        }
        self.advance();

        out
    }

    fn apply_targets(&mut self) {
        if self.direction == Direction::Stalled {
            // Nothing is audible, so changes land at once
            if let Some(fade) = self.fade.take() {
                if fade.incoming_dominates() {
                    self.adopt(fade);
                }
            }
            self.start = self.target_start;
            if self.target_length != self.length {
                self.length = self.target_length;
                self.threshold = self.window.threshold(self.length);
                if self.phase >= self.length || self.phase < 0.0 {
                    self.phase = self.phase.rem_euclid(self.length);
                }
            }
            return;
        }

        if self.fade.is_some() || self.trigger.is_fading_out() {
            return;
        }

        if self.target_length != self.length {
            self.begin_length_change();
        }
        if self.fade.is_none() && self.target_start != self.start {
            self.begin_start_change();
        }
    }

    fn begin_length_change(&mut self) {
        let new_length = self.target_length;
        if self.phase < new_length {
            // Same content either way, only the wrap point moves
            self.length = new_length;
            self.threshold = self.window.threshold(new_length);
            return;
        }

        let span = self.window.length_span(self.phase - new_length, new_length);
        let phase = match self.direction {
            Direction::Backward => (new_length - 1.0).max(0.0),
            _ => 0.0,
        };
        self.fade = Some(Crossfade::new(
            FadeKind::Length,
            self.start,
            new_length,
            phase,
            span,
        ));
    }

    fn begin_start_change(&mut self) {
        let span = self.threshold;
        // Leave the boundary crossfade room to run once this one is done
        let fits = match self.direction {
            Direction::Forward => self.phase + span <= self.length - self.threshold,
            Direction::Backward => self.phase - span >= self.threshold,
            Direction::Stalled => true,
        };
        if !fits {
            return;
        }

        self.fade = Some(Crossfade::new(
            FadeKind::Start,
            self.target_start,
            self.length,
            self.phase,
            span,
        ));
    }

    fn check_boundary(&mut self) {
        let fade = match self.direction {
            Direction::Forward if self.phase >= self.length - self.threshold => {
                let span = self.window.boundary_span(self.length - self.phase);
                Crossfade::new(
                    FadeKind::Boundary,
                    self.start,
                    self.length,
                    self.phase - self.length,
                    span,
                )
            }
            Direction::Backward if self.phase <= self.threshold => {
                let span = self.window.boundary_span(self.phase);
                Crossfade::new(
                    FadeKind::Boundary,
                    self.start,
                    self.length,
                    self.phase + self.length,
                    span,
                )
            }
            _ => return,
        };
        self.fade = Some(fade);
    }

    #[inline]
    fn advance(&mut self) {
        self.phase += self.speed;
        match self.fade.as_mut() {
            Some(fade) => fade.phase += self.speed,
            None => self.wrap_phase(),
        }
    }

    fn wrap_phase(&mut self) {
        match self.direction {
            Direction::Forward if self.phase >= self.length => self.phase -= self.length,
            Direction::Backward if self.phase < 0.0 => self.phase += self.length,
            _ => {}
        }
        if self.phase < -self.length || self.phase > 2.0 * self.length {
            self.phase = self.phase.rem_euclid(self.length);
        }
    }

    fn adopt(&mut self, fade: Crossfade) {
        self.start = fade.start;
        self.length = fade.length;
        self.phase = fade.phase;
        self.threshold = self.window.threshold(self.length);
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    pub fn fade_kind(&self) -> Option<FadeKind> {
        self.fade.map(|fade| fade.kind)
    }

    pub fn trigger_stage(&self) -> TriggerStage {
        self.trigger.stage()
    }
}
