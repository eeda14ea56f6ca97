//! Messages between the UI thread and the audio thread
//!
//! Both directions are plain `Copy` values so the audio callback never
//! allocates while sending or receiving.

use tapeloop_dsp::{
    looper::{Direction, TriggerStage},
    Looper, LooperInputs,
};

/// Commands sent from UI thread to audio thread
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlMessage {
    /// Replace the held controls
    Inputs(LooperInputs),
    /// Zero the loop buffer
    Clear,
    /// One clock tick
    Tick,
}

/// Snapshot of the looper sent after every audio callback
#[derive(Clone, Copy, Debug, Default)]
pub struct LoopStatus {
    pub phase: f32,
    pub start: f32,
    pub length: f32,
    pub speed: f32,
    pub direction: Direction,
    pub recording: bool,
    pub clearing: bool,
    pub speed_locked: bool,
    pub fading: bool,
    pub trigger: TriggerStage,
    pub clock_external: bool,
    /// Output peak over the callback
    pub peak: f32,
}

impl LoopStatus {
    pub fn from_looper(looper: &Looper, peak: f32) -> Self {
        Self {
            phase: looper.phase(),
            start: looper.start(),
            length: looper.length(),
            speed: looper.speed(),
            direction: looper.direction(),
            recording: looper.is_recording(),
            clearing: looper.is_clearing(),
            speed_locked: looper.is_speed_locked(),
            fading: looper.is_fading(),
            trigger: looper.trigger_stage(),
            clock_external: looper.clock_is_external(),
            peak,
        }
    }
}
