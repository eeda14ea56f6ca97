//! The looper: per-block control handling around the per-sample
//! write, read and blend loop.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{
    buffer::LooperBuffer,
    playback::Playback,
    speed::{is_speed_locked, resolve_speed, speed_volume, Direction},
    store::{Frame, SampleStore},
    transition::TriggerStage,
};
use crate::{
    clock::ClockSync,
    config::LooperConfig,
    dsp::{
        curve::Lut, dj_filter::DjFilter, follower::EnvelopeFollower, mix::hard_clip,
        smooth::BlockInterpolator, trigger::SchmittTrigger,
    },
    error::Result,
};

/// Controls above this snap to the end of their range.
const CONTROL_SNAP: f32 = 0.99;

/// Control values for one block.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LooperInputs {
    /// -2..2, negative plays backward.
    pub speed: f32,
    /// 0..1 across the store.
    pub start: f32,
    /// 0..1, shortest loop to the whole store.
    pub length: f32,
    /// 0..1 DJ filter on the record path, 0.5 is bypass.
    pub filter: f32,
    /// 0..1 amount of the playback fed back into the recording.
    pub sound_on_sound: f32,
    pub recording: bool,
    /// Clock level; a rising edge is a tick.
    pub clock: f32,
    /// A rising edge starts a clear.
    pub clear: bool,
}

impl Default for LooperInputs {
    fn default() -> Self {
        Self {
            speed: 1.0,
            start: 0.0,
            length: 1.0,
            filter: 0.5,
            sound_on_sound: 0.0,
            recording: false,
            clock: 0.0,
            clear: false,
        }
    }
}

pub struct Looper {
    buffer: LooperBuffer,
    playback: Playback,

    filter: DjFilter,
    followers: [EnvelopeFollower; 2],
    clock: ClockSync,
    clear_trigger: SchmittTrigger,
    retrigger_on_clock: bool,

    start_lut: Lut,
    length_lut: Lut,
    speed_smooth: BlockInterpolator,
    start_smooth: BlockInterpolator,
    length_smooth: BlockInterpolator,

    speed_volume: f32,
    speed_locked: bool,
    write_phase: usize,
    cycle_phase: usize,
    cycle_started: bool,
    muted: bool,
    previous: Frame,
}

impl Looper {
    pub fn new(config: LooperConfig) -> Result<Self> {
        config.validate()?;

        let capacity = config.capacity();
        let min_loop = config.min_loop_samples() as f32;
        let defaults = LooperInputs::default();
        let blocks = config.interpolation_blocks;

        tracing::debug!(
            "Looper created: {} frames at {} Hz, fade {} samples, clear {:?}",
            capacity,
            config.sample_rate,
            config.fade_samples(),
            config.clear_mode
        );

        Ok(Self {
            buffer: LooperBuffer::from_config(&config),
            playback: Playback::from_config(&config),
            filter: DjFilter::new(config.sample_rate),
            followers: [EnvelopeFollower::new(), EnvelopeFollower::new()],
            clock: ClockSync::new(config.clock_timeout_samples()),
            clear_trigger: SchmittTrigger::trigger(),
            retrigger_on_clock: config.retrigger_on_clock,
            start_lut: Lut::linear(0.0, (capacity - 1) as f32),
            length_lut: Lut::expo(min_loop, capacity as f32),
            speed_smooth: BlockInterpolator::new(defaults.speed, blocks),
            start_smooth: BlockInterpolator::new(defaults.start, blocks),
            length_smooth: BlockInterpolator::new(defaults.length, blocks),
            speed_volume: 1.0,
            speed_locked: true,
            write_phase: 0,
            cycle_phase: 0,
            cycle_started: false,
            muted: false,
            previous: Frame::SILENT,
        })
    }

    /// Process one block. Runs for the shortest of the four slices; any
    /// remaining output is zeroed.
    pub fn process(
        &mut self,
        inputs: &LooperInputs,
        left_in: &[f32],
        right_in: &[f32],
        left_out: &mut [f32],
        right_out: &mut [f32],
    ) {
        let len = left_in
            .len()
            .min(right_in.len())
            .min(left_out.len())
            .min(right_out.len());

        self.update_controls(inputs, len);

        let capacity = self.buffer.capacity();
        let sound_on_sound = inputs.sound_on_sound.clamp(0.0, 1.0);
        self.cycle_started = false;

        for i in 0..len {
            if self.buffer.is_recording() {
                let (left, right) = self.filter.process(left_in[i], right_in[i]);
                let left = hard_clip(self.previous.left * sound_on_sound + left);
                let right = hard_clip(self.previous.right * sound_on_sound + right);
                let left = left * (1.0 - self.followers[0].process(left));
                let right = right * (1.0 - self.followers[1].process(right));

                self.buffer.write(self.write_phase as i64, left, right);
                self.write_phase += 1;
                if self.write_phase >= capacity {
                    self.write_phase = 0;
                }
            }

            let frame = self.playback.next(self.buffer.store());
            self.previous = frame;

            let out = if self.muted {
                Frame::SILENT
            } else {
                frame.scale(self.speed_volume)
            };
            left_out[i] = out.left;
            right_out[i] = out.right;

            self.cycle_phase += 1;
            if self.cycle_phase >= capacity {
                self.cycle_phase = 0;
                self.cycle_started = true;
            }
        }

        left_out[len..].fill(0.0);
        right_out[len..].fill(0.0);
    }

    fn update_controls(&mut self, inputs: &LooperInputs, block_len: usize) {
        if self.clear_trigger.process_bool(inputs.clear) {
            self.buffer.begin_clear();
            tracing::debug!("Clear started ({:?})", self.buffer.clear_mode());
        }
        self.muted = self.buffer.is_clearing();
        if self.buffer.clear_step() {
            tracing::debug!("Clear finished");
        }

        if inputs.recording && !self.muted {
            self.buffer.start();
        } else {
            self.buffer.stop();
        }

        let raw_speed = self.speed_smooth.next(inputs.speed);
        let speed = resolve_speed(raw_speed);
        let locked = is_speed_locked(raw_speed);
        if locked != self.speed_locked {
            tracing::trace!("Speed lock {}", if locked { "on" } else { "off" });
            self.speed_locked = locked;
        }
        self.speed_volume = speed_volume(speed);
        self.playback.set_speed(speed);

        let start = self.start_lut.lookup(snap(self.start_smooth.next(inputs.start)));
        let length = self.length_lut.lookup(snap(self.length_smooth.next(inputs.length)));
        self.playback.request_length(length);
        self.playback.request_start(start);

        self.filter.set(inputs.filter);

        let was_external = self.clock.is_external();
        let tick = self.clock.process(inputs.clock, block_len);
        if was_external != self.clock.is_external() {
            tracing::debug!("Clock source: {:?}", self.clock.source());
        }
        if tick && self.retrigger_on_clock {
            self.playback.retrigger();
        }
    }

    /// Jump the loop back to its start, as a clock tick would.
    pub fn retrigger(&mut self) {
        self.playback.retrigger();
    }

    pub fn phase(&self) -> f32 {
        self.playback.phase()
    }

    pub fn start(&self) -> f32 {
        self.playback.start()
    }

    pub fn length(&self) -> f32 {
        self.playback.length()
    }

    pub fn speed(&self) -> f32 {
        self.playback.speed()
    }

    pub fn direction(&self) -> Direction {
        self.playback.direction()
    }

    pub fn is_recording(&self) -> bool {
        self.buffer.is_recording()
    }

    pub fn is_clearing(&self) -> bool {
        self.buffer.is_clearing() || self.muted
    }

    pub fn is_speed_locked(&self) -> bool {
        self.speed_locked
    }

    pub fn is_fading(&self) -> bool {
        self.playback.is_fading()
    }

    pub fn trigger_stage(&self) -> TriggerStage {
        self.playback.trigger_stage()
    }

    pub fn clock_is_external(&self) -> bool {
        self.clock.is_external()
    }

    /// True if the free-running write cycle wrapped during the last block.
    pub fn cycle_started(&self) -> bool {
        self.cycle_started
    }

    pub fn store(&self) -> &SampleStore {
        self.buffer.store()
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }
}

#[inline]
fn snap(value: f32) -> f32 {
    if value > CONTROL_SNAP {
        1.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
