//! External clock detection.
//!
//! A clock edge switches the looper to the external clock and may retrigger
//! the loop. If no edge arrives within the timeout the looper falls back to
//! free running until the next one.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::trigger::SchmittTrigger;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockSource {
    #[default]
    Internal,
    External,
}

#[derive(Debug, Clone)]
pub struct ClockSync {
    trigger: SchmittTrigger,
    timeout: usize,
    since_tick: usize,
    source: ClockSource,
}

impl ClockSync {
    /// `timeout` in samples.
    pub fn new(timeout: usize) -> Self {
        Self {
            trigger: SchmittTrigger::trigger(),
            timeout: timeout.max(1),
            since_tick: 0,
            source: ClockSource::Internal,
        }
    }

    /// Feed the clock level for a block of `block_len` samples. Returns true
    /// on a rising edge.
    pub fn process(&mut self, level: f32, block_len: usize) -> bool {
        let tick = self.trigger.process(level);
        if tick {
            self.since_tick = 0;
            self.source = ClockSource::External;
        } else if self.source == ClockSource::External {
            self.since_tick = self.since_tick.saturating_add(block_len);
            if self.since_tick >= self.timeout {
                self.source = ClockSource::Internal;
            }
        }
        tick
    }

    pub fn source(&self) -> ClockSource {
        self.source
    }

    pub fn is_external(&self) -> bool {
        self.source == ClockSource::External
    }
}
