//! Schmitt trigger.
//!
//! Turns a noisy gate or clock level into clean events. A trigger fires once
//! when the input rises through the threshold and re-arms only after the
//! input falls back below it, so a held-high gate produces exactly one event.

/// Default switching threshold for 0..1 gate levels.
pub const DEFAULT_THRESHOLD: f32 = 0.3;

#[derive(Debug, Clone, Copy)]
pub struct SchmittTrigger {
    threshold: f32,
    gate: bool,   // report the held state instead of single events
    high: bool,   // armed state: input is above threshold
    previous: f32,
}

impl SchmittTrigger {
    /// Fires once per rising edge.
    pub fn trigger() -> Self {
        Self::new(false, DEFAULT_THRESHOLD)
    }

    /// Reports true for as long as the input stays high.
    pub fn gate() -> Self {
        Self::new(true, DEFAULT_THRESHOLD)
    }

    pub fn new(gate: bool, threshold: f32) -> Self {
        Self {
            threshold,
            gate,
            high: false,
            previous: 0.0,
        }
    }

    pub fn process(&mut self, value: f32) -> bool {
        let falling = value < self.previous;
        self.previous = value;

        let mut out = self.gate && self.high;
        if !self.high && !falling && value >= self.threshold {
            self.high = true;
            out = true;
        } else if falling && value < self.threshold {
            self.high = false;
        }

        out
    }

    /// Convenience for boolean edges.
    #[inline]
    pub fn process_bool(&mut self, level: bool) -> bool {
        self.process(if level { 1.0 } else { 0.0 })
    }
}
