//! DJ-style morph filter.
//!
//! A single 0..1 control sweeps from a dark low-pass, through a bypass zone
//! around the centre, to a thin high-pass:
//!
//! ```text
//!   0.0 ─────────── 0.45 ── 0.55 ─────────── 1.0
//!   LP 500Hz, wet    LP dry │ dry │ HP dry     HP 4kHz, wet
//! ```
//!
//! Towards the centre each side fades back to the dry signal so the knob has
//! no audible step where the filter switches off.

use super::{
    filter::{FilterType, SVFilter, BUTTERWORTH_Q},
    mix::linear_crossfade,
};

const LOWPASS_EDGE: f32 = 0.45;
const HIGHPASS_EDGE: f32 = 0.55;
const LOWPASS_RANGE: (f32, f32) = (500.0, 2_000.0);
const HIGHPASS_RANGE: (f32, f32) = (1_000.0, 4_000.0);
const OUTPUT_LIMIT: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Bypass,
    /// 0 = fully filtered, 1 = dry.
    LowPass { dry: f32 },
    /// 0 = dry, 1 = fully filtered.
    HighPass { wet: f32 },
}

pub struct DjFilter {
    lowpass: [SVFilter; 2],
    highpass: [SVFilter; 2],
    mode: Mode,
}

impl DjFilter {
    pub fn new(sample_rate: f32) -> Self {
        let lp = || {
            let mut f = SVFilter::new(FilterType::LowPass, sample_rate);
            f.set_q(BUTTERWORTH_Q);
            f
        };
        let hp = || {
            let mut f = SVFilter::new(FilterType::HighPass, sample_rate);
            f.set_q(BUTTERWORTH_Q);
            f
        };

        Self {
            lowpass: [lp(), lp()],
            highpass: [hp(), hp()],
            mode: Mode::Bypass,
        }
    }

    /// Set the morph position. Call at block rate.
    pub fn set(&mut self, value: f32) {
        let value = value.clamp(0.0, 1.0);
        if value <= LOWPASS_EDGE {
            let dry = value / LOWPASS_EDGE;
            let cutoff = LOWPASS_RANGE.0 + (LOWPASS_RANGE.1 - LOWPASS_RANGE.0) * dry;
            for f in self.lowpass.iter_mut() {
                f.set_cutoff(cutoff);
            }
            self.mode = Mode::LowPass { dry };
        } else if value >= HIGHPASS_EDGE {
            let wet = (value - HIGHPASS_EDGE) / (1.0 - HIGHPASS_EDGE);
            let cutoff = HIGHPASS_RANGE.0 + (HIGHPASS_RANGE.1 - HIGHPASS_RANGE.0) * wet;
            for f in self.highpass.iter_mut() {
                f.set_cutoff(cutoff);
            }
            self.mode = Mode::HighPass { wet };
        } else {
            self.mode = Mode::Bypass;
        }
    }

    pub fn is_bypassed(&self) -> bool {
        self.mode == Mode::Bypass
    }

    #[inline]
    pub fn process(&mut self, left: f32, right: f32) -> (f32, f32) {
        let (l, r) = match self.mode {
            Mode::Bypass => (left, right),
            Mode::LowPass { dry } => (
                linear_crossfade(self.lowpass[0].process(left), left, dry),
                linear_crossfade(self.lowpass[1].process(right), right, dry),
            ),
            Mode::HighPass { wet } => (
                linear_crossfade(left, self.highpass[0].process(left), wet),
                linear_crossfade(right, self.highpass[1].process(right), wet),
            ),
        };

        (
            l.clamp(-OUTPUT_LIMIT, OUTPUT_LIMIT),
            r.clamp(-OUTPUT_LIMIT, OUTPUT_LIMIT),
        )
    }
}
