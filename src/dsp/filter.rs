use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
| type      | constructed by | passes       | rejects      |
| --------- | -------------- | ------------ | ------------ |
| low-pass  | LPF            | below cutoff | above cutoff |
| high-pass | HPF            | above cutoff | below cutoff |

The record path only ever needs one response at a time, but the
topology-preserving SVF computes both in the same step, so the type just
picks which output `process` returns.
*/

/// Q of a second-order Butterworth (Sallen-Key) stage.
pub const BUTTERWORTH_Q: f32 = std::f32::consts::FRAC_1_SQRT_2;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    LowPass,
    HighPass,
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
}

pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    sample_rate: f32,
    cutoff_hz: f32,
    q: f32,
    filter_type: FilterType,

    // Coefficients, recomputed whenever cutoff or q change
    g: f32,
    k: f32,
}

impl SVFilter {
    pub fn new(filter_type: FilterType, sample_rate: f32) -> Self {
        let mut filter = Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            sample_rate,
            cutoff_hz: 1000.0,
            q: BUTTERWORTH_Q,
            filter_type,
            g: 0.0,
            k: 0.0,
        };
        filter.update_coefficients();
        filter
    }

    pub fn lowpass(cutoff_hz: f32, sample_rate: f32) -> Self {
        let mut filter = Self::new(FilterType::LowPass, sample_rate);
        filter.set_cutoff(cutoff_hz);
        filter
    }

    pub fn highpass(cutoff_hz: f32, sample_rate: f32) -> Self {
        let mut filter = Self::new(FilterType::HighPass, sample_rate);
        filter.set_cutoff(cutoff_hz);
        filter
    }

    #[inline]
    fn update_coefficients(&mut self) {
        // Keep the prewarped cutoff below Nyquist so tan() stays finite
        let cutoff = self.cutoff_hz.clamp(1.0, self.sample_rate * 0.49);
        let wd = TAU * cutoff;
        let wa = (2.0 * self.sample_rate) * (wd / (2.0 * self.sample_rate)).tan();
        self.g = wa / (2.0 * self.sample_rate);
        self.k = 1.0 / self.q.max(0.01);
    }

    pub fn tick(&mut self, sample: f32) -> FilterOutputs {
        let g = self.g;
        let k = self.k;
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - k * v1 - v2,
        }
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let outputs = self.tick(sample);
        match self.filter_type {
            FilterType::LowPass => outputs.lowpass,
            FilterType::HighPass => outputs.highpass,
        }
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        if cutoff != self.cutoff_hz {
            self.cutoff_hz = cutoff;
            self.update_coefficients();
        }
    }

    pub fn set_q(&mut self, q: f32) {
        if q != self.q {
            self.q = q;
            self.update_coefficients();
        }
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }
}
