//! Gain primitives: constant gain, linear gain ramps and smoothed gain.

use crate::dsp::{
    buffer::AudioBuffer,
    node::{ProcessSpec, Stage},
};

/*
Gain Changes Without Clicks
===========================

Multiplying a signal by a gain is the simplest DSP operation there is. The
hard part is CHANGING the gain.

Vocabulary
----------

  gain          A multiplier applied to amplitude.
                  gain = 1.0  →  unchanged (unity gain)
                  gain = 0.0  →  silence

  step          Jumping from one gain to another between two samples.

  ramp          Moving from one gain to another over many samples, so each
                sample gets a slightly different multiplier.

  zipper noise  The buzzing/clicking heard when a gain is stepped every
                block (e.g. while a host automates a knob). Each step is a
                tiny discontinuity in the waveform's slope or level.


Why Steps Click
---------------

A sine at full level, then the gain drops to 0.2 between two samples:

      ╱╲        ╱╲
     ╱  ╲      ╱  ╲
    ╱    ╲    ╱    ╲__.__.__.   ← vertical jump here = broadband click
              ↑
        gain stepped

Spreading the same change over a few milliseconds turns the jump into a
smooth slope that the ear hears as a fade.


The Two Tools
-------------

1. `apply_gain_ramp(from, to)`: a one-shot ramp across one block. The
   envelope uses this: it computes one gain per block and interpolates from
   the previous block's gain, so the envelope output is piecewise linear.

       sample i gets: from + (to - from) * i / len

   The last sample of the block lands one step short of `to`; the next block
   starts exactly at `to`, so consecutive blocks join without a gap.

2. `SmoothedValue`: a per-sample smoother with a fixed ramp TIME. When the
   target changes it walks linearly toward it over `ramp_seconds`,
   independent of block size. Parameter-driven gains (mix weights, the voice
   output gain) use this via the `Gain` stage, with a 5 ms ramp.


Implementation Notes
--------------------

The linear smoother precomputes `step = (target - current) / ramp_samples`
when the target changes and counts down. When the countdown hits zero it
snaps `current` to exactly `target`, so floating-point drift never leaves the
value a hair away from where it should settle.
*/

/// Default ramp time for parameter-driven gains.
pub const GAIN_RAMP_SECONDS: f32 = 0.005;

/// Multiply a signal by a constant gain factor (in-place).
#[inline]
pub fn apply_gain(signal: &mut [f32], gain: f32) {
    for sample in signal.iter_mut() {
        *sample *= gain;
    }
}

/// Multiply a signal by a linear ramp from `from` toward `to` (in-place).
///
/// The first sample is scaled by exactly `from`; the increment is
/// `(to - from) / len`.
#[inline]
pub fn apply_gain_ramp(signal: &mut [f32], from: f32, to: f32) {
    if signal.is_empty() {
        return;
    }
    if from == to {
        apply_gain(signal, from);
        return;
    }

    let increment = (to - from) / signal.len() as f32;
    let mut gain = from;
    for sample in signal.iter_mut() {
        *sample *= gain;
        gain += increment;
    }
}

/// A value that moves linearly toward its target over a fixed time.
#[derive(Debug, Clone, Copy)]
pub struct SmoothedValue {
    current: f32,
    target: f32,
    step: f32,
    countdown: u32,
    ramp_samples: u32,
}

impl SmoothedValue {
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            step: 0.0,
            countdown: 0,
            ramp_samples: 0,
        }
    }

    /// Set the ramp length and jump to the current target.
    pub fn reset(&mut self, sample_rate: f32, ramp_seconds: f32) {
        self.ramp_samples = (sample_rate * ramp_seconds).max(0.0).floor() as u32;
        self.set_current_and_target(self.target);
    }

    /// Jump immediately, cancelling any ramp in progress.
    pub fn set_current_and_target(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.countdown = 0;
    }

    /// Start ramping toward `value`.
    pub fn set_target(&mut self, value: f32) {
        if value == self.target {
            return;
        }
        if self.ramp_samples == 0 {
            self.set_current_and_target(value);
            return;
        }

        self.target = value;
        self.countdown = self.ramp_samples;
        self.step = (self.target - self.current) / self.countdown as f32;
    }

    /// Advance one sample and return the new value.
    #[inline]
    pub fn next_value(&mut self) -> f32 {
        if self.countdown == 0 {
            return self.target;
        }

        self.countdown -= 1;
        if self.countdown == 0 {
            self.current = self.target;
        } else {
            self.current += self.step;
        }
        self.current
    }

    pub fn is_smoothing(&self) -> bool {
        self.countdown > 0
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }
}

/// Smoothed linear gain stage.
#[derive(Debug, Clone)]
pub struct Gain {
    value: SmoothedValue,
    ramp_seconds: f32,
}

impl Gain {
    pub fn new(ramp_seconds: f32) -> Self {
        Self {
            value: SmoothedValue::new(1.0),
            ramp_seconds,
        }
    }

    pub fn set_gain_linear(&mut self, gain: f32) {
        self.value.set_target(gain);
    }

    /// Target gain (where the ramp is heading).
    pub fn gain_linear(&self) -> f32 {
        self.value.target()
    }
}

impl Default for Gain {
    fn default() -> Self {
        Self::new(GAIN_RAMP_SECONDS)
    }
}

impl Stage for Gain {
    fn prepare(&mut self, spec: &ProcessSpec) {
        self.value.reset(spec.sample_rate, self.ramp_seconds);
    }

    fn process(&mut self, buffer: &mut AudioBuffer, num_samples: usize) {
        if !self.value.is_smoothing() {
            buffer.apply_gain(0, num_samples, self.value.target());
            return;
        }

        for i in 0..num_samples {
            let gain = self.value.next_value();
            for channel in buffer.channels_mut() {
                channel[i] *= gain;
            }
        }
    }

    fn reset(&mut self) {
        self.value.set_current_and_target(self.value.target());
    }
}
