use std::f32::consts::TAU;

use crate::dsp::{
    amplify::Gain,
    buffer::AudioBuffer,
    node::{note_frequency, ProcessSpec, Stage},
    pan::Panner,
    waveform::Waveform,
};

/*
Phase Accumulator Oscillators
=============================

An oscillator is a phase that goes round and round, and a waveform that
turns the phase into a sample.


Phase
-----

The phase is stored in radians, always wrapped into [0, 2π). Every sample:

    sample  = waveform(phase)
    phase  += increment            increment = 2π · frequency / sample_rate
    if phase ≥ 2π: wrap

At 440 Hz and 48 kHz the increment is about 0.0576 rad, so one cycle takes
about 109 samples. Because the phase is continuous across blocks, changing
frequency or waveform between blocks never produces a discontinuity in time,
only in shape.


Phase Offsets Without Clicks
----------------------------

Each oscillator has a user phase offset in cycles [0, 1). It is applied in
two places:

  note-on        phase = fract(seed + offset) · 2π
                 (seed is the unison copy's start position, see unison.rs)

  offset change  the running phase is nudged FORWARD by the wrapped delta:

                     delta = new - old
                     if delta < 0: delta += 1
                     phase += delta · 2π

Resetting the phase mid-note would jump the waveform. Nudging forward moves
it by the same angular amount but keeps the accumulator running, and always
going forward means 0.9 → 0.1 is a step of +0.2 cycles rather than -0.8.


The Unit Pipeline
-----------------

One OscillatorUnit is three stages run in a fixed order:

    WaveGenerator → Panner → Gain
    (mono sample,   (balance,  (mix weight, smoothed
     copied to all   L/R)       over 5 ms)
     channels)

The stages are plain owned values; the unit walks them as a slice of
`Stage`s for prepare, process and reset.
*/

/// Wrap a phase into [0, 2π).
#[inline]
fn wrap_phase(phase: f32) -> f32 {
    let wrapped = phase.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Naive (non-band-limited) waveform generator.
#[derive(Debug, Clone)]
pub struct WaveGenerator {
    waveform: Waveform,
    phase: f32, // radians, [0, 2π)
    frequency: f32,
    increment: f32,
    sample_rate: f32,
    inverted: bool,
}

impl WaveGenerator {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
            frequency: 440.0,
            increment: 0.0,
            sample_rate: 48_000.0,
            inverted: false,
        }
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
        self.increment = TAU * frequency / self.sample_rate;
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Move the phase by `radians` (either direction), keeping it wrapped.
    pub fn advance_phase(&mut self, radians: f32) {
        self.phase = wrap_phase(self.phase + radians);
    }

    pub fn set_phase(&mut self, radians: f32) {
        self.phase = wrap_phase(radians);
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let sample = self.waveform.evaluate(self.phase);

        self.phase += self.increment;
        if self.phase >= TAU {
            self.phase = wrap_phase(self.phase);
        }

        if self.inverted {
            -sample
        } else {
            sample
        }
    }
}

impl Stage for WaveGenerator {
    fn prepare(&mut self, spec: &ProcessSpec) {
        self.sample_rate = spec.sample_rate;
        self.set_frequency(self.frequency);
    }

    /// Overwrites channel 0 and copies it to the other channels.
    fn process(&mut self, buffer: &mut AudioBuffer, num_samples: usize) {
        if buffer.num_channels() == 0 {
            return;
        }
        for sample in &mut buffer.channel_mut(0)[..num_samples] {
            *sample = self.next_sample();
        }
        buffer.duplicate_first_channel(num_samples);
    }

    fn reset(&mut self) {
        self.phase = 0.0;
    }
}

/// One oscillator part: generator, panner and mix gain.
#[derive(Debug, Clone)]
pub struct OscillatorUnit {
    generator: WaveGenerator,
    panner: Panner,
    gain: Gain,
    transpose: i32,
    phase_offset: f32, // cycles, [0, 1)
}

impl OscillatorUnit {
    pub fn new() -> Self {
        Self {
            generator: WaveGenerator::new(Waveform::Sine),
            panner: Panner::new(),
            gain: Gain::default(),
            transpose: 0,
            phase_offset: 0.0,
        }
    }

    fn stages_mut(&mut self) -> [&mut dyn Stage; 3] {
        [&mut self.generator, &mut self.panner, &mut self.gain]
    }

    pub fn prepare(&mut self, spec: &ProcessSpec) {
        for stage in self.stages_mut() {
            stage.prepare(spec);
        }
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.generator.set_waveform(waveform);
    }

    pub fn waveform(&self) -> Waveform {
        self.generator.waveform()
    }

    pub fn set_inverted(&mut self, inverted: bool) {
        self.generator.set_inverted(inverted);
    }

    /// Semitone offset added on top of the note passed to `set_pitch`.
    pub fn set_transpose(&mut self, semitones: i32) {
        self.transpose = semitones;
    }

    pub fn transpose(&self) -> i32 {
        self.transpose
    }

    /// Change the phase offset (in cycles) by nudging the running phase forward.
    pub fn set_phase_offset(&mut self, offset: f32) {
        if offset == self.phase_offset {
            return;
        }
        let mut delta = offset - self.phase_offset;
        if delta < 0.0 {
            delta += 1.0;
        }
        self.generator.advance_phase(delta * TAU);
        self.phase_offset = offset;
    }

    pub fn phase_offset(&self) -> f32 {
        self.phase_offset
    }

    pub fn set_pan(&mut self, pan: f32) {
        self.panner.set_pan(pan);
    }

    pub fn pan(&self) -> f32 {
        self.panner.pan()
    }

    /// Target mix gain; reached over the gain stage's ramp.
    pub fn set_gain(&mut self, gain: f32) {
        self.gain.set_gain_linear(gain);
    }

    pub fn gain(&self) -> f32 {
        self.gain.gain_linear()
    }

    /// Tune to `note` (fractional MIDI note) plus this unit's transpose.
    pub fn set_pitch(&mut self, note: f32) {
        self.generator
            .set_frequency(note_frequency(note + self.transpose as f32));
    }

    pub fn frequency(&self) -> f32 {
        self.generator.frequency()
    }

    /// Restart at `seed_cycles` plus the phase offset, and settle the gain.
    pub fn retrigger(&mut self, seed_cycles: f32) {
        self.generator
            .set_phase((seed_cycles + self.phase_offset).fract() * TAU);
        self.gain.reset();
    }

    pub fn phase(&self) -> f32 {
        self.generator.phase()
    }

    /// Overwrite the first `num_samples` frames of `buffer` with this unit's output.
    pub fn render(&mut self, buffer: &mut AudioBuffer, num_samples: usize) {
        for stage in self.stages_mut() {
            stage.process(buffer, num_samples);
        }
    }

    pub fn reset(&mut self) {
        for stage in self.stages_mut() {
            stage.reset();
        }
    }
}

impl Default for OscillatorUnit {
    fn default() -> Self {
        Self::new()
    }
}
