use crate::{
    dsp::{AudioBuffer, OscillatorUnit, ProcessSpec},
    synth::params::{OscillatorParams, NUM_OSCILLATORS},
};

/*
Unison
======

Unison thickens a note by playing several copies of it at once, each one
slightly detuned, started at a different point in the cycle and placed at a
different position in the stereo field. The copies beat against each other
and the result sounds wide and "chorused".

Each copy is a UnisonLayer: all three oscillator parts, with the copy's own
offsets applied on top of the shared parameters.


The Spread
----------

For `count` copies and a detune amount `d` (semitones), copy `i` gets
`t = i / (count - 1)` and:

    detune      = -d/2 + t·d          semitones, symmetric around 0
    phase seed  = 1 - t/2             cycles, start position at note-on
    pan         = -1/2 + t            before the part's own stereo offset

    count = 5, d = 0.2

    copy    t      detune   seed    pan
    0       0.00   -0.10    1.00   -0.50
    1       0.25   -0.05    0.875  -0.25
    2       0.50    0.00    0.75    0.00
    3       0.75   +0.05    0.625  +0.25
    4       1.00   +0.10    0.50   +0.50

With a single copy the formula would divide by zero, so it is bypassed and
the copy sits dead center with no detune and no seed. That makes a
one-copy voice render exactly like a plain oscillator.


Mix Weights
-----------

The three parts' mix weights are divided by

    total = max(1, w0 + w1 + w2)

One part at 1.0 keeps full level. Three parts at 1.0 get 1/3 each, so their
sum can't exceed a single full-scale part. Three parts at 0.3 sum to 0.9,
below the floor, and keep 0.3 each.
*/

/// Per-copy offsets derived from the copy's position in the unison stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnisonSpread {
    pub detune: f32,     // semitones
    pub phase_seed: f32, // cycles
    pub pan: f32,
}

impl UnisonSpread {
    pub const CENTER: Self = Self {
        detune: 0.0,
        phase_seed: 0.0,
        pan: 0.0,
    };

    /// Offsets for copy `index` of `count`, spread over `detune_amount` semitones.
    pub fn for_copy(index: usize, count: usize, detune_amount: f32) -> Self {
        if count <= 1 {
            return Self::CENTER;
        }
        let t = index as f32 / (count - 1) as f32;
        Self {
            detune: -0.5 * detune_amount + t * detune_amount,
            phase_seed: 1.0 - 0.5 * t,
            pan: -0.5 + t,
        }
    }
}

impl Default for UnisonSpread {
    fn default() -> Self {
        Self::CENTER
    }
}

/// One unison copy: three oscillator parts sharing a spread.
#[derive(Debug, Clone)]
pub struct UnisonLayer {
    parts: [OscillatorUnit; NUM_OSCILLATORS],
    stereo: [f32; NUM_OSCILLATORS],
    spread: UnisonSpread,
}

impl UnisonLayer {
    pub fn new() -> Self {
        Self {
            parts: std::array::from_fn(|_| OscillatorUnit::new()),
            stereo: [0.0; NUM_OSCILLATORS],
            spread: UnisonSpread::CENTER,
        }
    }

    pub fn prepare(&mut self, spec: &ProcessSpec) {
        for part in &mut self.parts {
            part.prepare(spec);
        }
    }

    pub fn set_spread(&mut self, spread: UnisonSpread) {
        self.spread = spread;
        self.update_pan();
    }

    pub fn spread(&self) -> UnisonSpread {
        self.spread
    }

    /// Apply mix weights as per-part gains, normalized by `max(1, sum)`.
    pub fn set_levels(&mut self, weights: [f32; NUM_OSCILLATORS]) {
        let total = weights.iter().sum::<f32>().max(1.0);
        for (part, weight) in self.parts.iter_mut().zip(weights) {
            part.set_gain(weight / total);
        }
    }

    pub fn apply_params(&mut self, params: &[OscillatorParams; NUM_OSCILLATORS]) {
        for (i, (part, osc)) in self.parts.iter_mut().zip(params).enumerate() {
            part.set_waveform(osc.waveform);
            part.set_inverted(osc.invert);
            part.set_transpose(osc.transpose);
            part.set_phase_offset(osc.phase);
            self.stereo[i] = osc.stereo;
        }
        self.set_levels(params.map(|osc| osc.mix));
        self.update_pan();
    }

    fn update_pan(&mut self) {
        for (part, stereo) in self.parts.iter_mut().zip(self.stereo) {
            part.set_pan(self.spread.pan + stereo);
        }
    }

    /// Retune every part to `key` plus this copy's detune.
    pub fn update_pitch(&mut self, key: f32) {
        let note = key + self.spread.detune;
        for part in &mut self.parts {
            part.set_pitch(note);
        }
    }

    /// Restart every part from this copy's phase seed.
    pub fn retrigger(&mut self) {
        for part in &mut self.parts {
            part.retrigger(self.spread.phase_seed);
        }
    }

    /// Add this copy's output into `out[..num_samples]`, using `scratch` per part.
    pub fn render(&mut self, scratch: &mut AudioBuffer, out: &mut AudioBuffer, num_samples: usize) {
        for part in &mut self.parts {
            part.render(scratch, num_samples);
            out.add_from(scratch, 0, num_samples);
        }
    }

    pub fn parts(&self) -> &[OscillatorUnit; NUM_OSCILLATORS] {
        &self.parts
    }

    pub fn reset(&mut self) {
        for part in &mut self.parts {
            part.reset();
        }
    }
}

impl Default for UnisonLayer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_copy_bypasses_spread() {
        assert_eq!(UnisonSpread::for_copy(0, 1, 1.0), UnisonSpread::CENTER);
        assert_eq!(UnisonSpread::for_copy(0, 0, 1.0), UnisonSpread::CENTER);
    }

    #[test]
    fn spread_is_symmetric() {
        let count = 5;
        let amount = 0.2;
        let first = UnisonSpread::for_copy(0, count, amount);
        let middle = UnisonSpread::for_copy(2, count, amount);
        let last = UnisonSpread::for_copy(4, count, amount);

        assert!((first.detune + 0.1).abs() < 1e-6);
        assert!(middle.detune.abs() < 1e-6);
        assert!((last.detune - 0.1).abs() < 1e-6);

        assert_eq!(first.pan, -0.5);
        assert_eq!(middle.pan, 0.0);
        assert_eq!(last.pan, 0.5);

        assert_eq!(first.phase_seed, 1.0);
        assert_eq!(last.phase_seed, 0.5);
    }

    #[test]
    fn levels_floor_total_at_one() {
        let mut layer = UnisonLayer::new();
        layer.set_levels([0.3, 0.3, 0.3]);
        for part in layer.parts() {
            assert!((part.gain() - 0.3).abs() < 1e-6);
        }

        layer.set_levels([1.0, 1.0, 0.0]);
        assert_eq!(layer.parts()[0].gain(), 0.5);
        assert_eq!(layer.parts()[2].gain(), 0.0);

        layer.set_levels([1.0, 0.0, 0.0]);
        assert_eq!(layer.parts()[0].gain(), 1.0);
    }

    #[test]
    fn stereo_adds_to_spread_pan() {
        let mut layer = UnisonLayer::new();
        let mut params = [OscillatorParams::default(); NUM_OSCILLATORS];
        params[0].stereo = 0.25;
        params[1].stereo = -1.0;
        layer.apply_params(&params);
        layer.set_spread(UnisonSpread::for_copy(0, 3, 0.1));

        assert_eq!(layer.parts()[0].pan(), -0.25);
        assert_eq!(layer.parts()[1].pan(), -1.0); // clamped
        assert_eq!(layer.parts()[2].pan(), -0.5);
    }

    #[test]
    fn detune_shifts_pitch() {
        let mut layer = UnisonLayer::new();
        layer.prepare(&ProcessSpec::default());
        layer.set_spread(UnisonSpread {
            detune: 12.0,
            ..UnisonSpread::CENTER
        });
        layer.update_pitch(57.0);
        assert!((layer.parts()[0].frequency() - 440.0).abs() < 1e-2);
    }
}
