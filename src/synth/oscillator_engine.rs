use crate::{
    dsp::{AudioBuffer, ProcessSpec},
    synth::{
        params::{OscillatorParams, NUM_OSCILLATORS},
        unison::{UnisonLayer, UnisonSpread},
    },
};

/// Most unison copies a voice can run (16 displayed + 1).
pub const MAX_UNISON: usize = 17;

/// The oscillator bank of one voice: up to [`MAX_UNISON`] unison copies.
///
/// All copies are allocated up front; only the first `active` are rendered.
/// Copies are summed without normalization.
#[derive(Debug, Clone)]
pub struct OscillatorEngine {
    layers: [UnisonLayer; MAX_UNISON],
    active: usize,
    detune: f32,
    key: f32,
    scratch: AudioBuffer,
}

impl OscillatorEngine {
    pub fn new() -> Self {
        Self {
            layers: std::array::from_fn(|_| UnisonLayer::new()),
            active: 1,
            detune: 0.0,
            key: 60.0,
            scratch: AudioBuffer::default(),
        }
    }

    pub fn prepare(&mut self, spec: &ProcessSpec) {
        self.scratch.set_size(spec.num_channels, spec.max_block_size);
        for layer in &mut self.layers {
            layer.prepare(spec);
        }
    }

    /// Set the copy count (clamped to 1..=MAX_UNISON) and respread every active copy.
    pub fn set_unison(&mut self, count: usize, detune_amount: f32) {
        let count = count.clamp(1, MAX_UNISON);
        if count == self.active && detune_amount == self.detune {
            return;
        }
        self.active = count;
        self.detune = detune_amount;

        for (i, layer) in self.layers[..count].iter_mut().enumerate() {
            layer.set_spread(UnisonSpread::for_copy(i, count, detune_amount));
        }
    }

    /// Push the shared oscillator settings to every copy, active or not,
    /// so copies switched on later start from current values.
    pub fn apply_params(&mut self, params: &[OscillatorParams; NUM_OSCILLATORS]) {
        for layer in &mut self.layers {
            layer.apply_params(params);
        }
    }

    /// Set the MIDI key and restart every copy from its phase seed.
    pub fn note_on(&mut self, key: u8) {
        self.key = key as f32;
        for layer in &mut self.layers {
            layer.update_pitch(self.key);
            layer.retrigger();
        }
    }

    /// Add the active copies' output into `out[..num_samples]`.
    ///
    /// Pitch is recomputed from key, transpose and detune at the start of
    /// every block.
    pub fn render(&mut self, out: &mut AudioBuffer, num_samples: usize) {
        for layer in &mut self.layers[..self.active] {
            layer.update_pitch(self.key);
            layer.render(&mut self.scratch, out, num_samples);
        }
    }

    pub fn active_copies(&self) -> usize {
        self.active
    }

    pub fn layers(&self) -> &[UnisonLayer] {
        &self.layers[..self.active]
    }

    pub fn key(&self) -> f32 {
        self.key
    }

    pub fn reset(&mut self) {
        for layer in &mut self.layers {
            layer.reset();
        }
    }
}

impl Default for OscillatorEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::{OscillatorUnit, Waveform};

    const BLOCK: usize = 256;

    fn spec() -> ProcessSpec {
        ProcessSpec::new(48_000.0, BLOCK, 2)
    }

    fn single_part_params(waveform: Waveform, transpose: i32) -> [OscillatorParams; 3] {
        let mut params = [OscillatorParams::default(); 3];
        params[0].waveform = waveform;
        params[0].transpose = transpose;
        params[1].mix = 0.0;
        params[2].mix = 0.0;
        params
    }

    #[test]
    fn one_copy_matches_lone_oscillator() {
        for waveform in Waveform::ALL {
            let params = single_part_params(waveform, 7);

            let mut engine = OscillatorEngine::new();
            engine.prepare(&spec());
            engine.set_unison(1, 0.5);
            engine.apply_params(&params);
            engine.note_on(57);

            let mut unit = OscillatorUnit::new();
            unit.prepare(&spec());
            unit.set_waveform(waveform);
            unit.set_transpose(7);
            unit.set_pitch(57.0);
            unit.retrigger(0.0);

            for _ in 0..4 {
                let mut from_engine = AudioBuffer::new(2, BLOCK);
                engine.render(&mut from_engine, BLOCK);

                let mut from_unit = AudioBuffer::new(2, BLOCK);
                unit.render(&mut from_unit, BLOCK);

                for ch in 0..2 {
                    let a = from_engine.channel(ch);
                    let b = from_unit.channel(ch);
                    for (x, y) in a.iter().zip(b) {
                        assert_eq!(x.to_bits(), y.to_bits(), "{waveform:?} differs");
                    }
                }
            }
        }
    }

    #[test]
    fn equal_weights_below_floor_keep_their_level() {
        let mut params = [OscillatorParams::default(); 3];
        for osc in &mut params {
            osc.waveform = Waveform::Square;
            osc.mix = 0.3;
        }

        let mut engine = OscillatorEngine::new();
        engine.prepare(&spec());
        engine.apply_params(&params);
        engine.note_on(60);

        let mut out = AudioBuffer::new(2, BLOCK);
        engine.render(&mut out, BLOCK);

        let peak = out.magnitude(0, BLOCK);
        assert!(peak <= 0.9 + 1e-5, "peak {peak}");
        assert!(peak > 0.89, "weights must not be renormalized up: {peak}");
    }

    #[test]
    fn unison_count_is_clamped() {
        let mut engine = OscillatorEngine::new();
        engine.set_unison(0, 0.1);
        assert_eq!(engine.active_copies(), 1);
        engine.set_unison(40, 0.1);
        assert_eq!(engine.active_copies(), MAX_UNISON);
    }

    #[test]
    fn active_copies_are_spread_across_the_field() {
        let mut engine = OscillatorEngine::new();
        engine.set_unison(5, 0.4);
        engine.note_on(62);
        assert_eq!(engine.key(), 62.0);

        let layers = engine.layers();
        assert_eq!(layers.len(), 5);
        for (i, layer) in layers.iter().enumerate() {
            assert_eq!(layer.spread(), UnisonSpread::for_copy(i, 5, 0.4));
        }
        assert_eq!(layers[0].spread().pan, -0.5);
        assert_eq!(layers[4].spread().pan, 0.5);

        engine.set_unison(1, 0.4);
        assert_eq!(engine.layers().len(), 1);
    }

    #[test]
    fn copies_sum_without_normalization() {
        let params = single_part_params(Waveform::Square, 0);

        let mut engine = OscillatorEngine::new();
        engine.prepare(&spec());
        engine.set_unison(4, 0.0);
        engine.apply_params(&params);
        engine.note_on(60);

        let mut out = AudioBuffer::new(2, BLOCK);
        engine.render(&mut out, BLOCK);

        // Zero detune: copies differ only in phase seed and pan.
        assert!(out.magnitude(0, BLOCK) > 1.0);
    }

    #[test]
    fn render_is_additive() {
        let params = single_part_params(Waveform::Sine, 0);
        let mut engine = OscillatorEngine::new();
        engine.prepare(&spec());
        engine.apply_params(&params);
        engine.note_on(60);

        let mut out = AudioBuffer::new(2, BLOCK);
        out.channel_mut(0).fill(10.0);
        engine.render(&mut out, BLOCK);
        assert!(out.channel(0).iter().all(|&s| s >= 9.0));
    }
}
