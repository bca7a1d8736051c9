use crate::{
    dsp::{
        amplify::Gain, AudioBuffer, EnvelopeGenerator, EnvelopeShape, EnvelopeState, ProcessSpec,
        Stage,
    },
    synth::{oscillator_engine::OscillatorEngine, params::SynthParams},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,      // Available for allocation
    Active,    // Playing, envelope in attack/decay/sustain
    Releasing, // Key released, envelope in release phase
}

/// A single voice: oscillator bank, output gain and envelope.
///
/// The envelope shape is not owned; the pool passes its shared shape into
/// every call that needs it.
#[derive(Debug, Clone)]
pub struct Voice {
    note: u8,
    velocity: f32,
    state: VoiceState,
    age: u64,
    oscillators: OscillatorEngine,
    output_gain: Gain,
    envelope: EnvelopeGenerator,
    scratch: AudioBuffer,
}

impl Voice {
    pub fn new() -> Self {
        Self {
            note: 0,
            velocity: 0.0,
            state: VoiceState::Free,
            age: 0,
            oscillators: OscillatorEngine::new(),
            output_gain: Gain::default(),
            envelope: EnvelopeGenerator::new(),
            scratch: AudioBuffer::default(),
        }
    }

    /// Size buffers and smoothers. Allocates; call from setup code only.
    pub fn prepare(&mut self, spec: &ProcessSpec) {
        self.scratch.set_size(spec.num_channels, spec.max_block_size);
        self.oscillators.prepare(spec);
        self.output_gain.prepare(spec);
        self.envelope.set_sample_rate(spec.sample_rate);
    }

    /// Apply a parameter snapshot. The envelope shape is applied by the pool.
    pub fn apply_params(&mut self, params: &SynthParams) {
        self.oscillators
            .set_unison(params.unison_count(), params.unison_detune);
        self.oscillators.apply_params(&params.oscillators);
        self.output_gain.set_gain_linear(params.gain);
    }

    /// Start (or restart) a note.
    ///
    /// Velocity is recorded for the host but does not scale the output.
    /// A free voice starts from silence; a stolen one ramps from its
    /// current envelope gain.
    pub fn start(&mut self, note: u8, velocity: f32, age: u64) {
        if self.state == VoiceState::Free {
            self.output_gain.reset();
            self.envelope.reset();
        }
        self.note = note;
        self.velocity = velocity;
        self.state = VoiceState::Active;
        self.age = age;

        self.oscillators.note_on(note);
        self.envelope.note_on();
    }

    /// Release the note.
    ///
    /// With `allow_tail_off` an active voice enters its release stage.
    /// Without it the voice is silenced and freed immediately.
    pub fn stop(&mut self, shape: Option<&EnvelopeShape>, allow_tail_off: bool) {
        if !allow_tail_off {
            self.envelope.reset();
            self.free();
            return;
        }
        if self.state == VoiceState::Active {
            self.state = VoiceState::Releasing;
            self.envelope.note_off(shape);
        }
    }

    /// Render `num_samples` frames and add them into `out` at `start`.
    pub fn render_block(
        &mut self,
        shape: Option<&EnvelopeShape>,
        out: &mut AudioBuffer,
        start: usize,
        num_samples: usize,
    ) {
        if self.is_free() {
            return;
        }

        self.scratch.clear(0, num_samples);
        self.oscillators.render(&mut self.scratch, num_samples);
        self.output_gain.process(&mut self.scratch, num_samples);
        self.envelope
            .apply_to_buffer(shape, &mut self.scratch, num_samples);
        out.add_from(&self.scratch, start, num_samples);

        if !self.envelope.is_active() {
            self.free();
        }
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    /// Holding a note or ringing out an audible release.
    ///
    /// A silent release counts as inactive right away, one block before the
    /// voice is freed.
    pub fn is_active(&self) -> bool {
        !self.is_free() && self.envelope.is_active()
    }

    pub fn free(&mut self) {
        self.state = VoiceState::Free;
        self.note = 0;
        self.velocity = 0.0;
    }

    pub fn note(&self) -> u8 {
        self.note
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn envelope_state(&self) -> EnvelopeState {
        self.envelope.state()
    }

    /// Envelope gain at the end of the last rendered block.
    pub fn envelope_level(&self) -> f32 {
        self.envelope.gain()
    }

    pub fn oscillators(&self) -> &OscillatorEngine {
        &self.oscillators
    }

    /// Hard reset: free, silent, phases at zero.
    pub fn reset(&mut self) {
        self.envelope.reset();
        self.oscillators.reset();
        self.output_gain.reset();
        self.free();
    }
}

impl Default for Voice {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: usize = 128;

    fn prepared_voice(params: &SynthParams) -> Voice {
        let mut voice = Voice::new();
        voice.prepare(&ProcessSpec::new(48_000.0, BLOCK, 2));
        voice.apply_params(params);
        voice
    }

    fn render(voice: &mut Voice, shape: &EnvelopeShape) -> AudioBuffer {
        let mut out = AudioBuffer::new(2, BLOCK);
        voice.render_block(Some(shape), &mut out, 0, BLOCK);
        out
    }

    #[test]
    fn free_voice_writes_nothing() {
        let params = SynthParams::default();
        let mut voice = prepared_voice(&params);
        let mut out = AudioBuffer::new(2, BLOCK);
        out.channel_mut(0).fill(0.25);

        voice.render_block(Some(&params.envelope.shape()), &mut out, 0, BLOCK);
        assert!(out.channel(0).iter().all(|&s| s == 0.25));
    }

    #[test]
    fn start_makes_sound() {
        let mut params = SynthParams::default();
        params.envelope.attack = 0.0;
        let shape = params.envelope.shape();
        let mut voice = prepared_voice(&params);

        voice.start(69, 0.8, 0);
        assert_eq!(voice.state(), VoiceState::Active);
        assert_eq!(voice.velocity(), 0.8);

        render(&mut voice, &shape); // ramp from 0
        let out = render(&mut voice, &shape);
        assert!(out.magnitude(0, BLOCK) > 0.3);
    }

    #[test]
    fn stop_without_tail_frees_immediately() {
        let params = SynthParams::default();
        let shape = params.envelope.shape();
        let mut voice = prepared_voice(&params);
        voice.start(60, 1.0, 0);
        render(&mut voice, &shape);

        voice.stop(Some(&shape), false);
        assert!(voice.is_free());
        assert_eq!(voice.envelope_state(), EnvelopeState::Idle);

        let out = render(&mut voice, &shape);
        assert_eq!(out.magnitude(0, BLOCK), 0.0);
    }

    #[test]
    fn stop_with_tail_releases() {
        let mut params = SynthParams::default();
        params.envelope.release = 0.01;
        let shape = params.envelope.shape();
        let mut voice = prepared_voice(&params);
        voice.start(60, 1.0, 0);
        render(&mut voice, &shape);

        voice.stop(Some(&shape), true);
        assert_eq!(voice.state(), VoiceState::Releasing);

        // 10 ms release is shorter than four blocks
        for _ in 0..4 {
            render(&mut voice, &shape);
        }
        assert!(voice.is_free());
    }

    #[test]
    fn zero_sustain_release_frees_after_one_block() {
        let mut params = SynthParams::default();
        params.envelope.sustain = 0.0;
        params.envelope.release = 3.0;
        let shape = params.envelope.shape();
        let mut voice = prepared_voice(&params);
        voice.start(60, 1.0, 0);
        render(&mut voice, &shape);

        voice.stop(Some(&shape), true);
        assert_eq!(voice.state(), VoiceState::Releasing);
        assert!(!voice.is_active());
        render(&mut voice, &shape);
        assert!(voice.is_free());
    }

    #[test]
    fn freed_voice_restarts_from_silence() {
        let mut params = SynthParams::default();
        params.envelope.attack = 0.01;
        params.envelope.decay = 2.0;
        params.envelope.sustain = 0.0;
        params.envelope.release = 1.0;
        params.oscillators[0].waveform = crate::dsp::Waveform::Square;
        let shape = params.envelope.shape();
        let mut voice = prepared_voice(&params);
        voice.start(60, 1.0, 0);
        for _ in 0..6 {
            render(&mut voice, &shape);
        }
        voice.stop(Some(&shape), true);
        render(&mut voice, &shape);
        assert!(voice.is_free());
        assert!(voice.envelope_level() > 0.5, "freed mid-decay");

        voice.start(64, 1.0, 1);
        assert_eq!(voice.envelope_level(), 0.0);
        let out = render(&mut voice, &shape);
        assert!(out.channel(0)[0].abs() < 1e-3);
        assert!(out.magnitude(0, 16) < 0.05);
    }

    #[test]
    fn missing_shape_silences_and_frees() {
        let params = SynthParams::default();
        let mut voice = prepared_voice(&params);
        voice.start(60, 1.0, 0);

        let mut out = AudioBuffer::new(2, BLOCK);
        voice.render_block(None, &mut out, 0, BLOCK);
        assert_eq!(out.magnitude(0, BLOCK), 0.0);
        assert!(voice.is_free());
    }

    #[test]
    fn renders_at_offset() {
        let mut params = SynthParams::default();
        params.envelope.attack = 0.0;
        let shape = params.envelope.shape();
        let mut voice = prepared_voice(&params);
        voice.start(60, 1.0, 0);
        render(&mut voice, &shape);

        let mut out = AudioBuffer::new(2, BLOCK * 2);
        voice.render_block(Some(&shape), &mut out, BLOCK, BLOCK);
        assert_eq!(out.magnitude(0, BLOCK), 0.0);
        assert!(out.magnitude(BLOCK, BLOCK) > 0.0);
    }
}
