use tracing::debug;

use crate::{
    config::EngineConfig,
    dsp::{AudioBuffer, EnvelopeShape, ProcessSpec},
    error::EngineError,
    synth::{
        message::{MessageReceiver, SynthMessage},
        params::SynthParams,
        voice::{Voice, VoiceState},
    },
};

/// Fixed-size polyphonic voice pool.
///
/// Owns every voice and the one envelope shape they all share. Nothing is
/// allocated after `prepare`; `render_block` and message handling are safe
/// to call from the audio thread.
#[derive(Debug, Clone)]
pub struct VoicePool {
    voices: Vec<Voice>,
    shape: EnvelopeShape,
    params: SynthParams,
    spec: Option<ProcessSpec>,
    frame_counter: u64,
}

impl VoicePool {
    pub fn new(num_voices: usize) -> Result<Self, EngineError> {
        if num_voices == 0 {
            return Err(EngineError::NoVoices);
        }
        let params = SynthParams::default();
        Ok(Self {
            voices: (0..num_voices).map(|_| Voice::new()).collect(),
            shape: params.envelope.shape(),
            params,
            spec: None,
            frame_counter: 0,
        })
    }

    /// Build and prepare a pool from engine settings.
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        let mut pool = Self::new(config.voices)?;
        pool.prepare(config.spec())?;
        Ok(pool)
    }

    /// Size every voice for `spec`. Allocates; call before rendering and
    /// whenever the sample rate or block size changes.
    pub fn prepare(&mut self, spec: ProcessSpec) -> Result<(), EngineError> {
        spec.validate()?;

        for voice in &mut self.voices {
            voice.reset();
            voice.prepare(&spec);
            voice.apply_params(&self.params);
        }
        self.spec = Some(spec);

        debug!(
            sample_rate = spec.sample_rate,
            max_block_size = spec.max_block_size,
            num_channels = spec.num_channels,
            voices = self.voices.len(),
            "voice pool prepared"
        );
        Ok(())
    }

    /// Apply a parameter snapshot to the shared shape and every voice.
    ///
    /// Ranges are not re-checked here; see [`SynthParams::sanitized`].
    pub fn apply_params(&mut self, params: SynthParams) {
        let env = params.envelope;
        self.shape
            .set_params(env.attack, env.decay, env.sustain, env.release);
        for voice in &mut self.voices {
            voice.apply_params(&params);
        }
        self.params = params;
    }

    /// Start a note on a free voice, else on the oldest releasing voice.
    /// When every voice is held the note is dropped.
    pub fn note_on(&mut self, note: u8, velocity: f32) {
        if note > 127 {
            return;
        }

        // A key struck again while still ringing gets a fresh voice.
        for voice in &mut self.voices {
            if voice.state() == VoiceState::Active && voice.note() == note {
                voice.stop(Some(&self.shape), true);
            }
        }

        let age = self.frame_counter;
        if let Some(voice) = self.allocate_voice() {
            voice.start(note, velocity, age);
        }
    }

    /// Release the voices holding `note`. Without tail-off, a voice already
    /// ringing out on that note is cut as well.
    pub fn note_off(&mut self, note: u8, allow_tail_off: bool) {
        for voice in &mut self.voices {
            let matches = match voice.state() {
                VoiceState::Active => true,
                VoiceState::Releasing => !allow_tail_off,
                VoiceState::Free => false,
            };
            if matches && voice.note() == note {
                voice.stop(Some(&self.shape), allow_tail_off);
            }
        }
    }

    /// Release every sounding voice. Without tail-off, releasing voices are
    /// cut too.
    pub fn all_notes_off(&mut self, allow_tail_off: bool) {
        for voice in &mut self.voices {
            if !voice.is_free() {
                voice.stop(Some(&self.shape), allow_tail_off);
            }
        }
    }

    pub fn handle_message(&mut self, message: SynthMessage) {
        match message {
            SynthMessage::NoteOn { note, velocity } => self.note_on(note, velocity),
            SynthMessage::NoteOff {
                note,
                allow_tail_off,
            } => self.note_off(note, allow_tail_off),
            SynthMessage::AllNotesOff { allow_tail_off } => self.all_notes_off(allow_tail_off),
            SynthMessage::Params(params) => self.apply_params(params),
        }
    }

    /// Drain every pending message. Call once per block, before rendering.
    pub fn process_messages<R: MessageReceiver>(&mut self, receiver: &mut R) {
        while let Some(message) = receiver.pop() {
            self.handle_message(message);
        }
    }

    /// Mix all active voices into `out[start..start + num_samples]`.
    ///
    /// Additive: `out` is not cleared. Requests longer than the prepared
    /// block size are rendered in chunks, and the range is clipped to the
    /// buffer. Does nothing before `prepare`.
    pub fn render_block(&mut self, out: &mut AudioBuffer, start: usize, num_samples: usize) {
        let Some(spec) = self.spec else {
            return;
        };

        let num_samples = num_samples.min(out.num_samples().saturating_sub(start));
        let mut offset = start;
        let mut remaining = num_samples;

        while remaining > 0 {
            let chunk = remaining.min(spec.max_block_size);
            for voice in &mut self.voices {
                voice.render_block(Some(&self.shape), out, offset, chunk);
            }
            offset += chunk;
            remaining -= chunk;
        }

        self.frame_counter += num_samples as u64;
    }

    /// Silence everything immediately and reset all voice state.
    pub fn reset(&mut self) {
        for voice in &mut self.voices {
            voice.reset();
        }
    }

    pub fn is_active(&self) -> bool {
        self.voices.iter().any(Voice::is_active)
    }

    pub fn active_voice_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn params(&self) -> &SynthParams {
        &self.params
    }

    pub fn envelope_shape(&self) -> &EnvelopeShape {
        &self.shape
    }

    pub fn spec(&self) -> Option<ProcessSpec> {
        self.spec
    }

    fn allocate_voice(&mut self) -> Option<&mut Voice> {
        // First pass: find free voice index
        let free_idx = self.voices.iter().position(Voice::is_free);
        if let Some(idx) = free_idx {
            return Some(&mut self.voices[idx]);
        }

        // Second pass: steal oldest releasing voice
        let steal_idx = self
            .voices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.state() == VoiceState::Releasing)
            .min_by_key(|(_, v)| v.age())
            .map(|(idx, _)| idx);

        steal_idx.map(|idx| &mut self.voices[idx])
    }
}
