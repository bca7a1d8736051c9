//! Pluck - short, percussive and bright.
//!
//! # How It Works
//!
//! 1. A square and an inverted triangle an octave up give a hollow,
//!    woody attack
//! 2. Zero sustain: the note dies away during the decay even while the key
//!    is held, and the voice is freed as soon as the key is released
//! 3. Two slightly detuned copies for a touch of width

use crate::{
    dsp::Waveform,
    synth::{EnvelopeParams, OscillatorParams, SynthParams},
};

pub fn pluck() -> SynthParams {
    SynthParams {
        envelope: EnvelopeParams {
            attack: 0.002,
            decay: 0.35,
            sustain: 0.0,
            release: 0.1,
        },
        oscillators: [
            OscillatorParams {
                waveform: Waveform::Square,
                mix: 0.7,
                ..OscillatorParams::default()
            },
            OscillatorParams {
                waveform: Waveform::Triangle,
                transpose: 12,
                mix: 0.5,
                invert: true,
                ..OscillatorParams::default()
            },
            OscillatorParams {
                mix: 0.0,
                ..OscillatorParams::default()
            },
        ],
        unison_voices: 1,
        unison_detune: 0.1,
        gain: 0.5,
    }
}
