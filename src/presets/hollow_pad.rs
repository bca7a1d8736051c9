//! Hollow pad - slow, wide and a little strange.
//!
//! The sine-square hybrid has strong even harmonics, which sound hollow
//! next to a plain triangle. The two are panned to opposite sides and a
//! third part a fifth below is kept quiet and centered. Five copies with a
//! small detune keep it moving. Slow attack and long release.

use crate::{
    dsp::Waveform,
    synth::{EnvelopeParams, OscillatorParams, SynthParams},
};

pub fn hollow_pad() -> SynthParams {
    SynthParams {
        envelope: EnvelopeParams {
            attack: 0.8,
            decay: 1.0,
            sustain: 0.7,
            release: 1.5,
        },
        oscillators: [
            OscillatorParams {
                waveform: Waveform::SineSquare,
                mix: 0.5,
                stereo: -0.4,
                ..OscillatorParams::default()
            },
            OscillatorParams {
                waveform: Waveform::Triangle,
                mix: 0.5,
                phase: 0.25,
                stereo: 0.4,
                ..OscillatorParams::default()
            },
            OscillatorParams {
                waveform: Waveform::Sine,
                transpose: -5,
                mix: 0.2,
                ..OscillatorParams::default()
            },
        ],
        unison_voices: 4,
        unison_detune: 0.12,
        gain: 0.35,
    }
}
