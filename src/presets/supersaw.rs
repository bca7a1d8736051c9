//! Supersaw - the classic trance lead/pad.
//!
//! # How It Works
//!
//! 1. All three parts are saws: one at pitch, one an octave down, one a
//!    fifth up for a little extra body
//! 2. Seven unison copies spread over a third of a semitone, which gives
//!    the characteristic shimmering beat
//! 3. The copies are also spread across the stereo field, so the patch is
//!    wide without any effects
//! 4. Fast attack, full sustain
//!
//! # Variations
//!
//! - More detune = wider and more out of tune
//! - Fewer copies = thinner, closer to a plain saw

use crate::{
    dsp::Waveform,
    synth::{EnvelopeParams, OscillatorParams, SynthParams},
};

pub fn supersaw() -> SynthParams {
    let saw = OscillatorParams {
        waveform: Waveform::Saw,
        ..OscillatorParams::default()
    };

    SynthParams {
        envelope: EnvelopeParams {
            attack: 0.01,
            decay: 0.3,
            sustain: 0.9,
            release: 0.4,
        },
        oscillators: [
            saw,
            OscillatorParams {
                transpose: -12,
                mix: 0.6,
                ..saw
            },
            OscillatorParams {
                transpose: 7,
                mix: 0.25,
                phase: 0.5,
                ..saw
            },
        ],
        unison_voices: 6,
        unison_detune: 0.35,
        gain: 0.25,
    }
}
