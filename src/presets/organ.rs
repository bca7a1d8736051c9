//! Organ - drawbar-style additive tone.
//!
//! Three sines at the fundamental, an octave up and an octave and a fifth
//! up, like pulling out the 8', 4' and 2 2/3' drawbars. The envelope is a
//! switch: instant on, instant off, full sustain. No unison.

use crate::{
    dsp::Waveform,
    synth::{EnvelopeParams, OscillatorParams, SynthParams},
};

pub fn organ() -> SynthParams {
    let sine = OscillatorParams {
        waveform: Waveform::Sine,
        ..OscillatorParams::default()
    };

    SynthParams {
        envelope: EnvelopeParams {
            attack: 0.005,
            decay: 0.0,
            sustain: 1.0,
            release: 0.05,
        },
        oscillators: [
            OscillatorParams { mix: 0.8, ..sine },
            OscillatorParams {
                transpose: 12,
                mix: 0.5,
                ..sine
            },
            OscillatorParams {
                transpose: 19,
                mix: 0.3,
                ..sine
            },
        ],
        unison_voices: 0,
        unison_detune: 0.0,
        gain: 0.6,
    }
}
