//! Parameter snapshot applied to every voice at a block boundary.
//!
//! A `SynthParams` value is plain `Copy` data. The control side builds one,
//! clamps it with [`SynthParams::sanitized`] and sends it across; the audio
//! side applies it between blocks and never sees a half-updated set.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::{EnvelopeShape, Waveform};

/// Number of oscillator parts in each unison copy.
pub const NUM_OSCILLATORS: usize = 3;

/// Largest displayed unison value; the engine runs one more copy than shown.
pub const MAX_UNISON_VOICES: u8 = 16;

pub const MAX_ENVELOPE_SECONDS: f32 = 5.0;
pub const MAX_TRANSPOSE: i32 = 24;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeParams {
    pub attack: f32,  // seconds
    pub decay: f32,   // seconds
    pub sustain: f32, // linear level
    pub release: f32, // seconds
}

impl EnvelopeParams {
    pub fn shape(&self) -> EnvelopeShape {
        EnvelopeShape::new(self.attack, self.decay, self.sustain, self.release)
    }

    pub fn sanitized(&self) -> Self {
        Self {
            attack: clamp_finite(self.attack, 0.0, MAX_ENVELOPE_SECONDS, 0.2),
            decay: clamp_finite(self.decay, 0.0, MAX_ENVELOPE_SECONDS, 0.5),
            sustain: clamp_finite(self.sustain, 0.0, 1.0, 1.0),
            release: clamp_finite(self.release, 0.0, MAX_ENVELOPE_SECONDS, 0.5),
        }
    }
}

impl Default for EnvelopeParams {
    fn default() -> Self {
        Self {
            attack: 0.2,
            decay: 0.5,
            sustain: 1.0,
            release: 0.5,
        }
    }
}

/// Settings for one of the three oscillator parts.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorParams {
    pub waveform: Waveform,
    /// Semitones, [-24, 24].
    pub transpose: i32,
    /// Mix weight, [0, 1]. Weights are normalized per copy when they sum above 1.
    pub mix: f32,
    /// Phase offset in cycles, [0, 1).
    pub phase: f32,
    /// Pan added on top of the unison spread, [-1, 1].
    pub stereo: f32,
    pub invert: bool,
}

impl OscillatorParams {
    pub fn sanitized(&self) -> Self {
        let phase = if self.phase.is_finite() {
            self.phase.rem_euclid(1.0)
        } else {
            0.0
        };
        Self {
            waveform: self.waveform,
            transpose: self.transpose.clamp(-MAX_TRANSPOSE, MAX_TRANSPOSE),
            mix: clamp_finite(self.mix, 0.0, 1.0, 1.0),
            // rem_euclid can round up to exactly 1.0
            phase: if phase >= 1.0 { 0.0 } else { phase },
            stereo: clamp_finite(self.stereo, -1.0, 1.0, 0.0),
            invert: self.invert,
        }
    }
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            transpose: 0,
            mix: 1.0,
            phase: 0.0,
            stereo: 0.0,
            invert: false,
        }
    }
}

/// The complete control state of the synth.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthParams {
    pub envelope: EnvelopeParams,
    pub oscillators: [OscillatorParams; NUM_OSCILLATORS],
    /// Displayed unison value, [0, 16]. See [`SynthParams::unison_count`].
    pub unison_voices: u8,
    /// Total detune spread in semitones, [0, 1].
    pub unison_detune: f32,
    /// Voice output gain, [0, 1].
    pub gain: f32,
}

impl SynthParams {
    /// Number of unison copies each voice renders (displayed value + 1).
    pub fn unison_count(&self) -> usize {
        self.unison_voices.min(MAX_UNISON_VOICES) as usize + 1
    }

    /// Clamp every field into its documented range.
    ///
    /// Non-finite floats fall back to the parameter's default.
    pub fn sanitized(&self) -> Self {
        Self {
            envelope: self.envelope.sanitized(),
            oscillators: self.oscillators.map(|osc| osc.sanitized()),
            unison_voices: self.unison_voices.min(MAX_UNISON_VOICES),
            unison_detune: clamp_finite(self.unison_detune, 0.0, 1.0, 0.07),
            gain: clamp_finite(self.gain, 0.0, 1.0, 0.5),
        }
    }

    /// Read a parameter by its host id. Booleans read as 0/1, waveforms as their index.
    pub fn value(&self, id: &str) -> Option<f32> {
        let value = match id {
            "ENV_ATTACK" => self.envelope.attack,
            "ENV_DECAY" => self.envelope.decay,
            "ENV_SUSTAIN" => self.envelope.sustain,
            "ENV_RELEASE" => self.envelope.release,
            "UNISON_VOICES" => self.unison_voices as f32,
            "UNISON_DETUNE" => self.unison_detune,
            "MISC_GAIN" => self.gain,
            _ => {
                let (index, field) = split_oscillator_id(id)?;
                let osc = &self.oscillators[index];
                match field {
                    "SHAPE" => osc.waveform.index() as f32,
                    "PHASE" => osc.phase,
                    "INVERT" => f32::from(u8::from(osc.invert)),
                    "TRANSPOSE" => osc.transpose as f32,
                    "STEREO" => osc.stereo,
                    "MIX" => osc.mix,
                    _ => return None,
                }
            }
        };
        Some(value)
    }

    /// Write a parameter by its host id, clamping to its range.
    ///
    /// Returns `false` for an unknown id.
    pub fn set_value(&mut self, id: &str, value: f32) -> bool {
        let Some(info) = param_info(id) else {
            return false;
        };
        let value = info.clamp(value);

        match id {
            "ENV_ATTACK" => self.envelope.attack = value,
            "ENV_DECAY" => self.envelope.decay = value,
            "ENV_SUSTAIN" => self.envelope.sustain = value,
            "ENV_RELEASE" => self.envelope.release = value,
            "UNISON_VOICES" => self.unison_voices = value.round() as u8,
            "UNISON_DETUNE" => self.unison_detune = value,
            "MISC_GAIN" => self.gain = value,
            _ => {
                let Some((index, field)) = split_oscillator_id(id) else {
                    return false;
                };
                let osc = &mut self.oscillators[index];
                match field {
                    "SHAPE" => {
                        osc.waveform =
                            Waveform::from_index(value.round() as usize).unwrap_or_default()
                    }
                    "PHASE" => osc.phase = if value >= 1.0 { 0.0 } else { value },
                    "INVERT" => osc.invert = value >= 0.5,
                    "TRANSPOSE" => osc.transpose = value.round() as i32,
                    "STEREO" => osc.stereo = value,
                    "MIX" => osc.mix = value,
                    _ => return false,
                }
            }
        }
        true
    }
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            envelope: EnvelopeParams::default(),
            oscillators: [OscillatorParams::default(); NUM_OSCILLATORS],
            unison_voices: 0,
            unison_detune: 0.07,
            gain: 0.5,
        }
    }
}

fn clamp_finite(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

/// "OSC2_MIX" → (1, "MIX")
fn split_oscillator_id(id: &str) -> Option<(usize, &str)> {
    let rest = id.strip_prefix("OSC")?;
    let (number, field) = rest.split_once('_')?;
    let index = number.parse::<usize>().ok()?.checked_sub(1)?;
    (index < NUM_OSCILLATORS).then_some((index, field))
}

/// Host-facing description of one automatable parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
    pub default: f32,
    /// Integer-valued (choice, toggle or semitone) parameter.
    pub stepped: bool,
}

impl ParamInfo {
    pub fn clamp(&self, value: f32) -> f32 {
        clamp_finite(value, self.min, self.max, self.default)
    }
}

const fn param(
    id: &'static str,
    name: &'static str,
    min: f32,
    max: f32,
    default: f32,
    stepped: bool,
) -> ParamInfo {
    ParamInfo {
        id,
        name,
        min,
        max,
        default,
        stepped,
    }
}

macro_rules! oscillator_params {
    ($n:literal) => {
        [
            param(concat!("OSC", $n, "_SHAPE"), concat!("Osc ", $n, " Shape"), 0.0, 4.0, 0.0, true),
            param(concat!("OSC", $n, "_PHASE"), concat!("Osc ", $n, " Phase"), 0.0, 1.0, 0.0, false),
            param(concat!("OSC", $n, "_INVERT"), concat!("Osc ", $n, " Invert"), 0.0, 1.0, 0.0, true),
            param(concat!("OSC", $n, "_TRANSPOSE"), concat!("Osc ", $n, " Transpose"), -24.0, 24.0, 0.0, true),
            param(concat!("OSC", $n, "_STEREO"), concat!("Osc ", $n, " Stereo"), -1.0, 1.0, 0.0, false),
            param(concat!("OSC", $n, "_MIX"), concat!("Osc ", $n, " Mix"), 0.0, 1.0, 1.0, false),
        ]
    };
}

static ENGINE_PARAMS: [ParamInfo; 7] = [
    param("ENV_ATTACK", "Attack", 0.0, MAX_ENVELOPE_SECONDS, 0.2, false),
    param("ENV_DECAY", "Decay", 0.0, MAX_ENVELOPE_SECONDS, 0.5, false),
    param("ENV_SUSTAIN", "Sustain", 0.0, 1.0, 1.0, false),
    param("ENV_RELEASE", "Release", 0.0, MAX_ENVELOPE_SECONDS, 0.5, false),
    param("UNISON_VOICES", "Unison Voices", 0.0, 16.0, 0.0, true),
    param("UNISON_DETUNE", "Unison Detune", 0.0, 1.0, 0.07, false),
    param("MISC_GAIN", "Gain", 0.0, 1.0, 0.5, false),
];

static OSC1_PARAMS: [ParamInfo; 6] = oscillator_params!("1");
static OSC2_PARAMS: [ParamInfo; 6] = oscillator_params!("2");
static OSC3_PARAMS: [ParamInfo; 6] = oscillator_params!("3");

/// Every automatable parameter, engine-level first, then per oscillator.
pub fn param_table() -> impl Iterator<Item = &'static ParamInfo> {
    ENGINE_PARAMS
        .iter()
        .chain(OSC1_PARAMS.iter())
        .chain(OSC2_PARAMS.iter())
        .chain(OSC3_PARAMS.iter())
}

pub fn param_info(id: &str) -> Option<&'static ParamInfo> {
    param_table().find(|info| info.id == id)
}
