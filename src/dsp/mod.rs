//! Low-level DSP primitives used by the voice and unison layers.
//!
//! Everything here is allocation-free once prepared, so the types can live
//! directly inside voice structs and run on the audio thread. Buffers are
//! sized in `prepare`, never while rendering.

/// Gain stages and linear parameter smoothing.
pub mod amplify;
/// Owned multi-channel sample storage.
pub mod buffer;
/// Breakpoint ADSR shape and the per-voice envelope state machine.
pub mod envelope;
/// Processing spec and the `Stage` trait shared by all pipeline stages.
pub mod node;
/// Waveform generator and the three-stage oscillator unit.
pub mod oscillator;
/// Balanced stereo panner.
pub mod pan;
/// Static table of the five oscillator waveforms.
pub mod waveform;

pub use buffer::AudioBuffer;
pub use envelope::{EnvelopeGenerator, EnvelopeShape, EnvelopeState};
pub use node::{ProcessSpec, Stage};
pub use oscillator::OscillatorUnit;
pub use waveform::Waveform;
