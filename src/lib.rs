pub mod config;
pub mod dsp; // Allocation-free building blocks
pub mod error;
pub mod presets; // Factory patches
pub mod synth; // Voices, unison engine and the voice pool

pub use config::{EngineConfig, Settings};
pub use error::EngineError;
pub use synth::{SynthParams, VoicePool};

/// Largest block the engine will prepare for. Longer render requests are
/// split into chunks of the prepared size.
pub const MAX_BLOCK_SIZE: usize = 2048;
