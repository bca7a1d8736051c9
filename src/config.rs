//! Engine and patch settings.
//!
//! [`EngineConfig`] describes how the engine is prepared (sample rate,
//! block size, channels, polyphony). [`Settings`] pairs it with a patch and
//! can be loaded from TOML when the `serde` feature is enabled:
//!
//! ```toml
//! [engine]
//! sample_rate = 44100.0
//! voices = 16
//!
//! [patch]
//! unison_voices = 6
//! unison_detune = 0.3
//!
//! [patch.envelope]
//! attack = 0.01
//!
//! [[patch.oscillators]]
//! waveform = "saw"
//! ```
//!
//! Every field is optional and falls back to its default.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use std::path::Path;
#[cfg(feature = "serde")]
use tracing::info;

use crate::{dsp::ProcessSpec, error::EngineError, synth::SynthParams};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub sample_rate: f32,
    pub max_block_size: usize,
    pub num_channels: usize,
    /// Polyphony: number of voices in the pool.
    pub voices: usize,
}

impl EngineConfig {
    pub fn spec(&self) -> ProcessSpec {
        ProcessSpec::new(self.sample_rate, self.max_block_size, self.num_channels)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.voices == 0 {
            return Err(EngineError::NoVoices);
        }
        self.spec().validate()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            max_block_size: 512,
            num_channels: 2,
            voices: 8,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Settings {
    pub engine: EngineConfig,
    pub patch: SynthParams,
}

#[cfg(feature = "serde")]
impl Settings {
    /// Parse settings from a TOML string. The patch is sanitized and the
    /// engine section validated.
    pub fn from_toml_str(source: &str) -> Result<Self, EngineError> {
        let mut settings: Settings = toml::from_str(source)?;
        settings.engine.validate()?;
        settings.patch = settings.patch.sanitized();
        Ok(settings)
    }

    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let source =
            std::fs::read_to_string(path).map_err(|e| EngineError::read_settings(path, e))?;
        let settings = Self::from_toml_str(&source)?;

        info!(
            path = %path.display(),
            sample_rate = settings.engine.sample_rate,
            voices = settings.engine.voices,
            "loaded settings"
        );
        Ok(settings)
    }

    /// Serialize to TOML, e.g. to write out a starting file.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
