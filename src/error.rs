//! Error types for setup and control-side operations.
//!
//! Nothing here is produced on the render path: `render_block` cannot fail.
//! Errors surface from `prepare`, configuration loading and the control
//! handle.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reported outside the audio callback.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Sample rate was zero, negative or not finite.
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(f32),

    /// Block size was zero or above the supported maximum.
    #[error("invalid block size {size}: must be between 1 and {max}")]
    InvalidBlockSize {
        /// Requested block size.
        size: usize,
        /// Largest block size the engine supports.
        max: usize,
    },

    /// Only mono and stereo output are supported.
    #[error("unsupported channel count {0}: expected 1 or 2")]
    UnsupportedChannelCount(usize),

    /// A voice pool needs at least one voice.
    #[error("voice pool must contain at least one voice")]
    NoVoices,

    /// Note number outside the MIDI range.
    #[error("note {0} is outside 0..=127")]
    InvalidNote(u8),

    /// The control queue to the audio thread is full.
    #[error("control queue is full")]
    QueueFull,

    /// Failed to read a settings file.
    #[error("failed to read settings file '{path}': {source}")]
    ReadSettings {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML settings.
    #[cfg(feature = "serde")]
    #[error("failed to parse settings: {0}")]
    ParseSettings(#[from] toml::de::Error),
}

impl EngineError {
    /// Create a settings read error.
    pub fn read_settings(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EngineError::ReadSettings {
            path: path.into(),
            source,
        }
    }
}
