use crate::{dsp::buffer::AudioBuffer, error::EngineError, MAX_BLOCK_SIZE};

/// Convert a (possibly fractional) MIDI note number to frequency in Hz.
/// A4 = 440 Hz = MIDI note 69
#[inline]
pub fn note_frequency(note: f32) -> f32 {
    440.0 * 2.0_f32.powf((note - 69.0) / 12.0)
}

/// Everything a stage needs to size itself before rendering.
///
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - max_block_size: Largest number of samples passed to a single `process`
/// - num_channels: Output channels (1 = mono, 2 = stereo)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessSpec {
    pub sample_rate: f32,
    pub max_block_size: usize,
    pub num_channels: usize,
}

impl ProcessSpec {
    pub fn new(sample_rate: f32, max_block_size: usize, num_channels: usize) -> Self {
        Self {
            sample_rate,
            max_block_size,
            num_channels,
        }
    }

    /// Reject specs the engine cannot render with.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(EngineError::InvalidSampleRate(self.sample_rate));
        }
        if self.max_block_size == 0 || self.max_block_size > MAX_BLOCK_SIZE {
            return Err(EngineError::InvalidBlockSize {
                size: self.max_block_size,
                max: MAX_BLOCK_SIZE,
            });
        }
        if !(1..=2).contains(&self.num_channels) {
            return Err(EngineError::UnsupportedChannelCount(self.num_channels));
        }
        Ok(())
    }

    /// Duration of one sample in seconds.
    #[inline]
    pub fn sample_duration(&self) -> f32 {
        1.0 / self.sample_rate
    }
}

impl Default for ProcessSpec {
    fn default() -> Self {
        Self::new(48_000.0, 512, 2)
    }
}

/// One link in a fixed processing pipeline.
///
/// A stage works in place on the first `num_samples` frames of a buffer.
/// Stages are owned by value and invoked in a fixed order by their owner;
/// there is no graph or dynamic dispatch involved.
pub trait Stage: Send {
    /// Size internal state for the given spec. Not realtime-safe.
    fn prepare(&mut self, spec: &ProcessSpec);

    /// Process `num_samples` frames of `buffer` in place.
    fn process(&mut self, buffer: &mut AudioBuffer, num_samples: usize);

    /// Return to the state right after `prepare`.
    fn reset(&mut self) {}
}
