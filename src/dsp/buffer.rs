//! Owned, non-interleaved sample storage.
//!
//! One `Vec<f32>` per channel, sized once by `set_size` during prepare and
//! then only sliced. Every method that takes a `start`/`len` range works on
//! that window and leaves the rest of the buffer untouched.

use crate::dsp::amplify;

#[derive(Debug, Clone, Default)]
pub struct AudioBuffer {
    channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    pub fn new(num_channels: usize, num_samples: usize) -> Self {
        Self {
            channels: vec![vec![0.0; num_samples]; num_channels],
        }
    }

    /// Resize and zero. Allocates, so call it from setup code only.
    pub fn set_size(&mut self, num_channels: usize, num_samples: usize) {
        self.channels.resize_with(num_channels, Vec::new);
        for channel in &mut self.channels {
            channel.clear();
            channel.resize(num_samples, 0.0);
        }
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn num_samples(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn channel(&self, channel: usize) -> &[f32] {
        &self.channels[channel]
    }

    pub fn channel_mut(&mut self, channel: usize) -> &mut [f32] {
        &mut self.channels[channel]
    }

    pub fn channels_mut(&mut self) -> impl Iterator<Item = &mut [f32]> {
        self.channels.iter_mut().map(Vec::as_mut_slice)
    }

    /// Zero `len` samples starting at `start` on every channel.
    pub fn clear(&mut self, start: usize, len: usize) {
        for channel in &mut self.channels {
            channel[start..start + len].fill(0.0);
        }
    }

    /// Copy the first `len` samples of channel 0 into every other channel.
    pub fn duplicate_first_channel(&mut self, len: usize) {
        if let Some((first, rest)) = self.channels.split_first_mut() {
            for channel in rest {
                channel[..len].copy_from_slice(&first[..len]);
            }
        }
    }

    /// Add the first `len` samples of `source` into this buffer at `start`.
    ///
    /// Channels are matched by index; extra channels on either side are
    /// ignored.
    pub fn add_from(&mut self, source: &AudioBuffer, start: usize, len: usize) {
        for (dst, src) in self.channels.iter_mut().zip(&source.channels) {
            for (d, &s) in dst[start..start + len].iter_mut().zip(&src[..len]) {
                *d += s;
            }
        }
    }

    /// Multiply a window of every channel by a constant gain.
    pub fn apply_gain(&mut self, start: usize, len: usize, gain: f32) {
        for channel in &mut self.channels {
            amplify::apply_gain(&mut channel[start..start + len], gain);
        }
    }

    /// Multiply a window of every channel by a linear ramp from `from` to `to`.
    pub fn apply_gain_ramp(&mut self, start: usize, len: usize, from: f32, to: f32) {
        for channel in &mut self.channels {
            amplify::apply_gain_ramp(&mut channel[start..start + len], from, to);
        }
    }

    /// Largest absolute sample value in a window across all channels.
    pub fn magnitude(&self, start: usize, len: usize) -> f32 {
        self.channels
            .iter()
            .flat_map(|c| c[start..start + len].iter())
            .fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    /// Interleave `len` frames into `out`, which has `out_channels` per frame.
    ///
    /// A mono buffer is copied to every output channel; output channels
    /// beyond this buffer's count repeat the last channel.
    pub fn write_interleaved(&self, len: usize, out: &mut [f32], out_channels: usize) {
        let Some(last) = self.channels.len().checked_sub(1) else {
            out.fill(0.0);
            return;
        };
        for (frame_index, frame) in out.chunks_mut(out_channels).take(len).enumerate() {
            for (ch, sample) in frame.iter_mut().enumerate() {
                *sample = self.channels[ch.min(last)][frame_index];
            }
        }
    }
}
