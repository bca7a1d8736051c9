use crate::dsp::{
    amplify::apply_gain,
    buffer::AudioBuffer,
    node::{ProcessSpec, Stage},
};

/*
Balanced Panning
================

A balance control rather than a constant-power pan: at the center both
channels pass untouched, and moving off-center only ATTENUATES the far side.

    pan    -1.0   -0.5    0.0   +0.5   +1.0
    left    1.0    1.0    1.0    0.5    0.0
    right   0.0    0.5    1.0    1.0    1.0

    left  = min(1, 1 - pan)
    right = min(1, 1 + pan)

A centered source therefore keeps its full level, which matters for the
single-copy case: one unison copy at pan 0 renders exactly like an unpanned
oscillator. Mono buffers are left alone.
*/

#[derive(Debug, Clone, Copy)]
pub struct Panner {
    pan: f32,
    left: f32,
    right: f32,
}

impl Panner {
    pub fn new() -> Self {
        Self {
            pan: 0.0,
            left: 1.0,
            right: 1.0,
        }
    }

    /// Set position in [-1, 1]; values outside are clamped.
    pub fn set_pan(&mut self, pan: f32) {
        let pan = pan.clamp(-1.0, 1.0);
        self.pan = pan;
        self.left = (1.0 - pan).min(1.0);
        self.right = (1.0 + pan).min(1.0);
    }

    pub fn pan(&self) -> f32 {
        self.pan
    }

    /// Current (left, right) gains.
    pub fn gains(&self) -> (f32, f32) {
        (self.left, self.right)
    }
}

impl Default for Panner {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for Panner {
    fn prepare(&mut self, _spec: &ProcessSpec) {}

    fn process(&mut self, buffer: &mut AudioBuffer, num_samples: usize) {
        if buffer.num_channels() != 2 {
            return;
        }
        apply_gain(&mut buffer.channel_mut(0)[..num_samples], self.left);
        apply_gain(&mut buffer.channel_mut(1)[..num_samples], self.right);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_is_unity() {
        let panner = Panner::new();
        assert_eq!(panner.gains(), (1.0, 1.0));
    }

    #[test]
    fn hard_left_and_right() {
        let mut panner = Panner::new();
        panner.set_pan(-1.0);
        assert_eq!(panner.gains(), (1.0, 0.0));
        panner.set_pan(1.0);
        assert_eq!(panner.gains(), (0.0, 1.0));
    }

    #[test]
    fn half_pan_attenuates_far_side() {
        let mut panner = Panner::new();
        panner.set_pan(-0.5);
        assert_eq!(panner.gains(), (1.0, 0.5));
    }

    #[test]
    fn out_of_range_is_clamped() {
        let mut panner = Panner::new();
        panner.set_pan(3.0);
        assert_eq!(panner.pan(), 1.0);
    }

    #[test]
    fn mono_buffer_untouched() {
        let mut panner = Panner::new();
        panner.set_pan(1.0);
        let mut buffer = AudioBuffer::new(1, 4);
        buffer.channel_mut(0).fill(0.5);
        panner.process(&mut buffer, 4);
        assert!(buffer.channel(0).iter().all(|&s| s == 0.5));
    }

    #[test]
    fn stereo_buffer_scaled() {
        let mut panner = Panner::new();
        panner.set_pan(0.5);
        let mut buffer = AudioBuffer::new(2, 2);
        buffer.channel_mut(0).fill(1.0);
        buffer.channel_mut(1).fill(1.0);
        panner.process(&mut buffer, 2);
        assert_eq!(buffer.channel(0), &[0.5, 0.5]);
        assert_eq!(buffer.channel(1), &[1.0, 1.0]);
    }
}
