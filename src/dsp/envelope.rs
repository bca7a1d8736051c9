use crate::dsp::buffer::AudioBuffer;

/*
Breakpoint ADSR Envelope
========================

The envelope controls a voice's loudness over the life of a note. It is
split into two pieces with very different lifetimes:

  EnvelopeShape      The curve itself: four numbers (attack, decay, sustain,
                     release) and the breakpoints derived from them. One
                     shape is shared read-only by every voice and rebuilt
                     when the parameter snapshot changes.

  EnvelopeGenerator  Per-voice runtime state: how long since note-on, which
                     stage we're in, and the gain reached at the end of the
                     last block.


Vocabulary
----------

  elapsed     Seconds since note-on. The generator advances it once per
              block by the block's duration.

  breakpoint  A time where one linear segment hands over to the next.
                decay_end   = attack + decay
                release_end = decay_end + release

  block rate  The gain is evaluated ONCE per block, at the block's end. The
              samples in between get a straight-line ramp from the previous
              block's gain. This is cheap and, as long as blocks are short
              compared to the segments, indistinguishable from per-sample
              evaluation.


The Shape
---------

  Gain
    1.0 ┐    ╱╲
        │   ╱  ╲
    S   │  ╱    ╲______________
        │ ╱                    ╲
    0.0 └╱──────────────────────╲──→ elapsed
         0   A   decay_end       release_end
                                 (after note-off)

  attack   (t < A):              0 → 1 over [0, A]
  decay    (A ≤ t < decay_end):  1 → S over [A, decay_end]
  sustain:                       S, for as long as the key is held
  release:                       1 → 0 over [decay_end, release_end],
                                 multiplied by the gain at note-off

A zero-length segment is an instantaneous jump to its end value. Nothing
ever divides by a segment length without checking it first.


The Release Trick
-----------------

Note-off doesn't start a new clock. It fast-forwards `elapsed` to
`decay_end`, where the release segment begins, and snapshots the current
gain. From then on:

    gain = release_start_gain × normalized_release(elapsed)

where normalized_release falls linearly 1 → 0 over the release time. So a
note released mid-attack at gain 0.3 fades from 0.3, not from the sustain
level, and no click is introduced.


The State Machine
-----------------

    ┌──────┐ note_on ┌───────────┐ t ≥ A  ┌──────────┐ t ≥ decay_end ┌────────────┐
    │ Idle │ ──────→ │ Attacking │ ─────→ │ Decaying │ ────────────→ │ Sustaining │
    └──────┘         └───────────┘        └──────────┘               └────────────┘
        ↑                  │ note_off           │ note_off                 │ note_off
        │                  ↓                    ↓                          ↓
        │            ┌─────────────────────────────────────────────────────────┐
        └─────────── │                       Releasing                         │
      t > release_end└─────────────────────────────────────────────────────────┘

With decay = 0 the generator goes straight from Attacking to Sustaining.


Silent Release
--------------

If the sustain level is 0, a released note is either already silent or
fading from an attack/decay gain that the sustain stage would have taken to
zero anyway. The generator reports itself inactive as soon as it enters
Releasing in that case, so the voice is freed at the end of the block
instead of rendering an inaudible tail.
*/

/// The stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,       // No note, gain = 0
    Attacking,  // Ramping 0 → 1
    Decaying,   // Ramping 1 → sustain
    Sustaining, // Holding sustain while the key is down
    Releasing,  // Key released, ramping toward 0
}

/// Shortest length reported by `display_length`, for drawing the curve.
const MIN_DISPLAY_LENGTH: f32 = 5.0;

/// Attack/decay/sustain/release breakpoints shared by every voice.
///
/// Times are in seconds and must be ≥ 0; sustain is a linear gain in
/// [0, 1]. Clamping is the caller's job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeShape {
    attack: f32,
    decay: f32,
    sustain: f32,
    release: f32,
    decay_end: f32,
    release_end: f32,
    display_length: f32,
}

impl EnvelopeShape {
    pub fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        let mut shape = Self {
            attack: 0.0,
            decay: 0.0,
            sustain: 0.0,
            release: 0.0,
            decay_end: 0.0,
            release_end: 0.0,
            display_length: MIN_DISPLAY_LENGTH,
        };
        shape.set_params(attack, decay, sustain, release);
        shape
    }

    /// Replace all four parameters and recompute the breakpoints.
    pub fn set_params(&mut self, attack: f32, decay: f32, sustain: f32, release: f32) {
        self.attack = attack;
        self.decay = decay;
        self.sustain = sustain;
        self.release = release;
        self.decay_end = attack + decay;
        self.release_end = self.decay_end + release;
        self.display_length = (attack + sustain + release).max(MIN_DISPLAY_LENGTH);
    }

    pub fn attack(&self) -> f32 {
        self.attack
    }

    pub fn decay(&self) -> f32 {
        self.decay
    }

    pub fn sustain(&self) -> f32 {
        self.sustain
    }

    pub fn release(&self) -> f32 {
        self.release
    }

    pub fn decay_end(&self) -> f32 {
        self.decay_end
    }

    pub fn release_end(&self) -> f32 {
        self.release_end
    }

    /// Horizontal extent for drawing the curve. Not used when rendering.
    pub fn display_length(&self) -> f32 {
        self.display_length
    }

    /// Attack segment: 0 → 1 over [0, attack].
    #[inline]
    pub fn attack_gain(&self, t: f32) -> f32 {
        if self.attack <= 0.0 {
            return 1.0;
        }
        (t / self.attack).clamp(0.0, 1.0)
    }

    /// Decay segment: 1 → sustain over [attack, decay_end].
    #[inline]
    pub fn decay_gain(&self, t: f32) -> f32 {
        if self.decay <= 0.0 {
            return self.sustain;
        }
        let progress = ((t - self.attack) / self.decay).clamp(0.0, 1.0);
        1.0 + (self.sustain - 1.0) * progress
    }

    /// Release segment before scaling: 1 → 0 over [decay_end, release_end].
    #[inline]
    pub fn normalized_release(&self, t: f32) -> f32 {
        if self.release <= 0.0 {
            return 0.0;
        }
        1.0 - ((t - self.decay_end) / self.release).clamp(0.0, 1.0)
    }

    /// Gain of a held note `t` seconds after note-on.
    pub fn value_at(&self, t: f32) -> f32 {
        if t < self.attack {
            self.attack_gain(t)
        } else if t < self.decay_end {
            self.decay_gain(t)
        } else {
            self.sustain
        }
    }
}

impl Default for EnvelopeShape {
    fn default() -> Self {
        Self::new(0.2, 0.5, 1.0, 0.5)
    }
}

/// Per-voice envelope state. Reads an [`EnvelopeShape`] borrowed on every call.
#[derive(Debug, Clone)]
pub struct EnvelopeGenerator {
    state: EnvelopeState,
    elapsed: f32,
    gain: f32,               // gain at the end of the last block
    release_start_gain: f32, // gain captured at note-off
    sustain: f32,            // sustain level from the last shape seen
    sample_duration: f32,
}

impl EnvelopeGenerator {
    pub fn new() -> Self {
        Self {
            state: EnvelopeState::Idle,
            elapsed: 0.0,
            gain: 0.0,
            release_start_gain: 0.0,
            sustain: 0.0,
            sample_duration: 1.0 / 48_000.0,
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_duration = 1.0 / sample_rate;
    }

    /// Gate high: restart the clock from the top of the attack.
    ///
    /// The gain is not reset, so a retriggered note ramps from wherever the
    /// previous note left off.
    pub fn note_on(&mut self) {
        self.elapsed = 0.0;
        self.state = EnvelopeState::Attacking;
    }

    /// Gate low: snapshot the gain and jump the clock to the release segment.
    ///
    /// Without a shape there is no release to run, so the generator goes
    /// straight to idle.
    pub fn note_off(&mut self, shape: Option<&EnvelopeShape>) {
        let Some(shape) = shape else {
            self.state = EnvelopeState::Idle;
            return;
        };

        self.release_start_gain = self.gain;
        self.elapsed = shape.decay_end();
        self.sustain = shape.sustain();
        self.state = EnvelopeState::Releasing;
    }

    /// Advance the clock by `seconds` and return the gain at the new time.
    ///
    /// Updates the state but not the stored gain; `apply_to_buffer` owns
    /// that so the ramp always starts from what was actually rendered.
    pub fn advance(&mut self, shape: Option<&EnvelopeShape>, seconds: f32) -> f32 {
        let Some(shape) = shape else {
            self.state = EnvelopeState::Idle;
            return 0.0;
        };

        self.elapsed += seconds;
        self.sustain = shape.sustain();

        match self.state {
            EnvelopeState::Idle => 0.0,

            // elapsed no longer matters once we get here
            EnvelopeState::Sustaining => shape.sustain(),

            EnvelopeState::Releasing => {
                if self.elapsed > shape.release_end() {
                    self.state = EnvelopeState::Idle;
                    0.0
                } else {
                    self.release_start_gain * shape.normalized_release(self.elapsed)
                }
            }

            EnvelopeState::Attacking | EnvelopeState::Decaying => {
                if self.elapsed < shape.attack() {
                    self.state = EnvelopeState::Attacking;
                    shape.attack_gain(self.elapsed)
                } else if self.elapsed < shape.decay_end() {
                    self.state = EnvelopeState::Decaying;
                    shape.decay_gain(self.elapsed)
                } else {
                    self.state = EnvelopeState::Sustaining;
                    shape.sustain()
                }
            }
        }
    }

    /// Advance by one block of `num_samples` and apply the gain ramp in place.
    ///
    /// When both ends of the ramp are exactly zero the window is cleared
    /// instead, which is cheaper and never produces denormals. A missing
    /// shape silences the block.
    pub fn apply_to_buffer(
        &mut self,
        shape: Option<&EnvelopeShape>,
        buffer: &mut AudioBuffer,
        num_samples: usize,
    ) {
        if shape.is_none() {
            self.state = EnvelopeState::Idle;
            self.gain = 0.0;
            buffer.clear(0, num_samples);
            return;
        }

        let target = self.advance(shape, num_samples as f32 * self.sample_duration);

        if self.gain == 0.0 && target == 0.0 {
            buffer.clear(0, num_samples);
        } else {
            buffer.apply_gain_ramp(0, num_samples, self.gain, target);
        }

        self.gain = target;
    }

    /// True while the envelope still has something audible to produce.
    ///
    /// False when idle, and also while releasing with a zero sustain level.
    pub fn is_active(&self) -> bool {
        let silent_release = self.state == EnvelopeState::Releasing && self.sustain == 0.0;
        self.state != EnvelopeState::Idle && !silent_release
    }

    /// Force idle with zero gain.
    pub fn reset(&mut self) {
        self.state = EnvelopeState::Idle;
        self.elapsed = 0.0;
        self.gain = 0.0;
        self.release_start_gain = 0.0;
    }

    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    /// Gain reached at the end of the last rendered block.
    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn release_start_gain(&self) -> f32 {
        self.release_start_gain
    }
}

impl Default for EnvelopeGenerator {
    fn default() -> Self {
        Self::new()
    }
}
