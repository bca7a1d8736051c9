#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::f32::consts::{FRAC_PI_2, PI};

/*
Oscillator Waveforms
====================

Every waveform here is a pure function of phase, measured in radians over
one cycle [0, 2π). All five are aligned to the sine: they start at 0 (or at
the sine's sign) and rise through the first half cycle, so switching shapes
mid-note never shifts the wave in time.

  Sine          sin(φ)
                Pure fundamental, no overtones.

  Square        +1 on the first half cycle, -1 on the second.
                The sign of the sine. Odd harmonics at 1/n.

  Triangle      Straight lines through the sine's five landmarks
                (0, +1, 0, -1, 0 at φ = 0, π/2, π, 3π/2, 2π).
                Odd harmonics at 1/n², so much softer than the square.

  Saw           Rises 0 → 1 over the first half cycle, jumps to -1,
                rises -1 → 0 over the second half. A rising ramp phase-
                aligned so its zero crossing coincides with the sine's.

  SineSquare    First half cycle of the sine, then held at -1.
                A lopsided hybrid with a strong even-harmonic content.

     Sine        Square      Triangle      Saw        SineSquare
     ╭─╮         ┌──┐        ╱╲           ╱│ ╱        ╭─╮
    ╱   ╲   ╱    │  │       ╱  ╲  ╱      ╱ │╱        ╱   ╲
         ╲_╱        └──┘         ╲╱          ╵            ╲___


The shapes are not generated from parameters: the table below is fixed. The
parameter is which entry to read. Selecting an entry is an array index, so
changing shape per block allocates nothing and keeps the running phase.
*/

type WaveFn = fn(f32) -> f32;

static WAVE_TABLE: [WaveFn; 5] = [sine, square, triangle, saw, sine_square];

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Triangle,
    Saw,
    SineSquare,
}

impl Waveform {
    pub const ALL: [Waveform; 5] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Triangle,
        Waveform::Saw,
        Waveform::SineSquare,
    ];

    /// Host-facing shape index (0..=4).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Evaluate this waveform at `phase` radians in [0, 2π).
    #[inline]
    pub fn evaluate(self, phase: f32) -> f32 {
        WAVE_TABLE[self as usize](phase)
    }
}

fn sine(phase: f32) -> f32 {
    phase.sin()
}

fn square(phase: f32) -> f32 {
    if phase < PI {
        1.0
    } else {
        -1.0
    }
}

fn triangle(phase: f32) -> f32 {
    let q = phase / FRAC_PI_2; // quarter cycles, [0, 4)
    if q < 1.0 {
        q
    } else if q < 3.0 {
        2.0 - q
    } else {
        q - 4.0
    }
}

fn saw(phase: f32) -> f32 {
    if phase < PI {
        phase / PI
    } else {
        phase / PI - 2.0
    }
}

fn sine_square(phase: f32) -> f32 {
    if phase <= PI {
        phase.sin()
    } else {
        -1.0
    }
}
