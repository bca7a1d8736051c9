//! Init patch - the blank starting point.
//!
//! One sine per part, all three at full mix (so each is scaled to 1/3), no
//! unison, and a gentle envelope. Identical to `SynthParams::default()`.

use crate::synth::SynthParams;

pub fn init() -> SynthParams {
    SynthParams::default()
}
