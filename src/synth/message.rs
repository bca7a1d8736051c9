#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::synth::params::SynthParams;

/// Control events delivered to the audio thread between blocks.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    NoteOn { note: u8, velocity: f32 },
    NoteOff { note: u8, allow_tail_off: bool },
    AllNotesOff { allow_tail_off: bool },
    /// A complete, already sanitized parameter snapshot.
    Params(SynthParams),
}

/// Source of control messages drained by the voice pool at a block boundary.
pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}

/// Drains a pre-filled list front to back. Useful offline and in tests.
impl MessageReceiver for std::collections::VecDeque<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        self.pop_front()
    }
}
