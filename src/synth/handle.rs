use rtrb::{Consumer, Producer, RingBuffer};
use tracing::warn;

use crate::{
    error::EngineError,
    synth::{message::SynthMessage, params::SynthParams},
};

/// Default capacity of the control queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Control-thread end of the message queue to the audio thread.
///
/// Every method is wait-free. A full queue is reported, never waited on.
pub struct SynthHandle {
    tx: Producer<SynthMessage>,
}

/// Create a connected handle and consumer. Hand the consumer to
/// [`VoicePool::process_messages`](crate::VoicePool::process_messages).
pub fn message_channel(capacity: usize) -> (SynthHandle, Consumer<SynthMessage>) {
    let (tx, rx) = RingBuffer::<SynthMessage>::new(capacity);
    (SynthHandle { tx }, rx)
}

impl SynthHandle {
    pub fn note_on(&mut self, note: u8, velocity: f32) -> Result<(), EngineError> {
        if note > 127 {
            return Err(EngineError::InvalidNote(note));
        }
        let velocity = if velocity.is_finite() {
            velocity.clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.send(SynthMessage::NoteOn { note, velocity })
    }

    pub fn note_off(&mut self, note: u8, allow_tail_off: bool) -> Result<(), EngineError> {
        if note > 127 {
            return Err(EngineError::InvalidNote(note));
        }
        self.send(SynthMessage::NoteOff {
            note,
            allow_tail_off,
        })
    }

    pub fn all_notes_off(&mut self, allow_tail_off: bool) -> Result<(), EngineError> {
        self.send(SynthMessage::AllNotesOff { allow_tail_off })
    }

    /// Send a parameter snapshot, clamped to the documented ranges first.
    pub fn set_params(&mut self, params: &SynthParams) -> Result<(), EngineError> {
        self.send(SynthMessage::Params(params.sanitized()))
    }

    /// Free slots left in the queue.
    pub fn slots(&self) -> usize {
        self.tx.slots()
    }

    fn send(&mut self, message: SynthMessage) -> Result<(), EngineError> {
        self.tx.push(message).map_err(|_| {
            warn!(?message, "control queue full, message dropped");
            EngineError::QueueFull
        })
    }
}
