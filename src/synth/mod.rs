// Purpose: Voice management, unison and polyphony
// This layer sits above the dsp primitives and turns notes into sound

#[cfg(feature = "rtrb")]
pub mod handle;
pub mod message;
pub mod oscillator_engine;
pub mod params;
pub mod pool;
pub mod unison;
pub mod voice;

#[cfg(feature = "rtrb")]
pub use handle::{message_channel, SynthHandle, DEFAULT_QUEUE_CAPACITY};
pub use message::{MessageReceiver, SynthMessage};
pub use oscillator_engine::{OscillatorEngine, MAX_UNISON};
pub use params::{param_info, param_table, EnvelopeParams, OscillatorParams, ParamInfo, SynthParams};
pub use pool::VoicePool;
pub use unison::{UnisonLayer, UnisonSpread};
pub use voice::{Voice, VoiceState};
