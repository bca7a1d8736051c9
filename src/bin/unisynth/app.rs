//! Demo - audio setup and the control-thread player

use std::{thread, time::Duration};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{error, info};

use unisynth::{
    dsp::AudioBuffer,
    synth::{message_channel, DEFAULT_QUEUE_CAPACITY},
    EngineConfig, Settings, VoicePool,
};

/// One step of the progression: notes held together for a number of beats.
struct Chord {
    notes: Vec<u8>,
    beats: f64,
}

/// Demo player builder
pub struct Demo {
    settings: Settings,
    bpm: f64,
    chords: Vec<Chord>,
}

impl Demo {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            bpm: 120.0,
            chords: Vec::new(),
        }
    }

    /// Set the tempo in beats per minute
    pub fn bpm(mut self, bpm: f64) -> Self {
        self.bpm = bpm;
        self
    }

    /// Append a chord held for `beats` beats
    pub fn chord(mut self, notes: &[u8], beats: f64) -> Self {
        self.chords.push(Chord {
            notes: notes.to_vec(),
            beats,
        });
        self
    }

    /// Open the default output, play every chord once, then let the tails ring out.
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let channels = config.channels() as usize;
        let engine = EngineConfig {
            sample_rate: config.sample_rate().0 as f32,
            num_channels: channels.min(2),
            ..self.settings.engine
        };

        info!(
            device = %device.name().unwrap_or_else(|_| "unknown".into()),
            sample_rate = engine.sample_rate,
            channels,
            voices = engine.voices,
            unison = self.settings.patch.unison_count(),
            "starting audio"
        );

        let mut pool = VoicePool::from_config(&engine)?;
        pool.apply_params(self.settings.patch);

        let (mut handle, mut rx) = message_channel(DEFAULT_QUEUE_CAPACITY);
        let block_size = engine.max_block_size;
        let mut buffer = AudioBuffer::new(engine.num_channels, block_size);

        // The pool moves into the callback; the handle is the only way in.
        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                pool.process_messages(&mut rx);

                for frame_block in data.chunks_mut(block_size * channels) {
                    let frames = frame_block.len() / channels;
                    buffer.clear(0, frames);
                    pool.render_block(&mut buffer, 0, frames);
                    buffer.write_interleaved(frames, frame_block, channels);

                    // Stand-in for a proper limiter
                    for sample in frame_block.iter_mut() {
                        *sample = sample.clamp(-1.0, 1.0);
                    }
                }
            },
            |err| error!("audio stream error: {err}"),
            None,
        )?;

        stream.play()?;

        let beat = Duration::from_secs_f64(60.0 / self.bpm);
        for chord in &self.chords {
            info!(notes = ?chord.notes, beats = chord.beats, "chord");
            for &note in &chord.notes {
                handle.note_on(note, 0.8)?;
            }
            thread::sleep(beat.mul_f64(chord.beats));
            for &note in &chord.notes {
                handle.note_off(note, true)?;
            }
        }

        handle.all_notes_off(true)?;
        let tail = self.settings.patch.envelope.release as f64 + 0.25;
        thread::sleep(Duration::from_secs_f64(tail));

        info!("done");
        Ok(())
    }
}
