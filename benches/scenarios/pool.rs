//! Benchmark for a full pool: every voice held, realistic unison.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use unisynth::{dsp::AudioBuffer, presets, EngineConfig, VoicePool};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/pool");

    for &size in BLOCK_SIZES {
        let config = EngineConfig {
            sample_rate: SAMPLE_RATE,
            max_block_size: size,
            ..EngineConfig::default()
        };
        let mut pool = VoicePool::from_config(&config).expect("valid config");
        pool.apply_params(presets::hollow_pad());
        for note in [45, 52, 57, 60, 64, 67, 69, 72] {
            pool.note_on(note, 0.8);
        }

        let mut out = AudioBuffer::new(2, size);
        group.bench_with_input(BenchmarkId::new("eight_voices", size), &size, |b, &size| {
            b.iter(|| {
                out.clear(0, size);
                pool.render_block(black_box(&mut out), 0, size);
            })
        });
    }

    group.finish();
}
