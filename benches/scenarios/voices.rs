//! Benchmarks for single voices at increasing unison counts.
//!
//! A one-copy voice is the baseline; a 17-copy voice is the worst case a
//! single note can cost.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use unisynth::{
    dsp::{AudioBuffer, ProcessSpec},
    presets,
    synth::Voice,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    for &size in BLOCK_SIZES {
        let spec = ProcessSpec::new(SAMPLE_RATE, size, 2);
        let mut out = AudioBuffer::new(2, size);

        for unison_voices in [0u8, 6, 16] {
            let mut params = presets::supersaw();
            params.unison_voices = unison_voices;
            let shape = params.envelope.shape();

            let mut voice = Voice::new();
            voice.prepare(&spec);
            voice.apply_params(&params);
            voice.start(45, 1.0, 0);

            let id = BenchmarkId::new(format!("unison_{}", params.unison_count()), size);
            group.bench_with_input(id, &size, |b, &size| {
                b.iter(|| {
                    out.clear(0, size);
                    voice.render_block(Some(&shape), black_box(&mut out), 0, size);
                })
            });
        }
    }

    group.finish();
}
