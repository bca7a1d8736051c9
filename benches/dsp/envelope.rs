//! Benchmarks for the block-rate envelope generator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use unisynth::dsp::{AudioBuffer, EnvelopeGenerator, EnvelopeShape};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = AudioBuffer::new(2, size);

        // Attack phase (ramping up, 100 s so it never finishes)
        let shape = EnvelopeShape::new(100.0, 0.1, 0.7, 0.3);
        let mut env = EnvelopeGenerator::new();
        env.set_sample_rate(SAMPLE_RATE);
        env.note_on();
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, &size| {
            b.iter(|| {
                env.apply_to_buffer(Some(black_box(&shape)), black_box(&mut buffer), size);
            })
        });

        // Sustain phase (constant gain)
        let shape = EnvelopeShape::new(0.0, 0.0, 0.7, 0.3);
        let mut env = EnvelopeGenerator::new();
        env.set_sample_rate(SAMPLE_RATE);
        env.note_on();
        env.apply_to_buffer(Some(&shape), &mut buffer, size);
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, &size| {
            b.iter(|| {
                env.apply_to_buffer(Some(black_box(&shape)), black_box(&mut buffer), size);
            })
        });

        // Idle (clears instead of ramping)
        let mut env = EnvelopeGenerator::new();
        env.set_sample_rate(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("idle", size), &size, |b, &size| {
            b.iter(|| {
                env.apply_to_buffer(Some(black_box(&shape)), black_box(&mut buffer), size);
            })
        });
    }

    group.finish();
}
