//! Benchmarks for gain stages.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use unisynth::dsp::{
    amplify::{apply_gain, apply_gain_ramp, Gain},
    AudioBuffer, ProcessSpec, Stage,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_amplify(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/amplify");

    for &size in BLOCK_SIZES {
        let mut signal = vec![0.5f32; size];

        group.bench_with_input(BenchmarkId::new("constant", size), &size, |b, _| {
            b.iter(|| apply_gain(black_box(&mut signal), black_box(0.999)))
        });

        group.bench_with_input(BenchmarkId::new("ramp", size), &size, |b, _| {
            b.iter(|| apply_gain_ramp(black_box(&mut signal), black_box(0.2), black_box(0.8)))
        });

        // Smoothed stage, retargeted every block so it's always ramping
        let mut buffer = AudioBuffer::new(2, size);
        let mut gain = Gain::default();
        gain.prepare(&ProcessSpec::new(SAMPLE_RATE, size, 2));
        let mut flip = false;
        group.bench_with_input(BenchmarkId::new("smoothed", size), &size, |b, &size| {
            b.iter(|| {
                flip = !flip;
                gain.set_gain_linear(if flip { 0.2 } else { 0.8 });
                gain.process(black_box(&mut buffer), size);
            })
        });
    }

    group.finish();
}
