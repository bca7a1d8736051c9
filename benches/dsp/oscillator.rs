//! Benchmarks for a single oscillator unit (generator, panner, gain).

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use unisynth::dsp::{AudioBuffer, OscillatorUnit, ProcessSpec, Waveform};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let spec = ProcessSpec::new(SAMPLE_RATE, size, 2);
        let mut buffer = AudioBuffer::new(2, size);

        // One entry per waveform: sine pays for sin(), the rest are branches
        for waveform in Waveform::ALL {
            let mut unit = OscillatorUnit::new();
            unit.prepare(&spec);
            unit.set_waveform(waveform);
            unit.set_pan(0.3);
            unit.set_pitch(69.0);
            unit.retrigger(0.0);

            let name = format!("{waveform:?}").to_lowercase();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, &size| {
                b.iter(|| {
                    unit.render(black_box(&mut buffer), size);
                })
            });
        }
    }

    group.finish();
}
