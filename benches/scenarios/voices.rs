//! Benchmarks for rendering live voices through the engine.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use ringvoice::{PolySynth, SynthConfig};

use crate::BLOCK_SIZES;

fn engine() -> PolySynth {
    let (synth, _handle) = PolySynth::new(SynthConfig::default()).expect("default config is valid");
    synth
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === SINGLE VOICE ===
        // One held note: four oscillators, three gains, envelope, lowpass
        let mut synth = engine();
        synth.note_on(60, 100);
        group.bench_with_input(BenchmarkId::new("single", size), &size, |b, _| {
            b.iter(|| synth.render_block(black_box(&mut buffer)))
        });

        // === CHORD ===
        // Eight held notes, the bus sums them all
        let mut synth = engine();
        for note in [48, 52, 55, 60, 64, 67, 71, 72] {
            synth.note_on(note, 100);
        }
        group.bench_with_input(BenchmarkId::new("chord_8", size), &size, |b, _| {
            b.iter(|| synth.render_block(black_box(&mut buffer)))
        });

        // === NOTE CHURN ===
        // Start and release a note every block; voices build up in release
        // and are freed as their guards expire
        let mut synth = engine();
        let mut note = 36u8;
        group.bench_with_input(BenchmarkId::new("churn", size), &size, |b, _| {
            b.iter(|| {
                synth.note_off(note);
                note = if note >= 96 { 36 } else { note + 1 };
                synth.note_on(note, 100);
                synth.render_block(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
