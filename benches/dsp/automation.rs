//! Benchmarks for parameter timeline evaluation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use ringvoice::dsp::automation::ParamTimeline;

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f64 = 48_000.0;

/// Attack/decay schedule as a voice writes it at t = 0.
fn adsr_timeline() -> ParamTimeline {
    let mut gain = ParamTimeline::new(0.0);
    gain.set_value_at_time(0.0, 0.0);
    gain.linear_ramp_to_value_at_time(1.0, 0.02);
    gain.linear_ramp_to_value_at_time(0.5, 0.03);
    gain
}

pub fn bench_automation(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/automation");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Per-sample lookup across the attack ramp
        let gain = adsr_timeline();
        group.bench_with_input(BenchmarkId::new("value_at_ramp", size), &size, |b, _| {
            b.iter(|| {
                for (i, out) in buffer.iter_mut().enumerate() {
                    *out = gain.value_at(black_box(i as f64 / SAMPLE_RATE));
                }
            })
        });

        // Held sustain after the ramps have passed
        let mut gain = adsr_timeline();
        gain.prune(1.0);
        group.bench_with_input(BenchmarkId::new("value_at_sustain", size), &size, |b, _| {
            b.iter(|| {
                for (i, out) in buffer.iter_mut().enumerate() {
                    *out = gain.value_at(black_box(1.0 + i as f64 / SAMPLE_RATE));
                }
            })
        });
    }

    // Pin-and-release rewrite of the schedule
    group.bench_function("cancel_and_release", |b| {
        b.iter(|| {
            let mut gain = adsr_timeline();
            let now = black_box(0.015);
            let current = gain.value_at(now);
            gain.cancel_scheduled_values(now);
            gain.set_value_at_time(current, now);
            gain.linear_ramp_to_value_at_time(0.0, now + 0.5);
            gain
        })
    });

    group.finish();
}
