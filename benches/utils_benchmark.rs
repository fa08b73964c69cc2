use std::f64::consts::PI;

use bitstream_pitch::detector::bcf::{BcfConfig, BcfDetector};
use bitstream_pitch::detector::PitchDetector;
use bitstream_pitch::utils::bitstream::Bitstream;
use bitstream_pitch::utils::hysteresis::{encode, ZeroCross};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const SAMPLE_RATE: usize = 44100;
const SIZE: usize = 2048;

fn signal() -> Vec<f64> {
    // Signal coming from some source (microphone, generated, etc...)
    let dt = 1.0 / SAMPLE_RATE as f64;
    let freq = 300.0;
    (0..SIZE)
        .map(|x| {
            let x = 2.0 * PI * x as f64 * dt * freq;
            0.3 * x.sin() + 0.4 * (2.0 * x).sin() + 0.3 * (3.0 * x).sin()
        })
        .collect()
}

pub fn utils_benchmark(c: &mut Criterion) {
    let signal = signal();
    let mut bits = Bitstream::<u64>::new(SIZE);
    let mut zero_cross = ZeroCross::default();
    encode(&signal, &mut zero_cross, &mut bits);

    c.bench_function("encode", |b| {
        b.iter(|| {
            let mut zero_cross = ZeroCross::default();
            encode(black_box(&signal), &mut zero_cross, &mut bits)
        })
    });

    c.bench_function("autocorrelate u64", |b| {
        b.iter(|| black_box(&bits).correlations(0).map(|(_, d)| d).sum::<u32>())
    });

    let mut narrow = Bitstream::<u32>::new(SIZE);
    encode(&signal, &mut ZeroCross::default(), &mut narrow);
    c.bench_function("autocorrelate u32", |b| {
        b.iter(|| black_box(&narrow).correlations(0).map(|(_, d)| d).sum::<u32>())
    });
}

pub fn pitch_detect_benchmark(c: &mut Criterion) {
    let signal = signal();

    let mut detector: BcfDetector<f64> = BcfDetector::new(SIZE, BcfConfig::default()).unwrap();
    let mut narrow_detector: BcfDetector<f64, u32> =
        BcfDetector::new(SIZE, BcfConfig::default()).unwrap();

    c.bench_function("BCF get_pitch", |b| {
        b.iter(|| detector.get_pitch(black_box(&signal)).unwrap());
    });

    c.bench_function("BCF u32 get_pitch", |b| {
        b.iter(|| narrow_detector.get_pitch(black_box(&signal)).unwrap());
    });
}

criterion_group!(benches, pitch_detect_benchmark, utils_benchmark);
criterion_main!(benches);
