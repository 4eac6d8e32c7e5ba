//! Benchmarks for chromatch-core correction operations
//!
//! Run with: cargo bench -p chromatch-core

use chromatch_core::{
    accumulate_with, apply_matrix_with, estimate, ColorCorrectionMatrix, CorrectionOptions,
    Parallelism, PixelBuffer,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Generate a synthetic RGB gradient
fn generate_start(width: u32, height: u32) -> PixelBuffer {
    let mut data = Vec::with_capacity(width as usize * height as usize * 3);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width.max(1)) as u8;
            let g = (y * 255 / height.max(1)) as u8;
            data.push(r);
            data.push(g);
            data.push(((r as u32 + g as u32) / 2) as u8 ^ 0x2a);
        }
    }
    PixelBuffer::new(width, height, 3, data)
}

/// A mild color cast to fit against
fn cast_matrix() -> ColorCorrectionMatrix {
    ColorCorrectionMatrix::from_rows([[1.08, -0.03, 0.0], [0.02, 0.95, 0.01], [-0.02, 0.04, 0.9]])
}

fn modes() -> [(&'static str, Parallelism); 2] {
    [
        ("sequential", Parallelism::Sequential),
        ("parallel", Parallelism::Parallel { min_pixels: 0 }),
    ]
}

/// Benchmark sufficient-statistics accumulation
fn bench_accumulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("accumulate");

    for size in [256u32, 512, 1024, 2048].iter() {
        let start = generate_start(*size, *size);
        let target = apply_matrix_with(&start, &cast_matrix(), Parallelism::parallel())
            .expect("benchmark input is valid");
        group.throughput(Throughput::Elements(start.pixel_count() as u64));

        for (name, mode) in modes() {
            group.bench_with_input(
                BenchmarkId::new(name, format!("{}x{}", size, size)),
                &(&start, &target),
                |b, &(s, t)| {
                    b.iter(|| accumulate_with(black_box(s), black_box(t), mode));
                },
            );
        }
    }

    group.finish();
}

/// Benchmark matrix application
fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_matrix");
    let matrix = cast_matrix();

    for size in [256u32, 512, 1024, 2048].iter() {
        let image = generate_start(*size, *size);
        group.throughput(Throughput::Elements(image.pixel_count() as u64));

        for (name, mode) in modes() {
            group.bench_with_input(
                BenchmarkId::new(name, format!("{}x{}", size, size)),
                &image,
                |b, img| {
                    b.iter(|| apply_matrix_with(black_box(img), black_box(&matrix), mode));
                },
            );
        }
    }

    group.finish();
}

/// Benchmark the full estimate (accumulate + solve + report)
fn bench_estimate(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate");
    group.sample_size(20);

    let start = generate_start(1024, 1024);
    let target = apply_matrix_with(&start, &cast_matrix(), Parallelism::parallel())
        .expect("benchmark input is valid");
    let options = CorrectionOptions {
        parallelism: Parallelism::parallel(),
        ..CorrectionOptions::default()
    };

    group.bench_function("1024x1024", |b| {
        b.iter(|| estimate(black_box(&start), black_box(&target), &options));
    });

    group.finish();
}

criterion_group!(benches, bench_accumulate, bench_apply, bench_estimate);
criterion_main!(benches);
