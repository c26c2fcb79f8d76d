// In depthpack-core/benches/codec_bench.rs

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;

use depthpack::{Algorithm, CodecConfig, StreamCoder};

const RASTER_SIZE: usize = 512 * 512;

/// Generates a terrain-like raster: a smooth ramp with mild local noise, the
/// shape real elevation data takes after quantization.
fn generate_depth_raster(quantization: u8) -> Vec<u16> {
    let max = (1u32 << quantization) - 1;
    let mut rng = rand::rng();
    (0..RASTER_SIZE)
        .map(|i| {
            let ramp = (i as u32 * max) / RASTER_SIZE as u32;
            let noise = rng.random_range(0..32);
            (ramp.saturating_add(noise)).min(max) as u16
        })
        .collect()
}

fn bench_codec(c: &mut Criterion) {
    let _ = env_logger::try_init();

    let depths = generate_depth_raster(12);

    let hilbert = StreamCoder::new(CodecConfig {
        algorithm: Algorithm::Hilbert,
        quantization: 12,
        ..Default::default()
    })
    .unwrap();
    let split = StreamCoder::new(CodecConfig {
        algorithm: Algorithm::Split,
        quantization: 12,
        ..Default::default()
    })
    .unwrap();

    let hilbert_colors = hilbert.encode_vec(&depths);
    let split_colors = split.encode_vec(&depths);

    let mut group = c.benchmark_group("Raster Codec (512x512)");
    group.throughput(criterion::Throughput::Elements(RASTER_SIZE as u64));

    group.bench_function("Encode Hilbert (tables)", |b| {
        b.iter(|| black_box(hilbert.encode_vec(black_box(&depths))))
    });
    group.bench_function("Decode Hilbert (tables)", |b| {
        b.iter(|| black_box(hilbert.decode_vec(black_box(&hilbert_colors))))
    });
    group.bench_function("Encode Split (tables)", |b| {
        b.iter(|| black_box(split.encode_vec(black_box(&depths))))
    });
    group.bench_function("Decode Split (tables)", |b| {
        b.iter(|| black_box(split.decode_vec(black_box(&split_colors))))
    });

    group.finish();
}

fn bench_construction(c: &mut Criterion) {
    // Table synthesis is the only allocation-heavy phase; it runs once per
    // configuration and is worth tracking separately.
    c.bench_function("Build StreamCoder Hilbert Q12 (enlarge + tables)", |b| {
        b.iter(|| {
            black_box(
                StreamCoder::new(CodecConfig {
                    algorithm: Algorithm::Hilbert,
                    quantization: 12,
                    ..Default::default()
                })
                .unwrap(),
            )
        })
    });
}

criterion_group!(benches, bench_codec, bench_construction);
criterion_main!(benches);
