// ABOUTME: Benchmarks the transport packet builder and FU-A fragmentation chunking
// ABOUTME: Mirrors the teacher's `smpp_benchmarks.rs` group/bench_function shape

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rtsp_server::rtp::build_packet;
use std::time::Duration;

fn bench_build_packet(c: &mut Criterion) {
    let payload = vec![0x42u8; 1400];

    let mut group = c.benchmark_group("build_packet");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("max_payload", |b| {
        b.iter(|| build_packet(96, true, black_box(0), black_box(0), black_box(0), &payload));
    });

    group.finish();
}

fn bench_fragment_chunking(c: &mut Criterion) {
    let mut group = c.benchmark_group("fragment_chunking");
    group.measurement_time(Duration::from_secs(5));

    for size in [1401usize, 4096, 16384] {
        let access_unit = vec![0x65u8; size];
        group.bench_with_input(BenchmarkId::new("chunks", size), &access_unit, |b, data| {
            b.iter(|| {
                let payload = &data[1..];
                let chunks: Vec<&[u8]> = payload.chunks(1400).collect();
                black_box(chunks.len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_packet, bench_fragment_chunking);
criterion_main!(benches);
