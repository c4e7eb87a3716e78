//! Touchstone parsing throughput benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lib_touchstone::{Packet, PacketSink, TouchstoneParser};

struct NullSink;

impl PacketSink for NullSink {
    fn handle(&mut self, packet: Packet<'_>) {
        black_box(packet);
    }
}

/// Build a synthetic two-port sweep with `points` frequency points.
fn synth_s2p(points: usize) -> String {
    let mut out = String::from("# GHZ S MA R 50\n");
    for i in 0..points {
        let f = 1.0 + i as f64 * 0.01;
        out.push_str(&format!(
            "{f:.4} .99 0 .01 180 .5 45 .98 5\n"
        ));
    }
    out
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for points in [100, 1000, 10000].iter() {
        let input = synth_s2p(*points);

        group.bench_with_input(
            BenchmarkId::new("whole_buffer", points),
            &input,
            |b, input| {
                b.iter(|| {
                    let mut parser = TouchstoneParser::new();
                    let mut sink = NullSink;
                    parser.receive(black_box(input.as_bytes()), &mut sink).unwrap();
                    parser.end(&mut sink).unwrap();
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("chunked_4k", points),
            &input,
            |b, input| {
                b.iter(|| {
                    let mut parser = TouchstoneParser::new();
                    let mut sink = NullSink;
                    for chunk in input.as_bytes().chunks(4096) {
                        parser.receive(black_box(chunk), &mut sink).unwrap();
                    }
                    parser.end(&mut sink).unwrap();
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
