use criterion::{criterion_group, criterion_main, Criterion};
use relay_proto::QueryView;

fn question_bytes(name: &str) -> Vec<u8> {
    let mut buf = vec![0u8; 12];
    buf[4..6].copy_from_slice(&1u16.to_be_bytes());
    for label in name.split('.') {
        buf.push(label.len() as u8);
        buf.extend_from_slice(label.as_bytes());
    }
    buf.push(0);
    buf.extend_from_slice(&[0, 1, 0, 1]);
    buf
}

fn criterion_benchmark(c: &mut Criterion) {
    let short = question_bytes("example.com");
    let long = question_bytes("a.b.c.d.e.f.g.h.i.example.com");

    c.bench_function("parse short question", |b| {
        b.iter(|| QueryView::parse(&short).unwrap())
    });
    c.bench_function("parse long question", |b| {
        b.iter(|| QueryView::parse(&long).unwrap())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
